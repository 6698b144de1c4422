//! Classification trie node types

use crate::types::Record;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Children keyed by filesystem-safe folder name, sorted by name.
pub type Forest = BTreeMap<String, TrieNode>;

/// Leaf node representation: exactly one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    pub label: String,
    pub record: Arc<Record>,
}

/// Directory node representation: two or more children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    pub label: String,
    pub children: Forest,
}

/// Trie node type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrieNode {
    Leaf(LeafNode),
    Directory(DirectoryNode),
}

impl TrieNode {
    pub fn leaf(label: impl Into<String>, record: Arc<Record>) -> Self {
        TrieNode::Leaf(LeafNode {
            label: label.into(),
            record,
        })
    }

    pub fn label(&self) -> &str {
        match self {
            TrieNode::Leaf(leaf) => &leaf.label,
            TrieNode::Directory(dir) => &dir.label,
        }
    }

    /// Number of leaves at or below this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            TrieNode::Leaf(_) => 1,
            TrieNode::Directory(dir) => count_leaves(&dir.children),
        }
    }

    /// Records at or below this node, in key order.
    pub fn records(&self) -> Vec<Arc<Record>> {
        let mut out = Vec::new();
        collect_records(self, &mut out);
        out
    }
}

pub fn count_leaves(forest: &Forest) -> usize {
    forest.values().map(TrieNode::leaf_count).sum()
}

fn collect_records(node: &TrieNode, out: &mut Vec<Arc<Record>>) {
    match node {
        TrieNode::Leaf(leaf) => out.push(Arc::clone(&leaf.record)),
        TrieNode::Directory(dir) => {
            for child in dir.children.values() {
                collect_records(child, out);
            }
        }
    }
}

/// Depth-first visit of every directory, with its depth (top level = 1).
pub fn visit_directories<'a, F>(forest: &'a Forest, visit: &mut F)
where
    F: FnMut(usize, &'a str, &'a DirectoryNode),
{
    fn walk<'a, F>(forest: &'a Forest, depth: usize, visit: &mut F)
    where
        F: FnMut(usize, &'a str, &'a DirectoryNode),
    {
        for (name, node) in forest {
            if let TrieNode::Directory(dir) = node {
                visit(depth, name, dir);
                walk(&dir.children, depth + 1, visit);
            }
        }
    }
    walk(forest, 1, visit);
}
