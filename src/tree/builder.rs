//! Classification trie construction.
//!
//! Records are grouped by normalized code and split recursively at the
//! boundary lengths. A level that adds no information (same collapsed prefix
//! as its parent) never becomes a directory, and a directory that would end up
//! with one child is replaced by that child, so every surviving directory has
//! at least two entries to choose between.

use crate::classification::code::{collapsed_prefix, next_meaningful_level, normalize};
use crate::classification::{ClassificationCode, NameResolver};
use crate::toc::escape::escape_for_path;
use crate::tree::node::{DirectoryNode, Forest, TrieNode};
use crate::types::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Two distinct entries that escaped to the same folder name under one parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCollision {
    pub name: String,
    pub kept_label: String,
    pub dropped_label: String,
    /// Record ids carried by the dropped entry.
    pub dropped_records: Vec<String>,
}

/// Result of a trie build.
#[derive(Debug, Clone, Default)]
pub struct TrieBuild {
    pub forest: Forest,
    pub collisions: Vec<NameCollision>,
}

/// Records sharing one normalized code.
#[derive(Debug, Clone, Copy)]
struct CodeGroup<'a> {
    code: &'a ClassificationCode,
    records: &'a [Arc<Record>],
}

/// Builds the classification trie from a record set.
pub struct TrieBuilder<'r> {
    resolver: &'r NameResolver,
    collisions: Vec<NameCollision>,
}

impl<'r> TrieBuilder<'r> {
    pub fn new(resolver: &'r NameResolver) -> Self {
        Self {
            resolver,
            collisions: Vec::new(),
        }
    }

    /// Build the forest. Total over any input.
    pub fn build(mut self, records: &[Arc<Record>]) -> TrieBuild {
        let mut by_code: BTreeMap<ClassificationCode, Vec<Arc<Record>>> = BTreeMap::new();
        for record in records {
            by_code
                .entry(normalize(&record.code))
                .or_default()
                .push(Arc::clone(record));
        }
        debug!(
            records = records.len(),
            codes = by_code.len(),
            "Grouped records by normalized code"
        );

        let groups: Vec<CodeGroup<'_>> = by_code
            .iter()
            .map(|(code, records)| CodeGroup { code, records })
            .collect();
        let forest = self.build_level(&groups, 0, "");

        TrieBuild {
            forest,
            collisions: self.collisions,
        }
    }

    fn build_level(&mut self, groups: &[CodeGroup<'_>], boundary: usize, parent: &str) -> Forest {
        let mut forest = Forest::new();

        for (prefix, members) in partition(groups, boundary) {
            if prefix == parent {
                match next_level_for(&members, boundary) {
                    Some(next) => {
                        let children = self.build_level(&members, next, parent);
                        self.merge(&mut forest, children);
                    }
                    None => {
                        for group in &members {
                            for record in group.records {
                                let (name, node) = full_leaf(group.code, record);
                                self.insert(&mut forest, name, node);
                            }
                        }
                    }
                }
                continue;
            }

            let total: usize = members.iter().map(|g| g.records.len()).sum();
            if total == 1 {
                let group = members[0];
                let (name, node) = full_leaf(group.code, &group.records[0]);
                self.insert(&mut forest, name, node);
                continue;
            }

            if members.len() == 1 {
                self.emit_shared_code(&mut forest, members[0]);
                continue;
            }

            match next_level_for(&members, boundary) {
                None => {
                    for group in &members {
                        self.emit_shared_code(&mut forest, *group);
                    }
                }
                Some(next) => {
                    // The root partition key is a placeholder, not a real coarse letter.
                    let parent = if boundary == 0 { "" } else { prefix.as_str() };
                    let children = self.build_level(&members, next, parent);
                    if boundary == 0 || children.len() == 1 {
                        self.merge(&mut forest, children);
                    } else {
                        let label = self.resolver.resolve(&prefix);
                        let name = format!("{}) {}", prefix, escape_for_path(&label));
                        let node = TrieNode::Directory(DirectoryNode {
                            label: format!("{}) {}", prefix, label),
                            children,
                        });
                        self.insert(&mut forest, name, node);
                    }
                }
            }
        }

        forest
    }

    /// Records that share one exact code: a named directory when there are
    /// several of them, a plain leaf otherwise.
    fn emit_shared_code(&mut self, forest: &mut Forest, group: CodeGroup<'_>) {
        if let [record] = group.records {
            let (name, node) = full_leaf(group.code, record);
            self.insert(forest, name, node);
            return;
        }

        let names: Vec<&str> = group.records.iter().map(|r| r.display_name()).collect();
        let substance = self.resolver.resolve_shared(group.code.as_str(), &names);

        let mut children = Forest::new();
        for record in group.records {
            let name = format!(
                "{} - {}",
                escape_for_path(record.display_name()),
                escape_for_path(&record.id)
            );
            let label = format!("{} - {}", record.display_name(), record.id);
            self.insert(&mut children, name, TrieNode::leaf(label, Arc::clone(record)));
        }

        // A collision inside the group can leave a single survivor.
        if children.len() == 1 {
            for node in children.into_values() {
                if let TrieNode::Leaf(leaf) = node {
                    let (name, node) = full_leaf(group.code, &leaf.record);
                    self.insert(forest, name, node);
                }
            }
            return;
        }

        let name = format!("{}) {}", group.code, escape_for_path(&substance));
        let node = TrieNode::Directory(DirectoryNode {
            label: format!("{}) {}", group.code, substance),
            children,
        });
        self.insert(forest, name, node);
    }

    fn merge(&mut self, forest: &mut Forest, children: Forest) {
        for (name, node) in children {
            self.insert(forest, name, node);
        }
    }

    fn insert(&mut self, forest: &mut Forest, name: String, node: TrieNode) {
        if let Some(existing) = forest.get(&name) {
            let collision = NameCollision {
                name: name.clone(),
                kept_label: existing.label().to_string(),
                dropped_label: node.label().to_string(),
                dropped_records: node.records().iter().map(|r| r.id.clone()).collect(),
            };
            warn!(
                name = %collision.name,
                kept = %collision.kept_label,
                dropped = %collision.dropped_label,
                "Folder name collision; keeping the first entry"
            );
            self.collisions.push(collision);
            return;
        }
        forest.insert(name, node);
    }
}

/// Group code groups by their collapsed prefix at `boundary`.
fn partition<'a>(
    groups: &[CodeGroup<'a>],
    boundary: usize,
) -> BTreeMap<String, Vec<CodeGroup<'a>>> {
    let mut partitions: BTreeMap<String, Vec<CodeGroup<'a>>> = BTreeMap::new();
    for group in groups {
        partitions
            .entry(collapsed_prefix(group.code.as_str(), boundary))
            .or_default()
            .push(*group);
    }
    partitions
}

/// Smallest next meaningful level across the members.
fn next_level_for(members: &[CodeGroup<'_>], boundary: usize) -> Option<usize> {
    members
        .iter()
        .filter_map(|g| next_meaningful_level(g.code.as_str(), boundary))
        .min()
}

/// Leaf whose name carries the full code: `"{code}) {name} - {id}"`.
fn full_leaf(code: &ClassificationCode, record: &Arc<Record>) -> (String, TrieNode) {
    let name = format!(
        "{}) {} - {}",
        code,
        escape_for_path(record.display_name()),
        escape_for_path(&record.id)
    );
    let label = format!("{}) {} - {}", code, record.display_name(), record.id);
    (name, TrieNode::leaf(label, Arc::clone(record)))
}

/// Build a trie with a throwaway builder.
pub fn build_trie(resolver: &NameResolver, records: &[Arc<Record>]) -> TrieBuild {
    TrieBuilder::new(resolver).build(records)
}
