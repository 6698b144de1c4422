//! Paginated emission of the classification trie.
//!
//! The root page inlines the top of the hierarchy. Every directory sitting at
//! one of the configured page depths is written as its own page and replaced
//! in its parent by a `$ref` entry, so no single page grows past a couple of
//! hierarchy levels while shallow structure stays inline for the first render.

use crate::error::StorageError;
use crate::toc::documents::{listing_for, ListingOptions};
use crate::toc::entry::{FolderEntry, ReferenceEntry, TocEntry};
use crate::toc::sink::{DocumentSink, IndexDocument};
use crate::tree::node::{Forest, LeafNode, TrieNode};
use tracing::info;

/// Default folder name of the classification view.
pub const DEFAULT_VIEW_NAME: &str = "By-Code";

/// Default depths (top-level entries are depth 1) of directories that get
/// their own page; with the root page this yields pages at levels 0, 2 and 4.
pub const DEFAULT_PAGE_DEPTHS: [usize; 2] = [2, 4];

/// Layout of the classification view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    /// Logical path prefix shared by every page, e.g. `documents/RDCP-E26-EMA`.
    pub logical_root: String,
    pub view_name: String,
    pub page_depths: Vec<usize>,
    /// Value of `_source` on the root page.
    pub source_tag: Option<String>,
    pub listing: ListingOptions,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            logical_root: "documents".to_string(),
            view_name: DEFAULT_VIEW_NAME.to_string(),
            page_depths: DEFAULT_PAGE_DEPTHS.to_vec(),
            source_tag: None,
            listing: ListingOptions::default(),
        }
    }
}

impl ViewOptions {
    /// Logical path of the view's root page.
    pub fn base_path(&self) -> String {
        join_path(&self.logical_root, &self.view_name)
    }
}

/// Writes the classification trie as a set of cross-referenced pages.
pub struct ClassificationEmitter<'o> {
    options: &'o ViewOptions,
}

impl<'o> ClassificationEmitter<'o> {
    pub fn new(options: &'o ViewOptions) -> Self {
        Self { options }
    }

    /// Emit every page and return the root page body.
    pub fn emit(
        &self,
        forest: &Forest,
        sink: &mut dyn DocumentSink,
    ) -> Result<FolderEntry, StorageError> {
        let base_path = self.options.base_path();
        let root_segments = vec![self.options.view_name.clone()];
        let before = sink.documents_written();

        let children = self.entries(forest, &base_path, &root_segments, 1, sink)?;
        let mut root = FolderEntry::new(self.options.view_name.clone(), base_path, children, None);
        if let Some(tag) = &self.options.source_tag {
            root = root.with_source(tag.clone());
        }
        sink.write(&IndexDocument::new(root_segments, root.clone()))?;

        info!(
            view = %self.options.view_name,
            pages = sink.documents_written() - before,
            "Emitted classification view"
        );
        Ok(root)
    }

    fn entries(
        &self,
        forest: &Forest,
        path: &str,
        segments: &[String],
        depth: usize,
        sink: &mut dyn DocumentSink,
    ) -> Result<Vec<TocEntry>, StorageError> {
        let mut entries = Vec::with_capacity(forest.len());
        for (name, node) in forest {
            let entry_path = join_path(path, name);
            let entry = match node {
                TrieNode::Leaf(leaf) => {
                    TocEntry::Folder(leaf_folder(name, &entry_path, leaf, &self.options.listing))
                }
                TrieNode::Directory(dir) => {
                    let mut child_segments = segments.to_vec();
                    child_segments.push(name.clone());
                    let children =
                        self.entries(&dir.children, &entry_path, &child_segments, depth + 1, sink)?;
                    let body = FolderEntry::new(
                        name.clone(),
                        entry_path.clone(),
                        children,
                        Some(dir.label.clone()),
                    );

                    if self.options.page_depths.contains(&depth) {
                        sink.write(&IndexDocument::new(child_segments, body))?;
                        TocEntry::Reference(ReferenceEntry::new(
                            name.clone(),
                            entry_path,
                            Some(dir.label.clone()),
                        ))
                    } else {
                        TocEntry::Folder(body)
                    }
                }
            };
            entries.push(entry);
        }
        Ok(entries)
    }
}

/// Unpaginated conversion of the whole forest into one folder.
pub fn render_inline(forest: &Forest, options: &ViewOptions) -> FolderEntry {
    fn entries(forest: &Forest, path: &str, listing: &ListingOptions) -> Vec<TocEntry> {
        forest
            .iter()
            .map(|(name, node)| {
                let entry_path = join_path(path, name);
                match node {
                    TrieNode::Leaf(leaf) => {
                        TocEntry::Folder(leaf_folder(name, &entry_path, leaf, listing))
                    }
                    TrieNode::Directory(dir) => {
                        let children = entries(&dir.children, &entry_path, listing);
                        TocEntry::Folder(FolderEntry::new(
                            name.clone(),
                            entry_path,
                            children,
                            Some(dir.label.clone()),
                        ))
                    }
                }
            })
            .collect()
    }

    let base_path = options.base_path();
    let children = entries(forest, &base_path, &options.listing);
    let mut root = FolderEntry::new(options.view_name.clone(), base_path, children, None);
    if let Some(tag) = &options.source_tag {
        root = root.with_source(tag.clone());
    }
    root
}

fn leaf_folder(name: &str, path: &str, leaf: &LeafNode, listing: &ListingOptions) -> FolderEntry {
    FolderEntry::new(
        name,
        path,
        listing_for(&leaf.record, listing),
        Some(leaf.label.clone()),
    )
}

pub(crate) fn join_path(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), segment)
    }
}
