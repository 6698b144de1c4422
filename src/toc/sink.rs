//! Index document output.
//!
//! Every page is handed to a [`DocumentSink`] exactly once. The reference
//! graph is a tree, so pages can be written in any order.

use crate::catalog::CatalogMetadata;
use crate::error::StorageError;
use crate::toc::entry::{reference_for, FolderEntry, TOC_FILE};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the catalog metadata document.
pub const METADATA_FILE: &str = "metadata.json";

/// One emitted page bound to its storage location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDocument {
    /// Folder segments below the output root, e.g. `["files", "EMEA-H-C-000"]`.
    pub segments: Vec<String>,
    pub body: FolderEntry,
}

impl IndexDocument {
    pub fn new(segments: Vec<String>, body: FolderEntry) -> Self {
        Self { segments, body }
    }

    /// The `$ref` string parents use to point at this page.
    pub fn reference(&self) -> String {
        reference_for(&self.body.path)
    }

    /// On-disk location below `root`.
    pub fn file_path(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for segment in &self.segments {
            path.push(segment);
        }
        path.join(TOC_FILE)
    }
}

/// Destination for emitted pages.
pub trait DocumentSink {
    fn write(&mut self, document: &IndexDocument) -> Result<(), StorageError>;
    fn write_metadata(&mut self, metadata: &CatalogMetadata) -> Result<(), StorageError>;
    /// Pages accepted so far.
    fn documents_written(&self) -> usize;
}

/// Writes pretty-printed JSON below an output directory.
pub struct FsSink {
    root: PathBuf,
    written: usize,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl DocumentSink for FsSink {
    fn write(&mut self, document: &IndexDocument) -> Result<(), StorageError> {
        for segment in &document.segments {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('/') {
                return Err(StorageError::InvalidPath(format!(
                    "unsafe path segment {:?} in {}",
                    segment, document.body.path
                )));
            }
        }
        let path = document.file_path(&self.root);
        self.write_json(&path, &document.body)?;
        self.written += 1;
        debug!(path = %path.display(), children = document.body.children.len(), "Wrote index page");
        Ok(())
    }

    fn write_metadata(&mut self, metadata: &CatalogMetadata) -> Result<(), StorageError> {
        let path = self.root.join(METADATA_FILE);
        self.write_json(&path, metadata)?;
        debug!(path = %path.display(), "Wrote catalog metadata");
        Ok(())
    }

    fn documents_written(&self) -> usize {
        self.written
    }
}

/// Keeps pages in memory keyed by their `$ref`.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub documents: BTreeMap<String, IndexDocument>,
    pub metadata: Option<CatalogMetadata>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, reference: &str) -> Option<&FolderEntry> {
        self.documents.get(reference).map(|doc| &doc.body)
    }
}

impl DocumentSink for MemorySink {
    fn write(&mut self, document: &IndexDocument) -> Result<(), StorageError> {
        let reference = document.reference();
        if self.documents.contains_key(&reference) {
            return Err(StorageError::InvalidPath(format!(
                "page written twice: {}",
                reference
            )));
        }
        self.documents.insert(reference, document.clone());
        Ok(())
    }

    fn write_metadata(&mut self, metadata: &CatalogMetadata) -> Result<(), StorageError> {
        self.metadata = Some(metadata.clone());
        Ok(())
    }

    fn documents_written(&self) -> usize {
        self.documents.len()
    }
}

/// Counts pages without writing anything.
#[derive(Debug, Default)]
pub struct DryRunSink {
    written: usize,
}

impl DryRunSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentSink for DryRunSink {
    fn write(&mut self, document: &IndexDocument) -> Result<(), StorageError> {
        debug!(reference = %document.reference(), "Dry run: would write index page");
        self.written += 1;
        Ok(())
    }

    fn write_metadata(&mut self, _metadata: &CatalogMetadata) -> Result<(), StorageError> {
        Ok(())
    }

    fn documents_written(&self) -> usize {
        self.written
    }
}
