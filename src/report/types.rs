//! Shared result types for build, verify and resolve commands.

use crate::tree::builder::NameCollision;
use serde::{Deserialize, Serialize};

/// Outcome of a catalog build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub accession: String,
    pub records: usize,
    /// Sub-items that produced a listing entry.
    pub subitems: usize,
    pub documents_written: usize,
    pub prefix_groups: usize,
    pub top_level_entries: usize,
    pub name_collisions: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collisions: Vec<NameCollision>,
    /// Ids left out of the flat index because another id escaped to the same page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicate_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default)]
    pub dry_run: bool,
}

/// Outcome of checking an emitted tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    pub root: String,
    pub documents: usize,
    pub references: usize,
    pub folders: usize,
    /// Document (sub-item) entries across all pages.
    pub leaves: usize,
    pub metadata_present: bool,
    pub issues: Vec<VerifyIssue>,
}

impl VerifyReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// One problem found in an emitted tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerifyIssue {
    /// A page could not be read or parsed.
    Unreadable { document: String, message: String },
    /// A `$ref` points at a page that does not exist.
    DanglingReference { document: String, reference: String },
    /// Two siblings share a name.
    DuplicateName { document: String, name: String },
    /// A page exists that no `$ref` reaches.
    Orphan { document: String },
}

/// How one code splits across the boundary levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeResolution {
    pub input: String,
    pub normalized: String,
    pub label: String,
    pub steps: Vec<PrefixStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixStep {
    pub length: usize,
    pub prefix: String,
    pub label: String,
}
