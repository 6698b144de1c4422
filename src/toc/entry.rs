//! JSON shapes of `toc.json` documents.

use serde::{Deserialize, Serialize};

/// File name of every emitted index page.
pub const TOC_FILE: &str = "toc.json";

/// Value of the `type` field on folder and reference entries.
pub const FOLDER_TYPE: &str = "folder";

/// One child entry of a folder.
///
/// Variant order matters for deserialization: a reference is recognised by its
/// `$ref`, a folder by its `children`, a document by its `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TocEntry {
    Reference(ReferenceEntry),
    Folder(FolderEntry),
    Document(DocumentEntry),
}

impl TocEntry {
    pub fn name(&self) -> &str {
        match self {
            TocEntry::Reference(r) => &r.name,
            TocEntry::Folder(f) => &f.name,
            TocEntry::Document(d) => &d.name,
        }
    }
}

/// A folder with inline children; also the body of every page document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub children: Vec<TocEntry>,
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl FolderEntry {
    /// `title` is kept only when it differs from `name`.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        children: Vec<TocEntry>,
        title: Option<String>,
    ) -> Self {
        let name = name.into();
        Self {
            title: distinct_title(&name, title),
            name,
            kind: FOLDER_TYPE.to_string(),
            path: path.into(),
            children,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Pointer to another page holding this folder's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl ReferenceEntry {
    /// Reference to the page stored at `{path}/toc.json`.
    pub fn new(name: impl Into<String>, path: impl Into<String>, title: Option<String>) -> Self {
        let name = name.into();
        let path = path.into();
        Self {
            title: distinct_title(&name, title),
            name,
            kind: FOLDER_TYPE.to_string(),
            reference: reference_for(&path),
            path,
        }
    }
}

/// A sub-item document linked by url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub name: String,
    /// File category, e.g. `pdf`.
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub date: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
}

/// `$ref` value for a page at logical `path`.
pub fn reference_for(path: &str) -> String {
    format!("{}/{}", path, TOC_FILE)
}

fn distinct_title(name: &str, title: Option<String>) -> Option<String> {
    title.filter(|t| t != name)
}
