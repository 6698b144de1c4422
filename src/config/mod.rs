//! Configuration
//!
//! Layered configuration: built-in defaults, then `tocbuild.toml` in the
//! workspace, then `TOCBUILD__SECTION__KEY` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::toc::documents::{ListingOptions, DEFAULT_PRIMARY_MARKER, DEFAULT_PRIMARY_PHRASE};
use crate::toc::emitter::{ViewOptions, DEFAULT_PAGE_DEPTHS, DEFAULT_VIEW_NAME};
use crate::toc::escape::escape_for_path;
use crate::toc::grouped::{
    GroupOptions, DEFAULT_FILES_NAME, DEFAULT_FILES_TITLE, DEFAULT_PREFIX_WIDTH,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the workspace configuration file.
pub const WORKSPACE_CONFIG_FILE: &str = "tocbuild.toml";

/// Value written to `_source` on root pages unless configured.
pub const DEFAULT_SOURCE_TAG: &str = "tocbuild";

/// Complete configuration for a catalog build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub inputs: InputsConfig,
    pub output: OutputConfig,
    pub catalog: CatalogSection,
    pub index: IndexConfig,
    pub build: BuildConfig,
    pub logging: LoggingConfig,
}

/// Input file locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    pub records: PathBuf,
    pub dictionary: PathBuf,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            records: PathBuf::from("records.json"),
            dictionary: PathBuf::from("dictionary.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the page tree and `metadata.json`.
    pub dir: PathBuf,
    /// Logical path prefix of every page; `documents/{accession}` when unset.
    pub logical_root: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            logical_root: None,
        }
    }
}

/// Descriptive fields copied into `metadata.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    pub accession: String,
    pub title: String,
    pub description: Option<String>,
    pub source: Option<String>,
    pub license_name: Option<String>,
    pub license_url: Option<String>,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            accession: "CATALOG".to_string(),
            title: "Catalog".to_string(),
            description: None,
            source: None,
            license_name: None,
            license_url: None,
        }
    }
}

/// Layout of both index views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub view_name: String,
    pub files_name: String,
    pub files_title: String,
    pub group_prefix_width: usize,
    pub page_depths: Vec<usize>,
    pub primary_phrase: String,
    pub primary_marker: String,
    pub leaf_folder: Option<String>,
    pub source_tag: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            view_name: DEFAULT_VIEW_NAME.to_string(),
            files_name: DEFAULT_FILES_NAME.to_string(),
            files_title: DEFAULT_FILES_TITLE.to_string(),
            group_prefix_width: DEFAULT_PREFIX_WIDTH,
            page_depths: DEFAULT_PAGE_DEPTHS.to_vec(),
            primary_phrase: DEFAULT_PRIMARY_PHRASE.to_string(),
            primary_marker: DEFAULT_PRIMARY_MARKER.to_string(),
            leaf_folder: None,
            source_tag: DEFAULT_SOURCE_TAG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Abort before writing anything when names collide.
    pub fail_on_collision: bool,
}

impl CatalogConfig {
    /// Make relative input and output paths absolute against `workspace_root`.
    pub fn resolve_paths(&mut self, workspace_root: &Path) {
        for path in [
            &mut self.inputs.records,
            &mut self.inputs.dictionary,
            &mut self.output.dir,
        ] {
            if path.is_relative() {
                *path = workspace_root.join(&*path);
            }
        }
    }

    /// Reject settings that would produce unusable output.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.catalog.accession.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "catalog.accession must not be empty".to_string(),
            ));
        }
        if self.index.group_prefix_width == 0 {
            return Err(ApiError::ConfigError(
                "index.group_prefix_width must be at least 1".to_string(),
            ));
        }
        if self.index.page_depths.contains(&0) {
            return Err(ApiError::ConfigError(
                "index.page_depths start at 1 (the root page is always written)".to_string(),
            ));
        }
        let mut folders = vec![
            ("index.view_name", self.index.view_name.as_str()),
            ("index.files_name", self.index.files_name.as_str()),
        ];
        if let Some(leaf) = &self.index.leaf_folder {
            folders.push(("index.leaf_folder", leaf.as_str()));
        }
        for (key, name) in folders {
            if escape_for_path(name) != name {
                return Err(ApiError::ConfigError(format!(
                    "{} is not a valid folder name: {:?}",
                    key, name
                )));
            }
        }
        if self.index.view_name == self.index.files_name {
            return Err(ApiError::ConfigError(
                "index.view_name and index.files_name must differ".to_string(),
            ));
        }
        Ok(())
    }

    pub fn logical_root(&self) -> String {
        match &self.output.logical_root {
            Some(root) if !root.trim().is_empty() => root.trim_end_matches('/').to_string(),
            _ => format!("documents/{}", self.catalog.accession),
        }
    }

    pub fn listing_options(&self) -> ListingOptions {
        ListingOptions {
            primary_phrase: self.index.primary_phrase.clone(),
            primary_marker: self.index.primary_marker.clone(),
            accession: Some(self.catalog.accession.clone()),
        }
    }

    pub fn view_options(&self) -> ViewOptions {
        let mut page_depths = self.index.page_depths.clone();
        page_depths.sort_unstable();
        page_depths.dedup();
        ViewOptions {
            logical_root: self.logical_root(),
            view_name: self.index.view_name.clone(),
            page_depths,
            source_tag: Some(self.index.source_tag.clone()),
            listing: self.listing_options(),
        }
    }

    pub fn group_options(&self) -> GroupOptions {
        GroupOptions {
            logical_root: self.logical_root(),
            files_name: self.index.files_name.clone(),
            files_title: self.index.files_title.clone(),
            prefix_width: self.index.group_prefix_width,
            leaf_folder: self.index.leaf_folder.clone(),
            source_tag: Some(self.index.source_tag.clone()),
            listing: self.listing_options(),
        }
    }
}
