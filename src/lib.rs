//! tocbuild: paginated catalog indexes
//!
//! Builds a forest of `toc.json` documents over a flat record collection:
//! a classification view that groups records by hierarchical code, and a
//! flat view grouped by identifier prefix. Large subtrees are split into
//! separate pages linked by `$ref` entries.

pub mod catalog;
pub mod classification;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod report;
pub mod toc;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod verify;

pub use catalog::{Catalog, CatalogMetadata};
pub use error::{ApiError, StorageError};
pub use types::{Record, SubItem};
