//! Paginated `toc.json` index output.

pub mod documents;
pub mod emitter;
pub mod entry;
pub mod escape;
pub mod grouped;
pub mod sink;

pub use documents::{listed_count, listing_for, ListingOptions};
pub use emitter::{render_inline, ClassificationEmitter, ViewOptions};
pub use entry::{DocumentEntry, FolderEntry, ReferenceEntry, TocEntry, TOC_FILE};
pub use escape::escape_for_path;
pub use grouped::{group_key, GroupOptions, GroupedEmitter, GroupedIndex};
pub use sink::{DocumentSink, DryRunSink, FsSink, IndexDocument, MemorySink, METADATA_FILE};
