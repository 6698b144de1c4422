//! Build and verify summaries, rendered as JSON or text tables.

pub mod format;
pub mod types;

pub use format::{format_build_summary_text, format_resolve_text, format_verify_report_text};
pub use types::{BuildSummary, CodeResolution, PrefixStep, VerifyIssue, VerifyReport};
