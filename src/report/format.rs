//! Format build, verify and resolve results as text.

use crate::report::types::{BuildSummary, CodeResolution, VerifyIssue, VerifyReport};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Format a build summary as human-readable text.
pub fn format_build_summary_text(summary: &BuildSummary) -> String {
    let mut out = String::new();
    let heading = if summary.dry_run {
        "Catalog Build (dry run)"
    } else {
        "Catalog Build"
    };
    out.push_str(&format!("{}\n\n", format_section_heading(heading)));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Item", "Count"]);
    table.add_row(vec!["Records".to_string(), summary.records.to_string()]);
    table.add_row(vec!["Sub-items".to_string(), summary.subitems.to_string()]);
    table.add_row(vec![
        "Documents written".to_string(),
        summary.documents_written.to_string(),
    ]);
    table.add_row(vec![
        "Prefix groups".to_string(),
        summary.prefix_groups.to_string(),
    ]);
    table.add_row(vec![
        "Top-level entries".to_string(),
        summary.top_level_entries.to_string(),
    ]);
    table.add_row(vec![
        "Name collisions".to_string(),
        summary.name_collisions.to_string(),
    ]);
    out.push_str(&format!("{}\n", table));

    out.push_str(&format!("  Accession: {}\n", summary.accession));
    if let Some(output) = &summary.output {
        out.push_str(&format!("  Output: {}\n", output));
    }

    if !summary.collisions.is_empty() || !summary.duplicate_ids.is_empty() {
        out.push_str(&format!("\n{}\n\n", format_section_heading("Collisions")));
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Name", "Kept", "Dropped", "Records"]);
        for collision in &summary.collisions {
            table.add_row(vec![
                collision.name.clone(),
                collision.kept_label.clone(),
                collision.dropped_label.clone(),
                collision.dropped_records.join(", "),
            ]);
        }
        for id in &summary.duplicate_ids {
            table.add_row(vec![
                "files".to_string(),
                "-".to_string(),
                id.clone(),
                id.clone(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }
    out
}

/// Format a verify report as human-readable text.
pub fn format_verify_report_text(report: &VerifyReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Index Verification")));
    out.push_str(&format!("  Root: {}\n", report.root));
    out.push_str(&format!("  Documents: {}\n", report.documents));
    out.push_str(&format!("  References: {}\n", report.references));
    out.push_str(&format!("  Inline folders: {}\n", report.folders));
    out.push_str(&format!("  Leaf entries: {}\n", report.leaves));
    out.push_str(&format!(
        "  Metadata: {}\n\n",
        if report.metadata_present { "present" } else { "missing" }
    ));

    if report.is_valid() {
        out.push_str(&format!("{}\n", "No issues found.".green()));
        return out;
    }

    out.push_str(&format!(
        "{}\n\n",
        format!("{} issue(s) found", report.issues.len()).red()
    ));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Issue", "Document", "Detail"]);
    for issue in &report.issues {
        let row = match issue {
            VerifyIssue::Unreadable { document, message } => {
                vec!["unreadable", document.as_str(), message.as_str()]
            }
            VerifyIssue::DanglingReference {
                document,
                reference,
            } => vec!["dangling $ref", document.as_str(), reference.as_str()],
            VerifyIssue::DuplicateName { document, name } => {
                vec!["duplicate name", document.as_str(), name.as_str()]
            }
            VerifyIssue::Orphan { document } => vec!["orphan page", document.as_str(), ""],
        };
        table.add_row(row);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// Format a code resolution as human-readable text.
pub fn format_resolve_text(resolution: &CodeResolution) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("Code {}", resolution.normalized))
    ));
    out.push_str(&format!("  Input: {:?}\n", resolution.input));
    out.push_str(&format!("  Label: {}\n\n", resolution.label));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Length", "Prefix", "Label"]);
    for step in &resolution.steps {
        table.add_row(vec![
            step.length.to_string(),
            step.prefix.clone(),
            step.label.clone(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}
