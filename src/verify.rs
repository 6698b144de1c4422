//! Offline consistency check of an emitted index tree.
//!
//! Every `toc.json` under the output directory is parsed and keyed by the
//! `$ref` that would point at it. A tree is consistent when every `$ref`
//! names an existing page, no folder holds two children with one name, and
//! every page below a view root is reachable.

use crate::error::{ApiError, StorageError};
use crate::report::{VerifyIssue, VerifyReport};
use crate::toc::entry::{reference_for, FolderEntry, TocEntry, TOC_FILE};
use crate::toc::sink::METADATA_FILE;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// A parsed page with its location relative to the output root.
struct Page {
    relative: String,
    depth: usize,
    body: FolderEntry,
}

#[derive(Default)]
struct Tally {
    references: usize,
    folders: usize,
    leaves: usize,
}

/// Check the tree under `root`.
pub fn verify_output(root: &Path) -> Result<VerifyReport, ApiError> {
    if !root.is_dir() {
        return Err(ApiError::MissingInput {
            what: "output directory",
            path: root.to_path_buf(),
        });
    }

    let mut report = VerifyReport {
        root: root.display().to_string(),
        metadata_present: root.join(METADATA_FILE).is_file(),
        ..VerifyReport::default()
    };

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == TOC_FILE)
        .map(|entry| entry.into_path())
        .collect();
    files.sort();

    let mut pages: BTreeMap<String, Page> = BTreeMap::new();
    for path in files {
        let relative = relative_display(root, &path);
        let depth = path
            .strip_prefix(root)
            .map(|p| p.components().count().saturating_sub(1))
            .unwrap_or(0);
        match read_page(&path) {
            Ok(body) => {
                let key = reference_for(&body.path);
                debug!(page = %relative, reference = %key, "Parsed index page");
                if let Some(existing) = pages.get(&key) {
                    report.issues.push(VerifyIssue::DuplicateName {
                        document: relative.clone(),
                        name: format!("{} (same logical path as {})", body.path, existing.relative),
                    });
                    continue;
                }
                pages.insert(
                    key,
                    Page {
                        relative,
                        depth,
                        body,
                    },
                );
            }
            Err(e) => report.issues.push(VerifyIssue::Unreadable {
                document: relative,
                message: e.to_string(),
            }),
        }
    }

    let mut tally = Tally::default();
    let mut referenced: HashSet<String> = HashSet::new();
    for page in pages.values() {
        check_folder(&page.body, page, &pages, &mut referenced, &mut tally, &mut report);
    }

    // view roots sit directly below the output directory
    for (key, page) in &pages {
        if page.depth > 1 && !referenced.contains(key) {
            report.issues.push(VerifyIssue::Orphan {
                document: page.relative.clone(),
            });
        }
    }

    report.documents = pages.len();
    report.references = tally.references;
    report.folders = tally.folders;
    report.leaves = tally.leaves;

    info!(
        documents = report.documents,
        issues = report.issues.len(),
        "Verified index tree"
    );
    Ok(report)
}

fn check_folder(
    folder: &FolderEntry,
    page: &Page,
    pages: &BTreeMap<String, Page>,
    referenced: &mut HashSet<String>,
    tally: &mut Tally,
    report: &mut VerifyReport,
) {
    let mut names = BTreeSet::new();
    for child in &folder.children {
        if !names.insert(child.name()) {
            report.issues.push(VerifyIssue::DuplicateName {
                document: page.relative.clone(),
                name: format!("{}/{}", folder.path, child.name()),
            });
        }
        match child {
            TocEntry::Reference(reference) => {
                tally.references += 1;
                if pages.contains_key(&reference.reference) {
                    referenced.insert(reference.reference.clone());
                } else {
                    report.issues.push(VerifyIssue::DanglingReference {
                        document: page.relative.clone(),
                        reference: reference.reference.clone(),
                    });
                }
            }
            TocEntry::Folder(inner) => {
                tally.folders += 1;
                check_folder(inner, page, pages, referenced, tally, report);
            }
            TocEntry::Document(_) => tally.leaves += 1,
        }
    }
}

fn read_page(path: &Path) -> Result<FolderEntry, StorageError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn relative_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::entry::ReferenceEntry;
    use crate::toc::sink::{DocumentSink, FsSink, IndexDocument};

    fn write(sink: &mut FsSink, segments: &[&str], children: Vec<TocEntry>) {
        let path = format!("docs/{}", segments.join("/"));
        let body = FolderEntry::new(*segments.last().unwrap(), path, children, None);
        sink.write(&IndexDocument::new(
            segments.iter().map(|s| s.to_string()).collect(),
            body,
        ))
        .unwrap();
    }

    #[test]
    fn test_consistent_tree_has_no_issues() {
        let temp = tempfile::tempdir().unwrap();
        let mut sink = FsSink::new(temp.path());
        write(&mut sink, &["files", "A"], vec![]);
        write(
            &mut sink,
            &["files"],
            vec![TocEntry::Reference(ReferenceEntry::new("A", "docs/files/A", None))],
        );

        let report = verify_output(temp.path()).unwrap();
        assert!(report.is_valid(), "{:?}", report.issues);
        assert_eq!(report.documents, 2);
        assert_eq!(report.references, 1);
        assert!(!report.metadata_present);
    }

    #[test]
    fn test_dangling_reference_duplicate_and_orphan() {
        let temp = tempfile::tempdir().unwrap();
        let mut sink = FsSink::new(temp.path());
        write(
            &mut sink,
            &["files"],
            vec![
                TocEntry::Reference(ReferenceEntry::new("A", "docs/files/A", None)),
                TocEntry::Folder(FolderEntry::new("A", "docs/files/A2", vec![], None)),
            ],
        );
        write(&mut sink, &["files", "B"], vec![]);

        let report = verify_output(temp.path()).unwrap();
        assert!(report.issues.contains(&VerifyIssue::DanglingReference {
            document: "files/toc.json".to_string(),
            reference: "docs/files/A/toc.json".to_string(),
        }));
        assert!(report
            .issues
            .iter()
            .any(|i| matches!(i, VerifyIssue::DuplicateName { .. })));
        assert!(report.issues.contains(&VerifyIssue::Orphan {
            document: "files/B/toc.json".to_string(),
        }));
    }

    #[test]
    fn test_unreadable_page_reported() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("files")).unwrap();
        fs::write(temp.path().join("files").join(TOC_FILE), "{not json").unwrap();
        let report = verify_output(temp.path()).unwrap();
        assert!(matches!(report.issues[0], VerifyIssue::Unreadable { .. }));
    }

    #[test]
    fn test_missing_output_dir() {
        let temp = tempfile::tempdir().unwrap();
        assert!(verify_output(&temp.path().join("none")).is_err());
    }
}
