//! Sub-item listings for leaf folders.

use crate::toc::entry::{DocumentEntry, TocEntry};
use crate::toc::escape::escape_for_path;
use crate::types::{Record, SubItem};
use std::collections::HashSet;
use std::path::Path;

/// Default phrase identifying a record's primary document.
pub const DEFAULT_PRIMARY_PHRASE: &str = "public assessment report";

/// Default marker prepended to the promoted document's title.
pub const DEFAULT_PRIMARY_MARKER: &str = "⭐ ";

const DEFAULT_EXTENSION: &str = "pdf";

/// How sub-items are rendered and ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingOptions {
    /// Case-insensitive substring marking the primary document.
    pub primary_phrase: String,
    pub primary_marker: String,
    pub accession: Option<String>,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            primary_phrase: DEFAULT_PRIMARY_PHRASE.to_string(),
            primary_marker: DEFAULT_PRIMARY_MARKER.to_string(),
            accession: None,
        }
    }
}

/// Render a record's sub-items in listing order.
///
/// Entries are sorted by date (unknown dates first, ties by name). The first
/// entry whose title contains the primary phrase then moves to the front and
/// gets the marker; later matches keep their date position. Repeated entry
/// names get a ` (2)`, ` (3)`, ... suffix in listing order.
pub fn listing_for(record: &Record, options: &ListingOptions) -> Vec<TocEntry> {
    let mut entries: Vec<DocumentEntry> = record
        .subitems
        .iter()
        .filter(|item| !item.url.trim().is_empty())
        .map(|item| document_entry(item, options))
        .collect();

    entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
    promote_primary(&mut entries, options);
    disambiguate_names(&mut entries);

    entries.into_iter().map(TocEntry::Document).collect()
}

/// Number of sub-items that produce a listing entry.
pub fn listed_count(record: &Record) -> usize {
    record
        .subitems
        .iter()
        .filter(|item| !item.url.trim().is_empty())
        .count()
}

fn promote_primary(entries: &mut Vec<DocumentEntry>, options: &ListingOptions) {
    let phrase = options.primary_phrase.to_lowercase();
    if phrase.is_empty() {
        return;
    }
    let Some(index) = entries
        .iter()
        .position(|entry| entry.title.to_lowercase().contains(&phrase))
    else {
        return;
    };
    let mut primary = entries.remove(index);
    primary.title = format!("{}{}", options.primary_marker, primary.title);
    entries.insert(0, primary);
}

fn disambiguate_names(entries: &mut [DocumentEntry]) {
    let mut taken: HashSet<String> = entries.iter().map(|e| e.name.clone()).collect();
    let mut seen: HashSet<String> = HashSet::new();
    for entry in entries.iter_mut() {
        if seen.insert(entry.name.clone()) {
            continue;
        }
        let (stem, extension) = entry
            .name
            .rsplit_once('.')
            .map(|(stem, ext)| (stem.to_string(), ext.to_string()))
            .unwrap_or_else(|| (entry.name.clone(), String::new()));
        let mut counter = 2;
        let renamed = loop {
            let candidate = if extension.is_empty() {
                format!("{} ({})", stem, counter)
            } else {
                format!("{} ({}).{}", stem, counter, extension)
            };
            if !taken.contains(&candidate) {
                break candidate;
            }
            counter += 1;
        };
        taken.insert(renamed.clone());
        seen.insert(renamed.clone());
        entry.name = renamed;
    }
}

fn document_entry(item: &SubItem, options: &ListingOptions) -> DocumentEntry {
    let date = item.date_label();
    let extension = url_extension(&item.url);
    let title = if item.title.trim().is_empty() {
        item.url.rsplit('/').next().unwrap_or_default().to_string()
    } else {
        item.title.trim().to_string()
    };

    DocumentEntry {
        name: format!("{} {}.{}", date, escape_for_path(&title), extension),
        kind: extension,
        url: item.url.clone(),
        date,
        title,
        accession: options.accession.clone(),
    }
}

/// Lowercase extension of the url's path component; `pdf` when absent.
fn url_extension(url: &str) -> String {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let path = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let path = path.split_once('/').map(|(_, p)| p).unwrap_or_default();

    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
