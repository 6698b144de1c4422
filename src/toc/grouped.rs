//! Flat identifier index.
//!
//! Records are grouped by a fixed-width prefix of their escaped id and laid
//! out over three page levels:
//!
//! - `files/toc.json` lists one `$ref` per prefix group,
//! - `files/{prefix}/toc.json` lists one `$ref` per record,
//! - `files/{prefix}/{suffix}/toc.json` holds the record's sub-items.

use crate::error::StorageError;
use crate::toc::documents::{listing_for, ListingOptions};
use crate::toc::emitter::join_path;
use crate::toc::entry::{FolderEntry, ReferenceEntry, TocEntry};
use crate::toc::escape::escape_for_path;
use crate::toc::sink::{DocumentSink, IndexDocument};
use crate::types::Record;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_FILES_NAME: &str = "files";
pub const DEFAULT_FILES_TITLE: &str = "All Files";
pub const DEFAULT_PREFIX_WIDTH: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOptions {
    pub logical_root: String,
    pub files_name: String,
    pub files_title: String,
    /// Characters of the escaped id that form the group prefix.
    pub prefix_width: usize,
    /// Optional folder wrapping the sub-items on each record page.
    pub leaf_folder: Option<String>,
    pub source_tag: Option<String>,
    pub listing: ListingOptions,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            logical_root: "documents".to_string(),
            files_name: DEFAULT_FILES_NAME.to_string(),
            files_title: DEFAULT_FILES_TITLE.to_string(),
            prefix_width: DEFAULT_PREFIX_WIDTH,
            leaf_folder: None,
            source_tag: None,
            listing: ListingOptions::default(),
        }
    }
}

/// Result of writing the flat index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedIndex {
    pub root: FolderEntry,
    pub groups: usize,
    /// Ids dropped because their escaped form landed on an already used page.
    pub duplicates: Vec<String>,
}

/// Where a record lands in the flat index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupKey {
    pub prefix: String,
    pub suffix: String,
    /// Raw id characters covered by `prefix`, used for the group title.
    pub raw_prefix: String,
}

/// Split an id into its group prefix and record suffix.
///
/// Ids whose escaped form is not longer than `width` use the whole escaped
/// id for both parts.
pub fn group_key(id: &str, width: usize) -> GroupKey {
    let escaped = escape_for_path(id);
    let width = width.max(1);
    if escaped.chars().count() <= width {
        return GroupKey {
            prefix: escaped.clone(),
            suffix: escaped.clone(),
            raw_prefix: id.trim().to_string(),
        };
    }

    let split = escaped
        .char_indices()
        .nth(width)
        .map(|(i, _)| i)
        .unwrap_or(escaped.len());
    let raw = id.trim();
    // escaping maps characters one to one unless it collapsed or trimmed
    let raw_prefix = if raw.chars().count() == escaped.chars().count() {
        raw.chars().take(width).collect()
    } else {
        escaped[..split].to_string()
    };

    GroupKey {
        prefix: escaped[..split].to_string(),
        suffix: escaped[split..].to_string(),
        raw_prefix,
    }
}

/// Ids whose escaped form lands on a page already taken by an earlier record.
pub fn duplicate_ids(records: &[Arc<Record>], width: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|record| {
            let key = group_key(&record.id, width);
            if seen.insert((key.prefix, key.suffix)) {
                None
            } else {
                Some(record.id.clone())
            }
        })
        .collect()
}

pub struct GroupedEmitter<'o> {
    options: &'o GroupOptions,
}

impl<'o> GroupedEmitter<'o> {
    pub fn new(options: &'o GroupOptions) -> Self {
        Self { options }
    }

    pub fn emit(
        &self,
        records: &[Arc<Record>],
        sink: &mut dyn DocumentSink,
    ) -> Result<GroupedIndex, StorageError> {
        let opts = self.options;
        let files_path = join_path(&opts.logical_root, &opts.files_name);

        let mut groups: BTreeMap<String, (String, BTreeMap<String, &Arc<Record>>)> =
            BTreeMap::new();
        let mut duplicates = Vec::new();
        for record in records {
            let key = group_key(&record.id, opts.prefix_width);
            let (_, members) = groups
                .entry(key.prefix)
                .or_insert_with(|| (key.raw_prefix, BTreeMap::new()));
            if let Some(existing) = members.get(&key.suffix) {
                warn!(
                    id = %record.id,
                    kept = %existing.id,
                    suffix = %key.suffix,
                    "Identifier escapes onto an existing page; skipping record"
                );
                duplicates.push(record.id.clone());
                continue;
            }
            members.insert(key.suffix, record);
        }

        let mut group_refs = Vec::with_capacity(groups.len());
        for (prefix, (raw_prefix, members)) in &groups {
            let prefix_path = join_path(&files_path, prefix);
            let width = members
                .keys()
                .filter(|suffix| *suffix != prefix)
                .map(|suffix| suffix.chars().count())
                .max()
                .unwrap_or(0);
            let group_title = format!("{}{}", raw_prefix, "X".repeat(width));

            let mut record_refs = Vec::with_capacity(members.len());
            for (suffix, record) in members {
                let record_path = join_path(&prefix_path, suffix);
                self.write_record_page(prefix, suffix, &record_path, record, sink)?;
                record_refs.push(TocEntry::Reference(ReferenceEntry::new(
                    suffix.clone(),
                    record_path,
                    Some(format!("{} - {}", record.id, record.display_name())),
                )));
            }

            let body = FolderEntry::new(
                prefix.clone(),
                prefix_path.clone(),
                record_refs,
                Some(group_title.clone()),
            );
            sink.write(&IndexDocument::new(
                vec![opts.files_name.clone(), prefix.clone()],
                body,
            ))?;
            group_refs.push(TocEntry::Reference(ReferenceEntry::new(
                prefix.clone(),
                prefix_path,
                Some(group_title),
            )));
        }

        let mut root = FolderEntry::new(
            opts.files_name.clone(),
            files_path,
            group_refs,
            Some(opts.files_title.clone()),
        );
        if let Some(tag) = &opts.source_tag {
            root = root.with_source(tag.clone());
        }
        sink.write(&IndexDocument::new(vec![opts.files_name.clone()], root.clone()))?;

        info!(
            groups = groups.len(),
            records = records.len() - duplicates.len(),
            "Emitted flat identifier index"
        );
        Ok(GroupedIndex {
            root,
            groups: groups.len(),
            duplicates,
        })
    }

    fn write_record_page(
        &self,
        prefix: &str,
        suffix: &str,
        path: &str,
        record: &Record,
        sink: &mut dyn DocumentSink,
    ) -> Result<(), StorageError> {
        let opts = self.options;
        let listing = listing_for(record, &opts.listing);
        let children = match &opts.leaf_folder {
            Some(folder) => vec![TocEntry::Folder(FolderEntry::new(
                folder.clone(),
                join_path(path, folder),
                listing,
                None,
            ))],
            None => listing,
        };
        let body = FolderEntry::new(suffix, path, children, None);
        sink.write(&IndexDocument::new(
            vec![opts.files_name.clone(), prefix.to_string(), suffix.to_string()],
            body,
        ))
    }
}
