//! Shared fixtures.

use std::collections::BTreeMap;
use std::sync::Arc;
use tocbuild::classification::{ClassificationDictionary, NameResolver};
use tocbuild::toc::entry::{FolderEntry, TocEntry};
use tocbuild::toc::sink::MemorySink;
use tocbuild::{Record, SubItem};

pub fn dictionary() -> ClassificationDictionary {
    ClassificationDictionary::new()
        .with("A", "Alimentary tract and metabolism")
        .with("L", "Antineoplastic and immunomodulating agents")
        .with("A10", "Drugs used in diabetes")
        .with("L01", "Antineoplastic agents")
        .with("L04", "Immunosuppressants")
        .with("L01F", "Monoclonal antibodies and antibody drug conjugates")
        .with("L01X", "Other antineoplastic agents")
        .with("L01FA", "CD20 (Clusters of Differentiation 20) inhibitors")
        .with("L01FF", "PD-1/PDL-1 (Programmed cell death protein 1/death ligand 1) inhibitors")
        .with("L01XE", "Protein kinase inhibitors")
}

pub fn resolver() -> NameResolver {
    NameResolver::new(Arc::new(dictionary()))
}

pub fn record(id: &str, name: &str, code: &str) -> Arc<Record> {
    Arc::new(Record::new(id, name, code).with_subitems(vec![
        SubItem::new(
            format!("https://example.org/{}/epar.pdf", name.to_lowercase()),
            format!("{} : EPAR - Public assessment report", name),
            chrono::NaiveDate::from_ymd_opt(2020, 5, 4),
        ),
        SubItem::new(
            format!("https://example.org/{}/pi.pdf", name.to_lowercase()),
            format!("{} : EPAR - Product information", name),
            chrono::NaiveDate::from_ymd_opt(2019, 1, 2),
        ),
    ]))
}

/// A catalog deep enough to produce pages at depths 2 and 4.
pub fn sample_records() -> Vec<Arc<Record>> {
    vec![
        record("EMEA/H/C/000165", "MabThera", "L01FA01"),
        record("EMEA/H/C/004723", "Ruxience", "L01FA01"),
        record("EMEA/H/C/002799", "Gazyvaro", "L01FA03"),
        record("EMEA/H/C/003820", "Opdivo", "L01FF01"),
        record("EMEA/H/C/003985", "Keytruda", "L01FF02"),
        record("EMEA/H/C/000406", "Glivec", "L01XE01"),
        record("EMEA/H/C/000539", "Velcade", "L01XG01"),
        record("EMEA/H/C/004076", "Bortezomib Sun", "L01XG01"),
        record("EMEA/H/C/000477", "Rapamune", "L04AA10"),
        record("EMEA/H/C/000046", "Insuman", "A10AB01"),
        record("EMEA/H/C/000336", "Glucobay", "A10BF01"),
        record("EMEA/H/C/000910", "Antiviral", "J05"),
        record("EMEA/H/C/001111", "Mystery", ""),
    ]
}

/// Replace every `$ref` with the page it points at.
pub fn resolve_references(folder: &FolderEntry, sink: &MemorySink) -> FolderEntry {
    let mut resolved = folder.clone();
    resolved.children = folder
        .children
        .iter()
        .map(|child| match child {
            TocEntry::Reference(reference) => {
                let page = sink
                    .get(&reference.reference)
                    .unwrap_or_else(|| panic!("dangling $ref {}", reference.reference));
                TocEntry::Folder(resolve_references(page, sink))
            }
            TocEntry::Folder(inner) => TocEntry::Folder(resolve_references(inner, sink)),
            TocEntry::Document(doc) => TocEntry::Document(doc.clone()),
        })
        .collect();
    resolved
}

/// Number of `$ref` entries pointing at each page.
pub fn incoming_references(sink: &MemorySink) -> BTreeMap<String, usize> {
    fn walk(folder: &FolderEntry, counts: &mut BTreeMap<String, usize>) {
        for child in &folder.children {
            match child {
                TocEntry::Reference(r) => *counts.entry(r.reference.clone()).or_default() += 1,
                TocEntry::Folder(inner) => walk(inner, counts),
                TocEntry::Document(_) => {}
            }
        }
    }
    let mut counts = BTreeMap::new();
    for document in sink.documents.values() {
        walk(&document.body, &mut counts);
    }
    counts
}
