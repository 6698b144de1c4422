use crate::integration::support::{
    incoming_references, record, resolve_references, resolver, sample_records,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tocbuild::catalog::Catalog;
use tocbuild::config::CatalogConfig;
use tocbuild::toc::emitter::{render_inline, ClassificationEmitter, ViewOptions};
use tocbuild::toc::entry::TocEntry;
use tocbuild::toc::grouped::{GroupOptions, GroupedEmitter};
use tocbuild::toc::sink::MemorySink;
use tocbuild::tree::builder::build_trie;
use tocbuild::{Record, SubItem};

fn view_options() -> ViewOptions {
    ViewOptions {
        logical_root: "documents/ACC".to_string(),
        source_tag: Some("tocbuild".to_string()),
        ..ViewOptions::default()
    }
}

#[test]
fn resolving_references_reproduces_inline_tree() {
    let trie = build_trie(&resolver(), &sample_records());
    assert!(trie.collisions.is_empty());
    let options = view_options();

    let mut sink = MemorySink::new();
    let root = ClassificationEmitter::new(&options)
        .emit(&trie.forest, &mut sink)
        .unwrap();

    assert_eq!(
        resolve_references(&root, &sink),
        render_inline(&trie.forest, &options)
    );
}

#[test]
fn classification_pages_sit_at_levels_zero_two_and_four() {
    let trie = build_trie(&resolver(), &sample_records());
    let options = view_options();
    let mut sink = MemorySink::new();
    ClassificationEmitter::new(&options)
        .emit(&trie.forest, &mut sink)
        .unwrap();

    let mut depths: Vec<usize> = sink
        .documents
        .values()
        .map(|doc| doc.segments.len() - 1)
        .collect();
    depths.sort_unstable();
    // root, L01, then L01FA, L01FF and the shared L01XG01 directory
    assert_eq!(depths, vec![0, 2, 4, 4, 4]);

    let incoming = incoming_references(&sink);
    for reference in sink.documents.keys() {
        let expected = usize::from(reference != "documents/ACC/By-Code/toc.json");
        assert_eq!(incoming.get(reference).copied().unwrap_or(0), expected, "{}", reference);
    }
}

#[test]
fn top_level_leaves_stay_inline_in_root_page() {
    let trie = build_trie(&resolver(), &sample_records());
    let options = view_options();
    let mut sink = MemorySink::new();
    let root = ClassificationEmitter::new(&options)
        .emit(&trie.forest, &mut sink)
        .unwrap();

    let names: Vec<&str> = root.children.iter().map(TocEntry::name).collect();
    assert_eq!(
        names,
        vec![
            "A10) Drugs used in diabetes",
            "J05XXXX) Antiviral - EMEA-H-C-000910",
            "L) Antineoplastic and immunomodulating agents",
            "Z00XXXX) Mystery - EMEA-H-C-001111",
        ]
    );
    assert!(root.children.iter().all(|c| matches!(c, TocEntry::Folder(_))));
}

#[test]
fn scenario_a_shared_prefix_becomes_one_directory() {
    let records = vec![
        record("EMEA/H/C/003820", "Opdivo", "L01FF01"),
        record("EMEA/H/C/003985", "Keytruda", "L01FF02"),
    ];
    let trie = build_trie(&resolver(), &records);
    assert_eq!(trie.forest.len(), 1);
    let name = trie.forest.keys().next().unwrap();
    assert_eq!(
        name,
        "L01FF) PD-1-PDL-1 (Programmed cell death protein 1-death ligand 1) inhibitors"
    );
    assert_eq!(trie.forest[name].leaf_count(), 2);
}

#[test]
fn scenario_d_single_prefix_group_of_250_records() {
    let records: Vec<Arc<Record>> = (0..250)
        .map(|i| {
            Arc::new(
                Record::new(format!("EMEA/H/C/000{:03}", i), format!("Product {}", i), "A10AB01")
                    .with_subitems(vec![SubItem::new(
                        format!("https://example.org/{}.pdf", i),
                        "Assessment",
                        None,
                    )]),
            )
        })
        .collect();
    let options = GroupOptions {
        logical_root: "documents/ACC".to_string(),
        ..GroupOptions::default()
    };
    let mut sink = MemorySink::new();
    let index = GroupedEmitter::new(&options).emit(&records, &mut sink).unwrap();

    assert_eq!(index.groups, 1);
    assert_eq!(sink.documents.len(), 1 + 1 + 250);

    let top = sink.get("documents/ACC/files/toc.json").unwrap();
    assert_eq!(top.children.len(), 1);
    assert!(top.children.iter().all(|c| matches!(c, TocEntry::Reference(_))));

    let mid = sink.get("documents/ACC/files/EMEA-H-C-000/toc.json").unwrap();
    assert_eq!(mid.title.as_deref(), Some("EMEA/H/C/000XXX"));
    assert_eq!(mid.children.len(), 250);
    assert!(mid.children.iter().all(|c| matches!(c, TocEntry::Reference(_))));

    let leaves = sink
        .documents
        .values()
        .filter(|doc| doc.segments.len() == 3)
        .count();
    assert_eq!(leaves, 250);
}

#[test]
fn catalog_build_counts_every_page_once() {
    let mut config = CatalogConfig::default();
    config.catalog.accession = "ACC".to_string();
    let resolver = resolver();
    let records = sample_records();

    let mut sink = MemorySink::new();
    let summary = Catalog::new(&config, &resolver)
        .assemble(&records, &mut sink)
        .unwrap();

    // files: 1 + 5 prefix groups + 13 records; By-Code: 5 pages
    assert_eq!(summary.prefix_groups, 5);
    assert_eq!(summary.documents_written, 24);
    assert_eq!(sink.documents.len(), 24);
    assert_eq!(summary.subitems, 26);
    assert_eq!(summary.name_collisions, 0);
    assert_eq!(summary.top_level_entries, 4);
}
