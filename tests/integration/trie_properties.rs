use crate::integration::support::{resolve_references, resolver};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use tocbuild::classification::{collapsed_prefix, normalize, CODE_LENGTH};
use tocbuild::toc::emitter::{render_inline, ClassificationEmitter, ViewOptions};
use tocbuild::toc::sink::MemorySink;
use tocbuild::tree::builder::build_trie;
use tocbuild::tree::node::{count_leaves, visit_directories};
use tocbuild::Record;

fn code_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => "[ALJ][0-9]{2}[A-C]{0,2}[0-9]{0,2}",
        1 => "[A-Z]{0,3}",
        1 => Just(String::new()),
        1 => "[a-z0-9 /-]{1,8}",
    ]
}

fn records_strategy() -> impl Strategy<Value = Vec<Arc<Record>>> {
    prop::collection::vec((code_strategy(), "[A-Z][a-z]{1,6}( [A-Z][a-z]{1,6})?"), 0..40).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (code, name))| {
                    Arc::new(Record::new(format!("ID/{:04}", i), name, code))
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn normalize_is_total_and_idempotent(raw in "\\PC{0,12}") {
        let code = normalize(&raw);
        prop_assert_eq!(code.as_str().chars().count(), CODE_LENGTH);
        prop_assert_eq!(normalize(code.as_str()), code.clone());
        for length in 0..=CODE_LENGTH {
            prop_assert!(!collapsed_prefix(code.as_str(), length).is_empty());
        }
    }

    #[test]
    fn every_record_lands_in_exactly_one_leaf(records in records_strategy()) {
        let trie = build_trie(&resolver(), &records);
        prop_assert!(trie.collisions.is_empty(), "{:?}", trie.collisions);
        prop_assert_eq!(count_leaves(&trie.forest), records.len());

        let ids: BTreeSet<String> = trie
            .forest
            .values()
            .flat_map(|node| node.records())
            .map(|record| record.id.clone())
            .collect();
        prop_assert_eq!(ids.len(), records.len());
    }

    #[test]
    fn directories_have_at_least_two_children(records in records_strategy()) {
        let trie = build_trie(&resolver(), &records);
        let mut small = Vec::new();
        visit_directories(&trie.forest, &mut |_, name, dir| {
            if dir.children.len() < 2 {
                small.push(name.to_string());
            }
        });
        prop_assert!(small.is_empty(), "{:?}", small);
    }

    #[test]
    fn pages_resolve_back_to_inline_tree(
        records in records_strategy(),
        depths in prop::collection::btree_set(1usize..6, 0..3),
    ) {
        let trie = build_trie(&resolver(), &records);
        let options = ViewOptions {
            page_depths: depths.into_iter().collect(),
            source_tag: Some("tocbuild".to_string()),
            ..ViewOptions::default()
        };
        let mut sink = MemorySink::new();
        let root = ClassificationEmitter::new(&options)
            .emit(&trie.forest, &mut sink)
            .unwrap();
        prop_assert_eq!(resolve_references(&root, &sink), render_inline(&trie.forest, &options));
    }
}
