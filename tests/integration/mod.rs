//! Integration tests for tocbuild

mod cli_contracts;
mod pagination_consistency;
mod support;
mod trie_properties;
