//! Classification trie.

pub mod builder;
pub mod node;

pub use builder::{build_trie, NameCollision, TrieBuild, TrieBuilder};
pub use node::{count_leaves, visit_directories, DirectoryNode, Forest, LeafNode, TrieNode};
