//! Classification codes and their labels.

pub mod code;
pub mod names;

pub use code::{
    collapsed_prefix, next_meaningful_level, normalize, ClassificationCode, BOUNDARIES,
    CODE_LENGTH, PLACEHOLDER, UNCATEGORIZED,
};
pub use names::{common_leading_words, ClassificationDictionary, NameResolver, UNKNOWN_LABEL};
