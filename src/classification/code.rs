//! Classification code normalization and boundary arithmetic.
//!
//! Codes are segmented at fixed boundary lengths. Incomplete codes are padded
//! with [`PLACEHOLDER`] so every comparison happens on full-length values, and
//! [`collapsed_prefix`] folds padding so that `L01XX` and `L01X` group together.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix lengths at which a code denotes a category level, coarse to fine.
pub const BOUNDARIES: [usize; 5] = [1, 3, 4, 5, 7];

/// Length of every normalized code (the finest boundary).
pub const CODE_LENGTH: usize = 7;

/// Padding character for unspecified positions.
pub const PLACEHOLDER: char = 'X';

/// Prefix assigned to records with a missing or unparseable code.
pub const UNCATEGORIZED: &str = "Z00";

/// A normalized, fixed-length classification code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationCode(String);

impl ClassificationCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the reserved uncategorized bucket.
    pub fn is_uncategorized(&self) -> bool {
        self.0
            .strip_prefix(UNCATEGORIZED)
            .is_some_and(|rest| rest.chars().all(|c| c == PLACEHOLDER))
    }
}

impl fmt::Display for ClassificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClassificationCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalize a raw code to [`CODE_LENGTH`] characters.
///
/// Empty input, or input containing anything other than ASCII letters and
/// digits, lands in the [`UNCATEGORIZED`] bucket. Longer input is truncated.
pub fn normalize(raw: &str) -> ClassificationCode {
    let trimmed = raw.trim();
    let valid = !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_alphanumeric());
    let base = if valid {
        trimmed.to_ascii_uppercase()
    } else {
        UNCATEGORIZED.to_string()
    };

    let mut code: String = base.chars().take(CODE_LENGTH).collect();
    while code.len() < CODE_LENGTH {
        code.push(PLACEHOLDER);
    }
    ClassificationCode(code)
}

/// First `length` characters of `code` with trailing padding folded to one
/// placeholder. An all-placeholder (or zero-length) prefix yields `"X"`.
pub fn collapsed_prefix(code: &str, length: usize) -> String {
    let prefix: String = code.chars().take(length).collect();
    let base = prefix.trim_end_matches(PLACEHOLDER);
    if base.is_empty() {
        return PLACEHOLDER.to_string();
    }
    if base.len() < prefix.len() {
        let mut collapsed = base.to_string();
        collapsed.push(PLACEHOLDER);
        return collapsed;
    }
    prefix
}

/// The first boundary after `current` that changes the collapsed prefix.
///
/// `None` means the code cannot be subdivided any further.
pub fn next_meaningful_level(code: &str, current: usize) -> Option<usize> {
    let current_prefix = collapsed_prefix(code, current);
    BOUNDARIES
        .iter()
        .copied()
        .filter(|&level| level > current)
        .find(|&level| collapsed_prefix(code, level) != current_prefix)
}
