//! Human-readable labels for classification codes.

use super::code::PLACEHOLDER;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Label used when neither the dictionary nor member names yield anything.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Three-tier prefix dictionary.
///
/// `coarse` is keyed by 1-character codes, `mid` by 3-character codes and
/// `fine` by anything from 4 characters up to a full code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationDictionary {
    #[serde(default)]
    pub coarse: HashMap<String, String>,
    #[serde(default)]
    pub mid: HashMap<String, String>,
    #[serde(default)]
    pub fine: HashMap<String, String>,
}

impl ClassificationDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a label, choosing the tier from the key length.
    pub fn insert(&mut self, code: impl Into<String>, label: impl Into<String>) {
        let code = code.into();
        let table = match code.len() {
            0 | 1 => &mut self.coarse,
            2 | 3 => &mut self.mid,
            _ => &mut self.fine,
        };
        table.insert(code, label.into());
    }

    pub fn with(mut self, code: impl Into<String>, label: impl Into<String>) -> Self {
        self.insert(code, label);
        self
    }

    pub fn len(&self) -> usize {
        self.coarse.len() + self.mid.len() + self.fine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves codes and collapsed prefixes against an injected dictionary.
#[derive(Debug, Clone)]
pub struct NameResolver {
    dictionary: Arc<ClassificationDictionary>,
}

impl NameResolver {
    pub fn new(dictionary: Arc<ClassificationDictionary>) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &ClassificationDictionary {
        &self.dictionary
    }

    /// Dictionary-only lookup.
    ///
    /// Tries the fine table with the code and its 5- and 4-character prefixes,
    /// first verbatim and then with trailing placeholders stripped, before
    /// falling back to the mid and coarse tiers.
    pub fn lookup(&self, code: &str) -> Option<String> {
        let fine = &self.dictionary.fine;
        let stripped = code.trim_end_matches(PLACEHOLDER);

        for candidate in [code, stripped] {
            for length in [candidate.len(), 5, 4] {
                let prefix = candidate.get(..length).unwrap_or(candidate);
                if let Some(label) = fine.get(prefix) {
                    return Some(label.clone());
                }
            }
        }

        if let Some(label) = stripped.get(..3).and_then(|p| self.dictionary.mid.get(p)) {
            return Some(label.clone());
        }
        stripped
            .get(..1)
            .and_then(|p| self.dictionary.coarse.get(p))
            .cloned()
    }

    /// Total resolution: dictionary label or [`UNKNOWN_LABEL`].
    pub fn resolve(&self, code: &str) -> String {
        self.lookup(code).unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }

    /// Label for a directory of several records that share one exact code.
    ///
    /// When the dictionary has nothing more specific for the code than for its
    /// 5-character parent, the common leading words of the member names are
    /// used instead (e.g. "Bortezomib Sun" + "Bortezomib Hospira" -> "Bortezomib").
    pub fn resolve_shared<S: AsRef<str>>(&self, code: &str, member_names: &[S]) -> String {
        let label = self.resolve(code);
        let parent_label = code.get(..5).map(|parent| self.resolve(parent));
        if parent_label.as_deref() == Some(label.as_str()) {
            if let Some(common) = common_leading_words(member_names) {
                return common;
            }
        }
        label
    }
}

/// Longest run of whole leading words shared by every name.
///
/// Words compare case-insensitively; casing is taken from the first name.
/// Requires at least two names.
pub fn common_leading_words<S: AsRef<str>>(names: &[S]) -> Option<String> {
    if names.len() < 2 {
        return None;
    }
    let split: Vec<Vec<&str>> = names
        .iter()
        .map(|name| name.as_ref().split_whitespace().collect())
        .collect();
    let first = &split[0];

    let common_len = (0..first.len())
        .take_while(|&i| {
            let word = first[i].to_lowercase();
            split[1..]
                .iter()
                .all(|words| words.get(i).is_some_and(|w| w.to_lowercase() == word))
        })
        .count();

    if common_len == 0 {
        return None;
    }
    Some(first[..common_len].join(" "))
}
