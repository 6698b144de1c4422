//! Filesystem- and URL-path-safe folder names.

use unicode_normalization::UnicodeNormalization;

/// Replacement for reserved path characters.
pub const SAFE_SEPARATOR: char = '-';

const RESERVED: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Escape a human-supplied name for use as one path segment.
///
/// `EMEA/H/C/005824` becomes `EMEA-H-C-005824`. Deterministic; two inputs that
/// differ only in reserved characters can still collide.
pub fn escape_for_path(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;

    for c in name.nfc() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        if RESERVED.contains(&c) || c.is_control() {
            out.push(SAFE_SEPARATOR);
        } else {
            out.push(c);
        }
    }

    let trimmed = out.trim_matches(|c: char| c == '.' || c == ' ');
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}
