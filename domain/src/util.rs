//! Shared utility functions.

use serde::{Deserialize, Deserializer};

/// Truncate to at most `max_chars` characters, appending `...` when cut.
///
/// Counts characters rather than bytes, so multi-byte text never splits.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &s[..end]),
        None => s.to_string(),
    }
}

/// Lowercase `s` and replace each whitespace run with `sep`.
pub fn slugify(s: &str, sep: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(sep)
}

/// Serde helper: read `null` as the type's default.
///
/// Used on required-but-user-supplied fields so a `null` reaches
/// validation as "missing" instead of failing deserialization.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
