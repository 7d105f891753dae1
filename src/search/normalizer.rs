use unicode_normalization::UnicodeNormalization;

/// Lowercase, then NFKC.
///
/// Folds case and full-width/half-width variants onto the same form, so
/// `"Ａ"`, `"A"` and `"a"` all compare equal afterwards.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().nfkc().collect()
}

/// Drops every whitespace character.
pub fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
