//! Character-based text helpers.
//!
//! Lengths here are counted in `char`s so multi-byte letters are never split.

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The first `n` characters of `s`.
pub fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Fit `s` into `max` characters, replacing the tail with [`ELLIPSIS`] when
/// it does not fit.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if char_len(s) <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(char_len(ELLIPSIS));
    format!("{}{}", take_chars(s, keep).trim_end(), ELLIPSIS)
}
