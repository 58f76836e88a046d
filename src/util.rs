// src/util.rs — Shared utility functions

/// Return the first `max_chars` characters of `s`.
///
/// Counts Unicode scalar values, not bytes, so the cut always lands on a
/// character boundary. No word-boundary awareness.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

/// Make a string safe for use inside a `Content-Disposition` filename.
///
/// Whitespace becomes `_`; anything outside `[A-Za-z0-9._-]` is dropped.
pub fn sanitize_filename(s: &str) -> String {
    s.chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}
