//! Filesystem-safe names for downloaded files.

use unicode_normalization::UnicodeNormalization;

/// Name used when nothing usable survives sanitizing.
pub const PLACEHOLDER_NAME: &str = "downloaded_file";

/// Turn arbitrary text into a safe file name.
///
/// # Steps
/// - NFKD-normalize and drop every non-ASCII code point (`"Café"` → `"Cafe"`).
/// - Replace anything other than ASCII word characters, whitespace, `.` and
///   `-` with `_`.
/// - Trim surrounding whitespace.
/// - Collapse runs of whitespace and `_` into a single `_`.
/// - Fall back to [`PLACEHOLDER_NAME`] for empty, `.` and `..` results.
pub fn sanitize_filename(text: &str) -> String {
    let mapped: String = text
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-' || c.is_whitespace() {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut out = String::with_capacity(mapped.len());
    let mut in_run = false;
    for c in mapped.trim().chars() {
        if c == '_' || c.is_whitespace() {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }

    if out.is_empty() || out == "." || out == ".." {
        return PLACEHOLDER_NAME.to_string();
    }
    out
}
