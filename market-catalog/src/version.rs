//! Release tag parsing.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    #[error("Release tag '{0}' has no major version component")]
    NoMajorVersion(String),
}

/// Reduce a release tag to its major version component.
///
/// A single leading `v`/`V` is stripped and everything from the first `.`
/// on is dropped: `"v2.3.1"` becomes `"2"`, `"10"` stays `"10"`.
pub fn major_version(tag: &str) -> Result<String, TagError> {
    let trimmed = tag.trim();
    let without_prefix = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    let major = without_prefix.split('.').next().unwrap_or("").trim();

    if major.is_empty() {
        return Err(TagError::NoMajorVersion(tag.to_string()));
    }
    Ok(major.to_string())
}
