//! Google Drive share links.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ResolveError;

static DRIVE_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:/d/|id=)([a-zA-Z0-9_-]{25,})").unwrap());

/// Whether a URL points at Google Drive.
pub fn is_drive_link(url: &str) -> bool {
    url.contains("drive.google.com")
}

/// Rewrite a share link into a direct download link.
pub fn direct_download_url(url: &str) -> Result<String, ResolveError> {
    let id = DRIVE_ID_REGEX
        .captures(url)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| ResolveError::NoDriveId(url.to_string()))?;
    Ok(format!(
        "https://drive.google.com/uc?export=download&id={}",
        id
    ))
}
