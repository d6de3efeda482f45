//! Saving a resolved URL to the download directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use percent_encoding::percent_decode_str;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderMap};

use crate::content_disposition::filename_from_header;
use crate::error::DownloadError;
use crate::sanitize::{PLACEHOLDER_NAME, sanitize_filename};

/// Timeout for a single file download.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Which candidate supplied the saved file's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    Header,
    UrlPath,
    Preferred,
}

impl std::fmt::Display for NameSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::UrlPath => write!(f, "URL path"),
            Self::Preferred => write!(f, "preferred name"),
        }
    }
}

/// A file written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub path: PathBuf,
    pub bytes: u64,
    pub name_source: NameSource,
}

/// Build the HTTP client used for file downloads.
pub fn download_client() -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
}

/// Download `url` into `dir`, overwriting any existing file of the same name.
///
/// The body is streamed straight to disk. `preferred` is the fallback name
/// used when neither the response headers nor the URL supply one.
pub fn download_file(
    client: &reqwest::blocking::Client,
    url: &str,
    dir: &Path,
    preferred: Option<&str>,
) -> Result<DownloadedFile, DownloadError> {
    let mut response = client.get(url).send().map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status(status.as_u16()));
    }

    let (name, name_source) = choose_filename(response.headers(), url, preferred);
    log::debug!("Saving as '{}' (name from {})", name, name_source);

    fs::create_dir_all(dir).map_err(|e| DownloadError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let path = dir.join(&name);
    let mut file = fs::File::create(&path).map_err(|e| DownloadError::Io {
        path: path.clone(),
        source: e,
    })?;

    let bytes = match io::copy(&mut response, &mut file) {
        Ok(n) => n,
        Err(e) => {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(copy_error(e, path));
        }
    };

    Ok(DownloadedFile {
        path,
        bytes,
        name_source,
    })
}

/// Pick the file name from, in order: the `Content-Disposition` header, the
/// last URL path segment, the preferred name. The result is always sanitized.
pub fn choose_filename(
    headers: &HeaderMap,
    url: &str,
    preferred: Option<&str>,
) -> (String, NameSource) {
    // Header bytes may be raw UTF-8, which `to_str` rejects.
    let from_header = headers
        .get(CONTENT_DISPOSITION)
        .and_then(|v| filename_from_header(&String::from_utf8_lossy(v.as_bytes())));
    if let Some(name) = from_header {
        return (sanitize_filename(&name), NameSource::Header);
    }

    if let Some(name) = last_path_segment(url) {
        return (sanitize_filename(&name), NameSource::UrlPath);
    }

    let mut name = match preferred.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => sanitize_filename(p),
        None => PLACEHOLDER_NAME.to_string(),
    };
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();
    if !name.contains('.') && content_type.contains("zip") {
        name.push_str(".zip");
    }
    (name, NameSource::Preferred)
}

/// Last non-empty path segment of `url`, percent-decoded.
fn last_path_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    if segment.is_empty() {
        return None;
    }
    Some(percent_decode_str(segment).decode_utf8_lossy().into_owned())
}

/// Body read failures carry the reqwest error inside the `io::Error`;
/// anything else came from writing the local file.
fn copy_error(e: io::Error, path: PathBuf) -> DownloadError {
    match e.downcast::<reqwest::Error>() {
        Ok(req) => request_error(req),
        Err(e) if e.kind() == io::ErrorKind::TimedOut => DownloadError::Timeout,
        Err(e) => DownloadError::Io { path, source: e },
    }
}

fn request_error(e: reqwest::Error) -> DownloadError {
    if e.is_timeout() {
        DownloadError::Timeout
    } else {
        DownloadError::Network(e)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn headers(pairs: &[(reqwest::header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn header_name_wins() {
        let h = headers(&[(CONTENT_DISPOSITION, "attachment; filename=\"Ms Pac.zip\"")]);
        let (name, source) = choose_filename(&h, "https://x/files/other.zip", Some("Label"));
        assert_eq!(name, "Ms_Pac.zip");
        assert_eq!(source, NameSource::Header);
    }

    #[test]
    fn utf8_header_name_is_not_skipped() {
        let mut h = HeaderMap::new();
        h.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_bytes("attachment; filename=\"Café.zip\"".as_bytes()).unwrap(),
        );
        let (name, source) = choose_filename(&h, "https://x/files/other.zip", None);
        assert_eq!(name, "Cafe.zip");
        assert_eq!(source, NameSource::Header);
    }

    #[test]
    fn local_write_failure_is_an_io_error() {
        let err = copy_error(
            io::Error::new(io::ErrorKind::StorageFull, "disk full"),
            PathBuf::from("dl/galaga.zip"),
        );
        assert!(matches!(err, DownloadError::Io { ref path, .. } if path == Path::new("dl/galaga.zip")));
    }

    #[test]
    fn url_segment_is_decoded_and_sanitized() {
        let (name, source) =
            choose_filename(&HeaderMap::new(), "https://x/files/Ms%20Pac%20Man.zip?dl=1", None);
        assert_eq!(name, "Ms_Pac_Man.zip");
        assert_eq!(source, NameSource::UrlPath);
    }

    #[test]
    fn trailing_slash_falls_back_to_preferred() {
        let h = headers(&[(CONTENT_TYPE, "application/zip")]);
        let (name, source) = choose_filename(&h, "https://x/", Some("Galaga Deluxe"));
        assert_eq!(name, "Galaga_Deluxe.zip");
        assert_eq!(source, NameSource::Preferred);
    }

    #[test]
    fn preferred_name_keeps_existing_extension() {
        let h = headers(&[(CONTENT_TYPE, "application/x-zip-compressed")]);
        let (name, _) = choose_filename(&h, "https://x/", Some("galaga.7z"));
        assert_eq!(name, "galaga.7z");
    }

    #[test]
    fn no_zip_suffix_for_other_content_types() {
        let h = headers(&[(CONTENT_TYPE, "application/octet-stream")]);
        let (name, _) = choose_filename(&h, "https://x/", Some("galaga"));
        assert_eq!(name, "galaga");
    }

    #[test]
    fn missing_preferred_uses_placeholder() {
        let (name, source) = choose_filename(&HeaderMap::new(), "https://x/", None);
        assert_eq!(name, PLACEHOLDER_NAME);
        assert_eq!(source, NameSource::Preferred);
    }
}
