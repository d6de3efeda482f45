//! Downloading catalog index files.

use std::time::Duration;

use thiserror::Error;

/// Timeout for fetching one catalog's index file.
pub const INDEX_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timed out after {}s", INDEX_TIMEOUT.as_secs())]
    Timeout,
    #[error("HTTP {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(e)
        }
    }
}

/// Build the HTTP client used for index downloads.
pub fn index_client() -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .timeout(INDEX_TIMEOUT)
        .build()
}

/// Fetch an index file and return its body as text.
pub fn fetch_index(client: &reqwest::blocking::Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    Ok(response.text()?)
}
