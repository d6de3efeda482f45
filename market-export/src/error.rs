use std::path::PathBuf;

/// Why a row's link could not be turned into a downloadable URL.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Discord link found but no bot token is configured")]
    MissingCredential,

    #[error("Could not parse Discord link: {0}")]
    InvalidChatLink(String),

    #[error("Discord API request timed out")]
    Timeout,

    #[error("Discord API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Discord API request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Discord API returned an unexpected payload: {0}")]
    MalformedPayload(String),

    #[error("Discord message has no attachments")]
    NoAttachments,

    #[error("Discord message attachments have no download URL")]
    NoAttachmentUrl,

    #[error("Could not extract a file id from Google Drive link: {0}")]
    NoDriveId(String),
}

/// Why a resolved URL could not be saved to disk.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("download timed out")]
    Timeout,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors reading an `.xlsx` workbook.
#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Not a valid xlsx archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error in {part}: {source}")]
    Xml {
        part: String,
        source: quick_xml::Error,
    },

    #[error("Workbook has no worksheets")]
    NoSheets,

    #[error("Invalid cell reference '{0}'")]
    CellRef(String),
}

/// Fatal errors that abort an export run.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Input file not found: {}", .0.display())]
    InputMissing(PathBuf),

    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] WorkbookError),

    #[error("Could not create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not write output file {}: {source}", .path.display())]
    Output { path: PathBuf, source: csv::Error },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors loading the credentials config file.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid credentials file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
