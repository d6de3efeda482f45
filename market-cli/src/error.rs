use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Catalog YAML, release tag or credentials problem
    #[error("Config error: {0}")]
    Config(String),

    /// HTTP client setup failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// Spreadsheet export failed
    #[error("Export error: {0}")]
    Export(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub(crate) fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
