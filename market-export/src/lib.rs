//! Export core for the cabinet marketplace.
//!
//! Reads a spreadsheet of cabinet links, resolves Discord and Google Drive
//! links into direct downloads, saves each file, and writes a tab-separated
//! index of the rows whose file was saved.

pub mod content_disposition;
pub mod credentials;
pub mod discord;
pub mod download;
pub mod drive;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod resolve;
pub mod row;
pub mod sanitize;
pub mod tsv;
pub mod xlsx;

pub use credentials::{ChatCredentials, CredentialSource, TOKEN_ENV_VAR, config_path};
pub use discord::{Attachment, ChatLink, DISCORD_API_BASE, DiscordClient, select_attachment};
pub use download::{DOWNLOAD_TIMEOUT, DownloadedFile, NameSource, download_client, download_file};
pub use error::{CredentialError, DownloadError, ExportError, ResolveError, WorkbookError};
pub use pipeline::{ExportOptions, ExportSummary, run_export};
pub use record::{DEFAULT_VERSION, InputRecord, OutputRecord};
pub use resolve::{LinkKind, LinkResolver, ResolvedLink};
pub use row::{ExportContext, RowOutcome, process_row};
pub use sanitize::{PLACEHOLDER_NAME, sanitize_filename};
pub use tsv::IndexWriter;
pub use xlsx::{Cell, Sheet, Workbook};
