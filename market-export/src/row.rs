use std::path::PathBuf;

use crate::credentials::ChatCredentials;
use crate::discord::DiscordClient;
use crate::download::{download_client, download_file};
use crate::error::{DownloadError, ExportError, ResolveError};
use crate::record::{InputRecord, OutputRecord};
use crate::resolve::LinkResolver;

/// What processing one spreadsheet row produced.
#[derive(Debug)]
pub enum RowOutcome {
    Written(OutputRecord),
    NoLink,
    ResolveFailed(ResolveError),
    DownloadFailed(DownloadError),
}

/// Everything a row needs to resolve and download its file.
pub struct ExportContext {
    pub resolver: LinkResolver,
    pub http: reqwest::blocking::Client,
    pub download_dir: PathBuf,
}

impl ExportContext {
    /// Context talking to the real Discord API.
    pub fn new(
        credentials: Option<ChatCredentials>,
        download_dir: PathBuf,
    ) -> Result<Self, ExportError> {
        Ok(Self {
            resolver: LinkResolver::new(DiscordClient::new(credentials)?),
            http: download_client()?,
            download_dir,
        })
    }
}

/// Resolve, download and index one row. Failures are returned as values and
/// logged with the row number; nothing here aborts the run.
pub fn process_row(ctx: &ExportContext, record: &InputRecord) -> RowOutcome {
    let row = record.row;
    let Some(link) = record.link.as_deref() else {
        log::info!("Skipping row {}: No hyperlink found in column A.", row);
        return RowOutcome::NoLink;
    };

    let resolved = match ctx.resolver.resolve(link) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("Skipping row {}: {} ({})", row, e, link);
            return RowOutcome::ResolveFailed(e);
        }
    };
    if resolved.url != link {
        log::info!("Row {}: {} link resolved to {}", row, resolved.kind, resolved.url);
    }

    log::info!("Row {}: Downloading {}", row, resolved.url);
    let file = match download_file(
        &ctx.http,
        &resolved.url,
        &ctx.download_dir,
        record.label.as_deref(),
    ) {
        Ok(f) => f,
        Err(e) => {
            log::warn!("Skipping row {}: Download failed for {}: {}", row, resolved.url, e);
            return RowOutcome::DownloadFailed(e);
        }
    };
    log::info!(
        "Row {}:   -> Saved {} ({} bytes, name from {})",
        row,
        file.path.display(),
        file.bytes,
        file.name_source
    );

    RowOutcome::Written(OutputRecord::from_input(record, &resolved.url))
}
