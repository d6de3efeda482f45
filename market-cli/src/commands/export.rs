use std::path::PathBuf;

use market_export::{ChatCredentials, ExportContext, ExportOptions};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::log_heading;

/// Download every linked cabinet in a spreadsheet and write the TSV index.
pub(crate) fn run_export(
    input: PathBuf,
    output: PathBuf,
    download_dir: PathBuf,
    discord_token: Option<&str>,
) -> Result<(), CliError> {
    let (credentials, source) =
        ChatCredentials::load(discord_token).map_err(|e| CliError::config(e.to_string()))?;
    match &credentials {
        Some(creds) => log::debug!("Discord token {} from {}", creds.masked(), source),
        None => log::warn!(
            "No Discord bot token set (--discord-token, ${} or {}); Discord links will be skipped",
            market_export::TOKEN_ENV_VAR,
            market_export::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "credentials.toml".to_string()),
        ),
    }

    let ctx = ExportContext::new(credentials, download_dir)
        .map_err(|e| CliError::http(e.to_string()))?;
    let options = ExportOptions { input, output };

    let summary =
        market_export::run_export(&options, &ctx).map_err(|e| CliError::export(e.to_string()))?;

    crate::log_blank();
    log_heading("Export Summary");
    log::info!("  Rows processed: {:>8}", summary.processed);
    log::info!(
        "  Written:        {:>8}",
        summary.written.if_supports_color(Stdout, |t| t.green()),
    );
    log::info!("  Skipped:        {:>8}", summary.skipped());
    log::info!("    Empty rows:   {:>8}", summary.skipped_empty);
    log::info!("    No link:      {:>8}", summary.skipped_no_link);
    if summary.failed > 0 {
        log::info!(
            "    Failed:       {:>8}",
            summary.failed.if_supports_color(Stdout, |t| t.yellow()),
        );
    } else {
        log::info!("    Failed:       {:>8}", summary.failed);
    }
    crate::log_blank();
    log::info!(
        "Index written to {}",
        options.output.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_spreadsheet_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_export(
            dir.path().join("absent.xlsx"),
            dir.path().join("out.tsv"),
            dir.path().join("dl"),
            Some("flag-token"),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Export(_)));
        assert!(!dir.path().join("out.tsv").exists());
    }
}
