//! Driving an export from workbook to index.

use std::path::PathBuf;

use crate::error::ExportError;
use crate::record::InputRecord;
use crate::row::{ExportContext, RowOutcome, process_row};
use crate::tsv::IndexWriter;
use crate::xlsx::Workbook;

/// Paths for one export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Row counts for a finished export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Sheet rows after the header, blank ones included.
    pub processed: usize,
    pub written: usize,
    pub skipped_empty: usize,
    pub skipped_no_link: usize,
    /// Resolve and download failures together.
    pub failed: usize,
}

impl ExportSummary {
    pub fn skipped(&self) -> usize {
        self.skipped_empty + self.skipped_no_link + self.failed
    }

    fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Written(_) => self.written += 1,
            RowOutcome::NoLink => self.skipped_no_link += 1,
            RowOutcome::ResolveFailed(_) | RowOutcome::DownloadFailed(_) => self.failed += 1,
        }
    }
}

/// Export every row of the first sheet of `options.input`.
///
/// Files are saved to `ctx.download_dir`; rows whose file was saved are
/// written to `options.output`. Only workbook, directory and output-file
/// failures are errors.
pub fn run_export(options: &ExportOptions, ctx: &ExportContext) -> Result<ExportSummary, ExportError> {
    if !options.input.exists() {
        return Err(ExportError::InputMissing(options.input.clone()));
    }

    log::info!("Loading workbook '{}'...", options.input.display());
    let sheet = Workbook::open(&options.input)?.read_first_sheet()?;

    std::fs::create_dir_all(&ctx.download_dir).map_err(|e| ExportError::CreateDir {
        path: ctx.download_dir.clone(),
        source: e,
    })?;
    log::info!("Files will be downloaded to: '{}'", ctx.download_dir.display());

    let output_error = |e: csv::Error| ExportError::Output {
        path: options.output.clone(),
        source: e,
    };
    let mut writer = IndexWriter::create(&options.output).map_err(output_error)?;
    log::info!("Writing TSV index to '{}'...", options.output.display());

    let mut summary = ExportSummary::default();
    for row in 2..=sheet.max_row() {
        summary.processed += 1;
        if sheet.row_is_blank(row) {
            log::info!("Skipping empty row {}.", row);
            summary.skipped_empty += 1;
            continue;
        }

        let record = InputRecord::from_sheet(&sheet, row);
        let outcome = process_row(ctx, &record);
        if let RowOutcome::Written(ref out) = outcome {
            writer.write(out).map_err(output_error)?;
        }
        summary.record(&outcome);
    }

    writer
        .flush()
        .map_err(|e| output_error(csv::Error::from(e)))?;
    Ok(summary)
}
