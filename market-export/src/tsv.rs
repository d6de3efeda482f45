//! The tab-separated output index.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::record::OutputRecord;

fn builder() -> csv::WriterBuilder {
    let mut b = csv::WriterBuilder::new();
    b.delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::CRLF)
        .has_headers(false);
    b
}

/// Writes [`OutputRecord`]s as header-less TSV lines.
pub struct IndexWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl IndexWriter<File> {
    /// Create (or truncate) the index file at `path`.
    pub fn create(path: &Path) -> Result<Self, csv::Error> {
        Ok(Self {
            writer: builder().from_path(path)?,
        })
    }
}

impl<W: Write> IndexWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: builder().from_writer(inner),
        }
    }

    pub fn write(&mut self, record: &OutputRecord) -> Result<(), csv::Error> {
        self.writer.serialize(record)
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, csv::Error> {
        self.writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))
    }
}
