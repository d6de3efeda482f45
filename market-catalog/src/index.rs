//! Parsing of per-catalog cabinet index files.
//!
//! An index is comma-delimited with a fixed column order and no required
//! header:
//!
//! ```text
//! Name,Url,Game,CreationDate,Version,RomName,Description,Core,Creator,Notes
//! ```
//!
//! Rows that cannot become a [`Cabinet`] are rejected individually; only a
//! CSV-level failure rejects the whole file.

use std::collections::HashSet;

use thiserror::Error;

use crate::types::Cabinet;

const COL_NAME: usize = 0;
const COL_URL: usize = 1;
const COL_GAME: usize = 2;
const COL_CREATION_DATE: usize = 3;
const COL_VERSION: usize = 4;
const COL_ROM_NAME: usize = 5;
const COL_DESCRIPTION: usize = 6;
const COL_CORE: usize = 7;
const COL_CREATOR: usize = 8;
const COL_NOTES: usize = 9;

/// Name, Url and Game are NOT NULL in the schema, so a row needs at least
/// three columns.
pub const MIN_COLUMNS: usize = COL_GAME + 1;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("CSV error at row {row}: {source}")]
    Csv { row: usize, source: csv::Error },
}

/// Why a single index row was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    TooFewColumns(usize),
    MissingName,
    MissingGame,
    MissingUrl,
    DuplicateName(String),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewColumns(n) => {
                write!(f, "has only {n} columns, expected at least {MIN_COLUMNS}")
            }
            Self::MissingName => write!(f, "required field 'Name' (column 1) is missing or empty"),
            Self::MissingUrl => write!(f, "required field 'Url' (column 2) is missing or empty"),
            Self::MissingGame => write!(f, "required field 'Game' (column 3) is missing or empty"),
            Self::DuplicateName(name) => write!(f, "duplicate Name '{name}' within this index"),
        }
    }
}

/// A row that was rejected, with its 1-based position in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub row: usize,
    pub reason: RejectReason,
}

/// Result of parsing one index file.
#[derive(Debug, Default)]
pub struct ParsedIndex {
    /// Data rows seen (excluding an ignored header row).
    pub rows: usize,
    pub cabinets: Vec<Cabinet>,
    pub rejected: Vec<RejectedRow>,
}

/// Parse the contents of a catalog's index file.
pub fn parse_cabinet_index(catalog_name: &str, content: &str) -> Result<ParsedIndex, IndexError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut parsed = ParsedIndex::default();
    let mut seen: HashSet<String> = HashSet::new();

    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| IndexError::Csv { row, source: e })?;

        if row == 1 && is_header(&record) {
            log::debug!("Ignoring header row in index for '{catalog_name}'");
            continue;
        }
        parsed.rows += 1;

        match parse_row(catalog_name, &record, &mut seen) {
            Ok(cabinet) => parsed.cabinets.push(cabinet),
            Err(reason) => parsed.rejected.push(RejectedRow { row, reason }),
        }
    }

    Ok(parsed)
}

fn parse_row(
    catalog_name: &str,
    record: &csv::StringRecord,
    seen: &mut HashSet<String>,
) -> Result<Cabinet, RejectReason> {
    if record.len() < MIN_COLUMNS {
        return Err(RejectReason::TooFewColumns(record.len()));
    }

    let get = |i: usize| value_or_none(record, i);

    let name = get(COL_NAME).ok_or(RejectReason::MissingName)?;
    let game = get(COL_GAME).ok_or(RejectReason::MissingGame)?;
    let url = get(COL_URL).ok_or(RejectReason::MissingUrl)?;

    if !seen.insert(name.clone()) {
        return Err(RejectReason::DuplicateName(name));
    }

    Ok(Cabinet {
        catalog_name: catalog_name.to_string(),
        name,
        game,
        url,
        creation_date: get(COL_CREATION_DATE),
        version: get(COL_VERSION),
        rom_name: get(COL_ROM_NAME),
        description: get(COL_DESCRIPTION),
        core: get(COL_CORE),
        creator: get(COL_CREATOR),
        notes: get(COL_NOTES),
    })
}

/// Trimmed field value, or `None` when the column is missing or blank.
fn value_or_none(record: &csv::StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A leading row whose first cell is `Name`.
fn is_header(record: &csv::StringRecord) -> bool {
    record
        .get(COL_NAME)
        .is_some_and(|cell| cell.trim().eq_ignore_ascii_case("name"))
}
