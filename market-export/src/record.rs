//! Spreadsheet rows in and index rows out.

use crate::xlsx::Sheet;

// 1-based spreadsheet columns.
const COL_A: u32 = 1;
const COL_B: u32 = 2;
const COL_C: u32 = 3;
const COL_D: u32 = 4;
const COL_E: u32 = 5;
const COL_F: u32 = 6;
const COL_G: u32 = 7;
const COL_I: u32 = 9;
const COL_M: u32 = 13;

/// Version written when column D is empty.
pub const DEFAULT_VERSION: &str = "1.0";

/// One row of the input spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRecord {
    /// 1-based sheet row.
    pub row: u32,
    /// Hyperlink target of column A.
    pub link: Option<String>,
    /// Display value of column A.
    pub label: Option<String>,
    pub game: Option<String>,
    pub creation_date: Option<String>,
    pub version: Option<String>,
    pub rom_name: Option<String>,
    pub description: Option<String>,
    pub core: Option<String>,
    pub creator: Option<String>,
    pub modeler: Option<String>,
}

impl InputRecord {
    pub fn from_sheet(sheet: &Sheet, row: u32) -> Self {
        let value = |col: u32| sheet.value(row, col).map(str::to_string);
        Self {
            row,
            link: sheet
                .hyperlink(row, COL_A)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            label: value(COL_A),
            game: value(COL_B),
            creation_date: value(COL_C),
            version: value(COL_D),
            rom_name: value(COL_E),
            description: value(COL_F),
            core: value(COL_G),
            creator: value(COL_I),
            modeler: value(COL_M),
        }
    }

    /// `"<creator> - modeler: <modeler>"`, or whichever part is present.
    /// Empty values count as absent.
    pub fn creator_credit(&self) -> String {
        match (non_empty(&self.creator), non_empty(&self.modeler)) {
            (Some(c), Some(m)) => format!("{c} - modeler: {m}"),
            (Some(c), None) => c.to_string(),
            (None, Some(m)) => format!("modeler: {m}"),
            (None, None) => String::new(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// One line of the output index.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OutputRecord {
    pub name: String,
    pub url: String,
    pub game: String,
    pub creation_date: String,
    pub version: String,
    pub rom_name: String,
    pub description: String,
    pub core: String,
    pub creator: String,
}

impl OutputRecord {
    /// Build the index line for a record whose file was saved from `url`.
    pub fn from_input(record: &InputRecord, url: &str) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            name: text(&record.label),
            url: url.to_string(),
            game: text(&record.game),
            creation_date: text(&record.creation_date),
            version: record
                .version
                .clone()
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            rom_name: text(&record.rom_name),
            description: text(&record.description),
            core: text(&record.core),
            creator: record.creator_credit(),
        }
    }
}
