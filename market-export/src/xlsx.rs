//! Minimal `.xlsx` reader.
//!
//! Reads the first worksheet of a workbook into memory: cell display values
//! (shared strings, inline strings, numbers, booleans, dates) and the
//! external hyperlink attached to each cell. Formatting, formulas and every
//! other sheet are ignored.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, TimeDelta};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::WorkbookError;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const STYLES_PART: &str = "xl/styles.xml";
const DEFAULT_SHEET_PART: &str = "xl/worksheets/sheet1.xml";

/// One cell of a worksheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    /// Display value, `None` for a cell without a value.
    pub value: Option<String>,
    /// Target of an external hyperlink on this cell.
    pub hyperlink: Option<String>,
}

/// A worksheet held in memory. Rows and columns are 1-based.
#[derive(Debug, Default)]
pub struct Sheet {
    cells: BTreeMap<(u32, u32), Cell>,
    max_row: u32,
}

impl Sheet {
    /// Highest row index that holds a cell.
    pub fn max_row(&self) -> u32 {
        self.max_row
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    pub fn value(&self, row: u32, col: u32) -> Option<&str> {
        self.cell(row, col).and_then(|c| c.value.as_deref())
    }

    pub fn hyperlink(&self, row: u32, col: u32) -> Option<&str> {
        self.cell(row, col).and_then(|c| c.hyperlink.as_deref())
    }

    /// True when no cell of the row has a value.
    pub fn row_is_blank(&self, row: u32) -> bool {
        self.cells
            .range((row, 0)..=(row, u32::MAX))
            .all(|(_, c)| c.value.is_none())
    }

    fn cell_mut(&mut self, row: u32, col: u32) -> &mut Cell {
        self.max_row = self.max_row.max(row);
        self.cells.entry((row, col)).or_default()
    }
}

/// An open `.xlsx` file.
pub struct Workbook {
    path: PathBuf,
    archive: ZipArchive<File>,
}

impl Workbook {
    pub fn open(path: &Path) -> Result<Self, WorkbookError> {
        let file = File::open(path).map_err(|e| WorkbookError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let archive = ZipArchive::new(file)?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    /// Read the first worksheet, in workbook order.
    pub fn read_first_sheet(&mut self) -> Result<Sheet, WorkbookError> {
        let sheet_part = self.first_sheet_part()?;
        log::debug!("Reading worksheet {}", sheet_part);

        let shared = match self.read_part(SHARED_STRINGS_PART)? {
            Some(xml) => parse_shared_strings(&xml).map_err(xml_error(SHARED_STRINGS_PART))?,
            None => Vec::new(),
        };
        let date_styles = match self.read_part(STYLES_PART)? {
            Some(xml) => parse_date_styles(&xml).map_err(xml_error(STYLES_PART))?,
            None => Vec::new(),
        };

        let rels_part = sheet_rels_part(&sheet_part);
        let rels = match self.read_part(&rels_part)? {
            Some(xml) => parse_relationships(&xml).map_err(xml_error(&rels_part))?,
            None => HashMap::new(),
        };

        let xml = self
            .read_part(&sheet_part)?
            .ok_or(WorkbookError::NoSheets)?;
        let ctx = SheetContext {
            part: &sheet_part,
            shared: &shared,
            date_styles: &date_styles,
            rels: &rels,
        };
        parse_sheet(&xml, &ctx)
    }

    /// Path of the first worksheet part inside the archive.
    fn first_sheet_part(&mut self) -> Result<String, WorkbookError> {
        let rid = match self.read_part(WORKBOOK_PART)? {
            Some(xml) => first_sheet_rid(&xml).map_err(xml_error(WORKBOOK_PART))?,
            None => None,
        };
        let rels = match self.read_part(WORKBOOK_RELS_PART)? {
            Some(xml) => parse_relationships(&xml).map_err(xml_error(WORKBOOK_RELS_PART))?,
            None => HashMap::new(),
        };

        match rid.and_then(|id| rels.get(&id)) {
            Some(target) => Ok(resolve_target("xl", target)),
            None => {
                log::debug!("No sheet relationship found, assuming {}", DEFAULT_SHEET_PART);
                Ok(DEFAULT_SHEET_PART.to_string())
            }
        }
    }

    /// Raw bytes of an archive member, `None` when it does not exist.
    fn read_part(&mut self, name: &str) -> Result<Option<Vec<u8>>, WorkbookError> {
        let mut entry = match self.archive.by_name(name) {
            Ok(e) => e,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf).map_err(|e| WorkbookError::Io {
            path: self.path.join(name),
            source: e,
        })?;
        Ok(Some(buf))
    }
}

fn xml_error(part: &str) -> impl Fn(quick_xml::Error) -> WorkbookError + '_ {
    move |e| WorkbookError::Xml {
        part: part.to_string(),
        source: e,
    }
}

/// Unescaped value of the attribute with the given local name.
fn attr(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, quick_xml::Error> {
    for a in e.attributes() {
        let a = a?;
        if a.key.local_name().as_ref() == name {
            return Ok(Some(a.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Archive path of a relationship target relative to `base_dir`.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut parts: Vec<&str> = base_dir.split('/').filter(|p| !p.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            ".." => {
                parts.pop();
            }
            "." | "" => {}
            s => parts.push(s),
        }
    }
    parts.join("/")
}

/// `xl/worksheets/sheet1.xml` → `xl/worksheets/_rels/sheet1.xml.rels`
fn sheet_rels_part(sheet_part: &str) -> String {
    match sheet_part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{sheet_part}.rels"),
    }
}

fn first_sheet_rid(xml: &[u8]) -> Result<Option<String>, quick_xml::Error> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"sheet" => {
                return attr(e, b"id");
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

/// Relationship id → target, for a `.rels` part.
fn parse_relationships(xml: &[u8]) -> Result<HashMap<String, String>, quick_xml::Error> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut rels = HashMap::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attr(e, b"Id")?, attr(e, b"Target")?) {
                    rels.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(rels)
}

/// The shared string table. Rich-text runs are concatenated; phonetic runs
/// are skipped.
fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut phonetic_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"si" => current.clear(),
                b"t" => in_text = true,
                b"rPh" => phonetic_depth += 1,
                _ => {}
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::Text(ref e) if in_text && phonetic_depth == 0 => {
                current.push_str(&e.unescape()?);
            }
            Event::CData(ref e) if in_text && phonetic_depth == 0 => {
                current.push_str(&String::from_utf8_lossy(e));
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"si" => strings.push(std::mem::take(&mut current)),
                b"t" => in_text = false,
                b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

/// For each cell format (`cellXfs/xf`, in order), whether it displays a date.
fn parse_date_styles(xml: &[u8]) -> Result<Vec<bool>, quick_xml::Error> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut custom: HashMap<u32, String> = HashMap::new();
    let mut xf_formats: Vec<u32> = Vec::new();
    let mut in_cell_xfs = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"numFmt" => {
                    let id = attr(e, b"numFmtId")?.and_then(|v| v.parse().ok());
                    if let (Some(id), Some(code)) = (id, attr(e, b"formatCode")?) {
                        custom.insert(id, code);
                    }
                }
                b"cellXfs" => in_cell_xfs = true,
                b"xf" if in_cell_xfs => {
                    let id = attr(e, b"numFmtId")?
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0);
                    xf_formats.push(id);
                }
                _ => {}
            },
            Event::End(ref e) if e.local_name().as_ref() == b"cellXfs" => in_cell_xfs = false,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(xf_formats
        .into_iter()
        .map(|id| match custom.get(&id) {
            Some(code) => is_date_format_code(code),
            None => is_builtin_date_format(id),
        })
        .collect())
}

fn is_builtin_date_format(id: u32) -> bool {
    matches!(id, 14..=22 | 27..=36 | 45..=47 | 50..=58)
}

/// Whether a custom number format shows a date or time. Quoted literals,
/// escaped characters and bracketed sections such as `[Red]` are ignored.
fn is_date_format_code(code: &str) -> bool {
    let mut chars = code.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            }
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                let section: String = chars.by_ref().take_while(|&b| b != ']').collect();
                let elapsed = !section.is_empty()
                    && section
                        .chars()
                        .all(|s| matches!(s.to_ascii_lowercase(), 'h' | 'm' | 's'));
                if elapsed {
                    return true;
                }
            }
            c if matches!(c.to_ascii_lowercase(), 'd' | 'm' | 'y' | 'h' | 's') => return true,
            _ => {}
        }
    }
    false
}

struct SheetContext<'a> {
    part: &'a str,
    shared: &'a [String],
    date_styles: &'a [bool],
    rels: &'a HashMap<String, String>,
}

/// A `<c>` element being read.
#[derive(Default)]
struct PendingCell {
    row: u32,
    col: u32,
    kind: Option<String>,
    style: usize,
    raw: Option<String>,
    inline: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    None,
    Value,
    Inline,
}

fn parse_sheet(xml: &[u8], ctx: &SheetContext<'_>) -> Result<Sheet, WorkbookError> {
    let to_err = xml_error(ctx.part);
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut sheet = Sheet::default();

    let mut row = 0u32;
    let mut next_col = 1u32;
    let mut pending: Option<PendingCell> = None;
    let mut target = TextTarget::None;
    let mut phonetic_depth = 0usize;
    let mut links: Vec<(String, String)> = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(&to_err)?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.local_name().as_ref() {
                    b"row" => {
                        row = match attr(e, b"r").map_err(&to_err)? {
                            Some(r) => r.parse().map_err(|_| WorkbookError::CellRef(r))?,
                            None => row + 1,
                        };
                        next_col = 1;
                    }
                    b"c" => {
                        let (r, c) = match attr(e, b"r").map_err(&to_err)? {
                            Some(reference) => parse_cell_ref(&reference)?,
                            None => (row, next_col),
                        };
                        next_col = c + 1;
                        let cell = PendingCell {
                            row: r,
                            col: c,
                            kind: attr(e, b"t").map_err(&to_err)?,
                            style: attr(e, b"s")
                                .map_err(&to_err)?
                                .and_then(|s| s.parse().ok())
                                .unwrap_or(0),
                            ..Default::default()
                        };
                        if is_empty {
                            finish_cell(&mut sheet, cell, ctx);
                        } else {
                            pending = Some(cell);
                        }
                    }
                    b"v" if !is_empty => target = TextTarget::Value,
                    b"t" if !is_empty && pending.is_some() => target = TextTarget::Inline,
                    b"rPh" if !is_empty => phonetic_depth += 1,
                    b"hyperlink" => {
                        let reference = attr(e, b"ref").map_err(&to_err)?;
                        let rid = attr(e, b"id").map_err(&to_err)?;
                        if let (Some(reference), Some(rid)) = (reference, rid) {
                            links.push((reference, rid));
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) if target != TextTarget::None && phonetic_depth == 0 => {
                let text = e.unescape().map_err(&to_err)?;
                append_text(pending.as_mut(), target, &text);
            }
            Event::CData(ref e) if target != TextTarget::None && phonetic_depth == 0 => {
                append_text(pending.as_mut(), target, &String::from_utf8_lossy(e));
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"c" => {
                    if let Some(cell) = pending.take() {
                        finish_cell(&mut sheet, cell, ctx);
                    }
                }
                b"v" | b"t" => target = TextTarget::None,
                b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    for (reference, rid) in links {
        let Some(url) = ctx.rels.get(&rid) else {
            log::debug!("Hyperlink {} refers to unknown relationship {}", reference, rid);
            continue;
        };
        let (start, end) = match reference.split_once(':') {
            Some((a, b)) => (parse_cell_ref(a)?, parse_cell_ref(b)?),
            None => {
                let single = parse_cell_ref(&reference)?;
                (single, single)
            }
        };
        for r in start.0.min(end.0)..=start.0.max(end.0) {
            for c in start.1.min(end.1)..=start.1.max(end.1) {
                sheet.cell_mut(r, c).hyperlink = Some(url.clone());
            }
        }
    }

    Ok(sheet)
}

fn append_text(pending: Option<&mut PendingCell>, target: TextTarget, text: &str) {
    let Some(cell) = pending else {
        return;
    };
    let slot = match target {
        TextTarget::Value => &mut cell.raw,
        TextTarget::Inline => &mut cell.inline,
        TextTarget::None => return,
    };
    slot.get_or_insert_with(String::new).push_str(text);
}

fn finish_cell(sheet: &mut Sheet, cell: PendingCell, ctx: &SheetContext<'_>) {
    let value = match cell.kind.as_deref() {
        Some("s") => cell.raw.as_deref().and_then(|raw| {
            let index: usize = raw.trim().parse().ok()?;
            let s = ctx.shared.get(index);
            if s.is_none() {
                log::debug!("Shared string index {} out of range", index);
            }
            s.cloned()
        }),
        Some("inlineStr") => cell.inline.or(cell.raw),
        Some("str") | Some("e") => cell.raw,
        Some("b") => cell
            .raw
            .map(|raw| (if raw.trim() == "1" { "True" } else { "False" }).to_string()),
        _ => cell.raw.map(|raw| {
            let is_date = ctx.date_styles.get(cell.style).copied().unwrap_or(false);
            render_number(raw.trim(), is_date)
        }),
    };
    sheet.cell_mut(cell.row, cell.col).value = value;
}

/// Render a numeric cell the way a spreadsheet library reading the
/// workbook would print it.
fn render_number(raw: &str, is_date: bool) -> String {
    let Ok(number) = raw.parse::<f64>() else {
        return raw.to_string();
    };

    if is_date {
        if let Some(date) = render_serial_date(number) {
            return date;
        }
    }

    let looks_integral = !raw.contains(['.', 'e', 'E']);
    if looks_integral {
        if let Ok(int) = raw.parse::<i64>() {
            return int.to_string();
        }
    }
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e16 {
        format!("{number:.1}")
    } else {
        number.to_string()
    }
}

/// Excel serial date (1900 date system) as `YYYY-MM-DD HH:MM:SS`, or
/// `HH:MM:SS` for a time-only value below 1.
fn render_serial_date(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let total_seconds = (serial * 86_400.0).round() as i64;

    if serial < 1.0 {
        let secs = total_seconds.min(86_399);
        return Some(format!(
            "{:02}:{:02}:{:02}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        ));
    }

    // Serials before 1900-03-01 are offset by Excel's phantom 1900-02-29.
    let epoch = if serial < 61.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let datetime = epoch
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(TimeDelta::try_seconds(total_seconds)?)?;
    Some(datetime.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// `"AB12"` → `(12, 28)`
fn parse_cell_ref(reference: &str) -> Result<(u32, u32), WorkbookError> {
    let invalid = || WorkbookError::CellRef(reference.to_string());
    let cleaned = reference.replace('$', "");
    let split = cleaned
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (letters, digits) = cleaned.split_at(split);
    if letters.is_empty() {
        return Err(invalid());
    }

    let mut col = 0u32;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(invalid());
        }
        col = col
            .checked_mul(26)
            .and_then(|v| v.checked_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1))
            .ok_or_else(invalid)?;
    }
    let row: u32 = digits.parse().map_err(|_| invalid())?;
    Ok((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_refs() {
        assert_eq!(parse_cell_ref("A1").unwrap(), (1, 1));
        assert_eq!(parse_cell_ref("M7").unwrap(), (7, 13));
        assert_eq!(parse_cell_ref("AB12").unwrap(), (12, 28));
        assert_eq!(parse_cell_ref("$C$3").unwrap(), (3, 3));
        assert!(parse_cell_ref("12").is_err());
        assert!(parse_cell_ref("A").is_err());
    }

    #[test]
    fn relationship_targets() {
        assert_eq!(resolve_target("xl", "worksheets/sheet2.xml"), "xl/worksheets/sheet2.xml");
        assert_eq!(resolve_target("xl", "/xl/worksheets/sheet2.xml"), "xl/worksheets/sheet2.xml");
        assert_eq!(resolve_target("xl/worksheets", "../sharedStrings.xml"), "xl/sharedStrings.xml");
        assert_eq!(
            sheet_rels_part("xl/worksheets/sheet2.xml"),
            "xl/worksheets/_rels/sheet2.xml.rels"
        );
    }

    #[test]
    fn numbers_render_without_trailing_noise() {
        assert_eq!(render_number("42", false), "42");
        assert_eq!(render_number("2.0", false), "2.0");
        assert_eq!(render_number("2.5", false), "2.5");
        assert_eq!(render_number("1E3", false), "1000.0");
        assert_eq!(render_number("-7", false), "-7");
    }

    #[test]
    fn serial_dates() {
        assert_eq!(render_number("45000", true), "2023-03-15 00:00:00");
        assert_eq!(render_number("45000.5", true), "2023-03-15 12:00:00");
        assert_eq!(render_number("0.25", true), "06:00:00");
        assert_eq!(render_number("1", true), "1900-01-01 00:00:00");
        assert_eq!(render_number("61", true), "1900-03-01 00:00:00");
    }

    #[test]
    fn date_format_detection() {
        assert!(is_builtin_date_format(14));
        assert!(is_builtin_date_format(22));
        assert!(!is_builtin_date_format(0));
        assert!(!is_builtin_date_format(49));
        assert!(is_date_format_code("yyyy-mm-dd"));
        assert!(is_date_format_code("[$-409]d-mmm-yy;@"));
        assert!(is_date_format_code("[h]:mm"));
        assert!(!is_date_format_code("General"));
        assert!(!is_date_format_code("0.00%"));
        assert!(!is_date_format_code("[Red]#,##0"));
        assert!(!is_date_format_code("0 \"days\""));
    }

    #[test]
    fn shared_strings_skip_phonetic_runs() {
        let xml = r#"<?xml version="1.0"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <si><t>Galaga</t></si>
  <si><r><t>Ms. </t></r><r><rPr><b/></rPr><t xml:space="preserve">Pac &amp; Man</t></r></si>
  <si><t>漢字</t><rPh sb="0" eb="2"><t>かんじ</t></rPh></si>
  <si/>
</sst>"#
            .as_bytes();
        let strings = parse_shared_strings(xml).unwrap();
        assert_eq!(strings, vec!["Galaga", "Ms. Pac & Man", "漢字", ""]);
    }

    #[test]
    fn cell_xfs_map_to_date_flags() {
        let xml = br#"<styleSheet>
  <numFmts count="1"><numFmt numFmtId="164" formatCode="dd/mm/yyyy"/></numFmts>
  <cellStyleXfs count="1"><xf numFmtId="14"/></cellStyleXfs>
  <cellXfs count="4">
    <xf numFmtId="0"/>
    <xf numFmtId="14" applyNumberFormat="1"/>
    <xf numFmtId="164"/>
    <xf numFmtId="2"/>
  </cellXfs>
</styleSheet>"#;
        assert_eq!(parse_date_styles(xml).unwrap(), vec![false, true, true, false]);
    }

    #[test]
    fn blank_rows() {
        let mut sheet = Sheet::default();
        sheet.cell_mut(2, 1).hyperlink = Some("https://x".into());
        sheet.cell_mut(3, 2).value = Some("v".into());
        assert!(sheet.row_is_blank(2));
        assert!(!sheet.row_is_blank(3));
        assert!(sheet.row_is_blank(4));
        assert_eq!(sheet.max_row(), 3);
    }
}
