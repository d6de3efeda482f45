//! Builds small `.xlsx` files for tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;

/// Value of one test cell.
pub enum Value {
    /// Stored in the shared string table.
    Shared(&'static str),
    /// Stored inline in the sheet.
    Inline(&'static str),
    Number(&'static str),
    /// Number formatted with the built-in date style.
    Date(&'static str),
    Bool(bool),
}

#[derive(Default)]
pub struct SheetSpec {
    cells: Vec<(String, Value)>,
    links: Vec<(String, String)>,
}

impl SheetSpec {
    pub fn cell(mut self, reference: &str, value: Value) -> Self {
        self.cells.push((reference.to_string(), value));
        self
    }

    /// External hyperlink on a cell or range.
    pub fn link(mut self, reference: &str, url: &str) -> Self {
        self.links.push((reference.to_string(), url.to_string()));
        self
    }

    pub fn write(&self, path: &Path) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let opts = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

        let mut put = |name: &str, body: &str| {
            zip.start_file(name, opts).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        };

        put("[Content_Types].xml", CONTENT_TYPES);
        put("xl/workbook.xml", WORKBOOK);
        put("xl/_rels/workbook.xml.rels", WORKBOOK_RELS);
        put("xl/styles.xml", STYLES);

        let (sheet, shared) = self.sheet_xml();
        put("xl/sharedStrings.xml", &shared);
        put("xl/worksheets/sheet1.xml", &sheet);
        put("xl/worksheets/_rels/sheet1.xml.rels", &self.sheet_rels_xml());

        zip.finish().unwrap();
    }

    fn sheet_xml(&self) -> (String, String) {
        let mut shared: Vec<&str> = Vec::new();
        let mut rows: std::collections::BTreeMap<u32, Vec<String>> = Default::default();

        for (reference, value) in &self.cells {
            let row: u32 = reference
                .trim_start_matches(|c: char| c.is_ascii_alphabetic())
                .parse()
                .unwrap();
            let xml = match value {
                Value::Shared(s) => {
                    shared.push(*s);
                    format!(r#"<c r="{reference}" t="s"><v>{}</v></c>"#, shared.len() - 1)
                }
                Value::Inline(s) => format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape(s)
                ),
                Value::Number(n) => format!(r#"<c r="{reference}"><v>{n}</v></c>"#),
                Value::Date(n) => format!(r#"<c r="{reference}" s="1"><v>{n}</v></c>"#),
                Value::Bool(b) => {
                    format!(r#"<c r="{reference}" t="b"><v>{}</v></c>"#, u8::from(*b))
                }
            };
            rows.entry(row).or_default().push(xml);
        }

        let mut sheet = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheetData>"#,
        );
        for (row, cells) in rows {
            sheet.push_str(&format!(r#"<row r="{row}">{}</row>"#, cells.join("")));
        }
        sheet.push_str("</sheetData>");
        if !self.links.is_empty() {
            sheet.push_str("<hyperlinks>");
            for (i, (reference, _)) in self.links.iter().enumerate() {
                sheet.push_str(&format!(
                    r#"<hyperlink ref="{reference}" r:id="rLink{}"/>"#,
                    i + 1
                ));
            }
            sheet.push_str("</hyperlinks>");
        }
        sheet.push_str("</worksheet>");

        let mut sst = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );
        for s in shared {
            sst.push_str(&format!("<si><t>{}</t></si>", escape(s)));
        }
        sst.push_str("</sst>");

        (sheet, sst)
    }

    fn sheet_rels_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (i, (_, url)) in self.links.iter().enumerate() {
            xml.push_str(&format!(
                r#"<Relationship Id="rLink{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="{}" TargetMode="External"/>"#,
                i + 1,
                escape(url)
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Cabinets" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/></cellXfs>
</styleSheet>"#;
