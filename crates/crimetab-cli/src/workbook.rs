//! Minimal xlsx writer: a zip archive of SpreadsheetML parts written with
//! quick-xml. Cells are inline strings or numbers; no shared string table.

use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

const SHEET_NAME_MAX: usize = 31;
const SHEET_NAME_FORBIDDEN: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const REL_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const CT_WORKBOOK: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const CT_WORKSHEET: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid sheet name '{0}'")]
    InvalidSheetName(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    /// Text cell, or [`Cell::Empty`] for the empty string.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }
}

#[derive(Debug, Clone)]
struct Sheet {
    name: String,
    rows: Vec<Vec<Cell>>,
}

/// Sheets collected in memory and written out in one go.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet. Names follow Excel's rules: 1 to 31 characters, none
    /// of `[]:*?/\`, unique ignoring case.
    pub fn add_sheet(&mut self, name: &str, rows: Vec<Vec<Cell>>) -> Result<(), WorkbookError> {
        let valid = !name.is_empty()
            && name.chars().count() <= SHEET_NAME_MAX
            && !name.contains(SHEET_NAME_FORBIDDEN)
            && !self.sheets.iter().any(|s| s.name.eq_ignore_ascii_case(name));
        if !valid {
            return Err(WorkbookError::InvalidSheetName(name.to_string()));
        }
        self.sheets.push(Sheet {
            name: name.to_string(),
            rows,
        });
        Ok(())
    }

    #[cfg(test)]
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    /// Write the workbook to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), WorkbookError> {
        let file = File::create(path.as_ref())?;
        self.write_to(file)?;
        Ok(())
    }

    pub fn write_to<W: Write + Seek>(&self, sink: W) -> Result<W, WorkbookError> {
        let mut zip = ZipWriter::new(sink);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        write_part(&mut zip, options, "[Content_Types].xml", &self.content_types()?)?;
        write_part(&mut zip, options, "_rels/.rels", &package_rels()?)?;
        write_part(&mut zip, options, "xl/workbook.xml", &self.workbook_xml()?)?;
        write_part(&mut zip, options, "xl/_rels/workbook.xml.rels", &self.workbook_rels()?)?;
        write_part(&mut zip, options, "xl/styles.xml", &styles_xml()?)?;
        for (i, sheet) in self.sheets.iter().enumerate() {
            let name = format!("xl/worksheets/sheet{}.xml", i + 1);
            write_part(&mut zip, options, &name, &sheet_xml(&sheet.rows)?)?;
        }

        Ok(zip.finish()?)
    }

    fn content_types(&self) -> Result<Vec<u8>, WorkbookError> {
        let mut w = xml_writer()?;
        open(&mut w, "Types", &[("xmlns", NS_CONTENT_TYPES)])?;
        empty(&mut w, "Default", &[("Extension", "rels"), ("ContentType", CT_RELS)])?;
        empty(&mut w, "Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
        let fixed = [("/xl/workbook.xml", CT_WORKBOOK), ("/xl/styles.xml", CT_STYLES)];
        for (part, content_type) in fixed {
            empty(&mut w, "Override", &[("PartName", part), ("ContentType", content_type)])?;
        }
        for i in 1..=self.sheets.len() {
            let part = format!("/xl/worksheets/sheet{i}.xml");
            let attrs = [("PartName", part.as_str()), ("ContentType", CT_WORKSHEET)];
            empty(&mut w, "Override", &attrs)?;
        }
        close(&mut w, "Types")?;
        Ok(w.into_inner())
    }

    fn workbook_xml(&self) -> Result<Vec<u8>, WorkbookError> {
        let mut w = xml_writer()?;
        open(&mut w, "workbook", &[("xmlns", NS_MAIN), ("xmlns:r", NS_REL)])?;
        open(&mut w, "sheets", &[])?;
        for (i, sheet) in self.sheets.iter().enumerate() {
            let id = (i + 1).to_string();
            let rid = format!("rId{id}");
            let attrs = [
                ("name", sheet.name.as_str()),
                ("sheetId", id.as_str()),
                ("r:id", rid.as_str()),
            ];
            empty(&mut w, "sheet", &attrs)?;
        }
        close(&mut w, "sheets")?;
        close(&mut w, "workbook")?;
        Ok(w.into_inner())
    }

    fn workbook_rels(&self) -> Result<Vec<u8>, WorkbookError> {
        let mut w = xml_writer()?;
        open(&mut w, "Relationships", &[("xmlns", NS_PKG_REL)])?;
        for i in 1..=self.sheets.len() {
            let rid = format!("rId{i}");
            let target = format!("worksheets/sheet{i}.xml");
            let attrs = [
                ("Id", rid.as_str()),
                ("Type", REL_WORKSHEET),
                ("Target", target.as_str()),
            ];
            empty(&mut w, "Relationship", &attrs)?;
        }
        let styles_rid = format!("rId{}", self.sheets.len() + 1);
        empty(
            &mut w,
            "Relationship",
            &[("Id", styles_rid.as_str()), ("Type", REL_STYLES), ("Target", "styles.xml")],
        )?;
        close(&mut w, "Relationships")?;
        Ok(w.into_inner())
    }
}

fn write_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    options: SimpleFileOptions,
    name: &str,
    body: &[u8],
) -> Result<(), WorkbookError> {
    zip.start_file(name, options)?;
    zip.write_all(body)?;
    Ok(())
}

fn package_rels() -> Result<Vec<u8>, WorkbookError> {
    let mut w = xml_writer()?;
    open(&mut w, "Relationships", &[("xmlns", NS_PKG_REL)])?;
    empty(
        &mut w,
        "Relationship",
        &[("Id", "rId1"), ("Type", REL_DOCUMENT), ("Target", "xl/workbook.xml")],
    )?;
    close(&mut w, "Relationships")?;
    Ok(w.into_inner())
}

/// One font, fill, border and cell format: the least Excel accepts.
fn styles_xml() -> Result<Vec<u8>, WorkbookError> {
    let mut w = xml_writer()?;
    open(&mut w, "styleSheet", &[("xmlns", NS_MAIN)])?;

    open(&mut w, "fonts", &[("count", "1")])?;
    open(&mut w, "font", &[])?;
    empty(&mut w, "sz", &[("val", "11")])?;
    empty(&mut w, "name", &[("val", "Calibri")])?;
    close(&mut w, "font")?;
    close(&mut w, "fonts")?;

    open(&mut w, "fills", &[("count", "1")])?;
    open(&mut w, "fill", &[])?;
    empty(&mut w, "patternFill", &[("patternType", "none")])?;
    close(&mut w, "fill")?;
    close(&mut w, "fills")?;

    open(&mut w, "borders", &[("count", "1")])?;
    empty(&mut w, "border", &[])?;
    close(&mut w, "borders")?;

    open(&mut w, "cellStyleXfs", &[("count", "1")])?;
    empty(
        &mut w,
        "xf",
        &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0")],
    )?;
    close(&mut w, "cellStyleXfs")?;

    open(&mut w, "cellXfs", &[("count", "1")])?;
    empty(
        &mut w,
        "xf",
        &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0"), ("xfId", "0")],
    )?;
    close(&mut w, "cellXfs")?;

    close(&mut w, "styleSheet")?;
    Ok(w.into_inner())
}

fn sheet_xml(rows: &[Vec<Cell>]) -> Result<Vec<u8>, WorkbookError> {
    let mut w = xml_writer()?;
    open(&mut w, "worksheet", &[("xmlns", NS_MAIN), ("xmlns:r", NS_REL)])?;

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if !rows.is_empty() && width > 0 {
        let dimension = format!("A1:{}{}", column_letter(width - 1), rows.len());
        empty(&mut w, "dimension", &[("ref", dimension.as_str())])?;
    }

    open(&mut w, "sheetData", &[])?;
    for (r, row) in rows.iter().enumerate() {
        let row_ref = (r + 1).to_string();
        open(&mut w, "row", &[("r", row_ref.as_str())])?;
        for (c, cell) in row.iter().enumerate() {
            let cell_ref = format!("{}{row_ref}", column_letter(c));
            match cell {
                Cell::Empty => {}
                Cell::Number(n) => {
                    open(&mut w, "c", &[("r", cell_ref.as_str())])?;
                    text_element(&mut w, "v", &[], &n.to_string())?;
                    close(&mut w, "c")?;
                }
                Cell::Text(s) => {
                    open(&mut w, "c", &[("r", cell_ref.as_str()), ("t", "inlineStr")])?;
                    open(&mut w, "is", &[])?;
                    text_element(&mut w, "t", &[("xml:space", "preserve")], &xml_safe(s))?;
                    close(&mut w, "is")?;
                    close(&mut w, "c")?;
                }
            }
        }
        close(&mut w, "row")?;
    }
    close(&mut w, "sheetData")?;

    close(&mut w, "worksheet")?;
    Ok(w.into_inner())
}

/// Spreadsheet column name for a 0-based index: 0 → `A`, 26 → `AA`.
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Drop control characters XML 1.0 cannot carry.
fn xml_safe(s: &str) -> String {
    s.chars()
        .filter(|&c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

// --- quick-xml helpers ---

fn xml_writer() -> Result<Writer<Vec<u8>>, WorkbookError> {
    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(w)
}

fn open(w: &mut Writer<Vec<u8>>, name: &str, attrs: &[(&str, &str)]) -> Result<(), WorkbookError> {
    let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
    w.write_event(Event::Start(start))?;
    Ok(())
}

fn empty(w: &mut Writer<Vec<u8>>, name: &str, attrs: &[(&str, &str)]) -> Result<(), WorkbookError> {
    let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
    w.write_event(Event::Empty(start))?;
    Ok(())
}

fn close(w: &mut Writer<Vec<u8>>, name: &str) -> Result<(), WorkbookError> {
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element(
    w: &mut Writer<Vec<u8>>,
    name: &str,
    attrs: &[(&str, &str)],
    text: &str,
) -> Result<(), WorkbookError> {
    open(w, name, attrs)?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    close(w, name)
}
