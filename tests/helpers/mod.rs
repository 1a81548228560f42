//! Minimal in-memory xlsx builder for ingestion tests
//!
//! Writes just enough of the OOXML package for calamine to open it: content
//! types, package and workbook relationships, the workbook part and one
//! worksheet per sheet. Text cells are inline strings; cells that parse as
//! numbers are written as numeric values.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// One worksheet: name plus rows of cell text ("" leaves the cell out)
pub struct SheetSpec {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl SheetSpec {
    pub fn new(name: &str, rows: &[&[&str]]) -> Self {
        Self {
            name: name.to_string(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }
}

/// Default production step header used across the tests
pub const STEP_HEADER: &[&str] = &[
    "Seq.",
    "Descrição",
    "TipoPassoTeste",
    "Canal",
    "Operação",
    "Conta Cedente",
    "Conta Cessionária",
    "Número Comando",
    "Transmissor Debito",
    "Valor Financeiro",
    "PU",
];

pub fn build_xlsx(sheets: &[SheetSpec]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut put = |path: &str, body: String| {
        zip.start_file(path, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    };

    put("[Content_Types].xml", content_types(sheets.len()));
    put("_rels/.rels", package_rels());
    put("xl/workbook.xml", workbook(sheets));
    put("xl/_rels/workbook.xml.rels", workbook_rels(sheets.len()));
    for (idx, sheet) in sheets.iter().enumerate() {
        put(&format!("xl/worksheets/sheet{}.xml", idx + 1), worksheet(&sheet.rows));
    }

    zip.finish().unwrap().into_inner()
}

fn content_types(count: usize) -> String {
    let overrides: String = (1..=count)
        .map(|n| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{overrides}</Types>"#
    )
}

fn package_rels() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
        .to_string()
}

fn workbook(sheets: &[SheetSpec]) -> String {
    let entries: String = sheets
        .iter()
        .enumerate()
        .map(|(idx, sheet)| {
            format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(&sheet.name),
                idx + 1,
                idx + 1
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{entries}</sheets></workbook>"#
    )
}

fn workbook_rels(count: usize) -> String {
    let entries: String = (1..=count)
        .map(|n| {
            format!(
                r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{entries}</Relationships>"#
    )
}

fn worksheet(rows: &[Vec<String>]) -> String {
    let mut data = String::new();
    for (r, row) in rows.iter().enumerate() {
        let cells: String = row
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_empty())
            .map(|(c, value)| cell(&format!("{}{}", column_name(c), r + 1), value))
            .collect();
        if !cells.is_empty() {
            data.push_str(&format!(r#"<row r="{}">{}</row>"#, r + 1, cells));
        }
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{data}</sheetData></worksheet>"#
    )
}

fn cell(reference: &str, value: &str) -> String {
    if value.parse::<f64>().is_ok() {
        format!(r#"<c r="{reference}"><v>{value}</v></c>"#)
    } else {
        format!(
            r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#,
            escape(value)
        )
    }
}

fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
