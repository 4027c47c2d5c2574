//! Deterministic CSV rendering of a table document.
//!
//! The output format is a compatibility contract with the widget this
//! model backs, preserved byte for byte:
//!
//! - a `\u{FEFF}` byte-order mark opens the document so downstream
//!   spreadsheet imports detect UTF-8
//! - the header line joins column names with `,`, unquoted and
//!   unescaped - only body cells get the quoting treatment
//! - every body cell is double-quoted unconditionally, with internal
//!   `"` doubled
//! - booleans render as `True`/`False`, absent cells as the empty
//!   string, and `data:image` payloads as a short placeholder instead
//!   of kilobytes of base64
//! - lines join with `\n`
//!
//! Rendering is a pure read of the table: exporting twice without an
//! intervening mutation yields identical bytes.

use std::io;
use std::path::Path;

use tracing::debug;

use gridform_model::{CellValue, Row, Table};

/// Fixed download name for exported documents.
pub const EXPORT_FILENAME: &str = "data.csv";

/// MIME type for exported documents.
pub const EXPORT_MIME_TYPE: &str = "text/csv;charset=utf-8;";

const BOM: char = '\u{FEFF}';
const IMAGE_PLACEHOLDER: &str = "Image Data";
const IMAGE_URI_PREFIX: &str = "data:image";

/// A rendered export: the exact byte sequence plus the delivery
/// metadata a host needs to hand it to a user. Delivery itself
/// (download plumbing, HTTP response, file dialog) is the host's
/// concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub filename: String,
    pub mime_type: String,
    pub content: String,
}

impl ExportDocument {
    /// Write the document bytes to `path`.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.content.as_bytes())
    }
}

/// Render the table to a CSV document.
pub fn export_table(table: &Table) -> ExportDocument {
    let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();

    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(names.join(","));
    for row in &table.rows {
        let cells: Vec<String> = names.iter().map(|name| body_cell(row, name)).collect();
        lines.push(cells.join(","));
    }

    let mut content = String::from(BOM);
    content.push_str(&lines.join("\n"));
    debug!(
        columns = names.len(),
        rows = table.rows.len(),
        bytes = content.len(),
        "table exported"
    );

    ExportDocument {
        filename: EXPORT_FILENAME.to_owned(),
        mime_type: EXPORT_MIME_TYPE.to_owned(),
        content,
    }
}

fn body_cell(row: &Row, name: &str) -> String {
    let text = match row.get(name) {
        Some(CellValue::Bool(true)) => "True".to_owned(),
        Some(CellValue::Bool(false)) => "False".to_owned(),
        None => String::new(),
        Some(CellValue::Text(s)) if s.starts_with(IMAGE_URI_PREFIX) => {
            IMAGE_PLACEHOLDER.to_owned()
        }
        Some(CellValue::Text(s)) => s.clone(),
    };
    quote(&text)
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridform_model::{Column, ColumnType};

    fn row(cells: &[(&str, CellValue)]) -> Row {
        cells
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_owned())
    }

    #[test]
    fn test_export_booleans_and_image_placeholder() {
        let table = Table {
            columns: vec![
                Column::new("A", ColumnType::Boolean),
                Column::new("B", ColumnType::Image),
            ],
            rows: vec![row(&[
                ("A", CellValue::Bool(true)),
                ("B", text("data:image/png;base64,Zg==")),
            ])],
        };

        let doc = export_table(&table);

        assert_eq!(doc.content, "\u{FEFF}A,B\n\"True\",\"Image Data\"");
        assert_eq!(doc.filename, "data.csv");
        assert_eq!(doc.mime_type, "text/csv;charset=utf-8;");
    }

    #[test]
    fn test_export_doubles_internal_quotes() {
        let table = Table {
            columns: vec![Column::new("A", ColumnType::Text)],
            rows: vec![row(&[("A", text("he said \"hi\""))])],
        };

        let doc = export_table(&table);

        assert_eq!(doc.content, "\u{FEFF}A\n\"he said \"\"hi\"\"\"");
    }

    #[test]
    fn test_export_header_is_unquoted_body_always_quoted() {
        // Header cells pass through raw even when they contain commas
        // or quotes; body cells are quoted even when plain.
        let table = Table {
            columns: vec![
                Column::new("a,b", ColumnType::Text),
                Column::new("plain", ColumnType::Text),
            ],
            rows: vec![row(&[("a,b", text("x")), ("plain", text("y"))])],
        };

        let doc = export_table(&table);

        assert_eq!(doc.content, "\u{FEFF}a,b,plain\n\"x\",\"y\"");
    }

    #[test]
    fn test_export_absent_cell_renders_empty() {
        let table = Table {
            columns: vec![
                Column::new("A", ColumnType::Text),
                Column::new("B", ColumnType::Text),
            ],
            rows: vec![row(&[("A", text("x"))])],
        };

        let doc = export_table(&table);

        assert_eq!(doc.content, "\u{FEFF}A,B\n\"x\",\"\"");
    }

    #[test]
    fn test_export_false_renders_capitalized() {
        let table = Table {
            columns: vec![Column::new("Done", ColumnType::Boolean)],
            rows: vec![row(&[("Done", CellValue::Bool(false))])],
        };

        assert_eq!(export_table(&table).content, "\u{FEFF}Done\n\"False\"");
    }

    #[test]
    fn test_export_empty_table_is_bom_plus_empty_header() {
        assert_eq!(export_table(&Table::new()).content, "\u{FEFF}");
    }

    #[test]
    fn test_export_is_idempotent() {
        let table = Table {
            columns: vec![
                Column::new("Name", ColumnType::Text),
                Column::new("Done", ColumnType::Boolean),
            ],
            rows: vec![
                row(&[("Name", text("Alice")), ("Done", CellValue::Bool(true))]),
                row(&[("Name", text("Bob")), ("Done", CellValue::Bool(false))]),
            ],
        };

        assert_eq!(export_table(&table), export_table(&table));
    }

    #[test]
    fn test_export_multiple_rows_join_with_newline() {
        let table = Table {
            columns: vec![Column::new("A", ColumnType::Text)],
            rows: vec![row(&[("A", text("1"))]), row(&[("A", text("2"))])],
        };

        assert_eq!(export_table(&table).content, "\u{FEFF}A\n\"1\"\n\"2\"");
    }
}
