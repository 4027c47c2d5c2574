//! One function per subcommand. Each loads the document, applies a
//! single operation through the editor (write-back included), and
//! prints a short confirmation.

use std::path::Path;

use anyhow::{bail, Context, Result};
use comfy_table::Table as DisplayTable;

use gridform_export::export_table;
use gridform_model::{
    CellValue, ColumnType, IngestOutcome, JsonFileSink, SnapshotSink, Table, TableEditor,
    TracingNotifier, MAX_IMAGE_BYTES,
};

type Editor = TableEditor<JsonFileSink, TracingNotifier>;

fn open(file: &Path) -> Result<Editor> {
    let sink = JsonFileSink::new(file);
    let table = sink
        .load()
        .with_context(|| format!("failed to load table document {}", file.display()))?;
    Ok(TableEditor::new(table, sink, TracingNotifier))
}

pub fn init(file: &Path) -> Result<()> {
    if file.exists() {
        bail!("{} already exists", file.display());
    }
    JsonFileSink::new(file)
        .persist(&Table::new())
        .with_context(|| format!("failed to create {}", file.display()))?;
    println!("created empty table document {}", file.display());
    Ok(())
}

pub fn show(file: &Path) -> Result<()> {
    let table = open(file)?.into_table();

    let mut out = DisplayTable::new();
    let header: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("{} [{}]", c.name, type_label(c.column_type)))
        .collect();
    out.set_header(header);
    for row in &table.rows {
        let cells: Vec<String> = table
            .columns
            .iter()
            .map(|c| display_cell(row.get(&c.name)))
            .collect();
        out.add_row(cells);
    }
    println!("{out}");
    println!("{} columns, {} rows", table.columns.len(), table.rows.len());
    Ok(())
}

pub fn add_column(file: &Path) -> Result<()> {
    let mut editor = open(file)?;
    editor.add_column();
    let column = editor.table().columns.last().expect("column was just added");
    println!("added column \"{}\"", column.name);
    Ok(())
}

pub fn remove_column(file: &Path, index: usize) -> Result<()> {
    let mut editor = open(file)?;
    editor.remove_column(index)?;
    println!("removed column {index}");
    Ok(())
}

pub fn rename_column(file: &Path, index: usize, name: &str) -> Result<()> {
    let mut editor = open(file)?;
    editor.rename_column(index, name)?;
    println!("column {index} is now \"{}\"", editor.table().column(index)?.name);
    Ok(())
}

pub fn set_type(file: &Path, index: usize, column_type: ColumnType) -> Result<()> {
    let mut editor = open(file)?;
    editor.change_column_type(index, column_type)?;
    println!(
        "column {index} is now {} (cells reset)",
        type_label(column_type)
    );
    Ok(())
}

pub fn set_options(file: &Path, index: usize, options: &str) -> Result<()> {
    let mut editor = open(file)?;
    editor.update_column_options(index, options)?;
    println!(
        "column {index} options: {:?}",
        editor.table().column(index)?.options
    );
    Ok(())
}

pub fn add_row(file: &Path) -> Result<()> {
    let mut editor = open(file)?;
    editor.add_row();
    println!("added row {}", editor.table().rows.len() - 1);
    Ok(())
}

pub fn remove_row(file: &Path, index: usize) -> Result<()> {
    let mut editor = open(file)?;
    editor.remove_row(index)?;
    println!("removed row {index}");
    Ok(())
}

pub fn set_cell(file: &Path, row: usize, column: &str, raw: &str) -> Result<()> {
    let mut editor = open(file)?;

    // Boolean columns take true/false; everything else is stored as
    // raw text, selection options included.
    let is_boolean = editor
        .table()
        .columns
        .iter()
        .find(|c| c.name == column)
        .map(|c| c.column_type == ColumnType::Boolean)
        .unwrap_or(false);
    let value = if is_boolean {
        CellValue::Bool(
            raw.parse()
                .with_context(|| format!("expected true or false for boolean column, got {raw:?}"))?,
        )
    } else {
        CellValue::Text(raw.to_owned())
    };

    editor.edit_cell(row, column, value)?;
    println!("set {column}[{row}]");
    Ok(())
}

pub fn attach_image(file: &Path, row: usize, column: &str, image: &Path) -> Result<()> {
    let mut editor = open(file)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to start async runtime")?;
    let outcome = runtime.block_on(editor.attach_image(row, column, image))?;

    match outcome {
        IngestOutcome::Stored => println!("attached {} to {column}[{row}]", image.display()),
        IngestOutcome::RejectedTooLarge { size } => println!(
            "rejected: {} is {size} bytes (limit {MAX_IMAGE_BYTES})",
            image.display()
        ),
    }
    Ok(())
}

pub fn clear_image(file: &Path, row: usize, column: &str) -> Result<()> {
    let mut editor = open(file)?;
    editor.clear_image(row, column)?;
    println!("cleared {column}[{row}]");
    Ok(())
}

pub fn export(file: &Path, out: Option<&Path>) -> Result<()> {
    let table = open(file)?.into_table();
    let doc = export_table(&table);

    let target = out.unwrap_or_else(|| Path::new(&doc.filename));
    doc.write_to(target)
        .with_context(|| format!("failed to write {}", target.display()))?;
    println!(
        "exported {} rows to {} ({} bytes, {})",
        table.rows.len(),
        target.display(),
        doc.content.len(),
        doc.mime_type
    );
    Ok(())
}

fn type_label(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Text => "text",
        ColumnType::Boolean => "boolean",
        ColumnType::Selection => "selection",
        ColumnType::Image => "image",
    }
}

fn display_cell(value: Option<&CellValue>) -> String {
    match value {
        Some(CellValue::Bool(b)) => b.to_string(),
        Some(CellValue::Text(s)) if s.starts_with("data:image") => "<image>".to_owned(),
        Some(CellValue::Text(s)) => s.clone(),
        None => String::new(),
    }
}
