//! The table aggregate and its mutation operations.
//!
//! A [`Table`] owns an ordered list of columns and the rows that mirror
//! them. Every schema-level change (remove, rename, retype) cascades
//! into each row's corresponding key, so after any operation the key
//! set of every row equals the current column names.
//!
//! Index arguments are validated: an out-of-range column or row index
//! is a precondition violation and returns [`ModelError`] instead of
//! panicking. Column *names*, by contrast, are accepted uncritically -
//! the model enforces no name uniqueness and [`Table::edit_cell`]
//! writes whatever key it is given, matching the widget this model
//! backs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::{CellValue, Column, ColumnType};

/// One record, keyed by column name.
pub type Row = HashMap<String, CellValue>;

/// Errors raised by table mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("column index {index} out of range ({len} columns)")]
    ColumnIndexOutOfRange { index: usize, len: usize },

    #[error("row index {index} out of range ({len} rows)")]
    RowIndexOutOfRange { index: usize, len: usize },
}

/// A schema-mutable table: ordered columns plus the rows that follow
/// them. This is the whole persisted document - serializing a `Table`
/// yields the `{columns, rows}` snapshot shape, and deserializing
/// tolerates the legacy bare-string column form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    /// An empty table: no columns, no rows.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(&self, index: usize) -> Result<&Column, ModelError> {
        self.columns.get(index).ok_or(ModelError::ColumnIndexOutOfRange {
            index,
            len: self.columns.len(),
        })
    }

    fn check_row(&self, index: usize) -> Result<(), ModelError> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(ModelError::RowIndexOutOfRange {
                index,
                len: self.rows.len(),
            })
        }
    }

    /// Append a text column with a generated `Column {n+1}` label.
    ///
    /// Rows only receive the type default for the new key when it is
    /// absent: a re-added label recovers any stale value left behind by
    /// an earlier removal instead of resetting it.
    pub fn add_column(&mut self) -> &Column {
        let label = format!("Column {}", self.columns.len() + 1);
        let column = Column::new(label, ColumnType::Text);
        for row in &mut self.rows {
            row.entry(column.name.clone())
                .or_insert_with(|| column.column_type.default_value());
        }
        debug!(name = %column.name, "column added");
        self.columns.push(column);
        self.columns.last().expect("column was just pushed")
    }

    /// Remove the column at `index`, deleting its key from every row.
    pub fn remove_column(&mut self, index: usize) -> Result<Column, ModelError> {
        self.column(index)?;
        let column = self.columns.remove(index);
        for row in &mut self.rows {
            row.remove(&column.name);
        }
        debug!(name = %column.name, "column removed");
        Ok(column)
    }

    /// Rename the column at `index`, moving each row's value from the
    /// old key to the new one.
    ///
    /// An empty or unchanged name is a silent no-op and returns
    /// `Ok(false)`. A rename onto another column's name silently
    /// overwrites that column's row values; no collision detection is
    /// performed.
    pub fn rename_column(&mut self, index: usize, new_name: &str) -> Result<bool, ModelError> {
        let old_name = self.column(index)?.name.clone();
        if new_name.is_empty() || new_name == old_name {
            return Ok(false);
        }

        for row in &mut self.rows {
            if let Some(value) = row.remove(&old_name) {
                row.insert(new_name.to_owned(), value);
            }
        }
        self.columns[index].name = new_name.to_owned();
        debug!(from = %old_name, to = %new_name, "column renamed");
        Ok(true)
    }

    /// Change the type of the column at `index`, resetting every row's
    /// cell for that column to the new type's default.
    ///
    /// Retype discards the prior value rather than coercing it. The
    /// option list is left alone, so switching away from `selection`
    /// and back preserves it.
    pub fn change_column_type(
        &mut self,
        index: usize,
        new_type: ColumnType,
    ) -> Result<(), ModelError> {
        self.column(index)?;
        self.columns[index].column_type = new_type;
        let name = self.columns[index].name.clone();
        for row in &mut self.rows {
            row.insert(name.clone(), new_type.default_value());
        }
        debug!(name = %name, new_type = ?new_type, "column retyped");
        Ok(())
    }

    /// Replace the option list of the column at `index` from raw
    /// comma-separated text. Segments are trimmed, empty segments are
    /// dropped, order and duplicates are preserved.
    pub fn update_column_options(&mut self, index: usize, raw: &str) -> Result<(), ModelError> {
        self.column(index)?;
        self.columns[index].options = parse_options(raw);
        Ok(())
    }

    /// Append a row holding one type-default cell per current column.
    pub fn add_row(&mut self) -> &Row {
        let row: Row = self
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.column_type.default_value()))
            .collect();
        self.rows.push(row);
        debug!(rows = self.rows.len(), "row added");
        self.rows.last().expect("row was just pushed")
    }

    /// Remove the row at `index`.
    pub fn remove_row(&mut self, index: usize) -> Result<Row, ModelError> {
        self.check_row(index)?;
        Ok(self.rows.remove(index))
    }

    /// Store `value` into the named cell of row `row_index`, verbatim.
    ///
    /// No coercion and no validation against selection options: any
    /// string is accepted for any text-like column, and booleans are
    /// stored as given.
    pub fn edit_cell(
        &mut self,
        row_index: usize,
        column_name: &str,
        value: CellValue,
    ) -> Result<(), ModelError> {
        self.check_row(row_index)?;
        self.rows[row_index].insert(column_name.to_owned(), value);
        Ok(())
    }

    /// Reset the named image cell to an empty string.
    pub fn clear_image(&mut self, row_index: usize, column_name: &str) -> Result<(), ModelError> {
        self.edit_cell(row_index, column_name, CellValue::Text(String::new()))
    }
}

fn parse_options(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
