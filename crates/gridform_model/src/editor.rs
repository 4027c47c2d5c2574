//! Committed mutations over a table, with write-back.
//!
//! [`TableEditor`] pairs the [`Table`] aggregate with the injected
//! sink and notifier. Every mutation that actually changes state
//! commits exactly once: the full document goes to the sink, and a
//! sink failure is surfaced through the notifier without rolling the
//! table back. The silent no-op (renaming a column to an empty or
//! unchanged name) commits nothing.

use tracing::warn;

use crate::store::{Notifier, Severity, SnapshotSink};
use crate::table::{ModelError, Table};
use crate::types::{CellValue, ColumnType};

/// Mutation surface over a table plus its injected collaborators.
pub struct TableEditor<S, N> {
    table: Table,
    sink: S,
    notifier: N,
}

impl<S: SnapshotSink, N: Notifier> TableEditor<S, N> {
    pub fn new(table: Table, sink: S, notifier: N) -> Self {
        Self {
            table,
            sink,
            notifier,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    pub(crate) fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub(crate) fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Push the current document to the sink. Failures are reported,
    /// not returned: the mutation that triggered the commit has
    /// already happened and stays.
    pub(crate) fn commit(&self) {
        if let Err(err) = self.sink.persist(&self.table) {
            warn!(error = %err, "write-back failed; in-memory table is ahead of the store");
            self.notifier.notify(&err.to_string(), Severity::Danger);
        }
    }

    pub fn add_column(&mut self) {
        self.table.add_column();
        self.commit();
    }

    pub fn remove_column(&mut self, index: usize) -> Result<(), ModelError> {
        self.table.remove_column(index)?;
        self.commit();
        Ok(())
    }

    pub fn rename_column(&mut self, index: usize, new_name: &str) -> Result<(), ModelError> {
        if self.table.rename_column(index, new_name)? {
            self.commit();
        }
        Ok(())
    }

    pub fn change_column_type(
        &mut self,
        index: usize,
        new_type: ColumnType,
    ) -> Result<(), ModelError> {
        self.table.change_column_type(index, new_type)?;
        self.commit();
        Ok(())
    }

    pub fn update_column_options(&mut self, index: usize, raw: &str) -> Result<(), ModelError> {
        self.table.update_column_options(index, raw)?;
        self.commit();
        Ok(())
    }

    pub fn add_row(&mut self) {
        self.table.add_row();
        self.commit();
    }

    pub fn remove_row(&mut self, index: usize) -> Result<(), ModelError> {
        self.table.remove_row(index)?;
        self.commit();
        Ok(())
    }

    pub fn edit_cell(
        &mut self,
        row_index: usize,
        column_name: &str,
        value: CellValue,
    ) -> Result<(), ModelError> {
        self.table.edit_cell(row_index, column_name, value)?;
        self.commit();
        Ok(())
    }

    pub fn clear_image(&mut self, row_index: usize, column_name: &str) -> Result<(), ModelError> {
        self.table.clear_image(row_index, column_name)?;
        self.commit();
        Ok(())
    }
}
