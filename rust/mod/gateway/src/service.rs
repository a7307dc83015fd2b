//! The tabular store gateway.
//!
//! Maps read/save/add/delete/update onto a [`SheetStore`]. Row lookup is a
//! linear scan over the data rows comparing the first column as a string, so
//! update and delete are O(n) and act on the first match only.
//!
//! Access is serialized per table: `read` holds the table's lock shared,
//! every write holds it exclusively for its whole read-modify-write.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use serde_json::Value;
use tracing::{debug, info};

use mdp_core::GatewayError;
use mdp_sheet::{Cell, SheetError, SheetStore, cell_to_string, normalize_cell};

use crate::model::RowObject;
use crate::schema::TableSchemas;

#[derive(Clone, Copy)]
enum Access {
    Shared,
    Exclusive,
}

pub struct Gateway {
    store: Arc<dyn SheetStore>,
    schemas: Arc<TableSchemas>,
    locks: Mutex<HashMap<String, Arc<RwLock<()>>>>,
}

impl Gateway {
    pub fn new(store: Arc<dyn SheetStore>, schemas: Arc<TableSchemas>) -> Self {
        Self {
            store,
            schemas,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn schemas(&self) -> &TableSchemas {
        &self.schemas
    }

    /// Run `op` under `table`'s lock, held shared or exclusive.
    ///
    /// The map only holds locks for tables with an operation in flight: the
    /// entry is dropped again once no other caller holds a clone.
    fn locked<T>(
        &self,
        table: &str,
        access: Access,
        op: impl FnOnce() -> Result<T, GatewayError>,
    ) -> Result<T, GatewayError> {
        let lock = {
            let mut locks = self.locks.lock().map_err(poisoned)?;
            Arc::clone(locks.entry(table.to_string()).or_default())
        };

        let result = match access {
            Access::Shared => lock.read().map_err(poisoned).and_then(|_guard| op()),
            Access::Exclusive => lock.write().map_err(poisoned).and_then(|_guard| op()),
        };

        // Clones are only taken under the map mutex, so a count of two (map
        // plus ours) cannot rise while we hold it.
        let mut locks = self.locks.lock().map_err(poisoned)?;
        if Arc::strong_count(&lock) == 2 {
            locks.remove(table);
        }
        result
    }

    #[cfg(test)]
    fn lock_count(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    /// All data rows of `table`, keyed by the stored header.
    ///
    /// A missing table or one holding only a header reads as empty.
    pub fn read(&self, table: &str) -> Result<Vec<RowObject>, GatewayError> {
        let rows = self.locked(table, Access::Shared, || {
            self.store.get_rows(table).map_err(storage)
        })?;

        let rows = match rows {
            Some(rows) if rows.len() > 1 => rows,
            _ => return Ok(Vec::new()),
        };

        let headers: Vec<String> = rows[0].iter().map(cell_to_string).collect();
        let objects: Vec<RowObject> = rows[1..]
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(j, name)| (name.clone(), row.get(j).cloned().unwrap_or_else(blank)))
                    .collect::<RowObject>()
            })
            .collect();
        Ok(objects)
    }

    /// Replace the contents of `table` with the header plus `rows`.
    ///
    /// Returns the number of data rows written.
    pub fn save(&self, table: &str, rows: &[&RowObject]) -> Result<usize, GatewayError> {
        let columns = self.columns_for(table);
        let mut grid = Vec::with_capacity(rows.len() + 1);
        grid.push(header_cells(columns));
        grid.extend(rows.iter().map(|row| schema_row(columns, row)));

        self.locked(table, Access::Exclusive, || {
            self.store.overwrite_rows(table, &grid).map_err(storage)
        })?;
        info!("Saved {} rows to '{}'", rows.len(), table);
        Ok(rows.len())
    }

    /// Append `row` to `table`, writing the header first if the table is new.
    pub fn add(&self, table: &str, row: &RowObject) -> Result<(), GatewayError> {
        let columns = self.columns_for(table);
        self.locked(table, Access::Exclusive, || {
            let has_header = matches!(
                self.store.get_rows(table).map_err(storage)?,
                Some(rows) if !rows.is_empty()
            );
            if !has_header {
                self.store.create_sheet(table).map_err(storage)?;
                self.store
                    .append_row(table, &header_cells(columns))
                    .map_err(storage)?;
            }

            self.store
                .append_row(table, &schema_row(columns, row))
                .map_err(storage)
        })?;
        debug!("Added row to '{}'", table);
        Ok(())
    }

    /// Remove the first data row whose id equals `id`.
    pub fn delete(&self, table: &str, id: &Value) -> Result<(), GatewayError> {
        let index = self.locked(table, Access::Exclusive, || {
            let rows = self
                .store
                .get_rows(table)
                .map_err(storage)?
                .ok_or(GatewayError::SheetNotFound)?;
            let index = find_row(&rows, id).ok_or(GatewayError::IdNotFound)?;
            self.store.delete_row(table, index).map_err(storage)?;
            Ok(index)
        })?;
        debug!("Deleted row {} of '{}'", index, table);
        Ok(())
    }

    /// Rewrite the first data row whose id equals `id`.
    ///
    /// Columns present in `partial` take its value, `null` included; the
    /// rest keep their stored cell.
    pub fn update(
        &self,
        table: &str,
        id: &Value,
        partial: &RowObject,
    ) -> Result<(), GatewayError> {
        let index = self.locked(table, Access::Exclusive, || {
            let rows = self
                .store
                .get_rows(table)
                .map_err(storage)?
                .ok_or(GatewayError::SheetNotFound)?;
            let index = find_row(&rows, id).ok_or(GatewayError::IdNotFound)?;

            let existing = &rows[index];
            let updated: Vec<Cell> = rows[0]
                .iter()
                .enumerate()
                .map(|(j, header)| match partial.get(&cell_to_string(header)) {
                    Some(value) => normalize_cell(value),
                    None => existing.get(j).cloned().unwrap_or_else(blank),
                })
                .collect();

            self.store.set_row(table, index, &updated).map_err(storage)?;
            Ok(index)
        })?;
        debug!("Updated row {} of '{}'", index, table);
        Ok(())
    }

    fn columns_for(&self, table: &str) -> &[String] {
        if !self.schemas.is_declared(table) {
            debug!("Table '{}' has no declared schema, using id only", table);
        }
        self.schemas.columns(table)
    }
}

/// Index of the first data row whose first cell matches `id` as a string.
fn find_row(rows: &[Vec<Cell>], id: &Value) -> Option<usize> {
    let wanted = cell_to_string(id);
    rows.iter()
        .enumerate()
        .skip(1)
        .find(|(_, row)| row.first().map(cell_to_string).as_deref() == Some(wanted.as_str()))
        .map(|(i, _)| i)
}

fn header_cells(columns: &[String]) -> Vec<Cell> {
    columns.iter().map(|c| Value::String(c.clone())).collect()
}

/// Lay `row` out in schema column order; absent fields are blank.
fn schema_row(columns: &[String], row: &RowObject) -> Vec<Cell> {
    columns
        .iter()
        .map(|c| row.get(c).map(normalize_cell).unwrap_or_else(blank))
        .collect()
}

fn blank() -> Cell {
    Value::String(String::new())
}

fn storage(e: SheetError) -> GatewayError {
    GatewayError::Storage(e.to_string())
}

fn poisoned<E: std::fmt::Display>(e: E) -> GatewayError {
    GatewayError::Internal(e.to_string())
}
