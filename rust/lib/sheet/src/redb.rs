use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};
use tracing::{debug, info};

use crate::cell::Cell;
use crate::error::SheetError;
use crate::rows;
use crate::traits::SheetStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("sheets");

/// RedbSheetStore is a SheetStore backed by redb, a pure-Rust embedded
/// key-value database.
///
/// Each sheet is one entry: the key is the sheet name and the value is the
/// JSON-encoded row grid. Every trait call runs in a single redb transaction.
pub struct RedbSheetStore {
    db: Arc<Database>,
}

impl RedbSheetStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, SheetError> {
        let db = Database::create(path).map_err(storage)?;

        // Ensure the table exists by doing a write transaction.
        let write_txn = db.begin_write().map_err(storage)?;
        {
            let _table = write_txn.open_table(TABLE).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Load a sheet, apply `edit`, and write it back in one transaction.
    ///
    /// A missing sheet starts out empty when `create` is set and is reported
    /// as `SheetError::NotFound` otherwise.
    fn modify<F>(&self, sheet: &str, create: bool, edit: F) -> Result<(), SheetError>
    where
        F: FnOnce(&mut Vec<Vec<Cell>>) -> Result<(), SheetError>,
    {
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(storage)?;

            let existing = match table.get(sheet).map_err(storage)? {
                Some(val) => Some(decode(val.value())?),
                None => None,
            };
            let mut grid = match existing {
                Some(grid) => grid,
                None if create => {
                    info!("Creating sheet '{}'", sheet);
                    Vec::new()
                }
                None => return Err(SheetError::NotFound(sheet.to_string())),
            };

            edit(&mut grid)?;

            let data = encode(&grid)?;
            table.insert(sheet, data.as_slice()).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;
        Ok(())
    }
}

impl SheetStore for RedbSheetStore {
    fn get_rows(&self, sheet: &str) -> Result<Option<Vec<Vec<Cell>>>, SheetError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn.open_table(TABLE).map_err(storage)?;

        match table.get(sheet).map_err(storage)? {
            Some(val) => Ok(Some(decode(val.value())?)),
            None => Ok(None),
        }
    }

    fn create_sheet(&self, sheet: &str) -> Result<(), SheetError> {
        self.modify(sheet, true, |_| Ok(()))
    }

    fn overwrite_rows(&self, sheet: &str, rows: &[Vec<Cell>]) -> Result<(), SheetError> {
        debug!("overwrite {} rows in '{}'", rows.len(), sheet);
        self.modify(sheet, true, |grid| {
            *grid = rows.to_vec();
            Ok(())
        })
    }

    fn append_row(&self, sheet: &str, row: &[Cell]) -> Result<(), SheetError> {
        debug!("append row to '{}'", sheet);
        self.modify(sheet, true, |grid| {
            grid.push(row.to_vec());
            Ok(())
        })
    }

    fn delete_row(&self, sheet: &str, index: usize) -> Result<(), SheetError> {
        debug!("delete row {} of '{}'", index, sheet);
        self.modify(sheet, false, |grid| rows::remove_at(sheet, grid, index))
    }

    fn set_row(&self, sheet: &str, index: usize, row: &[Cell]) -> Result<(), SheetError> {
        debug!("set row {} of '{}'", index, sheet);
        self.modify(sheet, false, |grid| rows::replace_at(sheet, grid, index, row))
    }

    fn sheet_names(&self) -> Result<Vec<String>, SheetError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn.open_table(TABLE).map_err(storage)?;

        let mut names = Vec::new();
        for entry in table.iter().map_err(storage)? {
            let entry = entry.map_err(storage)?;
            names.push(entry.0.value().to_string());
        }
        Ok(names)
    }
}

fn storage(e: impl std::fmt::Display) -> SheetError {
    SheetError::Storage(e.to_string())
}

fn encode(grid: &[Vec<Cell>]) -> Result<Vec<u8>, SheetError> {
    serde_json::to_vec(grid).map_err(|e| SheetError::Serialization(e.to_string()))
}

fn decode(bytes: &[u8]) -> Result<Vec<Vec<Cell>>, SheetError> {
    serde_json::from_slice(bytes).map_err(|e| SheetError::Serialization(e.to_string()))
}
