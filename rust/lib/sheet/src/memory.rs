use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::{debug, info};

use crate::cell::Cell;
use crate::error::SheetError;
use crate::rows;
use crate::traits::SheetStore;

/// MemorySheetStore keeps every sheet in process memory.
///
/// Nothing is persisted; used for tests and for `backend = "memory"`.
#[derive(Default)]
pub struct MemorySheetStore {
    sheets: RwLock<BTreeMap<String, Vec<Vec<Cell>>>>,
}

impl MemorySheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<String, Vec<Vec<Cell>>>>, SheetError>
    {
        self.sheets
            .write()
            .map_err(|e| SheetError::Storage(e.to_string()))
    }

    fn existing<'a>(
        sheets: &'a mut BTreeMap<String, Vec<Vec<Cell>>>,
        sheet: &str,
    ) -> Result<&'a mut Vec<Vec<Cell>>, SheetError> {
        sheets
            .get_mut(sheet)
            .ok_or_else(|| SheetError::NotFound(sheet.to_string()))
    }
}

impl SheetStore for MemorySheetStore {
    fn get_rows(&self, sheet: &str) -> Result<Option<Vec<Vec<Cell>>>, SheetError> {
        let sheets = self
            .sheets
            .read()
            .map_err(|e| SheetError::Storage(e.to_string()))?;
        Ok(sheets.get(sheet).cloned())
    }

    fn create_sheet(&self, sheet: &str) -> Result<(), SheetError> {
        let mut sheets = self.write()?;
        if !sheets.contains_key(sheet) {
            info!("Creating sheet '{}'", sheet);
            sheets.insert(sheet.to_string(), Vec::new());
        }
        Ok(())
    }

    fn overwrite_rows(&self, sheet: &str, rows: &[Vec<Cell>]) -> Result<(), SheetError> {
        debug!("overwrite {} rows in '{}'", rows.len(), sheet);
        let mut sheets = self.write()?;
        sheets.insert(sheet.to_string(), rows.to_vec());
        Ok(())
    }

    fn append_row(&self, sheet: &str, row: &[Cell]) -> Result<(), SheetError> {
        debug!("append row to '{}'", sheet);
        let mut sheets = self.write()?;
        sheets
            .entry(sheet.to_string())
            .or_default()
            .push(row.to_vec());
        Ok(())
    }

    fn delete_row(&self, sheet: &str, index: usize) -> Result<(), SheetError> {
        debug!("delete row {} of '{}'", index, sheet);
        let mut sheets = self.write()?;
        let grid = Self::existing(&mut sheets, sheet)?;
        rows::remove_at(sheet, grid, index)
    }

    fn set_row(&self, sheet: &str, index: usize, row: &[Cell]) -> Result<(), SheetError> {
        debug!("set row {} of '{}'", index, sheet);
        let mut sheets = self.write()?;
        let grid = Self::existing(&mut sheets, sheet)?;
        rows::replace_at(sheet, grid, index, row)
    }

    fn sheet_names(&self) -> Result<Vec<String>, SheetError> {
        let sheets = self
            .sheets
            .read()
            .map_err(|e| SheetError::Storage(e.to_string()))?;
        Ok(sheets.keys().cloned().collect())
    }
}
