use crate::cell::Cell;
use crate::error::SheetError;

/// SheetStore is the persistent tabular backend behind the gateway.
///
/// A sheet is an ordered list of rows. Row indexes are zero-based and count
/// the header row, so the first data row is index 1. Implementations must
/// make each call atomic on its own; callers coordinate multi-call sequences.
pub trait SheetStore: Send + Sync {
    /// Get all rows of a sheet, header included. Returns None if the sheet
    /// does not exist.
    fn get_rows(&self, sheet: &str) -> Result<Option<Vec<Vec<Cell>>>, SheetError>;

    /// Create an empty sheet. No-op if it already exists.
    fn create_sheet(&self, sheet: &str) -> Result<(), SheetError>;

    /// Replace every row of a sheet, creating the sheet if absent.
    fn overwrite_rows(&self, sheet: &str, rows: &[Vec<Cell>]) -> Result<(), SheetError>;

    /// Append a row after the last row, creating the sheet if absent.
    fn append_row(&self, sheet: &str, row: &[Cell]) -> Result<(), SheetError>;

    /// Remove the row at `index`, shifting later rows up.
    fn delete_row(&self, sheet: &str, index: usize) -> Result<(), SheetError>;

    /// Overwrite the row at `index` in place.
    fn set_row(&self, sheet: &str, index: usize, row: &[Cell]) -> Result<(), SheetError>;

    /// Names of all sheets, sorted.
    fn sheet_names(&self) -> Result<Vec<String>, SheetError>;
}
