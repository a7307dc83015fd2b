//! In-place row edits shared by the store implementations.

use crate::cell::Cell;
use crate::error::SheetError;

pub(crate) fn remove_at(
    sheet: &str,
    rows: &mut Vec<Vec<Cell>>,
    index: usize,
) -> Result<(), SheetError> {
    if index >= rows.len() {
        return Err(SheetError::RowOutOfRange {
            sheet: sheet.to_string(),
            index,
        });
    }
    rows.remove(index);
    Ok(())
}

pub(crate) fn replace_at(
    sheet: &str,
    rows: &mut [Vec<Cell>],
    index: usize,
    row: &[Cell],
) -> Result<(), SheetError> {
    match rows.get_mut(index) {
        Some(slot) => {
            *slot = row.to_vec();
            Ok(())
        }
        None => Err(SheetError::RowOutOfRange {
            sheet: sheet.to_string(),
            index,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid() -> Vec<Vec<Cell>> {
        vec![vec![json!("id")], vec![json!("a")], vec![json!("b")]]
    }

    #[test]
    fn remove_shifts_rows_up() {
        let mut rows = grid();
        remove_at("T", &mut rows, 1).unwrap();
        assert_eq!(rows, vec![vec![json!("id")], vec![json!("b")]]);
    }

    #[test]
    fn remove_past_end_fails() {
        let mut rows = grid();
        let err = remove_at("T", &mut rows, 3).unwrap_err();
        assert!(matches!(err, SheetError::RowOutOfRange { index: 3, .. }));
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn replace_in_place() {
        let mut rows = grid();
        replace_at("T", &mut rows, 2, &[json!("c")]).unwrap();
        assert_eq!(rows[2], vec![json!("c")]);
        assert!(replace_at("T", &mut rows, 9, &[json!("x")]).is_err());
    }
}
