pub mod cell;
pub mod error;
pub mod memory;
pub mod redb;
mod rows;
pub mod traits;

pub use cell::{Cell, cell_to_string, normalize_cell};
pub use error::SheetError;
pub use memory::MemorySheetStore;
pub use crate::redb::RedbSheetStore;
pub use traits::SheetStore;
