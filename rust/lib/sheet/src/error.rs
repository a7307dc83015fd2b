use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("row {index} out of range in sheet '{sheet}'")]
    RowOutOfRange { sheet: String, index: usize },

    #[error("sheet not found: {0}")]
    NotFound(String),
}
