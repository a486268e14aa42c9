use thiserror::Error;

/// Result type for tabular operations
pub type Result<T> = std::result::Result<T, TabularError>;

/// Errors raised while reading tabular sources
#[derive(Error, Debug)]
pub enum TabularError {
    /// CSV decoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook could not be opened or decoded
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// Requested sheet does not exist in the workbook
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TabularError {
    /// Create a workbook error
    pub fn workbook(msg: impl Into<String>) -> Self {
        Self::Workbook(msg.into())
    }
}
