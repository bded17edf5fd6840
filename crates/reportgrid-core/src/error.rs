use thiserror::Error;

/// Errors raised by a spreadsheet sink while building or writing a sheet
#[derive(Error, Debug)]
pub enum SinkError {
    /// The output stream could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The workbook serializer rejected an operation
    #[error("Workbook backend error: {0}")]
    Backend(String),

    /// The in-memory sheet could not be encoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
