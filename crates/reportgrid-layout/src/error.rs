use reportgrid_core::SinkError;
use thiserror::Error;

/// Failure of a whole export call
#[derive(Error, Debug)]
pub enum ExportError {
    /// The sink could not build or write the sheet
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Report configuration could not be parsed
    #[error("Invalid report configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// A content property could not be read from a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("No field named `{property}` on the record or its parent")]
    UnknownField { property: String },
}
