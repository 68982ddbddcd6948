//! Report error types.

use thiserror::Error;
use zynbudget_shared::AppError;

/// Errors that can occur during statement export.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Unsupported statement name.
    #[error("Unknown statement: {0}")]
    UnknownStatement(String),

    /// Writing CSV failed.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the output failed.
    #[error("Export I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::UnknownStatement(_) => Self::NotFound(err.to_string()),
            ReportError::Csv(_) | ReportError::Io(_) => Self::Internal(err.to_string()),
        }
    }
}
