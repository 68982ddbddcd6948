//! Snapshot error types.

use thiserror::Error;
use zynbudget_shared::AppError;
use zynbudget_shared::types::SnapshotId;

use super::types::SnapshotStatus;

/// Forecast snapshot errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// A snapshot with this version name already exists.
    #[error("A forecast snapshot named '{0}' already exists")]
    DuplicateName(String),

    /// The revenue or expense staging account is not in the ledger.
    #[error("GL accounts {revenue_code} and {expense_code} must exist before submitting")]
    MissingReferenceAccounts {
        /// Configured revenue account.
        revenue_code: String,
        /// Configured expense account.
        expense_code: String,
    },

    /// Revenue and expense staging use the same account.
    #[error("Revenue and expense staging accounts must differ (both {0})")]
    AmbiguousReferenceAccounts(String),

    /// The run does not cover a full year.
    #[error("Forecast run has {0} months, expected 12")]
    IncompleteRun(usize),

    /// The version name is blank.
    #[error("Snapshot version name cannot be empty")]
    EmptyName,

    /// Snapshot not found.
    #[error("Forecast snapshot not found: {0}")]
    NotFound(SnapshotId),

    /// The snapshot has already been approved or rejected.
    #[error("Forecast snapshot already decided: {0}")]
    AlreadyDecided(SnapshotStatus),
}

impl From<SnapshotError> for AppError {
    fn from(err: SnapshotError) -> Self {
        let message = err.to_string();
        match err {
            SnapshotError::DuplicateName(_) => Self::Conflict(message),
            SnapshotError::MissingReferenceAccounts { .. }
            | SnapshotError::AmbiguousReferenceAccounts(_)
            | SnapshotError::AlreadyDecided(_) => Self::BusinessRule(message),
            SnapshotError::IncompleteRun(_) | SnapshotError::EmptyName => {
                Self::Validation(message)
            }
            SnapshotError::NotFound(_) => Self::NotFound(message),
        }
    }
}
