//! AUM error types.

use thiserror::Error;
use zynbudget_shared::AppError;

use super::types::FundSelection;

/// AUM roll-forward errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AumError {
    /// Fund selection is empty, a group header, or not `<TYPE>_<id>`.
    #[error("Malformed fund selection: '{0}'")]
    MalformedSelection(String),

    /// The selected fund is not in the directory.
    #[error("Fund not found: {0}")]
    FundNotFound(FundSelection),

    /// An amount has 17 or more integer digits.
    #[error("Amount '{0}' is out of range")]
    AmountOutOfRange(&'static str),

    /// An amount has more than two decimal places.
    #[error("Amount '{0}' has more than 2 decimal places")]
    AmountTooPrecise(&'static str),
}

impl From<AumError> for AppError {
    fn from(err: AumError) -> Self {
        match err {
            AumError::MalformedSelection(_)
            | AumError::AmountOutOfRange(_)
            | AumError::AmountTooPrecise(_) => Self::Validation(err.to_string()),
            AumError::FundNotFound(_) => Self::NotFound(err.to_string()),
        }
    }
}
