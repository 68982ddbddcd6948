//! Forecast error types.

use thiserror::Error;
use zynbudget_shared::AppError;

/// Errors raised while assembling forecast inputs.
///
/// The engine itself never fails; these come from the boundary that
/// gathers assumptions and policy before a run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForecastInputError {
    /// No rate assumption set has been saved yet.
    #[error("No budget assumptions found. Save an assumption set before running the forecast")]
    MissingAssumptions,

    /// Unknown balance sheet treatment name.
    #[error("Unknown balance sheet treatment: {0}")]
    UnknownBalanceTreatment(String),

    /// A seed or policy value is outside its accepted range.
    #[error("Forecast input '{0}' is out of range")]
    OutOfRange(&'static str),
}

impl From<ForecastInputError> for AppError {
    fn from(err: ForecastInputError) -> Self {
        match err {
            ForecastInputError::MissingAssumptions => Self::MissingInput(err.to_string()),
            ForecastInputError::UnknownBalanceTreatment(_) | ForecastInputError::OutOfRange(_) => {
                Self::Validation(err.to_string())
            }
        }
    }
}
