//! Budget input error types.

use thiserror::Error;
use zynbudget_shared::AppError;
use zynbudget_shared::types::{BudgetTransactionId, PinSubmissionId};

use super::types::TransactionStatus;
use crate::aum::FundSelection;

/// Errors raised when saving a rate assumption set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssumptionError {
    /// A rate field is negative.
    #[error("Rate '{field}' cannot be negative")]
    NegativeRate {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A forecast rate is above the accepted maximum.
    #[error("Rate '{field}' cannot exceed 10")]
    RateOutOfRange {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The version name is blank.
    #[error("Assumption version name cannot be empty")]
    EmptyVersionName,

    /// An assumption set with this version name already exists.
    #[error("Assumption version already exists: {0}")]
    DuplicateVersion(String),
}

/// Errors raised by budget transaction operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetInputError {
    /// Budget transaction not found.
    #[error("Budget transaction not found: {0}")]
    TransactionNotFound(BudgetTransactionId),

    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Amount has 17 or more integer digits.
    #[error("Amount '{0}' is out of range")]
    AmountOutOfRange(&'static str),

    /// CAPEX quantity must be at least one.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    /// A required text field is blank.
    #[error("Field '{0}' cannot be empty")]
    MissingField(&'static str),

    /// The requested status change is not allowed.
    #[error("Cannot move a submission from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: TransactionStatus,
        /// Requested status.
        to: TransactionStatus,
    },

    /// PIN submission not found.
    #[error("PIN submission not found: {0}")]
    PinSubmissionNotFound(PinSubmissionId),

    /// PIN data already submitted for this year, fund and department.
    #[error("PIN data for {fund} / {department} in {budget_year} already submitted")]
    DuplicatePinSubmission {
        /// Budget year.
        budget_year: i32,
        /// RSA fund.
        fund: FundSelection,
        /// Department.
        department: String,
    },

    /// PIN headcounts are kept for RSA funds only.
    #[error("PIN data requires an RSA fund, got {0}")]
    NotRsaFund(FundSelection),
}

impl From<AssumptionError> for AppError {
    fn from(err: AssumptionError) -> Self {
        match err {
            AssumptionError::DuplicateVersion(_) => Self::Conflict(err.to_string()),
            AssumptionError::NegativeRate { .. }
            | AssumptionError::RateOutOfRange { .. }
            | AssumptionError::EmptyVersionName => Self::Validation(err.to_string()),
        }
    }
}

impl From<BudgetInputError> for AppError {
    fn from(err: BudgetInputError) -> Self {
        match err {
            BudgetInputError::TransactionNotFound(_)
            | BudgetInputError::PinSubmissionNotFound(_) => Self::NotFound(err.to_string()),
            BudgetInputError::DuplicatePinSubmission { .. } => Self::Conflict(err.to_string()),
            BudgetInputError::InvalidStatusTransition { .. } => {
                Self::BusinessRule(err.to_string())
            }
            BudgetInputError::NegativeAmount
            | BudgetInputError::AmountOutOfRange(_)
            | BudgetInputError::NotRsaFund(_)
            | BudgetInputError::InvalidQuantity
            | BudgetInputError::MissingField(_) => Self::Validation(err.to_string()),
        }
    }
}
