//! Budget assumptions, OPEX/CAPEX lines and PIN headcounts feeding the forecast.

pub mod error;
pub mod pin;
pub mod store;
pub mod types;


pub use error::{AssumptionError, BudgetInputError};
pub use pin::{CreatePinSubmissionInput, PinDataSubmission, PinHeadcountSummary, PinSubmissionKey};
pub use store::{BudgetInputStore, InMemoryBudgetInputStore};
pub use types::{
    ApprovedExpenseTotals, BudgetTransaction, CreateAssumptionInput, CreateTransactionInput,
    RateAssumptionSet, TransactionKind, TransactionStatus,
};
