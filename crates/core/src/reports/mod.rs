//! Forecast statement layout and export.
//!
//! Turns a forecast run into period-column tables (description, then one
//! column per month) and writes them as CSV.

pub mod error;
pub mod service;
pub mod types;

pub use error::ReportError;
pub use service::ReportService;
pub use types::{StatementKind, StatementRow, StatementTable};
