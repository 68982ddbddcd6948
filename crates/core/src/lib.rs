//! Core business logic for ZynBudget.
//!
//! This crate contains pure business logic with ZERO web dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `budget_input` - Rate assumptions and OPEX/CAPEX budget lines
//! - `forecast` - Twelve-month IS/BS/CF roll-forward
//! - `aum` - Single-period AUM roll-forward per fund
//! - `snapshot` - Immutable submitted forecasts and GL staging rows
//! - `reports` - Statement tables and CSV export
//! - `limits` - Accepted ranges of amounts and rates

pub mod aum;
pub mod budget_input;
pub mod forecast;
pub mod limits;
pub mod reports;
pub mod snapshot;
