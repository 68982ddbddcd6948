//! Monthly forecast roll-forward.
//!
//! Projects a 12-month income statement, balance sheet and cash flow from
//! one rate assumption set and one year's approved OPEX/CAPEX totals.

pub mod cache;
pub mod engine;
pub mod error;
pub mod types;


pub use cache::ForecastCache;
pub use engine::{ForecastEngine, month_start};
pub use error::ForecastInputError;
pub use types::{
    AnnualForecastSummary, BalanceSheetLine, BalanceTreatment, CashFlowLine, FORECAST_MONTHS,
    ForecastPolicy, ForecastRun, ForecastSeeds, IncomeStatementLine, MonthlyForecastRow,
    RunningBalances,
};
