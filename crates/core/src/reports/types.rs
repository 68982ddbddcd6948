//! Report data types.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReportError;

/// Financial statement of a forecast run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Income statement.
    IncomeStatement,
    /// Balance sheet.
    BalanceSheet,
    /// Cash flow statement.
    CashFlow,
}

impl StatementKind {
    /// Name used in URLs and file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IncomeStatement => "income_statement",
            Self::BalanceSheet => "balance_sheet",
            Self::CashFlow => "cash_flow",
        }
    }
}

impl FromStr for StatementKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income_statement" | "is" => Ok(Self::IncomeStatement),
            "balance_sheet" | "bs" => Ok(Self::BalanceSheet),
            "cash_flow" | "cf" => Ok(Self::CashFlow),
            other => Err(ReportError::UnknownStatement(other.to_string())),
        }
    }
}

/// One line of a statement: a description and one value per period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRow {
    /// Line description.
    pub description: String,
    /// Values in period order, rounded to 2 dp.
    pub values: Vec<Decimal>,
}

/// A statement laid out with one column per period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementTable {
    /// Statement kind.
    pub kind: StatementKind,
    /// Forecast year.
    pub forecast_year: i32,
    /// Period labels, for example `Jan-26`.
    pub periods: Vec<String>,
    /// Statement lines in display order.
    pub rows: Vec<StatementRow>,
}

impl StatementTable {
    /// Looks up a line by description.
    #[must_use]
    pub fn row(&self, description: &str) -> Option<&StatementRow> {
        self.rows.iter().find(|r| r.description == description)
    }
}
