//! Snapshot data types.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use zynbudget_shared::config::LedgerConfig;
use zynbudget_shared::types::SnapshotId;

use crate::forecast::MonthlyForecastRow;

/// Approval status of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SnapshotStatus {
    /// Awaiting the approver.
    #[default]
    Pending,
    /// Approved.
    Approved,
    /// Rejected.
    Rejected,
}

impl fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(label)
    }
}

/// Approver decision on a pending snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotDecision {
    /// Approve the snapshot.
    Approve,
    /// Reject the snapshot.
    Reject,
}

impl SnapshotDecision {
    /// Status the snapshot moves to.
    #[must_use]
    pub const fn resulting_status(self) -> SnapshotStatus {
        match self {
            Self::Approve => SnapshotStatus::Approved,
            Self::Reject => SnapshotStatus::Rejected,
        }
    }
}

/// GL accounts receiving the monthly staging rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceAccounts {
    /// Account for total revenue.
    pub revenue_code: String,
    /// Account for total operating expenses.
    pub expense_code: String,
}

impl Default for ReferenceAccounts {
    fn default() -> Self {
        Self {
            revenue_code: "4000".to_string(),
            expense_code: "6000".to_string(),
        }
    }
}

impl From<&LedgerConfig> for ReferenceAccounts {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            revenue_code: config.revenue_account.clone(),
            expense_code: config.expense_account.clone(),
        }
    }
}

/// One GL staging line, unique per snapshot, month and account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingRow {
    /// Owning snapshot.
    pub snapshot_id: SnapshotId,
    /// First day of the budget month.
    pub budget_month: NaiveDate,
    /// GL account code.
    pub gl_account_code: String,
    /// Signed amount: expenses negative, revenue positive.
    pub amount: Decimal,
}

/// A submitted forecast run, frozen for approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    /// Snapshot ID.
    pub id: SnapshotId,
    /// Unique version name.
    pub version_name: String,
    /// Forecast year.
    pub forecast_year: i32,
    /// Assumption set version the run used.
    pub assumption_version: String,
    /// Net profit of the last month.
    pub final_net_profit: Decimal,
    /// Closing cash of the last month.
    pub final_closing_cash: Decimal,
    /// Submitting user.
    pub submitted_by: String,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Approval status.
    pub status: SnapshotStatus,
    /// Approver, once decided.
    pub decided_by: Option<String>,
    /// Decision timestamp.
    pub decided_at: Option<DateTime<Utc>>,
    /// The twelve monthly rows.
    pub months: Vec<MonthlyForecastRow>,
}

/// Snapshot without its monthly rows, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    /// Snapshot ID.
    pub id: SnapshotId,
    /// Version name.
    pub version_name: String,
    /// Forecast year.
    pub forecast_year: i32,
    /// Net profit of the last month.
    pub final_net_profit: Decimal,
    /// Closing cash of the last month.
    pub final_closing_cash: Decimal,
    /// Approval status.
    pub status: SnapshotStatus,
    /// Submitting user.
    pub submitted_by: String,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
}

impl From<&ForecastSnapshot> for SnapshotSummary {
    fn from(s: &ForecastSnapshot) -> Self {
        Self {
            id: s.id,
            version_name: s.version_name.clone(),
            forecast_year: s.forecast_year,
            final_net_profit: s.final_net_profit,
            final_closing_cash: s.final_closing_cash,
            status: s.status,
            submitted_by: s.submitted_by.clone(),
            submitted_at: s.submitted_at,
        }
    }
}
