//! Snapshot construction and GL staging.

use chrono::{DateTime, Utc};
use zynbudget_shared::types::SnapshotId;

use super::error::SnapshotError;
use super::types::{ForecastSnapshot, ReferenceAccounts, SnapshotStatus, StagingRow};
use crate::forecast::{FORECAST_MONTHS, ForecastRun};

/// Snapshot service for building snapshots from forecast runs.
pub struct SnapshotService;

impl SnapshotService {
    /// Checks that a run can be frozen under the given name.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` for a blank name and `IncompleteRun` unless the
    /// run has exactly twelve months.
    pub fn validate(run: &ForecastRun, version_name: &str) -> Result<(), SnapshotError> {
        if version_name.trim().is_empty() {
            return Err(SnapshotError::EmptyName);
        }
        if run.months.len() != FORECAST_MONTHS as usize {
            return Err(SnapshotError::IncompleteRun(run.months.len()));
        }
        Ok(())
    }

    /// Checks that both staging accounts exist and differ.
    ///
    /// # Errors
    ///
    /// Returns `MissingReferenceAccounts` or `AmbiguousReferenceAccounts`.
    pub fn check_accounts<'a>(
        accounts: &ReferenceAccounts,
        known_accounts: impl IntoIterator<Item = &'a String>,
    ) -> Result<(), SnapshotError> {
        let (mut has_revenue, mut has_expense) = (false, false);
        for code in known_accounts {
            has_revenue |= *code == accounts.revenue_code;
            has_expense |= *code == accounts.expense_code;
        }

        if !(has_revenue && has_expense) {
            return Err(SnapshotError::MissingReferenceAccounts {
                revenue_code: accounts.revenue_code.clone(),
                expense_code: accounts.expense_code.clone(),
            });
        }
        if accounts.revenue_code == accounts.expense_code {
            return Err(SnapshotError::AmbiguousReferenceAccounts(
                accounts.revenue_code.clone(),
            ));
        }
        Ok(())
    }

    /// Freezes a run. Final figures are taken verbatim from the last month.
    #[must_use]
    pub fn build(
        id: SnapshotId,
        run: &ForecastRun,
        version_name: &str,
        submitted_by: &str,
        submitted_at: DateTime<Utc>,
    ) -> ForecastSnapshot {
        ForecastSnapshot {
            id,
            version_name: version_name.trim().to_string(),
            forecast_year: run.forecast_year,
            assumption_version: run.assumption_version.clone(),
            final_net_profit: run.final_net_profit(),
            final_closing_cash: run.closing_cash_final(),
            submitted_by: submitted_by.to_string(),
            submitted_at,
            status: SnapshotStatus::Pending,
            decided_by: None,
            decided_at: None,
            months: run.months.clone(),
        }
    }

    /// Two staging rows per month: expenses as `-total_opex` and revenue
    /// as `+total_revenue`.
    #[must_use]
    pub fn staging_rows(
        snapshot_id: SnapshotId,
        run: &ForecastRun,
        accounts: &ReferenceAccounts,
    ) -> Vec<StagingRow> {
        run.months
            .iter()
            .flat_map(|month| {
                [
                    StagingRow {
                        snapshot_id,
                        budget_month: month.period_start,
                        gl_account_code: accounts.expense_code.clone(),
                        amount: -month.income_statement.total_opex,
                    },
                    StagingRow {
                        snapshot_id,
                        budget_month: month.period_start,
                        gl_account_code: accounts.revenue_code.clone(),
                        amount: month.income_statement.total_revenue,
                    },
                ]
            })
            .collect()
    }
}
