//! Budget input data types.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use zynbudget_shared::types::{AssumptionSetId, BudgetTransactionId};

use super::error::{AssumptionError, BudgetInputError};
use crate::limits;

/// A versioned set of forecast rate parameters.
///
/// Rates are fractions (`0.005` is half a percent) and annual unless
/// the field says otherwise; the forecast engine divides them by 12.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateAssumptionSet {
    /// Assumption set ID.
    pub id: AssumptionSetId,
    /// Unique version label.
    pub version_name: String,
    /// First month the assumptions apply to.
    pub period_start: NaiveDate,
    /// Annual management fee rate on AUM.
    pub mgmt_fee_rate: Decimal,
    /// Annual administration fee rate on AUM.
    pub admin_fee_rate: Decimal,
    /// Staff costs as a share of total revenue.
    pub staff_cost_percent: Decimal,
    /// Annual growth applied to administrative expenses.
    pub admin_expense_growth: Decimal,
    /// Annual AUM growth rate.
    pub aum_growth_rate: Decimal,
    /// Annual investment return rate on AUM.
    pub investment_return_rate: Decimal,
    /// Target current ratio. Stored only; the forecast does not use it.
    pub target_current_ratio: Decimal,
    /// Creation timestamp, used for recency ordering.
    pub created_at: DateTime<Utc>,
}

/// Input for saving a new assumption set.
///
/// Omitted rates take the house defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssumptionInput {
    /// Unique version label.
    pub version_name: String,
    /// First month the assumptions apply to.
    pub period_start: NaiveDate,
    /// Annual management fee rate.
    #[serde(default = "default_mgmt_fee_rate")]
    pub mgmt_fee_rate: Decimal,
    /// Annual administration fee rate.
    #[serde(default = "default_admin_fee_rate")]
    pub admin_fee_rate: Decimal,
    /// Staff costs as a share of revenue.
    #[serde(default = "default_staff_cost_percent")]
    pub staff_cost_percent: Decimal,
    /// Annual admin expense growth.
    #[serde(default = "default_admin_expense_growth")]
    pub admin_expense_growth: Decimal,
    /// Annual AUM growth.
    #[serde(default = "default_aum_growth_rate")]
    pub aum_growth_rate: Decimal,
    /// Annual investment return.
    #[serde(default = "default_investment_return_rate")]
    pub investment_return_rate: Decimal,
    /// Target current ratio.
    #[serde(default = "default_target_current_ratio")]
    pub target_current_ratio: Decimal,
}

fn default_mgmt_fee_rate() -> Decimal {
    Decimal::new(5, 3)
}

fn default_admin_fee_rate() -> Decimal {
    Decimal::new(1, 3)
}

fn default_staff_cost_percent() -> Decimal {
    Decimal::new(25, 2)
}

fn default_admin_expense_growth() -> Decimal {
    Decimal::new(5, 2)
}

fn default_aum_growth_rate() -> Decimal {
    Decimal::new(10, 2)
}

fn default_investment_return_rate() -> Decimal {
    Decimal::new(8, 2)
}

fn default_target_current_ratio() -> Decimal {
    Decimal::new(20, 1)
}

impl CreateAssumptionInput {
    /// Creates an input with every rate at its default.
    #[must_use]
    pub fn with_defaults(version_name: impl Into<String>, period_start: NaiveDate) -> Self {
        Self {
            version_name: version_name.into(),
            period_start,
            mgmt_fee_rate: default_mgmt_fee_rate(),
            admin_fee_rate: default_admin_fee_rate(),
            staff_cost_percent: default_staff_cost_percent(),
            admin_expense_growth: default_admin_expense_growth(),
            aum_growth_rate: default_aum_growth_rate(),
            investment_return_rate: default_investment_return_rate(),
            target_current_ratio: default_target_current_ratio(),
        }
    }

    /// Checks the version name, that every rate is non-negative, and that
    /// the six forecast rates are at most [`limits::MAX_RATE`].
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), AssumptionError> {
        if self.version_name.trim().is_empty() {
            return Err(AssumptionError::EmptyVersionName);
        }

        let rates = [
            ("mgmt_fee_rate", self.mgmt_fee_rate),
            ("admin_fee_rate", self.admin_fee_rate),
            ("staff_cost_percent", self.staff_cost_percent),
            ("admin_expense_growth", self.admin_expense_growth),
            ("aum_growth_rate", self.aum_growth_rate),
            ("investment_return_rate", self.investment_return_rate),
            ("target_current_ratio", self.target_current_ratio),
        ];

        if let Some((field, _)) = rates.iter().find(|(_, rate)| *rate < Decimal::ZERO) {
            return Err(AssumptionError::NegativeRate { field: *field });
        }

        // The current ratio is reported, never multiplied into a run.
        match rates[..6].iter().find(|(_, rate)| !limits::rate_in_range(*rate)) {
            Some((field, _)) => Err(AssumptionError::RateOutOfRange { field: *field }),
            None => Ok(()),
        }
    }

    /// Builds the stored assumption set.
    #[must_use]
    pub fn into_assumption_set(self, created_at: DateTime<Utc>) -> RateAssumptionSet {
        RateAssumptionSet {
            id: AssumptionSetId::new(),
            version_name: self.version_name.trim().to_string(),
            period_start: self.period_start,
            mgmt_fee_rate: self.mgmt_fee_rate,
            admin_fee_rate: self.admin_fee_rate,
            staff_cost_percent: self.staff_cost_percent,
            admin_expense_growth: self.admin_expense_growth,
            aum_growth_rate: self.aum_growth_rate,
            investment_return_rate: self.investment_return_rate,
            target_current_ratio: self.target_current_ratio,
            created_at,
        }
    }
}

/// Budget line classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Operating expense.
    Opex,
    /// Capital expenditure.
    Capex,
}

/// Approval status of a budget line or PIN submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Counted in the approved totals.
    Approved,
    /// Rejected; may be resubmitted.
    Rejected,
}

impl TransactionStatus {
    /// Returns true if a line in this status may move to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved | Self::Rejected) | (Self::Rejected, Self::Pending)
        )
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(label)
    }
}

/// One OPEX or CAPEX budget line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetTransaction {
    /// Transaction ID.
    pub id: BudgetTransactionId,
    /// OPEX or CAPEX.
    pub kind: TransactionKind,
    /// Budget year the line belongs to.
    pub budget_year: i32,
    /// Requesting department.
    pub department: String,
    /// GL account code charged.
    pub gl_account_code: String,
    /// Free-text description.
    pub description: String,
    /// Number of units (CAPEX).
    pub quantity: u32,
    /// Cost per unit (CAPEX).
    pub unit_cost: Option<Decimal>,
    /// Annual amount.
    pub annual_amount: Decimal,
    /// Annual amount spread over twelve months, rounded to 2 dp.
    pub monthly_amount: Decimal,
    /// Approval status.
    pub status: TransactionStatus,
    /// Submitting user.
    pub submitted_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for submitting a budget line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionInput {
    /// OPEX or CAPEX.
    pub kind: TransactionKind,
    /// Budget year.
    pub budget_year: i32,
    /// Requesting department.
    pub department: String,
    /// GL account code.
    pub gl_account_code: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Annual amount. Ignored for CAPEX, which is unit cost times quantity.
    #[serde(default)]
    pub annual_amount: Decimal,
    /// Number of units.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Cost per unit.
    #[serde(default)]
    pub unit_cost: Option<Decimal>,
    /// Submitting user.
    pub submitted_by: String,
}

fn default_quantity() -> u32 {
    1
}

const MONTHS_PER_YEAR: u32 = 12;

impl CreateTransactionInput {
    /// Returns the annual amount after the CAPEX rule.
    ///
    /// CAPEX is always `unit_cost * quantity`, whatever annual amount was
    /// supplied. OPEX keeps the supplied amount.
    ///
    /// # Errors
    ///
    /// Returns `MissingField("unit_cost")` for CAPEX without a unit cost and
    /// `AmountOutOfRange` if the product has 17 or more integer digits.
    pub fn effective_annual_amount(&self) -> Result<Decimal, BudgetInputError> {
        match self.kind {
            TransactionKind::Capex => {
                let unit_cost = self
                    .unit_cost
                    .ok_or(BudgetInputError::MissingField("unit_cost"))?;
                unit_cost
                    .checked_mul(Decimal::from(self.quantity))
                    .filter(|amount| limits::amount_in_range(*amount))
                    .ok_or(BudgetInputError::AmountOutOfRange("annual_amount"))
            }
            TransactionKind::Opex => Ok(self.annual_amount),
        }
    }

    /// Validates and builds the stored transaction with status `Pending`.
    ///
    /// # Errors
    ///
    /// Returns an error for blank fields, a zero quantity, a CAPEX line
    /// without unit cost, or amounts that are negative or out of range.
    pub fn into_transaction(
        self,
        created_at: DateTime<Utc>,
    ) -> Result<BudgetTransaction, BudgetInputError> {
        if self.department.trim().is_empty() {
            return Err(BudgetInputError::MissingField("department"));
        }
        if self.gl_account_code.trim().is_empty() {
            return Err(BudgetInputError::MissingField("gl_account_code"));
        }
        if self.quantity == 0 {
            return Err(BudgetInputError::InvalidQuantity);
        }
        if self.unit_cost.is_some_and(|cost| cost < Decimal::ZERO) {
            return Err(BudgetInputError::NegativeAmount);
        }

        let annual_amount = self.effective_annual_amount()?;
        if annual_amount < Decimal::ZERO {
            return Err(BudgetInputError::NegativeAmount);
        }
        if !limits::amount_in_range(annual_amount) {
            return Err(BudgetInputError::AmountOutOfRange("annual_amount"));
        }

        let monthly_amount = (annual_amount / Decimal::from(MONTHS_PER_YEAR)).round_dp(2);

        Ok(BudgetTransaction {
            id: BudgetTransactionId::new(),
            kind: self.kind,
            budget_year: self.budget_year,
            department: self.department.trim().to_string(),
            gl_account_code: self.gl_account_code.trim().to_string(),
            description: self.description,
            quantity: self.quantity,
            unit_cost: self.unit_cost,
            annual_amount,
            monthly_amount,
            status: TransactionStatus::Pending,
            submitted_by: self.submitted_by,
            created_at,
        })
    }
}

/// Approved annual OPEX and CAPEX for one budget year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApprovedExpenseTotals {
    /// Budget year.
    pub budget_year: i32,
    /// Sum of approved OPEX annual amounts.
    pub total_annual_opex: Decimal,
    /// Sum of approved CAPEX annual amounts.
    pub total_annual_capex: Decimal,
}

impl ApprovedExpenseTotals {
    /// Totals for a year with nothing approved.
    #[must_use]
    pub const fn zero(budget_year: i32) -> Self {
        Self {
            budget_year,
            total_annual_opex: Decimal::ZERO,
            total_annual_capex: Decimal::ZERO,
        }
    }

    /// Sums the approved lines of `budget_year`, ignoring everything else.
    #[must_use]
    pub fn from_transactions<'a>(
        budget_year: i32,
        transactions: impl IntoIterator<Item = &'a BudgetTransaction>,
    ) -> Self {
        transactions
            .into_iter()
            .filter(|t| t.budget_year == budget_year && t.status == TransactionStatus::Approved)
            .fold(Self::zero(budget_year), |mut totals, t| {
                match t.kind {
                    TransactionKind::Opex => totals.total_annual_opex += t.annual_amount,
                    TransactionKind::Capex => totals.total_annual_capex += t.annual_amount,
                }
                totals
            })
    }

    /// Returns true if any approved OPEX contributes to the totals.
    #[must_use]
    pub fn has_approved_opex(&self) -> bool {
        !self.total_annual_opex.is_zero()
    }
}
