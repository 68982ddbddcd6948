//! Forecast data types.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use zynbudget_shared::config::ForecastConfig;

use super::error::ForecastInputError;
use crate::limits;

/// Number of months in one forecast run.
pub const FORECAST_MONTHS: u32 = 12;

/// How AUM is placed on the projected balance sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceTreatment {
    /// AUM is a memo line outside both totals. Accrued investment income,
    /// tax payable and a contributed-capital plug keep the sheet balanced.
    #[default]
    AumAsMemo,
    /// AUM on both sides, tax and investment income off the sheet.
    /// Totals diverge and the row is flagged unbalanced.
    AsObserved,
}

impl FromStr for BalanceTreatment {
    type Err = ForecastInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aum_as_memo" | "memo" => Ok(Self::AumAsMemo),
            "as_observed" | "observed" => Ok(Self::AsObserved),
            other => Err(ForecastInputError::UnknownBalanceTreatment(other.to_string())),
        }
    }
}

/// Policy constants applied to every month of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForecastPolicy {
    /// Flat tax rate on profit before tax.
    pub tax_rate: Decimal,
    /// Liabilities, held constant through the year.
    pub initial_liabilities: Decimal,
    /// Balance sheet treatment of AUM.
    pub balance_treatment: BalanceTreatment,
}

impl Default for ForecastPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(30, 2),
            initial_liabilities: Decimal::from(1_000_000_000_i64),
            balance_treatment: BalanceTreatment::AumAsMemo,
        }
    }
}

impl ForecastPolicy {
    /// Builds the policy from application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured balance treatment is unknown, the
    /// tax rate is outside `[0, 1]` or the liabilities are out of range.
    pub fn from_config(config: &ForecastConfig) -> Result<Self, ForecastInputError> {
        if !(Decimal::ZERO..=Decimal::ONE).contains(&config.tax_rate) {
            return Err(ForecastInputError::OutOfRange("tax_rate"));
        }
        if !limits::amount_in_range(config.initial_liabilities) {
            return Err(ForecastInputError::OutOfRange("initial_liabilities"));
        }
        Ok(Self {
            tax_rate: config.tax_rate,
            initial_liabilities: config.initial_liabilities,
            balance_treatment: config.balance_treatment.parse()?,
        })
    }
}

/// Opening balances of month 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForecastSeeds {
    /// Opening assets under management.
    pub initial_aum: Decimal,
    /// Opening cash.
    pub initial_cash: Decimal,
    /// Opening retained earnings.
    #[serde(default)]
    pub initial_retained_earnings: Decimal,
}

impl Default for ForecastSeeds {
    fn default() -> Self {
        Self {
            initial_aum: Decimal::from(5_000_000_000_i64),
            initial_cash: Decimal::from(1_000_000_000_i64),
            initial_retained_earnings: Decimal::ZERO,
        }
    }
}

impl ForecastSeeds {
    /// Builds the default seeds from application configuration.
    #[must_use]
    pub const fn from_config(config: &ForecastConfig) -> Self {
        Self {
            initial_aum: config.initial_aum,
            initial_cash: config.initial_cash,
            initial_retained_earnings: Decimal::ZERO,
        }
    }

    /// Checks every seed is inside the accepted amount range.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` naming the first seed with 17 or more integer digits.
    pub fn validate(&self) -> Result<(), ForecastInputError> {
        [
            ("initial_aum", self.initial_aum),
            ("initial_cash", self.initial_cash),
            ("initial_retained_earnings", self.initial_retained_earnings),
        ]
        .into_iter()
        .find(|(_, value)| !limits::amount_in_range(*value))
        .map_or(Ok(()), |(field, _)| Err(ForecastInputError::OutOfRange(field)))
    }
}

/// Balances carried from one month to the next.
///
/// Every field is the closing value of the previous month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalances {
    /// Assets under management.
    pub aum: Decimal,
    /// Cash.
    pub cash: Decimal,
    /// Retained earnings.
    pub retained_earnings: Decimal,
    /// Investment return recognized but not received in cash.
    pub accrued_investment_income: Decimal,
    /// Tax recognized but not paid.
    pub tax_payable: Decimal,
}

impl RunningBalances {
    /// Month-0 opening balances.
    #[must_use]
    pub const fn opening(seeds: &ForecastSeeds) -> Self {
        Self {
            aum: seeds.initial_aum,
            cash: seeds.initial_cash,
            retained_earnings: seeds.initial_retained_earnings,
            accrued_investment_income: Decimal::ZERO,
            tax_payable: Decimal::ZERO,
        }
    }
}

/// Income statement view of one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IncomeStatementLine {
    /// Management fee revenue.
    pub revenue_mgmt_fee: Decimal,
    /// Administration fee revenue.
    pub revenue_admin_fee: Decimal,
    /// Fee revenue total.
    pub total_revenue: Decimal,
    /// Staff costs.
    pub staff_costs: Decimal,
    /// Administrative expenses.
    pub admin_expenses: Decimal,
    /// Operating expense total.
    pub total_opex: Decimal,
    /// Investment return on AUM.
    pub investment_return: Decimal,
    /// Profit before tax.
    pub profit_before_tax: Decimal,
    /// Tax.
    pub tax: Decimal,
    /// Net profit.
    pub net_profit: Decimal,
}

impl IncomeStatementLine {
    /// Copy rounded to `dp` decimal places.
    #[must_use]
    pub fn round_dp(&self, dp: u32) -> Self {
        Self {
            revenue_mgmt_fee: self.revenue_mgmt_fee.round_dp(dp),
            revenue_admin_fee: self.revenue_admin_fee.round_dp(dp),
            total_revenue: self.total_revenue.round_dp(dp),
            staff_costs: self.staff_costs.round_dp(dp),
            admin_expenses: self.admin_expenses.round_dp(dp),
            total_opex: self.total_opex.round_dp(dp),
            investment_return: self.investment_return.round_dp(dp),
            profit_before_tax: self.profit_before_tax.round_dp(dp),
            tax: self.tax.round_dp(dp),
            net_profit: self.net_profit.round_dp(dp),
        }
    }
}

/// Balance sheet view of one month, at closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceSheetLine {
    /// Cash at the start of the month.
    pub opening_cash: Decimal,
    /// Cash at the end of the month.
    pub cash_balance: Decimal,
    /// Cumulative capitalized CAPEX.
    pub fixed_assets: Decimal,
    /// Cumulative investment return not received in cash.
    pub accrued_investment_income: Decimal,
    /// Total assets.
    pub total_assets: Decimal,
    /// Liabilities.
    pub liabilities: Decimal,
    /// Cumulative tax not yet paid.
    pub tax_payable: Decimal,
    /// Opening equity not explained by retained earnings.
    pub contributed_capital: Decimal,
    /// Retained earnings.
    pub retained_earnings: Decimal,
    /// Closing AUM.
    pub aum_liability: Decimal,
    /// Total liabilities and equity.
    pub total_liabilities_and_equity: Decimal,
    /// Whether both totals agree.
    pub is_balanced: bool,
}

impl BalanceSheetLine {
    /// Copy rounded to `dp` decimal places. `is_balanced` is kept as computed.
    #[must_use]
    pub fn round_dp(&self, dp: u32) -> Self {
        Self {
            opening_cash: self.opening_cash.round_dp(dp),
            cash_balance: self.cash_balance.round_dp(dp),
            fixed_assets: self.fixed_assets.round_dp(dp),
            accrued_investment_income: self.accrued_investment_income.round_dp(dp),
            total_assets: self.total_assets.round_dp(dp),
            liabilities: self.liabilities.round_dp(dp),
            tax_payable: self.tax_payable.round_dp(dp),
            contributed_capital: self.contributed_capital.round_dp(dp),
            retained_earnings: self.retained_earnings.round_dp(dp),
            aum_liability: self.aum_liability.round_dp(dp),
            total_liabilities_and_equity: self.total_liabilities_and_equity.round_dp(dp),
            is_balanced: self.is_balanced,
        }
    }
}

/// Cash flow view of one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CashFlowLine {
    /// Fee revenue less operating expenses.
    pub net_cash_from_operations: Decimal,
    /// Negative monthly CAPEX.
    pub net_cash_from_investing: Decimal,
    /// Always zero.
    pub net_cash_from_financing: Decimal,
    /// Sum of the three sections.
    pub net_change_in_cash: Decimal,
    /// Cash at the start of the month.
    pub opening_cash: Decimal,
    /// Cash at the end of the month.
    pub closing_cash: Decimal,
}

impl CashFlowLine {
    /// Copy rounded to `dp` decimal places.
    #[must_use]
    pub fn round_dp(&self, dp: u32) -> Self {
        Self {
            net_cash_from_operations: self.net_cash_from_operations.round_dp(dp),
            net_cash_from_investing: self.net_cash_from_investing.round_dp(dp),
            net_cash_from_financing: self.net_cash_from_financing.round_dp(dp),
            net_change_in_cash: self.net_change_in_cash.round_dp(dp),
            opening_cash: self.opening_cash.round_dp(dp),
            closing_cash: self.closing_cash.round_dp(dp),
        }
    }
}

/// One projected month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyForecastRow {
    /// Forecast year.
    pub forecast_year: i32,
    /// Month index, 0 to 11.
    pub month_index: u32,
    /// Display label such as `Jan-26`.
    pub period: String,
    /// First day of the month.
    pub period_start: NaiveDate,
    /// AUM at the start of the month.
    pub opening_aum: Decimal,
    /// AUM at the end of the month.
    pub closing_aum: Decimal,
    /// Income statement.
    pub income_statement: IncomeStatementLine,
    /// Balance sheet.
    pub balance_sheet: BalanceSheetLine,
    /// Cash flow.
    pub cash_flow: CashFlowLine,
}

impl MonthlyForecastRow {
    /// Copy with every amount rounded to `dp` decimal places.
    #[must_use]
    pub fn round_dp(&self, dp: u32) -> Self {
        Self {
            period: self.period.clone(),
            opening_aum: self.opening_aum.round_dp(dp),
            closing_aum: self.closing_aum.round_dp(dp),
            income_statement: self.income_statement.round_dp(dp),
            balance_sheet: self.balance_sheet.round_dp(dp),
            cash_flow: self.cash_flow.round_dp(dp),
            ..*self
        }
    }
}

/// Sums of a run's income statement plus its closing positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnnualForecastSummary {
    /// Total fee revenue.
    pub total_revenue: Decimal,
    /// Total operating expenses.
    pub total_opex: Decimal,
    /// Total investment return.
    pub investment_return: Decimal,
    /// Total profit before tax.
    pub profit_before_tax: Decimal,
    /// Total tax.
    pub tax: Decimal,
    /// Total net profit.
    pub net_profit: Decimal,
    /// Closing cash of the last month.
    pub closing_cash: Decimal,
    /// Closing AUM of the last month.
    pub closing_aum: Decimal,
}

impl AnnualForecastSummary {
    /// Copy rounded to `dp` decimal places.
    #[must_use]
    pub fn round_dp(&self, dp: u32) -> Self {
        Self {
            total_revenue: self.total_revenue.round_dp(dp),
            total_opex: self.total_opex.round_dp(dp),
            investment_return: self.investment_return.round_dp(dp),
            profit_before_tax: self.profit_before_tax.round_dp(dp),
            tax: self.tax.round_dp(dp),
            net_profit: self.net_profit.round_dp(dp),
            closing_cash: self.closing_cash.round_dp(dp),
            closing_aum: self.closing_aum.round_dp(dp),
        }
    }
}

/// A complete 12-month projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRun {
    /// Forecast year.
    pub forecast_year: i32,
    /// Version name of the assumption set used.
    pub assumption_version: String,
    /// Policy the run was computed with.
    pub policy: ForecastPolicy,
    /// Opening seeds.
    pub seeds: ForecastSeeds,
    /// Monthly rows in calendar order.
    pub months: Vec<MonthlyForecastRow>,
    /// True when no approved OPEX existed for the year.
    #[serde(default)]
    pub incomplete_inputs: bool,
    /// Whether this run was served from the cache.
    #[serde(default)]
    pub cached: bool,
}

impl ForecastRun {
    /// The last projected month.
    #[must_use]
    pub fn final_month(&self) -> Option<&MonthlyForecastRow> {
        self.months.last()
    }

    /// Net profit of the last month, not the annual sum.
    #[must_use]
    pub fn final_net_profit(&self) -> Decimal {
        self.final_month()
            .map_or(Decimal::ZERO, |m| m.income_statement.net_profit)
    }

    /// Closing cash of the last month.
    #[must_use]
    pub fn closing_cash_final(&self) -> Decimal {
        self.final_month()
            .map_or(Decimal::ZERO, |m| m.cash_flow.closing_cash)
    }

    /// Returns true if every month balances.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.months.iter().all(|m| m.balance_sheet.is_balanced)
    }

    /// Copy for presentation, every amount rounded to `dp` decimal places.
    #[must_use]
    pub fn round_dp(&self, dp: u32) -> Self {
        Self {
            assumption_version: self.assumption_version.clone(),
            months: self.months.iter().map(|m| m.round_dp(dp)).collect(),
            ..*self
        }
    }

    /// Annual sums of the income statement.
    #[must_use]
    pub fn annual_totals(&self) -> AnnualForecastSummary {
        let mut summary = self
            .months
            .iter()
            .fold(AnnualForecastSummary::default(), |mut acc, m| {
                let is = &m.income_statement;
                acc.total_revenue += is.total_revenue;
                acc.total_opex += is.total_opex;
                acc.investment_return += is.investment_return;
                acc.profit_before_tax += is.profit_before_tax;
                acc.tax += is.tax;
                acc.net_profit += is.net_profit;
                acc
            });

        if let Some(last) = self.final_month() {
            summary.closing_cash = last.cash_flow.closing_cash;
            summary.closing_aum = last.closing_aum;
        }
        summary
    }
}
