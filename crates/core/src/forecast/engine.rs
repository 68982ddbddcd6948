//! Twelve-month forecast roll-forward.
//!
//! A run is a fold over [`RunningBalances`]: each month reads the previous
//! month's closing balances, derives its income statement, cash flow and
//! balance sheet, and hands its own closing balances to the next month.
//! No rounding happens inside the fold.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{
    BalanceSheetLine, BalanceTreatment, CashFlowLine, FORECAST_MONTHS, ForecastPolicy,
    ForecastRun, ForecastSeeds, IncomeStatementLine, MonthlyForecastRow, RunningBalances,
};
use crate::budget_input::{ApprovedExpenseTotals, RateAssumptionSet};

/// Decimal places at which assets and liabilities plus equity must agree.
const BALANCE_TOLERANCE_DP: u32 = 9;

const HALF: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Forecast engine for the monthly IS/BS/CF projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastEngine {
    policy: ForecastPolicy,
}

impl ForecastEngine {
    /// Creates an engine with the given policy constants.
    #[must_use]
    pub const fn new(policy: ForecastPolicy) -> Self {
        Self { policy }
    }

    /// Returns the policy in use.
    #[must_use]
    pub const fn policy(&self) -> &ForecastPolicy {
        &self.policy
    }

    /// Projects twelve months from one assumption set and one year's
    /// approved totals.
    ///
    /// The forecast year is `totals.budget_year`. Pure and infallible.
    #[must_use]
    pub fn run(
        &self,
        assumptions: &RateAssumptionSet,
        totals: &ApprovedExpenseTotals,
        seeds: &ForecastSeeds,
    ) -> ForecastRun {
        let (months, _closing) = (0..FORECAST_MONTHS).fold(
            (
                Vec::with_capacity(FORECAST_MONTHS as usize),
                RunningBalances::opening(seeds),
            ),
            |(mut months, balances), month_index| {
                let (row, next) = self.step(assumptions, totals, seeds, month_index, &balances);
                months.push(row);
                (months, next)
            },
        );

        ForecastRun {
            forecast_year: totals.budget_year,
            assumption_version: assumptions.version_name.clone(),
            policy: self.policy,
            seeds: *seeds,
            months,
            incomplete_inputs: false,
            cached: false,
        }
    }

    /// Computes a single month from the previous month's closing balances.
    ///
    /// Returns the month's row and its closing balances.
    #[must_use]
    pub fn step(
        &self,
        assumptions: &RateAssumptionSet,
        totals: &ApprovedExpenseTotals,
        seeds: &ForecastSeeds,
        month_index: u32,
        opening: &RunningBalances,
    ) -> (MonthlyForecastRow, RunningBalances) {
        let months = Decimal::from(FORECAST_MONTHS);
        let aum = opening.aum;

        // Revenue and investment return accrue on opening AUM
        let aum_growth = aum * assumptions.aum_growth_rate / months;
        let investment_return = aum * assumptions.investment_return_rate / months;
        let revenue_mgmt_fee = aum * assumptions.mgmt_fee_rate / months;
        let revenue_admin_fee = aum * assumptions.admin_fee_rate / months;
        let total_revenue = revenue_mgmt_fee + revenue_admin_fee;

        let monthly_opex = totals.total_annual_opex / months;
        let monthly_capex = totals.total_annual_capex / months;

        let staff_costs = total_revenue * assumptions.staff_cost_percent;
        let admin_expenses =
            monthly_opex * (Decimal::ONE + assumptions.admin_expense_growth / months);
        let total_opex = staff_costs + admin_expenses;

        let profit_before_tax = total_revenue + investment_return - total_opex;
        let (tax, net_profit) = split_tax(profit_before_tax, self.policy.tax_rate);

        let income_statement = IncomeStatementLine {
            revenue_mgmt_fee,
            revenue_admin_fee,
            total_revenue,
            staff_costs,
            admin_expenses,
            total_opex,
            investment_return,
            profit_before_tax,
            tax,
            net_profit,
        };

        let net_cash_from_operations = total_revenue - total_opex;
        let net_cash_from_investing = -monthly_capex;
        let net_change_in_cash = net_cash_from_operations + net_cash_from_investing;

        let closing = RunningBalances {
            aum: aum + aum_growth,
            cash: opening.cash + net_change_in_cash,
            retained_earnings: opening.retained_earnings + net_profit,
            accrued_investment_income: opening.accrued_investment_income + investment_return,
            tax_payable: opening.tax_payable + tax,
        };

        let cash_flow = CashFlowLine {
            net_cash_from_operations,
            net_cash_from_investing,
            net_cash_from_financing: Decimal::ZERO,
            net_change_in_cash,
            opening_cash: opening.cash,
            closing_cash: closing.cash,
        };

        let fixed_assets = monthly_capex * Decimal::from(month_index + 1);
        let balance_sheet = self.balance_sheet(seeds, opening, &closing, fixed_assets);

        let period_start = month_start(totals.budget_year, month_index);
        let row = MonthlyForecastRow {
            forecast_year: totals.budget_year,
            month_index,
            period: period_start.format("%b-%y").to_string(),
            period_start,
            opening_aum: aum,
            closing_aum: closing.aum,
            income_statement,
            balance_sheet,
            cash_flow,
        };

        (row, closing)
    }

    /// Equity at month 0 that retained earnings do not explain.
    ///
    /// Fixed so that opening assets (cash only) equal opening liabilities
    /// plus equity.
    #[must_use]
    pub fn contributed_capital(&self, seeds: &ForecastSeeds) -> Decimal {
        seeds.initial_cash - self.policy.initial_liabilities - seeds.initial_retained_earnings
    }

    fn balance_sheet(
        &self,
        seeds: &ForecastSeeds,
        opening: &RunningBalances,
        closing: &RunningBalances,
        fixed_assets: Decimal,
    ) -> BalanceSheetLine {
        let liabilities = self.policy.initial_liabilities;

        let (accrued_investment_income, tax_payable, contributed_capital, total_assets, total_le) =
            match self.policy.balance_treatment {
                BalanceTreatment::AumAsMemo => {
                    let contributed_capital = self.contributed_capital(seeds);
                    (
                        closing.accrued_investment_income,
                        closing.tax_payable,
                        contributed_capital,
                        closing.cash + fixed_assets + closing.accrued_investment_income,
                        liabilities
                            + closing.tax_payable
                            + contributed_capital
                            + closing.retained_earnings,
                    )
                }
                BalanceTreatment::AsObserved => (
                    Decimal::ZERO,
                    Decimal::ZERO,
                    Decimal::ZERO,
                    closing.cash + fixed_assets + closing.aum,
                    liabilities + closing.retained_earnings + closing.aum,
                ),
            };

        BalanceSheetLine {
            opening_cash: opening.cash,
            cash_balance: closing.cash,
            fixed_assets,
            accrued_investment_income,
            total_assets,
            liabilities,
            tax_payable,
            contributed_capital,
            retained_earnings: closing.retained_earnings,
            aum_liability: closing.aum,
            total_liabilities_and_equity: total_le,
            is_balanced: (total_assets - total_le).round_dp(BALANCE_TOLERANCE_DP).is_zero(),
        }
    }
}

/// Splits profit before tax into `(tax, net_profit)` with an exact sum.
///
/// The larger share is taken by subtraction and the smaller one re-derived
/// from it, so both fit the scale of the larger share without rounding.
#[must_use]
pub fn split_tax(profit_before_tax: Decimal, tax_rate: Decimal) -> (Decimal, Decimal) {
    let tax = profit_before_tax * tax_rate;
    let net_profit = profit_before_tax - tax;
    if tax_rate <= HALF {
        (profit_before_tax - net_profit, net_profit)
    } else {
        let tax = profit_before_tax - net_profit;
        (tax, profit_before_tax - tax)
    }
}

/// First day of the given month of `year`.
///
/// Years outside chrono's range clamp to [`NaiveDate::MIN`].
#[must_use]
pub fn month_start(year: i32, month_index: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month_index % FORECAST_MONTHS + 1, 1).unwrap_or(NaiveDate::MIN)
}
