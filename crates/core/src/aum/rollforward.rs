//! Single-period AUM roll-forward.

use rayon::prelude::*;
use rust_decimal::Decimal;

use super::types::{AumRollForwardInput, AumRollForwardResult, Fund};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// AUM roll-forward calculator.
pub struct AumRollForward;

impl AumRollForward {
    /// Closing AUM = opening + contributions - payouts + return - fees.
    ///
    /// Pure. Percentages are 0 when opening AUM is 0. Inputs that passed
    /// [`AumRollForwardInput::validate`] never overflow.
    #[must_use]
    pub fn compute(input: &AumRollForwardInput) -> AumRollForwardResult {
        let closing_aum = input.opening_aum + input.contributions - input.payouts
            + input.investment_return
            - input.total_fees;
        let aum_growth = closing_aum - input.opening_aum;
        let net_flow = input.contributions - input.payouts;

        AumRollForwardResult {
            fund: None,
            fund_name: None,
            opening_aum: input.opening_aum,
            contributions: input.contributions,
            payouts: input.payouts,
            investment_return: input.investment_return,
            total_fees: input.total_fees,
            closing_aum,
            aum_growth,
            aum_growth_percent: Self::percent_of(aum_growth, input.opening_aum),
            net_flow,
            net_flow_percent: Self::percent_of(net_flow, input.opening_aum),
            return_on_asset_percent: Self::percent_of(input.investment_return, input.opening_aum),
        }
    }

    /// Computes the roll-forward for a directory fund.
    #[must_use]
    pub fn compute_for(fund: &Fund, input: &AumRollForwardInput) -> AumRollForwardResult {
        AumRollForwardResult {
            fund: Some(fund.selection),
            fund_name: Some(fund.name.clone()),
            ..Self::compute(input)
        }
    }

    /// Computes many funds in parallel, keeping input order.
    #[must_use]
    pub fn compute_batch(inputs: &[(Fund, AumRollForwardInput)]) -> Vec<AumRollForwardResult> {
        inputs
            .par_iter()
            .map(|(fund, input)| Self::compute_for(fund, input))
            .collect()
    }

    /// `value / base * 100`, or 0 when the base is 0 or the ratio is not
    /// representable.
    #[must_use]
    pub fn percent_of(value: Decimal, base: Decimal) -> Decimal {
        value
            .checked_div(base)
            .and_then(|ratio| ratio.checked_mul(HUNDRED))
            .unwrap_or(Decimal::ZERO)
    }
}
