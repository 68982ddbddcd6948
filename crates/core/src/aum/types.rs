//! AUM data types.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::AumError;
use crate::limits;

/// Fund family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundType {
    /// Retirement savings account fund.
    Rsa,
    /// Managed fund.
    Managed,
}

impl FundType {
    /// Prefix used in selection keys (`RSA_1`, `MAN_1`).
    #[must_use]
    pub const fn selection_prefix(self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::Managed => "MAN",
        }
    }
}

/// A parsed fund selection such as `RSA_1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FundSelection {
    /// Fund family.
    pub fund_type: FundType,
    /// Fund ID within its family.
    pub fund_id: u32,
}

impl fmt::Display for FundSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.fund_type.selection_prefix(), self.fund_id)
    }
}

/// A fund known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fund {
    /// Fund family and ID.
    pub selection: FundSelection,
    /// Display name.
    pub name: String,
}

/// Drivers of a single-period roll-forward.
///
/// Values are taken as given; negative inputs are not rejected. Range checks
/// live in [`AumRollForwardInput::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AumRollForwardInput {
    /// AUM at the start of the period.
    pub opening_aum: Decimal,
    /// Contributions received.
    pub contributions: Decimal,
    /// Benefits paid out.
    pub payouts: Decimal,
    /// Investment return earned.
    pub investment_return: Decimal,
    /// Fees charged.
    pub total_fees: Decimal,
}

impl AumRollForwardInput {
    /// Checks every driver is a currency amount inside the accepted range.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` for 17 or more integer digits and
    /// `AmountTooPrecise` for more than two decimal places.
    pub fn validate(&self) -> Result<(), AumError> {
        for (field, value) in [
            ("opening_aum", self.opening_aum),
            ("contributions", self.contributions),
            ("payouts", self.payouts),
            ("investment_return", self.investment_return),
            ("total_fees", self.total_fees),
        ] {
            if !limits::amount_in_range(value) {
                return Err(AumError::AmountOutOfRange(field));
            }
            if !limits::is_currency_precision(value) {
                return Err(AumError::AmountTooPrecise(field));
            }
        }
        Ok(())
    }
}

/// Result of a single-period roll-forward.
///
/// Percentages are multiplied by 100 and unrounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AumRollForwardResult {
    /// Fund, when computed for a directory entry.
    pub fund: Option<FundSelection>,
    /// Fund display name.
    pub fund_name: Option<String>,
    /// AUM at the start of the period.
    pub opening_aum: Decimal,
    /// Contributions.
    pub contributions: Decimal,
    /// Payouts.
    pub payouts: Decimal,
    /// Investment return.
    pub investment_return: Decimal,
    /// Fees.
    pub total_fees: Decimal,
    /// Opening + contributions - payouts + return - fees.
    pub closing_aum: Decimal,
    /// Closing less opening.
    pub aum_growth: Decimal,
    /// Growth as a percentage of opening AUM.
    pub aum_growth_percent: Decimal,
    /// Contributions less payouts.
    pub net_flow: Decimal,
    /// Net flow as a percentage of opening AUM.
    pub net_flow_percent: Decimal,
    /// Investment return as a percentage of opening AUM.
    pub return_on_asset_percent: Decimal,
}
