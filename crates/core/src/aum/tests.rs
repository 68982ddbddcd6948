//! Tests for the AUM roll-forward.

use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use zynbudget_shared::config::{FundEntry, FundsConfig};

use super::directory::FundDirectory;
use super::error::AumError;
use super::rollforward::AumRollForward;
use super::types::{AumRollForwardInput, Fund, FundSelection, FundType};
use crate::limits::MAX_AMOUNT;

fn decimal_strategy() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000_000i64..1_000_000_000_000, 0u32..=4)
        .prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

fn input(
    opening: Decimal,
    contributions: Decimal,
    payouts: Decimal,
    ret: Decimal,
    fees: Decimal,
) -> AumRollForwardInput {
    AumRollForwardInput {
        opening_aum: opening,
        contributions,
        payouts,
        investment_return: ret,
        total_fees: fees,
    }
}

fn directory() -> FundDirectory {
    FundDirectory::from_config(&FundsConfig {
        rsa: vec![
            FundEntry {
                id: 1,
                name: "RSA Fund I".to_string(),
            },
            FundEntry {
                id: 2,
                name: "RSA Fund II".to_string(),
            },
        ],
        managed: vec![FundEntry {
            id: 1,
            name: "CBN Retiree".to_string(),
        }],
    })
}

proptest! {
    /// Closing AUM is exactly opening + contributions - payouts + return - fees.
    #[test]
    fn test_closing_identity(
        opening in decimal_strategy(),
        contributions in decimal_strategy(),
        payouts in decimal_strategy(),
        ret in decimal_strategy(),
        fees in decimal_strategy(),
    ) {
        let result = AumRollForward::compute(&input(opening, contributions, payouts, ret, fees));

        prop_assert_eq!(result.closing_aum, opening + contributions - payouts + ret - fees);
        prop_assert_eq!(result.aum_growth, result.closing_aum - opening);
        prop_assert_eq!(result.net_flow, contributions - payouts);
    }

    /// Batch results match sequential computation in input order.
    #[test]
    fn test_batch_matches_sequential(
        rows in prop::collection::vec(
            (1u32..1000, decimal_strategy(), decimal_strategy(), decimal_strategy()),
            0..40,
        ),
    ) {
        let inputs: Vec<(Fund, AumRollForwardInput)> = rows
            .into_iter()
            .map(|(id, opening, contributions, ret)| {
                let fund = Fund {
                    selection: FundSelection {
                        fund_type: FundType::Rsa,
                        fund_id: id,
                    },
                    name: format!("Fund {id}"),
                };
                (fund, input(opening, contributions, Decimal::ZERO, ret, Decimal::ZERO))
            })
            .collect();

        let batch = AumRollForward::compute_batch(&inputs);
        let sequential: Vec<_> = inputs
            .iter()
            .map(|(fund, input)| AumRollForward::compute_for(fund, input))
            .collect();

        prop_assert_eq!(batch, sequential);
    }
}

mod unit_tests {
    use super::*;

    #[test]
    fn test_zero_opening_guard() {
        let result = AumRollForward::compute(&input(
            Decimal::ZERO,
            dec!(100),
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        ));

        assert_eq!(result.closing_aum, dec!(100));
        assert_eq!(result.aum_growth_percent, Decimal::ZERO);
        assert_eq!(result.net_flow_percent, Decimal::ZERO);
        assert_eq!(result.return_on_asset_percent, Decimal::ZERO);
    }

    #[test]
    fn test_reference_rsa_fund() {
        let result = AumRollForward::compute(&input(
            dec!(500000000),
            dec!(50000000),
            dec!(10000000),
            dec!(10000000),
            dec!(2000000),
        ));

        assert_eq!(result.closing_aum, dec!(548000000));
        assert_eq!(result.aum_growth, dec!(48000000));
        assert_eq!(result.aum_growth_percent, dec!(9.6));
        assert_eq!(result.net_flow, dec!(40000000));
        assert_eq!(result.net_flow_percent, dec!(8));
        assert_eq!(result.return_on_asset_percent, dec!(2));
    }

    #[test]
    fn test_negative_inputs_taken_as_given() {
        let result = AumRollForward::compute(&input(
            dec!(1000),
            dec!(-50),
            dec!(0),
            dec!(-200),
            dec!(10),
        ));

        assert_eq!(result.closing_aum, dec!(740));
        assert_eq!(result.aum_growth_percent, dec!(-26));
    }

    #[test]
    fn test_tiny_opening_yields_zero_percentages() {
        let result = AumRollForward::compute(&input(
            Decimal::new(1, 28),
            dec!(10000000000),
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        ));

        assert_eq!(result.net_flow, dec!(10000000000));
        assert_eq!(result.net_flow_percent, Decimal::ZERO);
        assert_eq!(result.aum_growth_percent, Decimal::ZERO);
    }

    #[test]
    fn test_percent_of_large_ratio() {
        assert_eq!(
            AumRollForward::percent_of(Decimal::MAX, Decimal::new(1, 2)),
            Decimal::ZERO
        );
        assert_eq!(AumRollForward::percent_of(dec!(1), dec!(8)), dec!(12.5));
    }

    #[test]
    fn test_validate_accepts_currency_amounts() {
        let valid = input(
            dec!(9999999999999999.99),
            dec!(-500.10),
            dec!(0),
            dec!(12.5),
            dec!(1.00),
        );
        assert_eq!(valid.validate(), Ok(()));
    }

    #[rstest]
    #[case(input(MAX_AMOUNT, dec!(0), dec!(0), dec!(0), dec!(0)), "opening_aum")]
    #[case(input(dec!(0), -MAX_AMOUNT, dec!(0), dec!(0), dec!(0)), "contributions")]
    #[case(input(dec!(0), dec!(0), dec!(0), dec!(0), Decimal::MAX), "total_fees")]
    fn test_validate_rejects_out_of_range(
        #[case] drivers: AumRollForwardInput,
        #[case] field: &'static str,
    ) {
        assert_eq!(drivers.validate(), Err(AumError::AmountOutOfRange(field)));
    }

    #[test]
    fn test_validate_rejects_sub_cent_amounts() {
        let drivers = input(
            Decimal::new(1, 28),
            dec!(10000000000),
            dec!(0),
            dec!(0),
            dec!(0),
        );
        assert_eq!(
            drivers.validate(),
            Err(AumError::AmountTooPrecise("opening_aum"))
        );
    }

    #[test]
    fn test_compute_for_attaches_fund() {
        let dir = directory();
        let fund = dir.resolve_key("MAN_1").unwrap();
        let result = AumRollForward::compute_for(fund, &AumRollForwardInput::default());

        assert_eq!(result.fund_name.as_deref(), Some("CBN Retiree"));
        assert_eq!(
            result.fund,
            Some(FundSelection {
                fund_type: FundType::Managed,
                fund_id: 1
            })
        );
    }

    #[rstest]
    #[case("RSA_1", FundType::Rsa, 1)]
    #[case("MAN_3", FundType::Managed, 3)]
    #[case(" RSA_42 ", FundType::Rsa, 42)]
    fn test_selection_parse(
        #[case] key: &str,
        #[case] fund_type: FundType,
        #[case] fund_id: u32,
    ) {
        assert_eq!(
            FundSelection::parse(key).unwrap(),
            FundSelection { fund_type, fund_id }
        );
    }

    #[rstest]
    #[case("")]
    #[case("RSA")]
    #[case("MANAGED")]
    #[case("XYZ_1")]
    #[case("RSA_x")]
    #[case("RSA_")]
    #[case("RSA_-1")]
    #[case("MAN_1_2")]
    fn test_selection_parse_malformed(#[case] key: &str) {
        assert_eq!(
            FundSelection::parse(key),
            Err(AumError::MalformedSelection(key.to_string()))
        );
    }

    #[test]
    fn test_selection_display_round_trips() {
        let selection: FundSelection = "MAN_7".parse().unwrap();
        assert_eq!(selection.to_string(), "MAN_7");
    }

    #[test]
    fn test_directory_unknown_fund() {
        let dir = directory();
        assert_eq!(
            dir.resolve_key("RSA_9"),
            Err(AumError::FundNotFound(FundSelection {
                fund_type: FundType::Rsa,
                fund_id: 9
            }))
        );
    }

    #[test]
    fn test_directory_lists_rsa_first() {
        let dir = directory();
        let keys: Vec<String> = dir.list().iter().map(|f| f.selection.to_string()).collect();

        assert_eq!(dir.len(), 3);
        assert_eq!(keys, vec!["RSA_1", "RSA_2", "MAN_1"]);
        assert!(FundDirectory::default().is_empty());
    }
}
