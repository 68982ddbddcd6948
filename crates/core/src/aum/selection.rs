//! Fund selection parsing.

use std::str::FromStr;

use super::error::AumError;
use super::types::{FundSelection, FundType};

/// Group header keys shown above the fund lists. Not selectable.
const HEADER_KEYS: [&str; 3] = ["", "RSA", "MANAGED"];

impl FundSelection {
    /// Parses a `<TYPE>_<id>` selection key.
    ///
    /// # Errors
    ///
    /// Returns `MalformedSelection` for header keys, unknown prefixes and
    /// non-integer IDs.
    pub fn parse(key: &str) -> Result<Self, AumError> {
        let malformed = || AumError::MalformedSelection(key.to_string());

        let trimmed = key.trim();
        if HEADER_KEYS.contains(&trimmed) {
            return Err(malformed());
        }

        let (prefix, id) = trimmed.split_once('_').ok_or_else(malformed)?;
        let fund_type = match prefix {
            "RSA" => FundType::Rsa,
            "MAN" => FundType::Managed,
            _ => return Err(malformed()),
        };
        let fund_id = id.parse::<u32>().map_err(|_| malformed())?;

        Ok(Self { fund_type, fund_id })
    }
}

impl FromStr for FundSelection {
    type Err = AumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
