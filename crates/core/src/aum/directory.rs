//! Read-only fund directory.

use std::collections::HashMap;

use zynbudget_shared::config::FundsConfig;

use super::error::AumError;
use super::types::{Fund, FundSelection, FundType};

/// Funds the roll-forward can be computed for.
#[derive(Debug, Clone, Default)]
pub struct FundDirectory {
    funds: HashMap<FundSelection, Fund>,
}

impl FundDirectory {
    /// Builds a directory from a list of funds.
    #[must_use]
    pub fn new(funds: impl IntoIterator<Item = Fund>) -> Self {
        Self {
            funds: funds.into_iter().map(|f| (f.selection, f)).collect(),
        }
    }

    /// Builds the directory from the `funds` configuration section.
    #[must_use]
    pub fn from_config(config: &FundsConfig) -> Self {
        let rsa = config.rsa.iter().map(|e| (FundType::Rsa, e));
        let managed = config.managed.iter().map(|e| (FundType::Managed, e));

        Self::new(rsa.chain(managed).map(|(fund_type, entry)| Fund {
            selection: FundSelection {
                fund_type,
                fund_id: entry.id,
            },
            name: entry.name.clone(),
        }))
    }

    /// Looks up a fund.
    ///
    /// # Errors
    ///
    /// Returns `FundNotFound` if the fund is not listed.
    pub fn resolve(&self, selection: FundSelection) -> Result<&Fund, AumError> {
        self.funds
            .get(&selection)
            .ok_or(AumError::FundNotFound(selection))
    }

    /// Parses a selection key and looks up the fund.
    ///
    /// # Errors
    ///
    /// Returns `MalformedSelection` or `FundNotFound`.
    pub fn resolve_key(&self, key: &str) -> Result<&Fund, AumError> {
        self.resolve(FundSelection::parse(key)?)
    }

    /// All funds, RSA first, then by ID.
    #[must_use]
    pub fn list(&self) -> Vec<&Fund> {
        let mut funds: Vec<&Fund> = self.funds.values().collect();
        funds.sort_by_key(|f| {
            (
                matches!(f.selection.fund_type, FundType::Managed),
                f.selection.fund_id,
            )
        });
        funds
    }

    /// Number of funds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.funds.len()
    }

    /// Returns true if the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }
}
