//! AUM roll-forward per fund.

pub mod directory;
pub mod error;
pub mod rollforward;
pub mod selection;
pub mod types;

#[cfg(test)]
mod tests;

pub use directory::FundDirectory;
pub use error::AumError;
pub use rollforward::AumRollForward;
pub use types::{AumRollForwardInput, AumRollForwardResult, Fund, FundSelection, FundType};
