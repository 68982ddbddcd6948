//! Immutable forecast snapshots and their GL staging rows.

pub mod error;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::SnapshotError;
pub use service::SnapshotService;
pub use store::{InMemorySnapshotStore, SnapshotStore};
pub use types::{
    ForecastSnapshot, ReferenceAccounts, SnapshotDecision, SnapshotStatus, SnapshotSummary,
    StagingRow,
};
