//! Snapshot storage.

use std::collections::HashSet;

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{info, warn};
use zynbudget_shared::config::LedgerConfig;
use zynbudget_shared::types::{PageRequest, PageResponse, SnapshotId};

use super::error::SnapshotError;
use super::service::SnapshotService;
use super::types::{
    ForecastSnapshot, ReferenceAccounts, SnapshotDecision, SnapshotStatus, SnapshotSummary,
    StagingRow,
};
use crate::forecast::ForecastRun;

/// Persistence for submitted forecast snapshots.
///
/// At most one snapshot exists per version name. Financial data is never
/// modified after submission; only the approval status changes.
pub trait SnapshotStore: Send + Sync {
    /// Freezes a run under a unique name and writes its staging rows.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if the name is taken, `MissingReferenceAccounts`
    /// if a staging account is unknown, and `EmptyName`/`IncompleteRun` for
    /// invalid input.
    fn submit(
        &self,
        run: &ForecastRun,
        version_name: &str,
        submitted_by: &str,
    ) -> Result<ForecastSnapshot, SnapshotError>;

    /// Loads a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the snapshot does not exist.
    fn get(&self, id: SnapshotId) -> Result<ForecastSnapshot, SnapshotError>;

    /// One page of snapshots, newest first.
    fn list(&self, page: &PageRequest) -> PageResponse<SnapshotSummary>;

    /// Staging rows of a snapshot in month order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the snapshot does not exist.
    fn staging_rows(&self, id: SnapshotId) -> Result<Vec<StagingRow>, SnapshotError>;

    /// Records the approver's decision on a pending snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `AlreadyDecided`.
    fn decide(
        &self,
        id: SnapshotId,
        decision: SnapshotDecision,
        decided_by: &str,
    ) -> Result<ForecastSnapshot, SnapshotError>;
}

/// Concurrent in-memory snapshot store.
#[derive(Debug)]
pub struct InMemorySnapshotStore {
    snapshots: DashMap<SnapshotId, ForecastSnapshot>,
    names: DashMap<String, SnapshotId>,
    staging: DashMap<SnapshotId, Vec<StagingRow>>,
    known_accounts: HashSet<String>,
    accounts: ReferenceAccounts,
}

impl InMemorySnapshotStore {
    /// Creates an empty store over the given ledger accounts.
    #[must_use]
    pub fn new(
        known_accounts: impl IntoIterator<Item = String>,
        accounts: ReferenceAccounts,
    ) -> Self {
        Self {
            snapshots: DashMap::new(),
            names: DashMap::new(),
            staging: DashMap::new(),
            known_accounts: known_accounts.into_iter().collect(),
            accounts,
        }
    }

    /// Creates an empty store from the `ledger` configuration section.
    #[must_use]
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(config.known_accounts.iter().cloned(), config.into())
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        let accounts = ReferenceAccounts::default();
        Self::new(
            [accounts.revenue_code.clone(), accounts.expense_code.clone()],
            accounts,
        )
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn submit(
        &self,
        run: &ForecastRun,
        version_name: &str,
        submitted_by: &str,
    ) -> Result<ForecastSnapshot, SnapshotError> {
        SnapshotService::validate(run, version_name)?;
        SnapshotService::check_accounts(&self.accounts, &self.known_accounts).inspect_err(|e| {
            warn!(error = %e, "Snapshot rejected: staging accounts missing");
        })?;

        let name = version_name.trim().to_string();
        match self.names.entry(name) {
            Entry::Occupied(slot) => Err(SnapshotError::DuplicateName(slot.key().clone())),
            Entry::Vacant(slot) => {
                let id = SnapshotId::new();
                let snapshot =
                    SnapshotService::build(id, run, slot.key(), submitted_by, Utc::now());
                let rows = SnapshotService::staging_rows(id, run, &self.accounts);

                self.staging.insert(id, rows);
                self.snapshots.insert(id, snapshot.clone());
                slot.insert(id);

                info!(
                    id = %id,
                    version = %snapshot.version_name,
                    final_net_profit = %snapshot.final_net_profit,
                    "Forecast snapshot submitted"
                );
                Ok(snapshot)
            }
        }
    }

    fn get(&self, id: SnapshotId) -> Result<ForecastSnapshot, SnapshotError> {
        self.snapshots
            .get(&id)
            .map(|s| s.value().clone())
            .ok_or(SnapshotError::NotFound(id))
    }

    fn list(&self, page: &PageRequest) -> PageResponse<SnapshotSummary> {
        let mut summaries: Vec<SnapshotSummary> = self
            .snapshots
            .iter()
            .map(|s| SnapshotSummary::from(s.value()))
            .collect();
        summaries.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
        page.paginate(summaries)
    }

    fn staging_rows(&self, id: SnapshotId) -> Result<Vec<StagingRow>, SnapshotError> {
        self.staging
            .get(&id)
            .map(|rows| rows.value().clone())
            .ok_or(SnapshotError::NotFound(id))
    }

    fn decide(
        &self,
        id: SnapshotId,
        decision: SnapshotDecision,
        decided_by: &str,
    ) -> Result<ForecastSnapshot, SnapshotError> {
        let mut snapshot = self
            .snapshots
            .get_mut(&id)
            .ok_or(SnapshotError::NotFound(id))?;

        if snapshot.status != SnapshotStatus::Pending {
            return Err(SnapshotError::AlreadyDecided(snapshot.status));
        }

        snapshot.status = decision.resulting_status();
        snapshot.decided_by = Some(decided_by.to_string());
        snapshot.decided_at = Some(Utc::now());

        info!(id = %id, status = %snapshot.status, by = decided_by, "Forecast snapshot decided");
        Ok(snapshot.clone())
    }
}
