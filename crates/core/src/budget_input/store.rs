//! Budget input storage.
//!
//! The forecast reads two things from here: the most recent assumption set
//! and the approved OPEX/CAPEX totals of a year. PIN headcount submissions
//! share the approval workflow of budget lines.

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};
use zynbudget_shared::types::{AssumptionSetId, BudgetTransactionId, PinSubmissionId};

use super::error::{AssumptionError, BudgetInputError};
use super::pin::{
    CreatePinSubmissionInput, PinDataSubmission, PinHeadcountSummary, PinSubmissionKey,
};
use super::types::{
    ApprovedExpenseTotals, BudgetTransaction, CreateAssumptionInput, CreateTransactionInput,
    RateAssumptionSet, TransactionStatus,
};

/// Read and write paths for assumptions and budget lines.
pub trait BudgetInputStore: Send + Sync {
    /// Validates and stores a new assumption set.
    ///
    /// # Errors
    ///
    /// Returns an error for negative rates, a blank or duplicate version name.
    fn save_assumption(
        &self,
        input: CreateAssumptionInput,
    ) -> Result<RateAssumptionSet, AssumptionError>;

    /// All assumption sets, newest first.
    fn assumptions_by_recency(&self) -> Vec<RateAssumptionSet>;

    /// The newest assumption set, if any exists.
    fn latest_assumption(&self) -> Option<RateAssumptionSet> {
        self.assumptions_by_recency().into_iter().next()
    }

    /// Stores a new budget line with status `Pending`.
    ///
    /// # Errors
    ///
    /// Returns an error if the line fails validation.
    fn submit_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> Result<BudgetTransaction, BudgetInputError>;

    /// Looks up a budget line.
    fn transaction(&self, id: BudgetTransactionId) -> Option<BudgetTransaction>;

    /// Moves a budget line to a new status.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist or the move is not allowed.
    fn set_transaction_status(
        &self,
        id: BudgetTransactionId,
        status: TransactionStatus,
    ) -> Result<BudgetTransaction, BudgetInputError>;

    /// Approved annual totals of one budget year. Zero when nothing is approved.
    fn approved_totals(&self, budget_year: i32) -> ApprovedExpenseTotals;

    /// Stores PIN data with status `Pending`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input fails validation or the year, fund and
    /// department already have a submission.
    fn submit_pin_data(
        &self,
        input: CreatePinSubmissionInput,
    ) -> Result<PinDataSubmission, BudgetInputError>;

    /// Looks up a PIN submission.
    fn pin_submission(&self, id: PinSubmissionId) -> Option<PinDataSubmission>;

    /// PIN submissions of one budget year, ordered by department then fund.
    fn pin_submissions(&self, budget_year: i32) -> Vec<PinDataSubmission>;

    /// Moves a PIN submission to a new status.
    ///
    /// Approvals and rejections record `decided_by`; a move back to
    /// `Pending` clears the decision.
    ///
    /// # Errors
    ///
    /// Returns an error if the submission does not exist or the move is not
    /// allowed.
    fn set_pin_status(
        &self,
        id: PinSubmissionId,
        status: TransactionStatus,
        decided_by: &str,
    ) -> Result<PinDataSubmission, BudgetInputError>;

    /// Approved PIN headcounts of one budget year.
    fn pin_headcount_summary(&self, budget_year: i32) -> PinHeadcountSummary {
        PinHeadcountSummary::from_submissions(budget_year, &self.pin_submissions(budget_year))
    }
}

/// Concurrent in-memory store.
#[derive(Debug, Default)]
pub struct InMemoryBudgetInputStore {
    assumptions: DashMap<AssumptionSetId, RateAssumptionSet>,
    versions: DashMap<String, AssumptionSetId>,
    transactions: DashMap<BudgetTransactionId, BudgetTransaction>,
    pin_submissions: DashMap<PinSubmissionId, PinDataSubmission>,
    pin_keys: DashMap<PinSubmissionKey, PinSubmissionId>,
}

impl InMemoryBudgetInputStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BudgetInputStore for InMemoryBudgetInputStore {
    fn save_assumption(
        &self,
        input: CreateAssumptionInput,
    ) -> Result<RateAssumptionSet, AssumptionError> {
        input.validate()?;
        let set = input.into_assumption_set(Utc::now());

        match self.versions.entry(set.version_name.clone()) {
            Entry::Occupied(_) => Err(AssumptionError::DuplicateVersion(set.version_name)),
            Entry::Vacant(slot) => {
                slot.insert(set.id);
                self.assumptions.insert(set.id, set.clone());
                info!(version = %set.version_name, id = %set.id, "Assumption set saved");
                Ok(set)
            }
        }
    }

    fn assumptions_by_recency(&self) -> Vec<RateAssumptionSet> {
        let mut sets: Vec<RateAssumptionSet> =
            self.assumptions.iter().map(|e| e.value().clone()).collect();
        sets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        sets
    }

    fn submit_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> Result<BudgetTransaction, BudgetInputError> {
        let transaction = input.into_transaction(Utc::now())?;
        self.transactions.insert(transaction.id, transaction.clone());
        debug!(
            id = %transaction.id,
            kind = ?transaction.kind,
            annual_amount = %transaction.annual_amount,
            "Budget transaction submitted"
        );
        Ok(transaction)
    }

    fn transaction(&self, id: BudgetTransactionId) -> Option<BudgetTransaction> {
        self.transactions.get(&id).map(|e| e.value().clone())
    }

    fn set_transaction_status(
        &self,
        id: BudgetTransactionId,
        status: TransactionStatus,
    ) -> Result<BudgetTransaction, BudgetInputError> {
        let mut entry = self
            .transactions
            .get_mut(&id)
            .ok_or(BudgetInputError::TransactionNotFound(id))?;

        if !entry.status.can_transition_to(status) {
            return Err(BudgetInputError::InvalidStatusTransition {
                from: entry.status,
                to: status,
            });
        }

        entry.status = status;
        info!(id = %id, status = %status, "Budget transaction status changed");
        Ok(entry.clone())
    }

    fn approved_totals(&self, budget_year: i32) -> ApprovedExpenseTotals {
        let lines: Vec<BudgetTransaction> = self
            .transactions
            .iter()
            .filter(|e| e.budget_year == budget_year)
            .map(|e| e.value().clone())
            .collect();
        ApprovedExpenseTotals::from_transactions(budget_year, &lines)
    }

    fn submit_pin_data(
        &self,
        input: CreatePinSubmissionInput,
    ) -> Result<PinDataSubmission, BudgetInputError> {
        let submission = input.into_submission(Utc::now())?;

        match self.pin_keys.entry(submission.key()) {
            Entry::Occupied(_) => Err(BudgetInputError::DuplicatePinSubmission {
                budget_year: submission.budget_year,
                fund: submission.fund,
                department: submission.department,
            }),
            Entry::Vacant(slot) => {
                slot.insert(submission.id);
                self.pin_submissions.insert(submission.id, submission.clone());
                debug!(
                    id = %submission.id,
                    fund = %submission.fund,
                    department = %submission.department,
                    total_pins = submission.total_pins(),
                    "PIN data submitted"
                );
                Ok(submission)
            }
        }
    }

    fn pin_submission(&self, id: PinSubmissionId) -> Option<PinDataSubmission> {
        self.pin_submissions.get(&id).map(|e| e.value().clone())
    }

    fn pin_submissions(&self, budget_year: i32) -> Vec<PinDataSubmission> {
        let mut submissions: Vec<PinDataSubmission> = self
            .pin_submissions
            .iter()
            .filter(|e| e.budget_year == budget_year)
            .map(|e| e.value().clone())
            .collect();
        submissions.sort_by(|a, b| {
            a.department
                .cmp(&b.department)
                .then(a.fund.fund_id.cmp(&b.fund.fund_id))
        });
        submissions
    }

    fn set_pin_status(
        &self,
        id: PinSubmissionId,
        status: TransactionStatus,
        decided_by: &str,
    ) -> Result<PinDataSubmission, BudgetInputError> {
        let mut entry = self
            .pin_submissions
            .get_mut(&id)
            .ok_or(BudgetInputError::PinSubmissionNotFound(id))?;

        if !entry.status.can_transition_to(status) {
            return Err(BudgetInputError::InvalidStatusTransition {
                from: entry.status,
                to: status,
            });
        }

        entry.status = status;
        if status == TransactionStatus::Pending {
            entry.decided_by = None;
            entry.decided_at = None;
        } else {
            entry.decided_by = Some(decided_by.to_string());
            entry.decided_at = Some(Utc::now());
        }
        info!(id = %id, status = %status, decided_by, "PIN submission status changed");
        Ok(entry.clone())
    }
}
