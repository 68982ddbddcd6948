//! PIN headcount submissions.
//!
//! One submission per budget year, RSA fund and department, carrying the
//! PIN counts and average contributions behind the contribution budget.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use zynbudget_shared::types::PinSubmissionId;

use super::error::BudgetInputError;
use super::types::TransactionStatus;
use crate::aum::{FundSelection, FundType};
use crate::limits;

/// A stored PIN headcount submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinDataSubmission {
    /// Submission ID.
    pub id: PinSubmissionId,
    /// Budget year.
    pub budget_year: i32,
    /// RSA fund the PINs belong to.
    pub fund: FundSelection,
    /// Submitting department.
    pub department: String,
    /// Funded, contributing PINs.
    pub active_pins: u32,
    /// Funded PINs without recent contributions.
    pub non_active_pins: u32,
    /// Registered PINs that never received a contribution.
    pub never_funded_pins: u32,
    /// Expected new enrolments.
    pub new_enrolments: u32,
    /// Average contribution of an existing PIN.
    pub avg_contribution_existing: Decimal,
    /// Average contribution of a new PIN.
    pub avg_contribution_new: Decimal,
    /// Approval status.
    pub status: TransactionStatus,
    /// Submitting user.
    pub submitted_by: String,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Approver of the last decision.
    pub decided_by: Option<String>,
    /// Timestamp of the last decision.
    pub decided_at: Option<DateTime<Utc>>,
}

impl PinDataSubmission {
    /// Registered PINs: active, non-active and never funded.
    #[must_use]
    pub fn total_pins(&self) -> u64 {
        u64::from(self.active_pins)
            + u64::from(self.non_active_pins)
            + u64::from(self.never_funded_pins)
    }

    /// Uniqueness key of the submission.
    #[must_use]
    pub fn key(&self) -> PinSubmissionKey {
        PinSubmissionKey {
            budget_year: self.budget_year,
            fund: self.fund,
            department: self.department.clone(),
        }
    }
}

/// Year, fund and department of a submission. At most one submission per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PinSubmissionKey {
    /// Budget year.
    pub budget_year: i32,
    /// RSA fund.
    pub fund: FundSelection,
    /// Department, trimmed.
    pub department: String,
}

/// Input for a PIN headcount submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePinSubmissionInput {
    /// Budget year.
    pub budget_year: i32,
    /// RSA fund.
    pub fund: FundSelection,
    /// Submitting department.
    pub department: String,
    /// Active PINs.
    #[serde(default)]
    pub active_pins: u32,
    /// Non-active PINs.
    #[serde(default)]
    pub non_active_pins: u32,
    /// Never-funded PINs.
    #[serde(default)]
    pub never_funded_pins: u32,
    /// New enrolments.
    #[serde(default)]
    pub new_enrolments: u32,
    /// Average contribution of an existing PIN.
    #[serde(default)]
    pub avg_contribution_existing: Decimal,
    /// Average contribution of a new PIN.
    #[serde(default)]
    pub avg_contribution_new: Decimal,
    /// Submitting user.
    pub submitted_by: String,
}

impl CreatePinSubmissionInput {
    /// Validates and builds the stored submission with status `Pending`.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-RSA fund, a blank department, or average
    /// contributions that are negative or out of range.
    pub fn into_submission(
        self,
        submitted_at: DateTime<Utc>,
    ) -> Result<PinDataSubmission, BudgetInputError> {
        if self.fund.fund_type != FundType::Rsa {
            return Err(BudgetInputError::NotRsaFund(self.fund));
        }
        let department = self.department.trim();
        if department.is_empty() {
            return Err(BudgetInputError::MissingField("department"));
        }

        for (field, amount) in [
            ("avg_contribution_existing", self.avg_contribution_existing),
            ("avg_contribution_new", self.avg_contribution_new),
        ] {
            if amount < Decimal::ZERO {
                return Err(BudgetInputError::NegativeAmount);
            }
            if !limits::amount_in_range(amount) {
                return Err(BudgetInputError::AmountOutOfRange(field));
            }
        }

        Ok(PinDataSubmission {
            id: PinSubmissionId::new(),
            budget_year: self.budget_year,
            fund: self.fund,
            department: department.to_string(),
            active_pins: self.active_pins,
            non_active_pins: self.non_active_pins,
            never_funded_pins: self.never_funded_pins,
            new_enrolments: self.new_enrolments,
            avg_contribution_existing: self.avg_contribution_existing,
            avg_contribution_new: self.avg_contribution_new,
            status: TransactionStatus::Pending,
            submitted_by: self.submitted_by,
            submitted_at,
            decided_by: None,
            decided_at: None,
        })
    }
}

/// Approved PIN headcounts of one budget year, summed over funds and departments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PinHeadcountSummary {
    /// Budget year.
    pub budget_year: i32,
    /// Number of approved submissions.
    pub submissions: u64,
    /// Active PINs.
    pub active_pins: u64,
    /// Non-active PINs.
    pub non_active_pins: u64,
    /// Never-funded PINs.
    pub never_funded_pins: u64,
    /// New enrolments.
    pub new_enrolments: u64,
}

impl PinHeadcountSummary {
    /// Sums the approved submissions of `budget_year`.
    #[must_use]
    pub fn from_submissions<'a>(
        budget_year: i32,
        submissions: impl IntoIterator<Item = &'a PinDataSubmission>,
    ) -> Self {
        submissions
            .into_iter()
            .filter(|s| s.budget_year == budget_year && s.status == TransactionStatus::Approved)
            .fold(
                Self {
                    budget_year,
                    ..Self::default()
                },
                |mut acc, s| {
                    acc.submissions += 1;
                    acc.active_pins += u64::from(s.active_pins);
                    acc.non_active_pins += u64::from(s.non_active_pins);
                    acc.never_funded_pins += u64::from(s.never_funded_pins);
                    acc.new_enrolments += u64::from(s.new_enrolments);
                    acc
                },
            )
    }
}
