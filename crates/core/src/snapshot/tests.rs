//! Tests for forecast snapshots.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use zynbudget_shared::types::{PageRequest, SnapshotId};

use super::error::SnapshotError;
use super::service::SnapshotService;
use super::store::{InMemorySnapshotStore, SnapshotStore};
use super::types::{ReferenceAccounts, SnapshotDecision, SnapshotStatus};
use crate::budget_input::{ApprovedExpenseTotals, CreateAssumptionInput};
use crate::forecast::{ForecastEngine, ForecastRun, ForecastSeeds};

fn sample_run() -> ForecastRun {
    let period_start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let assumptions = CreateAssumptionInput::with_defaults("FY26 Base", period_start)
        .into_assumption_set(chrono::Utc::now());
    let totals = ApprovedExpenseTotals {
        budget_year: 2026,
        total_annual_opex: dec!(120000000),
        total_annual_capex: dec!(12000000),
    };
    ForecastEngine::default().run(&assumptions, &totals, &ForecastSeeds::default())
}

#[test]
fn test_submit_takes_final_figures_from_last_month() {
    let store = InMemorySnapshotStore::default();
    let run = sample_run();

    let snapshot = store.submit(&run, "FY26 Submission", "officer").unwrap();

    assert_eq!(snapshot.final_net_profit, run.months[11].income_statement.net_profit);
    assert_eq!(snapshot.final_closing_cash, run.months[11].cash_flow.closing_cash);
    assert_eq!(snapshot.status, SnapshotStatus::Pending);
    assert_eq!(snapshot.assumption_version, "FY26 Base");
    assert_eq!(snapshot.months, run.months);
    assert_eq!(store.get(snapshot.id).unwrap(), snapshot);
}

#[test]
fn test_duplicate_name_rejected() {
    let store = InMemorySnapshotStore::default();
    let run = sample_run();

    assert!(store.submit(&run, "FY26", "officer").is_ok());
    assert_eq!(
        store.submit(&run, "FY26", "officer"),
        Err(SnapshotError::DuplicateName("FY26".to_string()))
    );
    assert_eq!(
        store.submit(&run, "  FY26 ", "officer"),
        Err(SnapshotError::DuplicateName("FY26".to_string()))
    );
    assert_eq!(store.list(&PageRequest::default()).meta.total, 1);
}

#[test]
fn test_concurrent_submit_single_winner() {
    let store = Arc::new(InMemorySnapshotStore::default());
    let run = Arc::new(sample_run());

    let results: Vec<Result<_, _>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                let run = Arc::clone(&run);
                scope.spawn(move || store.submit(&run, "Race", "officer"))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(SnapshotError::DuplicateName(_))))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(duplicates, 15);
}

#[test]
fn test_staging_rows_per_month() {
    let store = InMemorySnapshotStore::default();
    let run = sample_run();
    let snapshot = store.submit(&run, "FY26", "officer").unwrap();

    let rows = store.staging_rows(snapshot.id).unwrap();
    assert_eq!(rows.len(), 24);

    for (month, pair) in run.months.iter().zip(rows.chunks(2)) {
        let (expense, revenue) = (&pair[0], &pair[1]);
        assert_eq!(expense.gl_account_code, "6000");
        assert_eq!(expense.amount, -month.income_statement.total_opex);
        assert_eq!(revenue.gl_account_code, "4000");
        assert_eq!(revenue.amount, month.income_statement.total_revenue);
        assert_eq!(expense.budget_month, month.period_start);
        assert!(rows.iter().all(|r| r.snapshot_id == snapshot.id));
    }

    let mut keys: Vec<_> = rows
        .iter()
        .map(|r| (r.budget_month, r.gl_account_code.clone()))
        .collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 24);
}

#[test]
fn test_missing_reference_accounts() {
    let store = InMemorySnapshotStore::new(["4000".to_string()], ReferenceAccounts::default());

    assert_eq!(
        store.submit(&sample_run(), "FY26", "officer"),
        Err(SnapshotError::MissingReferenceAccounts {
            revenue_code: "4000".to_string(),
            expense_code: "6000".to_string(),
        })
    );
    assert_eq!(store.list(&PageRequest::default()).meta.total, 0);
}

#[test]
fn test_same_account_for_both_sides_rejected() {
    let accounts = ReferenceAccounts {
        revenue_code: "4000".to_string(),
        expense_code: "4000".to_string(),
    };
    assert_eq!(
        SnapshotService::check_accounts(&accounts, &["4000".to_string()]),
        Err(SnapshotError::AmbiguousReferenceAccounts("4000".to_string()))
    );
}

#[test]
fn test_invalid_runs_rejected() {
    let store = InMemorySnapshotStore::default();
    let mut run = sample_run();

    assert_eq!(store.submit(&run, "   ", "officer"), Err(SnapshotError::EmptyName));

    run.months.truncate(11);
    assert_eq!(
        store.submit(&run, "Short", "officer"),
        Err(SnapshotError::IncompleteRun(11))
    );
}

#[test]
fn test_decide_once() {
    let store = InMemorySnapshotStore::default();
    let snapshot = store.submit(&sample_run(), "FY26", "officer").unwrap();

    let approved = store
        .decide(snapshot.id, SnapshotDecision::Approve, "executive.director")
        .unwrap();
    assert_eq!(approved.status, SnapshotStatus::Approved);
    assert_eq!(approved.decided_by.as_deref(), Some("executive.director"));
    assert!(approved.decided_at.is_some());
    assert_eq!(approved.months, snapshot.months);
    assert_eq!(approved.final_net_profit, snapshot.final_net_profit);

    assert_eq!(
        store.decide(snapshot.id, SnapshotDecision::Reject, "executive.director"),
        Err(SnapshotError::AlreadyDecided(SnapshotStatus::Approved))
    );
}

#[test]
fn test_unknown_snapshot() {
    let store = InMemorySnapshotStore::default();
    let id = SnapshotId::new();

    assert_eq!(store.get(id), Err(SnapshotError::NotFound(id)));
    assert_eq!(store.staging_rows(id), Err(SnapshotError::NotFound(id)));
    assert_eq!(
        store.decide(id, SnapshotDecision::Approve, "x"),
        Err(SnapshotError::NotFound(id))
    );
}

#[test]
fn test_list_newest_first_paginated() {
    let store = InMemorySnapshotStore::default();
    let run = sample_run();
    for name in ["A", "B", "C"] {
        store.submit(&run, name, "officer").unwrap();
    }

    let page = store.list(&PageRequest { page: 1, per_page: 2 });
    let names: Vec<&str> = page.data.iter().map(|s| s.version_name.as_str()).collect();
    assert_eq!(names, vec!["C", "B"]);
    assert_eq!(page.meta.total, 3);
    assert_eq!(page.meta.total_pages, 2);
}

#[test]
fn test_decision_maps_to_status() {
    assert_eq!(
        SnapshotDecision::Approve.resulting_status(),
        SnapshotStatus::Approved
    );
    assert_eq!(
        SnapshotDecision::Reject.resulting_status(),
        SnapshotStatus::Rejected
    );
}
