//! Forecast run caching using Moka.
//!
//! A run is a pure function of its inputs, so identical requests can be
//! served from memory.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;

use super::engine::ForecastEngine;
use super::types::{ForecastRun, ForecastSeeds};
use crate::budget_input::{ApprovedExpenseTotals, RateAssumptionSet};

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: u64 = 100;

/// Default time-to-live for cache entries (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// Cache for forecast runs, keyed by a hash of every engine input.
#[derive(Clone)]
pub struct ForecastCache {
    cache: Cache<String, Arc<ForecastRun>>,
}

impl ForecastCache {
    /// Creates a new forecast cache with default settings.
    ///
    /// Default: 100 entries max, 5 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a new forecast cache with custom configuration.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Stable key for one set of engine inputs.
    ///
    /// The assumption set is identified by its version and rates, not its
    /// ID, so re-saving identical rates under the same name hits the cache.
    #[must_use]
    pub fn key(
        engine: &ForecastEngine,
        assumptions: &RateAssumptionSet,
        totals: &ApprovedExpenseTotals,
        seeds: &ForecastSeeds,
    ) -> String {
        let mut hasher = DefaultHasher::new();
        engine.policy().hash(&mut hasher);
        assumptions.version_name.hash(&mut hasher);
        assumptions.mgmt_fee_rate.hash(&mut hasher);
        assumptions.admin_fee_rate.hash(&mut hasher);
        assumptions.staff_cost_percent.hash(&mut hasher);
        assumptions.admin_expense_growth.hash(&mut hasher);
        assumptions.aum_growth_rate.hash(&mut hasher);
        assumptions.investment_return_rate.hash(&mut hasher);
        totals.hash(&mut hasher);
        seeds.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    /// Runs a forecast, returning the cached run if available.
    ///
    /// A cached run is returned with `cached: true`; otherwise the engine
    /// runs and the result is stored before being returned.
    #[must_use]
    pub fn run_cached(
        &self,
        engine: &ForecastEngine,
        assumptions: &RateAssumptionSet,
        totals: &ApprovedExpenseTotals,
        seeds: &ForecastSeeds,
    ) -> ForecastRun {
        let cache_key = Self::key(engine, assumptions, totals, seeds);

        if let Some(cached_run) = self.cache.get(&cache_key) {
            debug!(key = %cache_key, "Forecast cache hit");
            let mut run = (*cached_run).clone();
            run.cached = true;
            return run;
        }

        let run = engine.run(assumptions, totals, seeds);
        self.cache.insert(cache_key, Arc::new(run.clone()));
        run
    }

    /// Invalidates all cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Returns the number of entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs cache maintenance tasks.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl Default for ForecastCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget_input::CreateAssumptionInput;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn assumptions(name: &str) -> RateAssumptionSet {
        CreateAssumptionInput::with_defaults(name, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
            .into_assumption_set(chrono::Utc::now())
    }

    fn totals() -> ApprovedExpenseTotals {
        ApprovedExpenseTotals {
            budget_year: 2026,
            total_annual_opex: dec!(1200000),
            total_annual_capex: dec!(240000),
        }
    }

    #[test]
    fn test_cache_miss_then_hit() {
        let cache = ForecastCache::new();
        let engine = ForecastEngine::default();
        let seeds = ForecastSeeds::default();
        let set = assumptions("v1");

        let first = cache.run_cached(&engine, &set, &totals(), &seeds);
        assert!(!first.cached, "First call should not be cached");

        let second = cache.run_cached(&engine, &set, &totals(), &seeds);
        assert!(second.cached, "Second call should be cached");
        assert_eq!(first.months, second.months);
    }

    #[test]
    fn test_different_inputs_not_cached() {
        let cache = ForecastCache::new();
        let engine = ForecastEngine::default();
        let seeds = ForecastSeeds::default();
        let set = assumptions("v1");

        let _ = cache.run_cached(&engine, &set, &totals(), &seeds);

        let mut changed = totals();
        changed.total_annual_opex = dec!(1300000);
        let run = cache.run_cached(&engine, &set, &changed, &seeds);
        assert!(!run.cached, "Different totals should not hit cache");

        let other_version = cache.run_cached(&engine, &assumptions("v2"), &totals(), &seeds);
        assert!(!other_version.cached);
    }

    #[test]
    fn test_same_rates_new_id_hits_cache() {
        let cache = ForecastCache::new();
        let engine = ForecastEngine::default();
        let seeds = ForecastSeeds::default();

        let _ = cache.run_cached(&engine, &assumptions("v1"), &totals(), &seeds);
        let run = cache.run_cached(&engine, &assumptions("v1"), &totals(), &seeds);
        assert!(run.cached);
    }

    #[test]
    fn test_equal_decimals_share_a_key() {
        let engine = ForecastEngine::default();
        let seeds = ForecastSeeds::default();
        let set = assumptions("v1");

        let mut padded = totals();
        padded.total_annual_opex = dec!(1200000.00);

        assert_eq!(
            ForecastCache::key(&engine, &set, &totals(), &seeds),
            ForecastCache::key(&engine, &set, &padded, &seeds)
        );
    }

    #[test]
    fn test_invalidate_all() {
        let cache = ForecastCache::with_config(10, 60);
        let engine = ForecastEngine::default();
        let seeds = ForecastSeeds::default();
        let set = assumptions("v1");

        let _ = cache.run_cached(&engine, &set, &totals(), &seeds);
        cache.invalidate_all();
        cache.run_pending_tasks();

        let run = cache.run_cached(&engine, &set, &totals(), &seeds);
        assert!(!run.cached, "Should be cache miss after invalidate_all");
    }

    #[test]
    fn test_entry_count() {
        let cache = ForecastCache::default();
        assert_eq!(cache.entry_count(), 0);

        let _ = cache.run_cached(
            &ForecastEngine::default(),
            &assumptions("v1"),
            &totals(),
            &ForecastSeeds::default(),
        );
        cache.run_pending_tasks();
        assert!(cache.entry_count() >= 1);
    }
}
