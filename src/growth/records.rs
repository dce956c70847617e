//! Failure-record containers for reliability growth estimation.
//!
//! Purpose
//! -------
//! Hold the observed failure/test-time records that feed the Crow-AMSAA
//! estimator, either as exact failure times or as interval-grouped counts.
//! This module centralizes record validation so the estimator, mean-value
//! calculator, and goodness-of-fit tests can rely on clean inputs.
//!
//! Key behaviors
//! -------------
//! - [`FailureRecord`] is one failure (exact data) or one failure-count
//!   interval (grouped data) reported by a test unit.
//! - [`FailureRecordStore`] validates records at construction, keeps them
//!   immutable, and exposes a pooled view ordered by `right_time` across all
//!   units.
//!
//! Invariants & assumptions
//! ------------------------
//! - `right_time` is finite and strictly positive; `left_time` is finite and
//!   non-negative.
//! - `count >= 1`.
//! - Records are ordered by `right_time` (non-decreasing) within each unit.
//! - For grouped data, `right_time > left_time` is additionally enforced by
//!   [`FailureRecordStore::validate_grouped`].
//!
//! Conventions
//! -----------
//! - Times are cumulative test time on the shared program clock; for exact
//!   data `left_time` is ignored.
//! - The pooled view sorts by `right_time` with a stable sort, so ties keep
//!   their insertion order.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path, each validation error, multi-unit
//!   pooling, and cumulative counts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::growth::errors::{GrowthError, GrowthResult};

/// One failure or failure-count interval observed on a test unit.
///
/// Fields
/// ------
/// - `unit_id`: identifier of the test article.
/// - `left_time`: interval start; ignored for exact data.
/// - `right_time`: interval end, or the failure time for exact data.
/// - `count`: failures in the interval; 1 for exact data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub unit_id: u32,
    pub left_time: f64,
    pub right_time: f64,
    pub count: u32,
}

impl FailureRecord {
    /// Exact failure at `time` on `unit_id`.
    pub fn exact(unit_id: u32, time: f64) -> Self {
        FailureRecord { unit_id, left_time: 0.0, right_time: time, count: 1 }
    }

    /// `count` failures observed in `(left_time, right_time]` on `unit_id`.
    pub fn interval(unit_id: u32, left_time: f64, right_time: f64, count: u32) -> Self {
        FailureRecord { unit_id, left_time, right_time, count }
    }
}

/// `FailureRecordStore` — validated, immutable set of failure records.
///
/// Purpose
/// -------
/// Represent the minimal input unit for Crow-AMSAA estimation: the failure
/// log of one growth test, possibly spanning several test units.
///
/// Key behaviors
/// -------------
/// - Validates every record once at construction via [`FailureRecordStore::new`].
/// - Keeps a pooled copy sorted by `right_time` for estimation.
/// - Counts distinct test units so the scale parameter can be shared across
///   units.
///
/// Invariants
/// ----------
/// - See the module-level invariants; they hold for every stored record.
/// - `pooled` is a permutation of `records` sorted by `right_time`.
/// - `n_units >= 1` whenever the store is non-empty.
///
/// Notes
/// -----
/// - An empty store is allowed so that callers can build it incrementally
///   from a persistence layer; the estimator rejects stores with fewer than
///   two records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecordStore {
    records: Vec<FailureRecord>,
    pooled: Vec<FailureRecord>,
    n_units: usize,
}

impl FailureRecordStore {
    /// Construct a validated store from raw records.
    ///
    /// Parameters
    /// ----------
    /// - `records`: `Vec<FailureRecord>`
    ///   Records in log order. Within each `unit_id`, `right_time` must be
    ///   non-decreasing.
    ///
    /// Returns
    /// -------
    /// `GrowthResult<FailureRecordStore>`
    ///   - `Ok(store)` when every record is valid.
    ///   - `Err(GrowthError)` pointing at the first invalid record.
    ///
    /// Errors
    /// ------
    /// - `GrowthError::NonFiniteTime { index, value }`
    ///   A left or right time is NaN or ±∞.
    /// - `GrowthError::NonPositiveTime { index, value }`
    ///   `right_time <= 0` or `left_time < 0`.
    /// - `GrowthError::ZeroCount { index }`
    ///   A record reports zero failures.
    /// - `GrowthError::UnorderedRecords { index, unit_id }`
    ///   A unit's `right_time` decreased relative to its previous record.
    ///
    /// Panics
    /// ------
    /// - Never panics.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_growth::growth::records::{FailureRecord, FailureRecordStore};
    /// let store = FailureRecordStore::new(vec![
    ///     FailureRecord::exact(1, 2.7),
    ///     FailureRecord::exact(1, 10.3),
    /// ])
    /// .unwrap();
    /// assert_eq!(store.len(), 2);
    /// assert_eq!(store.total_failures(), 2);
    /// ```
    pub fn new(records: Vec<FailureRecord>) -> GrowthResult<Self> {
        let mut last_by_unit: HashMap<u32, f64> = HashMap::new();

        for (index, rec) in records.iter().enumerate() {
            for value in [rec.left_time, rec.right_time] {
                if !value.is_finite() {
                    return Err(GrowthError::NonFiniteTime { index, value });
                }
            }
            if rec.right_time <= 0.0 {
                return Err(GrowthError::NonPositiveTime { index, value: rec.right_time });
            }
            if rec.left_time < 0.0 {
                return Err(GrowthError::NonPositiveTime { index, value: rec.left_time });
            }
            if rec.count == 0 {
                return Err(GrowthError::ZeroCount { index });
            }
            if let Some(&prev) = last_by_unit.get(&rec.unit_id) {
                if rec.right_time < prev {
                    return Err(GrowthError::UnorderedRecords { index, unit_id: rec.unit_id });
                }
            }
            last_by_unit.insert(rec.unit_id, rec.right_time);
        }

        let mut pooled = records.clone();
        pooled.sort_by(|a, b| a.right_time.total_cmp(&b.right_time));
        let n_units = last_by_unit.len();

        Ok(FailureRecordStore { records, pooled, n_units })
    }

    /// Build a store from `(unit_id, left_time, right_time, count)` tuples,
    /// the shape used by the external test log.
    pub fn from_tuples<I>(rows: I) -> GrowthResult<Self>
    where
        I: IntoIterator<Item = (u32, f64, f64, u32)>,
    {
        let records = rows
            .into_iter()
            .map(|(unit_id, left_time, right_time, count)| FailureRecord {
                unit_id,
                left_time,
                right_time,
                count,
            })
            .collect();
        Self::new(records)
    }

    /// Check the additional grouped-data invariant `right_time > left_time`.
    ///
    /// Errors
    /// ------
    /// - `GrowthError::InvalidInterval { index, left, right }` for the first
    ///   record (in log order) whose interval is empty or reversed.
    pub fn validate_grouped(&self) -> GrowthResult<()> {
        for (index, rec) in self.records.iter().enumerate() {
            if rec.right_time <= rec.left_time {
                return Err(GrowthError::InvalidInterval {
                    index,
                    left: rec.left_time,
                    right: rec.right_time,
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in their original log order.
    pub fn records(&self) -> &[FailureRecord] {
        &self.records
    }

    /// Records from all units, ordered by `right_time`.
    pub fn pooled(&self) -> &[FailureRecord] {
        &self.pooled
    }

    /// Number of distinct test units.
    pub fn n_units(&self) -> usize {
        self.n_units
    }

    /// Total number of failures N = Σ count.
    pub fn total_failures(&self) -> u64 {
        self.records.iter().map(|r| u64::from(r.count)).sum()
    }

    /// Pooled right-edge times.
    pub fn times(&self) -> Vec<f64> {
        self.pooled.iter().map(|r| r.right_time).collect()
    }

    /// Pooled failure counts as floats, aligned with [`times`](Self::times).
    pub fn counts(&self) -> Vec<f64> {
        self.pooled.iter().map(|r| f64::from(r.count)).collect()
    }

    /// Running failure totals aligned with [`times`](Self::times).
    pub fn cumulative_counts(&self) -> Vec<f64> {
        self.pooled
            .iter()
            .scan(0.0, |acc, r| {
                *acc += f64::from(r.count);
                Some(*acc)
            })
            .collect()
    }

    /// Distinct pooled times with the failure counts at each one summed.
    pub fn merged_by_time(&self) -> (Vec<f64>, Vec<f64>) {
        let mut times: Vec<f64> = Vec::with_capacity(self.pooled.len());
        let mut counts: Vec<f64> = Vec::with_capacity(self.pooled.len());
        for rec in &self.pooled {
            match (times.last(), counts.last_mut()) {
                (Some(&t), Some(c)) if t == rec.right_time => *c += f64::from(rec.count),
                _ => {
                    times.push(rec.right_time);
                    counts.push(f64::from(rec.count));
                }
            }
        }
        (times, counts)
    }

    /// Largest observed right time, or `None` for an empty store.
    pub fn last_time(&self) -> Option<f64> {
        self.pooled.last().map(|r| r.right_time)
    }
}
