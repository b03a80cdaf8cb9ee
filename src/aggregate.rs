//! Running aggregation of per-query metric results.
//!
//! The reduction is a plain `(sum, count)` per metric name, so the
//! final means are independent of feed order and of any partitioning
//! into batches. Parallel consumers keep one aggregator per worker and
//! [`MetricAggregator::merge`] the partials at the end; there is no
//! internal locking.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Named metric values for one evaluated query.
///
/// A metric that is mathematically undefined for the query (empty
/// relevant set, say) is carried as `f64::NAN` and excluded from
/// aggregation rather than biasing it as a zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricResult {
    values: SmallVec<[(String, f64); 4]>,
}

impl MetricResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` under `name`, replacing an earlier value for the
    /// same name.
    pub fn record(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        if let Some(slot) = self.values.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.values.push((name, value));
        }
    }

    /// Builder-style [`record`](Self::record).
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.record(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct RunningSum {
    sum: f64,
    count: u64,
}

/// Order-independent reducer of [`MetricResult`]s.
#[derive(Debug, Clone, Default)]
pub struct MetricAggregator {
    totals: HashMap<String, RunningSum>,
}

impl MetricAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one query's results in. NaN values are skipped so an
    /// undefined metric never inflates the denominator; a malformed
    /// single result degrades to a no-op instead of aborting the run.
    pub fn accumulate(&mut self, result: &MetricResult) {
        for (name, value) in result.iter() {
            if value.is_nan() {
                continue;
            }
            let entry = self.totals.entry(name.to_owned()).or_default();
            entry.sum += value;
            entry.count += 1;
        }
    }

    /// Add another aggregator's sums and counts into this one.
    ///
    /// The reduction is associative and commutative, so merging
    /// per-worker partials is equivalent to serial accumulation.
    pub fn merge(&mut self, other: MetricAggregator) {
        for (name, partial) in other.totals {
            let entry = self.totals.entry(name).or_default();
            entry.sum += partial.sum;
            entry.count += partial.count;
        }
    }

    /// Number of distinct metric names seen so far.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Snapshot the current state as a report.
    ///
    /// Idempotent and side-effect-free: does not reset, may be called
    /// between batches, always reflects every `accumulate` so far.
    pub fn finalize(&self) -> AggregateReport {
        let metrics = self
            .totals
            .iter()
            .map(|(name, rs)| {
                (
                    name.clone(),
                    MetricSummary {
                        sum: rs.sum,
                        count: rs.count,
                    },
                )
            })
            .collect();
        AggregateReport { metrics }
    }
}

/// Per-metric running sum and count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub sum: f64,
    pub count: u64,
}

impl MetricSummary {
    /// Arithmetic mean of the defined values; `None` when no value was
    /// ever accumulated (undefined, not zero).
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Final summary handed to the report-rendering collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    metrics: BTreeMap<String, MetricSummary>,
}

impl AggregateReport {
    pub fn get(&self, name: &str) -> Option<&MetricSummary> {
        self.metrics.get(name)
    }

    /// Mean for `name`, `None` for an unknown metric or one with no
    /// defined values.
    pub fn mean(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).and_then(MetricSummary::mean)
    }

    /// Metric entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricSummary)> {
        self.metrics.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .metrics
            .iter()
            .map(|(name, s)| match s.mean() {
                Some(mean) => format!("{name}={mean:.4} (n={})", s.count),
                None => format!("{name}=n/a"),
            })
            .collect();
        parts.join(", ")
    }
}
