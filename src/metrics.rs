//! Per-query retrieval metrics against a relevant-id set.
//!
//! Ground truth here is an unranked set of relevant ids (everything
//! sharing the query's label), so precision divides by the number of
//! results inspected and recall by the size of the relevant set. A
//! metric that is undefined for a query returns `f64::NAN`, which the
//! aggregator excludes.

use std::collections::HashSet;

use crate::aggregate::MetricResult;

/// Fraction of the top-k retrieved ids that are relevant.
///
/// NaN when nothing was retrieved (or `k == 0`), since there is no
/// denominator to speak of.
pub fn precision_at_k(retrieved: &[u32], relevant: &[u32], k: usize) -> f64 {
    let limit = k.min(retrieved.len());
    if limit == 0 {
        return f64::NAN;
    }

    let relevant_set: HashSet<u32> = relevant.iter().copied().collect();
    let hits = retrieved[..limit]
        .iter()
        .filter(|id| relevant_set.contains(id))
        .count();
    hits as f64 / limit as f64
}

/// Fraction of the relevant set found in the top-k retrieved ids.
///
/// NaN when the relevant set is empty (a well-formed benchmark never
/// produces one, see the evaluation stream's label check).
pub fn recall_at_k(retrieved: &[u32], relevant: &[u32], k: usize) -> f64 {
    if relevant.is_empty() {
        return f64::NAN;
    }

    let relevant_set: HashSet<u32> = relevant.iter().copied().collect();
    let limit = k.min(retrieved.len());
    let hits = retrieved[..limit]
        .iter()
        .filter(|id| relevant_set.contains(id))
        .count();
    hits as f64 / relevant_set.len() as f64
}

/// Reciprocal rank of the first relevant result, 0.0 if none appears.
pub fn reciprocal_rank(retrieved: &[u32], relevant: &[u32]) -> f64 {
    if relevant.is_empty() {
        return f64::NAN;
    }

    let relevant_set: HashSet<u32> = relevant.iter().copied().collect();
    for (rank, id) in retrieved.iter().enumerate() {
        if relevant_set.contains(id) {
            return 1.0 / (rank + 1) as f64;
        }
    }
    0.0
}

/// Default per-query scorer: precision and recall at `k`.
pub fn score_retrieval(retrieved: &[u32], relevant: &[u32], k: usize) -> MetricResult {
    MetricResult::new()
        .with("precision", precision_at_k(retrieved, relevant, k))
        .with("recall", recall_at_k(retrieved, relevant, k))
}
