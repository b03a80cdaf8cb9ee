//! Evaluation pairs and the scoring drive loop.
//!
//! The evaluation stream re-draws the query sample (same contract as
//! [`QueryStream`](crate::stream::QueryStream), so the same
//! [`SampleSpec`] selects the same queries) and pairs each query with
//! the relevant-id set derived from its label group. Ground truth must
//! exist for every sampled query up front: a label with no group is a
//! data-consistency failure, not an empty answer.

use tracing::{debug, info};

use crate::aggregate::{AggregateReport, MetricAggregator, MetricResult};
use crate::dataset::{Document, RawSplit};
use crate::engine::SearchEngine;
use crate::error::{BenchError, Result};
use crate::grouping::LabelGroups;
use crate::metrics::score_retrieval;
use crate::stream::{sample_ids, SampleSpec};

/// A sampled query together with its ground-truth relevant ids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationPair<'a> {
    pub query: Document<'a>,
    /// Index-split ids sharing the query's label; never empty.
    pub relevant_ids: &'a [u32],
}

/// Lazy stream of [`EvaluationPair`]s in sampled emission order.
///
/// Like the document streams, this is a one-pass cursor consumed by
/// iteration; rebuild from the split for a second pass.
#[derive(Debug)]
pub struct EvaluationStream<'a> {
    split: &'a RawSplit,
    entries: Vec<(u32, &'a [u32])>,
    cursor: usize,
}

impl<'a> EvaluationStream<'a> {
    /// Draw the sample and resolve every query's label group.
    ///
    /// Errors with [`BenchError::InsufficientData`] on a bad sample
    /// request and [`BenchError::UnknownLabel`] if any sampled query's
    /// label has no group — failing before anything is emitted keeps
    /// the 1:1 correspondence between queries and ground truth intact.
    pub fn new(
        query_split: &'a RawSplit,
        spec: &SampleSpec,
        groups: &'a LabelGroups,
    ) -> Result<Self> {
        let ids = sample_ids(query_split, spec)?;

        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            let label = query_split.label(id);
            let relevant = groups.get(label).ok_or(BenchError::UnknownLabel {
                label,
                query_id: id,
            })?;
            entries.push((id, relevant));
        }

        debug!(
            split = query_split.name(),
            pairs = entries.len(),
            "evaluation stream open"
        );

        Ok(Self {
            split: query_split,
            entries,
            cursor: 0,
        })
    }
}

impl<'a> Iterator for EvaluationStream<'a> {
    type Item = EvaluationPair<'a>;

    fn next(&mut self) -> Option<EvaluationPair<'a>> {
        let &(id, relevant_ids) = self.entries.get(self.cursor)?;
        self.cursor += 1;
        Some(EvaluationPair {
            query: self.split.document(id),
            relevant_ids,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EvaluationStream<'_> {}

/// Drive the evaluation phase with a caller-supplied scorer.
///
/// For each pair the engine retrieves `top_k` matches, the scorer turns
/// (retrieved ids, relevant ids) into a [`MetricResult`], and the
/// aggregator folds it in. A scorer returning NaN for some metric on
/// one query only excludes that value; an engine error aborts the run.
pub fn evaluate_with<E, F>(
    stream: EvaluationStream<'_>,
    engine: &E,
    top_k: usize,
    scorer: F,
) -> Result<AggregateReport>
where
    E: SearchEngine,
    F: Fn(&[u32], &[u32]) -> MetricResult,
{
    let mut aggregator = MetricAggregator::new();
    let mut n_queries = 0usize;

    for pair in stream {
        let matches = engine.retrieve(&pair.query, top_k)?;
        let retrieved: Vec<u32> = matches.iter().map(|m| m.id).collect();
        aggregator.accumulate(&scorer(&retrieved, pair.relevant_ids));
        n_queries += 1;
    }

    let report = aggregator.finalize();
    info!(n_queries, top_k, summary = %report.summary(), "evaluation complete");
    Ok(report)
}

/// [`evaluate_with`] using the default precision/recall scorer.
pub fn evaluate<E: SearchEngine>(
    stream: EvaluationStream<'_>,
    engine: &E,
    top_k: usize,
) -> Result<AggregateReport> {
    evaluate_with(stream, engine, top_k, |retrieved, relevant| {
        score_retrieval(retrieved, relevant, top_k)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RawSplit;
    use crate::grouping::LabelGroups;
    use crate::stream::QueryStream;

    fn labeled_split(name: &'static str, labels: Vec<u32>) -> RawSplit {
        let vectors = labels.iter().map(|&l| vec![l as f32, 0.0]).collect();
        RawSplit::new(name, vectors, labels).unwrap()
    }

    #[test]
    fn test_pairs_carry_label_groups() {
        let index = labeled_split("index", vec![0, 0, 1, 1]);
        let queries = labeled_split("query", vec![0, 1]);
        let groups = LabelGroups::build(&index).unwrap();

        let pairs: Vec<_> = EvaluationStream::new(&queries, &SampleSpec::take(2), &groups)
            .unwrap()
            .collect();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].query.id, 0);
        assert_eq!(pairs[0].relevant_ids, &[0, 1]);
        assert_eq!(pairs[1].query.id, 1);
        assert_eq!(pairs[1].relevant_ids, &[2, 3]);
    }

    #[test]
    fn test_unknown_label_fails_fast() {
        let index = labeled_split("index", vec![0, 0, 1, 1]);
        let queries = labeled_split("query", vec![0, 2]);
        let groups = LabelGroups::build(&index).unwrap();

        assert_eq!(
            EvaluationStream::new(&queries, &SampleSpec::take(2), &groups).unwrap_err(),
            BenchError::UnknownLabel {
                label: 2,
                query_id: 1
            }
        );
    }

    #[test]
    fn test_same_spec_selects_same_sample_as_query_stream() {
        let index = labeled_split("index", vec![0, 1, 2, 0, 1, 2]);
        let queries = labeled_split("query", (0..30).map(|i| i % 3).collect());
        let groups = LabelGroups::build(&index).unwrap();
        let spec = SampleSpec::take(10).seeded(42).shuffled();

        let from_query: Vec<u32> = QueryStream::new(&queries, &spec)
            .unwrap()
            .map(|d| d.id)
            .collect();
        let from_eval: Vec<u32> = EvaluationStream::new(&queries, &spec, &groups)
            .unwrap()
            .map(|p| p.query.id)
            .collect();
        assert_eq!(from_query, from_eval);
    }
}
