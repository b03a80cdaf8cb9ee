//! Lazy document streams for the index and query phases.
//!
//! Both streams are cursor objects over a borrowed [`RawSplit`]: each
//! pull materializes one [`Document`] view and advances, nothing is
//! buffered. Iteration consumes the stream, so a second pass over the
//! same instance is a compile error; callers needing the data twice
//! rebuild the stream from the split. Consumers may pull in batches of
//! any size without affecting the guarantees, each step is independent
//! beyond the cursor.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::dataset::{Document, RawSplit};
use crate::error::{BenchError, Result};

/// How to draw the held-out query sample.
///
/// Determinism is an explicit caller choice: `seed: Some(s)` reproduces
/// the same draw across runs, `seed: None` pulls a fresh OS-entropy RNG
/// per stream. Nothing reseeds implicitly between runs. The same spec
/// handed to [`QueryStream`] and to the evaluation stream selects the
/// same sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSpec {
    /// Number of queries to draw. Clamped to the split size when larger.
    pub size: usize,
    /// Randomize emission order, independently of the sampling draw.
    pub shuffle: bool,
    /// Fixed RNG seed for a reproducible draw.
    pub seed: Option<u64>,
}

impl SampleSpec {
    /// Sample `size` queries, unshuffled, OS-entropy RNG.
    pub fn take(size: usize) -> Self {
        Self {
            size,
            shuffle: false,
            seed: None,
        }
    }

    pub fn shuffled(mut self) -> Self {
        self.shuffle = true;
        self
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Draw the sampled ids for `spec` against `split`.
///
/// Uniform without replacement; ascending (split) order unless
/// `spec.shuffle` permutes the result as a separate step after the
/// draw. Shared by the query and evaluation streams so both see the
/// identical sample for the same spec.
pub(crate) fn sample_ids(split: &RawSplit, spec: &SampleSpec) -> Result<Vec<u32>> {
    if spec.size == 0 || split.is_empty() {
        return Err(BenchError::InsufficientData {
            requested: spec.size,
            available: split.len(),
        });
    }

    let mut rng = spec.rng();
    let mut ids: Vec<u32> = if spec.size >= split.len() {
        (0..split.len() as u32).collect()
    } else {
        let mut drawn: Vec<u32> = rand::seq::index::sample(&mut rng, split.len(), spec.size)
            .into_iter()
            .map(|i| i as u32)
            .collect();
        drawn.sort_unstable();
        drawn
    };

    if spec.shuffle {
        ids.shuffle(&mut rng);
    }

    Ok(ids)
}

/// Stream of every document in the index split, in split order,
/// exactly once. Consumed by the engine's build-index operation.
#[derive(Debug)]
pub struct IndexStream<'a> {
    split: &'a RawSplit,
    cursor: u32,
}

impl<'a> IndexStream<'a> {
    /// Errors with [`BenchError::EmptySplit`] if there is nothing to
    /// stream.
    pub fn new(split: &'a RawSplit) -> Result<Self> {
        if split.is_empty() {
            return Err(BenchError::EmptySplit { split: split.name() });
        }
        debug!(split = split.name(), n_docs = split.len(), "index stream open");
        Ok(Self { split, cursor: 0 })
    }
}

impl<'a> Iterator for IndexStream<'a> {
    type Item = Document<'a>;

    fn next(&mut self) -> Option<Document<'a>> {
        if (self.cursor as usize) < self.split.len() {
            let doc = self.split.document(self.cursor);
            self.cursor += 1;
            Some(doc)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.split.len() - self.cursor as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for IndexStream<'_> {}

/// Stream of sampled query documents, in the emission order fixed at
/// construction by the [`SampleSpec`].
#[derive(Debug)]
pub struct QueryStream<'a> {
    split: &'a RawSplit,
    ids: Vec<u32>,
    cursor: usize,
}

impl<'a> QueryStream<'a> {
    /// Draw the sample eagerly; document materialization stays lazy.
    ///
    /// Errors with [`BenchError::InsufficientData`] if `spec.size` is
    /// zero or the split is empty.
    pub fn new(split: &'a RawSplit, spec: &SampleSpec) -> Result<Self> {
        let ids = sample_ids(split, spec)?;
        debug!(
            split = split.name(),
            sampled = ids.len(),
            shuffle = spec.shuffle,
            seed = ?spec.seed,
            "query stream open"
        );
        Ok(Self {
            split,
            ids,
            cursor: 0,
        })
    }

    /// The sampled ids in emission order.
    pub fn sampled_ids(&self) -> &[u32] {
        &self.ids
    }
}

impl<'a> Iterator for QueryStream<'a> {
    type Item = Document<'a>;

    fn next(&mut self) -> Option<Document<'a>> {
        let &id = self.ids.get(self.cursor)?;
        self.cursor += 1;
        Some(self.split.document(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.ids.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for QueryStream<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::generate_labeled_split;

    #[test]
    fn test_index_stream_is_identity() {
        let split = generate_labeled_split("index", 20, 4, 5, 1);
        let ids: Vec<u32> = IndexStream::new(&split).unwrap().map(|d| d.id).collect();
        assert_eq!(ids, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_index_stream_rejects_empty() {
        let split = RawSplit::new("index", vec![], vec![]).unwrap();
        assert_eq!(
            IndexStream::new(&split).unwrap_err(),
            BenchError::EmptySplit { split: "index" }
        );
    }

    #[test]
    fn test_full_unshuffled_sample_is_identity() {
        let split = generate_labeled_split("query", 12, 4, 3, 2);
        let stream = QueryStream::new(&split, &SampleSpec::take(12)).unwrap();
        let ids: Vec<u32> = stream.map(|d| d.id).collect();
        assert_eq!(ids, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_oversized_sample_clamps_to_split() {
        let split = generate_labeled_split("query", 8, 4, 2, 3);
        let stream = QueryStream::new(&split, &SampleSpec::take(100)).unwrap();
        assert_eq!(stream.len(), 8);
    }

    #[test]
    fn test_sample_without_replacement() {
        let split = generate_labeled_split("query", 50, 4, 5, 4);
        let mut ids: Vec<u32> = QueryStream::new(&split, &SampleSpec::take(20).seeded(9))
            .unwrap()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids.len(), 20);
        ids.dedup();
        assert_eq!(ids.len(), 20, "sample must not repeat ids");
        assert!(ids.windows(2).all(|w| w[0] < w[1]), "unshuffled sample in split order");
    }

    #[test]
    fn test_seeded_sample_is_reproducible() {
        let split = generate_labeled_split("query", 40, 4, 4, 5);
        let spec = SampleSpec::take(10).seeded(77).shuffled();
        let a: Vec<u32> = QueryStream::new(&split, &spec).unwrap().map(|d| d.id).collect();
        let b: Vec<u32> = QueryStream::new(&split, &spec).unwrap().map(|d| d.id).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_permutes_not_drops() {
        let split = generate_labeled_split("query", 16, 4, 4, 6);
        let spec = SampleSpec::take(16).seeded(11).shuffled();
        let mut ids: Vec<u32> = QueryStream::new(&split, &spec).unwrap().map(|d| d.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_sample_rejected() {
        let split = generate_labeled_split("query", 10, 4, 2, 7);
        assert_eq!(
            QueryStream::new(&split, &SampleSpec::take(0)).unwrap_err(),
            BenchError::InsufficientData {
                requested: 0,
                available: 10
            }
        );
    }

    #[test]
    fn test_empty_split_rejected() {
        let split = RawSplit::new("query", vec![], vec![]).unwrap();
        assert_eq!(
            QueryStream::new(&split, &SampleSpec::take(5)).unwrap_err(),
            BenchError::InsufficientData {
                requested: 5,
                available: 0
            }
        );
    }
}
