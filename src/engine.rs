//! The seam to the external search engine.
//!
//! The harness never looks inside the engine: it hands over a finite
//! document stream to build an index, then asks for top-k matches per
//! query. [`ExactScanEngine`] is the brute-force reference
//! implementation, useful as a baseline and in tests.

use crate::dataset::Document;
use crate::error::Result;

/// One retrieved result: an index-split document id and the engine's
/// score for it (lower is better for distance-based engines; the
/// ordering of the returned list is authoritative).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub id: u32,
    pub score: f32,
}

/// An indexing/query engine consuming the harness's streams.
pub trait SearchEngine {
    /// Consume a finite document stream and build the index.
    ///
    /// `batch_hint` suggests how many documents to ingest per batch;
    /// engines may ignore it. Pulling the stream in batches does not
    /// change what is ultimately indexed.
    fn build_index<'a, I>(&mut self, docs: I, batch_hint: Option<usize>) -> Result<()>
    where
        I: Iterator<Item = Document<'a>>;

    /// Return the top-k matches for `query`, best first.
    fn retrieve(&self, query: &Document<'_>, top_k: usize) -> Result<Vec<Match>>;
}

/// Exhaustive L2 scan over the indexed vectors.
///
/// Exact by construction, O(n·d) per query. Copies document content at
/// build time, as any real engine would.
#[derive(Debug, Default)]
pub struct ExactScanEngine {
    ids: Vec<u32>,
    vectors: Vec<Vec<f32>>,
}

impl ExactScanEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl SearchEngine for ExactScanEngine {
    fn build_index<'a, I>(&mut self, docs: I, _batch_hint: Option<usize>) -> Result<()>
    where
        I: Iterator<Item = Document<'a>>,
    {
        for doc in docs {
            self.ids.push(doc.id);
            self.vectors.push(doc.content.to_vec());
        }
        Ok(())
    }

    fn retrieve(&self, query: &Document<'_>, top_k: usize) -> Result<Vec<Match>> {
        let mut matches: Vec<Match> = self
            .ids
            .iter()
            .zip(self.vectors.iter())
            .map(|(&id, vec)| Match {
                id,
                score: l2_squared(query.content, vec),
            })
            .collect();

        matches.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(top_k);
        Ok(matches)
    }
}

/// L2 distance squared (ordering-equivalent, no sqrt).
#[inline]
fn l2_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
