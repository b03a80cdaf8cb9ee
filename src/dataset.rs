//! Raw dataset splits and the documents derived from them.
//!
//! A benchmark run works on two named splits of the same corpus: the
//! `index` split is fed to the engine to build its index, the `query`
//! split is sampled for held-out queries. Within a split, a document's
//! position is its canonical id.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{BenchError, Result};

/// A named dataset partition: parallel content and label arrays.
///
/// Positions into the two arrays are the canonical document ids for
/// this split. The arrays are immutable once constructed; streams
/// borrow from them and materialize [`Document`]s on demand.
#[derive(Debug, Clone)]
pub struct RawSplit {
    name: &'static str,
    vectors: Vec<Vec<f32>>,
    labels: Vec<u32>,
}

impl RawSplit {
    /// Wrap already-loaded arrays as a split.
    ///
    /// Acquisition (download, decoding) is the caller's concern; this
    /// only checks the parallel-array invariant.
    pub fn new(name: &'static str, vectors: Vec<Vec<f32>>, labels: Vec<u32>) -> Result<Self> {
        if vectors.len() != labels.len() {
            return Err(BenchError::MismatchedSplit {
                vectors: vectors.len(),
                labels: labels.len(),
            });
        }
        Ok(Self {
            name,
            vectors,
            labels,
        })
    }

    /// Split name (`"index"` or `"query"` in a standard run).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of documents in the split.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label of the document at `id`.
    pub fn label(&self, id: u32) -> u32 {
        self.labels[id as usize]
    }

    /// All labels, in split order.
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Materialize the document at `id` as a borrowed view.
    pub(crate) fn document(&self, id: u32) -> Document<'_> {
        Document {
            id,
            content: &self.vectors[id as usize],
            label: self.labels[id as usize],
        }
    }
}

/// A single document handed to a consumer: borrowed content plus its
/// split-local id and class label.
///
/// Documents are created on demand by a stream and never mutated;
/// consumers that keep content past the pull must copy it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Document<'a> {
    /// Position in the originating split.
    pub id: u32,
    /// Raw content vector.
    pub content: &'a [f32],
    /// Class label shared with all relevant documents.
    pub label: u32,
}

/// Generate a synthetic labeled split for tests and benches.
///
/// Each label gets a cluster center in `[0, 1]^dim`; documents are
/// sampled around their label's center with Gaussian noise, so
/// same-label documents are also near neighbors in content space.
/// Labels cycle round-robin over `n_labels`.
///
/// # Arguments
///
/// * `name` - Split name
/// * `n_docs` - Number of documents
/// * `dim` - Content dimensionality
/// * `n_labels` - Number of distinct class labels
/// * `seed` - Random seed for reproducibility
pub fn generate_labeled_split(
    name: &'static str,
    n_docs: usize,
    dim: usize,
    n_labels: usize,
    seed: u64,
) -> RawSplit {
    let mut rng = StdRng::seed_from_u64(seed);

    let centers: Vec<Vec<f32>> = (0..n_labels)
        .map(|_| (0..dim).map(|_| rng.random::<f32>()).collect())
        .collect();

    let sample_near = |rng: &mut StdRng, center: &[f32]| -> Vec<f32> {
        center
            .iter()
            .map(|&c| {
                // Box-Muller for Gaussian
                let u1: f32 = rng.random();
                let u2: f32 = rng.random();
                let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
                (c + z * 0.05).clamp(0.0, 1.0)
            })
            .collect()
    };

    let labels: Vec<u32> = (0..n_docs).map(|i| (i % n_labels) as u32).collect();
    let vectors: Vec<Vec<f32>> = labels
        .iter()
        .map(|&label| sample_near(&mut rng, &centers[label as usize]))
        .collect();

    RawSplit {
        name,
        vectors,
        labels,
    }
}
