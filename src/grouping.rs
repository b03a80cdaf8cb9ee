//! Label partition of the index split.
//!
//! Ground truth for a labeled benchmark is "every index document that
//! shares the query's class label". [`LabelGroups`] is that partition,
//! built once from the index split and shared read-only afterwards.

use std::collections::HashMap;

use tracing::debug;

use crate::dataset::RawSplit;
use crate::error::{BenchError, Result};

/// Mapping from class label to the index-split document ids carrying it,
/// in first-seen (split) order.
///
/// Every id of the source split appears in exactly one group; the union
/// of all groups is the full id range. Rebuilding from the same split
/// yields the same groups in the same order.
#[derive(Debug, Clone)]
pub struct LabelGroups {
    groups: HashMap<u32, Vec<u32>>,
    n_docs: usize,
}

impl LabelGroups {
    /// Partition `split` by label in a single pass.
    ///
    /// Errors with [`BenchError::EmptySplit`] on a zero-document split.
    pub fn build(split: &RawSplit) -> Result<Self> {
        if split.is_empty() {
            return Err(BenchError::EmptySplit { split: split.name() });
        }

        let mut groups: HashMap<u32, Vec<u32>> = HashMap::new();
        for (id, &label) in split.labels().iter().enumerate() {
            groups.entry(label).or_default().push(id as u32);
        }

        debug!(
            split = split.name(),
            n_docs = split.len(),
            n_labels = groups.len(),
            "built label groups"
        );

        Ok(Self {
            groups,
            n_docs: split.len(),
        })
    }

    /// Ids sharing `label`, in first-seen order. `None` if the label
    /// never occurs in the source split.
    pub fn get(&self, label: u32) -> Option<&[u32]> {
        self.groups.get(&label).map(Vec::as_slice)
    }

    pub fn contains(&self, label: u32) -> bool {
        self.groups.contains_key(&label)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of documents in the partitioned split.
    pub fn n_docs(&self) -> usize {
        self.n_docs
    }

    /// Iterate over the distinct labels (arbitrary order).
    pub fn labels(&self) -> impl Iterator<Item = u32> + '_ {
        self.groups.keys().copied()
    }
}
