//! verity: data-streaming and evaluation core for retrieval benchmarks.
//!
//! A benchmark run streams a labeled dataset into an external search
//! engine, samples held-out queries, and scores the engine's top-k
//! results against ground truth derived from shared class labels. This
//! crate is the part of that loop with real invariants:
//!
//! - `dataset`: raw splits and on-demand [`Document`] views
//! - `grouping`: the label → document-ids partition that defines
//!   ground truth
//! - `stream`: lazy one-pass index and query streams
//! - `evaluation`: (query, relevant-ids) pairs and the scoring loop
//! - `aggregate`: order-independent reduction of per-query metrics
//! - `metrics`: precision/recall/reciprocal-rank per query
//! - `engine`: the trait seam to the engine, plus an exact-scan baseline
//!
//! # Pipeline
//!
//! ```text
//! RawSplit (index) ──► LabelGroups ─────────────┐
//!       │                                       │
//!       └─► IndexStream ──► engine.build_index  │
//! RawSplit (query) ─► QueryStream ─► engine.retrieve(top_k)
//!       │                                       │
//!       └─► EvaluationStream ◄──────────────────┘
//!               │ per-query MetricResult
//!               ▼
//!        MetricAggregator ──► AggregateReport
//! ```
//!
//! # Example
//!
//! ```
//! use verity::{
//!     evaluate, generate_labeled_split, ExactScanEngine, IndexStream, LabelGroups,
//!     SampleSpec, SearchEngine,
//! };
//!
//! let index_split = generate_labeled_split("index", 200, 16, 10, 42);
//! let query_split = generate_labeled_split("query", 50, 16, 10, 43);
//!
//! let groups = LabelGroups::build(&index_split).unwrap();
//! let mut engine = ExactScanEngine::new();
//! engine
//!     .build_index(IndexStream::new(&index_split).unwrap(), Some(64))
//!     .unwrap();
//!
//! let stream = verity::EvaluationStream::new(
//!     &query_split,
//!     &SampleSpec::take(16).seeded(7),
//!     &groups,
//! )
//! .unwrap();
//! let report = evaluate(stream, &engine, 10).unwrap();
//! assert!(report.mean("precision").is_some());
//! ```
//!
//! Streams are single-pass cursors: iteration consumes them, and a
//! second pass means rebuilding from the [`RawSplit`]. All components
//! are synchronous and lock-free; parallel scorers keep one
//! [`MetricAggregator`] per worker and merge at the end.

pub mod aggregate;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod grouping;
pub mod metrics;
pub mod stream;

pub use aggregate::{AggregateReport, MetricAggregator, MetricResult, MetricSummary};
pub use dataset::{generate_labeled_split, Document, RawSplit};
pub use engine::{ExactScanEngine, Match, SearchEngine};
pub use error::{BenchError, Result};
pub use evaluation::{evaluate, evaluate_with, EvaluationPair, EvaluationStream};
pub use grouping::LabelGroups;
pub use metrics::{precision_at_k, recall_at_k, reciprocal_rank, score_retrieval};
pub use stream::{IndexStream, QueryStream, SampleSpec};
