//! Evaluation orchestrator for navigation-data standardization: discovers
//! ground-truth/converted file pairs, drives the metric calculators from
//! `navfid-core` over each pair, and assembles the fixed-shape evaluation
//! report.

use thiserror::Error;

pub mod bench;
pub mod discover;
pub mod evaluator;
pub mod loader;
pub mod report;
pub mod schema;

pub use bench::BenchmarkReport;
pub use discover::FilePair;
pub use evaluator::{EvalConfig, Evaluator};
pub use report::{EvaluationReport, Section};

/// Process-fatal failures. Everything else (missing counterparts, missing
/// fields, stale matches, degenerate statistics) stays local to the affected
/// sample set and never aborts a run.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("failed to read directory '{path}': {source}")]
    ReadDir {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse JSON in '{path}': {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}
