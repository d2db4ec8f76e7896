use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::EvalError;

/// Resource profile of an externally benchmarked conversion run, embedded
/// verbatim into the efficiency section of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub timestamp: String,
    #[serde(default)]
    pub input_files: Vec<BenchmarkInput>,
    pub total_time_seconds: f64,
    pub average_time_per_file_seconds: f64,
    pub peak_memory_usage_mb: f64,
    pub average_cpu_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkInput {
    pub path: String,
    pub size_bytes: u64,
}

pub fn load_benchmark_report(path: &Path) -> Result<BenchmarkReport, EvalError> {
    let payload = fs::read_to_string(path).map_err(|source| EvalError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&payload).map_err(|source| EvalError::Parse {
        path: path.display().to_string(),
        source,
    })
}
