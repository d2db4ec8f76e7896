use std::fs;
use std::path::Path;

use navfid_core::{Category, Dataset};

use crate::EvalError;

/// Reads and parses one dataset file. Unreadable files and malformed JSON are
/// the two fatal conditions of a run.
pub fn load_dataset(path: &Path, category: Category) -> Result<Dataset, EvalError> {
    let payload = fs::read_to_string(path).map_err(|source| EvalError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Dataset::from_json_str(&payload, category).map_err(|source| EvalError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub fn file_size(path: &Path) -> Result<u64, EvalError> {
    fs::metadata(path)
        .map(|metadata| metadata.len())
        .map_err(|source| EvalError::Io {
            path: path.display().to_string(),
            source,
        })
}
