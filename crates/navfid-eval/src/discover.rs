use std::fs;
use std::path::{Path, PathBuf};

use navfid_core::Category;
use tracing::debug;

use crate::EvalError;

/// A ground-truth file and its same-named converted counterpart.
#[derive(Debug, Clone)]
pub struct FilePair {
    pub name: String,
    pub category: Category,
    pub ground_truth: PathBuf,
    pub converted: PathBuf,
}

/// Pairs dataset files by identical filename across the two directories,
/// keeping only `.json` files whose name carries a category keyword. Files
/// without a converted counterpart are skipped; names are sorted so
/// evaluation order is deterministic.
pub fn discover_pairs(
    ground_truth_dir: &Path,
    converted_dir: &Path,
) -> Result<Vec<FilePair>, EvalError> {
    let entries = fs::read_dir(ground_truth_dir).map_err(|source| EvalError::ReadDir {
        path: ground_truth_dir.display().to_string(),
        source,
    })?;

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    let mut pairs = Vec::new();
    for name in names {
        let Some(category) = Category::from_file_name(&name) else {
            continue;
        };
        let converted = converted_dir.join(&name);
        if !converted.exists() {
            debug!(file = %name, "no converted counterpart; skipping");
            continue;
        }
        pairs.push(FilePair {
            ground_truth: ground_truth_dir.join(&name),
            converted,
            name,
            category,
        });
    }
    Ok(pairs)
}
