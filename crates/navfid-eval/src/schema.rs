use std::fs;
use std::path::Path;

use navfid_core::{Category, Dataset, FieldPath};
use serde::Deserialize;
use tracing::debug;

use crate::EvalError;

/// On-disk sidecar layout: `metadata/schema_documentation.json` next to the
/// ground-truth directory, listing dotted required-field paths per category.
#[derive(Debug, Default, Deserialize)]
struct SchemaDocument {
    #[serde(default)]
    gnss: CategoryRequirements,
    #[serde(default)]
    imu: CategoryRequirements,
}

#[derive(Debug, Default, Deserialize)]
struct CategoryRequirements {
    #[serde(default)]
    required_fields: Vec<String>,
}

/// Required fields per category, used for schema-compliance scoring.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    gnss: Vec<FieldPath>,
    imu: Vec<FieldPath>,
}

impl Schema {
    pub fn required_fields(&self, category: Category) -> &[FieldPath] {
        match category {
            Category::Gnss => &self.gnss,
            Category::Imu => &self.imu,
        }
    }

    /// Loads the schema sidecar if one exists beside the ground-truth
    /// directory. A missing sidecar is not an error; a malformed one is.
    pub fn from_sidecar(ground_truth_dir: &Path) -> Result<Option<Self>, EvalError> {
        let Some(parent) = ground_truth_dir.parent() else {
            return Ok(None);
        };
        let path = parent.join("metadata").join("schema_documentation.json");
        if !path.exists() {
            debug!(path = %path.display(), "no schema sidecar; inferring from ground truth");
            return Ok(None);
        }
        let payload = fs::read_to_string(&path).map_err(|source| EvalError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let document: SchemaDocument =
            serde_json::from_str(&payload).map_err(|source| EvalError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Some(Self {
            gnss: parse_paths(&document.gnss.required_fields),
            imu: parse_paths(&document.imu.required_fields),
        }))
    }

    /// Fallback schema: the union of numeric field paths observed across the
    /// ground-truth datasets of each category.
    pub fn inferred<'a>(datasets: impl IntoIterator<Item = &'a Dataset>) -> Self {
        let mut gnss = std::collections::BTreeSet::new();
        let mut imu = std::collections::BTreeSet::new();
        for dataset in datasets {
            let target = match dataset.category {
                Category::Gnss => &mut gnss,
                Category::Imu => &mut imu,
            };
            target.extend(dataset.observed_numeric_paths());
        }
        Self {
            gnss: gnss.iter().map(|path| FieldPath::parse(path)).collect(),
            imu: imu.iter().map(|path| FieldPath::parse(path)).collect(),
        }
    }
}

fn parse_paths(raw: &[String]) -> Vec<FieldPath> {
    raw.iter().map(|path| FieldPath::parse(path)).collect()
}
