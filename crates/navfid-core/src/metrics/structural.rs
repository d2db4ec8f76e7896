use serde::Serialize;

use crate::fields::FieldPath;
use crate::record::Dataset;

/// Fraction of (record, required-field) pairs that resolve in the converted
/// data, as a percentage.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SchemaCompliance {
    pub compliance_score: f64,
    pub compliant_fields: usize,
    pub total_fields: usize,
}

pub fn schema_compliance(converted: &Dataset, required_fields: &[FieldPath]) -> SchemaCompliance {
    let mut total_fields = 0usize;
    let mut compliant_fields = 0usize;
    for record in &converted.records {
        for field in required_fields {
            total_fields += 1;
            if record.resolve(field).is_some() {
                compliant_fields += 1;
            }
        }
    }
    let compliance_score = if total_fields > 0 {
        compliant_fields as f64 / total_fields as f64 * 100.0
    } else {
        0.0
    };
    SchemaCompliance {
        compliance_score,
        compliant_fields,
        total_fields,
    }
}

/// Fraction of ground-truth-observed numeric field paths that exist anywhere
/// in the converted data, as a percentage.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldMappingAccuracy {
    pub mapping_accuracy: f64,
    pub mapped_fields: usize,
    pub total_fields: usize,
}

pub fn field_mapping(ground_truth: &Dataset, converted: &Dataset) -> FieldMappingAccuracy {
    let gt_paths = ground_truth.observed_numeric_paths();
    let total_fields = gt_paths.len();
    let mapped_fields = gt_paths
        .iter()
        .map(|path| FieldPath::parse(path))
        .filter(|path| {
            converted
                .records
                .iter()
                .any(|record| record.resolve(path).is_some())
        })
        .count();
    let mapping_accuracy = if total_fields > 0 {
        mapped_fields as f64 / total_fields as f64 * 100.0
    } else {
        0.0
    };
    FieldMappingAccuracy {
        mapping_accuracy,
        mapped_fields,
        total_fields,
    }
}
