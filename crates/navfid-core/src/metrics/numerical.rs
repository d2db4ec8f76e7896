use std::collections::BTreeMap;

use serde::Serialize;

use crate::align::Alignment;
use crate::fields::FieldPath;
use crate::record::Dataset;
use crate::stats;

/// Error statistics for one field across an alignment pass. The field set is
/// fixed: absent data yields `None` statistics, not missing keys.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldErrorStats {
    pub mae: Option<f64>,
    pub rmse: Option<f64>,
    pub nrmse: Option<f64>,
    pub max_error: Option<f64>,
    pub min_error: Option<f64>,
    pub std_error: Option<f64>,
    pub num_matched_points: usize,
    pub matched_percentage: f64,
}

impl FieldErrorStats {
    fn empty() -> Self {
        Self {
            mae: None,
            rmse: None,
            nrmse: None,
            max_error: None,
            min_error: None,
            std_error: None,
            num_matched_points: 0,
            matched_percentage: 0.0,
        }
    }
}

/// Absolute-difference statistics for one field over the aligned pairs.
/// `matched_percentage` is relative to the total ground-truth record count;
/// NRMSE divides by the range of the field across all ground-truth records
/// and is `None` when that range is zero.
pub fn field_error_stats(
    ground_truth: &Dataset,
    converted: &Dataset,
    path: &FieldPath,
    alignment: &Alignment,
) -> FieldErrorStats {
    let errors: Vec<f64> = alignment
        .field_pairs(&ground_truth.records, &converted.records, path)
        .into_iter()
        .map(|(gt, conv)| (gt - conv).abs())
        .collect();

    if errors.is_empty() {
        return FieldErrorStats::empty();
    }

    let rmse = stats::rms(&errors);
    let nrmse = rmse.and_then(|rmse| {
        let gt_range = stats::range(&ground_truth.field_series(path))?;
        (gt_range > 0.0).then(|| rmse / gt_range)
    });

    FieldErrorStats {
        mae: stats::mean(&errors),
        rmse,
        nrmse,
        max_error: stats::max(&errors),
        min_error: stats::min(&errors),
        std_error: stats::std_dev(&errors),
        num_matched_points: errors.len(),
        matched_percentage: errors.len() as f64 / ground_truth.len() as f64 * 100.0,
    }
}

/// Error statistics for every field in `fields`, keyed by dotted path.
pub fn field_error_table(
    ground_truth: &Dataset,
    converted: &Dataset,
    fields: &[FieldPath],
    alignment: &Alignment,
) -> BTreeMap<String, FieldErrorStats> {
    fields
        .iter()
        .map(|path| {
            (
                path.as_str().to_string(),
                field_error_stats(ground_truth, converted, path, alignment),
            )
        })
        .collect()
}
