use std::collections::BTreeMap;

use serde::Serialize;

use crate::align::Alignment;
use crate::fields::FieldPath;
use crate::record::Dataset;
use crate::stats;

/// Histogram bin-count heuristic shared by entropy and mutual information:
/// one bin per five samples, capped at 20.
pub fn bin_count(samples: usize) -> usize {
    (samples / 5).min(20)
}

/// Equal-width histogram range; a zero-width range is widened by half a unit
/// on each side so every sample still lands in a bin.
fn bin_edges(values: &[f64]) -> Option<(f64, f64)> {
    let lo = stats::min(values)?;
    let hi = stats::max(values)?;
    if lo == hi {
        return Some((lo - 0.5, hi + 0.5));
    }
    Some((lo, hi))
}

fn bin_index(value: f64, lo: f64, hi: f64, bins: usize) -> usize {
    let scaled = (value - lo) / (hi - lo) * bins as f64;
    // The final edge is inclusive.
    (scaled as usize).min(bins - 1)
}

fn histogram(values: &[f64], bins: usize) -> Option<Vec<usize>> {
    let (lo, hi) = bin_edges(values)?;
    let mut counts = vec![0usize; bins];
    for value in values {
        counts[bin_index(*value, lo, hi, bins)] += 1;
    }
    Some(counts)
}

/// Shannon entropy (nats) of the binned value distribution. Zero when fewer
/// than two bins are available.
pub fn entropy(values: &[f64]) -> f64 {
    let bins = bin_count(values.len());
    if bins < 2 {
        return 0.0;
    }
    let Some(counts) = histogram(values, bins) else {
        return 0.0;
    };
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    counts
        .iter()
        .filter(|count| **count > 0)
        .map(|count| {
            let p = *count as f64 / total as f64;
            -p * p.ln()
        })
        .sum()
}

/// Converted-to-ground-truth entropy ratio; `None` when the ground-truth
/// entropy is zero.
pub fn entropy_ratio(gt_values: &[f64], conv_values: &[f64]) -> Option<f64> {
    let gt_entropy = entropy(gt_values);
    (gt_entropy > 0.0).then(|| entropy(conv_values) / gt_entropy)
}

/// Mutual information (nats) of the aligned pairs via a 2-D joint histogram,
/// each axis binned over its own value range. `None` below two bins.
pub fn mutual_information(pairs: &[(f64, f64)]) -> Option<f64> {
    let bins = bin_count(pairs.len());
    if bins < 2 {
        return None;
    }
    let gt_values: Vec<f64> = pairs.iter().map(|(gt, _)| *gt).collect();
    let conv_values: Vec<f64> = pairs.iter().map(|(_, conv)| *conv).collect();
    let (gt_lo, gt_hi) = bin_edges(&gt_values)?;
    let (conv_lo, conv_hi) = bin_edges(&conv_values)?;

    let mut joint = vec![vec![0usize; bins]; bins];
    for (gt, conv) in pairs {
        joint[bin_index(*gt, gt_lo, gt_hi, bins)][bin_index(*conv, conv_lo, conv_hi, bins)] += 1;
    }

    let total = pairs.len() as f64;
    let row_sums: Vec<usize> = joint.iter().map(|row| row.iter().sum()).collect();
    let col_sums: Vec<usize> = (0..bins).map(|j| joint.iter().map(|row| row[j]).sum()).collect();

    let mut mi = 0.0;
    for (i, row) in joint.iter().enumerate() {
        for (j, count) in row.iter().enumerate() {
            if *count == 0 {
                continue;
            }
            let p_joint = *count as f64 / total;
            let p_product = (row_sums[i] as f64 / total) * (col_sums[j] as f64 / total);
            mi += p_joint * (p_joint / p_product).ln();
        }
    }
    Some(mi)
}

#[derive(Debug, Clone, Serialize)]
pub struct EntropyRatioReport {
    pub average_entropy_ratio: Option<f64>,
    pub field_entropy_ratios: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MutualInformationReport {
    pub average_mutual_information: Option<f64>,
    pub field_mutual_information: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InformationContent {
    pub entropy_ratio: EntropyRatioReport,
    pub mutual_information: MutualInformationReport,
}

/// Per-file information-content metrics over every numeric field observed in
/// ground truth. Entropy is computed per dataset over each side's own values;
/// mutual information uses the aligned pairs. Averages skip `None` entries.
pub fn information_content(
    ground_truth: &Dataset,
    converted: &Dataset,
    alignment: &Alignment,
) -> InformationContent {
    let mut field_entropy_ratios = BTreeMap::new();
    let mut field_mutual_information = BTreeMap::new();

    for field in ground_truth.observed_numeric_paths() {
        let path = FieldPath::parse(&field);
        let gt_values = ground_truth.field_series(&path);
        let conv_values = converted.field_series(&path);
        if gt_values.is_empty() || conv_values.is_empty() {
            continue;
        }

        field_entropy_ratios.insert(field.clone(), entropy_ratio(&gt_values, &conv_values));

        let pairs = alignment.field_pairs(&ground_truth.records, &converted.records, &path);
        let mi = if pairs.is_empty() {
            None
        } else {
            mutual_information(&pairs)
        };
        field_mutual_information.insert(field, mi);
    }

    let valid_ratios: Vec<f64> = field_entropy_ratios.values().flatten().copied().collect();
    let valid_mi: Vec<f64> = field_mutual_information.values().flatten().copied().collect();

    InformationContent {
        entropy_ratio: EntropyRatioReport {
            average_entropy_ratio: stats::mean(&valid_ratios),
            field_entropy_ratios,
        },
        mutual_information: MutualInformationReport {
            average_mutual_information: stats::mean(&valid_mi),
            field_mutual_information,
        },
    }
}
