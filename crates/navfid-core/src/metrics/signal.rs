use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::align::Alignment;
use crate::fields::FieldPath;
use crate::psd;
use crate::record::{Category, Dataset};
use crate::stats;

/// Minimum aligned sample count before a PSD correlation is attempted.
const PSD_MIN_SAMPLES: usize = 10;

/// Signal-to-noise ratio in decibels. Zero noise power is an explicit
/// sentinel, not a float infinity: it is excluded from averages and
/// serialized as the string `"inf"` since JSON has no infinity literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnrDb {
    Finite(f64),
    Infinite,
}

impl SnrDb {
    pub fn finite(self) -> Option<f64> {
        match self {
            SnrDb::Finite(db) => Some(db),
            SnrDb::Infinite => None,
        }
    }
}

impl Serialize for SnrDb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SnrDb::Finite(db) => serializer.serialize_f64(*db),
            SnrDb::Infinite => serializer.serialize_str("inf"),
        }
    }
}

/// `10 * log10(signal_power / noise_power)` over aligned pairs, with the
/// ground-truth side as signal and the pairwise difference as noise.
pub fn snr_db(pairs: &[(f64, f64)]) -> Option<SnrDb> {
    if pairs.is_empty() {
        return None;
    }
    let n = pairs.len() as f64;
    let signal_power = pairs.iter().map(|(gt, _)| gt * gt).sum::<f64>() / n;
    let noise_power = pairs
        .iter()
        .map(|(gt, conv)| (gt - conv).powi(2))
        .sum::<f64>()
        / n;
    if noise_power == 0.0 {
        return Some(SnrDb::Infinite);
    }
    Some(SnrDb::Finite(10.0 * (signal_power / noise_power).log10()))
}

/// Converted range divided by ground-truth range; `None` when the
/// ground-truth range is zero.
pub fn dynamic_range_ratio(pairs: &[(f64, f64)]) -> Option<f64> {
    let gt_values: Vec<f64> = pairs.iter().map(|(gt, _)| *gt).collect();
    let conv_values: Vec<f64> = pairs.iter().map(|(_, conv)| *conv).collect();
    let gt_range = stats::range(&gt_values)?;
    let conv_range = stats::range(&conv_values)?;
    (gt_range > 0.0).then(|| conv_range / gt_range)
}

/// Pearson correlation between the Welch PSDs of the two aligned signals.
pub fn psd_correlation(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < PSD_MIN_SAMPLES {
        return None;
    }
    let gt_values: Vec<f64> = pairs.iter().map(|(gt, _)| *gt).collect();
    let conv_values: Vec<f64> = pairs.iter().map(|(_, conv)| *conv).collect();
    let gt_psd = psd::welch_psd(&gt_values);
    let conv_psd = psd::welch_psd(&conv_values);
    if gt_psd.is_empty() || conv_psd.is_empty() {
        return None;
    }
    stats::pearson(&gt_psd, &conv_psd)
}

#[derive(Debug, Clone, Serialize)]
pub struct SnrReport {
    pub average_snr_db: Option<f64>,
    pub field_snr_db: BTreeMap<String, SnrDb>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrequencyResponseReport {
    pub average_frequency_correlation: Option<f64>,
    pub field_frequency_correlation: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DynamicRangeReport {
    pub average_range_ratio: Option<f64>,
    pub field_range_ratio: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignalFidelity {
    pub snr: SnrReport,
    /// Present for IMU datasets only.
    pub frequency_response: Option<FrequencyResponseReport>,
    pub dynamic_range: DynamicRangeReport,
}

/// Per-file signal-fidelity metrics over every numeric field observed in
/// ground truth, consuming aligned pairs. Infinite SNR values are excluded
/// from the average; frequency response is computed for IMU data only.
pub fn signal_fidelity(
    ground_truth: &Dataset,
    converted: &Dataset,
    alignment: &Alignment,
) -> SignalFidelity {
    let is_imu = ground_truth.category == Category::Imu;

    let mut field_snr_db = BTreeMap::new();
    let mut field_frequency_correlation = BTreeMap::new();
    let mut field_range_ratio = BTreeMap::new();

    for field in ground_truth.observed_numeric_paths() {
        let path = FieldPath::parse(&field);
        let pairs = alignment.field_pairs(&ground_truth.records, &converted.records, &path);
        if pairs.is_empty() {
            continue;
        }

        if let Some(snr) = snr_db(&pairs) {
            field_snr_db.insert(field.clone(), snr);
        }
        if is_imu {
            if let Some(correlation) = psd_correlation(&pairs) {
                field_frequency_correlation.insert(field.clone(), correlation);
            }
        }
        field_range_ratio.insert(field, dynamic_range_ratio(&pairs));
    }

    let finite_snr: Vec<f64> = field_snr_db.values().filter_map(|snr| snr.finite()).collect();
    let correlations: Vec<f64> = field_frequency_correlation.values().copied().collect();
    let ratios: Vec<f64> = field_range_ratio.values().flatten().copied().collect();

    SignalFidelity {
        snr: SnrReport {
            average_snr_db: stats::mean(&finite_snr),
            field_snr_db,
        },
        frequency_response: is_imu.then(|| FrequencyResponseReport {
            average_frequency_correlation: stats::mean(&correlations),
            field_frequency_correlation,
        }),
        dynamic_range: DynamicRangeReport {
            average_range_ratio: stats::mean(&ratios),
            field_range_ratio,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn imu_dataset(values: &[f64]) -> Dataset {
        let records: Vec<Record> = values
            .iter()
            .enumerate()
            .map(|(k, v)| {
                serde_json::from_value(json!({
                    "time_unix": k as f64 * 0.01,
                    "linear_acceleration": {"x": v}
                }))
                .unwrap()
            })
            .collect();
        Dataset::new(Category::Imu, records)
    }

    #[test]
    fn snr_of_identical_signals_is_the_infinity_sentinel() {
        let pairs: Vec<(f64, f64)> = (0..10).map(|k| (k as f64, k as f64)).collect();
        assert_eq!(snr_db(&pairs), Some(SnrDb::Infinite));
    }

    #[test]
    fn snr_of_offset_signal_is_finite_and_positive() {
        let pairs: Vec<(f64, f64)> = (1..=10).map(|k| (k as f64, k as f64 + 0.1)).collect();
        let SnrDb::Finite(db) = snr_db(&pairs).unwrap() else {
            panic!("expected finite SNR");
        };
        assert!(db > 0.0);
    }

    #[test]
    fn snr_sentinel_serializes_as_string() {
        assert_eq!(serde_json::to_string(&SnrDb::Infinite).unwrap(), "\"inf\"");
        assert_eq!(serde_json::to_string(&SnrDb::Finite(3.5)).unwrap(), "3.5");
    }

    #[test]
    fn halved_amplitude_halves_the_range_ratio() {
        let pairs: Vec<(f64, f64)> = (0..10).map(|k| (k as f64, k as f64 * 0.5)).collect();
        assert_relative_eq!(dynamic_range_ratio(&pairs).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn constant_ground_truth_has_no_range_ratio() {
        let pairs: Vec<(f64, f64)> = (0..10).map(|k| (1.0, k as f64)).collect();
        assert_eq!(dynamic_range_ratio(&pairs), None);
    }

    #[test]
    fn identical_signals_have_unit_psd_correlation() {
        let pairs: Vec<(f64, f64)> = (0..64)
            .map(|k| {
                let v = (k as f64 * 0.7).sin();
                (v, v)
            })
            .collect();
        assert_relative_eq!(psd_correlation(&pairs).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn self_comparison_excludes_infinite_snr_from_average() {
        let values: Vec<f64> = (0..30).map(|k| (k as f64 * 0.4).sin()).collect();
        let gt = imu_dataset(&values);
        let conv = gt.clone();
        let alignment = Alignment::build(&gt.records, &conv.records, 0.1);
        let fidelity = signal_fidelity(&gt, &conv, &alignment);

        // Every field is noise-free, so the sentinel appears and the finite
        // average is empty.
        assert!(fidelity
            .snr
            .field_snr_db
            .values()
            .all(|snr| *snr == SnrDb::Infinite));
        assert_eq!(fidelity.snr.average_snr_db, None);
        assert_relative_eq!(
            fidelity.dynamic_range.average_range_ratio.unwrap(),
            1.0,
            epsilon = 1e-12
        );
        let freq = fidelity.frequency_response.unwrap();
        assert_relative_eq!(
            freq.field_frequency_correlation["linear_acceleration.x"],
            1.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn gnss_datasets_report_no_frequency_response() {
        let records: Vec<Record> = (0..5)
            .map(|k| {
                serde_json::from_value(json!({
                    "time_unix": k as f64,
                    "dop": {"hdop": 1.0 + k as f64}
                }))
                .unwrap()
            })
            .collect();
        let gt = Dataset::new(Category::Gnss, records);
        let conv = gt.clone();
        let alignment = Alignment::build(&gt.records, &conv.records, 0.1);
        let fidelity = signal_fidelity(&gt, &conv, &alignment);
        assert!(fidelity.frequency_response.is_none());
    }
}
