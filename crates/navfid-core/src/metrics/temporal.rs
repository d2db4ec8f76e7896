use serde::Serialize;

use crate::align;
use crate::stats;

const SECONDS_TO_MICROS: f64 = 1e6;

/// Nearest-timestamp error statistics in microseconds.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimestampErrorStats {
    pub mean_error_us: f64,
    pub max_error_us: f64,
    pub min_error_us: f64,
    pub std_error_us: f64,
}

/// For every ground-truth timestamp, the gap to the nearest converted
/// timestamp. `None` when either side has no timestamps.
pub fn timestamp_errors(
    gt_timestamps: &[f64],
    conv_timestamps: &[f64],
) -> Option<TimestampErrorStats> {
    if gt_timestamps.is_empty() || conv_timestamps.is_empty() {
        return None;
    }
    let errors: Vec<f64> = gt_timestamps
        .iter()
        .filter_map(|t| align::nearest_gap(*t, conv_timestamps))
        .map(|gap| gap * SECONDS_TO_MICROS)
        .collect();

    Some(TimestampErrorStats {
        mean_error_us: stats::mean(&errors)?,
        max_error_us: stats::max(&errors)?,
        min_error_us: stats::min(&errors)?,
        std_error_us: stats::std_dev(&errors)?,
    })
}

/// Sampling-rate comparison: each rate is the reciprocal of the mean
/// inter-sample interval, `None` with fewer than two timestamps or a
/// non-positive mean interval.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SamplingRateStats {
    pub ground_truth_rate_hz: Option<f64>,
    pub converted_rate_hz: Option<f64>,
    pub relative_error: Option<f64>,
}

fn sampling_rate(timestamps: &[f64]) -> Option<f64> {
    if timestamps.len() < 2 {
        return None;
    }
    let intervals: Vec<f64> = timestamps.windows(2).map(|w| w[1] - w[0]).collect();
    let mean_interval = stats::mean(&intervals)?;
    (mean_interval > 0.0).then(|| 1.0 / mean_interval)
}

pub fn sampling_rates(gt_timestamps: &[f64], conv_timestamps: &[f64]) -> SamplingRateStats {
    let ground_truth_rate_hz = sampling_rate(gt_timestamps);
    let converted_rate_hz = sampling_rate(conv_timestamps);
    let relative_error = match (ground_truth_rate_hz, converted_rate_hz) {
        (Some(gt), Some(conv)) => Some((gt - conv).abs() / gt),
        _ => None,
    };
    SamplingRateStats {
        ground_truth_rate_hz,
        converted_rate_hz,
        relative_error,
    }
}

/// Cross-sensor alignment comparison: mean nearest-neighbor gap between GNSS
/// and IMU timestamps computed per dataset, reported in microseconds together
/// with the absolute difference between the two datasets' gaps.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CrossSensorAlignment {
    pub ground_truth_mean_error_us: f64,
    pub converted_mean_error_us: f64,
    pub alignment_error_difference_us: f64,
}

fn mean_cross_gap_us(gnss_timestamps: &[f64], imu_timestamps: &[f64]) -> Option<f64> {
    let gaps: Vec<f64> = gnss_timestamps
        .iter()
        .filter_map(|t| align::nearest_gap(*t, imu_timestamps))
        .map(|gap| gap * SECONDS_TO_MICROS)
        .collect();
    stats::mean(&gaps)
}

pub fn cross_sensor_alignment(
    gt_gnss: &[f64],
    gt_imu: &[f64],
    conv_gnss: &[f64],
    conv_imu: &[f64],
) -> Option<CrossSensorAlignment> {
    let ground_truth_mean_error_us = mean_cross_gap_us(gt_gnss, gt_imu)?;
    let converted_mean_error_us = mean_cross_gap_us(conv_gnss, conv_imu)?;
    Some(CrossSensorAlignment {
        ground_truth_mean_error_us,
        converted_mean_error_us,
        alignment_error_difference_us: (ground_truth_mean_error_us - converted_mean_error_us)
            .abs(),
    })
}
