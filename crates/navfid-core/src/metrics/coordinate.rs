use std::sync::LazyLock;

use serde::Serialize;

use crate::align::Alignment;
use crate::fields::FieldPath;
use crate::geodesy;
use crate::record::{Dataset, Record};
use crate::stats;

static LAT: LazyLock<FieldPath> = LazyLock::new(|| FieldPath::parse("position_lla.latitude_deg"));
static LON: LazyLock<FieldPath> = LazyLock::new(|| FieldPath::parse("position_lla.longitude_deg"));
static ALT: LazyLock<FieldPath> = LazyLock::new(|| FieldPath::parse("position_lla.altitude_m"));
static ECEF_X: LazyLock<FieldPath> = LazyLock::new(|| FieldPath::parse("position_ecef.x"));
static ECEF_Y: LazyLock<FieldPath> = LazyLock::new(|| FieldPath::parse("position_ecef.y"));
static ECEF_Z: LazyLock<FieldPath> = LazyLock::new(|| FieldPath::parse("position_ecef.z"));

/// Distance statistics in meters between a record's stored ECEF coordinate
/// and the ECEF recomputed from its own geodetic coordinate.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CoordinateConsistency {
    pub mean_error_m: f64,
    pub max_error_m: f64,
    pub min_error_m: f64,
    pub std_error_m: f64,
}

fn has_both_representations(record: &Record) -> bool {
    record.has_group("position_lla") && record.has_group("position_ecef")
}

/// Validates the converted dataset's internal LLA/ECEF consistency over the
/// aligned pairs: the converted geodetic coordinate is transformed and
/// compared against the converted ECEF coordinate in the same record. `None`
/// when no ground-truth record carries both representations or no aligned
/// pair is complete.
pub fn lla_ecef_consistency(
    ground_truth: &Dataset,
    converted: &Dataset,
    alignment: &Alignment,
) -> Option<CoordinateConsistency> {
    if !ground_truth.records.iter().any(has_both_representations) {
        return None;
    }

    let mut errors = Vec::new();
    for (gt_index, conv_index) in alignment.matched() {
        if !has_both_representations(&ground_truth.records[gt_index]) {
            continue;
        }
        let conv = &converted.records[conv_index];
        let (Some(lat), Some(lon), Some(alt)) =
            (conv.resolve(&LAT), conv.resolve(&LON), conv.resolve(&ALT))
        else {
            continue;
        };
        let (Some(x), Some(y), Some(z)) = (
            conv.resolve(&ECEF_X),
            conv.resolve(&ECEF_Y),
            conv.resolve(&ECEF_Z),
        ) else {
            continue;
        };

        let expected = geodesy::geodetic_to_ecef(lat, lon, alt);
        let stored = nalgebra::Vector3::new(x, y, z);
        errors.push((expected - stored).norm());
    }

    Some(CoordinateConsistency {
        mean_error_m: stats::mean(&errors)?,
        max_error_m: stats::max(&errors)?,
        min_error_m: stats::min(&errors)?,
        std_error_m: stats::std_dev(&errors)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn record_with_ecef(t: f64, ecef: [f64; 3]) -> Record {
        serde_json::from_value(json!({
            "time_unix": t,
            "position_lla": {"latitude_deg": 22.0, "longitude_deg": 114.0, "altitude_m": 10.0},
            "position_ecef": {"x": ecef[0], "y": ecef[1], "z": ecef[2]}
        }))
        .unwrap()
    }

    #[test]
    fn self_consistent_records_report_near_zero_error() {
        let ecef = geodesy::geodetic_to_ecef(22.0, 114.0, 10.0);
        let records: Vec<Record> = (0..3)
            .map(|k| record_with_ecef(k as f64, [ecef.x, ecef.y, ecef.z]))
            .collect();
        let gt = Dataset::new(Category::Gnss, records.clone());
        let conv = Dataset::new(Category::Gnss, records);
        let alignment = Alignment::build(&gt.records, &conv.records, 1.0);

        let consistency = lla_ecef_consistency(&gt, &conv, &alignment).unwrap();
        assert_relative_eq!(consistency.mean_error_m, 0.0, epsilon = 1e-6);
        assert_relative_eq!(consistency.std_error_m, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn stored_ecef_offset_shows_up_as_distance() {
        let ecef = geodesy::geodetic_to_ecef(22.0, 114.0, 10.0);
        let gt = Dataset::new(
            Category::Gnss,
            vec![record_with_ecef(0.0, [ecef.x, ecef.y, ecef.z])],
        );
        let conv = Dataset::new(
            Category::Gnss,
            vec![record_with_ecef(0.0, [ecef.x + 3.0, ecef.y + 4.0, ecef.z])],
        );
        let alignment = Alignment::build(&gt.records, &conv.records, 1.0);

        let consistency = lla_ecef_consistency(&gt, &conv, &alignment).unwrap();
        assert_relative_eq!(consistency.mean_error_m, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn datasets_without_dual_representation_are_skipped() {
        let record: Record = serde_json::from_value(json!({
            "time_unix": 0.0,
            "position_lla": {"latitude_deg": 22.0, "longitude_deg": 114.0, "altitude_m": 10.0}
        }))
        .unwrap();
        let gt = Dataset::new(Category::Gnss, vec![record.clone()]);
        let conv = Dataset::new(Category::Gnss, vec![record]);
        let alignment = Alignment::build(&gt.records, &conv.records, 1.0);
        assert!(lla_ecef_consistency(&gt, &conv, &alignment).is_none());
    }
}
