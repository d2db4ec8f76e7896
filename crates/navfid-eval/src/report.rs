use std::collections::BTreeMap;

use navfid_core::metrics::coordinate::CoordinateConsistency;
use navfid_core::metrics::information::{
    EntropyRatioReport, InformationContent, MutualInformationReport,
};
use navfid_core::metrics::numerical::FieldErrorStats;
use navfid_core::metrics::signal::{
    DynamicRangeReport, FrequencyResponseReport, SignalFidelity, SnrReport,
};
use navfid_core::metrics::structural::{FieldMappingAccuracy, SchemaCompliance};
use navfid_core::metrics::temporal::{
    CrossSensorAlignment, SamplingRateStats, TimestampErrorStats,
};
use navfid_core::Category;
use serde::Serialize;

use crate::bench::BenchmarkReport;

/// A report section that is either populated or explicitly marked as not
/// computed, so the section key is always present in the output.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    Computed(T),
    NotComputed,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct NumericalAccuracy {
    pub gnss: BTreeMap<String, BTreeMap<String, FieldErrorStats>>,
    pub imu: BTreeMap<String, BTreeMap<String, FieldErrorStats>>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct CoordinateAccuracy {
    pub coordinate_conversion_error: BTreeMap<String, CoordinateConsistency>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct TemporalAccuracy {
    pub timestamp_conversion_error: BTreeMap<String, TimestampErrorStats>,
    pub temporal_alignment_error: BTreeMap<String, CrossSensorAlignment>,
    pub sampling_rate_preservation: BTreeMap<String, SamplingRateStats>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct StructuralAccuracy {
    pub schema_compliance_score: BTreeMap<String, SchemaCompliance>,
    pub field_mapping_accuracy: BTreeMap<String, FieldMappingAccuracy>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct DataFieldAccuracy {
    pub numerical: NumericalAccuracy,
    pub coordinate: CoordinateAccuracy,
    pub temporal: TemporalAccuracy,
    pub structural: StructuralAccuracy,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct InformationContentSection {
    pub entropy_ratio: BTreeMap<String, EntropyRatioReport>,
    pub mutual_information: BTreeMap<String, MutualInformationReport>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct SignalFidelitySection {
    pub snr: BTreeMap<String, SnrReport>,
    pub frequency_response: BTreeMap<String, FrequencyResponseReport>,
    pub dynamic_range: BTreeMap<String, DynamicRangeReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InformationPreservation {
    pub content: InformationContentSection,
    pub signal_fidelity: SignalFidelitySection,
    pub reconstruction: Section<()>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SizeRatio {
    pub ground_truth_size_bytes: u64,
    pub converted_size_bytes: u64,
    /// `None` when the ground-truth file is empty.
    pub size_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Efficiency {
    pub transformation_benchmark: Section<BenchmarkReport>,
    pub size_ratio: BTreeMap<String, SizeRatio>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct InformationSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_entropy_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_snr_db: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Summary {
    pub numerical_field_accuracy: BTreeMap<String, f64>,
    pub information_preservation: InformationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_size_ratio: Option<f64>,
}

/// The full evaluation report. Section keys are fixed; sections whose inputs
/// never materialize stay present with empty maps or a `not_computed` marker.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub data_field_accuracy: DataFieldAccuracy,
    pub information_preservation: InformationPreservation,
    pub robustness: Section<()>,
    pub efficiency: Efficiency,
    pub fgo_readiness: Section<()>,
    pub summary: Summary,
}

/// Accumulates per-file metric results and derives the summary at the end.
#[derive(Default)]
pub struct ReportBuilder {
    numerical: NumericalAccuracy,
    coordinate: CoordinateAccuracy,
    temporal: TemporalAccuracy,
    structural: StructuralAccuracy,
    content: InformationContentSection,
    signal: SignalFidelitySection,
    size_ratio: BTreeMap<String, SizeRatio>,
    benchmark: Option<BenchmarkReport>,
}

impl ReportBuilder {
    pub fn record_field_errors(
        &mut self,
        category: Category,
        file: &str,
        table: BTreeMap<String, FieldErrorStats>,
    ) {
        let target = match category {
            Category::Gnss => &mut self.numerical.gnss,
            Category::Imu => &mut self.numerical.imu,
        };
        target.insert(file.to_owned(), table);
    }

    pub fn record_coordinate(&mut self, file: &str, consistency: CoordinateConsistency) {
        self.coordinate
            .coordinate_conversion_error
            .insert(file.to_owned(), consistency);
    }

    pub fn record_timestamp_errors(&mut self, file: &str, stats: TimestampErrorStats) {
        self.temporal
            .timestamp_conversion_error
            .insert(file.to_owned(), stats);
    }

    pub fn record_sampling_rates(&mut self, file: &str, stats: SamplingRateStats) {
        self.temporal
            .sampling_rate_preservation
            .insert(file.to_owned(), stats);
    }

    pub fn record_cross_sensor(&mut self, alignment: CrossSensorAlignment) {
        self.temporal
            .temporal_alignment_error
            .insert("gnss_imu".to_owned(), alignment);
    }

    pub fn record_schema_compliance(&mut self, file: &str, compliance: SchemaCompliance) {
        self.structural
            .schema_compliance_score
            .insert(file.to_owned(), compliance);
    }

    pub fn record_field_mapping(&mut self, file: &str, accuracy: FieldMappingAccuracy) {
        self.structural
            .field_mapping_accuracy
            .insert(file.to_owned(), accuracy);
    }

    pub fn record_information(&mut self, file: &str, content: InformationContent) {
        self.content
            .entropy_ratio
            .insert(file.to_owned(), content.entropy_ratio);
        self.content
            .mutual_information
            .insert(file.to_owned(), content.mutual_information);
    }

    pub fn record_signal(&mut self, file: &str, fidelity: SignalFidelity) {
        self.signal.snr.insert(file.to_owned(), fidelity.snr);
        if let Some(frequency_response) = fidelity.frequency_response {
            self.signal
                .frequency_response
                .insert(file.to_owned(), frequency_response);
        }
        self.signal
            .dynamic_range
            .insert(file.to_owned(), fidelity.dynamic_range);
    }

    pub fn record_size_ratio(&mut self, file: &str, ground_truth_bytes: u64, converted_bytes: u64) {
        let size_ratio =
            (ground_truth_bytes > 0).then(|| converted_bytes as f64 / ground_truth_bytes as f64);
        self.size_ratio.insert(
            file.to_owned(),
            SizeRatio {
                ground_truth_size_bytes: ground_truth_bytes,
                converted_size_bytes: converted_bytes,
                size_ratio,
            },
        );
    }

    pub fn set_benchmark(&mut self, report: BenchmarkReport) {
        self.benchmark = Some(report);
    }

    pub fn finish(self) -> EvaluationReport {
        let summary = self.summarize();
        EvaluationReport {
            data_field_accuracy: DataFieldAccuracy {
                numerical: self.numerical,
                coordinate: self.coordinate,
                temporal: self.temporal,
                structural: self.structural,
            },
            information_preservation: InformationPreservation {
                content: self.content,
                signal_fidelity: self.signal,
                reconstruction: Section::NotComputed,
            },
            robustness: Section::NotComputed,
            efficiency: Efficiency {
                transformation_benchmark: match self.benchmark {
                    Some(report) => Section::Computed(report),
                    None => Section::NotComputed,
                },
                size_ratio: self.size_ratio,
            },
            fgo_readiness: Section::NotComputed,
            summary,
        }
    }

    fn summarize(&self) -> Summary {
        let mut numerical_field_accuracy = BTreeMap::new();
        for (prefix, files) in [("gnss", &self.numerical.gnss), ("imu", &self.numerical.imu)] {
            let stats: Vec<&FieldErrorStats> =
                files.values().flat_map(BTreeMap::values).collect();
            if let Some(avg) = average(stats.iter().filter_map(|s| s.mae)) {
                numerical_field_accuracy.insert(format!("{prefix}_avg_mae"), avg);
            }
            if let Some(avg) = average(stats.iter().filter_map(|s| s.rmse)) {
                numerical_field_accuracy.insert(format!("{prefix}_avg_rmse"), avg);
            }
            if let Some(avg) = average(stats.iter().filter_map(|s| s.nrmse)) {
                numerical_field_accuracy.insert(format!("{prefix}_avg_nrmse"), avg);
            }
        }

        let avg_entropy_ratio = average(
            self.content
                .entropy_ratio
                .values()
                .filter_map(|report| report.average_entropy_ratio),
        );
        let avg_snr_db = average(
            self.signal
                .snr
                .values()
                .filter_map(|report| report.average_snr_db),
        );
        let avg_size_ratio = average(
            self.size_ratio
                .values()
                .filter_map(|entry| entry.size_ratio),
        );

        Summary {
            numerical_field_accuracy,
            information_preservation: InformationSummary {
                avg_entropy_ratio,
                avg_snr_db,
            },
            avg_size_ratio,
        }
    }
}

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_sections_serialize_with_a_status_marker() {
        let builder = ReportBuilder::default();
        let report = builder.finish();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["robustness"]["status"], "not_computed");
        assert_eq!(json["fgo_readiness"]["status"], "not_computed");
        assert_eq!(
            json["efficiency"]["transformation_benchmark"]["status"],
            "not_computed"
        );
        assert_eq!(
            json["information_preservation"]["reconstruction"]["status"],
            "not_computed"
        );
    }

    #[test]
    fn empty_report_keeps_all_top_level_sections() {
        let json = serde_json::to_value(ReportBuilder::default().finish()).unwrap();
        for key in [
            "data_field_accuracy",
            "information_preservation",
            "robustness",
            "efficiency",
            "fgo_readiness",
            "summary",
        ] {
            assert!(json.get(key).is_some(), "missing section '{key}'");
        }
        assert!(json["summary"]["numerical_field_accuracy"]
            .as_object()
            .unwrap()
            .is_empty());
        assert!(json["summary"].get("avg_size_ratio").is_none());
    }

    #[test]
    fn summary_averages_span_files_and_fields() {
        let mut builder = ReportBuilder::default();
        let stats = |mae: f64| FieldErrorStats {
            mae: Some(mae),
            rmse: Some(mae),
            nrmse: None,
            max_error: Some(mae),
            min_error: Some(mae),
            std_error: Some(0.0),
            num_matched_points: 4,
            matched_percentage: 100.0,
        };
        builder.record_field_errors(
            Category::Gnss,
            "gnss_01.json",
            BTreeMap::from([("altitude".to_owned(), stats(1.0))]),
        );
        builder.record_field_errors(
            Category::Gnss,
            "gnss_02.json",
            BTreeMap::from([("altitude".to_owned(), stats(3.0))]),
        );
        builder.record_size_ratio("gnss_01.json", 100, 150);
        builder.record_size_ratio("gnss_02.json", 100, 50);

        let report = builder.finish();
        let accuracy = &report.summary.numerical_field_accuracy;
        assert_eq!(accuracy["gnss_avg_mae"], 2.0);
        assert_eq!(accuracy["gnss_avg_rmse"], 2.0);
        assert!(!accuracy.contains_key("gnss_avg_nrmse"));
        assert!(!accuracy.contains_key("imu_avg_mae"));
        assert_eq!(report.summary.avg_size_ratio, Some(1.0));
    }

    #[test]
    fn zero_byte_ground_truth_yields_no_size_ratio() {
        let mut builder = ReportBuilder::default();
        builder.record_size_ratio("gnss_01.json", 0, 10);
        let report = builder.finish();
        assert_eq!(report.efficiency.size_ratio["gnss_01.json"].size_ratio, None);
        assert_eq!(report.summary.avg_size_ratio, None);
    }
}
