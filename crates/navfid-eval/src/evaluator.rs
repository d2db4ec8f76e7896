use std::path::PathBuf;

use navfid_core::metrics::{
    coordinate, information, numerical, signal, structural, temporal,
};
use navfid_core::{Alignment, Category, Dataset, ToleranceConfig};
use tracing::{debug, info};

use crate::bench;
use crate::discover::{self, FilePair};
use crate::loader;
use crate::report::{EvaluationReport, ReportBuilder};
use crate::schema::Schema;
use crate::EvalError;

/// Run-level configuration.
#[derive(Debug, Clone, Default)]
pub struct EvalConfig {
    pub tolerances: ToleranceConfig,
    /// Optional JSON results from an external conversion benchmark, embedded
    /// into the efficiency section when present.
    pub benchmark_results: Option<PathBuf>,
}

/// Drives a full evaluation: discovery, loading, per-file metrics, and the
/// cross-file summary.
pub struct Evaluator {
    ground_truth_dir: PathBuf,
    converted_dir: PathBuf,
    config: EvalConfig,
}

struct LoadedPair {
    pair: FilePair,
    ground_truth: Dataset,
    converted: Dataset,
    ground_truth_bytes: u64,
    converted_bytes: u64,
}

impl Evaluator {
    pub fn new(ground_truth_dir: impl Into<PathBuf>, converted_dir: impl Into<PathBuf>) -> Self {
        Self::with_config(ground_truth_dir, converted_dir, EvalConfig::default())
    }

    pub fn with_config(
        ground_truth_dir: impl Into<PathBuf>,
        converted_dir: impl Into<PathBuf>,
        config: EvalConfig,
    ) -> Self {
        Self {
            ground_truth_dir: ground_truth_dir.into(),
            converted_dir: converted_dir.into(),
            config,
        }
    }

    pub fn evaluate(&self) -> Result<EvaluationReport, EvalError> {
        let pairs = discover::discover_pairs(&self.ground_truth_dir, &self.converted_dir)?;
        info!(pair_count = pairs.len(), "discovered dataset file pairs");

        let mut loaded = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let ground_truth = loader::load_dataset(&pair.ground_truth, pair.category)?;
            let converted = loader::load_dataset(&pair.converted, pair.category)?;
            let ground_truth_bytes = loader::file_size(&pair.ground_truth)?;
            let converted_bytes = loader::file_size(&pair.converted)?;
            loaded.push(LoadedPair {
                pair,
                ground_truth,
                converted,
                ground_truth_bytes,
                converted_bytes,
            });
        }

        let schema = match Schema::from_sidecar(&self.ground_truth_dir)? {
            Some(schema) => schema,
            None => Schema::inferred(loaded.iter().map(|entry| &entry.ground_truth)),
        };

        let mut builder = ReportBuilder::default();
        for entry in &loaded {
            self.evaluate_pair(entry, &schema, &mut builder);
        }
        self.evaluate_cross_sensor(&loaded, &mut builder);

        if let Some(path) = &self.config.benchmark_results {
            builder.set_benchmark(bench::load_benchmark_report(path)?);
        }

        Ok(builder.finish())
    }

    fn evaluate_pair(&self, entry: &LoadedPair, schema: &Schema, builder: &mut ReportBuilder) {
        let name = entry.pair.name.as_str();
        let category = entry.pair.category;
        let ground_truth = &entry.ground_truth;
        let converted = &entry.converted;
        debug!(
            file = name,
            category = category.label(),
            ground_truth_records = ground_truth.len(),
            converted_records = converted.len(),
            "evaluating file pair"
        );

        let alignment = Alignment::build(
            &ground_truth.records,
            &converted.records,
            self.config.tolerances.field_s,
        );

        builder.record_field_errors(
            category,
            name,
            numerical::field_error_table(
                ground_truth,
                converted,
                category.standard_fields(),
                &alignment,
            ),
        );

        // Position comparison tolerates coarser timing than field comparison.
        if category == Category::Gnss {
            let position_alignment = Alignment::build(
                &ground_truth.records,
                &converted.records,
                self.config.tolerances.position_s,
            );
            if let Some(consistency) =
                coordinate::lla_ecef_consistency(ground_truth, converted, &position_alignment)
            {
                builder.record_coordinate(name, consistency);
            }
        }

        let gt_timestamps = ground_truth.timestamps();
        let conv_timestamps = converted.timestamps();
        if let Some(stats) = temporal::timestamp_errors(&gt_timestamps, &conv_timestamps) {
            builder.record_timestamp_errors(name, stats);
            builder
                .record_sampling_rates(name, temporal::sampling_rates(&gt_timestamps, &conv_timestamps));
        }

        let required = schema.required_fields(category);
        if !required.is_empty() {
            builder.record_schema_compliance(name, structural::schema_compliance(converted, required));
        }
        builder.record_field_mapping(name, structural::field_mapping(ground_truth, converted));

        builder.record_information(
            name,
            information::information_content(ground_truth, converted, &alignment),
        );
        builder.record_signal(
            name,
            signal::signal_fidelity(ground_truth, converted, &alignment),
        );
        builder.record_size_ratio(name, entry.ground_truth_bytes, entry.converted_bytes);
    }

    /// GNSS-to-IMU clock alignment, from the first file of each category in
    /// sorted order. Skipped unless both categories are present.
    fn evaluate_cross_sensor(&self, loaded: &[LoadedPair], builder: &mut ReportBuilder) {
        let gnss = loaded
            .iter()
            .find(|entry| entry.pair.category == Category::Gnss);
        let imu = loaded
            .iter()
            .find(|entry| entry.pair.category == Category::Imu);
        let (Some(gnss), Some(imu)) = (gnss, imu) else {
            return;
        };
        if let Some(alignment) = temporal::cross_sensor_alignment(
            &gnss.ground_truth.timestamps(),
            &imu.ground_truth.timestamps(),
            &gnss.converted.timestamps(),
            &imu.converted.timestamps(),
        ) {
            builder.record_cross_sensor(alignment);
        }
    }
}
