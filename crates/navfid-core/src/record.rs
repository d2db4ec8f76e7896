use std::collections::BTreeSet;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields::{self, FieldPath};

/// Sensor category of a dataset, derived from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Gnss,
    Imu,
}

static GNSS_FIELDS: LazyLock<Vec<FieldPath>> = LazyLock::new(|| {
    [
        "position_lla.latitude_deg",
        "position_lla.longitude_deg",
        "position_lla.altitude_m",
        "velocity.x",
        "velocity.y",
        "velocity.z",
        "dop.hdop",
        "dop.vdop",
        "dop.pdop",
    ]
    .into_iter()
    .map(FieldPath::parse)
    .collect()
});

static IMU_FIELDS: LazyLock<Vec<FieldPath>> = LazyLock::new(|| {
    [
        "linear_acceleration.x",
        "linear_acceleration.y",
        "linear_acceleration.z",
        "angular_velocity.x",
        "angular_velocity.y",
        "angular_velocity.z",
        "orientation.w",
        "orientation.x",
        "orientation.y",
        "orientation.z",
    ]
    .into_iter()
    .map(FieldPath::parse)
    .collect()
});

impl Category {
    /// Top-level key holding the record sequence in a dataset document.
    pub fn data_key(self) -> &'static str {
        match self {
            Category::Gnss => "gnss_data",
            Category::Imu => "imu_data",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Gnss => "gnss",
            Category::Imu => "imu",
        }
    }

    /// Static registry of the standard numeric field paths for this category,
    /// parsed once at first use.
    pub fn standard_fields(self) -> &'static [FieldPath] {
        match self {
            Category::Gnss => &GNSS_FIELDS,
            Category::Imu => &IMU_FIELDS,
        }
    }

    /// Classifies a file by the category keyword in its name. Only `.json`
    /// files participate; `gnss` takes precedence when both keywords appear.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if !lower.ends_with(".json") {
            return None;
        }
        if lower.contains("gnss") {
            Some(Category::Gnss)
        } else if lower.contains("imu") {
            Some(Category::Imu)
        } else {
            None
        }
    }
}

/// One sampled observation: a nested mapping of sensor fields, optionally
/// carrying a `time_unix` timestamp in floating-point seconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Sample timestamp in Unix seconds. Records without one are excluded
    /// from temporal matching.
    pub fn time_unix(&self) -> Option<f64> {
        self.0.get("time_unix").and_then(fields::numeric)
    }

    pub fn resolve(&self, path: &FieldPath) -> Option<f64> {
        fields::resolve(&self.0, path)
    }

    /// Dotted paths of every numeric leaf in this record.
    pub fn numeric_paths(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        fields::collect_numeric_paths(&self.0, "", &mut out);
        out
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// True when the record carries `key` as a nested mapping.
    pub fn has_group(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(Value::Object(_)))
    }
}

#[derive(Debug, Default, Deserialize)]
struct DatasetDocument {
    #[serde(default)]
    gnss_data: Vec<Record>,
    #[serde(default)]
    imu_data: Vec<Record>,
}

/// Ordered record stream of one category, read from one file. Immutable once
/// loaded.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub category: Category,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(category: Category, records: Vec<Record>) -> Self {
        Self { category, records }
    }

    /// Parses a dataset document, keeping the record sequence matching
    /// `category` and defaulting to empty when the key is absent.
    pub fn from_json_str(payload: &str, category: Category) -> serde_json::Result<Self> {
        let document: DatasetDocument = serde_json::from_str(payload)?;
        let records = match category {
            Category::Gnss => document.gnss_data,
            Category::Imu => document.imu_data,
        };
        Ok(Self { category, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Timestamps of all records that carry one, in record order.
    pub fn timestamps(&self) -> Vec<f64> {
        self.records.iter().filter_map(Record::time_unix).collect()
    }

    /// Every resolvable value of `path`, in record order.
    pub fn field_series(&self, path: &FieldPath) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|record| record.resolve(path))
            .collect()
    }

    /// Union of numeric field paths observed across all records.
    pub fn observed_numeric_paths(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for record in &self.records {
            for path in record.numeric_paths() {
                out.insert(path);
            }
        }
        out
    }
}
