use std::collections::BTreeSet;
use std::fmt;

use serde_json::{Map, Value};

/// A dotted path into nested record mappings, split into segments once at
/// construction so repeated lookups never re-parse the string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(path: &str) -> Self {
        Self {
            raw: path.to_string(),
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

/// Extracts the numeric value of a JSON leaf. Booleans are not numeric.
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Walks `path` through nested mappings. Returns `None` (never an error) when
/// a segment is absent, an intermediate node is not a mapping, or the terminal
/// value is not numeric.
pub fn resolve(map: &Map<String, Value>, path: &FieldPath) -> Option<f64> {
    let mut current = map;
    let (last, intermediate) = path.segments().split_last()?;
    for segment in intermediate {
        current = current.get(segment)?.as_object()?;
    }
    numeric(current.get(last)?)
}

/// Recursively collects the dotted path of every numeric leaf. Sequences are
/// not descended; their contents never appear in the result.
pub fn collect_numeric_paths(map: &Map<String, Value>, prefix: &str, out: &mut BTreeSet<String>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) => collect_numeric_paths(nested, &path, out),
            Value::Number(_) => {
                out.insert(path);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Map<String, Value> {
        json!({
            "time_unix": 1.5,
            "position_lla": {
                "latitude_deg": 22.0,
                "longitude_deg": 114.0,
                "altitude_m": 10.0
            },
            "fix_ok": true,
            "satellites": [4, 5, 6],
            "source": "receiver-a"
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn resolves_nested_numeric_leaf() {
        let map = sample();
        assert_eq!(
            resolve(&map, &FieldPath::parse("position_lla.latitude_deg")),
            Some(22.0)
        );
        assert_eq!(resolve(&map, &FieldPath::parse("time_unix")), Some(1.5));
    }

    #[test]
    fn missing_or_non_numeric_paths_resolve_to_none() {
        let map = sample();
        assert_eq!(resolve(&map, &FieldPath::parse("position_lla.height_m")), None);
        assert_eq!(resolve(&map, &FieldPath::parse("source")), None);
        assert_eq!(resolve(&map, &FieldPath::parse("fix_ok")), None);
        // Intermediate node is a scalar, not a mapping.
        assert_eq!(resolve(&map, &FieldPath::parse("time_unix.seconds")), None);
    }

    #[test]
    fn enumeration_skips_sequences_and_non_numeric_leaves() {
        let map = sample();
        let mut paths = BTreeSet::new();
        collect_numeric_paths(&map, "", &mut paths);

        let expected: BTreeSet<String> = [
            "position_lla.altitude_m",
            "position_lla.latitude_deg",
            "position_lla.longitude_deg",
            "time_unix",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn field_path_parses_segments_once() {
        let path = FieldPath::parse("dop.hdop");
        assert_eq!(path.segments(), ["dop", "hdop"]);
        assert_eq!(path.as_str(), "dop.hdop");
    }
}
