use crate::record::Record;

/// Maximum acceptable time difference, in seconds, for treating two records
/// as corresponding to the same instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceConfig {
    /// Tolerance for field, orientation, acceleration, and information
    /// metrics.
    pub field_s: f64,
    /// Tolerance for position/coordinate-consistency metrics.
    pub position_s: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            field_s: 0.1,
            position_s: 1.0,
        }
    }
}

/// Finds the candidate whose `time_unix` minimizes `|t_gt - t|`, returning its
/// index and the minimal absolute difference. Candidates without a timestamp
/// are skipped; the first record achieving the minimum wins.
pub fn nearest_record(t_gt: f64, candidates: &[Record]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, record) in candidates.iter().enumerate() {
        let Some(t) = record.time_unix() else {
            continue;
        };
        let diff = (t_gt - t).abs();
        if best.map_or(true, |(_, min)| diff < min) {
            best = Some((index, diff));
        }
    }
    best
}

/// Minimal absolute gap between `t` and any of `timestamps`.
pub fn nearest_gap(t: f64, timestamps: &[f64]) -> Option<f64> {
    timestamps
        .iter()
        .map(|other| (t - other).abs())
        .min_by(f64::total_cmp)
}

/// Ephemeral ground-truth-to-converted pairing for one evaluation pass: entry
/// `i` holds the converted index nearest in time to ground-truth record `i`
/// plus the time gap, or `None` when no converted record lies within the
/// tolerance (or either side lacks a timestamp).
#[derive(Debug, Clone)]
pub struct Alignment {
    pairs: Vec<Option<(usize, f64)>>,
}

impl Alignment {
    pub fn build(ground_truth: &[Record], converted: &[Record], tolerance_s: f64) -> Self {
        let pairs = ground_truth
            .iter()
            .map(|record| {
                record
                    .time_unix()
                    .and_then(|t| nearest_record(t, converted))
                    .filter(|(_, diff)| *diff < tolerance_s)
            })
            .collect();
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn matched_count(&self) -> usize {
        self.pairs.iter().flatten().count()
    }

    /// Matched `(ground_truth_index, converted_index)` pairs in ground-truth
    /// order.
    pub fn matched(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs
            .iter()
            .enumerate()
            .filter_map(|(gt, pair)| pair.map(|(conv, _)| (gt, conv)))
    }

    /// Aligned scalar pairs for one field. A pair contributes only when the
    /// path resolves on both sides, so each ground-truth record yields at most
    /// one sample.
    pub fn field_pairs(
        &self,
        ground_truth: &[Record],
        converted: &[Record],
        path: &crate::fields::FieldPath,
    ) -> Vec<(f64, f64)> {
        self.matched()
            .filter_map(|(gt, conv)| {
                let gt_value = ground_truth[gt].resolve(path)?;
                let conv_value = converted[conv].resolve(path)?;
                Some((gt_value, conv_value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use serde_json::json;

    fn record(time: Option<f64>) -> Record {
        match time {
            Some(t) => serde_json::from_value(json!({ "time_unix": t })).unwrap(),
            None => serde_json::from_value(json!({})).unwrap(),
        }
    }

    #[test]
    fn exact_timestamp_matches_with_zero_difference() {
        let converted = vec![record(Some(0.0)), record(Some(1.0)), record(Some(2.0))];
        let (index, diff) = nearest_record(1.0, &converted).unwrap();
        assert_eq!(index, 1);
        assert_eq!(diff, 0.0);
    }

    #[test]
    fn first_record_wins_ties() {
        let converted = vec![record(Some(0.9)), record(Some(1.1))];
        let (index, diff) = nearest_record(1.0, &converted).unwrap();
        assert_eq!(index, 0);
        assert!((diff - 0.1).abs() < 1e-12);
    }

    #[test]
    fn candidates_without_timestamps_yield_no_match() {
        let converted = vec![record(None), record(None)];
        assert!(nearest_record(1.0, &converted).is_none());
    }

    #[test]
    fn timestampless_ground_truth_is_excluded() {
        let ground_truth = vec![record(Some(0.0)), record(None), record(Some(1.0))];
        let converted = vec![record(Some(0.0)), record(Some(1.0))];
        let alignment = Alignment::build(&ground_truth, &converted, 0.1);
        assert_eq!(alignment.len(), 3);
        assert_eq!(alignment.matched_count(), 2);
    }

    #[test]
    fn stale_matches_are_dropped() {
        let ground_truth = vec![record(Some(0.0)), record(Some(5.0))];
        let converted = vec![record(Some(0.05)), record(Some(9.0))];
        let alignment = Alignment::build(&ground_truth, &converted, 0.1);
        assert_eq!(alignment.matched_count(), 1);
    }

    #[test]
    fn tightening_tolerance_never_increases_matches() {
        let ground_truth: Vec<Record> =
            (0..10).map(|k| record(Some(k as f64 * 0.5))).collect();
        let converted: Vec<Record> =
            (0..10).map(|k| record(Some(k as f64 * 0.5 + 0.3))).collect();

        let loose = Alignment::build(&ground_truth, &converted, 1.0).matched_count();
        let tight = Alignment::build(&ground_truth, &converted, 0.0).matched_count();
        assert!(tight <= loose);
        assert_eq!(tight, 0);
    }

    #[test]
    fn field_pairs_skip_unresolvable_records() {
        let ground_truth: Vec<Record> = vec![
            serde_json::from_value(json!({"time_unix": 0.0, "dop": {"hdop": 1.0}})).unwrap(),
            serde_json::from_value(json!({"time_unix": 1.0})).unwrap(),
        ];
        let converted: Vec<Record> = vec![
            serde_json::from_value(json!({"time_unix": 0.0, "dop": {"hdop": 1.5}})).unwrap(),
            serde_json::from_value(json!({"time_unix": 1.0, "dop": {"hdop": 2.0}})).unwrap(),
        ];
        let alignment = Alignment::build(&ground_truth, &converted, 0.1);
        let pairs = alignment.field_pairs(
            &ground_truth,
            &converted,
            &crate::fields::FieldPath::parse("dop.hdop"),
        );
        assert_eq!(pairs, vec![(1.0, 1.5)]);
    }
}
