// src/scoring/stats.rs

use serde::Serialize;

use super::grade::round2;
use crate::config;

/// Input to the statistics engine: one student's percentage and curved grade.
#[derive(Debug, Clone, Copy)]
pub struct GradedEntry {
    pub percentage: f64,
    pub grade: f64,
}

/// One non-empty percentile bucket of the distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileBucket {
    pub range: &'static str,
    pub color: &'static str,
    pub students: usize,
}

/// Class-level statistics, always recomputed from a batch. Never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStatistics {
    pub total_students: usize,
    pub average_grade: f64,
    pub passed: usize,
    pub failed: usize,

    /// Integer percent of passing students.
    pub pass_rate: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_grade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_grade: Option<f64>,

    pub buckets: Vec<PercentileBucket>,
}

/// Fixed percentile ranges, highest first. The top range carries the most
/// saturated color of the palette.
///
/// Note the 1% lower bound of the last bucket: a percentage of exactly 0
/// lands in no bucket. Observed behavior, kept as-is and pinned by test.
const BUCKETS: [(&str, f64, f64, &str); 10] = [
    ("91%-100%", 91.0, 100.0, "#7c3aed"),
    ("81%-90%", 81.0, 90.0, "#8b5cf6"),
    ("71%-80%", 71.0, 80.0, "#a855f7"),
    ("61%-70%", 61.0, 70.0, "#c084fc"),
    ("51%-60%", 51.0, 60.0, "#d8b4fe"),
    ("41%-50%", 41.0, 50.0, "#e9d5ff"),
    ("31%-40%", 31.0, 40.0, "#f3e8ff"),
    ("21%-30%", 21.0, 30.0, "#faf5ff"),
    ("11%-20%", 11.0, 20.0, "#fdf4ff"),
    ("1%-10%", 1.0, 10.0, "#fef7ff"),
];

impl ClassStatistics {
    /// Aggregates a completed batch of graded results.
    /// An empty batch yields all-zero statistics rather than an error.
    pub fn compute(entries: &[GradedEntry]) -> Self {
        if entries.is_empty() {
            return ClassStatistics {
                total_students: 0,
                average_grade: 0.0,
                passed: 0,
                failed: 0,
                pass_rate: 0,
                max_grade: None,
                min_grade: None,
                buckets: Vec::new(),
            };
        }

        let count = entries.len();
        let sum: f64 = entries.iter().map(|e| e.grade).sum();
        let passed = entries
            .iter()
            .filter(|e| e.grade >= config::PASSING_GRADE)
            .count();
        let max = entries.iter().map(|e| e.grade).fold(f64::MIN, f64::max);
        let min = entries.iter().map(|e| e.grade).fold(f64::MAX, f64::min);

        ClassStatistics {
            total_students: count,
            average_grade: round2(sum / count as f64),
            passed,
            failed: count - passed,
            pass_rate: ((passed as f64 / count as f64) * 100.0).round() as i64,
            max_grade: Some(max),
            min_grade: Some(min),
            buckets: percentage_buckets(entries),
        }
    }
}

/// Distributes percentages over the ten fixed buckets, keeping only the
/// non-empty ones in descending range order.
pub fn percentage_buckets(entries: &[GradedEntry]) -> Vec<PercentileBucket> {
    BUCKETS
        .iter()
        .filter_map(|&(range, min, max, color)| {
            let students = entries
                .iter()
                .filter(|e| e.percentage >= min && e.percentage <= max)
                .count();
            (students > 0).then_some(PercentileBucket {
                range,
                color,
                students,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(percentage: f64, grade: f64) -> GradedEntry {
        GradedEntry { percentage, grade }
    }

    #[test]
    fn test_empty_batch_yields_zeroed_statistics() {
        let stats = ClassStatistics::compute(&[]);

        assert_eq!(stats.total_students, 0);
        assert_eq!(stats.average_grade, 0.0);
        assert_eq!(stats.passed, 0);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.pass_rate, 0);
        assert_eq!(stats.max_grade, None);
        assert_eq!(stats.min_grade, None);
        assert!(stats.buckets.is_empty());
    }

    #[test]
    fn test_aggregates_passed_failed_and_average() {
        let entries = [
            entry(100.0, 7.0),
            entry(60.0, 4.0),
            entry(0.0, 1.0),
        ];
        let stats = ClassStatistics::compute(&entries);

        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.average_grade, 4.0);
        assert_eq!(stats.passed, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.pass_rate, 67);
        assert_eq!(stats.max_grade, Some(7.0));
        assert_eq!(stats.min_grade, Some(1.0));
    }

    #[test]
    fn test_average_is_rounded_to_two_decimals() {
        let entries = [entry(50.0, 3.5), entry(60.0, 4.0), entry(70.0, 4.76)];
        let stats = ClassStatistics::compute(&entries);
        // (3.5 + 4.0 + 4.76) / 3 = 4.0866... -> 4.09
        assert_eq!(stats.average_grade, 4.09);
    }

    #[test]
    fn test_buckets_keep_descending_order_and_palette() {
        let entries = [
            entry(95.0, 6.7),
            entry(92.0, 6.5),
            entry(45.0, 3.2),
            entry(5.0, 1.2),
        ];
        let buckets = percentage_buckets(&entries);

        assert_eq!(
            buckets,
            vec![
                PercentileBucket {
                    range: "91%-100%",
                    color: "#7c3aed",
                    students: 2,
                },
                PercentileBucket {
                    range: "41%-50%",
                    color: "#e9d5ff",
                    students: 1,
                },
                PercentileBucket {
                    range: "1%-10%",
                    color: "#fef7ff",
                    students: 1,
                },
            ]
        );
    }

    #[test]
    fn test_zero_percentage_falls_into_no_bucket() {
        // The lowest bucket starts at 1%, so an exact 0 is not counted.
        // This pins the observed behavior of the range thresholds.
        let buckets = percentage_buckets(&[entry(0.0, 1.0), entry(0.5, 1.02)]);
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_bucket_bounds_are_inclusive() {
        let buckets = percentage_buckets(&[entry(91.0, 6.5), entry(90.0, 6.4), entry(1.0, 1.05)]);

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].range, "91%-100%");
        assert_eq!(buckets[1].range, "81%-90%");
        assert_eq!(buckets[2].range, "1%-10%");
    }
}
