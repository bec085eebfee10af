//! Analytics module - PRs and weekly volume over logged days
//!
//! Features:
//! - Countable-set policy and Epley e1RM
//! - Per-exercise personal records
//! - Monday-anchored weekly volume buckets

pub mod formulas;
pub mod prs;
pub mod volume;

pub use formulas::{estimate_one_rep_max, is_countable};
pub use prs::{E1rmSet, PrAggregator, PrRecord};
pub use volume::{VolumeBucketizer, WeekBucket, week_start_monday};

use crate::models::{DateRange, WorkoutDay};

/// Analytics over a fetched snapshot of workout days
pub struct Analytics {
    days: Vec<WorkoutDay>,
}

impl Analytics {
    pub fn new(days: Vec<WorkoutDay>) -> Self {
        Self { days }
    }

    /// All-time personal records, best e1RM first
    pub fn personal_records(&self, require_completed: bool) -> Vec<PrRecord> {
        let mut aggregator = PrAggregator::new(require_completed);
        for day in &self.days {
            aggregator.add_day(day);
        }
        aggregator.finish()
    }

    /// Weekly totals for days inside `range`, oldest week first
    pub fn weekly_volume(&self, range: &DateRange, require_completed: bool) -> Vec<WeekBucket> {
        let mut bucketizer = VolumeBucketizer::new(range, require_completed);
        for day in &self.days {
            bucketizer.add_day(day);
        }
        bucketizer.finish()
    }

    /// Number of days in the snapshot
    pub fn day_count(&self) -> usize {
        self.days.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entry, WorkoutSet};
    use chrono::{NaiveDate, Utc};

    fn create_day(date: &str, entries: Vec<(&str, Vec<WorkoutSet>)>) -> WorkoutDay {
        WorkoutDay {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            workout_type: "strength".to_string(),
            entries: entries
                .into_iter()
                .map(|(name, sets)| {
                    let mut entry = Entry::new(name);
                    entry.sets = sets;
                    entry
                })
                .collect(),
        }
    }

    fn history() -> Vec<WorkoutDay> {
        vec![
            create_day(
                "2026-10-14",
                vec![
                    ("Squat", vec![WorkoutSet::new(120.0, 5), WorkoutSet::new(130.0, 3)]),
                    ("Pull-up", vec![WorkoutSet::new(0.0, 10).completed(Utc::now())]),
                ],
            ),
            create_day(
                "2026-10-05",
                vec![("Squat", vec![WorkoutSet::new(110.0, 8).completed(Utc::now())])],
            ),
            create_day("2026-10-06", vec![("Bench Press", vec![WorkoutSet::new(80.0, 0)])]),
        ]
    }

    #[test]
    fn test_analytics_new() {
        let analytics = Analytics::new(vec![]);
        assert_eq!(analytics.day_count(), 0);
        assert!(analytics.personal_records(false).is_empty());
    }

    #[test]
    fn test_personal_records_over_history() {
        let prs = Analytics::new(history()).personal_records(false);
        // Bench Press only has a zero-rep set
        assert_eq!(prs.len(), 2);
        assert_eq!(prs[0].exercise_name, "Squat");
        assert_eq!(prs[0].best_weight, 130.0);
        // 110x8 = 139.33 < 120x5 = 140 < 130x3 = 143
        assert!((prs[0].best_e1rm - 143.0).abs() < 1e-9);
        assert_eq!(prs[1].exercise_name, "Pull-up");
    }

    #[test]
    fn test_personal_records_completed_only() {
        let prs = Analytics::new(history()).personal_records(true);
        assert_eq!(prs.len(), 2);
        assert_eq!(prs[0].exercise_name, "Squat");
        assert_eq!(prs[0].best_weight, 110.0);
        assert_eq!(prs[0].best_weight_reps, 8);
    }

    #[test]
    fn test_weekly_volume_over_history() {
        let range = DateRange::new("2026-10-01", "2026-10-31");
        let weeks = Analytics::new(history()).weekly_volume(&range, false);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].week_start.to_string(), "2026-10-05");
        assert_eq!(weeks[0].total_sets, 1);
        assert_eq!(weeks[1].week_start.to_string(), "2026-10-12");
        assert_eq!(weeks[1].total_sets, 3);
        assert_eq!(weeks[1].total_reps, 18);
        assert!((weeks[1].total_volume - 990.0).abs() < 1e-9);
    }
}
