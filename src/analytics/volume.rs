//! Weekly training volume, bucketed by Monday-anchored calendar week

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::analytics::formulas::is_countable;
use crate::models::{DATE_FORMAT, DateRange, WorkoutDay};

/// Totals for one Monday-Sunday week
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBucket {
    #[serde(serialize_with = "serialize_date")]
    pub week_start: NaiveDate,
    pub total_sets: u64,
    pub total_reps: u64,
    /// Sum of reps x weight
    pub total_volume: f64,
}

impl WeekBucket {
    fn new(week_start: NaiveDate) -> Self {
        Self {
            week_start,
            total_sets: 0,
            total_reps: 0,
            total_volume: 0.0,
        }
    }
}

/// Monday on or before `date`. Sundays belong to the previous Monday.
pub fn week_start_monday(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday() as i64;
    let offset = if weekday == 0 { -6 } else { 1 - weekday };
    date + Duration::days(offset)
}

/// Folds day records inside a date range into week buckets
pub struct VolumeBucketizer<'a> {
    range: &'a DateRange,
    require_completed: bool,
    buckets: HashMap<NaiveDate, WeekBucket>,
}

impl<'a> VolumeBucketizer<'a> {
    pub fn new(range: &'a DateRange, require_completed: bool) -> Self {
        Self {
            range,
            require_completed,
            buckets: HashMap::new(),
        }
    }

    pub fn add_day(&mut self, day: &WorkoutDay) {
        if !self.range.contains(day.date) {
            debug!("Skipping {} outside {}..{}", day.date, self.range.from, self.range.to);
            return;
        }

        let (mut sets, mut reps, mut volume) = (0u64, 0u64, 0.0);
        // Volume ignores exercise names, so unnamed entries still count here
        for set in day
            .entries
            .iter()
            .flat_map(|e| e.sets.iter())
            .filter(|s| is_countable(s, self.require_completed))
        {
            sets += 1;
            reps += set.reps as u64;
            volume += set.tonnage();
        }

        if sets == 0 {
            return;
        }

        let week_start = week_start_monday(day.date);
        let bucket = self
            .buckets
            .entry(week_start)
            .or_insert_with(|| WeekBucket::new(week_start));
        bucket.total_sets += sets;
        bucket.total_reps += reps;
        bucket.total_volume += volume;
    }

    /// Buckets sorted by week start ascending
    pub fn finish(self) -> Vec<WeekBucket> {
        let mut weeks: Vec<_> = self.buckets.into_values().collect();
        weeks.sort_by_key(|w| w.week_start);
        weeks
    }
}

fn serialize_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
}
