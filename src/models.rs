//! Workout data model - days, exercise entries and performed sets
//!
//! Incoming documents are loosely typed: numbers may arrive as strings,
//! be missing or be garbage. Everything numeric is coerced to a
//! non-negative value with a zero default instead of being rejected.

use anyhow::bail;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Calendar date format used on the wire and in storage
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Upper bounds accepted when a day is saved
pub const MAX_REPS: u32 = 1000;
pub const MAX_WEIGHT: f64 = 5000.0;
pub const MAX_REST_SECONDS: u32 = 36000;
pub const MAX_EXERCISE_NAME_CHARS: usize = 100;
pub const MAX_NOTES_CHARS: usize = 2000;
pub const MAX_WORKOUT_TYPE_CHARS: usize = 50;

/// One logged training day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDay {
    #[serde(serialize_with = "serialize_date", deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient_string")]
    pub workout_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub entries: Vec<Entry>,
}

impl WorkoutDay {
    /// Day with nothing logged yet
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            workout_type: String::new(),
            entries: Vec::new(),
        }
    }

    /// `YYYY-MM-DD` label of the day
    pub fn date_label(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Total number of sets recorded, countable or not
    pub fn set_count(&self) -> usize {
        self.entries.iter().map(|e| e.sets.len()).sum()
    }

    /// Reject days whose values exceed the stored limits
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workout_type.trim().chars().count() > MAX_WORKOUT_TYPE_CHARS {
            bail!("workout type longer than {} characters", MAX_WORKOUT_TYPE_CHARS);
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.exercise_name.trim().chars().count() > MAX_EXERCISE_NAME_CHARS {
                bail!("entry {}: exercise name longer than {} characters", i, MAX_EXERCISE_NAME_CHARS);
            }
            if entry.notes.chars().count() > MAX_NOTES_CHARS {
                bail!("entry {}: notes longer than {} characters", i, MAX_NOTES_CHARS);
            }
            for (j, set) in entry.sets.iter().enumerate() {
                if set.reps > MAX_REPS {
                    bail!("entry {} set {}: reps {} above {}", i, j, set.reps, MAX_REPS);
                }
                if set.weight > MAX_WEIGHT {
                    bail!("entry {} set {}: weight {} above {}", i, j, set.weight, MAX_WEIGHT);
                }
                if set.rest_seconds > MAX_REST_SECONDS {
                    bail!("entry {} set {}: rest {}s above {}s", i, j, set.rest_seconds, MAX_REST_SECONDS);
                }
            }
        }
        Ok(())
    }
}

/// Exercise performed on a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub exercise_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sets: Vec<WorkoutSet>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,
}

impl Entry {
    pub fn new(exercise_name: &str) -> Self {
        Self {
            exercise_name: exercise_name.to_string(),
            sets: Vec::new(),
            notes: String::new(),
        }
    }
}

/// A single performed set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    #[serde(default, deserialize_with = "zero_default_u32")]
    pub reps: u32,
    /// Zero is valid (bodyweight movements)
    #[serde(default, deserialize_with = "zero_default_f64")]
    pub weight: f64,
    #[serde(default, deserialize_with = "zero_default_u32")]
    pub rest_seconds: u32,
    /// Absent means the set was planned but not completed
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkoutSet {
    pub fn new(weight: f64, reps: u32) -> Self {
        Self {
            reps,
            weight: coerce_non_negative(weight),
            rest_seconds: 0,
            completed_at: None,
        }
    }

    pub fn completed(mut self, at: DateTime<Utc>) -> Self {
        self.completed_at = Some(at);
        self
    }

    /// Reps x weight
    pub fn tonnage(&self) -> f64 {
        self.reps as f64 * self.weight
    }
}

/// Inclusive `[from, to]` date filter, bounds kept as ISO text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

impl DateRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let label = date.format(DATE_FORMAT).to_string();
        label.as_str() >= self.from.as_str() && label.as_str() <= self.to.as_str()
    }
}

/// Strict `^\d{4}-\d{2}-\d{2}$` format check (no calendar validation)
pub fn is_iso_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Format check plus a real calendar date
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    if !is_iso_date(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

fn coerce_non_negative(n: f64) -> f64 {
    if n.is_finite() && n > 0.0 { n } else { 0.0 }
}

/// Numbers and numeric strings pass through, everything else is zero
fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    coerce_non_negative(n)
}

fn zero_default_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_number).unwrap_or(0.0))
}

fn zero_default_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    // `as` saturates at u32::MAX
    Ok(value.as_ref().map(coerce_number).unwrap_or(0.0).trunc() as u32)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .map(|d| d.with_timezone(&Utc))
            .ok(),
        _ => None,
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn serialize_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_iso_date(s.trim())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date (expected YYYY-MM-DD): {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date_format() {
        assert!(is_iso_date("2026-10-12"));
        assert!(is_iso_date("2026-02-31")); // format only
        assert!(!is_iso_date("2026-1-12"));
        assert!(!is_iso_date("2026/10/12"));
        assert!(!is_iso_date("2026-10-12T00:00"));
        assert!(!is_iso_date(""));
        assert!(!is_iso_date("２０２６-10-12"));
    }

    #[test]
    fn test_parse_iso_date_rejects_impossible_day() {
        assert!(parse_iso_date("2026-02-31").is_none());
        assert_eq!(
            parse_iso_date("2026-10-12"),
            NaiveDate::from_ymd_opt(2026, 10, 12)
        );
    }

    #[test]
    fn test_set_coercion() {
        let set: WorkoutSet =
            serde_json::from_str(r#"{"reps": "8", "weight": "62.5", "restSeconds": null}"#).unwrap();
        assert_eq!(set.reps, 8);
        assert_eq!(set.weight, 62.5);
        assert_eq!(set.rest_seconds, 0);
        assert!(set.completed_at.is_none());
    }

    #[test]
    fn test_set_garbage_becomes_zero() {
        let set: WorkoutSet =
            serde_json::from_str(r#"{"reps": "lots", "weight": -20, "completedAt": ""}"#).unwrap();
        assert_eq!(set.reps, 0);
        assert_eq!(set.weight, 0.0);
        assert!(set.completed_at.is_none());

        let set: WorkoutSet = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(set.reps, 0);
        assert_eq!(set.weight, 0.0);
    }

    #[test]
    fn test_fractional_reps_truncate() {
        let set: WorkoutSet = serde_json::from_str(r#"{"reps": 5.9, "weight": 100}"#).unwrap();
        assert_eq!(set.reps, 5);
    }

    #[test]
    fn test_completed_at_parsed() {
        let set: WorkoutSet = serde_json::from_str(
            r#"{"reps": 5, "weight": 100, "completedAt": "2026-10-12T18:30:00Z"}"#,
        )
        .unwrap();
        assert!(set.completed_at.is_some());
    }

    #[test]
    fn test_day_with_missing_lists() {
        let day: WorkoutDay =
            serde_json::from_str(r#"{"date": "2026-10-12", "entries": [{"exerciseName": "Squat", "sets": null}]}"#)
                .unwrap();
        assert_eq!(day.workout_type, "");
        assert_eq!(day.entries.len(), 1);
        assert!(day.entries[0].sets.is_empty());
    }

    #[test]
    fn test_day_rejects_bad_date() {
        let result: Result<WorkoutDay, _> = serde_json::from_str(r#"{"date": "12.10.2026"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_day_serializes_camel_case() {
        let mut day = WorkoutDay::empty(NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
        let mut entry = Entry::new("Bench Press");
        entry.sets.push(WorkoutSet::new(100.0, 5));
        day.entries.push(entry);

        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["date"], "2026-10-12");
        assert_eq!(json["entries"][0]["exerciseName"], "Bench Press");
        assert_eq!(json["entries"][0]["sets"][0]["reps"], 5);
        assert!(json["entries"][0]["sets"][0]["completedAt"].is_null());
    }

    fn day_with_set(set: WorkoutSet) -> WorkoutDay {
        let mut day = WorkoutDay::empty(NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
        let mut entry = Entry::new("Squat");
        entry.sets.push(set);
        day.entries.push(entry);
        day
    }

    #[test]
    fn test_validate_accepts_limits() {
        let mut set = WorkoutSet::new(MAX_WEIGHT, MAX_REPS);
        set.rest_seconds = MAX_REST_SECONDS;
        assert!(day_with_set(set).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_huge_set() {
        let set: WorkoutSet = serde_json::from_str(r#"{"reps": 5000000, "weight": "1e308"}"#).unwrap();
        assert!(day_with_set(set).validate().is_err());
        assert!(day_with_set(WorkoutSet::new(5000.5, 5)).validate().is_err());
        assert!(day_with_set(WorkoutSet::new(100.0, 1001)).validate().is_err());

        let mut set = WorkoutSet::new(100.0, 5);
        set.rest_seconds = MAX_REST_SECONDS + 1;
        assert!(day_with_set(set).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_long_text() {
        let mut day = day_with_set(WorkoutSet::new(100.0, 5));
        day.entries[0].exercise_name = "x".repeat(MAX_EXERCISE_NAME_CHARS + 1);
        assert!(day.validate().is_err());

        let mut day = day_with_set(WorkoutSet::new(100.0, 5));
        day.entries[0].notes = "n".repeat(MAX_NOTES_CHARS + 1);
        assert!(day.validate().is_err());

        let mut day = day_with_set(WorkoutSet::new(100.0, 5));
        day.workout_type = format!("  {}  ", "t".repeat(MAX_WORKOUT_TYPE_CHARS));
        assert!(day.validate().is_ok());
        day.workout_type = "t".repeat(MAX_WORKOUT_TYPE_CHARS + 1);
        assert!(day.validate().is_err());
    }

    #[test]
    fn test_date_range_inclusive() {
        let range = DateRange::new("2026-10-01", "2026-10-31");
        assert!(range.contains(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2026, 10, 31).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2026, 11, 1).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2026, 9, 30).unwrap()));
    }
}
