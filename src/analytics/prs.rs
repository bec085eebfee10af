//! Personal records per exercise

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::analytics::formulas::{estimate_one_rep_max, is_countable};
use crate::models::{DATE_FORMAT, WorkoutDay, WorkoutSet};

/// The set that produced an exercise's best e1RM
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct E1rmSet {
    pub weight: f64,
    pub reps: u32,
    /// `None` until a set with a positive e1RM is seen
    #[serde(serialize_with = "serialize_optional_date")]
    pub date: Option<NaiveDate>,
}

/// All-time bests for one exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrRecord {
    pub exercise_name: String,
    pub best_weight: f64,
    /// Reps achieved at `best_weight`
    pub best_weight_reps: u32,
    #[serde(rename = "bestE1RM")]
    pub best_e1rm: f64,
    #[serde(rename = "bestE1RMSet")]
    pub best_e1rm_set: E1rmSet,
}

impl PrRecord {
    fn new(exercise_name: &str) -> Self {
        Self {
            exercise_name: exercise_name.to_string(),
            best_weight: 0.0,
            best_weight_reps: 0,
            best_e1rm: 0.0,
            best_e1rm_set: E1rmSet {
                weight: 0.0,
                reps: 0,
                date: None,
            },
        }
    }

    /// Fold one countable set into the running bests
    fn observe(&mut self, set: &WorkoutSet, date: NaiveDate) {
        let (weight, reps) = (set.weight, set.reps);

        // Heavier wins; at equal weight more reps wins
        if weight > self.best_weight || (weight == self.best_weight && reps > self.best_weight_reps) {
            self.best_weight = weight;
            self.best_weight_reps = reps;
        }

        // Strictly greater only: ties keep the first set folded in
        let e1rm = estimate_one_rep_max(weight, reps);
        if e1rm > self.best_e1rm {
            self.best_e1rm = e1rm;
            self.best_e1rm_set = E1rmSet {
                weight,
                reps,
                date: Some(date),
            };
        }
    }
}

/// Folds day records into per-exercise PRs.
///
/// Built fresh for every query and consumed by [`PrAggregator::finish`].
pub struct PrAggregator {
    require_completed: bool,
    by_exercise: HashMap<String, PrRecord>,
}

impl PrAggregator {
    pub fn new(require_completed: bool) -> Self {
        Self {
            require_completed,
            by_exercise: HashMap::new(),
        }
    }

    pub fn add_day(&mut self, day: &WorkoutDay) {
        let require_completed = self.require_completed;
        for entry in &day.entries {
            let name = entry.exercise_name.trim();
            if name.is_empty() {
                continue;
            }

            for set in entry
                .sets
                .iter()
                .filter(|s| is_countable(s, require_completed))
            {
                self.by_exercise
                    .entry(name.to_string())
                    .or_insert_with(|| PrRecord::new(name))
                    .observe(set, day.date);
            }
        }
    }

    /// Records sorted by best e1RM descending, then by exercise name
    pub fn finish(self) -> Vec<PrRecord> {
        let mut records: Vec<_> = self.by_exercise.into_values().collect();
        records.sort_by(|a, b| {
            b.best_e1rm
                .total_cmp(&a.best_e1rm)
                .then_with(|| a.exercise_name.cmp(&b.exercise_name))
        });
        records
    }
}

fn serialize_optional_date<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}
