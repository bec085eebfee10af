//! Set countability and e1RM estimation

use crate::models::WorkoutSet;

/// Whether a set contributes to PRs and volume.
///
/// Sets without reps never count. With `require_completed` the set must
/// also carry a completion marker. Weight may be zero (bodyweight work).
pub fn is_countable(set: &WorkoutSet, require_completed: bool) -> bool {
    if set.reps == 0 {
        return false;
    }
    if require_completed && set.completed_at.is_none() {
        return false;
    }
    true
}

/// Estimated one-rep max using the Epley relation: `w * (1 + reps / 30)`.
///
/// Returns exactly 0 for non-positive weight or zero reps. Not rounded.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> f64 {
    if weight.is_nan() || weight <= 0.0 || reps == 0 {
        return 0.0;
    }
    weight * (1.0 + reps as f64 / 30.0)
}
