//! Per-exercise duration calculation.
//!
//! The duration of a workout-exercise is the time spent working plus the
//! rest after it, per side and per set:
//!
//! ```text
//! (secs_per_quantity_unit * quantity + rest) * sides * sets
//! ```

use crate::{Exercise, RestSettings, WorkoutExercise};

/// Round to two decimal places, halves away from zero
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the duration of a workout-exercise in seconds
///
/// `primary_exercise` is passed separately from `workout_exercise` so callers
/// can time an edit before applying it. A missing primary exercise (deleted
/// and detached) yields `0.0`.
pub fn compute_exercise_duration(
    workout_exercise: &WorkoutExercise,
    primary_exercise: Option<&Exercise>,
    settings: &RestSettings,
) -> f64 {
    let Some(exercise) = primary_exercise else {
        return 0.0;
    };

    let rest = settings.rest_for(exercise.effort_level);
    let sides = if exercise.right_left_separately { 2.0 } else { 1.0 };

    let work = exercise.secs_per_quantity_unit * f64::from(workout_exercise.quantity);
    let duration = (work + rest) * sides * f64::from(workout_exercise.sets);

    round_to_hundredths(duration)
}
