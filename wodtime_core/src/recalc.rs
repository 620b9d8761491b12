//! Workout recalculation.
//!
//! Runs the two engine stages in order over a workout snapshot: every
//! workout-exercise duration first, then the workout total.

use crate::exercise::compute_exercise_duration;
use crate::transitions::compute_workout_duration;
use crate::{RestSettings, Workout};

/// Recompute every exercise duration and the total duration of a workout
///
/// Returns the new workout duration.
pub fn recalculate_workout(workout: &mut Workout, settings: &RestSettings) -> f64 {
    for exercise in &mut workout.exercises {
        if exercise.primary_exercise.is_none() {
            tracing::warn!(
                "Workout '{}' exercise #{} has no primary exercise, duration is 0",
                workout.id,
                exercise.ordinal_number
            );
        }
        exercise.duration =
            compute_exercise_duration(exercise, exercise.primary_exercise.as_ref(), settings);
    }

    workout.duration = compute_workout_duration(&workout.exercises);

    tracing::info!(
        "Recalculated workout '{}': {} exercises, {}s",
        workout.id,
        workout.exercises.len(),
        workout.duration
    );

    workout.duration
}

/// Recalculate a batch of workouts one after another
pub fn recalculate_all(workouts: &mut [Workout], settings: &RestSettings) {
    for workout in workouts.iter_mut() {
        recalculate_workout(workout, settings);
    }
}
