//! Core domain types for the workout duration engine.
//!
//! This module defines the value types the engine operates on:
//! - Effort levels and rest-time settings
//! - Equipment stations and their variants
//! - Exercises and workout-exercises
//! - Workouts

use serde::{Deserialize, Serialize};

// ============================================================================
// Effort and Rest Settings
// ============================================================================

/// Perceived effort of an exercise, used to pick the rest time after it
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EffortLevel {
    Low,
    Medium,
    High,
    Vigorous,
}

/// Fallback rest tables used when a level has no override
///
/// Two tables exist in production: the one applied when a single exercise
/// is recalculated and the one used by workout-wide recalculation. They only
/// differ for `Medium`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RestDefaults {
    /// LOW 10, MEDIUM 15, HIGH 20, VIGOROUS 25
    #[default]
    Exercise,
    /// LOW 10, MEDIUM 25, HIGH 20, VIGOROUS 25
    Workout,
}

impl RestDefaults {
    /// Default rest seconds for an effort level
    pub fn seconds(self, level: EffortLevel) -> f64 {
        match (self, level) {
            (_, EffortLevel::Low) => 10.0,
            (RestDefaults::Exercise, EffortLevel::Medium) => 15.0,
            (RestDefaults::Workout, EffortLevel::Medium) => 25.0,
            (_, EffortLevel::High) => 20.0,
            (_, EffortLevel::Vigorous) => 25.0,
        }
    }
}

/// Rest seconds per effort level
///
/// `None` means "not configured" and falls back to [`RestDefaults`];
/// `Some(0.0)` is an explicit zero rest. A missing `defaults` means
/// [`RestDefaults::Exercise`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct RestSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vigorous: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<RestDefaults>,
}

impl RestSettings {
    /// Configured override for a level, if any
    pub fn override_for(&self, level: EffortLevel) -> Option<f64> {
        match level {
            EffortLevel::Low => self.low,
            EffortLevel::Medium => self.medium,
            EffortLevel::High => self.high,
            EffortLevel::Vigorous => self.vigorous,
        }
    }

    /// Rest seconds for a level, falling back to the default table
    pub fn rest_for(&self, level: EffortLevel) -> f64 {
        self.override_for(level)
            .unwrap_or_else(|| self.defaults.unwrap_or_default().seconds(level))
    }

    /// Layer `self` over `base`: fields set here win, the rest come from `base`
    pub fn merged_over(&self, base: &RestSettings) -> RestSettings {
        RestSettings {
            low: self.low.or(base.low),
            medium: self.medium.or(base.medium),
            high: self.high.or(base.high),
            vigorous: self.vigorous.or(base.vigorous),
            defaults: self.defaults.or(base.defaults),
        }
    }
}

// ============================================================================
// Equipment and Exercises
// ============================================================================

/// A piece of equipment, i.e. one variant of a physical station
///
/// Equipment sharing a `key_title` are mutually exclusive configurations of
/// the same station (e.g. "Strap System - High" and "Strap System - Low").
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Equipment {
    pub id: String,
    pub key_title: String,
    /// Lower is preferred within a key title group
    pub priority: i32,
    #[serde(default)]
    pub setup_duration: f64,
    #[serde(default)]
    pub removal_duration: f64,
    #[serde(default)]
    pub adjustment_duration: f64,
}

/// An exercise definition with everything needed to time it
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub secs_per_quantity_unit: f64,
    pub effort_level: EffortLevel,
    /// Performed once per side, which doubles the cost
    #[serde(default)]
    pub right_left_separately: bool,
    #[serde(default)]
    pub equipments: Vec<Equipment>,
}

// ============================================================================
// Workouts
// ============================================================================

/// One node of a workout's ordered exercise sequence
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutExercise {
    pub ordinal_number: u32,
    /// Opaque circuit label
    pub circuit: String,
    pub primary_exercise: Option<Exercise>,
    pub secondary_exercise: Option<Exercise>,
    pub quantity: u32,
    pub sets: u32,
    /// Computed by [`crate::exercise::compute_exercise_duration`]
    #[serde(default)]
    pub duration: f64,
}

/// A workout with its fully resolved exercise sequence
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: String,
    pub name: String,
    pub exercises: Vec<WorkoutExercise>,
    /// Computed by [`crate::transitions::compute_workout_duration`]
    #[serde(default)]
    pub duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_differ_only_for_medium() {
        for level in [EffortLevel::Low, EffortLevel::High, EffortLevel::Vigorous] {
            assert_eq!(
                RestDefaults::Exercise.seconds(level),
                RestDefaults::Workout.seconds(level)
            );
        }
        assert_eq!(RestDefaults::Exercise.seconds(EffortLevel::Medium), 15.0);
        assert_eq!(RestDefaults::Workout.seconds(EffortLevel::Medium), 25.0);
    }

    #[test]
    fn test_zero_override_is_respected() {
        let settings = RestSettings {
            low: Some(0.0),
            ..Default::default()
        };
        assert_eq!(settings.rest_for(EffortLevel::Low), 0.0);
        assert_eq!(settings.rest_for(EffortLevel::High), 20.0);
    }

    #[test]
    fn test_merged_over_prefers_own_fields() {
        let base = RestSettings {
            low: Some(5.0),
            high: Some(30.0),
            ..Default::default()
        };
        let top = RestSettings {
            high: Some(12.0),
            defaults: Some(RestDefaults::Workout),
            ..Default::default()
        };

        let merged = top.merged_over(&base);
        assert_eq!(merged.low, Some(5.0));
        assert_eq!(merged.high, Some(12.0));
        assert_eq!(merged.medium, None);
        assert_eq!(merged.rest_for(EffortLevel::Medium), 25.0);
    }

    #[test]
    fn test_effort_level_serializes_snake_case() {
        let json = serde_json::to_string(&EffortLevel::Vigorous).unwrap();
        assert_eq!(json, "\"vigorous\"");
        let level: EffortLevel = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(level, EffortLevel::Medium);
    }
}
