#![forbid(unsafe_code)]

//! Core domain model and duration engine for wodtime.
//!
//! This crate provides:
//! - Domain types (equipment, exercises, workouts, rest settings)
//! - Per-exercise duration calculation
//! - Equipment transition scheduling for whole workouts
//! - Workout library documents (loading, validation, persistence)
//! - Configuration and logging

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod equipment;
pub mod exercise;
pub mod transitions;
pub mod recalc;
pub mod library;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use exercise::compute_exercise_duration;
pub use transitions::{compute_workout_duration, plan_transitions, TransitionReport, TransitionStep};
pub use recalc::{recalculate_all, recalculate_workout};
pub use library::{Library, LibraryLock};
