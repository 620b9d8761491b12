//! Workout library documents.
//!
//! A library is a JSON file holding the equipment catalog, the exercises that
//! reference it by id, and workouts that reference exercises by id. It stands
//! in for the backend's storage layer: it resolves references into the fully
//! populated value types the engine expects, and stores computed durations
//! back with file locking and an atomic rename.

use crate::recalc::recalculate_workout;
use crate::{
    EffortLevel, Equipment, Error, Exercise, Result, RestSettings, Workout, WorkoutExercise,
};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::hash::Hash;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Exercise as stored, with equipment referenced by id
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseRecord {
    pub id: String,
    pub name: String,
    pub secs_per_quantity_unit: f64,
    pub effort_level: EffortLevel,
    #[serde(default)]
    pub right_left_separately: bool,
    #[serde(default)]
    pub equipment: Vec<String>,
}

/// Workout-exercise as stored, with exercises referenced by id
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutExerciseRecord {
    pub ordinal_number: u32,
    #[serde(default)]
    pub circuit: String,
    #[serde(default)]
    pub primary_exercise: Option<String>,
    #[serde(default)]
    pub secondary_exercise: Option<String>,
    pub quantity: u32,
    pub sets: u32,
    #[serde(default)]
    pub duration: f64,
}

/// Workout as stored
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<WorkoutExerciseRecord>,
    #[serde(default)]
    pub duration: f64,
}

/// Exclusive hold on a library file across a load, recalculate and save cycle
///
/// Locks a sibling `<file>.lock` rather than the library itself, since saving
/// replaces the library file. Released on drop.
#[derive(Debug)]
pub struct LibraryLock {
    file: File,
    path: PathBuf,
}

impl LibraryLock {
    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LibraryLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("Failed to release {:?}: {}", self.path, e);
        }
    }
}

/// A complete library document
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Library {
    /// Rest overrides stored with the library
    #[serde(default)]
    pub settings: RestSettings,

    #[serde(default)]
    pub equipment: Vec<Equipment>,

    #[serde(default)]
    pub exercises: Vec<ExerciseRecord>,

    #[serde(default)]
    pub workouts: Vec<WorkoutRecord>,

    /// When durations were last written back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recalculated_at: Option<DateTime<Utc>>,
}

impl Library {
    /// Block until no other writer holds the library at `path`
    pub fn lock(path: &Path) -> Result<LibraryLock> {
        let lock_file = lock_path(path);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_file)?;
        file.lock_exclusive()?;

        tracing::debug!("Acquired {:?}", lock_file);
        Ok(LibraryLock {
            file,
            path: lock_file,
        })
    }

    /// Load a library from a file with shared locking
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let library: Library = serde_json::from_str(&contents)?;
        tracing::info!(
            "Loaded library from {:?}: {} equipment, {} exercises, {} workouts",
            path,
            library.equipment.len(),
            library.exercises.len(),
            library.workouts.len()
        );
        Ok(library)
    }

    /// Save the library atomically
    ///
    /// Hold `Library::lock` across load and save to keep concurrent writers
    /// from losing updates.
    ///
    /// Writes to a temp file in the same directory, syncs it and renames it
    /// over the original.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::info!("Saved library to {:?}", path);
        Ok(())
    }

    /// Look up an equipment item by id
    pub fn find_equipment(&self, id: &str) -> Option<&Equipment> {
        self.equipment.iter().find(|e| e.id == id)
    }

    /// Look up an exercise record by id
    pub fn find_exercise(&self, id: &str) -> Option<&ExerciseRecord> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Look up a workout record by id
    pub fn find_workout(&self, id: &str) -> Option<&WorkoutRecord> {
        self.workouts.iter().find(|w| w.id == id)
    }

    /// Materialize an exercise with its equipment
    pub fn resolve_exercise(&self, id: &str) -> Result<Exercise> {
        let record = self
            .find_exercise(id)
            .ok_or_else(|| Error::Library(format!("Unknown exercise '{}'", id)))?;
        self.materialize(record)
    }

    /// Materialize a workout with all of its relations
    ///
    /// A reference to an exercise that no longer exists resolves to no
    /// exercise at all, like a detached relation in the backend. `validate`
    /// still reports such references, so the CLI never gets this far with one.
    pub fn resolve_workout(&self, id: &str) -> Result<Workout> {
        let record = self
            .find_workout(id)
            .ok_or_else(|| Error::Library(format!("Unknown workout '{}'", id)))?;
        self.resolve_record(record)
    }

    /// Recalculate every workout and store the durations in the library
    ///
    /// Returns the recalculated workouts in library order.
    pub fn recalculate(&mut self, settings: &RestSettings) -> Result<Vec<Workout>> {
        let mut workouts = self
            .workouts
            .iter()
            .map(|w| self.resolve_record(w))
            .collect::<Result<Vec<_>>>()?;

        for (workout, record) in workouts.iter_mut().zip(self.workouts.iter_mut()) {
            recalculate_workout(workout, settings);

            // Resolution keeps record order, so entries line up one to one
            for (exercise, stored) in workout.exercises.iter().zip(record.exercises.iter_mut()) {
                stored.duration = exercise.duration;
            }
            record.duration = workout.duration;
        }

        self.recalculated_at = Some(Utc::now());
        Ok(workouts)
    }

    /// Validate references and values
    ///
    /// Returns a list of validation errors (empty if valid)
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for id in duplicates(self.equipment.iter().map(|e| e.id.as_str())) {
            errors.push(format!("Duplicate equipment id '{}'", id));
        }
        for id in duplicates(self.exercises.iter().map(|e| e.id.as_str())) {
            errors.push(format!("Duplicate exercise id '{}'", id));
        }
        for id in duplicates(self.workouts.iter().map(|w| w.id.as_str())) {
            errors.push(format!("Duplicate workout id '{}'", id));
        }

        for equipment in &self.equipment {
            let durations = [
                ("setup", equipment.setup_duration),
                ("removal", equipment.removal_duration),
                ("adjustment", equipment.adjustment_duration),
            ];
            for (name, value) in durations {
                if !value.is_finite() || value < 0.0 {
                    errors.push(format!(
                        "Equipment '{}': {} duration must be a non-negative number, got {}",
                        equipment.id, name, value
                    ));
                }
            }
        }

        for exercise in &self.exercises {
            let secs = exercise.secs_per_quantity_unit;
            if !secs.is_finite() || secs <= 0.0 {
                errors.push(format!(
                    "Exercise '{}': secs_per_quantity_unit must be positive, got {}",
                    exercise.id, secs
                ));
            }
            for equipment_id in &exercise.equipment {
                if self.find_equipment(equipment_id).is_none() {
                    errors.push(format!(
                        "Exercise '{}' references unknown equipment '{}'",
                        exercise.id, equipment_id
                    ));
                }
            }
        }

        for workout in &self.workouts {
            for ordinal in duplicates(workout.exercises.iter().map(|e| e.ordinal_number)) {
                errors.push(format!(
                    "Workout '{}': ordinal number {} is used more than once",
                    workout.id, ordinal
                ));
            }

            for we in &workout.exercises {
                if we.quantity == 0 || we.sets == 0 {
                    errors.push(format!(
                        "Workout '{}' exercise #{}: quantity and sets must be positive",
                        workout.id, we.ordinal_number
                    ));
                }

                let references = [
                    we.primary_exercise.as_deref(),
                    we.secondary_exercise.as_deref(),
                ];
                for exercise_id in references.into_iter().flatten() {
                    if self.find_exercise(exercise_id).is_none() {
                        errors.push(format!(
                            "Workout '{}' exercise #{} references unknown exercise '{}'",
                            workout.id, we.ordinal_number, exercise_id
                        ));
                    }
                }
            }
        }

        errors
    }

    /// Validate, turning any problems into an error
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }

    fn resolve_record(&self, record: &WorkoutRecord) -> Result<Workout> {
        let exercises = record
            .exercises
            .iter()
            .map(|we| {
                Ok(WorkoutExercise {
                    ordinal_number: we.ordinal_number,
                    circuit: we.circuit.clone(),
                    primary_exercise: self
                        .resolve_reference(&record.id, we.primary_exercise.as_deref())?,
                    secondary_exercise: self
                        .resolve_reference(&record.id, we.secondary_exercise.as_deref())?,
                    quantity: we.quantity,
                    sets: we.sets,
                    duration: we.duration,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Workout {
            id: record.id.clone(),
            name: record.name.clone(),
            exercises,
            duration: record.duration,
        })
    }

    fn resolve_reference(
        &self,
        workout_id: &str,
        exercise_id: Option<&str>,
    ) -> Result<Option<Exercise>> {
        let Some(exercise_id) = exercise_id else {
            return Ok(None);
        };

        match self.find_exercise(exercise_id) {
            Some(record) => self.materialize(record).map(Some),
            None => {
                tracing::warn!(
                    "Workout '{}' references missing exercise '{}', treating it as detached",
                    workout_id,
                    exercise_id
                );
                Ok(None)
            }
        }
    }

    fn materialize(&self, record: &ExerciseRecord) -> Result<Exercise> {
        let equipments = record
            .equipment
            .iter()
            .map(|id| {
                self.find_equipment(id).cloned().ok_or_else(|| {
                    Error::Library(format!(
                        "Exercise '{}' references unknown equipment '{}'",
                        record.id, id
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Exercise {
            id: record.id.clone(),
            name: record.name.clone(),
            secs_per_quantity_unit: record.secs_per_quantity_unit,
            effort_level: record.effort_level,
            right_left_separately: record.right_left_separately,
            equipments,
        })
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "library".into());
    name.push(".lock");
    path.with_file_name(name)
}

/// Values that appear more than once, in first-repeat order
fn duplicates<T: Eq + Hash + Copy>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    values
        .filter(|value| !seen.insert(*value) && reported.insert(*value))
        .collect()
}
