//! Equipment transition scheduling.
//!
//! Walks a workout's exercise sequence once, in ordinal order, and charges the
//! time needed to get each exercise's equipment ready:
//! - **setup** for stations the previous exercise did not use
//! - **removal** for stations the next exercise no longer uses
//! - **adjustment** for stations used on both sides whose configuration
//!   changes (or must be rechecked because a circuit boundary was crossed)
//!
//! Each station is represented by its lowest-priority variant. The variant
//! currently rigged at every station is carried forward so an adjustment to
//! the configuration already in place is never charged.

use crate::equipment::{
    group_by_key_title, representative, representatives, unique_equipments, StationGroups,
};
use crate::exercise::round_to_hundredths;
use crate::{Equipment, WorkoutExercise};
use std::collections::BTreeMap;

/// Equipment changes made before performing one workout-exercise
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionStep {
    pub ordinal_number: u32,
    pub circuit: String,
    pub setup: Vec<Equipment>,
    pub removal: Vec<Equipment>,
    pub adjustment: Vec<Equipment>,
}

impl TransitionStep {
    /// Seconds spent on this step's equipment changes
    pub fn cost(&self) -> f64 {
        let setup: f64 = self.setup.iter().map(|e| e.setup_duration).sum();
        let removal: f64 = self.removal.iter().map(|e| e.removal_duration).sum();
        let adjustment: f64 = self.adjustment.iter().map(|e| e.adjustment_duration).sum();
        setup + removal + adjustment
    }

    pub fn is_empty(&self) -> bool {
        self.setup.is_empty() && self.removal.is_empty() && self.adjustment.is_empty()
    }
}

/// Full breakdown of a workout's duration
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionReport {
    /// Sum of the per-exercise durations
    pub base_duration: f64,
    /// One step per workout-exercise, in ordinal order
    pub steps: Vec<TransitionStep>,
    /// Base plus all transition costs, rounded to hundredths
    pub total_duration: f64,
}

impl TransitionReport {
    /// Seconds spent on equipment changes across the whole workout
    pub fn transition_duration(&self) -> f64 {
        self.steps.iter().map(TransitionStep::cost).sum()
    }
}

/// Variant currently rigged at each station, by key title
#[derive(Debug, Default)]
struct RiggedStations {
    stations: BTreeMap<String, Equipment>,
}

impl RiggedStations {
    fn is_rigged(&self, equipment: &Equipment) -> bool {
        self.stations
            .get(&equipment.key_title)
            .is_some_and(|rigged| rigged.id == equipment.id)
    }

    fn clear(&mut self, equipment: &Equipment) {
        self.stations.remove(&equipment.key_title);
    }

    fn rig(&mut self, equipment: &Equipment) {
        self.stations
            .insert(equipment.key_title.clone(), equipment.clone());
    }
}

/// Total duration of a workout in seconds
///
/// The per-exercise `duration` fields must already be computed.
pub fn compute_workout_duration(exercises: &[WorkoutExercise]) -> f64 {
    plan_transitions(exercises).total_duration
}

/// Compute every transition step of a workout along with its total duration
///
/// Exercises are visited in ascending `ordinal_number`; the input slice is
/// not reordered.
pub fn plan_transitions(exercises: &[WorkoutExercise]) -> TransitionReport {
    let mut ordered: Vec<&WorkoutExercise> = exercises.iter().collect();
    ordered.sort_by_key(|e| e.ordinal_number);

    let base_duration: f64 = ordered.iter().map(|e| e.duration).sum();
    let mut total = base_duration;
    let mut rigged = RiggedStations::default();
    let mut steps = Vec::with_capacity(ordered.len());

    for (i, current) in ordered.iter().copied().enumerate() {
        let previous = i.checked_sub(1).map(|p| ordered[p]);

        let before = previous.map(unique_equipments).unwrap_or_default();
        let after = unique_equipments(current);
        let before_groups = group_by_key_title(before);
        let after_groups = group_by_key_title(after);

        let removal = vanished(&before_groups, &after_groups, |e| e.removal_duration);
        let setup = vanished(&after_groups, &before_groups, |e| e.setup_duration);
        let adjustment = match previous {
            Some(prev) => adjustments(
                &before_groups,
                &after_groups,
                prev.circuit != current.circuit,
                &rigged,
            ),
            None => Vec::new(),
        };

        for equipment in &removal {
            rigged.clear(equipment);
        }
        for equipment in &setup {
            rigged.rig(equipment);
        }
        for equipment in &adjustment {
            rigged.rig(equipment);
        }

        let step = TransitionStep {
            ordinal_number: current.ordinal_number,
            circuit: current.circuit.clone(),
            setup: setup.into_iter().cloned().collect(),
            removal: removal.into_iter().cloned().collect(),
            adjustment: adjustment.into_iter().cloned().collect(),
        };

        if !step.is_empty() {
            tracing::debug!(
                "Exercise #{}: setup {:?}, removal {:?}, adjustment {:?} (+{}s)",
                step.ordinal_number,
                ids(&step.setup),
                ids(&step.removal),
                ids(&step.adjustment),
                step.cost()
            );
        }

        total += step.cost();
        steps.push(step);
    }

    TransitionReport {
        base_duration,
        steps,
        total_duration: round_to_hundredths(total),
    }
}

/// Representatives of stations in `from` that are absent from `other`,
/// skipping those whose cost is zero
fn vanished<'a>(
    from: &StationGroups<'a>,
    other: &StationGroups<'a>,
    cost: impl Fn(&Equipment) -> f64,
) -> Vec<&'a Equipment> {
    from.iter()
        .filter(|(key, _)| !other.contains_key(*key))
        .filter_map(|(_, group)| representative(group))
        .filter(|e| cost(*e) != 0.0)
        .collect()
}

/// Stations used on both sides that need adjusting before the next exercise
fn adjustments<'a>(
    before: &StationGroups<'a>,
    after: &StationGroups<'a>,
    circuit_changed: bool,
    rigged: &RiggedStations,
) -> Vec<&'a Equipment> {
    let mut candidates = Vec::new();

    for (key, after_group) in after {
        let Some(before_group) = before.get(key) else {
            continue;
        };
        let (Some(before_rep), Some(after_rep)) =
            (representative(before_group), representative(after_group))
        else {
            continue;
        };

        if circuit_changed {
            candidates.push(after_rep);
        } else if let Some(item) =
            same_circuit_adjustment(before_group, after_group, before_rep, after_rep)
        {
            candidates.push(item);
        }
    }

    representatives(&group_by_key_title(candidates))
        .into_iter()
        .filter(|e| e.adjustment_duration != 0.0)
        .filter(|e| !rigged.is_rigged(e))
        .collect()
}

/// Adjustment between consecutive exercises of the same circuit at one station
fn same_circuit_adjustment<'a>(
    before_group: &[&'a Equipment],
    after_group: &[&'a Equipment],
    before_rep: &'a Equipment,
    after_rep: &'a Equipment,
) -> Option<&'a Equipment> {
    // Variants were only added: the rigged configuration is still usable
    let extended = before_group.len() < after_group.len()
        && after_group.iter().any(|e| e.id == before_rep.id);
    if extended || before_rep.id == after_rep.id {
        return None;
    }

    if let [only_after] = after_group {
        let unchanged = matches!(before_group, [only_before] if only_before.id == only_after.id);
        return (!unchanged).then_some(*only_after);
    }

    (before_rep.id != after_rep.id).then_some(after_rep)
}

fn ids(equipment: &[Equipment]) -> Vec<&str> {
    equipment.iter().map(|e| e.id.as_str()).collect()
}
