//! Equipment grouping helpers.
//!
//! Equipment is grouped by `key_title` (the physical station). Within a group
//! the member with the lowest `priority` is the group's representative; ties
//! go to the member seen first.

use crate::{Equipment, WorkoutExercise};
use std::collections::BTreeMap;

/// Equipment grouped by station, iterated in key title order
pub type StationGroups<'a> = BTreeMap<&'a str, Vec<&'a Equipment>>;

/// Equipment required by a workout-exercise's primary and secondary movement
///
/// Primary equipment comes first; secondary entries whose id is already
/// present in the primary set are dropped.
pub fn unique_equipments(workout_exercise: &WorkoutExercise) -> Vec<&Equipment> {
    let primary: Vec<&Equipment> = workout_exercise
        .primary_exercise
        .iter()
        .flat_map(|e| e.equipments.iter())
        .collect();

    let secondary = workout_exercise
        .secondary_exercise
        .iter()
        .flat_map(|e| e.equipments.iter())
        .filter(|s| !primary.iter().any(|p| p.id == s.id));

    let mut unique = primary.clone();
    unique.extend(secondary);
    unique
}

/// Group equipment by key title, preserving input order inside each group
pub fn group_by_key_title<'a, I>(equipment: I) -> StationGroups<'a>
where
    I: IntoIterator<Item = &'a Equipment>,
{
    let mut groups: StationGroups<'a> = BTreeMap::new();
    for item in equipment {
        groups.entry(item.key_title.as_str()).or_default().push(item);
    }
    groups
}

/// Lowest-priority member of a group (first on ties)
pub fn representative<'a>(group: &[&'a Equipment]) -> Option<&'a Equipment> {
    group.iter().copied().min_by_key(|e| e.priority)
}

/// One representative per station
pub fn representatives<'a>(groups: &StationGroups<'a>) -> Vec<&'a Equipment> {
    groups.values().filter_map(|g| representative(g)).collect()
}
