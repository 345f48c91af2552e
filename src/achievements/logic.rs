//! Reward evaluation.

use std::collections::HashSet;

use super::types::{ActivityCounts, RewardDefinition};

/// Returns the definitions newly satisfied by `counts`.
///
/// A definition is newly earned when its id is not in `already_earned` and
/// the count for its category has reached `required_count`. Already-earned
/// ids are never returned, and a duplicated id in `definitions` is returned
/// at most once. Results follow definition order.
pub fn evaluate<'a>(
    counts: &ActivityCounts,
    definitions: &'a [RewardDefinition],
    already_earned: &HashSet<String>,
) -> Vec<&'a RewardDefinition> {
    let mut seen: HashSet<&str> = HashSet::new();
    definitions
        .iter()
        .filter(|def| !already_earned.contains(&def.id))
        .filter(|def| counts.get(def.category) >= u64::from(def.required_count))
        .filter(|def| seen.insert(def.id.as_str()))
        .collect()
}

/// Next unearned definition per category, with the activities still needed.
pub fn next_milestones<'a>(
    counts: &ActivityCounts,
    definitions: &'a [RewardDefinition],
    already_earned: &HashSet<String>,
) -> Vec<(&'a RewardDefinition, u64)> {
    let mut nearest: Vec<(&'a RewardDefinition, u64)> = Vec::new();
    for def in definitions {
        if already_earned.contains(&def.id) {
            continue;
        }
        let have = counts.get(def.category);
        let need = u64::from(def.required_count);
        if have >= need {
            continue;
        }
        let remaining = need - have;
        match nearest.iter_mut().find(|(d, _)| d.category == def.category) {
            Some(entry) if remaining < entry.1 => *entry = (def, remaining),
            Some(_) => {}
            None => nearest.push((def, remaining)),
        }
    }
    nearest
}
