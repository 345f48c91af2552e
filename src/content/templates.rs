//! Deterministic fallback text used whenever generation fails.

use super::schema::Flavor;
use crate::character::AttributeType;
use crate::quests::DifficultyTier;

const STRENGTH_TITLES: [&str; 3] = ["Trial of Iron", "The Heavy Oath", "Stonebreaker's Task"];
const SPEED_TITLES: [&str; 3] = ["Windrunner's Errand", "The Swift Road", "Courier of Dawn"];
const MAGIC_TITLES: [&str; 3] = ["The Still Flame", "Weaver's Balance", "Rite of Flow"];
const WILLPOWER_TITLES: [&str; 3] = ["The Long Watch", "Unbroken Vigil", "March of Resolve"];

fn titles(category: AttributeType) -> &'static [&'static str; 3] {
    match category {
        AttributeType::Strength => &STRENGTH_TITLES,
        AttributeType::Speed => &SPEED_TITLES,
        AttributeType::Magic => &MAGIC_TITLES,
        AttributeType::Willpower => &WILLPOWER_TITLES,
    }
}

fn tier_title_index(tier: DifficultyTier) -> usize {
    match tier {
        DifficultyTier::Easy => 0,
        DifficultyTier::Medium => 1,
        DifficultyTier::Hard => 2,
    }
}

/// Fallback quest text. Same inputs always give the same text.
pub fn quest_flavor(category: AttributeType, tier: DifficultyTier) -> Flavor {
    let title = titles(category)[tier_title_index(tier)];
    Flavor::new(
        title,
        format!(
            "Complete a {} {} session to prove your {}.",
            tier.name(),
            category.activity(),
            category.name()
        ),
    )
}

/// Fallback guild event text.
pub fn event_flavor(guild_name: &str, category: AttributeType) -> Flavor {
    Flavor::new(
        format!("{} {} Rally", guild_name, capitalize(category.name())),
        format!(
            "Members of {} gather for a group {} session. Join in to help the guild grow.",
            guild_name,
            category.activity()
        ),
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
