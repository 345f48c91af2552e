//! Experience and leveling.
//!
//! Characters and guilds share one leveling curve: a flat `XP_PER_LEVEL`
//! per level, so `level == experience / XP_PER_LEVEL + 1` always holds.
//! Everything here is pure; callers own persistence.

use serde::{Deserialize, Serialize};

use super::constants::{CLASS_BONUS_PERCENT, XP_PER_LEVEL};
use crate::character::{AttributeType, Character};
use crate::error::ValidationError;

/// When an applied reward grows the matching attribute counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatGrowth {
    /// +1 to the event's attribute on every applied reward.
    #[default]
    EveryActivity,
    /// +1 to the event's attribute only when the reward causes a level-up.
    LevelUpOnly,
}

/// Anything that carries an experience pool and a derived level.
///
/// Implemented by `Character` and `Guild`.
pub trait Leveled {
    fn experience(&self) -> u64;
    fn level(&self) -> u32;
    fn set_progress(&mut self, experience: u64, level: u32);

    /// Adds `amount` XP and re-derives the level. Returns the resulting gain.
    fn gain_experience(&mut self, amount: u64) -> XpGain {
        let gain = compute_gain(self.experience(), self.level(), amount);
        self.set_progress(gain.experience, gain.level);
        gain
    }
}

impl Leveled for Character {
    fn experience(&self) -> u64 {
        self.experience
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn set_progress(&mut self, experience: u64, level: u32) {
        self.experience = experience;
        self.level = level;
    }
}

/// Result of adding XP to a leveled entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpGain {
    pub gained: u64,
    pub experience: u64,
    pub level_before: u32,
    pub level: u32,
}

impl XpGain {
    pub fn leveled_up(&self) -> bool {
        self.level > self.level_before
    }

    pub fn levels_gained(&self) -> u32 {
        self.level.saturating_sub(self.level_before)
    }
}

/// One completed activity, consumed once to produce a character delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionEvent {
    pub category: AttributeType,
    pub base_reward: u32,
    /// Whether the class-specialty multiplier applies.
    pub bonus: bool,
}

impl ProgressionEvent {
    pub fn new(category: AttributeType, base_reward: u32) -> Result<Self, ValidationError> {
        if base_reward == 0 {
            return Err(ValidationError::NonPositiveReward);
        }
        Ok(Self {
            category,
            base_reward,
            bonus: false,
        })
    }

    /// Builds an event whose bonus flag follows the character's specialty.
    pub fn for_character(
        character: &Character,
        category: AttributeType,
        base_reward: u32,
    ) -> Result<Self, ValidationError> {
        let event = Self::new(category, base_reward)?;
        Ok(event.with_bonus(character.class_specialty == Some(category)))
    }

    pub fn with_bonus(mut self, bonus: bool) -> Self {
        self.bonus = bonus;
        self
    }

    /// Whether the class bonus applies for `character`: the flag is set or
    /// the category is the character's specialty.
    pub fn bonus_applies(&self, character: &Character) -> bool {
        self.bonus || character.class_specialty == Some(self.category)
    }

    /// XP granted to `character`.
    pub fn reward_for(&self, character: &Character) -> u64 {
        self.with_bonus(self.bonus_applies(character)).actual_reward()
    }

    /// XP granted by the flag alone: `floor(base_reward * 1.2)` with the
    /// bonus, `base_reward` otherwise.
    pub fn actual_reward(&self) -> u64 {
        if self.bonus {
            u64::from(self.base_reward) * CLASS_BONUS_PERCENT / 100
        } else {
            u64::from(self.base_reward)
        }
    }
}

/// Full outcome of applying an event to a character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardOutcome {
    pub character: Character,
    pub xp_gained: u64,
    pub leveled_up: bool,
    pub levels_gained: u32,
    pub stat_increased: Option<AttributeType>,
}

/// Level for a given experience total.
pub fn level_for_experience(experience: u64) -> u32 {
    let completed = experience / XP_PER_LEVEL;
    u32::try_from(completed)
        .unwrap_or(u32::MAX)
        .saturating_add(1)
}

/// XP remaining until the next level threshold.
pub fn xp_to_next_level(experience: u64) -> u64 {
    XP_PER_LEVEL - experience % XP_PER_LEVEL
}

/// Progress through the current level in `0.0..1.0`.
pub fn level_progress(experience: u64) -> f64 {
    (experience % XP_PER_LEVEL) as f64 / XP_PER_LEVEL as f64
}

fn compute_gain(experience: u64, level: u32, amount: u64) -> XpGain {
    let new_experience = experience.saturating_add(amount);
    XpGain {
        gained: new_experience - experience,
        experience: new_experience,
        level_before: level,
        level: level_for_experience(new_experience),
    }
}

/// Applies an event using the default stat growth policy.
///
/// Returns the updated character and whether it leveled up. The input is
/// never modified.
pub fn apply_reward(character: &Character, event: &ProgressionEvent) -> (Character, bool) {
    let outcome = apply_reward_with(character, event, StatGrowth::default());
    (outcome.character, outcome.leveled_up)
}

/// Applies an event with an explicit stat growth policy.
pub fn apply_reward_with(
    character: &Character,
    event: &ProgressionEvent,
    growth: StatGrowth,
) -> RewardOutcome {
    let mut updated = character.clone();
    let gain = updated.gain_experience(event.reward_for(character));

    let grows = match growth {
        StatGrowth::EveryActivity => true,
        StatGrowth::LevelUpOnly => gain.leveled_up(),
    };
    let stat_increased = if grows {
        updated.attributes.increment(event.category);
        Some(event.category)
    } else {
        None
    };

    RewardOutcome {
        character: updated,
        xp_gained: gain.gained,
        leveled_up: gain.leveled_up(),
        levels_gained: gain.levels_gained(),
        stat_increased,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character_with_xp(experience: u64) -> Character {
        let mut character = Character::new("Tester", None).unwrap();
        character.experience = experience;
        character.level = level_for_experience(experience);
        character
    }

    #[test]
    fn test_level_for_experience_thresholds() {
        assert_eq!(level_for_experience(0), 1);
        assert_eq!(level_for_experience(999), 1);
        assert_eq!(level_for_experience(1000), 2);
        assert_eq!(level_for_experience(1999), 2);
        assert_eq!(level_for_experience(25_000), 26);
    }

    #[test]
    fn test_level_for_experience_saturates() {
        assert_eq!(level_for_experience(u64::MAX), u32::MAX);
    }

    #[test]
    fn test_xp_to_next_level() {
        assert_eq!(xp_to_next_level(0), 1000);
        assert_eq!(xp_to_next_level(950), 50);
        assert_eq!(xp_to_next_level(1000), 1000);
    }

    #[test]
    fn test_level_progress() {
        assert_eq!(level_progress(0), 0.0);
        assert_eq!(level_progress(1500), 0.5);
    }

    #[test]
    fn test_event_rejects_zero_reward() {
        assert_eq!(
            ProgressionEvent::new(AttributeType::Speed, 0),
            Err(ValidationError::NonPositiveReward)
        );
    }

    #[test]
    fn test_actual_reward_floors_bonus() {
        let event = ProgressionEvent::new(AttributeType::Magic, 101).unwrap();
        assert_eq!(event.actual_reward(), 101);
        // 101 * 1.2 = 121.2
        assert_eq!(event.with_bonus(true).actual_reward(), 121);
        let event = ProgressionEvent::new(AttributeType::Magic, 5).unwrap();
        assert_eq!(event.with_bonus(true).actual_reward(), 6);
    }

    #[test]
    fn test_for_character_follows_specialty() {
        let mut character = character_with_xp(0);
        character.class_specialty = Some(AttributeType::Speed);

        let matching = ProgressionEvent::for_character(&character, AttributeType::Speed, 100).unwrap();
        assert!(matching.bonus);

        let other = ProgressionEvent::for_character(&character, AttributeType::Magic, 100).unwrap();
        assert!(!other.bonus);
    }

    #[test]
    fn test_apply_reward_crosses_level() {
        let character = character_with_xp(950);
        let event = ProgressionEvent::new(AttributeType::Strength, 100).unwrap();

        let (updated, leveled_up) = apply_reward(&character, &event);

        assert_eq!(updated.experience, 1050);
        assert_eq!(updated.level, 2);
        assert!(leveled_up);
        // input untouched
        assert_eq!(character.experience, 950);
        assert_eq!(character.level, 1);
    }

    #[test]
    fn test_apply_reward_with_bonus() {
        let character = character_with_xp(950);
        let event = ProgressionEvent::new(AttributeType::Strength, 100)
            .unwrap()
            .with_bonus(true);

        let (updated, leveled_up) = apply_reward(&character, &event);

        assert_eq!(updated.experience, 1070);
        assert_eq!(updated.level, 2);
        assert!(leveled_up);
    }

    #[test]
    fn test_specialty_bonus_without_flag() {
        let mut character = character_with_xp(0);
        character.class_specialty = Some(AttributeType::Strength);
        let event = ProgressionEvent::new(AttributeType::Strength, 100).unwrap();
        assert!(!event.bonus);

        let (updated, _) = apply_reward(&character, &event);
        assert_eq!(updated.experience, 120);

        let off_class = ProgressionEvent::new(AttributeType::Speed, 100).unwrap();
        let (updated, _) = apply_reward(&character, &off_class);
        assert_eq!(updated.experience, 100);
    }

    #[test]
    fn test_specialty_and_flag_apply_once() {
        let mut character = character_with_xp(0);
        character.class_specialty = Some(AttributeType::Magic);
        let event = ProgressionEvent::for_character(&character, AttributeType::Magic, 100).unwrap();
        assert_eq!(event.reward_for(&character), 120);
        assert_eq!(apply_reward(&character, &event).0.experience, 120);
    }

    #[test]
    fn test_apply_reward_no_level_up() {
        let character = character_with_xp(100);
        let event = ProgressionEvent::new(AttributeType::Speed, 50).unwrap();
        let (updated, leveled_up) = apply_reward(&character, &event);
        assert_eq!(updated.experience, 150);
        assert_eq!(updated.level, 1);
        assert!(!leveled_up);
    }

    #[test]
    fn test_multi_level_jump() {
        let character = character_with_xp(990);
        let event = ProgressionEvent::new(AttributeType::Willpower, 2500).unwrap();
        let outcome = apply_reward_with(&character, &event, StatGrowth::EveryActivity);
        assert_eq!(outcome.character.level, 4);
        assert_eq!(outcome.levels_gained, 3);
        assert!(outcome.character.is_consistent());
    }

    #[test]
    fn test_every_activity_growth() {
        let character = character_with_xp(0);
        let event = ProgressionEvent::new(AttributeType::Magic, 10).unwrap();
        let outcome = apply_reward_with(&character, &event, StatGrowth::EveryActivity);
        assert!(!outcome.leveled_up);
        assert_eq!(outcome.stat_increased, Some(AttributeType::Magic));
        assert_eq!(outcome.character.attributes.get(AttributeType::Magic), 1);
    }

    #[test]
    fn test_level_up_only_growth() {
        let character = character_with_xp(0);
        let event = ProgressionEvent::new(AttributeType::Magic, 10).unwrap();
        let outcome = apply_reward_with(&character, &event, StatGrowth::LevelUpOnly);
        assert_eq!(outcome.stat_increased, None);
        assert_eq!(outcome.character.attributes.total(), 0);

        let character = character_with_xp(995);
        let outcome = apply_reward_with(&character, &event, StatGrowth::LevelUpOnly);
        assert!(outcome.leveled_up);
        assert_eq!(outcome.stat_increased, Some(AttributeType::Magic));
        assert_eq!(outcome.character.attributes.get(AttributeType::Magic), 1);
        assert_eq!(outcome.character.attributes.total(), 1);
    }

    #[test]
    fn test_apply_reward_is_deterministic() {
        let character = character_with_xp(4321);
        let event = ProgressionEvent::new(AttributeType::Speed, 777)
            .unwrap()
            .with_bonus(true);
        assert_eq!(apply_reward(&character, &event), apply_reward(&character, &event));
    }

    #[test]
    fn test_experience_saturates() {
        let character = character_with_xp(u64::MAX - 10);
        let event = ProgressionEvent::new(AttributeType::Speed, 100).unwrap();
        let outcome = apply_reward_with(&character, &event, StatGrowth::EveryActivity);
        assert_eq!(outcome.character.experience, u64::MAX);
        assert_eq!(outcome.xp_gained, 10);
    }

    #[test]
    fn test_stat_growth_serde() {
        let json = serde_json::to_string(&StatGrowth::LevelUpOnly).unwrap();
        assert_eq!(json, "\"level_up_only\"");
        let parsed: StatGrowth = serde_json::from_str("\"every_activity\"").unwrap();
        assert_eq!(parsed, StatGrowth::EveryActivity);
    }
}
