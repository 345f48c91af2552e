//! Quest acceptance and completion.
//!
//! Offered -> Accepted -> Completed, with Offered -> Completed tolerated.
//! Completion is guarded so a quest can never grant its reward twice.

use super::types::{Quest, QuestStatus};
use crate::character::Character;
use crate::core::progression::{apply_reward_with, ProgressionEvent, RewardOutcome, StatGrowth};
use crate::error::QuestError;

/// Result of completing a quest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestCompletion {
    pub quest: Quest,
    pub reward: RewardOutcome,
}

/// Marks an offered quest as accepted. Grants nothing.
pub fn accept(quest: &Quest) -> Result<Quest, QuestError> {
    match quest.status() {
        QuestStatus::Offered => {
            let mut accepted = quest.clone();
            accepted.accepted = true;
            Ok(accepted)
        }
        QuestStatus::Accepted => Err(QuestError::AlreadyAccepted(quest.id.clone())),
        QuestStatus::Completed => Err(QuestError::AlreadyCompleted(quest.id.clone())),
    }
}

/// Completes a quest and grants its reward to `character`.
///
/// Works from both Offered and Accepted. A completed quest is rejected with
/// `QuestError::AlreadyCompleted` and the character is left untouched.
pub fn complete(
    quest: &Quest,
    character: &Character,
    growth: StatGrowth,
) -> Result<QuestCompletion, QuestError> {
    if quest.status() == QuestStatus::Completed {
        return Err(QuestError::AlreadyCompleted(quest.id.clone()));
    }

    let event = ProgressionEvent::for_character(character, quest.category, quest.reward_amount)
        .map_err(|_| QuestError::InvalidReward)?;
    let reward = apply_reward_with(character, &event, growth);

    let mut completed = quest.clone();
    completed.completed = true;

    Ok(QuestCompletion {
        quest: completed,
        reward,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::AttributeType;
    use crate::quests::types::DifficultyTier;

    fn offered_quest() -> Quest {
        Quest {
            id: "q1".to_string(),
            title: "Hill Sprints".to_string(),
            description: "Sprint up the hill".to_string(),
            category: AttributeType::Speed,
            difficulty_tier: DifficultyTier::Medium,
            reward_amount: 200,
            accepted: false,
            completed: false,
            created_at: 0,
            completed_at: None,
        }
    }

    #[test]
    fn test_accept_offered() {
        let quest = accept(&offered_quest()).unwrap();
        assert!(quest.accepted);
        assert!(!quest.completed);
    }

    #[test]
    fn test_accept_twice_rejected() {
        let quest = accept(&offered_quest()).unwrap();
        assert_eq!(accept(&quest), Err(QuestError::AlreadyAccepted("q1".into())));
    }

    #[test]
    fn test_accept_completed_rejected() {
        let mut quest = offered_quest();
        quest.completed = true;
        assert_eq!(accept(&quest), Err(QuestError::AlreadyCompleted("q1".into())));
    }

    #[test]
    fn test_complete_grants_reward() {
        let character = Character::new("Runner", None).unwrap();
        let quest = accept(&offered_quest()).unwrap();

        let done = complete(&quest, &character, StatGrowth::EveryActivity).unwrap();

        assert!(done.quest.completed);
        assert_eq!(done.reward.character.experience, 200);
        assert_eq!(done.reward.xp_gained, 200);
        assert_eq!(done.reward.stat_increased, Some(AttributeType::Speed));
    }

    #[test]
    fn test_complete_without_accept_is_tolerated() {
        let character = Character::new("Runner", None).unwrap();
        let done = complete(&offered_quest(), &character, StatGrowth::EveryActivity).unwrap();
        assert!(done.quest.completed);
        assert!(!done.quest.accepted);
        assert_eq!(done.reward.character.experience, 200);
    }

    #[test]
    fn test_complete_applies_specialty_bonus() {
        let character = Character::new("Runner", Some(AttributeType::Speed)).unwrap();
        let done = complete(&offered_quest(), &character, StatGrowth::EveryActivity).unwrap();
        assert_eq!(done.reward.character.experience, 240);
    }

    #[test]
    fn test_complete_twice_never_double_grants() {
        let character = Character::new("Runner", None).unwrap();
        let first = complete(&offered_quest(), &character, StatGrowth::EveryActivity).unwrap();

        let second = complete(&first.quest, &first.reward.character, StatGrowth::EveryActivity);

        assert_eq!(second, Err(QuestError::AlreadyCompleted("q1".into())));
        assert_eq!(first.reward.character.experience, 200);
    }

    #[test]
    fn test_zero_reward_quest_rejected() {
        let character = Character::new("Runner", None).unwrap();
        let mut quest = offered_quest();
        quest.reward_amount = 0;
        assert_eq!(
            complete(&quest, &character, StatGrowth::EveryActivity),
            Err(QuestError::InvalidReward)
        );
    }
}
