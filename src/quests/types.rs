//! Quest data structures.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::character::AttributeType;
use crate::core::constants::{EASY_REWARD_RANGE, HARD_REWARD_RANGE, MEDIUM_REWARD_RANGE};
use crate::error::ValidationError;

/// Reward bracket of a quest. Ordered easy < medium < hard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    Easy,
    Medium,
    Hard,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Easy,
        DifficultyTier::Medium,
        DifficultyTier::Hard,
    ];

    /// Inclusive XP reward range for this tier. Ranges never overlap.
    pub fn reward_range(&self) -> (u32, u32) {
        match self {
            DifficultyTier::Easy => EASY_REWARD_RANGE,
            DifficultyTier::Medium => MEDIUM_REWARD_RANGE,
            DifficultyTier::Hard => HARD_REWARD_RANGE,
        }
    }

    pub fn contains(&self, reward: u32) -> bool {
        let (min, max) = self.reward_range();
        (min..=max).contains(&reward)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "easy",
            DifficultyTier::Medium => "medium",
            DifficultyTier::Hard => "hard",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DifficultyTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(DifficultyTier::Easy),
            "medium" => Ok(DifficultyTier::Medium),
            "hard" => Ok(DifficultyTier::Hard),
            _ => Err(ValidationError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Lifecycle position of a quest for its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestStatus {
    Offered,
    Accepted,
    Completed,
}

/// A quest offered to one character.
///
/// `accepted` and `completed` are stored independently; a quest completed
/// without ever being accepted is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: AttributeType,
    pub difficulty_tier: DifficultyTier,
    pub reward_amount: u32,
    #[serde(default)]
    pub accepted: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl Quest {
    pub fn status(&self) -> QuestStatus {
        if self.completed {
            QuestStatus::Completed
        } else if self.accepted {
            QuestStatus::Accepted
        } else {
            QuestStatus::Offered
        }
    }

    pub fn is_open(&self) -> bool {
        !self.completed
    }
}
