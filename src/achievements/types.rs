//! Reward (badge) types and per-character earned state.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::character::AttributeType;
use crate::error::ValidationError;

/// Badge tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardTier {
    Bronze,
    Silver,
    Gold,
}

impl RewardTier {
    pub const ALL: [RewardTier; 3] = [RewardTier::Bronze, RewardTier::Silver, RewardTier::Gold];

    pub fn name(&self) -> &'static str {
        match self {
            RewardTier::Bronze => "Bronze",
            RewardTier::Silver => "Silver",
            RewardTier::Gold => "Gold",
        }
    }
}

impl fmt::Display for RewardTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A reward that unlocks once enough activities of one category are done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: AttributeType,
    pub required_count: u32,
    pub tier: RewardTier,
}

impl RewardDefinition {
    pub fn new(
        id: impl Into<String>,
        category: AttributeType,
        required_count: u32,
        tier: RewardTier,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            category,
            required_count,
            tier,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.required_count == 0 {
            return Err(ValidationError::ZeroRequiredCount(self.id.clone()));
        }
        Ok(())
    }

    /// Display name, falling back to the id when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Completed activities per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityCounts(HashMap<AttributeType, u64>);

impl ActivityCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: AttributeType) -> u64 {
        self.0.get(&category).copied().unwrap_or(0)
    }

    pub fn record(&mut self, category: AttributeType) {
        let count = self.0.entry(category).or_insert(0);
        *count = count.saturating_add(1);
    }

    pub fn set(&mut self, category: AttributeType, count: u64) {
        self.0.insert(category, count);
    }

    pub fn total(&self) -> u64 {
        self.0.values().fold(0u64, |acc, v| acc.saturating_add(*v))
    }
}

impl FromIterator<(AttributeType, u64)> for ActivityCounts {
    fn from_iter<I: IntoIterator<Item = (AttributeType, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Record of an earned reward. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedReward {
    pub earned_at: i64,
    pub tier: RewardTier,
}

/// Per-character reward state (saved by the store).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievements {
    /// Earned rewards keyed by definition id.
    #[serde(default)]
    pub earned: BTreeMap<String, EarnedReward>,
    /// Completed activities per category.
    #[serde(default)]
    pub counts: ActivityCounts,
}

impl Achievements {
    pub fn is_earned(&self, id: &str) -> bool {
        self.earned.contains_key(id)
    }

    pub fn earned_ids(&self) -> HashSet<String> {
        self.earned.keys().cloned().collect()
    }

    /// Records a reward as earned. Returns true if newly earned; an existing
    /// record is never overwritten.
    pub fn grant(&mut self, definition: &RewardDefinition, earned_at: i64) -> bool {
        if self.is_earned(&definition.id) {
            return false;
        }
        self.earned.insert(
            definition.id.clone(),
            EarnedReward {
                earned_at,
                tier: definition.tier,
            },
        );
        true
    }

    pub fn earned_count(&self) -> usize {
        self.earned.len()
    }

    /// Earned rewards of one tier.
    pub fn count_by_tier(&self, tier: RewardTier) -> usize {
        self.earned.values().filter(|r| r.tier == tier).count()
    }
}
