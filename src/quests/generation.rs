//! Quest generation: random category, tier and reward, with flavor text
//! supplied by the content layer.

use chrono::Utc;
use rand::Rng;

use super::types::{DifficultyTier, Quest};
use crate::character::AttributeType;
use crate::content::{self, ContentGenerator, Flavor};

pub fn roll_category(rng: &mut impl Rng) -> AttributeType {
    AttributeType::ALL[rng.gen_range(0..AttributeType::ALL.len())]
}

pub fn roll_tier(rng: &mut impl Rng) -> DifficultyTier {
    DifficultyTier::ALL[rng.gen_range(0..DifficultyTier::ALL.len())]
}

/// Rolls a reward uniformly inside the tier's range.
pub fn roll_reward(tier: DifficultyTier, rng: &mut impl Rng) -> u32 {
    let (min, max) = tier.reward_range();
    rng.gen_range(min..=max)
}

/// Builds one offered quest.
pub fn generate_quest(
    category: AttributeType,
    tier: DifficultyTier,
    flavor: Flavor,
    rng: &mut impl Rng,
) -> Quest {
    Quest {
        id: uuid::Uuid::new_v4().to_string(),
        title: flavor.title,
        description: flavor.description,
        category,
        difficulty_tier: tier,
        reward_amount: roll_reward(tier, rng),
        accepted: false,
        completed: false,
        created_at: Utc::now().timestamp(),
        completed_at: None,
    }
}

/// Generates `count` quests with random categories and tiers.
pub fn generate_offers(
    generator: &dyn ContentGenerator,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<Quest> {
    (0..count)
        .map(|_| {
            let category = roll_category(rng);
            let tier = roll_tier(rng);
            let flavor = content::quest_flavors(generator, category, tier, 1)
                .into_iter()
                .next()
                .unwrap_or_else(|| content::templates::quest_flavor(category, tier));
            generate_quest(category, tier, flavor, rng)
        })
        .collect()
}
