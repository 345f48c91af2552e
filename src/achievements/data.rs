//! Built-in reward catalog.

use super::types::{RewardDefinition, RewardTier};
use crate::character::AttributeType;

struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: AttributeType,
    required_count: u32,
    tier: RewardTier,
}

const CATALOG: &[CatalogEntry] = &[
    // ═══════════════════════════════════════════════════════════════
    // STRENGTH
    // ═══════════════════════════════════════════════════════════════
    CatalogEntry {
        id: "strength-bronze",
        name: "Iron Initiate",
        description: "Complete 5 strength activities",
        category: AttributeType::Strength,
        required_count: 5,
        tier: RewardTier::Bronze,
    },
    CatalogEntry {
        id: "strength-silver",
        name: "Steel Sworn",
        description: "Complete 25 strength activities",
        category: AttributeType::Strength,
        required_count: 25,
        tier: RewardTier::Silver,
    },
    CatalogEntry {
        id: "strength-gold",
        name: "Titan",
        description: "Complete 100 strength activities",
        category: AttributeType::Strength,
        required_count: 100,
        tier: RewardTier::Gold,
    },
    // ═══════════════════════════════════════════════════════════════
    // SPEED
    // ═══════════════════════════════════════════════════════════════
    CatalogEntry {
        id: "speed-bronze",
        name: "Fleet Foot",
        description: "Complete 5 speed activities",
        category: AttributeType::Speed,
        required_count: 5,
        tier: RewardTier::Bronze,
    },
    CatalogEntry {
        id: "speed-silver",
        name: "Windrunner",
        description: "Complete 25 speed activities",
        category: AttributeType::Speed,
        required_count: 25,
        tier: RewardTier::Silver,
    },
    CatalogEntry {
        id: "speed-gold",
        name: "Stormstrider",
        description: "Complete 100 speed activities",
        category: AttributeType::Speed,
        required_count: 100,
        tier: RewardTier::Gold,
    },
    // ═══════════════════════════════════════════════════════════════
    // MAGIC
    // ═══════════════════════════════════════════════════════════════
    CatalogEntry {
        id: "magic-bronze",
        name: "Apprentice of Flow",
        description: "Complete 5 magic activities",
        category: AttributeType::Magic,
        required_count: 5,
        tier: RewardTier::Bronze,
    },
    CatalogEntry {
        id: "magic-silver",
        name: "Adept of Balance",
        description: "Complete 25 magic activities",
        category: AttributeType::Magic,
        required_count: 25,
        tier: RewardTier::Silver,
    },
    CatalogEntry {
        id: "magic-gold",
        name: "Archmage",
        description: "Complete 100 magic activities",
        category: AttributeType::Magic,
        required_count: 100,
        tier: RewardTier::Gold,
    },
    // ═══════════════════════════════════════════════════════════════
    // WILLPOWER
    // ═══════════════════════════════════════════════════════════════
    CatalogEntry {
        id: "willpower-bronze",
        name: "Steadfast",
        description: "Complete 5 willpower activities",
        category: AttributeType::Willpower,
        required_count: 5,
        tier: RewardTier::Bronze,
    },
    CatalogEntry {
        id: "willpower-silver",
        name: "Unyielding",
        description: "Complete 25 willpower activities",
        category: AttributeType::Willpower,
        required_count: 25,
        tier: RewardTier::Silver,
    },
    CatalogEntry {
        id: "willpower-gold",
        name: "Indomitable",
        description: "Complete 100 willpower activities",
        category: AttributeType::Willpower,
        required_count: 100,
        tier: RewardTier::Gold,
    },
];

/// The default reward definitions.
pub fn default_rewards() -> Vec<RewardDefinition> {
    CATALOG
        .iter()
        .map(|e| RewardDefinition {
            id: e.id.to_string(),
            name: e.name.to_string(),
            description: e.description.to_string(),
            category: e.category,
            required_count: e.required_count,
            tier: e.tier,
        })
        .collect()
}

/// Looks up a definition by id.
pub fn find_reward<'a>(definitions: &'a [RewardDefinition], id: &str) -> Option<&'a RewardDefinition> {
    definitions.iter().find(|d| d.id == id)
}
