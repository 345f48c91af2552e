//! Flavor text for quests and guild events.
//!
//! Generation goes through a strict parse-or-fallback boundary: any failure
//! or malformed output degrades to the deterministic templates.

pub mod generator;
pub mod schema;
pub mod templates;

pub use generator::{ContentGenerator, ContentRequest, HttpGenerator, OfflineGenerator, StaticGenerator};
pub use schema::{parse_flavors, Flavor};

use tracing::{debug, warn};

use crate::character::AttributeType;
use crate::quests::DifficultyTier;

/// Returns exactly `count` quest flavors, topping up with templates when the
/// generator fails or returns fewer usable entries.
pub fn quest_flavors(
    generator: &dyn ContentGenerator,
    category: AttributeType,
    tier: DifficultyTier,
    count: usize,
) -> Vec<Flavor> {
    if count == 0 {
        return Vec::new();
    }

    let request = ContentRequest::Quests {
        category,
        tier,
        count,
    };
    let mut flavors = match generator.generate(&request).and_then(|raw| parse_flavors(&raw)) {
        Ok(flavors) => {
            debug!(%category, %tier, received = flavors.len(), "generated quest text");
            flavors
        }
        Err(e) => {
            warn!(%category, %tier, error = %e, "quest text generation failed, using template");
            Vec::new()
        }
    };

    flavors.truncate(count);
    while flavors.len() < count {
        flavors.push(templates::quest_flavor(category, tier));
    }
    flavors
}

/// Returns one guild event flavor, falling back to the template.
pub fn event_flavor(
    generator: &dyn ContentGenerator,
    guild_name: &str,
    category: AttributeType,
) -> Flavor {
    let request = ContentRequest::GuildEvent {
        guild_name: guild_name.to_string(),
        category,
    };
    match generator.generate(&request).and_then(|raw| parse_flavors(&raw)) {
        Ok(mut flavors) => flavors.swap_remove(0),
        Err(e) => {
            warn!(guild = guild_name, error = %e, "event text generation failed, using template");
            templates::event_flavor(guild_name, category)
        }
    }
}
