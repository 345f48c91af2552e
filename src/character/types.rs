use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::attributes::{AttributeType, Attributes};
use super::input::{sanitize_name, validate_name};
use crate::core::constants::STARTING_LEVEL;
use crate::core::progression::level_for_experience;
use crate::error::ValidationError;

/// A player's character. One per account, created at onboarding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub experience: u64,
    #[serde(flatten)]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_specialty: Option<AttributeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Character {
    /// Creates a level 1 character with zeroed attributes.
    pub fn new(name: &str, class_specialty: Option<AttributeType>) -> Result<Self, ValidationError> {
        validate_name(name)?;
        let now = Utc::now().timestamp();
        Ok(Self {
            id: sanitize_name(name),
            name: name.trim().to_string(),
            level: STARTING_LEVEL,
            experience: 0,
            attributes: Attributes::new(),
            class_specialty,
            guild_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether `level` agrees with `experience`.
    pub fn is_consistent(&self) -> bool {
        self.level == level_for_experience(self.experience)
    }

    /// XP still needed before the next level.
    pub fn xp_to_next_level(&self) -> u64 {
        crate::core::progression::xp_to_next_level(self.experience)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_character_defaults() {
        let character = Character::new("Iron Lifter", Some(AttributeType::Strength)).unwrap();
        assert_eq!(character.id, "iron_lifter");
        assert_eq!(character.name, "Iron Lifter");
        assert_eq!(character.level, 1);
        assert_eq!(character.experience, 0);
        assert_eq!(character.attributes, Attributes::new());
        assert_eq!(character.class_specialty, Some(AttributeType::Strength));
        assert!(character.is_consistent());
        assert_eq!(character.xp_to_next_level(), 1000);
    }

    #[test]
    fn test_new_character_rejects_bad_name() {
        assert_eq!(Character::new("  ", None), Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_record_shape() {
        let mut character = Character::new("Hero", Some(AttributeType::Magic)).unwrap();
        character.attributes.set(AttributeType::Speed, 2);
        let value = serde_json::to_value(&character).unwrap();

        assert_eq!(value["level"], 1);
        assert_eq!(value["experience"], 0);
        assert_eq!(value["speed"], 2);
        assert_eq!(value["willpower"], 0);
        assert_eq!(value["classSpecialty"], "magic");
        assert!(value.get("guildId").is_none());
    }

    #[test]
    fn test_record_without_specialty_loads() {
        let json = r#"{
            "id": "hero", "name": "Hero", "level": 2, "experience": 1200,
            "strength": 1, "speed": 0, "magic": 0, "willpower": 4
        }"#;
        let character: Character = serde_json::from_str(json).unwrap();
        assert_eq!(character.class_specialty, None);
        assert_eq!(character.attributes.get(AttributeType::Willpower), 4);
        assert!(character.is_consistent());
    }
}
