//! Guild data structures.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::character::{sanitize_name, validate_name, AttributeType};
use crate::core::constants::STARTING_LEVEL;
use crate::core::progression::{level_for_experience, Leveled};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuildRole {
    Leader,
    Officer,
    Member,
}

impl GuildRole {
    /// Leaders and officers may schedule and close events.
    pub fn can_manage_events(&self) -> bool {
        matches!(self, GuildRole::Leader | GuildRole::Officer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildMember {
    pub character_id: String,
    pub role: GuildRole,
    #[serde(default)]
    pub contributed_xp: u64,
    #[serde(default)]
    pub joined_at: i64,
}

/// A group with its own XP pool, leveled on the same curve as characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guild {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub experience: u64,
    #[serde(default)]
    pub members: Vec<GuildMember>,
    #[serde(default)]
    pub created_at: i64,
}

impl Guild {
    /// Creates a level 1 guild led by `leader_id`.
    pub fn new(name: &str, leader_id: &str) -> Result<Self, ValidationError> {
        validate_name(name)?;
        let now = Utc::now().timestamp();
        Ok(Self {
            id: sanitize_name(name),
            name: name.trim().to_string(),
            level: STARTING_LEVEL,
            experience: 0,
            members: vec![GuildMember {
                character_id: leader_id.to_string(),
                role: GuildRole::Leader,
                contributed_xp: 0,
                joined_at: now,
            }],
            created_at: now,
        })
    }

    pub fn member(&self, character_id: &str) -> Option<&GuildMember> {
        self.members.iter().find(|m| m.character_id == character_id)
    }

    pub fn is_member(&self, character_id: &str) -> bool {
        self.member(character_id).is_some()
    }

    pub fn is_consistent(&self) -> bool {
        self.level == level_for_experience(self.experience)
    }
}

impl Leveled for Guild {
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

/// upcoming -> active (first participant) -> completed (explicit action).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Active,
    Completed,
}

/// A group workout scheduled by a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildEvent {
    pub id: String,
    pub guild_id: String,
    pub title: String,
    pub description: String,
    pub category: AttributeType,
    pub xp_reward: u32,
    pub status: EventStatus,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl GuildEvent {
    pub fn new(
        guild_id: &str,
        category: AttributeType,
        xp_reward: u32,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if xp_reward == 0 {
            return Err(ValidationError::NonPositiveReward);
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            guild_id: guild_id.to_string(),
            title: title.into(),
            description: description.into(),
            category,
            xp_reward,
            status: EventStatus::Upcoming,
            participants: Vec::new(),
            created_at: Utc::now().timestamp(),
            completed_at: None,
        })
    }

    pub fn has_participant(&self, character_id: &str) -> bool {
        self.participants.iter().any(|p| p == character_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_guild_has_leader() {
        let guild = Guild::new("Night Owls", "hero").unwrap();
        assert_eq!(guild.id, "night_owls");
        assert_eq!(guild.level, 1);
        assert_eq!(guild.experience, 0);
        assert_eq!(guild.member("hero").map(|m| m.role), Some(GuildRole::Leader));
        assert!(guild.is_consistent());
    }

    #[test]
    fn test_guild_name_validated() {
        assert!(Guild::new("", "hero").is_err());
        assert!(Guild::new("<script>", "hero").is_err());
    }

    #[test]
    fn test_roles() {
        assert!(GuildRole::Leader.can_manage_events());
        assert!(GuildRole::Officer.can_manage_events());
        assert!(!GuildRole::Member.can_manage_events());
    }

    #[test]
    fn test_new_event_is_upcoming() {
        let event = GuildEvent::new("night_owls", AttributeType::Speed, 300, "Relay", "Run").unwrap();
        assert_eq!(event.status, EventStatus::Upcoming);
        assert!(event.participants.is_empty());
    }

    #[test]
    fn test_zero_reward_event_rejected() {
        assert_eq!(
            GuildEvent::new("g", AttributeType::Speed, 0, "t", "d"),
            Err(ValidationError::NonPositiveReward)
        );
    }

    #[test]
    fn test_event_status_json() {
        assert_eq!(serde_json::to_string(&EventStatus::Active).unwrap(), "\"active\"");
    }
}
