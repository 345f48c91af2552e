//! Guild progression and the event lifecycle.
//!
//! Guild XP uses the character leveling curve with no attribute side
//! effects and no class bonus.

use super::types::{EventStatus, Guild, GuildEvent, GuildMember, GuildRole};
use crate::core::progression::{Leveled, XpGain};
use crate::error::{GuildEventError, ValidationError};

/// Result of closing a guild event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCompletion {
    pub event: GuildEvent,
    pub guild: Guild,
    pub gain: XpGain,
}

/// Adds `amount` XP to the guild pool.
pub fn apply_guild_reward(guild: &Guild, amount: u32) -> Result<(Guild, XpGain), ValidationError> {
    if amount == 0 {
        return Err(ValidationError::NonPositiveReward);
    }
    let mut updated = guild.clone();
    let gain = updated.gain_experience(u64::from(amount));
    Ok((updated, gain))
}

/// Adds XP earned by a member's own activity, crediting the member.
pub fn contribute(guild: &Guild, character_id: &str, amount: u64) -> (Guild, XpGain) {
    let mut updated = guild.clone();
    let gain = updated.gain_experience(amount);
    if let Some(member) = updated
        .members
        .iter_mut()
        .find(|m| m.character_id == character_id)
    {
        member.contributed_xp = member.contributed_xp.saturating_add(gain.gained);
    }
    (updated, gain)
}

/// Adds a member. Existing members are left as they are. A guild without a
/// leader takes the newcomer as its leader.
pub fn add_member(guild: &Guild, character_id: &str, role: GuildRole, joined_at: i64) -> Guild {
    let mut updated = guild.clone();
    if !updated.is_member(character_id) {
        let has_leader = updated.members.iter().any(|m| m.role == GuildRole::Leader);
        updated.members.push(GuildMember {
            character_id: character_id.to_string(),
            role: if has_leader { role } else { GuildRole::Leader },
            contributed_xp: 0,
            joined_at,
        });
    }
    updated
}

/// Removes a member. The leader cannot leave while other members remain.
pub fn remove_member(guild: &Guild, character_id: &str) -> Guild {
    let mut updated = guild.clone();
    let is_leader = updated
        .member(character_id)
        .map(|m| m.role == GuildRole::Leader)
        .unwrap_or(false);
    if is_leader && updated.members.len() > 1 {
        return updated;
    }
    updated.members.retain(|m| m.character_id != character_id);
    updated
}

/// Adds a participant. The first participant moves an upcoming event to
/// active; joining twice is a no-op.
pub fn join_event(event: &GuildEvent, character_id: &str) -> Result<GuildEvent, GuildEventError> {
    if event.status == EventStatus::Completed {
        return Err(GuildEventError::AlreadyCompleted(event.id.clone()));
    }
    let mut updated = event.clone();
    if !updated.has_participant(character_id) {
        updated.participants.push(character_id.to_string());
    }
    if updated.status == EventStatus::Upcoming && !updated.participants.is_empty() {
        updated.status = EventStatus::Active;
    }
    Ok(updated)
}

/// Closes an active event and grants its XP to the guild exactly once.
pub fn complete_event(event: &GuildEvent, guild: &Guild) -> Result<EventCompletion, GuildEventError> {
    if event.guild_id != guild.id {
        return Err(GuildEventError::WrongGuild(event.id.clone()));
    }
    match event.status {
        EventStatus::Upcoming => return Err(GuildEventError::NotActive(event.id.clone())),
        EventStatus::Completed => return Err(GuildEventError::AlreadyCompleted(event.id.clone())),
        EventStatus::Active => {}
    }

    let (guild, gain) =
        apply_guild_reward(guild, event.xp_reward).map_err(|_| GuildEventError::InvalidReward)?;
    let mut event = event.clone();
    event.status = EventStatus::Completed;

    Ok(EventCompletion { event, guild, gain })
}
