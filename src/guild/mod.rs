//! Guilds: shared XP pools and group events.

pub mod logic;
pub mod types;

pub use logic::{
    add_member, apply_guild_reward, complete_event, contribute, join_event, remove_member,
    EventCompletion,
};
pub use types::{EventStatus, Guild, GuildEvent, GuildMember, GuildRole};
