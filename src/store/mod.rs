//! Persistence for characters, quests, guilds and rewards.
//!
//! The engine never touches storage; the service loads a record, runs it
//! through the engine and saves the result with one of these stores.

mod json;
mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::achievements::Achievements;
use crate::character::Character;
use crate::error::Result;
use crate::guild::{Guild, GuildEvent};
use crate::quests::Quest;

/// Record storage. Implementations must be safe to share across threads;
/// callers serialize writes per entity.
pub trait Store: Send + Sync {
    /// Fails with `Error::NotFound` when the character does not exist.
    fn load_character(&self, id: &str) -> Result<Character>;
    fn save_character(&self, character: &Character) -> Result<()>;
    fn delete_character(&self, id: &str) -> Result<()>;
    /// All characters, most recently updated first.
    fn list_characters(&self) -> Result<Vec<Character>>;

    /// Quest log of one character. Empty when none was saved yet.
    fn load_quests(&self, character_id: &str) -> Result<Vec<Quest>>;
    fn save_quests(&self, character_id: &str, quests: &[Quest]) -> Result<()>;

    /// Reward state of one character. Default when none was saved yet.
    fn load_achievements(&self, character_id: &str) -> Result<Achievements>;
    fn save_achievements(&self, character_id: &str, achievements: &Achievements) -> Result<()>;

    fn load_guild(&self, id: &str) -> Result<Guild>;
    fn save_guild(&self, guild: &Guild) -> Result<()>;

    /// Events of one guild. Empty when none was saved yet.
    fn load_guild_events(&self, guild_id: &str) -> Result<Vec<GuildEvent>>;
    fn save_guild_events(&self, guild_id: &str, events: &[GuildEvent]) -> Result<()>;

    fn character_exists(&self, id: &str) -> Result<bool> {
        match self.load_character(id) {
            Ok(_) => Ok(true),
            Err(crate::error::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn guild_exists(&self, id: &str) -> Result<bool> {
        match self.load_guild(id) {
            Ok(_) => Ok(true),
            Err(crate::error::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

fn sort_most_recent_first(characters: &mut [Character]) {
    characters.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}
