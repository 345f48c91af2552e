//! In-memory store, used by tests and throwaway sessions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{sort_most_recent_first, Store};
use crate::achievements::Achievements;
use crate::character::Character;
use crate::error::{Error, Result};
use crate::guild::{Guild, GuildEvent};
use crate::quests::Quest;

#[derive(Default)]
struct Tables {
    characters: HashMap<String, Character>,
    quests: HashMap<String, Vec<Quest>>,
    achievements: HashMap<String, Achievements>,
    guilds: HashMap<String, Guild>,
    events: HashMap<String, Vec<GuildEvent>>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // writes are single inserts, so a poisoned lock still holds whole records
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Store for MemoryStore {
    fn load_character(&self, id: &str) -> Result<Character> {
        self.tables()
            .characters
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found("character", id))
    }

    fn save_character(&self, character: &Character) -> Result<()> {
        self.tables()
            .characters
            .insert(character.id.clone(), character.clone());
        Ok(())
    }

    fn delete_character(&self, id: &str) -> Result<()> {
        let mut tables = self.tables();
        if tables.characters.remove(id).is_none() {
            return Err(Error::not_found("character", id));
        }
        tables.quests.remove(id);
        tables.achievements.remove(id);
        Ok(())
    }

    fn list_characters(&self) -> Result<Vec<Character>> {
        let mut characters: Vec<Character> = self.tables().characters.values().cloned().collect();
        sort_most_recent_first(&mut characters);
        Ok(characters)
    }

    fn load_quests(&self, character_id: &str) -> Result<Vec<Quest>> {
        Ok(self
            .tables()
            .quests
            .get(character_id)
            .cloned()
            .unwrap_or_default())
    }

    fn save_quests(&self, character_id: &str, quests: &[Quest]) -> Result<()> {
        self.tables()
            .quests
            .insert(character_id.to_string(), quests.to_vec());
        Ok(())
    }

    fn load_achievements(&self, character_id: &str) -> Result<Achievements> {
        Ok(self
            .tables()
            .achievements
            .get(character_id)
            .cloned()
            .unwrap_or_default())
    }

    fn save_achievements(&self, character_id: &str, achievements: &Achievements) -> Result<()> {
        self.tables()
            .achievements
            .insert(character_id.to_string(), achievements.clone());
        Ok(())
    }

    fn load_guild(&self, id: &str) -> Result<Guild> {
        self.tables()
            .guilds
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found("guild", id))
    }

    fn save_guild(&self, guild: &Guild) -> Result<()> {
        self.tables().guilds.insert(guild.id.clone(), guild.clone());
        Ok(())
    }

    fn load_guild_events(&self, guild_id: &str) -> Result<Vec<GuildEvent>> {
        Ok(self
            .tables()
            .events
            .get(guild_id)
            .cloned()
            .unwrap_or_default())
    }

    fn save_guild_events(&self, guild_id: &str, events: &[GuildEvent]) -> Result<()> {
        self.tables()
            .events
            .insert(guild_id.to_string(), events.to_vec());
        Ok(())
    }
}
