//! JSON file store.
//!
//! Layout under the data directory:
//! `characters/<id>.json`, `quests/<character>.json`,
//! `rewards/<character>.json`, `guilds/<id>.json`, `events/<guild>.json`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{sort_most_recent_first, Store};
use crate::achievements::Achievements;
use crate::character::{sanitize_name, Character};
use crate::config::default_data_dir;
use crate::error::{Error, Result};
use crate::guild::{Guild, GuildEvent};
use crate::quests::Quest;

const CHARACTERS: &str = "characters";
const QUESTS: &str = "quests";
const REWARDS: &str = "rewards";
const GUILDS: &str = "guilds";
const EVENTS: &str = "events";

pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Opens (and creates if needed) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        for dir in [CHARACTERS, QUESTS, REWARDS, GUILDS, EVENTS] {
            fs::create_dir_all(root.join(dir))?;
        }
        Ok(Self { root })
    }

    /// Opens the store in `~/.fitquest`.
    pub fn open_default() -> io::Result<Self> {
        Self::new(default_data_dir()?)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, dir: &str, kind: &'static str, id: &str) -> Result<PathBuf> {
        // ids become file names; refuse anything that would not survive sanitizing
        let file_id = sanitize_name(id);
        if file_id.is_empty() || file_id != id {
            return Err(Error::not_found(kind, id));
        }
        Ok(self.root.join(dir).join(format!("{}.json", file_id)))
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        match fs::read_to_string(path) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes through a temp file so a failed write leaves the previous
    /// record intact.
    fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        debug!(path = %path.display(), "saved record");
        Ok(())
    }
}

impl Store for JsonStore {
    fn load_character(&self, id: &str) -> Result<Character> {
        let path = self.path(CHARACTERS, "character", id)?;
        Self::read_json(&path)?.ok_or_else(|| Error::not_found("character", id))
    }

    fn save_character(&self, character: &Character) -> Result<()> {
        let path = self.path(CHARACTERS, "character", &character.id)?;
        Self::write_json(&path, character)
    }

    fn delete_character(&self, id: &str) -> Result<()> {
        let path = self.path(CHARACTERS, "character", id)?;
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::not_found("character", id))
            }
            Err(e) => return Err(e.into()),
        }
        for dir in [QUESTS, REWARDS] {
            let related = self.root.join(dir).join(format!("{}.json", id));
            if let Err(e) = fs::remove_file(&related) {
                if e.kind() != io::ErrorKind::NotFound {
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }

    fn list_characters(&self) -> Result<Vec<Character>> {
        let mut characters = Vec::new();

        for entry in fs::read_dir(self.root.join(CHARACTERS))? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match Self::read_json::<Character>(&path) {
                Ok(Some(character)) => characters.push(character),
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable character"),
            }
        }

        sort_most_recent_first(&mut characters);
        Ok(characters)
    }

    fn load_quests(&self, character_id: &str) -> Result<Vec<Quest>> {
        let path = self.path(QUESTS, "character", character_id)?;
        Ok(Self::read_json(&path)?.unwrap_or_default())
    }

    fn save_quests(&self, character_id: &str, quests: &[Quest]) -> Result<()> {
        let path = self.path(QUESTS, "character", character_id)?;
        Self::write_json(&path, quests)
    }

    fn load_achievements(&self, character_id: &str) -> Result<Achievements> {
        let path = self.path(REWARDS, "character", character_id)?;
        Ok(Self::read_json(&path)?.unwrap_or_default())
    }

    fn save_achievements(&self, character_id: &str, achievements: &Achievements) -> Result<()> {
        let path = self.path(REWARDS, "character", character_id)?;
        Self::write_json(&path, achievements)
    }

    fn load_guild(&self, id: &str) -> Result<Guild> {
        let path = self.path(GUILDS, "guild", id)?;
        Self::read_json(&path)?.ok_or_else(|| Error::not_found("guild", id))
    }

    fn save_guild(&self, guild: &Guild) -> Result<()> {
        let path = self.path(GUILDS, "guild", &guild.id)?;
        Self::write_json(&path, guild)
    }

    fn load_guild_events(&self, guild_id: &str) -> Result<Vec<GuildEvent>> {
        let path = self.path(EVENTS, "guild", guild_id)?;
        Ok(Self::read_json(&path)?.unwrap_or_default())
    }

    fn save_guild_events(&self, guild_id: &str, events: &[GuildEvent]) -> Result<()> {
        let path = self.path(EVENTS, "guild", guild_id)?;
        Self::write_json(&path, events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::AttributeType;

    fn temp_store() -> JsonStore {
        let dir = std::env::temp_dir().join(format!("fitquest-store-{}", uuid::Uuid::new_v4()));
        JsonStore::new(dir).unwrap()
    }

    #[test]
    fn test_creates_layout() {
        let store = temp_store();
        for dir in [CHARACTERS, QUESTS, REWARDS, GUILDS, EVENTS] {
            assert!(store.root().join(dir).is_dir());
        }
    }

    #[test]
    fn test_save_and_load_character() {
        let store = temp_store();
        let mut character = Character::new("Iron Lifter", Some(AttributeType::Strength)).unwrap();
        character.experience = 1500;
        character.level = 2;

        store.save_character(&character).unwrap();
        let loaded = store.load_character("iron_lifter").unwrap();

        assert_eq!(loaded, character);
        assert!(store.character_exists("iron_lifter").unwrap());
    }

    #[test]
    fn test_missing_character_is_not_found() {
        let store = temp_store();
        assert!(matches!(
            store.load_character("ghost"),
            Err(Error::NotFound { kind: "character", .. })
        ));
        assert!(!store.character_exists("ghost").unwrap());
    }

    #[test]
    fn test_rejects_path_like_ids() {
        let store = temp_store();
        assert!(matches!(
            store.load_character("../config"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_corrupted_character_is_json_error() {
        let store = temp_store();
        fs::write(store.root().join(CHARACTERS).join("broken.json"), "{").unwrap();
        assert!(matches!(store.load_character("broken"), Err(Error::Json(_))));
        // listing skips it
        assert!(store.list_characters().unwrap().is_empty());
    }

    #[test]
    fn test_list_most_recent_first() {
        let store = temp_store();
        let mut older = Character::new("Older", None).unwrap();
        older.updated_at = 100;
        let mut newer = Character::new("Newer", None).unwrap();
        newer.updated_at = 200;
        store.save_character(&older).unwrap();
        store.save_character(&newer).unwrap();

        let names: Vec<String> = store
            .list_characters()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Newer", "Older"]);
    }

    #[test]
    fn test_delete_character_removes_related_records() {
        let store = temp_store();
        let character = Character::new("Hero", None).unwrap();
        store.save_character(&character).unwrap();
        store.save_quests("hero", &[]).unwrap();
        store.save_achievements("hero", &Achievements::default()).unwrap();

        store.delete_character("hero").unwrap();

        assert!(!store.character_exists("hero").unwrap());
        assert!(!store.root().join(QUESTS).join("hero.json").exists());
        assert!(matches!(store.delete_character("hero"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_empty_collections_when_unsaved() {
        let store = temp_store();
        assert!(store.load_quests("hero").unwrap().is_empty());
        assert_eq!(store.load_achievements("hero").unwrap(), Achievements::default());
        assert!(store.load_guild_events("owls").unwrap().is_empty());
    }

    #[test]
    fn test_guild_round_trip() {
        let store = temp_store();
        let guild = Guild::new("Night Owls", "hero").unwrap();
        store.save_guild(&guild).unwrap();
        assert_eq!(store.load_guild("night_owls").unwrap(), guild);
        assert!(store.guild_exists("night_owls").unwrap());
    }
}
