//! Runtime configuration.
//!
//! Read from `~/.fitquest/config.json`. A missing file means defaults; a
//! malformed one is reported and also falls back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::achievements::{default_rewards, RewardDefinition};
use crate::core::progression::StatGrowth;
use crate::error::Result;

const DATA_DIR_NAME: &str = ".fitquest";
const CONFIG_FILE_NAME: &str = "config.json";

/// Content generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Off by default; templates are used until explicitly enabled.
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-3-5-haiku-latest".to_string(),
            max_tokens: 1024,
            timeout_secs: 30,
            api_key_env: "FITQUEST_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where records are stored. Defaults to `~/.fitquest`.
    pub data_dir: Option<PathBuf>,
    pub stat_growth: StatGrowth,
    /// Share of a member's activity XP (percent) that also goes to their guild.
    pub guild_contribution_percent: u64,
    /// Custom reward definitions (JSON array). Built-in catalog when unset.
    pub rewards_file: Option<PathBuf>,
    pub content: ContentConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            stat_growth: StatGrowth::default(),
            guild_contribution_percent: 10,
            rewards_file: None,
            content: ContentConfig::default(),
        }
    }
}

/// `~/.fitquest`.
pub fn default_data_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    Ok(home_dir.join(DATA_DIR_NAME))
}

impl Config {
    /// Loads the config from the default location.
    pub fn load() -> Self {
        match default_data_dir() {
            Ok(dir) => Self::load_from(&dir.join(CONFIG_FILE_NAME)),
            Err(e) => {
                warn!(error = %e, "no home directory, using default config");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&json) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed config, using defaults");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn data_dir(&self) -> io::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }

    /// Reward definitions from `rewards_file`, or the built-in catalog.
    pub fn reward_definitions(&self) -> Result<Vec<RewardDefinition>> {
        let Some(path) = &self.rewards_file else {
            return Ok(default_rewards());
        };
        let json = fs::read_to_string(path)?;
        let definitions: Vec<RewardDefinition> = serde_json::from_str(&json)?;
        for definition in &definitions {
            definition.validate()?;
        }
        Ok(definitions)
    }

    /// XP a guild receives from `activity_xp` earned by one member.
    pub fn guild_share(&self, activity_xp: u64) -> u64 {
        activity_xp.saturating_mul(self.guild_contribution_percent) / 100
    }
}
