//! FitQuest - fitness progression engine
//!
//! Characters earn XP from workouts and quests, level up on a flat curve,
//! unlock milestone rewards, and pool XP in guilds. The engine modules are
//! pure; `service` wires them to a `store` and a `content` generator.

pub mod achievements;
pub mod build_info;
pub mod character;
pub mod config;
pub mod content;
pub mod core;
pub mod error;
pub mod guild;
pub mod quests;
pub mod service;
pub mod store;
pub mod workout;

pub use character::{AttributeType, Character};
pub use config::Config;
pub use error::{Error, Result};
pub use service::{ActivityOutcome, ProgressionService};
pub use store::{JsonStore, MemoryStore, Store};
pub use workout::{Intensity, Workout};
