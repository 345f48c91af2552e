//! Quests: offered content with a guarded accept/complete lifecycle.

pub mod generation;
pub mod logic;
pub mod types;

pub use generation::{generate_offers, generate_quest, roll_reward};
pub use logic::{accept, complete, QuestCompletion};
pub use types::{DifficultyTier, Quest, QuestStatus};
