//! Rewards (badges) unlocked by activity counts.
//!
//! Evaluation is pure: callers pass the counts, the definitions and the ids
//! already earned, and persist whatever comes back.

pub mod data;
pub mod logic;
pub mod types;

pub use data::{default_rewards, find_reward};
pub use logic::{evaluate, next_milestones};
pub use types::{ActivityCounts, Achievements, EarnedReward, RewardDefinition, RewardTier};
