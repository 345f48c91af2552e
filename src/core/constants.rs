// XP and leveling
pub const XP_PER_LEVEL: u64 = 1000;
pub const STARTING_LEVEL: u32 = 1;
// Class specialty bonus (1.2x), kept as a percentage so rewards floor exactly
pub const CLASS_BONUS_PERCENT: u64 = 120;

// Quest reward brackets (inclusive, non-overlapping)
pub const EASY_REWARD_RANGE: (u32, u32) = (50, 150);
pub const MEDIUM_REWARD_RANGE: (u32, u32) = (151, 250);
pub const HARD_REWARD_RANGE: (u32, u32) = (251, 400);
pub const QUEST_OFFER_COUNT: usize = 3;

// Workouts: XP per minute by intensity
pub const LIGHT_XP_PER_MINUTE: u32 = 5;
pub const MODERATE_XP_PER_MINUTE: u32 = 10;
pub const VIGOROUS_XP_PER_MINUTE: u32 = 15;
pub const MAX_WORKOUT_MINUTES: u32 = 600;

// Names
pub const MAX_NAME_LENGTH: usize = 16;

// Generated flavor text limits
pub const MAX_TITLE_LENGTH: usize = 80;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
