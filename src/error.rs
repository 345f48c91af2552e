//! Error types shared across the crate.

use thiserror::Error;

/// Input rejected before it reaches the progression engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Name must be {max} characters or less")]
    NameTooLong { max: usize },

    #[error("Name can only contain letters, numbers, spaces, hyphens, and underscores")]
    InvalidNameChars,

    #[error("Reward must be greater than zero")]
    NonPositiveReward,

    #[error("Workout must last between 1 and {max} minutes, got {minutes}")]
    WorkoutDuration { minutes: u32, max: u32 },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("Unknown intensity: {0}")]
    UnknownIntensity(String),

    #[error("Required count must be greater than zero for reward {0}")]
    ZeroRequiredCount(String),
}

/// Quest state machine violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    #[error("Quest {0} has already been accepted")]
    AlreadyAccepted(String),

    #[error("Quest {0} has already been completed")]
    AlreadyCompleted(String),

    #[error("Quest reward must be greater than zero")]
    InvalidReward,
}

/// Guild event state machine violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuildEventError {
    #[error("Event {0} has not started yet")]
    NotActive(String),

    #[error("Event {0} has already been completed")]
    AlreadyCompleted(String),

    #[error("Event {0} belongs to a different guild")]
    WrongGuild(String),

    #[error("Event reward must be greater than zero")]
    InvalidReward,
}

/// Failures talking to the content generator or reading its output.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content generation is disabled")]
    Disabled,

    #[error("API key not configured")]
    NoApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed content: {0}")]
    Malformed(String),
}

/// Top-level error for service and storage operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Quest(#[from] QuestError),

    #[error(transparent)]
    GuildEvent(#[from] GuildEventError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: &'static str, id: String },

    #[error("Another update to {0} is in progress")]
    Busy(String),

    #[error("Not permitted: {0}")]
    NotPermitted(String),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid stored data: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// True for errors caused by applying the same completion twice.
    pub fn is_double_application(&self) -> bool {
        matches!(
            self,
            Error::Quest(QuestError::AlreadyCompleted(_))
                | Error::GuildEvent(GuildEventError::AlreadyCompleted(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
