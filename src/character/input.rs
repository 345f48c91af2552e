//! Name validation for characters and guilds.

use crate::core::constants::MAX_NAME_LENGTH;
use crate::error::ValidationError;

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong {
            max: MAX_NAME_LENGTH,
        });
    }

    let valid_chars = trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_');

    if !valid_chars {
        return Err(ValidationError::InvalidNameChars);
    }

    Ok(())
}

/// File-safe id derived from a display name.
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
