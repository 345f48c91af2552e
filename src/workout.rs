//! Logged workouts and their conversion into progression events.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::character::{AttributeType, Character};
use crate::core::constants::{
    LIGHT_XP_PER_MINUTE, MAX_WORKOUT_MINUTES, MODERATE_XP_PER_MINUTE, VIGOROUS_XP_PER_MINUTE,
};
use crate::core::progression::ProgressionEvent;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Light,
    #[default]
    Moderate,
    Vigorous,
}

impl Intensity {
    pub fn xp_per_minute(&self) -> u32 {
        match self {
            Intensity::Light => LIGHT_XP_PER_MINUTE,
            Intensity::Moderate => MODERATE_XP_PER_MINUTE,
            Intensity::Vigorous => VIGOROUS_XP_PER_MINUTE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Intensity::Light => "light",
            Intensity::Moderate => "moderate",
            Intensity::Vigorous => "vigorous",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Intensity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" | "low" => Ok(Intensity::Light),
            "moderate" | "medium" => Ok(Intensity::Moderate),
            "vigorous" | "high" => Ok(Intensity::Vigorous),
            _ => Err(ValidationError::UnknownIntensity(s.to_string())),
        }
    }
}

/// A workout as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub category: AttributeType,
    pub minutes: u32,
    #[serde(default)]
    pub intensity: Intensity,
}

impl Workout {
    pub fn new(category: AttributeType, minutes: u32, intensity: Intensity) -> Self {
        Self {
            category,
            minutes,
            intensity,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.minutes == 0 || self.minutes > MAX_WORKOUT_MINUTES {
            return Err(ValidationError::WorkoutDuration {
                minutes: self.minutes,
                max: MAX_WORKOUT_MINUTES,
            });
        }
        Ok(())
    }

    pub fn base_reward(&self) -> u32 {
        self.minutes.saturating_mul(self.intensity.xp_per_minute())
    }

    /// Validates the workout and turns it into an event for `character`.
    pub fn to_event(&self, character: &Character) -> Result<ProgressionEvent, ValidationError> {
        self.validate()?;
        ProgressionEvent::for_character(character, self.category, self.base_reward())
    }
}
