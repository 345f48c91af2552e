use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// The four trainable attributes. Doubles as the category of workouts,
/// quests and reward definitions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Strength,
    Speed,
    Magic,
    Willpower,
}

impl AttributeType {
    pub const ALL: [AttributeType; 4] = [
        AttributeType::Strength,
        AttributeType::Speed,
        AttributeType::Magic,
        AttributeType::Willpower,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AttributeType::Strength => "strength",
            AttributeType::Speed => "speed",
            AttributeType::Magic => "magic",
            AttributeType::Willpower => "willpower",
        }
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            AttributeType::Strength => "STR",
            AttributeType::Speed => "SPD",
            AttributeType::Magic => "MAG",
            AttributeType::Willpower => "WIL",
        }
    }

    /// Kind of workout that trains this attribute, used in templated text.
    pub fn activity(&self) -> &'static str {
        match self {
            AttributeType::Strength => "strength training",
            AttributeType::Speed => "cardio",
            AttributeType::Magic => "yoga and mobility",
            AttributeType::Willpower => "endurance",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttributeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strength" | "str" => Ok(AttributeType::Strength),
            "speed" | "spd" => Ok(AttributeType::Speed),
            "magic" | "mag" => Ok(AttributeType::Magic),
            "willpower" | "wil" => Ok(AttributeType::Willpower),
            _ => Err(ValidationError::UnknownCategory(s.to_string())),
        }
    }
}

/// Attribute counters. Serialized flat so a character record reads
/// `{ "strength": 0, "speed": 0, ... }`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Attributes {
    #[serde(default)]
    pub strength: u32,
    #[serde(default)]
    pub speed: u32,
    #[serde(default)]
    pub magic: u32,
    #[serde(default)]
    pub willpower: u32,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attr: AttributeType) -> u32 {
        match attr {
            AttributeType::Strength => self.strength,
            AttributeType::Speed => self.speed,
            AttributeType::Magic => self.magic,
            AttributeType::Willpower => self.willpower,
        }
    }

    fn slot(&mut self, attr: AttributeType) -> &mut u32 {
        match attr {
            AttributeType::Strength => &mut self.strength,
            AttributeType::Speed => &mut self.speed,
            AttributeType::Magic => &mut self.magic,
            AttributeType::Willpower => &mut self.willpower,
        }
    }

    pub fn set(&mut self, attr: AttributeType, value: u32) {
        *self.slot(attr) = value;
    }

    pub fn increment(&mut self, attr: AttributeType) {
        let slot = self.slot(attr);
        *slot = slot.saturating_add(1);
    }

    pub fn total(&self) -> u32 {
        AttributeType::ALL
            .iter()
            .map(|a| self.get(*a))
            .fold(0u32, |acc, v| acc.saturating_add(v))
    }
}
