//! Core progression engine: constants and leveling math.

pub mod constants;
pub mod progression;

pub use constants::*;
pub use progression::*;
