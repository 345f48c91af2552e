//! Characters: attributes, records and name handling.

pub mod attributes;
pub mod input;
pub mod types;

pub use attributes::{AttributeType, Attributes};
pub use input::{sanitize_name, validate_name};
pub use types::Character;
