//! Password composition
//!
//! Pure functions over a random source. No rendering or platform
//! dependencies live here.

pub mod generator;
pub mod picker;
pub mod strength;

pub use generator::{ComplexityTier, GeneratorConfig, PasswordGenerator, TierInfo};
pub use picker::RandomPicker;
pub use strength::{StrengthChecks, StrengthLabel, StrengthReport, validate_strength};
