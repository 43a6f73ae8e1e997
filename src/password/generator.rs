//! Tiered password composition
//!
//! Each tier has a fixed shape: Chill glues memorable words together, Lit and
//! Fire seed one/three characters per class and pad from the union alphabet
//! before shuffling.

use serde::{Deserialize, Serialize};

use super::picker::RandomPicker;
use crate::error::Result;

pub const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
pub const DIGITS: &[u8] = b"0123456789";
pub const BASIC_SYMBOLS: &[u8] = b"!@#$%^&*";
/// The doubled `^` is part of the pool and skews it slightly toward caret.
pub const EXTENDED_SYMBOLS: &[u8] = b"!@#$%^&*()[]{}+=<>?~`|:;,.^-_";
/// Chill digits skip zero
pub const CHILL_DIGITS: &[u8] = b"123456789";
pub const CHILL_SYMBOLS_REDUCED: &[u8] = b"!@#";
pub const CHILL_WORDS: &[&str] = &[
    "Cat", "Dog", "Sun", "Moon", "Star", "Blue", "Red", "Cool", "Nice", "Fun", "Sky", "Sea",
];

/// Seed characters per class for Fire
const FIRE_SEED_ROUNDS: usize = 3;

/// Password style preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ComplexityTier {
    #[default]
    Chill,
    Lit,
    Fire,
}

/// Display metadata for a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

impl ComplexityTier {
    pub const ALL: [ComplexityTier; 3] = [Self::Chill, Self::Lit, Self::Fire];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityTier::Chill => "chill",
            ComplexityTier::Lit => "lit",
            ComplexityTier::Fire => "fire",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "chill" => Some(ComplexityTier::Chill),
            "lit" => Some(ComplexityTier::Lit),
            "fire" => Some(ComplexityTier::Fire),
            _ => None,
        }
    }

    pub fn info(&self) -> TierInfo {
        match self {
            ComplexityTier::Chill => TierInfo {
                name: "Chill",
                description: "Easy to remember, good for most sites",
                icon: "😎",
                color: "rgba(0, 255, 0, 0.6)",
            },
            ComplexityTier::Lit => TierInfo {
                name: "Lit",
                description: "Balanced security and usability",
                icon: "🔥",
                color: "rgba(255, 165, 0, 0.6)",
            },
            ComplexityTier::Fire => TierInfo {
                name: "Fire",
                description: "Maximum security for important accounts",
                icon: "🚀",
                color: "rgba(255, 0, 0, 0.6)",
            },
        }
    }
}

/// Knobs that differ between the full and light editions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Symbol pool for the Chill suffix
    pub chill_symbols: &'static [u8],
    /// Pick Lit/Fire lengths from a range instead of a fixed value
    pub randomized_lengths: bool,
    /// Shuffle passes applied to Fire output (minimum 1)
    pub fire_shuffle_passes: u8,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            chill_symbols: BASIC_SYMBOLS,
            randomized_lengths: true,
            fire_shuffle_passes: 1,
        }
    }
}

impl GeneratorConfig {
    /// Closed length range for a tier; Chill is shaped by its words.
    pub fn length_range(&self, tier: ComplexityTier) -> (i32, i32) {
        match (tier, self.randomized_lengths) {
            (ComplexityTier::Chill, _) => (9, 11),
            (ComplexityTier::Lit, true) => (12, 16),
            (ComplexityTier::Lit, false) => (12, 12),
            (ComplexityTier::Fire, true) => (16, 20),
            (ComplexityTier::Fire, false) => (19, 19),
        }
    }
}

/// Composes passwords for the current tier
#[derive(Debug, Clone, Default)]
pub struct PasswordGenerator {
    tier: ComplexityTier,
    config: GeneratorConfig,
}

impl PasswordGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            tier: ComplexityTier::default(),
            config,
        }
    }

    pub fn tier(&self) -> ComplexityTier {
        self.tier
    }

    pub fn set_tier(&mut self, tier: ComplexityTier) {
        self.tier = tier;
    }

    /// Set the tier by name; unknown names leave it unchanged.
    pub fn set_tier_named(&mut self, name: &str) -> bool {
        match ComplexityTier::from_str(name) {
            Some(tier) => {
                self.tier = tier;
                true
            }
            None => false,
        }
    }

    /// Generate one password for the current tier
    pub fn generate<R: RandomPicker + ?Sized>(&self, rng: &mut R) -> Result<String> {
        match self.tier {
            ComplexityTier::Chill => self.generate_chill(rng),
            ComplexityTier::Lit => self.generate_lit(rng),
            ComplexityTier::Fire => self.generate_fire(rng),
        }
    }

    /// Generate several passwords at the current tier
    pub fn generate_multiple<R: RandomPicker + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<String>> {
        (0..count).map(|_| self.generate(rng)).collect()
    }

    fn generate_chill<R: RandomPicker + ?Sized>(&self, rng: &mut R) -> Result<String> {
        let word1 = rng.pick_one(CHILL_WORDS)?;
        let word2 = rng.pick_one(CHILL_WORDS)?;
        let num1 = *rng.pick_one(CHILL_DIGITS)? as char;
        let num2 = *rng.pick_one(CHILL_DIGITS)? as char;
        let symbol = *rng.pick_one(self.config.chill_symbols)? as char;

        // Word order is kept for readability, no shuffle here
        Ok(format!("{word1}{word2}{num1}{num2}{symbol}"))
    }

    fn generate_lit<R: RandomPicker + ?Sized>(&self, rng: &mut R) -> Result<String> {
        let (min, max) = self.config.length_range(ComplexityTier::Lit);
        let target = rng.pick_int(min, max)? as usize;

        let mut chars = Vec::with_capacity(target);
        for class in [UPPERCASE, LOWERCASE, DIGITS, BASIC_SYMBOLS] {
            chars.push(*rng.pick_one(class)?);
        }

        let all = [UPPERCASE, LOWERCASE, DIGITS, BASIC_SYMBOLS].concat();
        while chars.len() < target {
            chars.push(*rng.pick_one(&all)?);
        }

        Ok(to_string(&rng.shuffle(&chars)))
    }

    fn generate_fire<R: RandomPicker + ?Sized>(&self, rng: &mut R) -> Result<String> {
        let (min, max) = self.config.length_range(ComplexityTier::Fire);
        let target = rng.pick_int(min, max)? as usize;

        let mut chars = Vec::with_capacity(target);
        for _ in 0..FIRE_SEED_ROUNDS {
            for class in [UPPERCASE, LOWERCASE, DIGITS, EXTENDED_SYMBOLS] {
                chars.push(*rng.pick_one(class)?);
            }
        }

        let all = [UPPERCASE, LOWERCASE, DIGITS, EXTENDED_SYMBOLS].concat();
        while chars.len() < target {
            chars.push(*rng.pick_one(&all)?);
        }

        for _ in 0..self.config.fire_shuffle_passes.max(1) {
            chars = rng.shuffle(&chars);
        }

        Ok(to_string(&chars))
    }
}

fn to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| *b as char).collect()
}
