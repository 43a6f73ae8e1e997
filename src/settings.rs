//! Generator settings and preferences
//!
//! Persisted in LocalStorage. Generated passwords are never stored here.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_TRAIL_PARTICLES, TRAIL_CEILING_LIMIT};
use crate::password::generator::{BASIC_SYMBOLS, CHILL_SYMBOLS_REDUCED};
use crate::password::{ComplexityTier, GeneratorConfig};

/// Build flavour of the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Edition {
    /// Randomized lengths, full Chill symbol set
    #[default]
    Full,
    /// Fixed lengths, reduced Chill symbol set
    Light,
}

impl Edition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Edition::Full => "Full",
            Edition::Light => "Light",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "full" => Some(Edition::Full),
            "light" | "lite" => Some(Edition::Light),
            _ => None,
        }
    }

    /// Symbols allowed at the end of a Chill password
    pub fn chill_symbols(&self) -> &'static [u8] {
        match self {
            Edition::Full => BASIC_SYMBOLS,
            Edition::Light => CHILL_SYMBOLS_REDUCED,
        }
    }

    /// Whether Lit/Fire lengths are drawn from a range
    pub fn randomized_lengths(&self) -> bool {
        match self {
            Edition::Full => true,
            Edition::Light => false,
        }
    }
}

/// User settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub edition: Edition,
    /// Last selected tier
    pub tier: ComplexityTier,
    /// Shuffle passes for Fire passwords (1 is enough for a uniform result)
    pub fire_shuffle_passes: u8,

    // === Visual Effects ===
    /// Particle effects (trails, bursts, explosions)
    pub particles: bool,
    /// Live particle count above which trails stop spawning
    pub max_trail_particles: usize,

    // === Accessibility ===
    /// Reduced motion (no trails, flashes or explosions)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            edition: Edition::Full,
            tier: ComplexityTier::Chill,
            fire_shuffle_passes: 1,

            particles: true,
            max_trail_particles: MAX_TRAIL_PARTICLES,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings for an edition
    pub fn from_edition(edition: Edition) -> Self {
        Self {
            edition,
            ..Self::default()
        }
    }

    /// Generator knobs implied by these settings
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            chill_symbols: self.edition.chill_symbols(),
            randomized_lengths: self.edition.randomized_lengths(),
            fire_shuffle_passes: self.fire_shuffle_passes.max(1),
        }
    }

    /// Trail ceiling, clamped to a sane range whatever storage held
    pub fn trail_ceiling(&self) -> usize {
        self.max_trail_particles.clamp(1, TRAIL_CEILING_LIMIT)
    }

    /// Effective particle toggle (respects reduced_motion)
    pub fn effective_particles(&self) -> bool {
        self.particles && !self.reduced_motion
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "genz_pass_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edition_from_str() {
        assert_eq!(Edition::from_str("LIGHT"), Some(Edition::Light));
        assert_eq!(Edition::from_str("lite"), Some(Edition::Light));
        assert_eq!(Edition::from_str("full"), Some(Edition::Full));
        assert_eq!(Edition::from_str("heavy"), None);
    }

    #[test]
    fn test_light_generator_config() {
        let config = Settings::from_edition(Edition::Light).generator_config();
        assert_eq!(config.chill_symbols, b"!@#");
        assert!(!config.randomized_lengths);
        assert_eq!(config.length_range(ComplexityTier::Fire), (19, 19));
    }

    #[test]
    fn test_zero_shuffle_passes_clamped() {
        let settings = Settings {
            fire_shuffle_passes: 0,
            ..Default::default()
        };
        assert_eq!(settings.generator_config().fire_shuffle_passes, 1);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"tier":"Fire"}"#).unwrap();
        assert_eq!(settings.tier, ComplexityTier::Fire);
        assert_eq!(settings.edition, Edition::Full);
        assert_eq!(settings.max_trail_particles, MAX_TRAIL_PARTICLES);
    }

    #[test]
    fn test_trail_ceiling_clamped() {
        let huge: Settings = serde_json::from_str(r#"{"max_trail_particles":4294967295}"#).unwrap();
        assert_eq!(huge.trail_ceiling(), TRAIL_CEILING_LIMIT);
        let zero = Settings {
            max_trail_particles: 0,
            ..Default::default()
        };
        assert_eq!(zero.trail_ceiling(), 1);
        assert_eq!(Settings::default().trail_ceiling(), MAX_TRAIL_PARTICLES);
    }

    #[test]
    fn test_reduced_motion_disables_particles() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_particles());
    }
}
