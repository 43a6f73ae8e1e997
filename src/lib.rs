//! GenZ Pass - a novelty password generator with a lot of sparkle
//!
//! Core modules:
//! - `password`: Random picks, tiered password composition, strength scoring
//! - `fx`: Particle field and DNA helix geometry
//! - `sequence`: Timed reveal choreography (prepare, helix, typewriter)
//! - `interaction`: Smoothed pointer tracking and background decorations
//! - `app`: Owned session tying the components together
//! - `platform`: Browser glue (canvas surfaces, DOM effects, clipboard)

pub mod app;
pub mod clipboard;
pub mod error;
pub mod fx;
pub mod interaction;
pub mod password;
pub mod platform;
pub mod sequence;
pub mod settings;
pub mod timing;

pub use app::PasswordApp;
pub use error::{Error, Result};
pub use settings::{Edition, Settings};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Timing and effect constants
pub mod consts {
    /// Preparing phase before generation starts (ms)
    pub const PREPARE_MS: f64 = 800.0;
    /// DNA helix animation length (ms)
    pub const HELIX_MS: f64 = 3000.0;
    /// Glitch frames shown before each committed character
    pub const GLITCH_FRAMES: u32 = 3;
    /// Time each glitch frame stays up (ms)
    pub const GLITCH_FRAME_MS: f64 = 50.0;
    /// Pause after a character is committed (ms)
    pub const CHAR_DELAY_MS: f64 = 150.0;
    /// Complete state hold before cleanup (ms)
    pub const COMPLETE_HOLD_MS: f64 = 3000.0;
    /// Copy button comes back this long after the sequence ends (ms)
    pub const COPY_REVEAL_DELAY_MS: f64 = 500.0;
    /// Copy feedback label lifetime (ms)
    pub const COPY_FEEDBACK_MS: f64 = 2000.0;
    /// Generate button keeps its "clicked" class this long (ms)
    pub const BUTTON_CLICK_MS: f64 = 1200.0;

    /// Placeholder for unrevealed characters
    pub const PLACEHOLDER: char = '_';

    /// Trail emission stops above this many live particles
    pub const MAX_TRAIL_PARTICLES: usize = 80;
    /// Upper bound accepted for a configured trail ceiling
    pub const TRAIL_CEILING_LIMIT: usize = 2000;
    /// Per-tick velocity damping
    pub const PARTICLE_DAMPING: f32 = 0.99;
    /// Glow blur per unit of brightness (px)
    pub const GLOW_PER_BRIGHTNESS: f32 = 20.0;
    /// Explosion waves and their spacing (ms)
    pub const EXPLOSION_WAVES: u32 = 4;
    pub const EXPLOSION_WAVE_MS: f64 = 150.0;

    /// Pointer smoothing factor per tick
    pub const POINTER_SMOOTHING: f32 = 0.1;
    /// Decorations further than this from the pointer are unaffected (px)
    pub const INTERACTION_RADIUS: f32 = 300.0;
    pub const ATTRACT_THRESHOLD: f32 = 0.3;
    pub const REPEL_THRESHOLD: f32 = 0.1;
    /// Attraction offset at full strength (px)
    pub const ATTRACT_PULL: f32 = 20.0;
    /// Highlight hides after this long without input (ms)
    pub const INTERACTION_TIMEOUT_MS: f64 = 3000.0;
    /// Highlight lingers this long after a touch ends (ms)
    pub const TOUCH_RELEASE_MS: f64 = 1000.0;
    /// Device tilt parallax
    pub const TILT_FACTOR: f32 = 0.5;
    pub const TILT_MAX_OFFSET: f32 = 30.0;

    /// Input event throttle (ms)
    pub const INPUT_THROTTLE_MS: f64 = 16.0;
    /// Canvas resize debounce (ms)
    pub const RESIZE_DEBOUNCE_MS: f64 = 250.0;
}

/// Axis-aligned screen rectangle (CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Unit vector at `angle` scaled by `length`
#[inline]
pub fn polar(angle: f32, length: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * length
}
