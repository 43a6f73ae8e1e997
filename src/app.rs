//! Application session
//!
//! Owns every component and the ambient state (tier, last password, copy
//! button visibility). The browser shell forwards events here and calls
//! [`PasswordApp::frame`] once per animation frame.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::clipboard::{CopyFeedback, CopyMethod};
use crate::consts::*;
use crate::error::Result;
use crate::fx::{ParticleField, ParticleSurface};
use crate::interaction::{InputModality, InteractionTracker, TrackerFrame};
use crate::password::{ComplexityTier, PasswordGenerator};
use crate::sequence::{
    CharacterRevealSink, SequenceController, SequenceEvent, SequencePhase, SequenceView,
};
use crate::settings::Settings;
use crate::timing::Throttle;
use crate::Rect;

/// Text shown before anything has been generated
pub const DISPLAY_PLACEHOLDER: &str = "0000-0000-0000-0000";

/// Snapshot for debugging and the native demo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppStatus {
    /// The host has measured the layout
    pub initialized: bool,
    pub generating: bool,
    pub phase: SequencePhase,
    pub tier: ComplexityTier,
    pub has_password: bool,
    pub particle_count: usize,
}

/// Swallows character bursts while particles are off
struct MutedSink;

impl CharacterRevealSink for MutedSink {
    fn character_revealed(&mut self, _index: usize, _total: usize) {}
}

/// Result of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    /// `None` while the tracker is paused
    pub tracker: Option<TrackerFrame>,
    /// The sequence returned to idle during this frame
    pub finished: bool,
}

pub struct PasswordApp {
    settings: Settings,
    generator: PasswordGenerator,
    rng: Pcg32,
    sequence: SequenceController,
    particles: ParticleField,
    tracker: InteractionTracker,
    trail_throttle: Throttle,
    last_password: Option<String>,
    copy_feedback: CopyFeedback,
    copy_visible: bool,
    copy_reveal_at: Option<f64>,
    visible: bool,
    layout_ready: bool,
}

impl PasswordApp {
    pub fn new(settings: Settings, seed: u64, modality: InputModality) -> Self {
        let mut generator = PasswordGenerator::new(settings.generator_config());
        generator.set_tier(settings.tier);

        log::info!(
            "{} edition ready, tier {}",
            settings.edition.as_str(),
            settings.tier.as_str()
        );

        let particle_seed = seed ^ 0x9e37_79b9_7f4a_7c15;

        Self {
            particles: ParticleField::new(particle_seed, settings.trail_ceiling()),
            generator,
            rng: Pcg32::seed_from_u64(seed),
            sequence: SequenceController::new(),
            tracker: InteractionTracker::new(modality),
            trail_throttle: Throttle::new(INPUT_THROTTLE_MS),
            last_password: None,
            copy_feedback: CopyFeedback::new(),
            copy_visible: false,
            copy_reveal_at: None,
            visible: true,
            layout_ready: false,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tier(&self) -> ComplexityTier {
        self.generator.tier()
    }

    /// Switch tier and remember it
    pub fn set_tier(&mut self, tier: ComplexityTier) {
        if self.generator.tier() == tier {
            return;
        }
        self.generator.set_tier(tier);
        self.settings.tier = tier;
        self.settings.save();
        log::info!("Complexity set to: {}", tier.as_str());
    }

    pub fn is_generating(&self) -> bool {
        !self.sequence.is_idle()
    }

    pub fn phase(&self) -> SequencePhase {
        self.sequence.phase()
    }

    pub fn last_password(&self) -> Option<&str> {
        self.last_password.as_deref()
    }

    pub fn copy_visible(&self) -> bool {
        self.copy_visible
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn tracker(&self) -> &InteractionTracker {
        &self.tracker
    }

    /// Start a reveal with an explosion at `origin`. Returns false if one is
    /// already running.
    pub fn trigger(&mut self, now: f64, origin: Vec2, view: &mut dyn SequenceView) -> bool {
        if !self.sequence.trigger(now, view) {
            return false;
        }
        self.copy_visible = false;
        self.copy_reveal_at = None;
        if self.settings.effective_particles() {
            self.particles.emit_explosion(origin, now);
        }
        true
    }

    pub fn pointer_moved(&mut self, pos: Vec2, now: f64) {
        if self.tracker.pointer_moved(pos, now) {
            self.emit_trail(pos, now);
        }
    }

    pub fn pointer_entered(&mut self) {
        self.tracker.pointer_entered();
    }

    pub fn pointer_left(&mut self) {
        self.tracker.pointer_left();
    }

    pub fn touch_started(&mut self, pos: Vec2, now: f64) {
        self.tracker.touch_started(pos, now);
    }

    pub fn touch_moved(&mut self, pos: Vec2, now: f64) {
        self.tracker.touch_moved(pos, now);
        self.emit_trail(pos, now);
    }

    pub fn touch_ended(&mut self, now: f64) {
        self.tracker.touch_ended(now);
    }

    /// Click on empty space
    pub fn click(&mut self, pos: Vec2) {
        if self.settings.effective_particles() {
            self.particles.emit_click_burst(pos);
        }
    }

    /// Where the password display sits, for character bursts
    pub fn set_reveal_bounds(&mut self, bounds: Rect) {
        self.particles.set_reveal_bounds(bounds);
        self.layout_ready = true;
    }

    /// Run one animation frame. The tracker ticks first so the whole frame
    /// sees the same smoothed pointer.
    pub fn frame(
        &mut self,
        now: f64,
        decorations: &[Vec2],
        view: &mut dyn SequenceView,
        surface: &mut dyn ParticleSurface,
    ) -> FrameOutput {
        let tracker = self.tracker.tick(now, decorations);

        let mut muted = MutedSink;
        let sink: &mut dyn CharacterRevealSink = if self.settings.effective_particles() {
            &mut self.particles
        } else {
            &mut muted
        };
        let events = self
            .sequence
            .update(now, &self.generator, &mut self.rng, view, sink);
        let finished = self.apply_events(events, now);

        if self.particles.is_running() {
            self.particles.tick(now);
            self.particles.render(surface);
        }

        if self.copy_reveal_at.is_some_and(|at| now >= at) {
            self.copy_reveal_at = None;
            self.copy_visible = self.last_password.is_some();
        }

        FrameOutput { tracker, finished }
    }

    /// Page visibility changed. Hiding stops the loops and settles any
    /// reveal in flight so it does not keep running unseen.
    pub fn set_visible(&mut self, visible: bool, now: f64, view: &mut dyn SequenceView) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;

        if visible {
            self.particles.start();
            self.tracker.resume();
            log::info!("Page visible, effects resumed");
        } else {
            self.particles.stop();
            self.tracker.pause();
            let events = self
                .sequence
                .settle(now, &self.generator, &mut self.rng, view);
            self.apply_events(events, now);
            log::info!("Page hidden, effects paused");
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Record a copy attempt and return the label to show
    pub fn record_copy(&mut self, outcome: &Result<CopyMethod>, now: f64) -> &'static str {
        match outcome {
            Ok(method) => log::info!("Password copied via {method:?}"),
            Err(e) => log::warn!("Copy failed: {e}"),
        }
        self.copy_feedback.show(outcome, now)
    }

    /// Copy feedback label still on screen, if any
    pub fn copy_label(&mut self, now: f64) -> Option<&'static str> {
        self.copy_feedback.current(now)
    }

    pub fn status(&self) -> AppStatus {
        AppStatus {
            initialized: self.layout_ready,
            generating: self.is_generating(),
            phase: self.sequence.phase(),
            tier: self.tier(),
            has_password: self.last_password.is_some(),
            particle_count: self.particles.len(),
        }
    }

    /// Back to a blank display at the Chill tier
    pub fn reset(&mut self, view: &mut dyn SequenceView) {
        self.sequence = SequenceController::new();
        self.last_password = None;
        self.copy_visible = false;
        self.copy_reveal_at = None;
        self.particles.clear();
        view.set_overlay(false);
        view.clear_helix();
        view.phase_changed(SequencePhase::Idle);
        view.set_display(DISPLAY_PLACEHOLDER);
        self.set_tier(ComplexityTier::Chill);
    }

    fn emit_trail(&mut self, pos: Vec2, now: f64) {
        if self.settings.effective_particles() && self.trail_throttle.ready(now) {
            self.particles.emit_trail(pos);
        }
    }

    /// Returns true if the sequence finished
    fn apply_events(&mut self, events: Result<Vec<SequenceEvent>>, now: f64) -> bool {
        let events = match events {
            Ok(events) => events,
            Err(e) => {
                log::error!("Sequence aborted: {e}");
                return true;
            }
        };

        let mut finished = false;
        for event in events {
            match event {
                SequenceEvent::Generated(password) => {
                    self.last_password = Some(password);
                }
                SequenceEvent::Finished => {
                    finished = true;
                    self.copy_reveal_at = Some(now + COPY_REVEAL_DELAY_MS);
                }
            }
        }
        finished
    }
}
