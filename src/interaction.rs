//! Pointer smoothing and background decoration response
//!
//! Input events only move the target. The smoothed position catches up by a
//! fixed fraction each frame, whatever rate the events arrive at.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::polar;

/// Where pointer input is coming from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputModality {
    Mouse,
    Touch,
}

impl InputModality {
    /// Initial guess from what the device advertises
    pub fn detect(has_touch_events: bool, max_touch_points: i32) -> Self {
        if has_touch_events || max_touch_points > 0 {
            InputModality::Touch
        } else {
            InputModality::Mouse
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Latest raw input position
    pub target: Vec2,
    /// Eased position, updated once per tick
    pub smoothed: Vec2,
    pub last_interaction_ms: f64,
}

/// How a decoration reacts to the pointer this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecorationEffect {
    None,
    /// Visual only, no translation
    Repelled,
    Attracted { offset: Vec2 },
}

impl DecorationEffect {
    /// Classify a decoration centred at `center` against the pointer
    pub fn for_center(pointer: Vec2, center: Vec2) -> Self {
        let strength = (1.0 - pointer.distance(center) / INTERACTION_RADIUS).max(0.0);
        if strength > ATTRACT_THRESHOLD {
            let to_pointer = pointer - center;
            let angle = to_pointer.y.atan2(to_pointer.x);
            DecorationEffect::Attracted {
                offset: polar(angle, strength * ATTRACT_PULL),
            }
        } else if strength > REPEL_THRESHOLD {
            DecorationEffect::Repelled
        } else {
            DecorationEffect::None
        }
    }

    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            DecorationEffect::None => None,
            DecorationEffect::Repelled => Some("repelled"),
            DecorationEffect::Attracted { .. } => Some("attracted"),
        }
    }
}

/// Output of one tracker tick
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerFrame {
    /// Smoothed pointer snapshot for this frame
    pub pointer: Vec2,
    pub highlight_visible: bool,
    /// One entry per decoration, same order as given
    pub effects: Vec<DecorationEffect>,
}

#[derive(Debug, Clone)]
pub struct InteractionTracker {
    pointer: PointerState,
    modality: InputModality,
    highlight_visible: bool,
    /// Pending hide after a touch ends
    touch_release_at: Option<f64>,
    paused: bool,
}

impl InteractionTracker {
    pub fn new(modality: InputModality) -> Self {
        Self {
            pointer: PointerState::default(),
            modality,
            highlight_visible: false,
            touch_release_at: None,
            paused: false,
        }
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn modality(&self) -> InputModality {
        self.modality
    }

    pub fn highlight_visible(&self) -> bool {
        self.highlight_visible
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Mouse movement. Ignored once the device has shown it is touch driven.
    pub fn pointer_moved(&mut self, pos: Vec2, now: f64) -> bool {
        if self.modality == InputModality::Touch {
            return false;
        }
        self.retarget(pos, now);
        self.highlight_visible = true;
        true
    }

    pub fn pointer_entered(&mut self) {
        self.highlight_visible = true;
    }

    pub fn pointer_left(&mut self) {
        self.highlight_visible = false;
    }

    pub fn touch_started(&mut self, pos: Vec2, now: f64) {
        self.modality = InputModality::Touch;
        self.touch_release_at = None;
        self.highlight_visible = true;
        self.retarget(pos, now);
    }

    pub fn touch_moved(&mut self, pos: Vec2, now: f64) {
        self.retarget(pos, now);
    }

    pub fn touch_ended(&mut self, now: f64) {
        self.touch_release_at = Some(now + TOUCH_RELEASE_MS);
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::debug!("Interaction tracker paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            log::debug!("Interaction tracker resumed");
        }
    }

    /// Ease the pointer and classify each decoration centre.
    /// Returns `None` while paused.
    pub fn tick(&mut self, now: f64, decorations: &[Vec2]) -> Option<TrackerFrame> {
        if self.paused {
            return None;
        }

        let p = &mut self.pointer;
        p.smoothed += (p.target - p.smoothed) * POINTER_SMOOTHING;

        if self.modality != InputModality::Touch
            && now - p.last_interaction_ms > INTERACTION_TIMEOUT_MS
        {
            self.highlight_visible = false;
        }
        if self.touch_release_at.is_some_and(|at| now >= at) {
            self.touch_release_at = None;
            self.highlight_visible = false;
        }

        let pointer = self.pointer.smoothed;
        Some(TrackerFrame {
            pointer,
            highlight_visible: self.highlight_visible,
            effects: decorations
                .iter()
                .map(|center| DecorationEffect::for_center(pointer, *center))
                .collect(),
        })
    }

    fn retarget(&mut self, pos: Vec2, now: f64) {
        self.pointer.target = pos;
        self.pointer.last_interaction_ms = now;
    }
}

/// Parallax offset for device tilt (`gamma` left-right, `beta` front-back)
pub fn tilt_offset(gamma: Option<f32>, beta: Option<f32>) -> Option<Vec2> {
    let (gamma, beta) = (gamma?, beta?);
    Some(Vec2::new(
        (gamma * TILT_FACTOR).clamp(-TILT_MAX_OFFSET, TILT_MAX_OFFSET),
        (beta * TILT_FACTOR).clamp(-TILT_MAX_OFFSET, TILT_MAX_OFFSET),
    ))
}
