//! DNA helix geometry for the generating phase
//!
//! Purely cosmetic. The sequence only says "draw at progress p"; this module
//! turns that into two strands and the rungs between them.

use std::f32::consts::PI;

use glam::Vec2;

const RADIUS: f32 = 40.0;
const HEIGHT: f32 = 80.0;
const STRAND_SEGMENTS: usize = 50;
const RUNGS: usize = 20;
/// Full turns of the strand over its height, in radians
const TWIST: f32 = 4.0 * PI;
/// Rotation over the whole animation, in radians
const SPIN: f32 = 8.0 * PI;

#[derive(Debug, Clone, PartialEq)]
pub struct HelixStrand {
    pub points: Vec<Vec2>,
    pub color: String,
}

/// One frame of the helix
#[derive(Debug, Clone, PartialEq)]
pub struct HelixFrame {
    pub strands: [HelixStrand; 2],
    pub rungs: Vec<(Vec2, Vec2)>,
    pub rung_color: String,
}

impl HelixFrame {
    /// Build the frame for `progress` in 0..=1, centred on `center`.
    pub fn at(progress: f32, center: Vec2) -> Self {
        let progress = progress.clamp(0.0, 1.0);
        let rotation = progress * SPIN;
        let strand_alpha = 0.8 * (1.0 - progress * 0.3);

        let strand = |offset: f32, rgb: &str| HelixStrand {
            points: (0..=STRAND_SEGMENTS)
                .map(|i| {
                    let t = i as f32 / STRAND_SEGMENTS as f32;
                    point(center, rotation + t * TWIST + offset, t)
                })
                .collect(),
            color: format!("rgba({rgb}, {strand_alpha:.3})"),
        };

        let rungs = (0..=RUNGS)
            .map(|i| {
                let t = i as f32 / RUNGS as f32;
                let angle = rotation + t * TWIST;
                (point(center, angle, t), point(center, angle + PI, t))
            })
            .collect();

        Self {
            strands: [strand(0.0, "0, 255, 255"), strand(PI, "255, 0, 255")],
            rungs,
            rung_color: format!("rgba(255, 255, 255, {:.3})", 0.4 * (1.0 - progress * 0.5)),
        }
    }
}

#[inline]
fn point(center: Vec2, angle: f32, t: f32) -> Vec2 {
    Vec2::new(center.x + angle.cos() * RADIUS, center.y + (t - 0.5) * HEIGHT)
}

/// Stroke-capable drawing target for the helix
pub trait HelixSurface {
    fn clear(&mut self);
    fn stroke_path(&mut self, points: &[Vec2], color: &str, width: f32);
}

pub fn draw_helix(frame: &HelixFrame, surface: &mut dyn HelixSurface) {
    surface.clear();
    for strand in &frame.strands {
        surface.stroke_path(&strand.points, &strand.color, 3.0);
    }
    for (a, b) in &frame.rungs {
        surface.stroke_path(&[*a, *b], &frame.rung_color, 2.0);
    }
}
