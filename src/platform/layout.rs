//! Placement for the DOM-side effects

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::polar;

/// Dots scattered over the overlay while it is active
pub const QUANTUM_DOTS: usize = 20;
/// Sparkles ringed around the generate button
pub const SPARKLES: usize = 15;
/// Sparkle lifetime, also the removal delay (ms)
pub const SPARKLE_MS: i32 = 1500;
/// Shockwave and ripple lifetime (ms)
pub const SHOCKWAVE_MS: i32 = 800;
/// Screen flash holds, then fades for `SHOCKWAVE_MS` (ms)
pub const FLASH_HOLD_MS: i32 = 100;

/// One overlay dot, positioned in percent of its container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantumDot {
    pub left_pct: f32,
    pub top_pct: f32,
    pub delay_s: f32,
    pub duration_s: f32,
}

pub fn scatter_quantum_dots<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<QuantumDot> {
    (0..count)
        .map(|_| QuantumDot {
            left_pct: rng.random::<f32>() * 100.0,
            top_pct: rng.random::<f32>() * 100.0,
            delay_s: rng.random::<f32>() * 3.0,
            duration_s: 2.0 + rng.random::<f32>() * 2.0,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sparkle {
    pub pos: Vec2,
    pub delay_s: f32,
}

/// Evenly spaced ring, 80-140 px out from `center`
pub fn sparkle_ring<R: Rng + ?Sized>(rng: &mut R, center: Vec2, count: usize) -> Vec<Sparkle> {
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU;
            let distance = 80.0 + rng.random::<f32>() * 60.0;
            Sparkle {
                pos: center + polar(angle, distance),
                delay_s: rng.random::<f32>() * 0.5,
            }
        })
        .collect()
}

/// Backing-store size for a canvas of the given CSS size
pub fn backing_size(css_width: f64, css_height: f64, dpr: f64) -> (u32, u32) {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    (
        (css_width.max(0.0) * dpr).round() as u32,
        (css_height.max(0.0) * dpr).round() as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_quantum_dots_in_range() {
        let mut rng = Pcg32::seed_from_u64(11);
        let dots = scatter_quantum_dots(&mut rng, QUANTUM_DOTS);
        assert_eq!(dots.len(), 20);
        for dot in dots {
            assert!((0.0..100.0).contains(&dot.left_pct));
            assert!((0.0..100.0).contains(&dot.top_pct));
            assert!((0.0..3.0).contains(&dot.delay_s));
            assert!((2.0..4.0).contains(&dot.duration_s));
        }
    }

    #[test]
    fn test_sparkle_ring_distance() {
        let mut rng = Pcg32::seed_from_u64(12);
        let center = Vec2::new(400.0, 300.0);
        let ring = sparkle_ring(&mut rng, center, SPARKLES);
        assert_eq!(ring.len(), 15);
        for s in &ring {
            let d = s.pos.distance(center);
            assert!((79.9..=140.1).contains(&d), "distance {d}");
            assert!(s.delay_s < 0.5);
        }
        // First sparkle sits straight right of centre
        assert!((ring[0].pos.y - center.y).abs() < 1e-3);
        assert!(ring[0].pos.x > center.x);
    }

    #[test]
    fn test_backing_size() {
        assert_eq!(backing_size(800.0, 600.0, 2.0), (1600, 1200));
        assert_eq!(backing_size(801.5, 10.0, 1.0), (802, 10));
        assert_eq!(backing_size(100.0, 100.0, 0.0), (100, 100));
        assert_eq!(backing_size(-5.0, 10.0, 1.0), (0, 10));
    }
}
