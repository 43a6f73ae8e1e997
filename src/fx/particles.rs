//! Particle field for trails, bursts and explosions
//!
//! Particles step once per animation frame (not per second): position moves
//! by velocity, velocity is damped, life drains by the particle's decay.

use std::borrow::Cow;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::sequence::CharacterRevealSink;
use crate::{Rect, polar};

/// Particle fill colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleColor {
    White,
    /// Saturated pastel at the given hue (degrees)
    Hsl { hue: u16 },
}

impl ParticleColor {
    pub fn css(&self) -> Cow<'static, str> {
        match self {
            ParticleColor::White => Cow::Borrowed("white"),
            ParticleColor::Hsl { hue } => Cow::Owned(format!("hsl({hue}, 100%, 70%)")),
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, drains by `decay` each tick
    pub life: f32,
    pub decay: f32,
    pub size: f32,
    pub brightness: f32,
    pub color: ParticleColor,
}

impl Particle {
    fn white(pos: Vec2, vel: Vec2, decay: f32, size: f32, brightness: f32) -> Self {
        Self {
            pos,
            vel,
            life: 1.0,
            decay,
            size,
            brightness,
            color: ParticleColor::White,
        }
    }

    /// Advance one frame. Returns false once the particle is spent.
    #[inline]
    fn step(&mut self) -> bool {
        self.pos += self.vel;
        self.vel *= PARTICLE_DAMPING;
        self.life -= self.decay;
        self.life > 0.0
    }
}

/// Something particles can be drawn onto
pub trait ParticleSurface {
    fn clear(&mut self);
    /// Filled circle with a shadow glow
    fn fill_glow_circle(&mut self, center: Vec2, radius: f32, alpha: f32, blur: f32, color: &str);
}

#[derive(Debug, Clone, Copy)]
struct PendingWave {
    due_ms: f64,
    origin: Vec2,
}

/// Owns every live particle
pub struct ParticleField {
    particles: Vec<Particle>,
    pending_waves: Vec<PendingWave>,
    rng: Pcg32,
    trail_ceiling: usize,
    running: bool,
    /// Where revealed characters sit on screen
    reveal_bounds: Rect,
}

impl ParticleField {
    pub fn new(seed: u64, trail_ceiling: usize) -> Self {
        Self {
            particles: Vec::new(),
            pending_waves: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            trail_ceiling,
            running: true,
            reveal_bounds: Rect::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            log::debug!("Particle loop started");
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            log::debug!("Particle loop stopped ({} live)", self.particles.len());
        }
    }

    /// Update where the password display sits, for character bursts
    pub fn set_reveal_bounds(&mut self, bounds: Rect) {
        self.reveal_bounds = bounds;
    }

    /// Step every particle and release explosion waves that came due.
    /// Does nothing while stopped.
    pub fn tick(&mut self, now_ms: f64) {
        if !self.running {
            return;
        }

        let mut due = Vec::new();
        self.pending_waves.retain(|wave| {
            if wave.due_ms <= now_ms {
                due.push(wave.origin);
                false
            } else {
                true
            }
        });
        for origin in due {
            self.spawn_explosion_wave(origin);
        }

        self.particles.retain_mut(Particle::step);
    }

    /// Draw survivors, alpha and radius scaled by remaining life
    pub fn render(&self, surface: &mut dyn ParticleSurface) {
        surface.clear();
        for p in &self.particles {
            surface.fill_glow_circle(
                p.pos,
                p.size * p.life,
                p.life,
                GLOW_PER_BRIGHTNESS * p.brightness,
                &p.color.css(),
            );
        }
    }

    /// Pointer trail. Refused once the field is over the ceiling.
    pub fn emit_trail(&mut self, pos: Vec2) -> bool {
        if self.particles.len() > self.trail_ceiling {
            return false;
        }

        for _ in 0..3 {
            let jitter = Vec2::new(self.spread(10.0), self.spread(10.0));
            let vel = Vec2::new(self.spread(1.0), self.spread(1.0));
            let decay = 0.02 + self.rng.random::<f32>() * 0.02;
            let size = 1.0 + self.rng.random::<f32>() * 3.0;
            self.particles.push(Particle::white(pos + jitter, vel, decay, size, 1.0));
        }
        true
    }

    /// Evenly spaced ring for a click on empty space
    pub fn emit_click_burst(&mut self, pos: Vec2) {
        const COUNT: usize = 20;
        for i in 0..COUNT {
            let angle = i as f32 / COUNT as f32 * TAU;
            let speed = 2.0 + self.rng.random::<f32>() * 4.0;
            let size = 2.0 + self.rng.random::<f32>() * 5.0;
            self.particles.push(Particle::white(pos, polar(angle, speed), 0.015, size, 1.5));
        }
    }

    /// Big multi-wave blast. The first wave lands now, the rest follow
    /// `EXPLOSION_WAVE_MS` apart on later ticks.
    pub fn emit_explosion(&mut self, pos: Vec2, now_ms: f64) {
        self.spawn_explosion_wave(pos);
        for wave in 1..EXPLOSION_WAVES {
            self.pending_waves.push(PendingWave {
                due_ms: now_ms + wave as f64 * EXPLOSION_WAVE_MS,
                origin: pos,
            });
        }
    }

    /// Small cyan-blue burst over the `index`-th of `total` character cells
    pub fn emit_character_burst(&mut self, index: usize, total: usize, bounds: Rect) {
        if total == 0 {
            return;
        }
        let cell = bounds.width / total as f32;
        let origin = Vec2::new(
            bounds.left + index as f32 * cell + cell / 2.0,
            bounds.top + bounds.height / 2.0,
        );

        const COUNT: usize = 8;
        for i in 0..COUNT {
            let angle = i as f32 / COUNT as f32 * TAU;
            let speed = 1.0 + self.rng.random::<f32>() * 2.0;
            let size = 1.0 + self.rng.random::<f32>() * 2.0;
            let hue = self.rng.random_range(180..=240);
            self.particles.push(Particle {
                pos: origin,
                vel: polar(angle, speed),
                life: 1.0,
                decay: 0.03,
                size,
                brightness: 2.0,
                color: ParticleColor::Hsl { hue },
            });
        }
    }

    /// Drop every particle and any waves still queued
    pub fn clear(&mut self) {
        self.particles.clear();
        self.pending_waves.clear();
    }

    fn spawn_explosion_wave(&mut self, origin: Vec2) {
        for _ in 0..30 {
            let angle = self.rng.random::<f32>() * TAU;
            let speed = 5.0 + self.rng.random::<f32>() * 10.0;
            let size = 2.0 + self.rng.random::<f32>() * 8.0;
            let decay = 0.008 + self.rng.random::<f32>() * 0.012;
            let brightness = 2.0 + self.rng.random::<f32>();
            self.particles.push(Particle::white(
                origin,
                polar(angle, speed),
                decay,
                size,
                brightness,
            ));
        }
    }

    /// Uniform in `-half..half`
    #[inline]
    fn spread(&mut self, half: f32) -> f32 {
        (self.rng.random::<f32>() - 0.5) * 2.0 * half
    }
}

impl CharacterRevealSink for ParticleField {
    fn character_revealed(&mut self, index: usize, total: usize) {
        let bounds = self.reveal_bounds;
        self.emit_character_burst(index, total, bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSurface {
        clears: usize,
        circles: Vec<(Vec2, f32, f32, f32, String)>,
    }

    impl ParticleSurface for RecordingSurface {
        fn clear(&mut self) {
            self.clears += 1;
        }

        fn fill_glow_circle(
            &mut self,
            center: Vec2,
            radius: f32,
            alpha: f32,
            blur: f32,
            color: &str,
        ) {
            self.circles.push((center, radius, alpha, blur, color.to_string()));
        }
    }

    #[test]
    fn test_trail_refused_over_ceiling() {
        let mut field = ParticleField::new(1, MAX_TRAIL_PARTICLES);
        while field.emit_trail(Vec2::new(10.0, 10.0)) {}
        let capped = field.len();
        assert!(capped > MAX_TRAIL_PARTICLES);
        assert!(capped <= MAX_TRAIL_PARTICLES + 3);

        assert!(!field.emit_trail(Vec2::ZERO));
        assert_eq!(field.len(), capped);

        // Bursts and explosions ignore the ceiling
        field.emit_click_burst(Vec2::ZERO);
        assert_eq!(field.len(), capped + 20);
        field.emit_explosion(Vec2::ZERO, 0.0);
        assert_eq!(field.len(), capped + 20 + 30);
    }

    #[test]
    fn test_explosion_waves_arrive_over_time() {
        let mut field = ParticleField::new(2, MAX_TRAIL_PARTICLES);
        field.emit_explosion(Vec2::new(100.0, 100.0), 1000.0);
        assert_eq!(field.len(), 30);

        field.tick(1100.0);
        assert_eq!(field.len(), 30);
        field.tick(1150.0);
        assert_eq!(field.len(), 60);
        field.tick(1450.0);
        assert_eq!(field.len(), 120);
    }

    #[test]
    fn test_click_burst_ring_spacing() {
        let mut field = ParticleField::new(3, MAX_TRAIL_PARTICLES);
        field.emit_click_burst(Vec2::ZERO);
        for (i, p) in field.particles().iter().enumerate() {
            let expected = i as f32 / 20.0 * TAU;
            let angle = p.vel.y.atan2(p.vel.x).rem_euclid(TAU);
            assert!((angle - expected).abs() < 1e-4 || (angle - expected).abs() > TAU - 1e-4);
            let speed = p.vel.length();
            assert!((2.0..=6.0).contains(&speed));
        }
    }

    #[test]
    fn test_particle_step_and_removal() {
        let mut field = ParticleField::new(4, MAX_TRAIL_PARTICLES);
        field.emit_click_burst(Vec2::ZERO);
        let before = field.particles()[0].clone();
        field.tick(0.0);
        let after = &field.particles()[0];
        assert_eq!(after.pos, before.pos + before.vel);
        assert_eq!(after.vel, before.vel * PARTICLE_DAMPING);
        assert!((after.life - (1.0 - 0.015)).abs() < 1e-6);

        // 0.015 decay dies within 67 ticks
        for _ in 0..70 {
            field.tick(0.0);
        }
        assert!(field.is_empty());
    }

    #[test]
    fn test_character_burst_position_and_colour() {
        let mut field = ParticleField::new(5, MAX_TRAIL_PARTICLES);
        let bounds = Rect::new(100.0, 50.0, 200.0, 40.0);
        field.emit_character_burst(2, 10, bounds);
        assert_eq!(field.len(), 8);
        for p in field.particles() {
            assert_eq!(p.pos, Vec2::new(150.0, 70.0));
            assert_eq!(p.decay, 0.03);
            match p.color {
                ParticleColor::Hsl { hue } => assert!((180..=240).contains(&hue)),
                ParticleColor::White => panic!("burst should be tinted"),
            }
        }
    }

    #[test]
    fn test_sink_uses_reveal_bounds() {
        let mut field = ParticleField::new(6, MAX_TRAIL_PARTICLES);
        field.set_reveal_bounds(Rect::new(0.0, 0.0, 100.0, 20.0));
        field.character_revealed(0, 4);
        assert_eq!(field.particles()[0].pos, Vec2::new(12.5, 10.0));
    }

    #[test]
    fn test_stopped_field_does_not_tick() {
        let mut field = ParticleField::new(7, MAX_TRAIL_PARTICLES);
        field.emit_click_burst(Vec2::ZERO);
        let snapshot = field.particles().to_vec();
        field.stop();
        field.tick(0.0);
        assert_eq!(field.particles(), snapshot.as_slice());
        field.start();
        field.tick(0.0);
        assert_ne!(field.particles(), snapshot.as_slice());
    }

    #[test]
    fn test_render_scales_by_life() {
        let mut field = ParticleField::new(8, MAX_TRAIL_PARTICLES);
        field.emit_click_burst(Vec2::ZERO);
        field.tick(0.0);
        let mut surface = RecordingSurface::default();
        field.render(&mut surface);
        assert_eq!(surface.clears, 1);
        assert_eq!(surface.circles.len(), 20);
        let p = &field.particles()[0];
        let (_, radius, alpha, blur, color) = &surface.circles[0];
        assert_eq!(*radius, p.size * p.life);
        assert_eq!(*alpha, p.life);
        assert_eq!(*blur, 30.0);
        assert_eq!(color, "white");
    }

    #[test]
    fn test_clear_drops_pending_waves() {
        let mut field = ParticleField::new(9, MAX_TRAIL_PARTICLES);
        field.emit_explosion(Vec2::ZERO, 0.0);
        field.clear();
        field.tick(1000.0);
        assert!(field.is_empty());
    }
}
