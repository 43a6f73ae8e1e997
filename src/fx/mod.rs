//! Visual effects
//!
//! Simulation of the particle field plus the helix geometry. Drawing goes
//! through small surface traits so the browser canvas is only one backend.

pub mod helix;
pub mod particles;

pub use helix::{HelixFrame, HelixSurface, draw_helix};
pub use particles::{Particle, ParticleColor, ParticleField, ParticleSurface};
