//! Particle state and the fixed-size store that owns it.
//!
//! The store is allocated once when the engine starts and never resized.
//! Surface resizes only change the [`Bounds`] used for reflection and clamping.

use crate::spawn::SpawnContext;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Drawing-surface extent in pixels. The simulation space is
/// `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Whether the bounds have no drawable area on either axis.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

/// One simulated point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Drawn radius in pixels, fixed at creation.
    pub radius: f32,
    /// Index into the palette, fixed at creation.
    pub color_class: u8,
    /// Current opacity, drifts slowly inside the configured range.
    pub opacity: f32,
    /// Per-tick opacity change; flips sign at the edges of the range.
    pub opacity_drift: f32,
}

impl Particle {
    /// Squared speed, the per-particle kinetic energy up to a constant.
    #[inline]
    pub fn energy(&self) -> f32 {
        self.velocity.length_squared()
    }
}

/// Ranges used when filling a fresh store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Per-axis initial velocity is drawn from `[-initial_speed, initial_speed)`.
    pub initial_speed: f32,
    /// Radius range `[min, max)` in pixels.
    pub radius: [f32; 2],
    /// Opacity range `[min, max)`.
    pub opacity: [f32; 2],
    /// Maximum per-tick opacity drift.
    pub opacity_drift: f32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            initial_speed: 0.25,
            radius: [1.0, 4.0],
            opacity: [0.2, 0.7],
            opacity_drift: 0.002,
        }
    }
}

/// Fixed-size particle array, owned by the engine.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    opacity_range: [f32; 2],
}

impl ParticleStore {
    /// Create `count` particles spread uniformly over `ctx.bounds`.
    ///
    /// `color_classes` is the palette length; classes are drawn uniformly
    /// from `0..color_classes`. A count of zero gives an empty, inert store.
    pub fn initialize(
        count: usize,
        ctx: &mut SpawnContext,
        settings: &SpawnSettings,
        color_classes: usize,
    ) -> Self {
        let [opacity_min, opacity_max] = settings.opacity;
        let [radius_min, radius_max] = settings.radius;

        let particles = (0..count)
            .map(|_| Particle {
                position: ctx.random_in_bounds(),
                velocity: ctx.random_velocity(settings.initial_speed),
                radius: ctx.random_range(radius_min..radius_max),
                color_class: ctx.random_index(color_classes).min(u8::MAX as usize) as u8,
                opacity: ctx.random_range(opacity_min..opacity_max),
                opacity_drift: ctx.random_range(-settings.opacity_drift..settings.opacity_drift),
            })
            .collect();

        Self {
            particles,
            opacity_range: settings.opacity,
        }
    }

    /// Wrap an existing particle list. Used by tests and benchmarks to set up
    /// exact layouts.
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self {
            particles,
            opacity_range: SpawnSettings::default().opacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for the physics step. Length is fixed.
    #[inline]
    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    #[inline]
    pub fn opacity_range(&self) -> [f32; 2] {
        self.opacity_range
    }

    /// Sum of squared speeds over all particles.
    pub fn total_energy(&self) -> f32 {
        self.particles.iter().map(Particle::energy).sum()
    }
}
