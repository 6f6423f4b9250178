//! Pooled sparks shed by the pointer.
//!
//! A fixed pool of short-lived particles. Dead slots are revived at the
//! pointer, live ones drift and age out. Drawing groups sparks by colour class
//! and alpha step and issues one halo batch plus one core batch per non-empty
//! group, so the draw-call count does not depend on how many sparks are alive.

use crate::pointer::PointerState;
use crate::spawn::SpawnContext;
use crate::surface::{Circle, Surface};
use crate::visuals::Palette;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Spark pool settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkConfig {
    /// Pool size; never grows.
    pub capacity: usize,
    /// Slots revived per tick while the pointer is active.
    pub per_tick: usize,
    /// Lifetime in ticks.
    pub life: u32,
    /// Per-axis launch velocity range `[-speed, speed)`.
    pub speed: f32,
    pub radius: f32,
    /// Number of alpha levels sparks are grouped into.
    pub alpha_steps: usize,
    pub max_alpha: f32,
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self {
            capacity: 150,
            per_tick: 2,
            life: 100,
            speed: 0.5,
            radius: 2.0,
            alpha_steps: 4,
            max_alpha: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Spark {
    active: bool,
    position: Vec2,
    velocity: Vec2,
    color_class: u8,
    life: u32,
}

/// Fixed-capacity spark emitter.
pub struct SparkPool {
    config: SparkConfig,
    sparks: Vec<Spark>,
    /// Reused draw batches, `colour * alpha_steps + step`.
    batches: Vec<Vec<Circle>>,
    halos: Vec<Circle>,
    spawn: SpawnContext,
}

impl SparkPool {
    pub fn new(config: SparkConfig, spawn: SpawnContext) -> Self {
        Self {
            config,
            sparks: vec![Spark::default(); config.capacity],
            batches: Vec::new(),
            halos: Vec::new(),
            spawn,
        }
    }

    /// Revive slots at the pointer, then age and move every live spark.
    pub fn update(&mut self, pointer: &PointerState, palette_len: usize) {
        if let Some(origin) = pointer.active_position() {
            let mut revived = 0;
            for spark in self.sparks.iter_mut().filter(|s| !s.active) {
                if revived == self.config.per_tick {
                    break;
                }
                *spark = Spark {
                    active: true,
                    position: origin,
                    velocity: self.spawn.random_velocity(self.config.speed),
                    color_class: self.spawn.random_index(palette_len) as u8,
                    life: self.config.life,
                };
                revived += 1;
            }
        }

        for spark in self.sparks.iter_mut().filter(|s| s.active) {
            spark.position += spark.velocity;
            spark.life = spark.life.saturating_sub(1);
            if spark.life == 0 {
                spark.active = false;
            }
        }
    }

    /// Draw live sparks in colour/alpha batches.
    pub fn draw(&mut self, surface: &mut dyn Surface, palette: &Palette) {
        let steps = self.config.alpha_steps.max(1);
        let group_count = palette.len() * steps;
        if self.batches.len() != group_count {
            self.batches.resize_with(group_count, Vec::new);
        }
        for batch in &mut self.batches {
            batch.clear();
        }

        let max_life = self.config.life.max(1) as f32;
        for spark in self.sparks.iter().filter(|s| s.active) {
            let remaining = spark.life as f32 / max_life;
            let step = ((remaining * steps as f32) as usize).min(steps - 1);
            let color = spark.color_class as usize % palette.len();
            self.batches[color * steps + step].push(Circle {
                center: spark.position,
                radius: self.config.radius,
            });
        }

        for (group, batch) in self.batches.iter().enumerate() {
            if batch.is_empty() {
                continue;
            }
            let color = palette.color((group / steps) as u8);
            let alpha = ((group % steps) + 1) as f32 / steps as f32 * self.config.max_alpha;

            self.halos.clear();
            self.halos.extend(batch.iter().map(|c| Circle {
                center: c.center,
                radius: c.radius * 2.0,
            }));
            surface.fill_circles(&self.halos, color, alpha * 0.3);
            surface.fill_circles(batch, color, alpha);
        }
    }

    /// Number of live sparks.
    pub fn active_count(&self) -> usize {
        self.sparks.iter().filter(|s| s.active).count()
    }

    pub fn capacity(&self) -> usize {
        self.sparks.len()
    }
}
