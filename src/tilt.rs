//! Pointer-driven tilt of the whole canvas.
//!
//! The pointer's offset from the surface center picks a target rotation;
//! both angles chase it through springs so the canvas leans smoothly.

use crate::particle::Bounds;
use crate::pointer::{PointerState, Spring, SpringConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Rotation at full deflection, in degrees.
    pub max_degrees: f32,
    /// Pointer offset (pixels from center) that gives full deflection.
    pub range: f32,
    pub spring: SpringConfig,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_degrees: 15.0,
            range: 100.0,
            spring: SpringConfig::TILT,
        }
    }
}

/// Spring-smoothed tilt angles.
#[derive(Debug, Clone)]
pub struct Tilt {
    config: TiltConfig,
    rotate_x: Spring<f32>,
    rotate_y: Spring<f32>,
}

impl Tilt {
    pub fn new(config: TiltConfig) -> Self {
        Self {
            config,
            rotate_x: Spring::new(0.0, config.spring),
            rotate_y: Spring::new(0.0, config.spring),
        }
    }

    /// Target angles for a pointer position: pointer below center tips the top
    /// edge away (negative X rotation), pointer right of center turns toward
    /// positive Y rotation.
    pub fn target_for(&self, pointer: &PointerState, bounds: Bounds) -> (f32, f32) {
        let Some(position) = pointer.active_position() else {
            return (0.0, 0.0);
        };
        let range = self.config.range;
        if range <= 0.0 {
            return (0.0, 0.0);
        }
        let offset = position - bounds.center();
        let nx = (offset.x / range).clamp(-1.0, 1.0);
        let ny = (offset.y / range).clamp(-1.0, 1.0);
        let max = self.config.max_degrees;
        (-ny * max, nx * max)
    }

    /// Advance both springs and return `(rotate_x, rotate_y)` in degrees.
    pub fn update(&mut self, pointer: &PointerState, bounds: Bounds, dt: f32) -> (f32, f32) {
        let (tx, ty) = self.target_for(pointer, bounds);
        self.rotate_x.target = tx;
        self.rotate_y.target = ty;
        (self.rotate_x.update(dt), self.rotate_y.update(dt))
    }

    pub fn angles(&self) -> (f32, f32) {
        (self.rotate_x.value, self.rotate_y.value)
    }
}
