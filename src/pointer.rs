//! Pointer state and spring smoothing.
//!
//! The scheduler owns a single [`PointerState`]; move events overwrite it
//! (coalesced, never queued) and a leave event marks it inactive. The physics
//! step only reads it.

use std::ops::{Add, AddAssign, Mul, Sub};

use glam::Vec2;

use crate::time::MAX_DELTA;

/// Most recent pointer coordinate relative to the surface origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub position: Vec2,
    /// Whether the pointer is currently over the surface.
    pub active: bool,
}

impl PointerState {
    /// Record a move. The pointer becomes active.
    #[inline]
    pub fn moved(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
        self.active = true;
    }

    /// Record the pointer leaving the surface. The last position is kept.
    #[inline]
    pub fn left(&mut self) {
        self.active = false;
    }

    /// Back to the mount-time default: origin, inactive.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Position if active.
    #[inline]
    pub fn active_position(&self) -> Option<Vec2> {
        self.active.then_some(self.position)
    }
}

/// Damped spring parameters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    /// Snappy follow used for the cursor trail head.
    pub const CURSOR: SpringConfig = SpringConfig {
        stiffness: 300.0,
        damping: 25.0,
        mass: 0.5,
    };

    /// Looser follow used for the cursor ring.
    pub const RING: SpringConfig = SpringConfig {
        stiffness: 200.0,
        damping: 30.0,
        mass: 1.0,
    };

    /// Softer spring used for tilt angles.
    pub const TILT: SpringConfig = SpringConfig {
        stiffness: 150.0,
        damping: 15.0,
        mass: 1.0,
    };
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::CURSOR
    }
}

/// Largest sub-step used when integrating springs.
const MAX_SPRING_STEP: f32 = 1.0 / 120.0;

/// A value that chases a target through a damped spring.
///
/// Integrated with semi-implicit Euler in sub-steps of at most
/// `MAX_SPRING_STEP` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring<T> {
    pub value: T,
    pub velocity: T,
    pub target: T,
    pub config: SpringConfig,
}

impl<T> Spring<T>
where
    T: Copy + Default + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T> + AddAssign,
{
    pub fn new(value: T, config: SpringConfig) -> Self {
        Self {
            value,
            velocity: T::default(),
            target: value,
            config,
        }
    }

    /// Advance by `dt` seconds and return the new value.
    ///
    /// `dt` is clamped to [`MAX_DELTA`], so a long stall costs at most a
    /// handful of sub-steps.
    pub fn update(&mut self, dt: f32) -> T {
        if dt.is_nan() || dt <= 0.0 {
            return self.value;
        }
        let dt = dt.min(MAX_DELTA);
        let SpringConfig {
            stiffness,
            damping,
            mass,
        } = self.config;
        let mass = mass.max(f32::EPSILON);
        let steps = (dt / MAX_SPRING_STEP).ceil().max(1.0);
        let h = dt / steps;
        for _ in 0..steps as u32 {
            let force = (self.target - self.value) * stiffness - self.velocity * damping;
            self.velocity += force * (h / mass);
            self.value += self.velocity * h;
        }
        self.value
    }

    /// Jump to `value` with no motion.
    pub fn snap(&mut self, value: T) {
        self.value = value;
        self.target = value;
        self.velocity = T::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_lifecycle() {
        let mut pointer = PointerState::default();
        assert!(!pointer.active);
        assert_eq!(pointer.active_position(), None);

        pointer.moved(10.0, 20.0);
        assert_eq!(pointer.active_position(), Some(Vec2::new(10.0, 20.0)));

        // Coalesced: only the latest move survives
        pointer.moved(30.0, 40.0);
        assert_eq!(pointer.position, Vec2::new(30.0, 40.0));

        pointer.left();
        assert!(!pointer.active);
        assert_eq!(pointer.position, Vec2::new(30.0, 40.0));

        pointer.reset();
        assert_eq!(pointer, PointerState::default());
    }

    #[test]
    fn test_spring_converges() {
        let mut spring = Spring::new(Vec2::ZERO, SpringConfig::CURSOR);
        spring.target = Vec2::new(100.0, -50.0);
        for _ in 0..240 {
            spring.update(1.0 / 60.0);
        }
        assert!((spring.value - spring.target).length() < 0.5);
    }

    #[test]
    fn test_spring_snap() {
        let mut spring = Spring::new(0.0f32, SpringConfig::TILT);
        spring.target = 10.0;
        spring.update(0.016);
        spring.snap(3.0);
        assert_eq!(spring.value, 3.0);
        assert_eq!(spring.velocity, 0.0);
        assert_eq!(spring.update(0.016), 3.0);
    }

    #[test]
    fn test_spring_long_stall_matches_clamped_step() {
        let mut stalled = Spring::new(Vec2::ZERO, SpringConfig::CURSOR);
        stalled.target = Vec2::new(40.0, 0.0);
        let mut clamped = stalled;

        stalled.update(1.0e9);
        clamped.update(MAX_DELTA);
        assert_eq!(stalled, clamped);
        assert!(stalled.value.is_finite());
    }

    #[test]
    fn test_spring_ignores_nan_delta() {
        let mut spring = Spring::new(1.0f32, SpringConfig::TILT);
        spring.target = 5.0;
        assert_eq!(spring.update(f32::NAN), 1.0);
    }
}
