//! Per-tick particle physics.
//!
//! One call to [`step`] advances every particle by one tick:
//!
//! 1. Pointer repulsion with linear falloff inside the influence radius
//! 2. Integrate `position += velocity`
//! 3. Reflect velocity and clamp position on each axis that left the bounds
//! 4. Damp velocity by the friction factor (both axes alike)
//!
//! Opacity drift runs in the same pass since it touches the same particles.
//!
//! Velocity is never hard-limited. With friction below one, kinetic energy
//! strictly decays whenever the pointer is inactive; reflections flip signs
//! and never add energy.

use crate::particle::{Bounds, ParticleStore};
use crate::pointer::PointerState;
use serde::{Deserialize, Serialize};

/// Pointer closer than this to a particle gives no usable direction.
const MIN_PUSH_DISTANCE: f32 = 1e-4;

/// Tunables for [`step`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Maximum pointer distance that still pushes particles.
    pub influence_radius: f32,
    /// Velocity added per tick at the pointer center (falls to zero at the radius).
    pub repulsion: f32,
    /// Per-tick velocity multiplier, `< 1`.
    pub friction: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            influence_radius: 100.0,
            repulsion: 0.2,
            friction: 0.99,
        }
    }
}

/// Advance the store by one tick. Mutates in place.
pub fn step(store: &mut ParticleStore, pointer: &PointerState, bounds: Bounds, params: &PhysicsParams) {
    let [opacity_min, opacity_max] = store.opacity_range();
    let radius = params.influence_radius;
    let radius_sq = radius * radius;
    let repel_from = if radius > 0.0 { pointer.active_position() } else { None };

    for p in store.particles_mut() {
        if let Some(center) = repel_from {
            let offset = p.position - center;
            let dist_sq = offset.length_squared();
            if dist_sq < radius_sq {
                let dist = dist_sq.sqrt();
                if dist > MIN_PUSH_DISTANCE {
                    let falloff = (radius - dist) / radius;
                    p.velocity += (offset / dist) * falloff * params.repulsion;
                }
            }
        }

        p.position += p.velocity;

        // A zero-extent axis has nothing to reflect against; leave it alone.
        if bounds.width > 0.0 && (p.position.x < 0.0 || p.position.x > bounds.width) {
            p.velocity.x = -p.velocity.x;
            p.position.x = p.position.x.clamp(0.0, bounds.width);
        }
        if bounds.height > 0.0 && (p.position.y < 0.0 || p.position.y > bounds.height) {
            p.velocity.y = -p.velocity.y;
            p.position.y = p.position.y.clamp(0.0, bounds.height);
        }

        p.velocity *= params.friction;

        if p.opacity_drift != 0.0 {
            p.opacity += p.opacity_drift;
            if p.opacity <= opacity_min || p.opacity >= opacity_max {
                p.opacity_drift = -p.opacity_drift;
                p.opacity = p.opacity.clamp(opacity_min, opacity_max);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;
    use glam::Vec2;

    fn particle(position: Vec2, velocity: Vec2) -> Particle {
        Particle {
            position,
            velocity,
            radius: 2.0,
            color_class: 0,
            opacity: 0.5,
            opacity_drift: 0.0,
        }
    }

    #[test]
    fn test_integrates_and_damps() {
        let mut store = ParticleStore::from_particles(vec![particle(
            Vec2::new(10.0, 10.0),
            Vec2::new(1.0, -2.0),
        )]);
        step(&mut store, &PointerState::default(), Bounds::new(100.0, 100.0), &PhysicsParams::default());

        let p = store.particles()[0];
        assert_eq!(p.position, Vec2::new(11.0, 8.0));
        assert!((p.velocity - Vec2::new(0.99, -1.98)).length() < 1e-6);
    }

    #[test]
    fn test_reflects_and_clamps() {
        let mut store = ParticleStore::from_particles(vec![
            particle(Vec2::new(99.5, 50.0), Vec2::new(2.0, 0.0)),
            particle(Vec2::new(50.0, 0.5), Vec2::new(0.0, -3.0)),
        ]);
        let params = PhysicsParams { friction: 1.0, ..Default::default() };
        step(&mut store, &PointerState::default(), Bounds::new(100.0, 100.0), &params);

        let [a, b] = [store.particles()[0], store.particles()[1]];
        assert_eq!(a.position.x, 100.0);
        assert_eq!(a.velocity.x, -2.0);
        assert_eq!(b.position.y, 0.0);
        assert_eq!(b.velocity.y, 3.0);
    }

    #[test]
    fn test_zero_bounds_skip_reflection() {
        let mut store = ParticleStore::from_particles(vec![particle(Vec2::ZERO, Vec2::new(-1.0, -1.0))]);
        let params = PhysicsParams { friction: 1.0, ..Default::default() };
        step(&mut store, &PointerState::default(), Bounds::new(0.0, 0.0), &params);

        let p = store.particles()[0];
        assert_eq!(p.position, Vec2::new(-1.0, -1.0));
        assert_eq!(p.velocity, Vec2::new(-1.0, -1.0));
        assert!(p.position.is_finite());
    }

    #[test]
    fn test_pointer_on_particle_is_ignored() {
        let mut store = ParticleStore::from_particles(vec![particle(Vec2::new(50.0, 50.0), Vec2::ZERO)]);
        let mut pointer = PointerState::default();
        pointer.moved(50.0, 50.0);
        step(&mut store, &pointer, Bounds::new(100.0, 100.0), &PhysicsParams::default());

        let p = store.particles()[0];
        assert!(p.velocity.is_finite());
        assert_eq!(p.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_inactive_pointer_has_no_effect() {
        let mut store = ParticleStore::from_particles(vec![particle(Vec2::new(50.0, 50.0), Vec2::ZERO)]);
        let mut pointer = PointerState::default();
        pointer.moved(60.0, 50.0);
        pointer.left();
        step(&mut store, &pointer, Bounds::new(100.0, 100.0), &PhysicsParams::default());
        assert_eq!(store.particles()[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_opacity_drift_stays_in_range() {
        let mut p = particle(Vec2::new(5.0, 5.0), Vec2::ZERO);
        p.opacity = 0.69;
        p.opacity_drift = 0.05;
        let mut store = ParticleStore::from_particles(vec![p]);
        let bounds = Bounds::new(10.0, 10.0);
        for _ in 0..100 {
            step(&mut store, &PointerState::default(), bounds, &PhysicsParams::default());
            let o = store.particles()[0].opacity;
            assert!((0.2..=0.7).contains(&o), "opacity {o} left range");
        }
    }

    #[test]
    fn test_empty_store_is_noop() {
        let mut store = ParticleStore::default();
        step(&mut store, &PointerState::default(), Bounds::new(10.0, 10.0), &PhysicsParams::default());
        assert!(store.is_empty());
    }
}
