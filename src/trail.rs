//! Cursor trail: a short comet of fading circles following the pointer.
//!
//! The head chases the pointer through a spring; each frame every point takes
//! the previous position of the point ahead of it. Points live in a fixed
//! array that is rewritten in place.
//!
//! With `cursor_marker` set, a solid dot rides on the head spring and a thin
//! ring chases the pointer through its own, looser spring.

use crate::graph::Segment;
use crate::pointer::{PointerState, Spring, SpringConfig};
use crate::surface::Surface;
use crate::visuals::hsl_to_rgb;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Trail settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Number of points, head included.
    pub length: usize,
    /// Hue of the head in degrees; the tail spans `hue_span` more.
    pub hue_start: f32,
    pub hue_span: f32,
    /// Head follow spring.
    pub spring: SpringConfig,
    /// Draw the cursor dot and outer ring.
    pub cursor_marker: bool,
    /// Outer ring follow spring.
    pub ring_spring: SpringConfig,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            length: 12,
            hue_start: 160.0,
            hue_span: 100.0,
            spring: SpringConfig::CURSOR,
            cursor_marker: true,
            ring_spring: SpringConfig::RING,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct TrailPoint {
    position: Vec2,
    opacity: f32,
}

/// Points closest to the head that also get a soft glow.
const GLOW_POINTS: usize = 3;

pub const DOT_RADIUS: f32 = 6.0;
pub const RING_RADIUS: f32 = 16.0;
const RING_ALPHA: f32 = 0.3;
const RING_SEGMENTS: usize = 32;
const MARKER_COLOR: Vec3 = Vec3::ONE;

/// Spring-smoothed pointer trail.
#[derive(Debug, Clone)]
pub struct Trail {
    config: TrailConfig,
    points: Vec<TrailPoint>,
    head: Spring<Vec2>,
    ring: Spring<Vec2>,
    /// Reused ring outline.
    ring_segments: Vec<Segment>,
    visible: bool,
    primed: bool,
}

impl Trail {
    pub fn new(config: TrailConfig) -> Self {
        Self {
            config,
            points: vec![TrailPoint::default(); config.length],
            head: Spring::new(Vec2::ZERO, config.spring),
            ring: Spring::new(Vec2::ZERO, config.ring_spring),
            ring_segments: Vec::with_capacity(RING_SEGMENTS),
            visible: false,
            primed: false,
        }
    }

    /// Advance the head spring and shift points toward the tail.
    pub fn update(&mut self, pointer: &PointerState, dt: f32) {
        let Some(target) = pointer.active_position() else {
            self.visible = false;
            self.primed = false;
            return;
        };

        // First sighting: start collapsed at the pointer instead of sweeping
        // in from wherever the trail was last seen.
        if !self.primed {
            self.head.snap(target);
            self.ring.snap(target);
            for point in &mut self.points {
                point.position = target;
            }
            self.primed = true;
        }

        self.visible = true;
        self.head.target = target;
        let head = self.head.update(dt);
        self.ring.target = target;
        self.ring.update(dt);

        let len = self.points.len();
        for i in (1..len).rev() {
            self.points[i].position = self.points[i - 1].position;
            self.points[i].opacity = 1.0 - i as f32 / len as f32;
        }
        if let Some(first) = self.points.first_mut() {
            first.position = head;
            first.opacity = 1.0;
        }
    }

    /// Draw the ring, then the points tail first, then the dot, so the head
    /// and dot end on top.
    pub fn draw(&mut self, surface: &mut dyn Surface) {
        if !self.visible {
            return;
        }
        if self.config.cursor_marker {
            outline_circle(&mut self.ring_segments, self.ring.value, RING_RADIUS);
            surface.stroke_segments(&self.ring_segments, MARKER_COLOR, RING_ALPHA, 1.0);
        }
        let len = self.points.len() as f32;
        for (i, point) in self.points.iter().enumerate().rev() {
            let t = i as f32 / len;
            let radius = (1.0 - t) * 8.0 + 2.0;
            let alpha = point.opacity * 0.6;
            let hue = self.config.hue_start + t * self.config.hue_span;

            surface.fill_circle(point.position, radius, hsl_to_rgb(hue, 0.7, 0.6), alpha);
            if i < GLOW_POINTS {
                surface.fill_circle(point.position, radius * 2.0, hsl_to_rgb(hue, 0.8, 0.6), alpha * 0.3);
            }
        }
        if self.config.cursor_marker {
            surface.fill_circle(self.head.value, DOT_RADIUS, MARKER_COLOR, 1.0);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Center of the outer ring.
    pub fn ring_center(&self) -> Vec2 {
        self.ring.value
    }

    pub fn head(&self) -> Option<Vec2> {
        self.points.first().map(|p| p.position)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Refill `segments` with a closed polygon approximating a circle.
fn outline_circle(segments: &mut Vec<Segment>, center: Vec2, radius: f32) {
    segments.clear();
    let point = |i: usize| center + Vec2::from_angle(i as f32 / RING_SEGMENTS as f32 * std::f32::consts::TAU) * radius;
    segments.extend((0..RING_SEGMENTS).map(|i| Segment {
        from: point(i).to_array(),
        to: point(i + 1).to_array(),
    }));
}
