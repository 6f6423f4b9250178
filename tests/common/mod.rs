//! Shared helpers for integration tests.

#![allow(dead_code)]

use constellation::prelude::*;

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum Draw {
    Clear,
    Rect { alpha: f32 },
    Circle { center: Vec2, radius: f32, alpha: f32 },
    Circles { count: usize, alpha: f32 },
    Stroke { segments: usize, alpha: f32 },
}

/// Surface that records draw calls instead of drawing.
pub struct RecordingSurface {
    pub width: u32,
    pub height: u32,
    pub draws: Vec<Draw>,
    pub presents: usize,
    pub tilt: Option<(f32, f32)>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            draws: Vec::new(),
            presents: 0,
            tilt: None,
        }
    }

    pub fn circle_count(&self) -> usize {
        self.draws.iter().filter(|d| matches!(d, Draw::Circle { .. })).count()
    }

    pub fn stroke_count(&self) -> usize {
        self.draws.iter().filter(|d| matches!(d, Draw::Stroke { .. })).count()
    }

    pub fn stroked_segments(&self) -> usize {
        self.draws
            .iter()
            .map(|d| match d {
                Draw::Stroke { segments, .. } => *segments,
                _ => 0,
            })
            .sum()
    }

    pub fn reset(&mut self) {
        self.draws.clear();
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.draws.push(Draw::Clear);
    }

    fn fill_rect(&mut self, _origin: Vec2, _size: Vec2, _color: Vec3, alpha: f32) {
        self.draws.push(Draw::Rect { alpha });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, _color: Vec3, alpha: f32) {
        self.draws.push(Draw::Circle { center, radius, alpha });
    }

    fn fill_circles(&mut self, circles: &[Circle], _color: Vec3, alpha: f32) {
        self.draws.push(Draw::Circles {
            count: circles.len(),
            alpha,
        });
    }

    fn stroke_segments(&mut self, segments: &[Segment], _color: Vec3, alpha: f32, _width: f32) {
        self.draws.push(Draw::Stroke {
            segments: segments.len(),
            alpha,
        });
    }

    fn present(&mut self) {
        self.presents += 1;
    }

    fn set_tilt(&mut self, rotate_x: f32, rotate_y: f32) {
        self.tilt = Some((rotate_x, rotate_y));
    }
}

/// Particle at rest unless given a velocity.
pub fn particle(x: f32, y: f32) -> Particle {
    Particle {
        position: Vec2::new(x, y),
        velocity: Vec2::ZERO,
        radius: 2.0,
        color_class: 0,
        opacity: 0.5,
        opacity_drift: 0.0,
    }
}

pub fn seeded_config(count: usize) -> EngineConfig {
    EngineConfig {
        particle_count: count,
        seed: Some(2024),
        ..Default::default()
    }
}
