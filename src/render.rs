//! Batched renderer.
//!
//! Per frame:
//!
//! 1. Clear or fade the surface, depending on [`Background`]
//! 2. One `fill_circle` per particle
//! 3. One `stroke_segments` per non-empty proximity bucket, faintest first
//!
//! Line draw calls are bounded by the bucket count no matter how many pairs
//! are connected.

use crate::graph::ProximityGraph;
use crate::particle::ParticleStore;
use crate::surface::Surface;
use crate::visuals::{rgb8, Palette};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// How the previous frame is disposed of.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Background {
    /// Fully transparent, crisp frames.
    #[default]
    Clear,
    /// Opaque fill.
    Fill { color: Vec3 },
    /// Translucent fill; older frames fade out leaving motion trails.
    Fade { color: Vec3, alpha: f32 },
}

/// Connection line appearance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub color: Vec3,
    pub width: f32,
    /// Alpha of the most opaque bucket. Bucket `b` of `n` gets `(b + 1) / n` of it.
    pub max_alpha: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: rgb8(99, 102, 241),
            width: 0.5,
            max_alpha: 0.2,
        }
    }
}

impl LineStyle {
    /// Stroke alpha for a bucket.
    #[inline]
    pub fn bucket_alpha(&self, bucket: usize, bucket_count: usize) -> f32 {
        (bucket + 1) as f32 / bucket_count.max(1) as f32 * self.max_alpha
    }
}

/// Draws the particle store and its proximity graph.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    pub background: Background,
    pub lines: LineStyle,
}

impl Renderer {
    pub fn new(background: Background, lines: LineStyle) -> Self {
        Self { background, lines }
    }

    /// Paint one frame. Side effects on `surface` only.
    pub fn render(&self, surface: &mut dyn Surface, store: &ParticleStore, graph: &ProximityGraph, palette: &Palette) {
        self.draw_background(surface);

        for p in store.particles() {
            surface.fill_circle(p.position, p.radius, palette.color(p.color_class), p.opacity);
        }

        let bucket_count = graph.bucket_count();
        for (index, segments) in graph.buckets().enumerate() {
            if segments.is_empty() {
                continue;
            }
            let alpha = self.lines.bucket_alpha(index, bucket_count);
            surface.stroke_segments(segments, self.lines.color, alpha, self.lines.width);
        }
    }

    fn draw_background(&self, surface: &mut dyn Surface) {
        match self.background {
            Background::Clear => surface.clear(),
            Background::Fill { color } => {
                let size = full_surface(surface);
                surface.fill_rect(Vec2::ZERO, size, color, 1.0);
            }
            Background::Fade { color, alpha } => {
                let size = full_surface(surface);
                surface.fill_rect(Vec2::ZERO, size, color, alpha.clamp(0.0, 1.0));
            }
        }
    }
}

fn full_surface(surface: &dyn Surface) -> Vec2 {
    let (w, h) = surface.size();
    Vec2::new(w as f32, h as f32)
}
