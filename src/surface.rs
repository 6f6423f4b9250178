//! The drawing surface the renderer paints on.
//!
//! This is the engine's only view of the host's canvas. Every method is one
//! draw call; the renderer's batching guarantees are stated in terms of how
//! many times these methods are invoked per frame.

use crate::graph::Segment;
use glam::{Vec2, Vec3};

/// A filled circle in a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

/// Canvas-style 2D drawing target.
///
/// Coordinates are surface pixels with the origin at the top-left corner.
pub trait Surface {
    /// Current size in pixels.
    fn size(&self) -> (u32, u32);

    /// Host changed the on-screen size.
    fn resize(&mut self, width: u32, height: u32);

    /// Reset every pixel to fully transparent.
    fn clear(&mut self);

    /// Blend a solid rectangle over the surface.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Vec3, alpha: f32);

    /// Blend one filled circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec3, alpha: f32);

    /// Blend many circles sharing one fill style as a single path and fill.
    fn fill_circles(&mut self, circles: &[Circle], color: Vec3, alpha: f32);

    /// Stroke every segment as one path with one stroke style.
    fn stroke_segments(&mut self, segments: &[Segment], color: Vec3, alpha: f32, width: f32);

    /// Frame is complete. Hosts that double-buffer present here.
    fn present(&mut self) {}

    /// Whole-canvas tilt in degrees about the X and Y axes.
    /// Flat surfaces ignore it.
    fn set_tilt(&mut self, _rotate_x: f32, _rotate_y: f32) {}
}
