//! CPU drawing surface over an RGBA image.
//!
//! Used by the headless host and for PNG snapshots. Shapes are antialiased by
//! pixel coverage and composited with source-over blending. A batched call
//! (`fill_circles`, `stroke_segments`) builds one coverage mask for the whole
//! batch and composites it once, so overlapping shapes in a batch do not
//! darken each other, as with a single canvas path.

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::graph::Segment;
use crate::particle::Bounds;
use crate::scheduler::{ManualHost, Scheduler};
use crate::surface::{Circle, Surface};
use crate::time::FrameClock;
use glam::{Vec2, Vec3};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Run `frames` ticks at a fixed 60 Hz step on a window-sized raster surface
/// and return it.
///
/// Under reduced motion the scheduler never starts and the surface stays
/// blank.
pub fn render_headless(config: &EngineConfig, frames: u32) -> RasterSurface {
    let (width, height) = (config.window.width, config.window.height);
    let engine = Engine::new(config, Bounds::new(width as f32, height as f32));

    let mut clock = FrameClock::new();
    clock.set_fixed_delta(Some(1.0 / 60.0));
    let mut scheduler = Scheduler::new(engine).with_clock(clock);
    let mut host = ManualHost::default();

    scheduler.attach_surface(RasterSurface::new(width, height));
    scheduler.set_reduced_motion(&mut host, config.reduced_motion);
    scheduler.start(&mut host);

    for _ in 0..frames {
        let Some(request) = host.take() else {
            break;
        };
        scheduler.on_frame(&mut host, request);
    }

    log::info!("rendered {} headless frames", scheduler.clock().frame());
    scheduler
        .detach_surface(&mut host)
        .unwrap_or_else(|| RasterSurface::new(width, height))
}

/// Pixel-space rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy)]
struct PixelRect {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl PixelRect {
    /// Pixels touched by a shape spanning `min..max`, clipped to the image.
    fn covering(min: Vec2, max: Vec2, width: u32, height: u32) -> Option<Self> {
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(width as f32);
        let y1 = max.y.ceil().min(height as f32);
        if !(x0 < x1 && y0 < y1) {
            return None;
        }
        Some(Self {
            x0: x0 as u32,
            y0: y0 as u32,
            x1: x1 as u32,
            y1: y1 as u32,
        })
    }

    fn union(self, other: Self) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// Software [`Surface`] backed by an [`RgbaImage`].
pub struct RasterSurface {
    image: RgbaImage,
    /// Batch coverage in `0..=1`, one entry per pixel; zero outside a batch.
    mask: Vec<f32>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            mask: vec![0.0; (width as usize) * (height as usize)],
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Straight-alpha pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Write the current frame as a PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.image.save_with_format(path, image::ImageFormat::Png)
    }

    fn blend(&mut self, x: u32, y: u32, color: Vec3, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x, y);
        let [dr, dg, db, da] = dst.0;
        let da = da as f32 / 255.0;
        let sa = alpha.min(1.0);

        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            *dst = Rgba([0, 0, 0, 0]);
            return;
        }
        let mix = |s: f32, d: u8| {
            let d = d as f32 / 255.0;
            let c = (s.clamp(0.0, 1.0) * sa + d * da * (1.0 - sa)) / out_a;
            (c * 255.0).round() as u8
        };
        *dst = Rgba([
            mix(color.x, dr),
            mix(color.y, dg),
            mix(color.z, db),
            (out_a * 255.0).round() as u8,
        ]);
    }

    /// Accumulate one circle into the batch mask.
    fn mask_circle(&mut self, center: Vec2, radius: f32) -> Option<PixelRect> {
        if radius <= 0.0 {
            return None;
        }
        let (w, h) = self.image.dimensions();
        let reach = Vec2::splat(radius + 1.0);
        let rect = PixelRect::covering(center - reach, center + reach, w, h)?;
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0);
                self.accumulate(x, y, coverage);
            }
        }
        Some(rect)
    }

    /// Accumulate one stroked segment into the batch mask.
    fn mask_segment(&mut self, segment: &Segment, half_width: f32) -> Option<PixelRect> {
        let a = Vec2::from(segment.from);
        let b = Vec2::from(segment.to);
        let (w, h) = self.image.dimensions();
        let reach = Vec2::splat(half_width + 1.0);
        let rect = PixelRect::covering(a.min(b) - reach, a.max(b) + reach, w, h)?;

        let ab = b - a;
        let len_sq = ab.length_squared();
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if len_sq > 0.0 {
                    ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let d = p.distance(a + ab * t);
                let coverage = (half_width + 0.5 - d).clamp(0.0, 1.0);
                self.accumulate(x, y, coverage);
            }
        }
        Some(rect)
    }

    #[inline]
    fn accumulate(&mut self, x: u32, y: u32, coverage: f32) {
        if coverage > 0.0 {
            let i = (y * self.image.width() + x) as usize;
            self.mask[i] = self.mask[i].max(coverage);
        }
    }

    /// Composite the batch mask once and reset it.
    fn flush_mask(&mut self, rect: PixelRect, color: Vec3, alpha: f32) {
        let width = self.image.width();
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                let i = (y * width + x) as usize;
                let coverage = std::mem::take(&mut self.mask[i]);
                if coverage > 0.0 {
                    self.blend(x, y, color, alpha * coverage);
                }
            }
        }
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.image.dimensions() == (width, height) {
            return;
        }
        self.image = RgbaImage::new(width, height);
        self.mask = vec![0.0; (width as usize) * (height as usize)];
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Vec3, alpha: f32) {
        let (w, h) = self.image.dimensions();
        let Some(rect) = PixelRect::covering(origin, origin + size, w, h) else {
            return;
        };
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                self.blend(x, y, color, alpha);
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec3, alpha: f32) {
        if let Some(rect) = self.mask_circle(center, radius) {
            self.flush_mask(rect, color, alpha);
        }
    }

    fn fill_circles(&mut self, circles: &[Circle], color: Vec3, alpha: f32) {
        let mut dirty: Option<PixelRect> = None;
        for circle in circles {
            if let Some(rect) = self.mask_circle(circle.center, circle.radius) {
                dirty = Some(dirty.map_or(rect, |d| d.union(rect)));
            }
        }
        if let Some(rect) = dirty {
            self.flush_mask(rect, color, alpha);
        }
    }

    fn stroke_segments(&mut self, segments: &[Segment], color: Vec3, alpha: f32, width: f32) {
        let half_width = width.max(0.0) * 0.5;
        let mut dirty: Option<PixelRect> = None;
        for segment in segments {
            if let Some(rect) = self.mask_segment(segment, half_width) {
                dirty = Some(dirty.map_or(rect, |d| d.union(rect)));
            }
        }
        if let Some(rect) = dirty {
            self.flush_mask(rect, color, alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_transparent() {
        let surface = RasterSurface::new(4, 4);
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn test_opaque_fill_rect() {
        let mut surface = RasterSurface::new(8, 8);
        surface.fill_rect(Vec2::ZERO, Vec2::new(8.0, 8.0), Vec3::new(1.0, 0.0, 0.0), 1.0);
        assert_eq!(surface.pixel(3, 3), Some([255, 0, 0, 255]));
        surface.clear();
        assert_eq!(surface.pixel(3, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_fade_accumulates() {
        let mut surface = RasterSurface::new(2, 2);
        surface.fill_rect(Vec2::ZERO, Vec2::new(2.0, 2.0), Vec3::ONE, 0.5);
        let first = surface.pixel(0, 0).unwrap()[3];
        surface.fill_rect(Vec2::ZERO, Vec2::new(2.0, 2.0), Vec3::ONE, 0.5);
        let second = surface.pixel(0, 0).unwrap()[3];
        assert_eq!(first, 128);
        assert!(second > first);
    }

    #[test]
    fn test_circle_covers_center_only() {
        let mut surface = RasterSurface::new(20, 20);
        surface.fill_circle(Vec2::new(10.0, 10.0), 3.0, Vec3::ONE, 1.0);
        assert_eq!(surface.pixel(10, 10).unwrap()[3], 255);
        assert_eq!(surface.pixel(0, 0).unwrap()[3], 0);
        assert_eq!(surface.pixel(16, 10).unwrap()[3], 0);
    }

    #[test]
    fn test_batch_composites_once() {
        let mut surface = RasterSurface::new(20, 20);
        let circles = [
            Circle {
                center: Vec2::new(10.0, 10.0),
                radius: 4.0,
            },
            Circle {
                center: Vec2::new(11.0, 10.0),
                radius: 4.0,
            },
        ];
        surface.fill_circles(&circles, Vec3::ONE, 0.5);
        assert_eq!(surface.pixel(10, 10).unwrap()[3], 128);
    }

    #[test]
    fn test_stroke_segments() {
        let mut surface = RasterSurface::new(20, 20);
        let segments = [Segment::new(Vec2::new(2.0, 10.5), Vec2::new(18.0, 10.5))];
        surface.stroke_segments(&segments, Vec3::ONE, 1.0, 1.0);
        assert!(surface.pixel(10, 10).unwrap()[3] > 200);
        assert_eq!(surface.pixel(10, 2).unwrap()[3], 0);
    }

    #[test]
    fn test_shapes_off_surface_are_clipped() {
        let mut surface = RasterSurface::new(10, 10);
        surface.fill_circle(Vec2::new(-50.0, -50.0), 5.0, Vec3::ONE, 1.0);
        surface.fill_rect(Vec2::new(20.0, 20.0), Vec2::new(5.0, 5.0), Vec3::ONE, 1.0);
        assert!(surface.image().pixels().all(|p| p.0[3] == 0));
    }

    fn small_config() -> EngineConfig {
        let mut config = EngineConfig {
            particle_count: 20,
            seed: Some(5),
            ..Default::default()
        };
        config.window.width = 64;
        config.window.height = 48;
        config
    }

    #[test]
    fn test_headless_draws_particles() {
        let surface = render_headless(&small_config(), 5);
        assert_eq!(surface.size(), (64, 48));
        assert!(surface.image().pixels().any(|p| p.0[3] > 0));
    }

    #[test]
    fn test_headless_reduced_motion_stays_blank() {
        let mut config = small_config();
        config.reduced_motion = true;
        let surface = render_headless(&config, 5);
        assert!(surface.image().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_resize_reallocates() {
        let mut surface = RasterSurface::new(10, 10);
        surface.resize(30, 20);
        assert_eq!(surface.size(), (30, 20));
        surface.fill_circle(Vec2::new(25.0, 15.0), 2.0, Vec3::ONE, 1.0);
        assert_eq!(surface.pixel(25, 15).unwrap()[3], 255);
    }
}
