//! Colours and palettes.
//!
//! Colours are linear `Vec3` RGB in `0.0..=1.0`; opacity is always carried
//! separately so one palette entry can be drawn at many alpha levels.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Build a colour from 8-bit channels.
#[inline]
pub fn rgb8(r: u8, g: u8, b: u8) -> Vec3 {
    Vec3::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

/// Small fixed set of particle colours, indexed by a particle's colour class.
///
/// # Example
///
/// ```ignore
/// let palette = Palette::aurora();
/// let color = palette.color(particle.color_class);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec3>", into = "Vec<Vec3>")]
pub struct Palette {
    colors: Vec<Vec3>,
}

impl Palette {
    /// Custom palette. An empty list falls back to a single white entry so
    /// colour lookups never fail.
    pub fn new(colors: Vec<Vec3>) -> Self {
        if colors.is_empty() {
            Self { colors: vec![Vec3::ONE] }
        } else {
            Self { colors }
        }
    }

    /// Indigo, violet, pink and blue. The default.
    pub fn aurora() -> Self {
        Self::new(vec![
            rgb8(99, 102, 241),
            rgb8(139, 92, 246),
            rgb8(236, 72, 153),
            rgb8(59, 130, 246),
        ])
    }

    /// Sky, emerald, amber and violet.
    pub fn meadow() -> Self {
        Self::new(vec![
            rgb8(14, 165, 233),
            rgb8(16, 185, 129),
            rgb8(245, 158, 11),
            rgb8(139, 92, 246),
        ])
    }

    /// Three cool greys for understated backgrounds.
    pub fn slate() -> Self {
        Self::new(vec![rgb8(148, 163, 184), rgb8(100, 116, 139), rgb8(203, 213, 225)])
    }

    /// Colour for a colour class; classes past the end wrap around.
    #[inline]
    pub fn color(&self, class: u8) -> Vec3 {
        self.colors[class as usize % self.colors.len()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }
}

impl From<Vec<Vec3>> for Palette {
    fn from(colors: Vec<Vec3>) -> Self {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<Vec3> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::aurora()
    }
}

/// Convert HSL to RGB.
///
/// * `hue` - degrees, wraps at 360
/// * `saturation`, `lightness` - 0.0 to 1.0
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = lightness - c * 0.5;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}
