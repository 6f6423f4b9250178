//! Engine configuration.
//!
//! [`EngineConfig`] is plain serde data, saved and loaded as JSON. Every field
//! has a default, so a config file only needs the values it changes:
//!
//! ```json
//! {
//!   "particle_count": 120,
//!   "physics": { "friction": 0.98 },
//!   "background": { "mode": "fade", "color": [0.04, 0.04, 0.06], "alpha": 0.15 },
//!   "trail": {}
//! }
//! ```
//!
//! Values from disk go through [`EngineConfig::sanitized`] before use.

use crate::error::ConfigError;
use crate::particle::{Bounds, SpawnSettings};
use crate::physics::PhysicsParams;
use crate::pointer::SpringConfig;
use crate::render::{Background, LineStyle};
use crate::sparks::SparkConfig;
use crate::tilt::TiltConfig;
use crate::trail::TrailConfig;
use crate::visuals::Palette;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Highest supported bucket count.
pub const MAX_BUCKETS: usize = 64;

/// Largest friction accepted; 1.0 would stop energy from decaying.
pub const MAX_FRICTION: f32 = 0.9999;

/// Most particles a density setting can ask for. The proximity scan is
/// quadratic in this.
pub const MAX_DENSITY_PARTICLES: usize = 2_000;

/// Largest launch speed, in pixels per tick, for particles and sparks.
pub const MAX_SPEED: f32 = 100.0;

/// Largest per-tick opacity drift.
pub const MAX_OPACITY_DRIFT: f32 = 0.1;

/// Largest spark pool.
pub const MAX_SPARKS: usize = 10_000;

/// Largest number of spark alpha groups.
pub const MAX_ALPHA_STEPS: usize = 16;

/// Largest trail, in points.
pub const MAX_TRAIL_LENGTH: usize = 256;

/// Largest tilt, in degrees.
pub const MAX_TILT_DEGREES: f32 = 89.0;

/// Host window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "constellation".into(),
            width: 1280,
            height: 720,
        }
    }
}

/// Proximity line settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Pairs at or beyond this distance are not connected.
    pub max_distance: f32,
    pub bucket_count: usize,
    #[serde(flatten)]
    pub line: LineStyle,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_distance: 120.0,
            bucket_count: 10,
            line: LineStyle::default(),
        }
    }
}

/// Everything needed to build an [`Engine`](crate::engine::Engine) and its host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub particle_count: usize,
    /// Surface area in square pixels per particle. When set, the count is
    /// taken from the surface size at build time instead of `particle_count`.
    pub particle_density: Option<f32>,
    /// RNG seed; a time-derived seed is used when absent.
    pub seed: Option<u64>,
    pub spawn: SpawnSettings,
    pub physics: PhysicsParams,
    pub connections: ConnectionConfig,
    pub background: Background,
    pub palette: Palette,
    /// Host prefers reduced motion; the scheduler will not run.
    pub reduced_motion: bool,
    pub trail: Option<TrailConfig>,
    pub sparks: Option<SparkConfig>,
    pub tilt: Option<TiltConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            particle_count: 80,
            particle_density: None,
            seed: None,
            spawn: SpawnSettings::default(),
            physics: PhysicsParams::default(),
            connections: ConnectionConfig::default(),
            background: Background::default(),
            palette: Palette::aurora(),
            reduced_motion: false,
            trail: None,
            sparks: None,
            tilt: None,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write this config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Particle count for a surface of the given size.
    pub fn particle_count_for(&self, bounds: Bounds) -> usize {
        match self.particle_density {
            Some(density) if density > 0.0 => {
                let count = (bounds.width * bounds.height / density).floor();
                (count as usize).min(MAX_DENSITY_PARTICLES)
            }
            _ => self.particle_count,
        }
    }

    /// Copy with out-of-range values pulled back into range. Each correction
    /// is logged as a warning.
    pub fn sanitized(&self) -> Self {
        let mut c = self.clone();

        let friction = c.physics.friction.clamp(0.0, MAX_FRICTION);
        if friction != c.physics.friction {
            log::warn!("friction {} out of range, using {}", c.physics.friction, friction);
            c.physics.friction = friction;
        }

        let buckets = c.connections.bucket_count.clamp(1, MAX_BUCKETS);
        if buckets != c.connections.bucket_count {
            log::warn!("bucket_count {} out of range, using {}", c.connections.bucket_count, buckets);
            c.connections.bucket_count = buckets;
        }

        if let Some(density) = c.particle_density {
            if !density.is_finite() || density <= 0.0 {
                log::warn!("particle_density {} invalid, using particle_count {}", density, c.particle_count);
                c.particle_density = None;
            }
        }

        non_negative("influence_radius", &mut c.physics.influence_radius);
        non_negative("max_distance", &mut c.connections.max_distance);
        non_negative("line width", &mut c.connections.line.width);
        capped("initial_speed", &mut c.spawn.initial_speed, MAX_SPEED);
        capped("opacity_drift", &mut c.spawn.opacity_drift, MAX_OPACITY_DRIFT);
        ordered_range("radius", &mut c.spawn.radius, 0.0, f32::MAX);
        ordered_range("opacity", &mut c.spawn.opacity, 0.0, 1.0);

        if let Some(sparks) = &mut c.sparks {
            capped("spark speed", &mut sparks.speed, MAX_SPEED);
            non_negative("spark radius", &mut sparks.radius);
            capped("spark max_alpha", &mut sparks.max_alpha, 1.0);
            capped_count("spark capacity", &mut sparks.capacity, 0, MAX_SPARKS);
            capped_count("spark per_tick", &mut sparks.per_tick, 0, sparks.capacity);
            capped_count("spark alpha_steps", &mut sparks.alpha_steps, 1, MAX_ALPHA_STEPS);
        }
        if let Some(trail) = &mut c.trail {
            capped_count("trail length", &mut trail.length, 0, MAX_TRAIL_LENGTH);
            spring("trail spring", &mut trail.spring);
            spring("trail ring_spring", &mut trail.ring_spring);
        }
        if let Some(tilt) = &mut c.tilt {
            capped("tilt max_degrees", &mut tilt.max_degrees, MAX_TILT_DEGREES);
            non_negative("tilt range", &mut tilt.range);
            spring("tilt spring", &mut tilt.spring);
        }

        c
    }
}

fn capped(name: &str, value: &mut f32, max: f32) {
    let clean = if value.is_nan() { 0.0 } else { (*value).clamp(0.0, max) };
    if clean != *value {
        log::warn!("{} {} out of range, using {}", name, value, clean);
        *value = clean;
    }
}

fn capped_count(name: &str, value: &mut usize, min: usize, max: usize) {
    let clean = (*value).clamp(min, max.max(min));
    if clean != *value {
        log::warn!("{} {} out of range, using {}", name, value, clean);
        *value = clean;
    }
}

fn spring(name: &str, config: &mut SpringConfig) {
    let mut clean = *config;
    for value in [&mut clean.stiffness, &mut clean.damping, &mut clean.mass] {
        if !value.is_finite() || *value < 0.0 {
            *value = 0.0;
        }
    }
    if clean.mass == 0.0 {
        clean.mass = 1.0;
    }
    if clean != *config {
        log::warn!("{} {:?} invalid, using {:?}", name, config, clean);
        *config = clean;
    }
}

fn non_negative(name: &str, value: &mut f32) {
    if *value < 0.0 || value.is_nan() {
        log::warn!("{} {} is negative, using 0", name, value);
        *value = 0.0;
    }
}

fn ordered_range(name: &str, range: &mut [f32; 2], min: f32, max: f32) {
    let original = *range;
    let mut lo = range[0].clamp(min, max);
    let mut hi = range[1].clamp(min, max);
    if lo > hi {
        std::mem::swap(&mut lo, &mut hi);
    }
    *range = [lo, hi];
    if *range != original {
        log::warn!("{} range {:?} invalid, using {:?}", name, original, range);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Background;

    #[test]
    fn test_empty_json_is_default() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json(
            r#"{
                "particle_count": 120,
                "physics": { "friction": 0.98 },
                "connections": { "bucket_count": 5, "max_alpha": 0.5 },
                "background": { "mode": "fade", "color": [0.0, 0.0, 0.1], "alpha": 0.2 },
                "trail": {}
            }"#,
        )
        .unwrap();
        assert_eq!(config.particle_count, 120);
        assert_eq!(config.physics.friction, 0.98);
        assert_eq!(config.physics.influence_radius, 100.0);
        assert_eq!(config.connections.bucket_count, 5);
        assert_eq!(config.connections.line.max_alpha, 0.5);
        assert!(matches!(config.background, Background::Fade { .. }));
        assert_eq!(config.trail, Some(TrailConfig::default()));
        assert!(config.sparks.is_none());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EngineConfig::from_json("{ \"particle_count\": -3 }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_sanitized_clamps() {
        let mut config = EngineConfig::default();
        config.physics.friction = 1.5;
        config.connections.bucket_count = 0;
        config.connections.max_distance = -10.0;
        config.spawn.opacity = [0.9, 1.4];

        let clean = config.sanitized();
        assert_eq!(clean.physics.friction, MAX_FRICTION);
        assert_eq!(clean.connections.bucket_count, 1);
        assert_eq!(clean.connections.max_distance, 0.0);
        assert_eq!(clean.spawn.opacity, [0.9, 1.0]);

        config.spawn.opacity = [0.6, 0.1];
        assert_eq!(config.sanitized().spawn.opacity, [0.1, 0.6]);
    }

    #[test]
    fn test_sanitized_bounds_layer_settings() {
        let config = EngineConfig::from_json(
            r#"{
                "spawn": { "initial_speed": 3e38, "opacity_drift": 1e30 },
                "sparks": { "speed": 3e38, "capacity": 1000000000, "per_tick": 5000000, "alpha_steps": 0 },
                "trail": { "length": 100000, "spring": { "stiffness": -4.0, "damping": 25.0, "mass": 0.0 } },
                "tilt": { "max_degrees": 720.0, "range": -5.0 }
            }"#,
        )
        .unwrap()
        .sanitized();

        assert_eq!(config.spawn.initial_speed, MAX_SPEED);
        assert_eq!(config.spawn.opacity_drift, MAX_OPACITY_DRIFT);

        let sparks = config.sparks.unwrap();
        assert_eq!(sparks.speed, MAX_SPEED);
        assert_eq!(sparks.capacity, MAX_SPARKS);
        assert_eq!(sparks.per_tick, MAX_SPARKS);
        assert_eq!(sparks.alpha_steps, 1);

        let trail = config.trail.unwrap();
        assert_eq!(trail.length, MAX_TRAIL_LENGTH);
        assert_eq!(trail.spring.stiffness, 0.0);
        assert_eq!(trail.spring.mass, 1.0);

        let tilt = config.tilt.unwrap();
        assert_eq!(tilt.max_degrees, MAX_TILT_DEGREES);
        assert_eq!(tilt.range, 0.0);
    }

    #[test]
    fn test_default_layers_survive_sanitizing() {
        let mut config = EngineConfig::default();
        config.sparks = Some(SparkConfig::default());
        config.trail = Some(TrailConfig::default());
        config.tilt = Some(TiltConfig::default());
        assert_eq!(config.sanitized(), config);
    }

    #[test]
    fn test_particle_count_from_density() {
        let mut config = EngineConfig::default();
        let bounds = Bounds::new(1280.0, 720.0);
        assert_eq!(config.particle_count_for(bounds), 80);

        config.particle_density = Some(8000.0);
        assert_eq!(config.particle_count_for(bounds), 115);
        assert_eq!(config.particle_count_for(Bounds::new(0.0, 0.0)), 0);

        config.particle_density = Some(0.5);
        assert_eq!(config.particle_count_for(bounds), MAX_DENSITY_PARTICLES);

        config.particle_density = Some(-1.0);
        let clean = config.sanitized();
        assert_eq!(clean.particle_density, None);
        assert_eq!(clean.particle_count_for(bounds), 80);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("constellation-config-{}.json", std::process::id()));
        let mut config = EngineConfig::default();
        config.seed = Some(42);
        config.sparks = Some(SparkConfig::default());
        config.save(&path).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
