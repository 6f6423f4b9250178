//! # constellation
//!
//! Interactive 2D particle field: drifting particles, pointer repulsion, and
//! proximity lines drawn in a bounded number of batched strokes.
//!
//! The engine is a straight per-frame pipeline driven by a [`Scheduler`]:
//!
//! ```text
//! Scheduler → physics::step → ProximityGraph::rebuild → Renderer::render → Surface
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use constellation::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     let config = EngineConfig {
//!         particle_count: 120,
//!         trail: Some(TrailConfig::default()),
//!         ..Default::default()
//!     };
//!     constellation::window::run(config)
//! }
//! ```
//!
//! ## Driving the engine yourself
//!
//! Anything that implements [`Surface`] can be drawn on, and anything that
//! implements [`FrameHost`] can pump frames:
//!
//! ```ignore
//! let engine = Engine::new(&config, Bounds::new(800.0, 600.0));
//! let mut scheduler = Scheduler::new(engine);
//! let mut host = ManualHost::default();
//!
//! scheduler.attach_surface(RasterSurface::new(800, 600));
//! scheduler.start(&mut host);
//! while let Some(request) = host.take() {
//!     scheduler.on_frame(&mut host, request);
//! }
//! ```
//!
//! ## Performance
//!
//! The proximity scan is O(n²) with a squared-distance rejection before any
//! square root. Draw calls per frame are one circle per particle plus at most
//! one stroke per bucket, independent of how many pairs are connected. At 60
//! fps this comfortably handles a few hundred particles.
//!
//! ## Layers
//!
//! | Layer | Config | Effect |
//! |-------|--------|--------|
//! | [`Trail`] | `trail` | Spring-smoothed comet following the pointer |
//! | [`SparkPool`] | `sparks` | Pooled sparks shed at the pointer |
//! | [`Tilt`] | `tilt` | Whole-canvas perspective tilt toward the pointer |

pub mod config;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod graph;
pub mod particle;
pub mod physics;
pub mod pointer;
pub mod raster;
pub mod render;
pub mod scheduler;
pub mod sparks;
pub mod spawn;
pub mod surface;
pub mod tilt;
pub mod time;
pub mod trail;
pub mod visuals;
pub mod window;

pub use bytemuck;
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{ConfigError, GpuError, RunError};
pub use glam::{Vec2, Vec3};
pub use graph::{ProximityGraph, Segment};
pub use particle::{Bounds, Particle, ParticleStore};
pub use physics::PhysicsParams;
pub use pointer::PointerState;
pub use raster::RasterSurface;
pub use render::{Background, Renderer};
pub use scheduler::{FrameHost, FrameRequest, ManualHost, Scheduler, SchedulerState};
pub use sparks::SparkPool;
pub use spawn::SpawnContext;
pub use surface::Surface;
pub use tilt::Tilt;
pub use time::FrameClock;
pub use trail::Trail;
pub use visuals::Palette;

/// Convenient imports for typical usage.
pub mod prelude {
    pub use crate::config::{ConnectionConfig, EngineConfig, WindowConfig};
    pub use crate::engine::Engine;
    pub use crate::error::{ConfigError, GpuError, RunError};
    pub use crate::graph::{ProximityGraph, Segment};
    pub use crate::particle::{Bounds, Particle, ParticleStore, SpawnSettings};
    pub use crate::physics::PhysicsParams;
    pub use crate::pointer::{PointerState, SpringConfig};
    pub use crate::raster::RasterSurface;
    pub use crate::render::{Background, LineStyle, Renderer};
    pub use crate::scheduler::{FrameHost, FrameRequest, ManualHost, Scheduler, SchedulerState};
    pub use crate::sparks::{SparkConfig, SparkPool};
    pub use crate::surface::{Circle, Surface};
    pub use crate::tilt::{Tilt, TiltConfig};
    pub use crate::time::FrameClock;
    pub use crate::trail::{Trail, TrailConfig};
    pub use crate::visuals::Palette;
    pub use crate::{Vec2, Vec3};
}
