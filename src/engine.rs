//! The per-tick pipeline.
//!
//! An [`Engine`] owns the particle store, the proximity graph, and the
//! optional pointer layers. [`Engine::tick`] runs one frame:
//!
//! ```text
//! physics::step → graph.rebuild → layer updates → renderer.render → layer draws
//! ```
//!
//! Every stage runs synchronously in this order. The store has exactly one
//! writer (the physics step) and the later stages only read it.

use crate::config::EngineConfig;
use crate::graph::ProximityGraph;
use crate::particle::{Bounds, ParticleStore};
use crate::physics::{self, PhysicsParams};
use crate::pointer::PointerState;
use crate::render::Renderer;
use crate::sparks::{SparkConfig, SparkPool};
use crate::spawn::SpawnContext;
use crate::surface::Surface;
use crate::tilt::{Tilt, TiltConfig};
use crate::trail::{Trail, TrailConfig};
use crate::visuals::Palette;

/// Particle simulation plus everything drawn on top of it.
pub struct Engine {
    store: ParticleStore,
    graph: ProximityGraph,
    bounds: Bounds,
    physics: PhysicsParams,
    max_distance: f32,
    renderer: Renderer,
    palette: Palette,
    trail: Option<Trail>,
    sparks: Option<SparkPool>,
    tilt: Option<Tilt>,
    seed: Option<u64>,
}

impl Engine {
    /// Build an engine for a surface of the given size.
    ///
    /// The config is sanitized first. The store and bucket lists are sized
    /// here and never reallocated afterwards.
    pub fn new(config: &EngineConfig, bounds: Bounds) -> Self {
        let config = config.sanitized();
        let mut spawn = SpawnContext::new(config.seed, bounds);
        let count = config.particle_count_for(bounds);
        let store = ParticleStore::initialize(count, &mut spawn, &config.spawn, config.palette.len());
        let graph = ProximityGraph::new(config.connections.bucket_count, store.len());

        let mut engine = Self {
            store,
            graph,
            bounds,
            physics: config.physics,
            max_distance: config.connections.max_distance,
            renderer: Renderer::new(config.background, config.connections.line),
            palette: config.palette.clone(),
            trail: None,
            sparks: None,
            tilt: None,
            seed: config.seed,
        };
        if let Some(trail) = config.trail {
            engine = engine.with_trail(trail);
        }
        if let Some(sparks) = config.sparks {
            engine = engine.with_sparks(sparks);
        }
        if let Some(tilt) = config.tilt {
            engine = engine.with_tilt(tilt);
        }

        log::debug!(
            "engine built: {} particles, {} buckets, {}x{}",
            engine.store.len(),
            engine.graph.bucket_count(),
            bounds.width,
            bounds.height
        );
        engine
    }

    /// Replace the store, keeping the current bucket count. Used to set up
    /// exact particle layouts.
    pub fn with_store(mut self, store: ParticleStore) -> Self {
        self.graph = ProximityGraph::new(self.graph.bucket_count(), store.len());
        self.store = store;
        self
    }

    pub fn with_trail(mut self, config: TrailConfig) -> Self {
        self.trail = Some(Trail::new(config));
        self
    }

    pub fn with_sparks(mut self, config: SparkConfig) -> Self {
        // Sparks get their own stream so enabling them does not change the
        // particle layout for a given seed.
        let seed = self.seed.map(|s| s.wrapping_add(1));
        self.sparks = Some(SparkPool::new(config, SpawnContext::new(seed, self.bounds)));
        self
    }

    pub fn with_tilt(mut self, config: TiltConfig) -> Self {
        self.tilt = Some(Tilt::new(config));
        self
    }

    /// Run one frame against `surface`. `dt` is in seconds and only drives
    /// the spring-based layers; the particle physics is per tick.
    pub fn tick(&mut self, surface: &mut dyn Surface, pointer: &PointerState, dt: f32) {
        physics::step(&mut self.store, pointer, self.bounds, &self.physics);
        self.graph.rebuild(&self.store, self.max_distance);

        if let Some(sparks) = &mut self.sparks {
            sparks.update(pointer, self.palette.len());
        }
        if let Some(trail) = &mut self.trail {
            trail.update(pointer, dt);
        }
        if let Some(tilt) = &mut self.tilt {
            let (rotate_x, rotate_y) = tilt.update(pointer, self.bounds, dt);
            surface.set_tilt(rotate_x, rotate_y);
        }

        self.renderer.render(surface, &self.store, &self.graph, &self.palette);

        if let Some(sparks) = &mut self.sparks {
            sparks.draw(surface, &self.palette);
        }
        if let Some(trail) = &mut self.trail {
            trail.draw(surface);
        }
    }

    /// Surface changed size. Only the simulation bounds change; particles
    /// outside are pulled back in by the next tick's clamp.
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    #[inline]
    pub fn graph(&self) -> &ProximityGraph {
        &self.graph
    }

    #[inline]
    pub fn physics(&self) -> &PhysicsParams {
        &self.physics
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn sparks(&self) -> Option<&SparkPool> {
        self.sparks.as_ref()
    }

    pub fn trail(&self) -> Option<&Trail> {
        self.trail.as_ref()
    }

    pub fn tilt(&self) -> Option<&Tilt> {
        self.tilt.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Segment;
    use crate::surface::Circle;
    use glam::{Vec2, Vec3};

    /// Counts draw calls only.
    #[derive(Default)]
    struct Counter {
        circles: usize,
        batches: usize,
        strokes: usize,
        tilt: Option<(f32, f32)>,
    }

    impl Surface for Counter {
        fn size(&self) -> (u32, u32) {
            (800, 600)
        }
        fn resize(&mut self, _: u32, _: u32) {}
        fn clear(&mut self) {}
        fn fill_rect(&mut self, _: Vec2, _: Vec2, _: Vec3, _: f32) {}
        fn fill_circle(&mut self, _: Vec2, _: f32, _: Vec3, _: f32) {
            self.circles += 1;
        }
        fn fill_circles(&mut self, _: &[Circle], _: Vec3, _: f32) {
            self.batches += 1;
        }
        fn stroke_segments(&mut self, _: &[Segment], _: Vec3, _: f32, _: f32) {
            self.strokes += 1;
        }
        fn set_tilt(&mut self, x: f32, y: f32) {
            self.tilt = Some((x, y));
        }
    }

    fn config(count: usize) -> EngineConfig {
        EngineConfig {
            particle_count: count,
            seed: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_draws_every_particle() {
        let mut engine = Engine::new(&config(50), Bounds::new(800.0, 600.0));
        let mut surface = Counter::default();
        engine.tick(&mut surface, &PointerState::default(), 1.0 / 60.0);
        assert_eq!(surface.circles, 50);
        assert!(surface.strokes <= engine.graph().bucket_count());
        assert!(surface.tilt.is_none());
    }

    #[test]
    fn test_empty_engine_is_inert() {
        let mut engine = Engine::new(&config(0), Bounds::new(800.0, 600.0));
        let mut surface = Counter::default();
        for _ in 0..3 {
            engine.tick(&mut surface, &PointerState::default(), 1.0 / 60.0);
        }
        assert_eq!(surface.circles, 0);
        assert_eq!(surface.strokes, 0);
    }

    #[test]
    fn test_layers_from_config() {
        let mut cfg = config(10);
        cfg.trail = Some(TrailConfig::default());
        cfg.sparks = Some(SparkConfig::default());
        cfg.tilt = Some(TiltConfig::default());
        let mut engine = Engine::new(&cfg, Bounds::new(800.0, 600.0));

        let mut pointer = PointerState::default();
        pointer.moved(600.0, 300.0);
        let mut surface = Counter::default();
        engine.tick(&mut surface, &pointer, 1.0 / 60.0);

        assert!(engine.trail().is_some_and(|t| t.is_visible()));
        assert_eq!(engine.sparks().map(|s| s.active_count()), Some(2));
        assert!(surface.batches > 0);
        let (_, y) = surface.tilt.unwrap();
        assert!(y > 0.0);
    }

    #[test]
    fn test_density_sizes_store_to_surface() {
        let mut cfg = config(5);
        cfg.particle_density = Some(8000.0);
        let engine = Engine::new(&cfg, Bounds::new(800.0, 600.0));
        assert_eq!(engine.store().len(), 60);
        assert_eq!(engine.graph().bucket_count(), 10);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = Engine::new(&config(20), Bounds::new(800.0, 600.0));
        let b = Engine::new(&config(20), Bounds::new(800.0, 600.0));
        assert_eq!(a.store().particles(), b.store().particles());
    }

    #[test]
    fn test_resize_keeps_store() {
        let mut engine = Engine::new(&config(30), Bounds::new(800.0, 600.0));
        engine.resize(Bounds::new(100.0, 100.0));
        let mut surface = Counter::default();
        engine.tick(&mut surface, &PointerState::default(), 0.0);
        assert_eq!(engine.store().len(), 30);
        assert!(engine
            .store()
            .particles()
            .iter()
            .all(|p| engine.bounds().contains(p.position)));
    }
}
