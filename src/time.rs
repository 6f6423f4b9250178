//! Frame timing and frame-budget accounting.
//!
//! The engine's only deadline is the host's frame budget. [`FrameClock`]
//! measures how long each tick's pipeline took, counts overruns and reports
//! them through `log`, at most once per second so a slow machine does not
//! flood the log.
//!
//! # Example
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//!
//! // Once per frame callback:
//! let dt = clock.begin_tick();
//! engine.tick(surface, &pointer, dt);
//! clock.end_tick();
//!
//! println!("FPS: {:.1}, overruns: {}", clock.fps(), clock.overruns());
//! ```

use std::time::{Duration, Instant};

/// Default budget for a 60 Hz display.
pub const DEFAULT_FRAME_BUDGET: Duration = Duration::from_micros(16_667);

/// Largest delta handed to time-based effects (springs). Longer gaps, such as
/// a tab coming back from the background, are treated as one slow frame.
pub const MAX_DELTA: f32 = 1.0 / 20.0;

/// Frame timing for the scheduler.
#[derive(Debug)]
pub struct FrameClock {
    /// When the clock was created or last reset.
    start: Instant,
    /// When the previous tick began.
    last_tick: Option<Instant>,
    /// Start of the tick in progress.
    tick_started: Option<Instant>,
    /// Delta handed out by the last `begin_tick`.
    delta_secs: f32,
    /// Ticks begun since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    /// Pipeline time allowed per tick.
    budget: Duration,
    /// Duration of the last completed tick.
    last_tick_duration: Duration,
    /// Ticks that exceeded the budget.
    overruns: u64,
    /// Overruns not yet reported.
    unreported: u64,
    last_report: Option<Instant>,
    /// Fixed delta time for deterministic updates (optional).
    fixed_delta: Option<f32>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_budget(DEFAULT_FRAME_BUDGET)
    }

    pub fn with_budget(budget: Duration) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: None,
            tick_started: None,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            budget,
            last_tick_duration: Duration::ZERO,
            overruns: 0,
            unreported: 0,
            last_report: None,
            fixed_delta: None,
        }
    }

    /// Mark the start of a tick and return the delta to use, in seconds.
    ///
    /// The first tick after creation or [`FrameClock::resume`] gets a delta of
    /// zero unless a fixed delta is set.
    pub fn begin_tick(&mut self) -> f32 {
        let now = Instant::now();

        let raw = self
            .last_tick
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.delta_secs = self.fixed_delta.unwrap_or(raw).clamp(0.0, MAX_DELTA);
        self.last_tick = Some(now);
        self.tick_started = Some(now);
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Mark the end of the tick begun by [`FrameClock::begin_tick`].
    pub fn end_tick(&mut self) {
        let Some(started) = self.tick_started.take() else {
            return;
        };
        let now = Instant::now();
        self.record_tick(now.duration_since(started), now);
    }

    fn record_tick(&mut self, took: Duration, now: Instant) {
        self.last_tick_duration = took;
        if took <= self.budget {
            return;
        }

        self.overruns += 1;
        self.unreported += 1;
        let due = self
            .last_report
            .map_or(true, |last| now.duration_since(last) >= Duration::from_secs(1));
        if due {
            log::warn!(
                "frame took {:.2}ms (budget {:.2}ms); {} overrun(s) since last report",
                took.as_secs_f64() * 1000.0,
                self.budget.as_secs_f64() * 1000.0,
                self.unreported
            );
            self.unreported = 0;
            self.last_report = Some(now);
        }
    }

    /// Forget the previous tick so a stop/start gap is not seen as one huge frame.
    pub fn resume(&mut self) {
        self.last_tick = None;
        self.tick_started = None;
    }

    /// Delta of the current tick, in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Seconds since creation.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    #[inline]
    pub fn last_tick_duration(&self) -> Duration {
        self.last_tick_duration
    }

    /// Ticks that took longer than the budget.
    #[inline]
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Set a fixed delta time for deterministic updates.
    ///
    /// Pass `None` to use real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
