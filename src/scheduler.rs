//! Frame scheduler: the engine's start/stop lifecycle.
//!
//! ```text
//!            start() [surface, visible, motion ok]
//!   Stopped ─────────────────────────────────────▶ Running
//!      ▲                                              │
//!      └──── stop() / hidden / reduced motion ────────┘
//!            / surface detached
//! ```
//!
//! The host supplies the frame pump through [`FrameHost`]. The scheduler holds
//! at most one outstanding [`FrameRequest`] and only ticks for that exact
//! token, so a callback that was already in flight when the scheduler stopped
//! is ignored and cannot touch a detached surface.

use crate::engine::Engine;
use crate::particle::Bounds;
use crate::pointer::PointerState;
use crate::surface::Surface;
use crate::time::FrameClock;

/// Token for one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// The host's per-frame callback mechanism.
pub trait FrameHost {
    /// Schedule one callback; the host later passes the token back to
    /// [`Scheduler::on_frame`].
    fn request_frame(&mut self) -> FrameRequest;

    /// Drop a scheduled callback. Hosts that cannot cancel may ignore this;
    /// the scheduler ignores the stale token when it arrives.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Host that only records the outstanding request; the caller pumps frames
/// with [`ManualHost::take`]. Used for headless runs and tests.
#[derive(Debug, Default)]
pub struct ManualHost {
    next: u64,
    pending: Option<FrameRequest>,
}

impl ManualHost {
    /// The scheduled request, if any, consuming it.
    pub fn take(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }
}

impl FrameHost for ManualHost {
    fn request_frame(&mut self) -> FrameRequest {
        self.next += 1;
        let request = FrameRequest(self.next);
        self.pending = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// Drives an [`Engine`] against a surface `S`, one tick per frame callback.
pub struct Scheduler<S: Surface> {
    engine: Engine,
    surface: Option<S>,
    pointer: PointerState,
    state: SchedulerState,
    pending: Option<FrameRequest>,
    /// Host asked to run; cleared only by [`Scheduler::stop`].
    wanted: bool,
    visible: bool,
    reduced_motion: bool,
    clock: FrameClock,
}

impl<S: Surface> Scheduler<S> {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            surface: None,
            pointer: PointerState::default(),
            state: SchedulerState::Stopped,
            pending: None,
            wanted: false,
            visible: true,
            reduced_motion: false,
            clock: FrameClock::new(),
        }
    }

    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    /// Mount a drawing surface. The engine bounds follow its size.
    pub fn attach_surface(&mut self, surface: S) {
        let (width, height) = surface.size();
        self.engine.resize(Bounds::new(width as f32, height as f32));
        self.surface = Some(surface);
        log::debug!("surface attached ({}x{})", width, height);
    }

    /// Unmount: stop, then hand the surface back.
    pub fn detach_surface(&mut self, host: &mut impl FrameHost) -> Option<S> {
        self.stop(host);
        let surface = self.surface.take();
        if surface.is_some() {
            log::debug!("surface detached");
        }
        surface
    }

    /// Begin ticking. Returns whether the scheduler is running afterwards.
    ///
    /// Idempotent while running. Refuses without a surface, while hidden or
    /// under reduced motion, but remembers the request and resumes once the
    /// visibility and motion blockers clear.
    pub fn start(&mut self, host: &mut impl FrameHost) -> bool {
        self.wanted = true;
        if self.state == SchedulerState::Running {
            return true;
        }
        if self.surface.is_none() {
            log::debug!("start refused: no surface attached");
            return false;
        }
        if !self.visible {
            log::debug!("start deferred: surface hidden");
            return false;
        }
        if self.reduced_motion {
            log::debug!("start deferred: reduced motion preferred");
            return false;
        }

        self.state = SchedulerState::Running;
        self.clock.resume();
        self.pending = Some(host.request_frame());
        log::info!("engine started ({} particles)", self.engine.store().len());
        true
    }

    /// Stop ticking and forget the host's request to run. Safe to call
    /// repeatedly.
    ///
    /// The particle store is kept: a later [`start`](Self::start) continues
    /// from the same positions and velocities. Drop the scheduler (or build a
    /// fresh [`Engine`]) to discard it.
    pub fn stop(&mut self, host: &mut impl FrameHost) {
        self.wanted = false;
        self.halt(host);
    }

    fn halt(&mut self, host: &mut impl FrameHost) {
        if let Some(request) = self.pending.take() {
            host.cancel_frame(request);
        }
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Stopped;
            self.pointer.reset();
            log::info!("engine stopped after {} frames", self.clock.frame());
        }
    }

    fn resume_if_wanted(&mut self, host: &mut impl FrameHost) {
        if self.wanted && self.state == SchedulerState::Stopped {
            self.start(host);
        }
    }

    /// Frame callback. Runs one tick and schedules the next if `request` is
    /// the outstanding one; anything else is stale and ignored.
    ///
    /// Returns whether a tick ran.
    pub fn on_frame(&mut self, host: &mut impl FrameHost, request: FrameRequest) -> bool {
        if self.state != SchedulerState::Running || self.pending != Some(request) {
            log::trace!("ignoring stale frame {:?}", request);
            return false;
        }
        self.pending = None;

        let Some(surface) = self.surface.as_mut() else {
            self.halt(host);
            return false;
        };

        let dt = self.clock.begin_tick();
        self.engine.tick(surface, &self.pointer, dt);
        surface.present();
        self.clock.end_tick();

        self.pending = Some(host.request_frame());
        true
    }

    /// Pointer moved over the surface. Ignored unless running.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if self.state == SchedulerState::Running {
            self.pointer.moved(x, y);
        }
    }

    /// Pointer left the surface. Ignored unless running.
    pub fn pointer_left(&mut self) {
        if self.state == SchedulerState::Running {
            self.pointer.left();
        }
    }

    /// Host resized the surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.engine.resize(Bounds::new(width as f32, height as f32));
        if let Some(surface) = &mut self.surface {
            surface.resize(width, height);
        }
        log::debug!("resized to {}x{}", width, height);
    }

    /// Surface shown or hidden. Hiding stops; showing resumes if the host
    /// asked to run.
    pub fn set_visible(&mut self, host: &mut impl FrameHost, visible: bool) {
        self.visible = visible;
        if visible {
            self.resume_if_wanted(host);
        } else {
            self.halt(host);
        }
    }

    /// Reduced-motion preference changed.
    pub fn set_reduced_motion(&mut self, host: &mut impl FrameHost, reduced: bool) {
        self.reduced_motion = reduced;
        if reduced {
            self.halt(host);
        } else {
            self.resume_if_wanted(host);
        }
    }

    #[inline]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    #[inline]
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    #[inline]
    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    #[inline]
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    #[inline]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    #[inline]
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    #[inline]
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    #[inline]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}
