//! Desktop host: a winit window driving a [`Scheduler`] over a [`GpuCanvas`].
//!
//! Frame callbacks are redraw requests. Window events map onto the
//! scheduler's host contract:
//!
//! | Event | Scheduler |
//! |-------|-----------|
//! | `Resized` | `resize` |
//! | `CursorMoved` / `CursorLeft` | `pointer_moved` / `pointer_left` |
//! | `Occluded` | `set_visible` |
//! | `M` key | toggles `set_reduced_motion` |
//! | `CloseRequested` | `detach_surface`, then exit |

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::RunError;
use crate::gpu::GpuCanvas;
use crate::particle::Bounds;
use crate::scheduler::{FrameHost, FrameRequest, Scheduler};

/// Frames between window title FPS updates.
const TITLE_INTERVAL: u64 = 30;

/// Frame pump backed by `Window::request_redraw`.
#[derive(Default)]
struct RedrawHost {
    window: Option<Arc<Window>>,
    next: u64,
    requested: Option<FrameRequest>,
}

impl FrameHost for RedrawHost {
    fn request_frame(&mut self) -> FrameRequest {
        self.next += 1;
        let request = FrameRequest(self.next);
        self.requested = Some(request);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        // The redraw itself cannot be withdrawn; it arrives with no request.
        if self.requested == Some(request) {
            self.requested = None;
        }
    }
}

struct App {
    config: EngineConfig,
    window: Option<Arc<Window>>,
    host: RedrawHost,
    scheduler: Option<Scheduler<GpuCanvas>>,
}

impl App {
    fn new(config: EngineConfig) -> Self {
        Self {
            config,
            window: None,
            host: RedrawHost::default(),
            scheduler: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) {
        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(self.config.window.width, self.config.window.height));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());
        self.host.window = Some(window.clone());

        // Without a GPU the window stays open, just without animation.
        let canvas = match pollster::block_on(GpuCanvas::new(window.clone())) {
            Ok(canvas) => canvas,
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        };

        let size = window.inner_size();
        let engine = Engine::new(&self.config, Bounds::new(size.width as f32, size.height as f32));
        let mut scheduler = Scheduler::new(engine);
        scheduler.attach_surface(canvas);
        scheduler.set_reduced_motion(&mut self.host, self.config.reduced_motion);
        scheduler.start(&mut self.host);
        self.scheduler = Some(scheduler);
    }

    fn redraw(&mut self) {
        let Some(scheduler) = &mut self.scheduler else {
            return;
        };
        let Some(request) = self.host.requested.take() else {
            return;
        };
        if !scheduler.on_frame(&mut self.host, request) {
            return;
        }

        let clock = scheduler.clock();
        if clock.frame() % TITLE_INTERVAL == 0 {
            if let Some(window) = &self.window {
                window.set_title(&format!("{} | {:.0} fps", self.config.window.title, clock.fps()));
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            self.init(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(scheduler) = &mut self.scheduler {
                    scheduler.detach_surface(&mut self.host);
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(scheduler) = &mut self.scheduler {
                    scheduler.resize(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(scheduler) = &mut self.scheduler {
                    scheduler.pointer_moved(position.x as f32, position.y as f32);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                if let Some(scheduler) = &mut self.scheduler {
                    scheduler.pointer_left();
                }
            }
            WindowEvent::Occluded(occluded) => {
                if let Some(scheduler) = &mut self.scheduler {
                    scheduler.set_visible(&mut self.host, !occluded);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && event.physical_key == PhysicalKey::Code(KeyCode::KeyM)
                {
                    if let Some(scheduler) = &mut self.scheduler {
                        let reduced = !scheduler.reduced_motion();
                        scheduler.set_reduced_motion(&mut self.host, reduced);
                        log::info!("reduced motion {}", if reduced { "on" } else { "off" });
                    }
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

/// Open a window and animate until it is closed.
pub fn run(config: EngineConfig) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
