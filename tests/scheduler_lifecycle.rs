//! Start/stop lifecycle of the frame scheduler.

mod common;

use common::{seeded_config, RecordingSurface};
use constellation::prelude::*;

fn scheduler() -> Scheduler<RecordingSurface> {
    Scheduler::new(Engine::new(&seeded_config(25), Bounds::new(400.0, 300.0)))
}

fn pump(scheduler: &mut Scheduler<RecordingSurface>, host: &mut ManualHost, frames: usize) -> usize {
    let mut ticked = 0;
    for _ in 0..frames {
        let Some(request) = host.take() else {
            break;
        };
        if scheduler.on_frame(host, request) {
            ticked += 1;
        }
    }
    ticked
}

#[test]
fn test_refuses_to_start_without_surface() {
    let mut host = ManualHost::default();
    let mut sched = scheduler();
    assert!(!sched.start(&mut host));
    assert_eq!(sched.state(), SchedulerState::Stopped);
    assert!(host.pending().is_none());
}

#[test]
fn test_runs_until_stopped() {
    let mut host = ManualHost::default();
    let mut sched = scheduler();
    sched.attach_surface(RecordingSurface::new(400, 300));
    assert!(sched.start(&mut host));

    assert_eq!(pump(&mut sched, &mut host, 10), 10);
    assert_eq!(sched.surface().map(|s| s.presents), Some(10));

    sched.stop(&mut host);
    assert!(!sched.is_running());
    assert!(host.pending().is_none());
    assert_eq!(pump(&mut sched, &mut host, 10), 0);
}

#[test]
fn test_stale_callback_after_stop_is_ignored() {
    let mut host = ManualHost::default();
    let mut sched = scheduler();
    sched.attach_surface(RecordingSurface::new(400, 300));
    sched.start(&mut host);
    let in_flight = sched.pending().unwrap();

    sched.stop(&mut host);
    assert!(!sched.on_frame(&mut host, in_flight));
    assert_eq!(sched.surface().map(|s| s.presents), Some(0));

    // A restart issues a fresh token; the old one stays dead.
    sched.start(&mut host);
    assert!(!sched.on_frame(&mut host, in_flight));
    let fresh = host.take().unwrap();
    assert!(sched.on_frame(&mut host, fresh));
}

#[test]
fn test_hidden_surface_stops_and_resumes() {
    let mut host = ManualHost::default();
    let mut sched = scheduler();
    sched.attach_surface(RecordingSurface::new(400, 300));
    sched.start(&mut host);
    pump(&mut sched, &mut host, 3);

    sched.set_visible(&mut host, false);
    assert!(!sched.is_running());
    assert!(host.pending().is_none());

    sched.set_visible(&mut host, true);
    assert!(sched.is_running());
    assert_eq!(pump(&mut sched, &mut host, 2), 2);
}

#[test]
fn test_start_while_hidden_is_deferred() {
    let mut host = ManualHost::default();
    let mut sched = scheduler();
    sched.attach_surface(RecordingSurface::new(400, 300));
    sched.set_visible(&mut host, false);
    assert!(!sched.start(&mut host));

    sched.set_visible(&mut host, true);
    assert!(sched.is_running());
}

#[test]
fn test_reduced_motion_blocks_running() {
    let mut host = ManualHost::default();
    let mut sched = scheduler();
    sched.attach_surface(RecordingSurface::new(400, 300));
    sched.set_reduced_motion(&mut host, true);
    assert!(!sched.start(&mut host));
    assert!(host.pending().is_none());

    sched.set_reduced_motion(&mut host, false);
    assert!(sched.is_running());

    sched.set_reduced_motion(&mut host, true);
    assert!(!sched.is_running());
    assert_eq!(pump(&mut sched, &mut host, 5), 0);
}

#[test]
fn test_explicit_stop_is_not_undone_by_visibility() {
    let mut host = ManualHost::default();
    let mut sched = scheduler();
    sched.attach_surface(RecordingSurface::new(400, 300));
    sched.start(&mut host);
    sched.stop(&mut host);

    sched.set_visible(&mut host, false);
    sched.set_visible(&mut host, true);
    assert!(!sched.is_running());
}

#[test]
fn test_detach_stops_and_returns_surface() {
    let mut host = ManualHost::default();
    let mut sched = scheduler();
    sched.attach_surface(RecordingSurface::new(400, 300));
    sched.start(&mut host);
    pump(&mut sched, &mut host, 4);

    let surface = sched.detach_surface(&mut host).unwrap();
    assert_eq!(surface.presents, 4);
    assert!(!sched.is_running());
    assert!(sched.surface().is_none());
    assert!(!sched.start(&mut host));
}

#[test]
fn test_pointer_only_while_running() {
    let mut host = ManualHost::default();
    let mut sched = scheduler();
    sched.attach_surface(RecordingSurface::new(400, 300));

    sched.pointer_moved(50.0, 60.0);
    assert!(!sched.pointer().active);

    sched.start(&mut host);
    sched.pointer_moved(50.0, 60.0);
    assert_eq!(sched.pointer().position, Vec2::new(50.0, 60.0));
    sched.pointer_left();
    assert!(!sched.pointer().active);

    sched.pointer_moved(10.0, 10.0);
    sched.set_visible(&mut host, false);
    assert_eq!(*sched.pointer(), PointerState::default());
}

#[test]
fn test_resize_updates_bounds_and_surface() {
    let mut host = ManualHost::default();
    let mut sched = scheduler();
    sched.attach_surface(RecordingSurface::new(400, 300));
    sched.start(&mut host);

    sched.resize(120, 90);
    assert_eq!(sched.engine().bounds(), Bounds::new(120.0, 90.0));
    assert_eq!(sched.surface().map(|s| s.size()), Some((120, 90)));
    assert_eq!(sched.engine().store().len(), 25);

    pump(&mut sched, &mut host, 1);
    let bounds = sched.engine().bounds();
    assert!(sched.engine().store().particles().iter().all(|p| bounds.contains(p.position)));
}

#[test]
fn test_attach_takes_surface_size() {
    let mut sched = scheduler();
    sched.attach_surface(RecordingSurface::new(640, 480));
    assert_eq!(sched.engine().bounds(), Bounds::new(640.0, 480.0));
}

#[test]
fn test_store_survives_stop_and_start() {
    let mut host = ManualHost::default();
    let mut sched = scheduler();
    sched.attach_surface(RecordingSurface::new(400, 300));
    sched.start(&mut host);
    pump(&mut sched, &mut host, 5);

    sched.stop(&mut host);
    let parked: Vec<Particle> = sched.engine().store().particles().to_vec();

    sched.start(&mut host);
    assert_eq!(sched.engine().store().particles(), parked.as_slice());
    assert_eq!(pump(&mut sched, &mut host, 1), 1);
    assert_eq!(sched.engine().store().len(), parked.len());
}
