//! Frame loop scheduling and per-frame controller ticks, plus viewport
//! resizing, without a window.

use std::cell::Cell;
use std::rc::Rc;

use modelview::camera::{Camera, CameraControl, OrbitControls};
use modelview::frame_loop::StopHandle;
use modelview::options::CameraOptions;
use modelview::viewport::Viewport;
use modelview::{FrameLoop, FrameScheduler, InteractionController};

/// Counts scheduled frames through a shared cell so the test can observe it
/// while the loop owns the scheduler.
#[derive(Clone, Default)]
struct SharedCounter(Rc<Cell<u32>>);

impl FrameScheduler for SharedCounter {
    fn schedule_next(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

/// Counts `update` calls and nothing else.
#[derive(Default)]
struct UpdateCounter {
    auto_rotate: bool,
    updates: u32,
}

impl CameraControl for UpdateCounter {
    fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
    }

    fn update(&mut self) -> bool {
        self.updates += 1;
        true
    }

    fn rotate_left(&mut self, _angle: f32) {}

    fn rotate_up(&mut self, _angle: f32) {}
}

#[test]
fn each_frame_schedules_exactly_one_more() {
    let counter = SharedCounter::default();
    let mut frame_loop = FrameLoop::new(counter.clone());
    assert!(frame_loop.start());
    for _ in 0..5 {
        assert_eq!(frame_loop.run_frame(|| ()), Some(()));
    }
    assert_eq!(frame_loop.frames(), 5);
    assert_eq!(counter.0.get(), 6);
}

#[test]
fn stopping_suppresses_further_frames() {
    let counter = SharedCounter::default();
    let mut frame_loop = FrameLoop::new(counter.clone());
    let _ = frame_loop.start();
    let _ = frame_loop.run_frame(|| ());
    frame_loop.stop();

    let mut ticked = false;
    assert_eq!(frame_loop.run_frame(|| ticked = true), None);
    assert!(!ticked);
    assert!(!frame_loop.start());
    assert_eq!(counter.0.get(), 2);
}

#[test]
fn stop_handle_works_from_a_clone() {
    let mut frame_loop = FrameLoop::new(SharedCounter::default());
    let handle: StopHandle = frame_loop.stop_handle();
    let _ = frame_loop.start();
    assert!(frame_loop.is_running());
    let remote = handle.clone();
    remote.stop();
    assert!(handle.is_stopped());
    assert!(!frame_loop.is_running());
}

#[test]
fn frames_tick_the_controller_once_each() {
    let mut ctl = InteractionController::new(UpdateCounter::default());
    let mut frame_loop = FrameLoop::new(SharedCounter::default());
    let _ = frame_loop.start();

    for _ in 0..3 {
        let _ = frame_loop.run_frame(|| ctl.per_frame_tick());
    }
    assert_eq!(ctl.camera().updates, 3);

    ctl.on_pointer_down();
    for _ in 0..3 {
        let _ = frame_loop.run_frame(|| ctl.per_frame_tick());
    }
    ctl.on_pointer_up();
    assert_eq!(ctl.camera().updates, 3);

    let _ = ctl.toggle_panning();
    let _ = frame_loop.run_frame(|| ctl.per_frame_tick());
    assert_eq!(ctl.camera().updates, 3);
    assert_eq!(frame_loop.frames(), 7);
}

#[test]
fn orbit_pose_reaches_the_projection_camera() {
    let options = CameraOptions {
        distance: Some(25.0),
        ..CameraOptions::default()
    };
    let mut camera = Camera::from_options(&options, 1.0);
    let mut ctl =
        InteractionController::new(OrbitControls::from_options(&options));
    let mut frame_loop = FrameLoop::new(SharedCounter::default());
    let _ = frame_loop.start();

    let _ = frame_loop.run_frame(|| {
        let _ = ctl.per_frame_tick();
        ctl.camera().apply_to(&mut camera);
    });
    assert!((camera.eye.length() - 25.0).abs() < 1e-3);
    assert!(camera.eye.x < 0.0);
}

#[test]
fn resize_sets_exact_size_and_aspect() {
    let mut camera = Camera::from_options(&CameraOptions::default(), 1.0);
    let mut viewport = Viewport::new(640, 480);
    for (w, h) in [(1280, 720), (333, 777), (1280, 720)] {
        assert!(viewport.resize(w, h, &mut camera));
        assert_eq!((viewport.width(), viewport.height()), (w, h));
        assert_eq!(camera.aspect, w as f32 / h as f32);
        assert_eq!(viewport.aspect(), camera.aspect);
    }
}
