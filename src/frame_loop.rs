//! Self-rescheduling per-frame loop.
//!
//! A [`FrameLoop`] runs one tick per display frame and asks its
//! [`FrameScheduler`] for the next frame after each tick. Natively the
//! scheduler is the window's `request_redraw`; in the browser winit maps
//! that onto `requestAnimationFrame`. Stopping the loop (directly or
//! through a cloned [`StopHandle`]) suppresses every later reschedule.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Something that can ask the platform for one more frame callback.
pub trait FrameScheduler {
    /// Request exactly one future frame callback.
    fn schedule_next(&mut self);
}

/// Cloneable handle that stops a [`FrameLoop`] from anywhere.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Stop the loop. Idempotent.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether the loop has been stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A per-frame loop driven by a [`FrameScheduler`].
#[derive(Debug)]
pub struct FrameLoop<S> {
    scheduler: S,
    stop: StopHandle,
    started: bool,
    frames: u64,
}

impl<S: FrameScheduler> FrameLoop<S> {
    /// A loop that has not yet scheduled anything.
    #[must_use]
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            stop: StopHandle::default(),
            started: false,
            frames: 0,
        }
    }

    /// Schedule the first frame.
    ///
    /// Returns `false` without scheduling if the loop is already running or
    /// has been stopped.
    pub fn start(&mut self) -> bool {
        if self.started || self.stop.is_stopped() {
            return false;
        }
        self.started = true;
        self.scheduler.schedule_next();
        true
    }

    /// Run one frame: call `tick`, then schedule the next frame.
    ///
    /// Returns `None` without calling `tick` if the loop was never started
    /// or has been stopped. A tick that stops the loop still returns its
    /// value but no further frame is scheduled.
    pub fn run_frame<R>(&mut self, tick: impl FnOnce() -> R) -> Option<R> {
        if !self.is_running() {
            return None;
        }
        let result = tick();
        self.frames += 1;
        if !self.stop.is_stopped() {
            self.scheduler.schedule_next();
        }
        Some(result)
    }

    /// Stop the loop. No further frames are scheduled.
    pub fn stop(&mut self) {
        self.stop.stop();
    }

    /// A handle that stops this loop.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Started and not stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started && !self.stop.is_stopped()
    }

    /// Number of ticks run so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The scheduler driving this loop.
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}
