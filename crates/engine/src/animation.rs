//! Animation loop
//!
//! A run-until-cancelled frame loop bound to the host's refresh cycle.
//! Each iteration checks the loop state before running and before
//! rescheduling, so a stopped loop never runs another frame body even if a
//! callback was already queued with the host.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::error::{Result, TrailError};
use crate::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Not started
    Idle,
    Running,
    /// Torn down; terminal
    Stopped,
}

/// Host handle for a scheduled frame (the rAF request id in the browser)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub i32);

pub type FrameCallback = Box<dyn FnOnce(Timestamp)>;

/// The host's display refresh cycle
pub trait FrameScheduler {
    /// Run `callback` once at the next refresh tick
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameRequest>;

    fn cancel_frame(&self, request: FrameRequest);
}

struct LoopInner {
    state: Cell<LoopState>,
    pending: Cell<Option<FrameRequest>>,
    frames: Cell<u64>,
    scheduler: Rc<dyn FrameScheduler>,
}

pub struct AnimationLoop {
    inner: Rc<LoopInner>,
}

impl AnimationLoop {
    pub fn new(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            inner: Rc::new(LoopInner {
                state: Cell::new(LoopState::Idle),
                pending: Cell::new(None),
                frames: Cell::new(0),
                scheduler,
            }),
        }
    }

    pub fn state(&self) -> LoopState {
        self.inner.state.get()
    }

    /// Frames whose body has run
    pub fn frames(&self) -> u64 {
        self.inner.frames.get()
    }

    /// Idle -> Running. Schedules the first frame.
    pub fn start<F>(&self, on_frame: F) -> Result<()>
    where
        F: FnMut(Timestamp) + 'static,
    {
        match self.inner.state.get() {
            LoopState::Idle => {}
            other => return Err(TrailError::LoopState(other)),
        }
        self.inner.state.set(LoopState::Running);
        let on_frame: Rc<RefCell<dyn FnMut(Timestamp)>> = Rc::new(RefCell::new(on_frame));
        schedule(&self.inner, on_frame);
        tracing::debug!("animation loop started");
        Ok(())
    }

    /// Running -> Stopped; cancels the pending request. Idempotent.
    pub fn stop(&self) {
        if self.inner.state.replace(LoopState::Stopped) == LoopState::Stopped {
            return;
        }
        if let Some(request) = self.inner.pending.take() {
            self.inner.scheduler.cancel_frame(request);
        }
        tracing::debug!(frames = self.inner.frames.get(), "animation loop stopped");
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule(inner: &Rc<LoopInner>, on_frame: Rc<RefCell<dyn FnMut(Timestamp)>>) {
    let weak: Weak<LoopInner> = Rc::downgrade(inner);
    let request = inner.scheduler.request_frame(Box::new(move |now| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        inner.pending.set(None);
        if inner.state.get() != LoopState::Running {
            return;
        }

        (&mut *on_frame.borrow_mut())(now);
        inner.frames.set(inner.frames.get() + 1);

        if inner.state.get() == LoopState::Running {
            schedule(&inner, on_frame);
        }
    }));
    inner.pending.set(request);
}

/// Deterministic scheduler: frames run only when `tick` is called
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<Vec<(FrameRequest, FrameCallback)>>,
    next_id: Cell<i32>,
}

impl ManualScheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Run every callback queued before this call; returns how many ran.
    /// Callbacks requested during the tick wait for the next one.
    pub fn tick(&self, now: Timestamp) -> usize {
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let ran = due.len();
        for (_, callback) in due {
            callback(now);
        }
        ran
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameRequest> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.queue.borrow_mut().push((FrameRequest(id), callback));
        Some(FrameRequest(id))
    }

    fn cancel_frame(&self, request: FrameRequest) {
        self.queue.borrow_mut().retain(|(id, _)| *id != request);
    }
}
