//! requestAnimationFrame-backed frame scheduler
//!
//! Each request owns its `Closure` until the browser has run it or the
//! request is cancelled. A closure cannot be dropped while it runs, so
//! finished requests are reaped on the next `request_frame`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use cursor_trails_engine::animation::FrameCallback;
use cursor_trails_engine::{FrameRequest, FrameScheduler, Timestamp};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

struct Slot {
    handle: i32,
    _closure: Closure<dyn FnMut(f64)>,
}

pub struct RafScheduler {
    window: Window,
    next_token: Cell<i32>,
    slots: RefCell<HashMap<i32, Slot>>,
    finished: Rc<RefCell<Vec<i32>>>,
}

impl RafScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            next_token: Cell::new(0),
            slots: RefCell::new(HashMap::new()),
            finished: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Drop closures whose frame already ran
    fn reap(&self) {
        let finished = std::mem::take(&mut *self.finished.borrow_mut());
        let mut slots = self.slots.borrow_mut();
        for token in finished {
            slots.remove(&token);
        }
    }

    pub fn pending(&self) -> usize {
        self.slots.borrow().len().saturating_sub(self.finished.borrow().len())
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameRequest> {
        self.reap();

        let token = self.next_token.get().wrapping_add(1);
        self.next_token.set(token);

        let finished = Rc::clone(&self.finished);
        let closure = Closure::once(Box::new(move |ts: f64| {
            callback(Timestamp::from_millis(ts));
            finished.borrow_mut().push(token);
        }) as Box<dyn FnOnce(f64)>);

        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(handle) => {
                self.slots.borrow_mut().insert(
                    token,
                    Slot {
                        handle,
                        _closure: closure,
                    },
                );
                Some(FrameRequest(token))
            }
            Err(e) => {
                tracing::warn!(error = ?e, "requestAnimationFrame failed");
                None
            }
        }
    }

    fn cancel_frame(&self, request: FrameRequest) {
        let slot = self.slots.borrow_mut().remove(&request.0);
        if let Some(slot) = slot {
            let _ = self.window.cancel_animation_frame(slot.handle);
        }
    }
}

impl Drop for RafScheduler {
    fn drop(&mut self) {
        for slot in self.slots.get_mut().values() {
            let _ = self.window.cancel_animation_frame(slot.handle);
        }
    }
}
