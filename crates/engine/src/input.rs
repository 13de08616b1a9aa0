//! Input translation
//! Turns raw pointer/touch/resize events into engine commands.
//! Commands that cannot be applied immediately are kept in a FIFO queue.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::geometry::{Point, Size};
use crate::time::Timestamp;

/// Raw host event, already reduced to plain data
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse position in client coordinates
    Mouse { x: f64, y: f64 },
    /// Active touch points in client coordinates, first = primary
    Touch { touches: Vec<Point> },
    /// Viewport resized
    Resize(Size),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SpawnAt(Point),
    Resize(Size),
}

/// Gatekeeper between host listeners and the engine
#[derive(Debug, Default)]
pub struct InputBridge {
    attached: Cell<bool>,
    pending: RefCell<VecDeque<(Command, Timestamp)>>,
}

impl InputBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self) {
        self.attached.set(true);
    }

    /// Stop accepting events and drop anything still queued
    pub fn detach(&self) {
        self.attached.set(false);
        self.pending.borrow_mut().clear();
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Translate an event. Returns `None` when detached or when the event
    /// carries no usable coordinates.
    pub fn translate(&self, event: &InputEvent) -> Option<Command> {
        if !self.attached.get() {
            return None;
        }
        match event {
            InputEvent::Mouse { x, y } => finite_point(*x, *y).map(Command::SpawnAt),
            InputEvent::Touch { touches } => touches
                .first()
                .and_then(|t| finite_point(t.x, t.y))
                .map(Command::SpawnAt),
            InputEvent::Resize(size) => Some(Command::Resize(*size)),
        }
    }

    /// Queue a command for the next frame
    pub fn defer(&self, command: Command, at: Timestamp) {
        if self.attached.get() {
            self.pending.borrow_mut().push_back((command, at));
        }
    }

    /// Take all queued commands in arrival order
    pub fn drain(&self) -> Vec<(Command, Timestamp)> {
        self.pending.borrow_mut().drain(..).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }
}

fn finite_point(x: f64, y: f64) -> Option<Point> {
    (x.is_finite() && y.is_finite()).then(|| Point::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached() -> InputBridge {
        let bridge = InputBridge::new();
        bridge.attach();
        bridge
    }

    #[test]
    fn mouse_and_first_touch_spawn() {
        let bridge = attached();
        assert_eq!(
            bridge.translate(&InputEvent::Mouse { x: 3.0, y: 4.0 }),
            Some(Command::SpawnAt(Point::new(3.0, 4.0)))
        );
        let touch = InputEvent::Touch {
            touches: vec![Point::new(1.0, 2.0), Point::new(9.0, 9.0)],
        };
        assert_eq!(bridge.translate(&touch), Some(Command::SpawnAt(Point::new(1.0, 2.0))));
    }

    #[test]
    fn empty_touch_and_nan_are_ignored() {
        let bridge = attached();
        assert_eq!(bridge.translate(&InputEvent::Touch { touches: vec![] }), None);
        assert_eq!(bridge.translate(&InputEvent::Mouse { x: f64::NAN, y: 0.0 }), None);
    }

    #[test]
    fn detached_bridge_rejects_everything() {
        let bridge = attached();
        bridge.defer(Command::Resize(Size::new(1, 1)), Timestamp::ZERO);
        bridge.detach();
        assert_eq!(bridge.pending_count(), 0);
        assert_eq!(bridge.translate(&InputEvent::Mouse { x: 1.0, y: 1.0 }), None);
        assert_eq!(bridge.translate(&InputEvent::Resize(Size::new(5, 5))), None);
        bridge.defer(Command::SpawnAt(Point::default()), Timestamp::ZERO);
        assert_eq!(bridge.pending_count(), 0);
    }

    #[test]
    fn drain_is_fifo() {
        let bridge = attached();
        bridge.defer(Command::SpawnAt(Point::new(1.0, 0.0)), Timestamp::from_millis(1.0));
        bridge.defer(Command::SpawnAt(Point::new(2.0, 0.0)), Timestamp::from_millis(2.0));
        let drained = bridge.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].1, Timestamp::from_millis(1.0));
        assert_eq!(bridge.pending_count(), 0);
    }
}
