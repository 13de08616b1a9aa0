//! DOM event listeners that unregister themselves on drop

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

pub struct DomListeners {
    target: EventTarget,
    registered: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

impl DomListeners {
    pub const fn new(target: EventTarget) -> Self {
        Self {
            target,
            registered: Vec::new(),
        }
    }

    /// Register a passive listener for `kind`
    pub fn listen<F>(&mut self, kind: &'static str, handler: F) -> Result<(), JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        self.target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            )?;
        self.registered.push((kind, closure));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

impl Drop for DomListeners {
    fn drop(&mut self) {
        for (kind, closure) in self.registered.drain(..) {
            let _ = self
                .target
                .remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        }
    }
}
