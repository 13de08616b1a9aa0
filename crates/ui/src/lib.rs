//! Browser frontend for cursor trails
//!
//! Exposes `TrailCursor` to JavaScript. Mounting creates a full-viewport
//! overlay canvas, wires window pointer and resize events into the engine
//! and drives frames with requestAnimationFrame.

mod dom;
mod listeners;
mod scheduler;
mod surface;

use std::cell::RefCell;
use std::rc::Rc;

use cursor_trails_engine::{EffectKind, InputEvent, LoopState, Trail, TrailError, TrailOptions};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement, Window};

pub use listeners::DomListeners;
pub use scheduler::RafScheduler;
pub use surface::CanvasSurface;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    tracing_wasm::set_as_global_default();
}

/// Names accepted by the `TrailCursor` constructor
#[wasm_bindgen(js_name = effectNames)]
pub fn effect_names() -> js_sys::Array {
    EffectKind::ALL
        .iter()
        .map(|kind| JsValue::from_str(kind.name()))
        .collect()
}

/// Read a JS options object. An invalid field falls back to the effect's
/// default on its own; the other fields are kept.
fn read_options(options: &JsValue) -> TrailOptions {
    if options.is_undefined() || options.is_null() {
        return TrailOptions::default();
    }
    let parsed = js_sys::JSON::stringify(options)
        .map_err(|e| format!("{e:?}"))
        .and_then(|json| {
            let json: String = json.into();
            TrailOptions::from_json_lenient(&json).map_err(|e| e.to_string())
        });
    match parsed {
        Ok((options, rejected)) => {
            for (option, error) in rejected {
                tracing::warn!(%option, %error, "ignoring invalid trail option");
            }
            options
        }
        Err(error) => {
            tracing::warn!(%error, "invalid trail options, using defaults");
            TrailOptions::default()
        }
    }
}

struct Mounted {
    trail: Rc<RefCell<Box<dyn Trail>>>,
    /// Dropped before the trail is unmounted so no event reaches it afterwards
    listeners: Option<DomListeners>,
    canvas: Option<HtmlCanvasElement>,
}

impl Mounted {
    fn teardown(mut self) {
        self.listeners.take();
        self.trail.borrow_mut().unmount();
        if let Some(canvas) = self.canvas.take() {
            canvas.remove();
        }
    }
}

#[wasm_bindgen]
pub struct TrailCursor {
    kind: EffectKind,
    options: TrailOptions,
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl TrailCursor {
    /// `effect` is one of `effectNames()`; `options` uses the camelCase prop names
    #[wasm_bindgen(constructor)]
    pub fn new(effect: &str, options: JsValue) -> Result<TrailCursor, JsError> {
        let kind: EffectKind = effect.parse()?;
        Ok(Self {
            kind,
            options: read_options(&options),
            mounted: None,
        })
    }

    /// Attach the overlay to `host` (default `document.body`) and start animating.
    ///
    /// Never throws: without a usable canvas the trail is mounted degraded.
    pub fn mount(&mut self, host: Option<HtmlElement>) {
        self.unmount();

        let Some(window) = web_sys::window() else {
            tracing::warn!(effect = self.kind.name(), "no window, trail disabled");
            return;
        };
        let canvas = dom::document()
            .ok_or_else(|| JsValue::from_str("no document"))
            .and_then(|doc| dom::create_overlay(&doc, host.as_ref()));

        let surface = match &canvas {
            Ok(canvas) => CanvasSurface::new(canvas.clone(), window.device_pixel_ratio()),
            Err(e) => Err(TrailError::ContextUnavailable(format!("{e:?}"))),
        };
        let scheduler = Rc::new(RafScheduler::new(window.clone()));
        let trail = self
            .kind
            .mount(&self.options, surface, dom::viewport_size(&window), scheduler);
        let trail = Rc::new(RefCell::new(trail));
        let mut canvas = canvas.ok();

        let listeners = if trail.borrow().is_degraded() {
            if let Some(canvas) = canvas.take() {
                canvas.remove();
            }
            None
        } else {
            match attach_listeners(&window, &trail) {
                Ok(listeners) => Some(listeners),
                Err(e) => {
                    tracing::warn!(error = ?e, "failed to attach listeners");
                    None
                }
            }
        };

        self.mounted = Some(Mounted {
            trail,
            listeners,
            canvas,
        });
    }

    /// Stop animating, detach listeners and remove the overlay. Idempotent.
    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            mounted.teardown();
        }
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.mounted
            .as_ref()
            .is_some_and(|m| m.trail.borrow().state() == LoopState::Running)
    }

    #[wasm_bindgen(getter, js_name = isDegraded)]
    pub fn is_degraded(&self) -> bool {
        self.mounted
            .as_ref()
            .is_some_and(|m| m.trail.borrow().is_degraded())
    }

    #[wasm_bindgen(getter, js_name = liveParticles)]
    pub fn live_particles(&self) -> usize {
        self.mounted
            .as_ref()
            .map_or(0, |m| m.trail.borrow().live_particles())
    }

    #[wasm_bindgen(getter)]
    pub fn effect(&self) -> String {
        self.kind.name().to_string()
    }
}

impl Drop for TrailCursor {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Feed `event` to the trail stamped with the current time
fn dispatch(window: &Window, trail: &RefCell<Box<dyn Trail>>, event: &InputEvent) {
    // a trail mid-unmount is already detached
    if let Ok(trail) = trail.try_borrow() {
        trail.handle(event, dom::now(window));
    }
}

fn attach_listeners(window: &Window, trail: &Rc<RefCell<Box<dyn Trail>>>) -> Result<DomListeners, JsValue> {
    let mut listeners = DomListeners::new(window.clone().into());

    for kind in ["mousemove", "touchmove"] {
        let (w, t) = (window.clone(), Rc::clone(trail));
        listeners.listen(kind, move |event| {
            if let Some(input) = dom::pointer_event(&event) {
                dispatch(&w, &t, &input);
            }
        })?;
    }

    let (w, t) = (window.clone(), Rc::clone(trail));
    listeners.listen("resize", move |_| {
        dispatch(&w, &t, &InputEvent::Resize(dom::viewport_size(&w)));
    })?;

    Ok(listeners)
}
