//! DOM helpers: overlay canvas, viewport size, event conversion

use cursor_trails_engine::{InputEvent, Point, Size, Timestamp};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Event, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent, Window};

const OVERLAY_STYLE: &str =
    "position:fixed;top:0;left:0;width:100%;height:100%;pointer-events:none;z-index:2147483647";

pub fn document() -> Option<Document> {
    window().and_then(|w| w.document())
}

/// Viewport size in CSS pixels
pub fn viewport_size(window: &Window) -> Size {
    let dim = |v: Result<JsValue, JsValue>| {
        v.ok()
            .and_then(|v| v.as_f64())
            .filter(|v| v.is_finite() && *v > 0.0)
            .map_or(0, |v| v as u32)
    };
    Size::new(dim(window.inner_width()), dim(window.inner_height()))
}

/// Monotonic clock shared with requestAnimationFrame timestamps
pub fn now(window: &Window) -> Timestamp {
    window
        .performance()
        .map_or(Timestamp::ZERO, |p| Timestamp::from_millis(p.now()))
}

/// Full-viewport canvas that never intercepts pointer events
pub fn create_overlay(document: &Document, host: Option<&HtmlElement>) -> Result<HtmlCanvasElement, JsValue> {
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    canvas.set_attribute("style", OVERLAY_STYLE)?;
    canvas.set_attribute("aria-hidden", "true")?;

    let parent = match host {
        Some(host) => host.clone(),
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?,
    };
    parent.append_child(&canvas)?;
    Ok(canvas)
}

/// Reduce a pointer event to plain data; `None` for anything else
pub fn pointer_event(event: &Event) -> Option<InputEvent> {
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        return Some(InputEvent::Mouse {
            x: f64::from(mouse.client_x()),
            y: f64::from(mouse.client_y()),
        });
    }
    let touch = event.dyn_ref::<TouchEvent>()?;
    let list = touch.touches();
    let touches = (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| Point::new(f64::from(t.client_x()), f64::from(t.client_y())))
        .collect();
    Some(InputEvent::Touch { touches })
}
