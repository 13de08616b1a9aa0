//! Browser tests, run with `wasm-pack test --headless --chrome crates/ui`
#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use cursor_trails_engine::{Color, FrameScheduler, Painter, Point, RenderSurface, Size, Style};
use cursor_trails_ui::{CanvasSurface, DomListeners, RafScheduler, TrailCursor};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Event, HtmlCanvasElement};

wasm_bindgen_test_configure!(run_in_browser);

fn canvas() -> HtmlCanvasElement {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.create_element("canvas").ok())
        .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
        .expect("canvas element")
}

#[wasm_bindgen_test]
fn resize_scales_backing_store() {
    let mut surface = CanvasSurface::new(canvas(), 2.0).expect("2d context");
    surface.resize(Size::new(300, 150));
    assert_eq!(surface.size(), Size::new(300, 150));
    assert_eq!(surface.canvas().width(), 600);
    assert_eq!(surface.canvas().height(), 300);
}

#[wasm_bindgen_test]
fn negative_radius_is_a_paint_error() {
    let mut surface = CanvasSurface::new(canvas(), 1.0).expect("2d context");
    surface.resize(Size::new(10, 10));
    let painter = surface.painter();
    assert!(painter
        .fill_circle(Point::new(1.0, 1.0), -1.0, &Style::fill(Color::WHITE))
        .is_err());
    assert!(painter
        .fill_circle(Point::new(1.0, 1.0), 2.0, &Style::fill(Color::WHITE))
        .is_ok());
}

#[wasm_bindgen_test]
fn mount_and_unmount_overlay() {
    let Ok(mut cursor) = TrailCursor::new("sparkle", JsValue::UNDEFINED) else {
        panic!("sparkle is a known effect");
    };
    cursor.mount(None);
    assert!(cursor.is_running());
    assert!(!cursor.is_degraded());

    cursor.unmount();
    assert!(!cursor.is_running());
    assert_eq!(cursor.live_particles(), 0);
}

#[wasm_bindgen_test]
fn unknown_effect_is_rejected() {
    assert!(TrailCursor::new("plasma", JsValue::NULL).is_err());
}

#[wasm_bindgen_test]
fn effect_names_lists_every_kind() {
    assert_eq!(cursor_trails_ui::effect_names().length(), 26);
}

#[wasm_bindgen_test]
fn listeners_fire_until_dropped() {
    let target = canvas();
    let hits = Rc::new(Cell::new(0));
    let mut listeners = DomListeners::new(target.clone().into());
    assert!(listeners.is_empty());

    let counter = Rc::clone(&hits);
    listeners
        .listen("ping", move |_| counter.set(counter.get() + 1))
        .unwrap();
    assert_eq!(listeners.len(), 1);

    let event = Event::new("ping").unwrap();
    target.dispatch_event(&event).unwrap();
    assert_eq!(hits.get(), 1);

    drop(listeners);
    target.dispatch_event(&event).unwrap();
    assert_eq!(hits.get(), 1);
}

#[wasm_bindgen_test]
fn cancelled_frame_is_no_longer_pending() {
    let Some(window) = web_sys::window() else {
        panic!("tests run in a browser");
    };
    let scheduler = RafScheduler::new(window);
    let request = scheduler
        .request_frame(Box::new(|_| {}))
        .expect("frame requested");
    assert_eq!(scheduler.pending(), 1);

    scheduler.cancel_frame(request);
    assert_eq!(scheduler.pending(), 0);
}
