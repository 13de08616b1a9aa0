//! Canvas 2D backend for the engine's drawing surface
//!
//! Sizes the backing store for HiDPI and maps `Style` onto the context's
//! fill, stroke, alpha and shadow state. Every shape is drawn between
//! `save`/`restore` so styles never leak from one particle to the next.

use std::f64::consts::TAU;

use cursor_trails_engine::surface::check_radius;
use cursor_trails_engine::{
    Brush, EffectError, Painter, Path, Point, RenderSurface, Size, Style, TrailError,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

fn paint_err(e: &JsValue) -> EffectError {
    EffectError::Paint(format!("{e:?}"))
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
    size: Size,
}

impl CanvasSurface {
    /// Acquire the 2D context of `canvas`.
    ///
    /// Fails with `ContextUnavailable` when the browser gives no 2D context.
    pub fn new(canvas: HtmlCanvasElement, dpr: f64) -> Result<Self, TrailError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| TrailError::ContextUnavailable(format!("{e:?}")))?
            .ok_or_else(|| TrailError::ContextUnavailable("2d context not supported".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| TrailError::ContextUnavailable("unexpected context type".to_string()))?;

        Ok(Self {
            canvas,
            ctx,
            dpr: if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 },
            size: Size::default(),
        })
    }

    pub const fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    #[allow(deprecated)] // web-sys set_*_style(&JsValue) deprecation is overzealous
    fn apply(&self, style: &Style, stroke: bool) -> Result<(), EffectError> {
        self.ctx.set_global_alpha(style.alpha);
        self.ctx.set_line_width(style.line_width);

        match &style.brush {
            Brush::Solid(color) => {
                let css = JsValue::from_str(&color.to_css());
                if stroke {
                    self.ctx.set_stroke_style(&css);
                } else {
                    self.ctx.set_fill_style(&css);
                }
            }
            Brush::LinearGradient { from, to, stops } => {
                let gradient = self.ctx.create_linear_gradient(from.x, from.y, to.x, to.y);
                gradient
                    .add_color_stop(0.0, &stops[0].to_css())
                    .map_err(|e| paint_err(&e))?;
                gradient
                    .add_color_stop(1.0, &stops[1].to_css())
                    .map_err(|e| paint_err(&e))?;
                if stroke {
                    self.ctx.set_stroke_style(&gradient);
                } else {
                    self.ctx.set_fill_style(&gradient);
                }
            }
        }

        if let Some(glow) = style.glow {
            self.ctx.set_shadow_color(&glow.color.to_css());
            self.ctx.set_shadow_blur(glow.blur);
        }
        Ok(())
    }

    fn circle(&self, center: Point, radius: f64, style: &Style, stroke: bool) -> Result<(), EffectError> {
        check_radius(radius)?;
        self.ctx.save();
        let drawn = self.apply(style, stroke).and_then(|()| {
            self.ctx.begin_path();
            self.ctx
                .arc(center.x, center.y, radius, 0.0, TAU)
                .map_err(|e| paint_err(&e))?;
            if stroke {
                self.ctx.stroke();
            } else {
                self.ctx.fill();
            }
            Ok(())
        });
        self.ctx.restore();
        drawn
    }
}

impl Painter for CanvasSurface {
    fn viewport(&self) -> Size {
        self.size
    }

    fn fill_circle(&mut self, center: Point, radius: f64, style: &Style) -> Result<(), EffectError> {
        self.circle(center, radius, style, false)
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, style: &Style) -> Result<(), EffectError> {
        self.circle(center, radius, style, true)
    }

    fn stroke_path(&mut self, path: &Path, style: &Style) -> Result<(), EffectError> {
        if path.is_empty() {
            return Ok(());
        }
        self.ctx.save();
        let drawn = self.apply(style, true).map(|()| {
            self.ctx.begin_path();
            for sub in path.subpaths() {
                let Some((first, rest)) = sub.split_first() else {
                    continue;
                };
                self.ctx.move_to(first.x, first.y);
                for p in rest {
                    self.ctx.line_to(p.x, p.y);
                }
                if path.is_closed() {
                    self.ctx.close_path();
                }
            }
            self.ctx.stroke();
        });
        self.ctx.restore();
        drawn
    }
}

impl RenderSurface for CanvasSurface {
    /// Match the viewport with a HiDPI-correct backing store
    fn resize(&mut self, size: Size) {
        if size == self.size {
            return;
        }
        self.size = size;

        let css_width = f64::from(size.width);
        let css_height = f64::from(size.height);
        self.canvas.set_width((css_width * self.dpr) as u32);
        self.canvas.set_height((css_height * self.dpr) as u32);

        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{css_width}px"));
        let _ = style.set_property("height", &format!("{css_height}px"));

        // Reset transform before scaling (prevents compound scaling)
        let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        let _ = self.ctx.scale(self.dpr, self.dpr);
    }

    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.size.width),
            f64::from(self.size.height),
        );
    }

    fn painter(&mut self) -> &mut dyn Painter {
        self
    }
}
