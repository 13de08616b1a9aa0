//! Drawing surface abstraction
//!
//! A `RenderSurface` owns the viewport dimensions and clearing; the
//! `Painter` it hands out is the capability effects draw with. The browser
//! frontend backs both with a 2D canvas context; `RecordingSurface` records
//! operations for tests.

use crate::color::Color;
use crate::effect::EffectError;
use crate::geometry::{Point, Size};

/// Paint source for fills and strokes
#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    Solid(Color),
    /// Two-stop linear gradient between `from` and `to`
    LinearGradient {
        from: Point,
        to: Point,
        stops: [Color; 2],
    },
}

/// Shadow halo drawn around shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Color,
    pub blur: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub brush: Brush,
    /// Global alpha, 0..=1
    pub alpha: f64,
    pub line_width: f64,
    pub glow: Option<Glow>,
}

impl Style {
    pub const fn fill(color: Color) -> Self {
        Self {
            brush: Brush::Solid(color),
            alpha: 1.0,
            line_width: 1.0,
            glow: None,
        }
    }

    pub const fn stroke(color: Color, line_width: f64) -> Self {
        Self {
            brush: Brush::Solid(color),
            alpha: 1.0,
            line_width,
            glow: None,
        }
    }

    pub fn with_brush(mut self, brush: Brush) -> Self {
        self.brush = brush;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub const fn with_glow(mut self, color: Color, blur: f64) -> Self {
        self.glow = Some(Glow { color, blur });
        self
    }
}

/// A polyline made of one or more subpaths
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    subpaths: Vec<Vec<Point>>,
    closed: bool,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new subpath at `p`
    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.subpaths.push(vec![p]);
        self
    }

    /// Extend the current subpath; starts one if none exists
    pub fn line_to(&mut self, p: Point) -> &mut Self {
        match self.subpaths.last_mut() {
            Some(sub) => sub.push(p),
            None => self.subpaths.push(vec![p]),
        }
        self
    }

    /// Close every subpath back to its first point when stroked
    pub fn close(&mut self) -> &mut Self {
        self.closed = true;
        self
    }

    pub fn subpaths(&self) -> &[Vec<Point>] {
        &self.subpaths
    }

    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(Vec::is_empty)
    }
}

impl FromIterator<Point> for Path {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        let mut path = Self::new();
        for p in iter {
            path.line_to(p);
        }
        path
    }
}

/// Paint operations available to effects
pub trait Painter {
    /// Current surface size in CSS pixels
    fn viewport(&self) -> Size;

    fn fill_circle(&mut self, center: Point, radius: f64, style: &Style) -> Result<(), EffectError>;

    fn stroke_circle(&mut self, center: Point, radius: f64, style: &Style) -> Result<(), EffectError>;

    fn stroke_path(&mut self, path: &Path, style: &Style) -> Result<(), EffectError>;
}

pub trait RenderSurface {
    /// Match the viewport. Called at mount and on every resize event.
    fn resize(&mut self, size: Size);

    fn size(&self) -> Size;

    /// Erase everything drawn in the previous frame
    fn clear(&mut self);

    /// Drawing handle for this frame
    fn painter(&mut self) -> &mut dyn Painter;
}

/// Shared radius validation; the canvas API rejects negative radii
pub fn check_radius(radius: f64) -> Result<(), EffectError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(EffectError::Paint(format!("invalid radius {radius}")))
    }
}

/// Recorded paint operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    FillCircle { center: Point, radius: f64, style: Style },
    StrokeCircle { center: Point, radius: f64, style: Style },
    StrokePath { path: Path, style: Style },
}

/// Headless surface that records every operation since the last clear
#[derive(Debug, Default)]
pub struct RecordingSurface {
    size: Size,
    ops: Vec<DrawOp>,
    clears: u64,
    resizes: u64,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Operations issued since the last clear
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub const fn clear_count(&self) -> u64 {
        self.clears
    }

    pub const fn resize_count(&self) -> u64 {
        self.resizes
    }
}

impl Painter for RecordingSurface {
    fn viewport(&self) -> Size {
        self.size
    }

    fn fill_circle(&mut self, center: Point, radius: f64, style: &Style) -> Result<(), EffectError> {
        check_radius(radius)?;
        self.ops.push(DrawOp::FillCircle {
            center,
            radius,
            style: style.clone(),
        });
        Ok(())
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, style: &Style) -> Result<(), EffectError> {
        check_radius(radius)?;
        self.ops.push(DrawOp::StrokeCircle {
            center,
            radius,
            style: style.clone(),
        });
        Ok(())
    }

    fn stroke_path(&mut self, path: &Path, style: &Style) -> Result<(), EffectError> {
        self.ops.push(DrawOp::StrokePath {
            path: path.clone(),
            style: style.clone(),
        });
        Ok(())
    }
}

impl RenderSurface for RecordingSurface {
    fn resize(&mut self, size: Size) {
        if self.size != size {
            self.size = size;
            self.resizes += 1;
        }
    }

    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear);
        self.clears += 1;
    }

    fn painter(&mut self) -> &mut dyn Painter {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_builds_subpaths() {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0))
            .line_to(Point::new(1.0, 1.0))
            .move_to(Point::new(5.0, 5.0))
            .line_to(Point::new(6.0, 6.0));
        assert_eq!(path.subpaths().len(), 2);
        assert!(!path.is_closed());
    }

    #[test]
    fn line_to_without_move_starts_subpath() {
        let path: Path = [Point::new(0.0, 0.0), Point::new(2.0, 0.0)].into_iter().collect();
        assert_eq!(path.subpaths(), &[vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)]]);
    }

    #[test]
    fn recording_surface_rejects_negative_radius() {
        let mut surface = RecordingSurface::new(Size::new(100, 100));
        let style = Style::fill(Color::WHITE);
        assert!(surface.fill_circle(Point::default(), -1.0, &style).is_err());
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn clear_resets_ops_and_resize_is_idempotent() {
        let mut surface = RecordingSurface::new(Size::new(100, 100));
        surface
            .stroke_circle(Point::default(), 2.0, &Style::stroke(Color::BLACK, 2.0))
            .unwrap();
        surface.clear();
        assert_eq!(surface.ops(), &[DrawOp::Clear]);

        surface.resize(Size::new(100, 100));
        assert_eq!(surface.resize_count(), 0);
        surface.resize(Size::new(320, 200));
        assert_eq!(surface.size(), Size::new(320, 200));
        assert_eq!(surface.resize_count(), 1);
    }
}
