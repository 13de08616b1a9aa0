//! Stroked line patterns anchored at the spawn point
//!
//! One particle per pointer move. The pattern is redrawn every frame from
//! the particle's frame age and expires after a fixed number of frames.

use rand::rngs::StdRng;

use crate::color::Color;
use crate::config::TrailOptions;
use crate::effect::{Effect, EffectError};
use crate::geometry::Point;
use crate::particle::Particle;
use crate::surface::{Brush, Painter, Path, Style};
use crate::time::Timestamp;

/// Frame bound for patterns whose `length` is not a lifetime
const FIXED_FRAMES: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Short horizontal beam
    Laser,
    /// Open spiral of `length` points
    SpiralLine,
    /// Sine wave scrolling with age
    Waveform,
    /// Square outline flipping side every `speed` frames
    Zigzag,
    /// Rings expanding with age
    Concentric,
    /// Two fans of diagonal hatching
    Diagonal,
    /// Horizontal bar painted with a two-stop gradient
    Gradient,
    /// Grid snapped to `gridSize`, extending to the viewport edges
    Grid,
}

impl Pattern {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Laser => "laser-beam",
            Self::SpiralLine => "spiral-line",
            Self::Waveform => "waveform-line",
            Self::Zigzag => "zigzag-line",
            Self::Concentric => "concentric-lines",
            Self::Diagonal => "diagonal-lines",
            Self::Gradient => "linear-gradient",
            Self::Grid => "grid-pattern",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrokeState {
    /// Frames updated so far
    pub frames: u32,
}

impl StrokeState {
    /// Age seen by the draw rule: zero on the first frame
    fn phase(self) -> f64 {
        f64::from(self.frames.saturating_sub(1))
    }
}

#[derive(Debug, Clone)]
pub struct Strokes {
    pattern: Pattern,
    color: Color,
    gradient: [Color; 2],
    count: usize,
    width: f64,
    length: f64,
    speed: f64,
    amplitude: f64,
    frequency: f64,
    turns: f64,
    spacing: f64,
    step: f64,
    line_count: usize,
    line_length: f64,
    grid_size: f64,
    line_spacing: f64,
}

impl Strokes {
    pub fn new(pattern: Pattern, options: &TrailOptions) -> Self {
        // (color, width, length)
        let (color, width, length) = match pattern {
            Pattern::Laser => (0xFF0000, 4.0, 100.0),
            Pattern::SpiralLine => (0x00FF00, 2.0, 10.0),
            Pattern::Waveform => (0xFF1493, 2.0, 50.0),
            Pattern::Zigzag => (0xFF00FF, 3.0, 100.0),
            Pattern::Concentric => (0x00BFFF, 1.0, FIXED_FRAMES),
            Pattern::Diagonal => (0x8A2BE2, 1.0, FIXED_FRAMES),
            Pattern::Gradient => (0xFF6347, 2.0, 50.0),
            Pattern::Grid => (0xFF4500, 1.0, FIXED_FRAMES),
        };
        let speed = match pattern {
            Pattern::Laser => 5.0,
            _ => 2.0,
        };
        let gradient = match options.colors.as_deref() {
            Some([only]) => [*only, *only],
            Some([first, second, ..]) => [*first, *second],
            _ => [Color::from_u32(0xFF6347), Color::from_u32(0xFFD700)],
        };

        Self {
            pattern,
            color: options.color.unwrap_or(Color::from_u32(color)),
            gradient,
            count: options.trails.unwrap_or(1),
            width: options.width.or(options.line_width).unwrap_or(width),
            length: options.length.unwrap_or(length),
            speed: options.speed.unwrap_or(speed),
            amplitude: options.amplitude.unwrap_or(15.0),
            frequency: options.frequency.unwrap_or(0.2),
            // divides the point index; never zero
            turns: options.turns.unwrap_or(7.0).max(f64::EPSILON),
            spacing: options.spacing.unwrap_or(2.0),
            step: options.step_size.unwrap_or(15.0),
            line_count: options.line_count.unwrap_or(7),
            line_length: options.line_length.unwrap_or(10.0),
            grid_size: options.grid_size.unwrap_or(4.0),
            line_spacing: options.line_spacing.unwrap_or(5.0),
        }
    }

    /// Frames a pattern stays on screen
    fn max_frames(&self) -> f64 {
        match self.pattern {
            Pattern::Laser | Pattern::SpiralLine | Pattern::Waveform | Pattern::Zigzag => self.length,
            _ => FIXED_FRAMES,
        }
    }

    fn point_count(&self) -> usize {
        self.length.max(0.0) as usize
    }

    fn spiral(&self, at: Point) -> Path {
        (0..self.point_count())
            .map(|i| {
                let i = i as f64;
                at.polar_offset(i / self.turns, i * self.spacing)
            })
            .collect()
    }

    fn waveform(&self, at: Point, age: f64) -> Path {
        (0..self.point_count())
            .map(|i| {
                let x = at.x + i as f64;
                let y = at.y + self.amplitude * (self.frequency * (x - age * self.speed)).sin();
                Point::new(x, y)
            })
            .collect()
    }

    fn zigzag(&self, at: Point, age: f64) -> Path {
        // a zero speed never flips
        let flips = if self.speed > 0.0 { (age / self.speed).floor() } else { 0.0 };
        let dx = if flips % 2.0 == 0.0 { self.step } else { -self.step };
        let mut path = Path::new();
        path.move_to(at)
            .line_to(at.translate(dx, 0.0))
            .line_to(at.translate(dx, self.step))
            .line_to(at.translate(0.0, self.step))
            .close();
        path
    }

    fn diagonal(&self, at: Point) -> Path {
        let len = self.line_length;
        let mut path = Path::new();
        for i in 0..len.max(0.0) as usize {
            let offset = i as f64 * self.spacing;
            path.move_to(at.translate(offset, 0.0))
                .line_to(at.translate(offset + len, len));
            path.move_to(at.translate(0.0, offset))
                .line_to(at.translate(len, offset + len));
        }
        path
    }

    fn grid(&self, at: Point, painter: &dyn Painter) -> Path {
        let viewport = painter.viewport();
        let (width, height) = (f64::from(viewport.width), f64::from(viewport.height));
        let cell = self.grid_size.max(1.0);
        let pitch = (self.grid_size + self.line_spacing).max(1.0);
        let origin = Point::new((at.x / cell).floor() * cell, (at.y / cell).floor() * cell);

        let mut path = Path::new();
        let mut x = origin.x;
        while x < width {
            path.move_to(Point::new(x, origin.y)).line_to(Point::new(x, height));
            x += pitch;
        }
        let mut y = origin.y;
        while y < height {
            path.move_to(Point::new(origin.x, y)).line_to(Point::new(width, y));
            y += pitch;
        }
        path
    }
}

impl Effect for Strokes {
    type State = StrokeState;

    fn name(&self) -> &'static str {
        self.pattern.name()
    }

    fn count(&self) -> usize {
        self.count
    }

    fn spawn(&mut self, _at: Point, _rng: &mut StdRng) -> StrokeState {
        StrokeState::default()
    }

    fn update(&self, p: &mut Particle<StrokeState>, _now: Timestamp) -> Result<(), EffectError> {
        p.state.frames = p.state.frames.saturating_add(1);
        Ok(())
    }

    fn draw(&self, p: &Particle<StrokeState>, painter: &mut dyn Painter) -> Result<(), EffectError> {
        let at = p.position;
        let age = p.state.phase();
        let style = Style::stroke(self.color, self.width);

        match self.pattern {
            Pattern::Laser => {
                let mut path = Path::new();
                path.move_to(at).line_to(at.translate(self.speed, 0.0));
                painter.stroke_path(&path, &style)
            }
            Pattern::SpiralLine => painter.stroke_path(&self.spiral(at), &style),
            Pattern::Waveform => painter.stroke_path(&self.waveform(at, age), &style),
            Pattern::Zigzag => painter.stroke_path(&self.zigzag(at, age), &style),
            Pattern::Concentric => {
                for i in 0..self.line_count {
                    let radius = i as f64 * self.spacing + age * self.speed;
                    painter.stroke_circle(at, radius, &style)?;
                }
                Ok(())
            }
            Pattern::Diagonal => painter.stroke_path(&self.diagonal(at), &style),
            Pattern::Gradient => {
                let half = self.length / 2.0;
                let brush = Brush::LinearGradient {
                    from: at.translate(-half, -self.width / 2.0),
                    to: at.translate(half, self.width / 2.0),
                    stops: self.gradient,
                };
                let mut path = Path::new();
                path.move_to(at.translate(-half, 0.0)).line_to(at.translate(half, 0.0));
                painter.stroke_path(&path, &style.with_brush(brush))
            }
            Pattern::Grid => {
                let path = self.grid(at, painter);
                painter.stroke_path(&path, &style)
            }
        }
    }

    fn is_expired(&self, p: &Particle<StrokeState>, _now: Timestamp) -> bool {
        f64::from(p.state.frames) >= self.max_frames()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::surface::{DrawOp, RecordingSurface};
    use rand::SeedableRng;

    fn run(fx: &mut Strokes, at: Point) -> (Particle<StrokeState>, RecordingSurface) {
        let mut rng = StdRng::seed_from_u64(0);
        let mut p = Particle::new(at, Timestamp::ZERO, fx.spawn(at, &mut rng));
        fx.update(&mut p, Timestamp::ZERO).unwrap();
        let mut surface = RecordingSurface::new(Size::new(40, 30));
        fx.draw(&p, &mut surface).unwrap();
        (p, surface)
    }

    fn frames_alive(fx: &mut Strokes) -> u32 {
        let mut rng = StdRng::seed_from_u64(0);
        let at = Point::new(0.0, 0.0);
        let mut p = Particle::new(at, Timestamp::ZERO, fx.spawn(at, &mut rng));
        let mut frames = 0;
        loop {
            fx.update(&mut p, Timestamp::ZERO).unwrap();
            frames += 1;
            if fx.is_expired(&p, Timestamp::ZERO) {
                return frames;
            }
        }
    }

    #[test]
    fn lifetimes_follow_length_or_fixed_bound() {
        let options = TrailOptions::default();
        assert_eq!(frames_alive(&mut Strokes::new(Pattern::Laser, &options)), 100);
        assert_eq!(frames_alive(&mut Strokes::new(Pattern::SpiralLine, &options)), 10);
        assert_eq!(frames_alive(&mut Strokes::new(Pattern::Waveform, &options)), 50);
        assert_eq!(frames_alive(&mut Strokes::new(Pattern::Gradient, &options)), 100);
        assert_eq!(frames_alive(&mut Strokes::new(Pattern::Grid, &options)), 100);
    }

    #[test]
    fn laser_is_a_short_horizontal_segment() {
        let mut fx = Strokes::new(Pattern::Laser, &TrailOptions::default());
        let (_, surface) = run(&mut fx, Point::new(10.0, 20.0));
        match &surface.ops()[0] {
            DrawOp::StrokePath { path, style } => {
                assert_eq!(path.subpaths(), &[vec![Point::new(10.0, 20.0), Point::new(15.0, 20.0)]]);
                assert!((style.line_width - 4.0).abs() < f64::EPSILON);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn zigzag_flips_every_speed_frames() {
        let fx = Strokes::new(Pattern::Zigzag, &TrailOptions::default());
        let at = Point::new(0.0, 0.0);
        let first = fx.zigzag(at, 0.0);
        let flipped = fx.zigzag(at, 2.0);
        assert_eq!(first.subpaths()[0][1], Point::new(15.0, 0.0));
        assert_eq!(flipped.subpaths()[0][1], Point::new(-15.0, 0.0));
        assert!(first.is_closed());
    }

    #[test]
    fn concentric_rings_grow_with_age() {
        let mut fx = Strokes::new(Pattern::Concentric, &TrailOptions::default());
        let (mut p, surface) = run(&mut fx, Point::new(5.0, 5.0));
        let radii: Vec<f64> = surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::StrokeCircle { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);

        fx.update(&mut p, Timestamp::ZERO).unwrap();
        let mut later = RecordingSurface::new(Size::new(40, 30));
        fx.draw(&p, &mut later).unwrap();
        assert!(matches!(later.ops()[0], DrawOp::StrokeCircle { radius, .. } if radius == 2.0));
    }

    #[test]
    fn gradient_uses_configured_stops() {
        let options = TrailOptions {
            colors: Some(vec![Color::WHITE, Color::BLACK]),
            ..TrailOptions::default()
        };
        let mut fx = Strokes::new(Pattern::Gradient, &options);
        let (_, surface) = run(&mut fx, Point::new(100.0, 50.0));
        match &surface.ops()[0] {
            DrawOp::StrokePath { style, .. } => assert_eq!(
                style.brush,
                Brush::LinearGradient {
                    from: Point::new(75.0, 49.0),
                    to: Point::new(125.0, 51.0),
                    stops: [Color::WHITE, Color::BLACK],
                }
            ),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn grid_snaps_and_reaches_viewport_edges() {
        let mut fx = Strokes::new(Pattern::Grid, &TrailOptions::default());
        let (_, surface) = run(&mut fx, Point::new(13.0, 6.0));
        let DrawOp::StrokePath { path, .. } = &surface.ops()[0] else {
            panic!("expected a path");
        };
        // origin snaps to (12, 4); pitch 9 on a 40x30 viewport
        let subpaths = path.subpaths();
        assert_eq!(subpaths[0], vec![Point::new(12.0, 4.0), Point::new(12.0, 30.0)]);
        // columns at 12, 21, 30, 39; rows at 4, 13, 22
        assert_eq!(subpaths.len(), 4 + 3);
        assert!(subpaths.iter().all(|s| s[1].x == 40.0 || s[1].y == 30.0));
    }

    #[test]
    fn spiral_line_has_length_points() {
        let fx = Strokes::new(Pattern::SpiralLine, &TrailOptions::default());
        let path = fx.spiral(Point::new(0.0, 0.0));
        assert_eq!(path.subpaths()[0].len(), 10);
        assert_eq!(path.subpaths()[0][0], Point::new(0.0, 0.0));
    }
}
