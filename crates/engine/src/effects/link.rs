//! Dots joined by segments back to the previous spawn point

use rand::rngs::StdRng;

use super::Lifespan;
use crate::color::Color;
use crate::config::TrailOptions;
use crate::effect::{Effect, EffectError};
use crate::geometry::Point;
use crate::particle::Particle;
use crate::surface::{Painter, Path, Style};
use crate::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkState {
    /// Segment from the previous spawn point to this one
    pub from: Option<Point>,
}

#[derive(Debug, Clone)]
pub struct ParticleLine {
    color: Color,
    size: f64,
    count: usize,
    line_width: f64,
    lifespan: Lifespan,
    last: Option<Point>,
}

impl ParticleLine {
    pub fn new(options: &TrailOptions) -> Self {
        Self {
            color: options.color.unwrap_or(Color::from_u32(0x0000FF)),
            size: options.size.unwrap_or(5.0),
            count: options.trails.unwrap_or(10),
            line_width: options.line_width.or(options.width).unwrap_or(2.0),
            lifespan: Lifespan::millis(options.lifespan.unwrap_or(1000.0)),
            last: None,
        }
    }
}

impl Effect for ParticleLine {
    type State = LinkState;

    fn name(&self) -> &'static str {
        "particle-line"
    }

    fn count(&self) -> usize {
        self.count
    }

    fn spawn(&mut self, at: Point, _rng: &mut StdRng) -> LinkState {
        // repeated spawns at one point would only add zero-length segments
        let from = self.last.filter(|prev| *prev != at);
        self.last = Some(at);
        LinkState { from }
    }

    fn update(&self, _p: &mut Particle<LinkState>, _now: Timestamp) -> Result<(), EffectError> {
        Ok(())
    }

    fn draw(&self, p: &Particle<LinkState>, painter: &mut dyn Painter) -> Result<(), EffectError> {
        painter.fill_circle(p.position, self.size, &Style::fill(self.color))?;
        if let Some(from) = p.state.from {
            let mut path = Path::new();
            path.move_to(from).line_to(p.position);
            painter.stroke_path(&path, &Style::stroke(self.color, self.line_width))?;
        }
        Ok(())
    }

    fn is_expired(&self, p: &Particle<LinkState>, now: Timestamp) -> bool {
        self.lifespan.elapsed(p, now)
    }

    fn on_drained(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::surface::{DrawOp, RecordingSurface};
    use rand::SeedableRng;

    #[test]
    fn only_first_spawn_of_a_move_links_back() {
        let mut fx = ParticleLine::new(&TrailOptions::default());
        let mut rng = StdRng::seed_from_u64(0);
        let a = Point::new(10.0, 10.0);
        let b = Point::new(30.0, 10.0);

        assert_eq!(fx.spawn(a, &mut rng).from, None);
        assert_eq!(fx.spawn(a, &mut rng).from, None);
        assert_eq!(fx.spawn(b, &mut rng).from, Some(a));
        assert_eq!(fx.spawn(b, &mut rng).from, None);
    }

    #[test]
    fn drained_trail_starts_a_fresh_line() {
        let mut fx = ParticleLine::new(&TrailOptions::default());
        let mut rng = StdRng::seed_from_u64(0);
        fx.spawn(Point::new(10.0, 10.0), &mut rng);
        fx.on_drained();
        assert_eq!(fx.spawn(Point::new(900.0, 900.0), &mut rng).from, None);
    }

    #[test]
    fn draws_dot_then_segment() {
        let mut fx = ParticleLine::new(&TrailOptions::default());
        let mut rng = StdRng::seed_from_u64(0);
        let a = Point::new(0.0, 0.0);
        let b = Point::new(5.0, 5.0);
        fx.spawn(a, &mut rng);
        let p = Particle::new(b, Timestamp::ZERO, fx.spawn(b, &mut rng));

        let mut surface = RecordingSurface::new(Size::new(100, 100));
        fx.draw(&p, &mut surface).unwrap();
        let ops = surface.ops();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], DrawOp::FillCircle { radius, .. } if radius == 5.0));
        match &ops[1] {
            DrawOp::StrokePath { path, style } => {
                assert_eq!(path.subpaths(), &[vec![a, b]]);
                assert!((style.line_width - 2.0).abs() < f64::EPSILON);
            }
            other => panic!("expected a stroked segment, got {other:?}"),
        }
    }
}
