//! Dots moving along polar or periodic paths: starburst, swirl, spiral, wave

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::Rng;

use super::Lifespan;
use crate::color::Color;
use crate::config::TrailOptions;
use crate::effect::{ensure_finite, Effect, EffectError};
use crate::geometry::Point;
use crate::particle::Particle;
use crate::surface::{Painter, Style};
use crate::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitStyle {
    /// Straight rays at a random angle, decelerating
    Starburst,
    /// Rotating heading with a decaying step
    Swirl,
    /// Rotating heading with a growing step
    Spiral,
    /// Vertical sine oscillation around the spawn height
    Wave,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub angle: f64,
    /// Distance moved per frame (speed for starburst, radius for swirl/spiral)
    pub step: f64,
    pub origin_y: f64,
    /// Wave phase offset
    pub phase: f64,
}

#[derive(Debug, Clone)]
pub struct Orbit {
    style: OrbitStyle,
    color: Color,
    size: f64,
    count: usize,
    lifespan: Lifespan,
    burst_size: f64,
    spread: f64,
    speed: f64,
    spiral_speed: f64,
    amplitude: f64,
    wavelength: f64,
}

impl Orbit {
    pub fn new(style: OrbitStyle, options: &TrailOptions) -> Self {
        let (color, size, count, lifespan) = match style {
            OrbitStyle::Starburst => (0x0000FF, 5.0, 12, 400.0),
            OrbitStyle::Swirl => (0xFF4500, 6.0, 15, 500.0),
            OrbitStyle::Spiral => (0xFF6347, 6.0, 8, 600.0),
            OrbitStyle::Wave => (0xFF4500, 5.0, 12, 500.0),
        };
        Self {
            style,
            color: options.color.unwrap_or(Color::from_u32(color)),
            size: options.size.unwrap_or(size),
            count: options.trails.unwrap_or(count),
            lifespan: Lifespan::millis(options.lifespan.unwrap_or(lifespan)),
            burst_size: options.burst_size.unwrap_or(30.0),
            spread: options.spread.unwrap_or(100.0),
            speed: options.speed.unwrap_or(1.0),
            spiral_speed: options.spiral_speed.unwrap_or(0.1),
            amplitude: options.amplitude.unwrap_or(20.0),
            // divides the age; never zero
            wavelength: options.wavelength.unwrap_or(50.0).max(f64::EPSILON),
        }
    }
}

impl Effect for Orbit {
    type State = OrbitState;

    fn name(&self) -> &'static str {
        match self.style {
            OrbitStyle::Starburst => "starburst",
            OrbitStyle::Swirl => "swirl",
            OrbitStyle::Spiral => "spiral",
            OrbitStyle::Wave => "wave",
        }
    }

    fn count(&self) -> usize {
        self.count
    }

    fn spawn(&mut self, at: Point, rng: &mut StdRng) -> OrbitState {
        let (angle, step, phase) = match self.style {
            OrbitStyle::Starburst => (rng.gen::<f64>() * TAU, rng.gen::<f64>() * self.burst_size, 0.0),
            OrbitStyle::Swirl => (rng.gen::<f64>() * TAU, rng.gen::<f64>() * self.spread, 0.0),
            OrbitStyle::Spiral => (0.0, 0.0, 0.0),
            OrbitStyle::Wave => (0.0, 0.0, rng.gen::<f64>() * self.wavelength),
        };
        OrbitState {
            angle,
            step,
            origin_y: at.y,
            phase,
        }
    }

    fn update(&self, p: &mut Particle<OrbitState>, now: Timestamp) -> Result<(), EffectError> {
        let age = p.age(now);
        let s = &mut p.state;
        let next = match self.style {
            OrbitStyle::Starburst => {
                let next = p.position.polar_offset(s.angle, s.step);
                s.step *= 0.98;
                next
            }
            OrbitStyle::Swirl => {
                s.angle += 0.1;
                let next = p.position.polar_offset(s.angle, s.step);
                s.step *= 0.98;
                next
            }
            OrbitStyle::Spiral => {
                s.angle += self.spiral_speed;
                s.step += self.speed;
                p.position.polar_offset(s.angle, s.step)
            }
            OrbitStyle::Wave => Point::new(
                p.position.x,
                s.origin_y + self.amplitude * (age / self.wavelength + s.phase).sin(),
            ),
        };
        p.position = Point::new(ensure_finite("x", next.x)?, ensure_finite("y", next.y)?);
        Ok(())
    }

    fn draw(&self, p: &Particle<OrbitState>, painter: &mut dyn Painter) -> Result<(), EffectError> {
        painter.fill_circle(p.position, self.size, &Style::fill(self.color))
    }

    fn is_expired(&self, p: &Particle<OrbitState>, now: Timestamp) -> bool {
        // a swirl whose radius has decayed below a pixel no longer moves
        self.lifespan.elapsed(p, now) || (self.style == OrbitStyle::Swirl && p.state.step < 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn spawn(fx: &mut Orbit, seed: u64) -> Particle<OrbitState> {
        let mut rng = StdRng::seed_from_u64(seed);
        let at = Point::new(200.0, 200.0);
        Particle::new(at, Timestamp::ZERO, fx.spawn(at, &mut rng))
    }

    #[test]
    fn starburst_moves_along_its_ray() {
        let mut fx = Orbit::new(OrbitStyle::Starburst, &TrailOptions::default());
        let mut p = spawn(&mut fx, 5);
        let (angle, step) = (p.state.angle, p.state.step);
        assert!(step <= 30.0);
        fx.update(&mut p, Timestamp::from_millis(16.0)).unwrap();
        let expected = Point::new(200.0, 200.0).polar_offset(angle, step);
        assert!((p.position.x - expected.x).abs() < 1e-9);
        assert!((p.position.y - expected.y).abs() < 1e-9);
        assert!((p.state.step - step * 0.98).abs() < 1e-12);
    }

    #[test]
    fn spiral_step_grows_each_frame() {
        let mut fx = Orbit::new(OrbitStyle::Spiral, &TrailOptions::default());
        let mut p = spawn(&mut fx, 0);
        for _ in 0..3 {
            fx.update(&mut p, Timestamp::ZERO).unwrap();
        }
        assert!((p.state.step - 3.0).abs() < 1e-12);
        assert!((p.state.angle - 0.3).abs() < 1e-12);
    }

    #[test]
    fn wave_stays_within_amplitude() {
        let mut fx = Orbit::new(OrbitStyle::Wave, &TrailOptions::default());
        let mut p = spawn(&mut fx, 8);
        for i in 0..60 {
            fx.update(&mut p, Timestamp::from_millis(f64::from(i) * 16.0)).unwrap();
            assert!((p.position.y - 200.0).abs() <= 20.0 + 1e-9);
            assert!((p.position.x - 200.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn swirl_is_deterministic_under_seed() {
        let mut fx = Orbit::new(OrbitStyle::Swirl, &TrailOptions::default());
        let mut a = spawn(&mut fx, 21);
        let mut b = spawn(&mut fx, 21);
        for _ in 0..10 {
            fx.update(&mut a, Timestamp::ZERO).unwrap();
            fx.update(&mut b, Timestamp::ZERO).unwrap();
        }
        assert_eq!(a, b);
    }

    #[test]
    fn swirl_expires_once_radius_drops_below_one() {
        let options = TrailOptions {
            spread: Some(0.5),
            ..TrailOptions::default()
        };
        let mut fx = Orbit::new(OrbitStyle::Swirl, &options);
        let mut p = spawn(&mut fx, 3);
        let now = Timestamp::from_millis(16.0);
        fx.update(&mut p, now).unwrap();
        assert!(p.state.step < 1.0);
        assert!(fx.is_expired(&p, now));

        p.state.step = 40.0;
        assert!(!fx.is_expired(&p, now));
    }

    #[test]
    fn other_styles_ignore_step_for_expiry() {
        let fx = Orbit::new(OrbitStyle::Starburst, &TrailOptions::default());
        let p = Particle::new(
            Point::new(0.0, 0.0),
            Timestamp::ZERO,
            OrbitState {
                angle: 0.0,
                step: 0.0,
                origin_y: 0.0,
                phase: 0.0,
            },
        );
        assert!(!fx.is_expired(&p, Timestamp::from_millis(16.0)));
        assert!(fx.is_expired(&p, Timestamp::from_millis(401.0)));
    }
}
