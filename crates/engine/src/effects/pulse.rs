//! Shapes that stay where they were spawned and grow, shrink or fade

use rand::rngs::StdRng;

use super::Lifespan;
use crate::color::Color;
use crate::config::TrailOptions;
use crate::effect::{Effect, EffectError};
use crate::geometry::Point;
use crate::particle::Particle;
use crate::surface::{Painter, Style};
use crate::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseState {
    pub radius: f64,
    pub alpha: f64,
    /// Remaining ink spread
    pub spread: f64,
}

/// Expanding stroked ring
#[derive(Debug, Clone)]
pub struct Ripple {
    color: Color,
    count: usize,
    speed: f64,
    line_width: f64,
    lifespan: Lifespan,
}

impl Ripple {
    pub fn new(options: &TrailOptions) -> Self {
        Self {
            color: options.color.unwrap_or(Color::from_u32(0x0000FF)),
            count: options.trails.unwrap_or(5),
            speed: options.speed.unwrap_or(0.5),
            line_width: options.line_width.or(options.width).unwrap_or(2.0),
            lifespan: Lifespan::millis(options.lifespan.unwrap_or(1000.0)),
        }
    }
}

impl Effect for Ripple {
    type State = PulseState;

    fn name(&self) -> &'static str {
        "ripple"
    }

    fn count(&self) -> usize {
        self.count
    }

    fn spawn(&mut self, _at: Point, _rng: &mut StdRng) -> PulseState {
        PulseState {
            radius: 0.0,
            alpha: 1.0,
            spread: 0.0,
        }
    }

    fn update(&self, p: &mut Particle<PulseState>, _now: Timestamp) -> Result<(), EffectError> {
        p.state.radius += self.speed;
        Ok(())
    }

    fn draw(&self, p: &Particle<PulseState>, painter: &mut dyn Painter) -> Result<(), EffectError> {
        painter.stroke_circle(p.position, p.state.radius, &Style::stroke(self.color, self.line_width))
    }

    fn is_expired(&self, p: &Particle<PulseState>, now: Timestamp) -> bool {
        self.lifespan.elapsed(p, now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeStyle {
    /// Radius shrinks by 5% per frame
    Sparkle,
    /// Enlarged halo whose alpha decays by 5% per frame
    Glow,
    /// Opacity falls linearly over the lifespan
    Glowing,
}

/// Filled dot that shrinks or fades in place
#[derive(Debug, Clone)]
pub struct Fade {
    style: FadeStyle,
    color: Color,
    size: f64,
    count: usize,
    spread: f64,
    glow: f64,
    lifespan: Lifespan,
}

impl Fade {
    pub fn new(style: FadeStyle, options: &TrailOptions) -> Self {
        let (color, size, count, lifespan) = match style {
            FadeStyle::Sparkle => (0xFFFF00, 4.0, 15, 500.0),
            FadeStyle::Glow => (0xFF69B4, 10.0, 10, 600.0),
            FadeStyle::Glowing => (0xFF69B4, 6.0, 15, 500.0),
        };
        Self {
            style,
            color: options.color.unwrap_or(Color::from_u32(color)),
            size: options.size.unwrap_or(size),
            count: options.trails.unwrap_or(count),
            spread: options.spread.unwrap_or(1.5),
            glow: options.glow_intensity.unwrap_or(15.0),
            lifespan: Lifespan::millis(options.lifespan.unwrap_or(lifespan)),
        }
    }
}

impl Effect for Fade {
    type State = PulseState;

    fn name(&self) -> &'static str {
        match self.style {
            FadeStyle::Sparkle => "sparkle",
            FadeStyle::Glow => "glow",
            FadeStyle::Glowing => "glowing",
        }
    }

    fn count(&self) -> usize {
        self.count
    }

    fn spawn(&mut self, _at: Point, _rng: &mut StdRng) -> PulseState {
        let radius = match self.style {
            FadeStyle::Glow => self.size * self.spread,
            FadeStyle::Sparkle | FadeStyle::Glowing => self.size,
        };
        PulseState {
            radius,
            alpha: 1.0,
            spread: 0.0,
        }
    }

    fn update(&self, p: &mut Particle<PulseState>, _now: Timestamp) -> Result<(), EffectError> {
        let s = &mut p.state;
        match self.style {
            FadeStyle::Sparkle => s.radius *= 0.95,
            FadeStyle::Glow => s.alpha *= 0.95,
            FadeStyle::Glowing => s.alpha -= 1.0 / (self.lifespan.as_millis() / 20.0).max(1.0),
        }
        Ok(())
    }

    fn draw(&self, p: &Particle<PulseState>, painter: &mut dyn Painter) -> Result<(), EffectError> {
        let mut style = Style::fill(self.color).with_alpha(p.state.alpha);
        if self.style == FadeStyle::Glowing {
            style = style.with_glow(self.color, self.glow);
        }
        painter.fill_circle(p.position, p.state.radius, &style)
    }

    fn is_expired(&self, p: &Particle<PulseState>, now: Timestamp) -> bool {
        let s = &p.state;
        match self.style {
            FadeStyle::Sparkle => self.lifespan.elapsed(p, now) || s.radius < 0.5,
            FadeStyle::Glow => self.lifespan.elapsed(p, now) || s.alpha < 0.1,
            FadeStyle::Glowing => s.alpha <= 0.0,
        }
    }
}

/// Ink blot that widens while its spread runs out; frame-aged, no lifespan
#[derive(Debug, Clone)]
pub struct InkDrop {
    color: Color,
    size: f64,
    count: usize,
    spread: f64,
}

impl InkDrop {
    pub fn new(options: &TrailOptions) -> Self {
        Self {
            color: options.color.unwrap_or(Color::BLACK),
            size: options.size.unwrap_or(10.0),
            count: options.trails.unwrap_or(10),
            // a zero spread would never run out; keep one decay step
            spread: options.spread.unwrap_or(5.0).max(0.1),
        }
    }
}

impl Effect for InkDrop {
    type State = PulseState;

    fn name(&self) -> &'static str {
        "ink-drop"
    }

    fn count(&self) -> usize {
        self.count
    }

    fn spawn(&mut self, _at: Point, _rng: &mut StdRng) -> PulseState {
        PulseState {
            radius: self.size,
            alpha: 1.0,
            spread: self.spread,
        }
    }

    fn update(&self, p: &mut Particle<PulseState>, _now: Timestamp) -> Result<(), EffectError> {
        let s = &mut p.state;
        s.radius += 0.5;
        s.spread -= 0.1;
        s.alpha = (s.spread / self.spread).max(0.0);
        Ok(())
    }

    fn draw(&self, p: &Particle<PulseState>, painter: &mut dyn Painter) -> Result<(), EffectError> {
        painter.fill_circle(
            p.position,
            p.state.radius,
            &Style::fill(self.color).with_alpha(p.state.alpha),
        )
    }

    fn is_expired(&self, p: &Particle<PulseState>, _now: Timestamp) -> bool {
        p.state.spread <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn spawn<E: Effect>(fx: &mut E) -> Particle<E::State> {
        let mut rng = StdRng::seed_from_u64(0);
        let at = Point::new(100.0, 100.0);
        Particle::new(at, Timestamp::ZERO, fx.spawn(at, &mut rng))
    }

    #[test]
    fn ripple_grows_by_speed() {
        let mut fx = Ripple::new(&TrailOptions::default());
        let mut p = spawn(&mut fx);
        for _ in 0..4 {
            fx.update(&mut p, Timestamp::ZERO).unwrap();
        }
        assert!((p.state.radius - 2.0).abs() < 1e-12);
        assert_eq!(p.position, Point::new(100.0, 100.0));
    }

    #[test]
    fn ripple_expires_after_lifespan() {
        let options = TrailOptions {
            lifespan: Some(500.0),
            ..TrailOptions::default()
        };
        let mut fx = Ripple::new(&options);
        let p = spawn(&mut fx);
        assert!(!fx.is_expired(&p, Timestamp::from_millis(500.0)));
        assert!(fx.is_expired(&p, Timestamp::from_millis(600.0)));
    }

    #[test]
    fn sparkle_shrinks_out() {
        let mut fx = Fade::new(FadeStyle::Sparkle, &TrailOptions::default());
        let mut p = spawn(&mut fx);
        let mut frames = 0;
        while !fx.is_expired(&p, Timestamp::ZERO) {
            fx.update(&mut p, Timestamp::ZERO).unwrap();
            frames += 1;
        }
        // 4 * 0.95^n < 0.5
        assert_eq!(frames, 41);
    }

    #[test]
    fn glow_radius_is_scaled_by_spread() {
        let mut fx = Fade::new(FadeStyle::Glow, &TrailOptions::default());
        let p = spawn(&mut fx);
        assert!((p.state.radius - 15.0).abs() < 1e-12);
    }

    #[test]
    fn ink_drop_runs_dry() {
        let mut fx = InkDrop::new(&TrailOptions::default());
        let mut p = spawn(&mut fx);
        let mut frames = 0;
        while !fx.is_expired(&p, Timestamp::ZERO) {
            fx.update(&mut p, Timestamp::ZERO).unwrap();
            frames += 1;
            assert!(frames <= 60);
        }
        assert!(p.state.radius > 10.0);
        assert!(p.state.alpha <= 0.02);
    }
}
