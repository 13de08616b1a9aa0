//! Dots that drift away from the pointer with a random velocity
//!
//! Covers particle, fire, confetti, rainbow, galaxy, neon glow, bubbles and
//! snowfall: they differ only in velocity model, decay and paint.

use rand::rngs::StdRng;
use rand::Rng;

use super::{jitter, Lifespan};
use crate::color::Color;
use crate::config::TrailOptions;
use crate::effect::{ensure_finite, Effect, EffectError};
use crate::geometry::Point;
use crate::particle::Particle;
use crate::surface::{Painter, Style};
use crate::time::Timestamp;

/// Twelve-step hue wheel cycled by the rainbow style
pub const RAINBOW: [Color; 12] = [
    Color::from_u32(0xFF0000),
    Color::from_u32(0xFF7F00),
    Color::from_u32(0xFFFF00),
    Color::from_u32(0x7FFF00),
    Color::from_u32(0x00FF00),
    Color::from_u32(0x00FF7F),
    Color::from_u32(0x00FFFF),
    Color::from_u32(0x007FFF),
    Color::from_u32(0x0000FF),
    Color::from_u32(0x7F00FF),
    Color::from_u32(0xFF00FF),
    Color::from_u32(0xFF007F),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftStyle {
    Particle,
    Fire,
    Confetti,
    Rainbow,
    Galaxy,
    Neon,
    Bubbles,
    Snowfall,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftState {
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub alpha: f64,
    /// Palette slot for the rainbow style
    pub hue: usize,
    /// Per-particle noise state for the galaxy twinkle
    pub noise: u64,
}

#[derive(Debug, Clone)]
pub struct Drift {
    style: DriftStyle,
    color: Color,
    size: f64,
    count: usize,
    /// Initial speed scale; velocity components are uniform in ±scale/2
    scale: f64,
    damping: f64,
    lifespan: Lifespan,
    twinkle: f64,
    glow: f64,
    rainbow_speed: f64,
}

impl Drift {
    pub fn new(style: DriftStyle, options: &TrailOptions) -> Self {
        // (color, size, count, speed, lifespan ms, damping)
        let (color, size, count, speed, lifespan, damping) = match style {
            DriftStyle::Particle => (0xFFD700, 5.0, 10, 2.0, 200.0, 0.9),
            DriftStyle::Fire => (0xFF4500, 8.0, 15, 20.0, 300.0, 0.98),
            DriftStyle::Confetti => (0xFF6347, 4.0, 20, 3.0, 400.0, 0.98),
            DriftStyle::Rainbow => (0xFF0000, 5.0, 15, 3.0, 400.0, 0.98),
            DriftStyle::Galaxy => (0xFFFFFF, 3.0, 20, 2.0, 500.0, 0.98),
            DriftStyle::Neon => (0x00FF00, 6.0, 15, 2.0, 500.0, 0.95),
            DriftStyle::Bubbles => (0x00FF00, 8.0, 8, 1.0, 800.0, 1.0),
            DriftStyle::Snowfall => (0xFFFFFF, 4.0, 20, 1.0, 1000.0, 1.0),
        };
        // fire scales its burst by `spread`, everything else by `speed`
        let scale = match style {
            DriftStyle::Fire => options.spread.or(options.speed).unwrap_or(speed),
            _ => options.speed.unwrap_or(speed),
        };
        let damping = match style {
            DriftStyle::Particle => options.dampening.unwrap_or(damping),
            _ => damping,
        };

        Self {
            style,
            // rainbow paints from its palette and has no color prop
            color: match style {
                DriftStyle::Rainbow => Color::from_u32(color),
                _ => options.color.unwrap_or(Color::from_u32(color)),
            },
            size: options.size.unwrap_or(size),
            count: options.trails.unwrap_or(count),
            scale,
            damping,
            lifespan: Lifespan::millis(options.lifespan.unwrap_or(lifespan)),
            twinkle: options.twinkle_intensity.unwrap_or(0.5),
            glow: options.glow_intensity.unwrap_or(20.0),
            rainbow_speed: options.rainbow_speed.unwrap_or(0.05),
        }
    }

    fn hue_at(&self, birth: Timestamp, now: Timestamp) -> usize {
        let slot = (birth.as_millis() + now.as_millis() * self.rainbow_speed).floor();
        (slot as i64).rem_euclid(RAINBOW.len() as i64) as usize
    }
}

/// xorshift64 step; returns a value in [-0.5, 0.5)
fn noise_step(state: &mut u64) -> f64 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *state = x;
    (x >> 11) as f64 / (1u64 << 53) as f64 - 0.5
}

impl Effect for Drift {
    type State = DriftState;

    fn name(&self) -> &'static str {
        match self.style {
            DriftStyle::Particle => "particle",
            DriftStyle::Fire => "fire",
            DriftStyle::Confetti => "confetti",
            DriftStyle::Rainbow => "rainbow",
            DriftStyle::Galaxy => "galaxy",
            DriftStyle::Neon => "neon-glow",
            DriftStyle::Bubbles => "bubbles",
            DriftStyle::Snowfall => "snowfall",
        }
    }

    fn count(&self) -> usize {
        self.count
    }

    fn spawn(&mut self, _at: Point, rng: &mut StdRng) -> DriftState {
        let (vx, vy) = match self.style {
            DriftStyle::Snowfall => (0.0, self.scale),
            _ => (jitter(rng, self.scale), jitter(rng, self.scale)),
        };
        DriftState {
            vx,
            vy,
            radius: self.size,
            alpha: 1.0,
            hue: 0,
            // xorshift must not start at zero
            noise: rng.gen::<u64>() | 1,
        }
    }

    fn update(&self, p: &mut Particle<DriftState>, now: Timestamp) -> Result<(), EffectError> {
        let birth = p.birth();
        let s = &mut p.state;
        p.position.x = ensure_finite("x", p.position.x + s.vx)?;
        p.position.y = ensure_finite("y", p.position.y + s.vy)?;
        s.vx *= self.damping;
        s.vy *= self.damping;

        match self.style {
            DriftStyle::Rainbow => s.hue = self.hue_at(birth, now),
            DriftStyle::Galaxy => {
                s.radius = (s.radius + noise_step(&mut s.noise) * self.twinkle).max(0.0);
            }
            DriftStyle::Neon => s.alpha -= 1.0 / (self.lifespan.as_millis() / 20.0).max(1.0),
            DriftStyle::Bubbles => s.radius *= 0.98,
            _ => {}
        }
        Ok(())
    }

    fn draw(&self, p: &Particle<DriftState>, painter: &mut dyn Painter) -> Result<(), EffectError> {
        let s = &p.state;
        let style = match self.style {
            DriftStyle::Rainbow => Style::fill(RAINBOW[s.hue % RAINBOW.len()]),
            DriftStyle::Neon => Style::fill(self.color)
                .with_alpha(s.alpha)
                .with_glow(self.color, self.glow),
            _ => Style::fill(self.color),
        };
        painter.fill_circle(p.position, s.radius, &style)
    }

    fn is_expired(&self, p: &Particle<DriftState>, now: Timestamp) -> bool {
        let s = &p.state;
        self.lifespan.elapsed(p, now)
            || match self.style {
                DriftStyle::Neon => s.alpha <= 0.0,
                DriftStyle::Bubbles => s.radius < 1.0,
                _ => false,
            }
    }
}
