//! Built-in effect library
//!
//! Each effect is a small `Effect` implementation with its own defaults.
//! `EffectKind` names them so hosts can pick one at runtime and get back a
//! type-erased `Trail`.

pub mod drift;
pub mod link;
pub mod orbit;
pub mod pulse;
pub mod strokes;

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::Rng;

use crate::animation::FrameScheduler;
use crate::config::{EngineConfig, TrailOptions};
use crate::cursor::{Trail, TrailCursor};
use crate::effect::Effect;
use crate::error::{Result, TrailError};
use crate::geometry::Size;
use crate::particle::Particle;
use crate::surface::RenderSurface;
use crate::time::Timestamp;

use drift::{Drift, DriftStyle};
use link::ParticleLine;
use orbit::{Orbit, OrbitStyle};
use pulse::{Fade, FadeStyle, InkDrop, Ripple};
use strokes::{Pattern, Strokes};

/// Time-to-live in milliseconds, measured from birth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifespan(f64);

impl Lifespan {
    pub const fn millis(ms: f64) -> Self {
        Self(ms)
    }

    pub const fn as_millis(self) -> f64 {
        self.0
    }

    /// Strictly older than the lifespan
    pub fn elapsed<S>(self, particle: &Particle<S>, now: Timestamp) -> bool {
        particle.age(now) > self.0
    }
}

/// Uniform in `[-scale/2, scale/2)`
pub(crate) fn jitter(rng: &mut StdRng, scale: f64) -> f64 {
    (rng.gen::<f64>() - 0.5) * scale
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Particle,
    Fire,
    Confetti,
    Rainbow,
    Galaxy,
    NeonGlow,
    Bubbles,
    Snowfall,
    Ripple,
    Sparkle,
    Glow,
    Glowing,
    InkDrop,
    Starburst,
    Swirl,
    Spiral,
    Wave,
    ParticleLine,
    LaserBeam,
    SpiralLine,
    WaveformLine,
    ZigzagLine,
    ConcentricLines,
    DiagonalLines,
    LinearGradient,
    GridPattern,
}

impl EffectKind {
    pub const ALL: [Self; 26] = [
        Self::Particle,
        Self::Fire,
        Self::Confetti,
        Self::Rainbow,
        Self::Galaxy,
        Self::NeonGlow,
        Self::Bubbles,
        Self::Snowfall,
        Self::Ripple,
        Self::Sparkle,
        Self::Glow,
        Self::Glowing,
        Self::InkDrop,
        Self::Starburst,
        Self::Swirl,
        Self::Spiral,
        Self::Wave,
        Self::ParticleLine,
        Self::LaserBeam,
        Self::SpiralLine,
        Self::WaveformLine,
        Self::ZigzagLine,
        Self::ConcentricLines,
        Self::DiagonalLines,
        Self::LinearGradient,
        Self::GridPattern,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Particle => "particle",
            Self::Fire => "fire",
            Self::Confetti => "confetti",
            Self::Rainbow => "rainbow",
            Self::Galaxy => "galaxy",
            Self::NeonGlow => "neon-glow",
            Self::Bubbles => "bubbles",
            Self::Snowfall => "snowfall",
            Self::Ripple => "ripple",
            Self::Sparkle => "sparkle",
            Self::Glow => "glow",
            Self::Glowing => "glowing",
            Self::InkDrop => "ink-drop",
            Self::Starburst => "starburst",
            Self::Swirl => "swirl",
            Self::Spiral => "spiral",
            Self::Wave => "wave",
            Self::ParticleLine => "particle-line",
            Self::LaserBeam => "laser-beam",
            Self::SpiralLine => "spiral-line",
            Self::WaveformLine => "waveform-line",
            Self::ZigzagLine => "zigzag-line",
            Self::ConcentricLines => "concentric-lines",
            Self::DiagonalLines => "diagonal-lines",
            Self::LinearGradient => "linear-gradient",
            Self::GridPattern => "grid-pattern",
        }
    }

    /// Build the effect with `options` and mount it.
    ///
    /// Never fails: a `surface` error produces a degraded trail.
    pub fn mount<R: RenderSurface + 'static>(
        self,
        options: &TrailOptions,
        surface: Result<R>,
        viewport: Size,
        scheduler: Rc<dyn FrameScheduler>,
    ) -> Box<dyn Trail> {
        let target = MountTarget {
            surface,
            viewport,
            scheduler,
            config: options.engine_config(),
        };
        let o = options;
        match self {
            Self::Particle => target.mount(Drift::new(DriftStyle::Particle, o)),
            Self::Fire => target.mount(Drift::new(DriftStyle::Fire, o)),
            Self::Confetti => target.mount(Drift::new(DriftStyle::Confetti, o)),
            Self::Rainbow => target.mount(Drift::new(DriftStyle::Rainbow, o)),
            Self::Galaxy => target.mount(Drift::new(DriftStyle::Galaxy, o)),
            Self::NeonGlow => target.mount(Drift::new(DriftStyle::Neon, o)),
            Self::Bubbles => target.mount(Drift::new(DriftStyle::Bubbles, o)),
            Self::Snowfall => target.mount(Drift::new(DriftStyle::Snowfall, o)),
            Self::Ripple => target.mount(Ripple::new(o)),
            Self::Sparkle => target.mount(Fade::new(FadeStyle::Sparkle, o)),
            Self::Glow => target.mount(Fade::new(FadeStyle::Glow, o)),
            Self::Glowing => target.mount(Fade::new(FadeStyle::Glowing, o)),
            Self::InkDrop => target.mount(InkDrop::new(o)),
            Self::Starburst => target.mount(Orbit::new(OrbitStyle::Starburst, o)),
            Self::Swirl => target.mount(Orbit::new(OrbitStyle::Swirl, o)),
            Self::Spiral => target.mount(Orbit::new(OrbitStyle::Spiral, o)),
            Self::Wave => target.mount(Orbit::new(OrbitStyle::Wave, o)),
            Self::ParticleLine => target.mount(ParticleLine::new(o)),
            Self::LaserBeam => target.mount(Strokes::new(Pattern::Laser, o)),
            Self::SpiralLine => target.mount(Strokes::new(Pattern::SpiralLine, o)),
            Self::WaveformLine => target.mount(Strokes::new(Pattern::Waveform, o)),
            Self::ZigzagLine => target.mount(Strokes::new(Pattern::Zigzag, o)),
            Self::ConcentricLines => target.mount(Strokes::new(Pattern::Concentric, o)),
            Self::DiagonalLines => target.mount(Strokes::new(Pattern::Diagonal, o)),
            Self::LinearGradient => target.mount(Strokes::new(Pattern::Gradient, o)),
            Self::GridPattern => target.mount(Strokes::new(Pattern::Grid, o)),
        }
    }
}

struct MountTarget<R> {
    surface: Result<R>,
    viewport: Size,
    scheduler: Rc<dyn FrameScheduler>,
    config: EngineConfig,
}

impl<R: RenderSurface + 'static> MountTarget<R> {
    fn mount<E: Effect + 'static>(self, effect: E) -> Box<dyn Trail> {
        Box::new(TrailCursor::mount(
            effect,
            self.surface,
            self.viewport,
            self.scheduler,
            self.config,
        ))
    }
}

impl FromStr for EffectKind {
    type Err = TrailError;

    /// Accepts the kebab-case name, case-insensitively, plus a few short aliases
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        let alias = match key.as_str() {
            "neon" => Some(Self::NeonGlow),
            "ink" => Some(Self::InkDrop),
            "laser" => Some(Self::LaserBeam),
            "waveform" => Some(Self::WaveformLine),
            "zigzag" => Some(Self::ZigzagLine),
            "concentric" => Some(Self::ConcentricLines),
            "diagonal" => Some(Self::DiagonalLines),
            "gradient" => Some(Self::LinearGradient),
            "grid" => Some(Self::GridPattern),
            _ => None,
        };
        alias
            .or_else(|| Self::ALL.into_iter().find(|kind| kind.name() == key))
            .ok_or_else(|| TrailError::UnknownEffect(s.to_string()))
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
