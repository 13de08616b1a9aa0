//! cursor-trails engine
//!
//! Platform-agnostic core shared by every cursor trail effect: a particle set,
//! the effect contract, a drawing surface abstraction, input translation and a
//! cancellable per-frame animation loop. Hosts (the browser frontend, tests)
//! supply the surface and the frame scheduler.

pub mod animation;
pub mod color;
pub mod config;
pub mod cursor;
pub mod effect;
pub mod effects;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod particle;
pub mod surface;
pub mod time;

pub use animation::{AnimationLoop, FrameRequest, FrameScheduler, LoopState, ManualScheduler};
pub use color::Color;
pub use config::{EngineConfig, TrailOptions};
pub use cursor::{Trail, TrailCursor};
pub use effect::{Effect, EffectError};
pub use effects::EffectKind;
pub use engine::{Engine, FrameReport};
pub use error::{Result, TrailError};
pub use geometry::{Point, Size};
pub use input::{Command, InputBridge, InputEvent};
pub use particle::{Particle, ParticleSet};
pub use surface::{Brush, DrawOp, Glow, Painter, Path, RecordingSurface, RenderSurface, Style};
pub use time::Timestamp;
