//! The effect contract
//!
//! An effect is the only extension point of the engine: it owns the tunable
//! parameters of one visual style and the per-particle rules (spawn, update,
//! draw, expiry). All particles of a mounted engine share one effect value.

use rand::rngs::StdRng;

use crate::geometry::Point;
use crate::particle::Particle;
use crate::surface::Painter;
use crate::time::Timestamp;

/// Failure of a single particle's callback
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EffectError {
    #[error("{field} became non-finite")]
    NonFinite { field: &'static str },
    #[error("paint failed: {0}")]
    Paint(String),
}

pub trait Effect {
    /// Per-particle state owned by each particle
    type State;

    /// Short kebab-case identifier used in logs
    fn name(&self) -> &'static str;

    /// Particles created per spawn event
    fn count(&self) -> usize;

    /// Initial state for a particle born at `at`.
    ///
    /// Randomized parameters must come from `rng` so runs are reproducible
    /// under a fixed seed.
    fn spawn(&mut self, at: Point, rng: &mut StdRng) -> Self::State;

    /// Advance one frame. Depends only on `now`, the particle's birth time and
    /// its own state.
    fn update(&self, particle: &mut Particle<Self::State>, now: Timestamp) -> Result<(), EffectError>;

    /// Issue paint operations for one particle
    fn draw(&self, particle: &Particle<Self::State>, painter: &mut dyn Painter) -> Result<(), EffectError>;

    /// Must eventually return true for every particle through normal aging
    fn is_expired(&self, particle: &Particle<Self::State>, now: Timestamp) -> bool;

    /// Called after a prune removed the last live particle. Effects that
    /// remember earlier spawns forget them here.
    fn on_drained(&mut self) {}
}

/// Reject NaN/infinite values produced by an update rule
pub fn ensure_finite(field: &'static str, value: f64) -> Result<f64, EffectError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EffectError::NonFinite { field })
    }
}
