//! Particles and the ordered live set

use rand::rngs::StdRng;

use crate::effect::{Effect, EffectError};
use crate::geometry::Point;
use crate::surface::Painter;
use crate::time::Timestamp;

/// One transient visual element
#[derive(Debug, Clone, PartialEq)]
pub struct Particle<S> {
    pub position: Point,
    pub state: S,
    birth: Timestamp,
    faulted: bool,
}

impl<S> Particle<S> {
    pub const fn new(position: Point, birth: Timestamp, state: S) -> Self {
        Self {
            position,
            state,
            birth,
            faulted: false,
        }
    }

    pub const fn birth(&self) -> Timestamp {
        self.birth
    }

    /// Milliseconds since spawn
    pub fn age(&self, now: Timestamp) -> f64 {
        now.since(self.birth)
    }

    /// Whether this frame's update failed
    pub const fn is_faulted(&self) -> bool {
        self.faulted
    }
}

/// Callback failures collected during one pass
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PassFaults {
    pub count: usize,
    pub first: Option<EffectError>,
}

impl PassFaults {
    fn record(&mut self, err: EffectError) {
        self.count += 1;
        if self.first.is_none() {
            self.first = Some(err);
        }
    }
}

/// Ordered sequence of live particles, insertion order = spawn order
#[derive(Debug, Clone)]
pub struct ParticleSet<S> {
    particles: Vec<Particle<S>>,
}

impl<S> Default for ParticleSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ParticleSet<S> {
    pub const fn new() -> Self {
        Self {
            particles: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle<S>> {
        self.particles.iter()
    }

    /// Invoke the effect's spawn rule `count` times at `at` and append the results
    pub fn spawn<E>(&mut self, effect: &mut E, at: Point, count: usize, now: Timestamp, rng: &mut StdRng)
    where
        E: Effect<State = S>,
    {
        self.particles.reserve(count);
        for _ in 0..count {
            let state = effect.spawn(at, rng);
            self.particles.push(Particle::new(at, now, state));
        }
    }

    /// Run the update rule once for every particle, in order.
    ///
    /// A failing particle is flagged so the draw pass skips it this frame.
    pub fn update_all<E>(&mut self, effect: &E, now: Timestamp) -> PassFaults
    where
        E: Effect<State = S>,
    {
        let mut faults = PassFaults::default();
        for particle in &mut self.particles {
            particle.faulted = false;
            if let Err(e) = effect.update(particle, now) {
                particle.faulted = true;
                faults.record(e);
            }
        }
        faults
    }

    /// Run the draw rule for every particle that updated cleanly, in order
    pub fn draw_all<E>(&self, effect: &E, painter: &mut dyn Painter) -> PassFaults
    where
        E: Effect<State = S>,
    {
        let mut faults = PassFaults::default();
        for particle in self.particles.iter().filter(|p| !p.faulted) {
            if let Err(e) = effect.draw(particle, painter) {
                faults.record(e);
            }
        }
        faults
    }

    /// Drop every particle whose expiry predicate holds; returns how many were removed
    pub fn prune_expired<E>(&mut self, effect: &E, now: Timestamp) -> usize
    where
        E: Effect<State = S>,
    {
        let before = self.particles.len();
        self.particles.retain(|p| !effect.is_expired(p, now));
        before - self.particles.len()
    }

    /// Evict the oldest particles until at most `max` remain. `0` means unbounded.
    pub fn enforce_capacity(&mut self, max: usize) -> usize {
        if max == 0 || self.particles.len() <= max {
            return 0;
        }
        let excess = self.particles.len() - max;
        self.particles.drain(..excess);
        excess
    }
}

impl<'a, S> IntoIterator for &'a ParticleSet<S> {
    type Item = &'a Particle<S>;
    type IntoIter = std::slice::Iter<'a, Particle<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}
