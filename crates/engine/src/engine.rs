//! Per-frame pipeline: clear -> update -> draw -> prune

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::EngineConfig;
use crate::effect::Effect;
use crate::geometry::{Point, Size};
use crate::input::Command;
use crate::particle::ParticleSet;
use crate::surface::RenderSurface;
use crate::time::Timestamp;

/// What one frame did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    pub now: Timestamp,
    pub updated: usize,
    pub pruned: usize,
    /// Particles whose update or draw failed this frame
    pub faults: usize,
    pub live: usize,
}

/// One effect bound to one surface and one particle set
pub struct Engine<E: Effect, R: RenderSurface> {
    effect: E,
    particles: ParticleSet<E::State>,
    surface: R,
    rng: StdRng,
    config: EngineConfig,
    evicted: u64,
}

impl<E: Effect, R: RenderSurface> Engine<E, R> {
    pub fn new(effect: E, surface: R, config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            effect,
            particles: ParticleSet::new(),
            surface,
            rng,
            config,
            evicted: 0,
        }
    }

    /// Spawn the effect's per-event count at `at`. Returns how many were created.
    pub fn spawn_at(&mut self, at: Point, now: Timestamp) -> usize {
        let count = self.effect.count();
        self.particles
            .spawn(&mut self.effect, at, count, now, &mut self.rng);

        let evicted = self.particles.enforce_capacity(self.config.max_particles);
        if evicted > 0 {
            self.evicted += evicted as u64;
            tracing::debug!(
                effect = self.effect.name(),
                evicted,
                cap = self.config.max_particles,
                "particle cap reached, evicted oldest"
            );
        }
        count
    }

    pub fn resize(&mut self, size: Size) {
        self.surface.resize(size);
    }

    pub fn apply(&mut self, command: Command, at: Timestamp) {
        match command {
            Command::SpawnAt(point) => {
                self.spawn_at(point, at);
            }
            Command::Resize(size) => self.resize(size),
        }
    }

    /// Run one frame at `now`
    pub fn frame(&mut self, now: Timestamp) -> FrameReport {
        self.surface.clear();

        let updated = self.particles.len();
        let update_faults = self.particles.update_all(&self.effect, now);
        let draw_faults = self.particles.draw_all(&self.effect, self.surface.painter());
        let pruned = self.particles.prune_expired(&self.effect, now);
        if pruned > 0 && self.particles.is_empty() {
            self.effect.on_drained();
        }

        let faults = update_faults.count + draw_faults.count;
        if faults > 0 {
            let first = update_faults.first.or(draw_faults.first);
            tracing::warn!(
                effect = self.effect.name(),
                faults,
                first = ?first,
                "effect callbacks failed; affected particles skipped this frame"
            );
        }

        FrameReport {
            now,
            updated,
            pruned,
            faults,
            live: self.particles.len(),
        }
    }

    pub const fn particles(&self) -> &ParticleSet<E::State> {
        &self.particles
    }

    pub const fn effect(&self) -> &E {
        &self.effect
    }

    pub const fn surface(&self) -> &R {
        &self.surface
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Particles evicted by the cap since creation
    pub const fn evicted(&self) -> u64 {
        self.evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrailOptions;
    use crate::effects::link::ParticleLine;
    use crate::effects::pulse::Ripple;
    use crate::surface::{DrawOp, RecordingSurface};

    fn engine(options: &TrailOptions) -> Engine<Ripple, RecordingSurface> {
        let config = EngineConfig {
            seed: Some(1),
            ..options.engine_config()
        };
        Engine::new(
            Ripple::new(options),
            RecordingSurface::new(Size::new(800, 600)),
            config,
        )
    }

    #[test]
    fn clear_precedes_draws() {
        let mut engine = engine(&TrailOptions::default());
        engine.spawn_at(Point::new(10.0, 10.0), Timestamp::ZERO);
        engine.frame(Timestamp::from_millis(16.0));
        let ops = engine.surface().ops();
        assert_eq!(ops[0], DrawOp::Clear);
        assert_eq!(ops.len(), 1 + engine.particles().len());
    }

    #[test]
    fn resize_keeps_particles() {
        let mut engine = engine(&TrailOptions::default());
        engine.spawn_at(Point::new(10.0, 10.0), Timestamp::ZERO);
        let live = engine.particles().len();
        engine.apply(Command::Resize(Size::new(1024, 768)), Timestamp::ZERO);
        assert_eq!(engine.surface().size(), Size::new(1024, 768));
        assert_eq!(engine.particles().len(), live);
    }

    #[test]
    fn cap_evicts_and_counts() {
        let options = TrailOptions {
            trails: Some(5),
            max_particles: Some(8),
            ..TrailOptions::default()
        };
        let mut engine = engine(&options);
        engine.spawn_at(Point::new(0.0, 0.0), Timestamp::ZERO);
        engine.spawn_at(Point::new(1.0, 0.0), Timestamp::ZERO);
        assert_eq!(engine.particles().len(), 8);
        assert_eq!(engine.evicted(), 2);
        assert!(engine.particles().iter().skip(3).all(|p| p.position.x == 1.0));
    }

    #[test]
    fn drained_set_forgets_previous_spawn_point() {
        let options = TrailOptions {
            trails: Some(1),
            ..TrailOptions::default()
        };
        let mut engine = Engine::new(
            ParticleLine::new(&options),
            RecordingSurface::new(Size::new(800, 600)),
            EngineConfig::default(),
        );
        engine.spawn_at(Point::new(10.0, 10.0), Timestamp::ZERO);
        let report = engine.frame(Timestamp::from_millis(5000.0));
        assert_eq!(report.live, 0);

        engine.spawn_at(Point::new(900.0, 900.0), Timestamp::from_millis(5000.0));
        let newest = engine.particles().iter().last().map(|p| p.state.from);
        assert_eq!(newest, Some(None));
    }

    #[test]
    fn live_set_keeps_previous_spawn_point() {
        let options = TrailOptions {
            trails: Some(1),
            ..TrailOptions::default()
        };
        let mut engine = Engine::new(
            ParticleLine::new(&options),
            RecordingSurface::new(Size::new(800, 600)),
            EngineConfig::default(),
        );
        engine.spawn_at(Point::new(10.0, 10.0), Timestamp::ZERO);
        engine.frame(Timestamp::from_millis(16.0));
        engine.spawn_at(Point::new(20.0, 10.0), Timestamp::from_millis(16.0));
        let newest = engine.particles().iter().last().map(|p| p.state.from);
        assert_eq!(newest, Some(Some(Point::new(10.0, 10.0))));
    }
}
