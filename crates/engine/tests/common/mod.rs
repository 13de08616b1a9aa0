//! Common test utilities
#![allow(dead_code)] // Not every helper is used by every test file

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Once;

use cursor_trails_engine::{
    Color, Effect, EffectError, EngineConfig, ManualScheduler, Painter, Particle, Point,
    RecordingSurface, Size, Style, Timestamp, TrailCursor,
};
use rand::rngs::StdRng;

pub const VIEWPORT: Size = Size::new(800, 600);

static TRACING: Once = Once::new();

/// Route engine logs to the test writer; safe to call from every test
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Callback observed by a [`Probe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Spawn(u64),
    Update(u64),
    Draw(u64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeState {
    pub id: u64,
    /// Lifespan in milliseconds
    pub ttl: f64,
}

/// Scriptable effect that records every callback it receives
pub struct Probe {
    count: Cell<usize>,
    pub ttl: f64,
    /// Lifespans handed out to the next spawns before falling back to `ttl`
    pub ttls: VecDeque<f64>,
    /// Particle ids whose update fails
    pub failing: Vec<u64>,
    pub log: Rc<RefCell<Vec<Call>>>,
    next_id: u64,
}

impl Probe {
    pub fn new(count: usize, ttl: f64) -> Self {
        Self {
            count: Cell::new(count),
            ttl,
            ttls: VecDeque::new(),
            failing: Vec::new(),
            log: Rc::new(RefCell::new(Vec::new())),
            next_id: 0,
        }
    }

    /// Change the per-event count of a probe already owned by an engine
    pub fn set_count(&self, count: usize) {
        self.count.set(count);
    }

    pub fn calls(&self) -> Rc<RefCell<Vec<Call>>> {
        self.log.clone()
    }
}

impl Effect for Probe {
    type State = ProbeState;

    fn name(&self) -> &'static str {
        "probe"
    }

    fn count(&self) -> usize {
        self.count.get()
    }

    fn spawn(&mut self, _at: Point, _rng: &mut StdRng) -> ProbeState {
        let id = self.next_id;
        self.next_id += 1;
        self.log.borrow_mut().push(Call::Spawn(id));
        ProbeState {
            id,
            ttl: self.ttls.pop_front().unwrap_or(self.ttl),
        }
    }

    fn update(&self, p: &mut Particle<ProbeState>, _now: Timestamp) -> Result<(), EffectError> {
        self.log.borrow_mut().push(Call::Update(p.state.id));
        p.position.x += 1.0;
        if self.failing.contains(&p.state.id) {
            return Err(EffectError::Paint(format!("probe {} failed", p.state.id)));
        }
        Ok(())
    }

    fn draw(&self, p: &Particle<ProbeState>, painter: &mut dyn Painter) -> Result<(), EffectError> {
        self.log.borrow_mut().push(Call::Draw(p.state.id));
        painter.fill_circle(p.position, 2.0, &Style::fill(Color::WHITE))
    }

    fn is_expired(&self, p: &Particle<ProbeState>, now: Timestamp) -> bool {
        p.age(now) > p.state.ttl
    }
}

pub fn seeded(seed: u64) -> EngineConfig {
    EngineConfig {
        seed: Some(seed),
        ..EngineConfig::default()
    }
}

/// Mount `effect` on a recording surface driven by a manual scheduler
pub fn mount<E: Effect + 'static>(
    effect: E,
    config: EngineConfig,
) -> (TrailCursor<E, RecordingSurface>, Rc<ManualScheduler>) {
    init_tracing();
    let scheduler = ManualScheduler::new();
    let cursor = TrailCursor::mount(
        effect,
        Ok(RecordingSurface::new(Size::new(0, 0))),
        VIEWPORT,
        scheduler.clone(),
        config,
    );
    (cursor, scheduler)
}

/// Tick `frames` times, 16ms apart, starting after `from`; returns the last timestamp
pub fn run_frames(scheduler: &ManualScheduler, from: Timestamp, frames: u32) -> Timestamp {
    let mut now = from;
    for _ in 0..frames {
        now = now + 16.0;
        scheduler.tick(now);
    }
    now
}
