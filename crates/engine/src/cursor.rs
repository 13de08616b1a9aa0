//! Mounted trail instance
//!
//! Owns the engine, the input bridge and the animation loop of one mounted
//! effect. Mount sizes the surface, attaches the bridge and starts the loop;
//! unmount stops the loop, detaches the bridge and releases the surface.
//! A mount without a drawing context degrades to an inert instance.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::animation::{AnimationLoop, FrameScheduler, LoopState};
use crate::config::EngineConfig;
use crate::effect::Effect;
use crate::engine::Engine;
use crate::error::Result;
use crate::geometry::Size;
use crate::input::{InputBridge, InputEvent};
use crate::surface::RenderSurface;
use crate::time::Timestamp;

/// Type-erased view of a mounted trail, used by hosts that pick the effect at runtime
pub trait Trail {
    fn name(&self) -> &'static str;

    /// Feed one host event
    fn handle(&self, event: &InputEvent, now: Timestamp);

    fn unmount(&mut self);

    fn state(&self) -> LoopState;

    /// Mounted without a drawing context
    fn is_degraded(&self) -> bool;

    fn live_particles(&self) -> usize;
}

pub struct TrailCursor<E: Effect + 'static, R: RenderSurface + 'static> {
    name: &'static str,
    engine: Option<Rc<RefCell<Engine<E, R>>>>,
    bridge: Rc<InputBridge>,
    animation: Option<AnimationLoop>,
    degraded: bool,
}

impl<E: Effect + 'static, R: RenderSurface + 'static> TrailCursor<E, R> {
    /// Mount `effect` on `surface`.
    ///
    /// `surface` is the result of acquiring the host's drawing context; an
    /// error yields a degraded instance that draws nothing and never fails.
    pub fn mount(
        effect: E,
        surface: Result<R>,
        viewport: Size,
        scheduler: Rc<dyn FrameScheduler>,
        config: EngineConfig,
    ) -> Self {
        let name = effect.name();
        let surface = match surface {
            Ok(surface) => surface,
            Err(e) => {
                tracing::warn!(effect = name, error = %e, "no drawing context, trail disabled");
                return Self::degraded(name);
            }
        };

        let mut engine = Engine::new(effect, surface, config);
        engine.resize(viewport);
        let engine = Rc::new(RefCell::new(engine));

        let bridge = Rc::new(InputBridge::new());
        bridge.attach();

        let animation = AnimationLoop::new(scheduler);
        let frame_engine = Rc::downgrade(&engine);
        let frame_bridge = bridge.clone();
        let started = animation.start(move |now| {
            let Some(engine) = frame_engine.upgrade() else {
                return;
            };
            let mut engine = engine.borrow_mut();
            for (command, at) in frame_bridge.drain() {
                engine.apply(command, at);
            }
            engine.frame(now);
        });
        if let Err(e) = started {
            tracing::warn!(effect = name, error = %e, "animation loop refused to start");
            bridge.detach();
            return Self::degraded(name);
        }

        tracing::debug!(effect = name, ?viewport, "trail mounted");
        Self {
            name,
            engine: Some(engine),
            bridge,
            animation: Some(animation),
            degraded: false,
        }
    }

    fn degraded(name: &'static str) -> Self {
        Self {
            name,
            engine: None,
            bridge: Rc::new(InputBridge::new()),
            animation: None,
            degraded: true,
        }
    }

    /// Apply an event now, or queue it for the next frame if the engine is mid-frame
    pub fn handle(&self, event: &InputEvent, now: Timestamp) {
        let Some(command) = self.bridge.translate(event) else {
            return;
        };
        let Some(engine) = &self.engine else {
            return;
        };
        match engine.try_borrow_mut() {
            Ok(mut engine) => engine.apply(command, now),
            Err(_) => self.bridge.defer(command, now),
        }
    }

    pub fn unmount(&mut self) {
        if let Some(animation) = self.animation.take() {
            animation.stop();
        }
        self.bridge.detach();
        if self.engine.take().is_some() {
            tracing::debug!(effect = self.name, "trail unmounted");
        }
    }

    pub fn state(&self) -> LoopState {
        self.animation
            .as_ref()
            .map_or(if self.degraded { LoopState::Idle } else { LoopState::Stopped }, AnimationLoop::state)
    }

    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Borrow the engine; `None` once unmounted or when degraded
    pub fn engine(&self) -> Option<Ref<'_, Engine<E, R>>> {
        self.engine.as_ref().map(|e| e.borrow())
    }

    pub fn frames(&self) -> u64 {
        self.animation.as_ref().map_or(0, AnimationLoop::frames)
    }

    pub fn pending_commands(&self) -> usize {
        self.bridge.pending_count()
    }
}

impl<E: Effect + 'static, R: RenderSurface + 'static> Trail for TrailCursor<E, R> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle(&self, event: &InputEvent, now: Timestamp) {
        Self::handle(self, event, now);
    }

    fn unmount(&mut self) {
        Self::unmount(self);
    }

    fn state(&self) -> LoopState {
        Self::state(self)
    }

    fn is_degraded(&self) -> bool {
        self.degraded
    }

    fn live_particles(&self) -> usize {
        self.engine().map_or(0, |e| e.particles().len())
    }
}

impl<E: Effect + 'static, R: RenderSurface + 'static> Drop for TrailCursor<E, R> {
    fn drop(&mut self) {
        self.unmount();
    }
}
