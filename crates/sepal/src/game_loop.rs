//! # Game Loop — Fixed Timestep with an Accumulator
//!
//! Mini-game logic must not care how fast the host renders. The loop runs
//! simulation in fixed-size ticks and banks leftover frame time in an
//! accumulator, the classic "fix your timestep" scheme:
//!
//! ```text
//! frame delta:   21.3 ms arrives
//! accumulator:   5.1 + 21.3 = 26.4 ms
//! tick:          run systems once (16.7 ms consumed)
//! remainder:     9.7 ms stays banked for the next frame
//! ```
//!
//! Because every tick advances the world by exactly [`GameLoop::fixed_dt`]
//! seconds, the same frame deltas always produce the same tick sequence, and
//! a rhythm game's beat #240 lands at the same simulated instant on a 144 Hz
//! desktop and a struggling phone.
//!
//! ## Hitches and Hidden Tabs
//!
//! Two guards keep the scheme honest in a browser-like host:
//!
//! - Each frame delta is clamped to [`GameLoop::max_accumulator`] before
//!   banking, so a multi-second hitch (debugger, GC, laptop lid) replays a
//!   bounded burst of ticks instead of spiraling.
//! - When the [`Clock`] reports the surface hidden, the loop pauses itself.
//!   It does **not** resume when visibility returns; the host decides that,
//!   same as it decides every other resume.
//!
//! The first frame after `start` or `resume` has no previous timestamp, so it
//! advances by exactly one fixed step rather than trusting a wall-clock gap.
//!
//! ## Driving It
//!
//! The loop does not own a thread or a timer. The host calls
//! [`GameLoop::frame`] once per render frame (from a `requestAnimationFrame`
//! bridge, a winit redraw handler, or a plain loop) and the accumulator does
//! the rest. [`frame`](GameLoop::frame) returns the number of ticks it ran,
//! which headless tests lean on.

use crate::clock::{Clock, StdClock};
use crate::ecs::schedule::System;
use crate::ecs::world::World;

/// Default simulation tick length: 60 ticks per second.
pub const DEFAULT_FIXED_DT: f64 = 1.0 / 60.0;

/// Default cap on banked time per frame, in seconds.
pub const DEFAULT_MAX_ACCUMULATOR: f64 = 0.2;

/// Lifecycle notifications emitted by [`GameLoop`].
///
/// Delivered synchronously from the call that caused them (`start`, `frame`,
/// `pause`, ...), in the order things happened. See
/// [`LoopBinding`](crate::binding::LoopBinding) for the ready-made adapter
/// that folds these into an observable snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    Started,
    Paused,
    Resumed,
    Stopped,
    /// A simulation tick ran; carries the new total tick count.
    Tick { tick: u64 },
    /// The rolling one-second frame counter closed a window.
    FpsSample { fps: u32 },
}

/// A fixed-timestep simulation loop that owns a [`World`] and the systems
/// that advance it.
///
/// Generic over its time source so tests can substitute a
/// [`ManualClock`](crate::clock::ManualClock); production code uses the
/// [`StdClock`] default via [`GameLoop::new`].
pub struct GameLoop<C: Clock = StdClock> {
    world: World,
    systems: Vec<System>,
    clock: C,
    fixed_dt: f64,
    max_accumulator: f64,
    running: bool,
    paused: bool,
    /// Banked simulation time not yet consumed by ticks, in seconds.
    accumulator: f64,
    /// Clock reading at the previous frame. `None` right after start/resume,
    /// which triggers the one-fixed-step first frame.
    last_time: Option<f64>,
    ticks: u64,
    fps: u32,
    fps_frames: u32,
    fps_elapsed: f64,
    on_tick: Option<Box<dyn FnMut(u64)>>,
    on_event: Option<Box<dyn FnMut(LoopEvent)>>,
}

impl GameLoop<StdClock> {
    /// A loop over `world` running `systems` each tick, timed by wall clock.
    pub fn new(world: World, systems: Vec<System>) -> Self {
        Self::with_clock(world, systems, StdClock::new())
    }
}

impl<C: Clock> GameLoop<C> {
    /// A loop timed by the given clock. Entry point for tests and replays.
    pub fn with_clock(world: World, systems: Vec<System>, clock: C) -> Self {
        Self {
            world,
            systems,
            clock,
            fixed_dt: DEFAULT_FIXED_DT,
            max_accumulator: DEFAULT_MAX_ACCUMULATOR,
            running: false,
            paused: false,
            accumulator: 0.0,
            last_time: None,
            ticks: 0,
            fps: 0,
            fps_frames: 0,
            fps_elapsed: 0.0,
            on_tick: None,
            on_event: None,
        }
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Set the simulation tick length in seconds.
    ///
    /// # Panics
    ///
    /// Panics if `seconds` is not a positive finite number.
    pub fn with_fixed_dt(mut self, seconds: f64) -> Self {
        assert!(
            seconds.is_finite() && seconds > 0.0,
            "fixed_dt must be positive and finite (got {seconds})"
        );
        self.fixed_dt = seconds;
        self
    }

    /// Set the per-frame cap on banked time in seconds.
    ///
    /// # Panics
    ///
    /// Panics if `seconds` is not a positive finite number.
    pub fn with_max_accumulator(mut self, seconds: f64) -> Self {
        assert!(
            seconds.is_finite() && seconds > 0.0,
            "max_accumulator must be positive and finite (got {seconds})"
        );
        self.max_accumulator = seconds;
        self
    }

    /// Install a callback invoked after every executed tick with the new
    /// total tick count. This is where a host hangs its render.
    pub fn on_tick(mut self, callback: impl FnMut(u64) + 'static) -> Self {
        self.on_tick = Some(Box::new(callback));
        self
    }

    /// Install a callback for [`LoopEvent`] lifecycle notifications.
    pub fn on_event(mut self, callback: impl FnMut(LoopEvent) + 'static) -> Self {
        self.on_event = Some(Box::new(callback));
        self
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Begin running. No-op if the loop is already running (paused counts as
    /// running; use [`GameLoop::resume`] for that).
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.paused = false;
        log::debug!("game loop started (fixed_dt={}s)", self.fixed_dt);
        self.emit(LoopEvent::Started);
    }

    /// Freeze the simulation, keeping all counters. No-op unless running and
    /// not already paused.
    pub fn pause(&mut self) {
        if !self.running || self.paused {
            return;
        }
        self.paused = true;
        log::debug!("game loop paused at tick {}", self.ticks);
        self.emit(LoopEvent::Paused);
    }

    /// Continue after a pause. Time that passed while paused is discarded:
    /// the next frame advances by exactly one fixed step. No-op unless
    /// paused.
    pub fn resume(&mut self) {
        if !self.running || !self.paused {
            return;
        }
        self.paused = false;
        self.accumulator = 0.0;
        self.last_time = None;
        log::debug!("game loop resumed at tick {}", self.ticks);
        self.emit(LoopEvent::Resumed);
    }

    /// Halt and reset. Tick count, banked time, and the FPS window all go
    /// back to zero; the world is left as the last tick left it. No-op if
    /// the loop is not running.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.paused = false;
        self.accumulator = 0.0;
        self.last_time = None;
        self.ticks = 0;
        self.fps = 0;
        self.fps_frames = 0;
        self.fps_elapsed = 0.0;
        log::debug!("game loop stopped");
        self.emit(LoopEvent::Stopped);
    }

    // ── Frame Advance ────────────────────────────────────────────────

    /// Advance the loop by one host frame and return how many fixed ticks
    /// ran.
    ///
    /// Does nothing when the loop is idle or paused. When the clock reports
    /// the surface hidden, pauses the loop instead of simulating.
    pub fn frame(&mut self) -> u32 {
        if !self.running || self.paused {
            return 0;
        }
        if !self.clock.is_visible() {
            log::debug!("host surface hidden, pausing game loop");
            self.pause();
            return 0;
        }

        let now = self.clock.now();
        let delta = match self.last_time {
            Some(last) => now - last,
            // First frame after start/resume: advance exactly one tick's
            // worth instead of trusting a wall-clock gap.
            None => self.fixed_dt,
        };
        self.last_time = Some(now);
        debug_assert!(delta >= 0.0, "clock went backwards");

        self.accumulator += delta.min(self.max_accumulator);

        let mut ticks_run = 0;
        while self.accumulator >= self.fixed_dt {
            let dt = self.fixed_dt as f32;
            for system in &self.systems {
                system(&mut self.world, dt);
            }
            self.accumulator -= self.fixed_dt;
            self.ticks += 1;
            ticks_run += 1;

            let tick = self.ticks;
            if let Some(callback) = self.on_tick.as_mut() {
                callback(tick);
            }
            self.emit(LoopEvent::Tick { tick });
        }

        // FPS tracks host frames over raw deltas, independent of tick rate.
        self.fps_frames += 1;
        self.fps_elapsed += delta;
        if self.fps_elapsed >= 1.0 {
            self.fps = self.fps_frames;
            self.fps_frames = 0;
            self.fps_elapsed = 0.0;
            self.emit(LoopEvent::FpsSample { fps: self.fps });
        }

        ticks_run
    }

    // ── State ────────────────────────────────────────────────────────

    /// Whether the loop has been started and not stopped. Stays `true` while
    /// paused.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Total ticks executed since the last start.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Frames counted in the most recently completed one-second window.
    /// Zero until the first window closes.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    pub fn max_accumulator(&self) -> f64 {
        self.max_accumulator
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world, for staging state between frames (menu
    /// selections, difficulty changes, round resets).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn emit(&mut self, event: LoopEvent) {
        if let Some(callback) = self.on_event.as_mut() {
            callback(event);
        }
    }
}
