//! # Host Binding — Mounting a Loop into a UI Surface
//!
//! A host UI (a web page bridge, a desktop shell, a test harness) wants two
//! things from a running game: a handle to drive and control it, and a cheap
//! way to read "what phase is it in, what tick, what FPS" for a HUD. A
//! [`LoopBinding`] packages both.
//!
//! The binding subscribes to the loop's [`LoopEvent`] stream and folds it
//! into a [`LoopSnapshot`] behind an `Rc<Cell<_>>`. Readers grab the `Rc`
//! once at mount time and `get()` whenever they repaint; no locks, no
//! channels, no re-entrancy into the loop.
//!
//! Dropping the binding stops the loop unconditionally, so tearing down a
//! screen can never leave a simulation ticking in the background. This is
//! the whole cleanup story; there is nothing to unsubscribe.

use std::cell::Cell;
use std::rc::Rc;

use crate::clock::{Clock, StdClock};
use crate::ecs::schedule::System;
use crate::ecs::world::World;
use crate::game_loop::{GameLoop, LoopEvent};

/// Coarse lifecycle phase of a mounted loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopPhase {
    #[default]
    Idle,
    Running,
    Paused,
}

/// What a HUD needs to know, small enough to copy every repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopSnapshot {
    pub phase: LoopPhase,
    pub tick: u64,
    pub fps: u32,
}

/// A [`GameLoop`] mounted into a host surface, with an observable snapshot
/// of its state.
pub struct LoopBinding<C: Clock = StdClock> {
    game_loop: GameLoop<C>,
    state: Rc<Cell<LoopSnapshot>>,
}

impl LoopBinding<StdClock> {
    /// Mount a wall-clock loop. With `auto_start` the simulation begins
    /// immediately; otherwise it waits in [`LoopPhase::Idle`] for an explicit
    /// [`GameLoop::start`].
    pub fn mount(world: World, systems: Vec<System>, auto_start: bool) -> Self {
        Self::mount_with_clock(world, systems, StdClock::new(), auto_start)
    }
}

impl<C: Clock> LoopBinding<C> {
    /// Mount with an explicit clock, for tests and replays.
    pub fn mount_with_clock(world: World, systems: Vec<System>, clock: C, auto_start: bool) -> Self {
        let state = Rc::new(Cell::new(LoopSnapshot::default()));
        let mirror = Rc::clone(&state);
        let mut game_loop =
            GameLoop::with_clock(world, systems, clock).on_event(move |event| {
                let mut snapshot = mirror.get();
                match event {
                    LoopEvent::Started => {
                        snapshot = LoopSnapshot {
                            phase: LoopPhase::Running,
                            ..LoopSnapshot::default()
                        };
                    }
                    LoopEvent::Paused => snapshot.phase = LoopPhase::Paused,
                    LoopEvent::Resumed => snapshot.phase = LoopPhase::Running,
                    LoopEvent::Stopped => snapshot = LoopSnapshot::default(),
                    LoopEvent::Tick { tick } => snapshot.tick = tick,
                    LoopEvent::FpsSample { fps } => snapshot.fps = fps,
                }
                mirror.set(snapshot);
            });
        if auto_start {
            game_loop.start();
        }
        log::debug!("loop mounted (auto_start={auto_start})");
        Self { game_loop, state }
    }

    /// A shared handle onto the live snapshot. Cheap to clone, valid after
    /// the binding itself is gone (it will read [`LoopPhase::Idle`] then).
    pub fn state(&self) -> Rc<Cell<LoopSnapshot>> {
        Rc::clone(&self.state)
    }

    /// The snapshot right now.
    pub fn snapshot(&self) -> LoopSnapshot {
        self.state.get()
    }

    pub fn game_loop(&self) -> &GameLoop<C> {
        &self.game_loop
    }

    pub fn game_loop_mut(&mut self) -> &mut GameLoop<C> {
        &mut self.game_loop
    }

    /// Drive one host frame. Forwards to [`GameLoop::frame`].
    pub fn frame(&mut self) -> u32 {
        self.game_loop.frame()
    }
}

impl<C: Clock> Drop for LoopBinding<C> {
    fn drop(&mut self) {
        // Unmount always halts the simulation, whatever state it was in.
        self.game_loop.stop();
        log::debug!("loop unmounted");
    }
}
