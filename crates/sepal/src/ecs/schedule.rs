//! # Systems and Schedules — Game Logic as Plain Functions
//!
//! A system is a function taking `&mut World` and the fixed timestep in
//! seconds. No parameter injection, no dependency graph, no parallelism:
//! systems run one after another, in the order they were registered, and that
//! order is part of a game's design (input before movement before collection
//! before cleanup).
//!
//! ## Design: `fn` Pointers, Not Closures
//!
//! [`System`] is a plain `fn` pointer rather than a boxed `FnMut`. That costs
//! captured state (put state in the [`World`] instead, where it belongs) and
//! buys identity: [`Schedule::remove_system`] can compare registered systems
//! by address, so a pause menu can unhook `movement` and later re-add it.
//!
//! ## Comparison
//!
//! - **hecs**: no system concept at all; scheduling is your problem.
//! - **bevy_ecs**: systems are trait objects with injected params, run
//!   conditions, and parallel execution. Far more machinery than a handful of
//!   mini-games needs.

use super::world::World;

/// A system: called once per fixed tick with the world and the tick length in
/// seconds.
pub type System = fn(&mut World, f32);

/// An ordered list of systems, run front to back.
///
/// A schedule can be disabled as a whole, which turns [`Schedule::run`] into
/// a no-op while keeping the list intact. Registration order is preserved
/// across disable/enable round trips.
pub struct Schedule {
    systems: Vec<System>,
    enabled: bool,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            enabled: true,
        }
    }

    /// Append a system. The same function may be registered more than once;
    /// it will run once per registration.
    pub fn add_system(&mut self, system: System) {
        self.systems.push(system);
    }

    /// Remove the earliest registration of `system`, comparing by function
    /// address. Unknown systems are a no-op.
    pub fn remove_system(&mut self, system: System) {
        if let Some(pos) = self
            .systems
            .iter()
            .position(|&registered| std::ptr::fn_addr_eq(registered, system))
        {
            self.systems.remove(pos);
        }
    }

    /// Drop every registered system. The enabled flag is untouched.
    pub fn clear(&mut self) {
        self.systems.clear();
    }

    /// Enable or disable the schedule as a whole.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the number of registered systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Run every system in registration order, passing the same `dt` to each.
    /// Does nothing while the schedule is disabled.
    pub fn run(&self, world: &mut World, dt: f32) {
        if !self.enabled {
            return;
        }
        for system in &self.systems {
            system(world, dt);
        }
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}
