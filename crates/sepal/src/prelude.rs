//! Convenience re-exports — `use sepal::prelude::*` for the common items.
//!
//! Types only — all functionality is discoverable through methods on types,
//! not free functions.

pub use crate::binding::{LoopBinding, LoopPhase, LoopSnapshot};
pub use crate::clock::{Clock, ManualClock, StdClock};
pub use crate::ecs::{Component, EcsError, Entity, Schedule, System, World};
pub use crate::game_loop::{GameLoop, LoopEvent};
