//! # Sepal — ECS and Fixed-Timestep Loop for Mini-Games
//!
//! A small runtime for browser-scale mini-games: a sparse-set
//! [`World`](ecs::World) holding entities and components, plain-function
//! systems, and a [`GameLoop`](game_loop::GameLoop) that advances the
//! simulation in deterministic fixed ticks however erratically the host
//! renders.
//!
//! Start with `use sepal::prelude::*`, spawn into a
//! [`World`](ecs::World), and hand it to [`GameLoop::new`](game_loop::GameLoop::new)
//! — or to a [`LoopBinding`](binding::LoopBinding) when a UI surface needs to
//! observe it.

pub mod binding;
pub mod clock;
pub mod ecs;
pub mod game_loop;
pub mod prelude;
