//! # Sparse-Set ECS
//!
//! A deliberately small Entity Component System for browser-scale mini-games.
//! Storage follows the sparse-set pattern popularized by
//! [EnTT](https://github.com/skypjack/entt): one table per component type,
//! dense value arrays, generational entity handles. No archetypes, no
//! resources, no parallelism.
//!
//! ## Module Overview
//!
//! - [`entity`] — Generational entity handles and slot recycling
//! - [`component`] — Per-type sparse-set tables behind a type-erased trait
//! - [`world`] — Central container and per-entity component access
//! - [`query`] — Lazy tuple iteration over entities by component shape
//! - [`schedule`] — Ordered `fn(&mut World, f32)` system lists

pub mod component;
pub mod entity;
pub mod query;
pub mod schedule;
pub mod world;

pub use component::Component;
pub use entity::Entity;
pub use schedule::{Schedule, System};
pub use world::{EcsError, World};
