//! # World — The Central Container
//!
//! The [`World`] owns all entities and all component tables. It is the single
//! source of truth for a mini-game's simulation state; systems receive
//! `&mut World` and everything they know about lives here.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │ World                                             │
//! │                                                   │
//! │  entities: EntityAllocator                        │
//! │    generational slots, O(1) alive checks          │
//! │                                                   │
//! │  tables: HashMap<TypeId, Box<dyn ComponentStorage>│
//! │    one sparse-set table per component type,       │
//! │    created lazily on first insert                 │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! There is no registration step: the `TypeId` of a component type is its
//! identity, and its table appears the first time a value of that type is
//! inserted. Read-only operations (`get`, `has`, `remove` of an unknown type)
//! never create tables.
//!
//! ## Failure Modes
//!
//! Attaching a component to a dead entity is a programmer error, so
//! [`World::insert`] panics, the same way an out-of-bounds index does.
//! Callers holding handles of uncertain liveness (entities despawned by
//! another system earlier in the same tick) use [`World::try_insert`] and
//! match on [`EcsError`]. Reads are always total: `get` and `has` answer
//! "absent" for dead entities rather than failing.

use std::any::TypeId;
use std::collections::HashMap;

use thiserror::Error;

use super::component::{Component, ComponentStorage, ComponentTable};
use super::entity::{Entity, EntityAllocator};

/// Errors from fallible [`World`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EcsError {
    /// The entity is dead, or never came from this world.
    #[error("entity {0} not found")]
    EntityNotFound(Entity),
}

/// The central container for all simulation state.
pub struct World {
    entities: EntityAllocator,
    /// One table per component type, keyed by `TypeId`.
    tables: HashMap<TypeId, Box<dyn ComponentStorage>>,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            tables: HashMap::new(),
        }
    }

    // ── Spawn / Despawn ──────────────────────────────────────────────

    /// Spawn an entity with no components. O(1).
    pub fn spawn(&mut self) -> Entity {
        self.entities.allocate()
    }

    /// Despawn an entity, dropping every component attached to it and freeing
    /// its slot for reuse.
    ///
    /// All component entries vanish together; no later lookup can observe a
    /// half-despawned entity. Returns `false` (and changes nothing) if the
    /// entity was already dead.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.deallocate(entity) {
            return false;
        }
        for table in self.tables.values_mut() {
            table.remove(entity);
        }
        true
    }

    /// Check if an entity handle is still valid (not despawned or stale).
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Returns the number of alive entities.
    pub fn entity_count(&self) -> usize {
        self.entities.alive_count()
    }

    /// Despawn everything and drop every component table.
    ///
    /// This also resets entity allocation, so handles from before the call
    /// must be discarded: a world that has been cleared can hand out
    /// `(index, generation)` pairs it handed out before. Tear down a round of
    /// a mini-game with `clear` only at a point where nothing holds handles.
    pub fn clear(&mut self) {
        self.entities.reset();
        self.tables.clear();
    }

    // ── Per-Entity Component Access ──────────────────────────────────

    /// Attach a component to an entity, replacing any existing value of the
    /// same type.
    ///
    /// # Panics
    ///
    /// Panics if the entity is not alive. Use [`World::try_insert`] when the
    /// handle may have been despawned out from under you.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) {
        if let Err(err) = self.try_insert(entity, component) {
            panic!(
                "Cannot insert component `{}`: {err}",
                std::any::type_name::<T>()
            );
        }
    }

    /// Attach a component to an entity, replacing any existing value of the
    /// same type. Errors instead of panicking on a dead entity.
    pub fn try_insert<T: Component>(&mut self, entity: Entity, component: T) -> Result<(), EcsError> {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::EntityNotFound(entity));
        }
        self.table_entry::<T>().insert(entity, component);
        Ok(())
    }

    /// Get a shared reference to a component on a specific entity.
    ///
    /// Returns `None` if the entity is dead or doesn't have the component.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.table::<T>()?.get(entity)
    }

    /// Get a mutable reference to a component on a specific entity.
    ///
    /// Returns `None` if the entity is dead or doesn't have the component.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.table_mut::<T>()?.get_mut(entity)
    }

    /// Check if an entity has a component of type `T`. Never fails.
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.table::<T>().is_some_and(|table| table.contains(entity))
    }

    /// Detach a component from an entity, dropping the value.
    ///
    /// Returns `true` if the entity had one; a dead entity or a missing
    /// component is a no-op.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> bool {
        self.table_mut::<T>()
            .is_some_and(|table| table.remove(entity))
    }

    // ── Table Access ─────────────────────────────────────────────────

    /// The table for `T`, if any value of `T` was ever inserted.
    pub(super) fn table<T: Component>(&self) -> Option<&ComponentTable<T>> {
        self.tables
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref()
    }

    pub(super) fn table_mut<T: Component>(&mut self) -> Option<&mut ComponentTable<T>> {
        self.tables
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut()
    }

    /// The table for `T`, created on demand. Only mutating inserts go through
    /// here; reads must not allocate tables.
    fn table_entry<T: Component>(&mut self) -> &mut ComponentTable<T> {
        self.tables
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentTable::<T>::new()))
            .as_any_mut()
            .downcast_mut()
            .expect("table downcasts to the type its TypeId key names")
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
