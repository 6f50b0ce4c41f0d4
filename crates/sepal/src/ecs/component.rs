//! # Component Storage — Sparse Sets, One Table per Type
//!
//! Components are plain Rust values. Any `Send + Sync + 'static` type is
//! usable as a component with no registration step: the first insert of a type
//! creates its table on demand.
//!
//! ## Design: Sparse Set
//!
//! Each component type gets one [`ComponentTable`]:
//!
//! ```text
//! entities: [Entity(0v0), Entity(4v1), Entity(2v0)]   parallel to data
//! data:     [Petal { .. }, Petal { .. }, Petal { .. }]
//! slots:    { 0 → 0, 4 → 1, 2 → 2 }                   entity index → dense slot
//! ```
//!
//! Lookups go through `slots` in O(1); iteration walks the two dense vectors
//! in insertion order, which is what makes query results stable from frame to
//! frame. Removal swap-removes the dense slot and patches `slots` for the
//! entity that moved into it.
//!
//! Stored entries remember the full [`Entity`] handle, not just the index, so
//! a stale handle whose slot was recycled can never read another entity's
//! data: the generation check in [`ComponentTable::slot_of`] rejects it.
//!
//! ## Comparison
//!
//! - **EnTT (C++)** popularized exactly this layout.
//! - **hecs** / **bevy_ecs** group entities into archetypes instead, which
//!   speeds up multi-component queries but makes insert/remove move whole
//!   rows. Mini-game worlds are small and churn components constantly
//!   (collected petals despawn every frame), so per-type tables win here.

use std::any::Any;
use std::collections::HashMap;

use super::entity::Entity;

/// Marker trait for component types.
///
/// Blanket-implemented for every `Send + Sync + 'static` type, so ordinary
/// structs work as components without deriving anything.
pub trait Component: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Component for T {}

/// Type-erased interface over a [`ComponentTable`], one entry per component
/// type in the [`World`](super::world::World).
///
/// Only the operations that must work without knowing `T` live here; everything
/// typed goes through a downcast via `as_any` / `as_any_mut`.
pub(crate) trait ComponentStorage: Send + Sync {
    /// Drop the entity's entry, if present. Used by the despawn sweep.
    fn remove(&mut self, entity: Entity);

    /// Drop every entry.
    fn clear(&mut self);

    /// Number of entries.
    fn len(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Dense storage for all components of a single type `T`.
pub(crate) struct ComponentTable<T: Component> {
    /// Owning entity of each dense slot, parallel to `data`.
    entities: Vec<Entity>,
    /// Component values in insertion order.
    data: Vec<T>,
    /// Entity index → dense slot.
    slots: HashMap<u32, usize>,
}

impl<T: Component> ComponentTable<T> {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            data: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Attach `value` to `entity`, overwriting any existing value in place.
    ///
    /// Overwrites keep their dense slot, so re-inserting does not reshuffle
    /// iteration order.
    pub fn insert(&mut self, entity: Entity, value: T) {
        match self.slots.get(&entity.index) {
            Some(&slot) => {
                debug_assert_eq!(self.entities[slot], entity);
                self.data[slot] = value;
            }
            None => {
                self.slots.insert(entity.index, self.data.len());
                self.entities.push(entity);
                self.data.push(value);
            }
        }
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slot_of(entity).map(|slot| &self.data[slot])
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slot_of(entity).map(|slot| &mut self.data[slot])
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.slot_of(entity).is_some()
    }

    /// Detach the entity's value. Returns `false` if it had none.
    pub fn remove(&mut self, entity: Entity) -> bool {
        let Some(slot) = self.slot_of(entity) else {
            return false;
        };
        self.entities.swap_remove(slot);
        self.data.swap_remove(slot);
        self.slots.remove(&entity.index);
        // The entry from the end of the dense arrays (if any) now sits at
        // `slot`; point its sparse entry at the new location.
        if let Some(moved) = self.entities.get(slot) {
            self.slots.insert(moved.index, slot);
        }
        true
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.data.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.data.iter_mut())
    }

    /// Dense slot for `entity`, with the generation check that keeps stale
    /// handles from aliasing a recycled slot.
    fn slot_of(&self, entity: Entity) -> Option<usize> {
        let &slot = self.slots.get(&entity.index)?;
        (self.entities[slot] == entity).then_some(slot)
    }
}

impl<T: Component> ComponentStorage for ComponentTable<T> {
    fn remove(&mut self, entity: Entity) {
        ComponentTable::remove(self, entity);
    }

    fn clear(&mut self) {
        self.entities.clear();
        self.data.clear();
        self.slots.clear();
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::super::entity::EntityAllocator;
    use super::*;

    #[test]
    fn insert_then_get() {
        let mut alloc = EntityAllocator::new();
        let mut table = ComponentTable::new();
        let e = alloc.allocate();

        table.insert(e, 41_i32);
        assert_eq!(table.get(e), Some(&41));
        assert!(table.contains(e));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn insert_overwrites_in_place() {
        let mut alloc = EntityAllocator::new();
        let mut table = ComponentTable::new();
        let a = alloc.allocate();
        let b = alloc.allocate();

        table.insert(a, "first");
        table.insert(b, "second");
        table.insert(a, "replaced");

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(a), Some(&"replaced"));
        // Overwrite must not move `a` behind `b` in iteration order.
        let order: Vec<Entity> = table.iter().map(|(e, _)| e).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn remove_patches_swapped_slot() {
        let mut alloc = EntityAllocator::new();
        let mut table = ComponentTable::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        let c = alloc.allocate();
        table.insert(a, 1_u32);
        table.insert(b, 2);
        table.insert(c, 3);

        // Removing from the middle swaps the last entry into the gap.
        assert!(table.remove(a));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(a), None);
        assert_eq!(table.get(b), Some(&2));
        assert_eq!(table.get(c), Some(&3));

        assert!(!table.remove(a)); // already gone
    }

    #[test]
    fn stale_handle_cannot_read_recycled_slot() {
        let mut alloc = EntityAllocator::new();
        let mut table = ComponentTable::new();

        let old = alloc.allocate();
        table.insert(old, 7_u8);
        table.remove(old);
        alloc.deallocate(old);

        // Same slot index, new generation.
        let new = alloc.allocate();
        table.insert(new, 99);

        assert_eq!(table.get(old), None);
        assert!(!table.contains(old));
        assert_eq!(table.get(new), Some(&99));
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut alloc = EntityAllocator::new();
        let mut table = ComponentTable::new();
        let entities: Vec<Entity> = (0..5).map(|_| alloc.allocate()).collect();
        for (i, &e) in entities.iter().enumerate() {
            table.insert(e, i);
        }

        let seen: Vec<usize> = table.iter().map(|(_, &v)| v).collect();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn erased_clear_empties_table() {
        let mut alloc = EntityAllocator::new();
        let mut table = ComponentTable::new();
        table.insert(alloc.allocate(), 1.0_f32);
        table.insert(alloc.allocate(), 2.0);

        let erased: &mut dyn ComponentStorage = &mut table;
        assert_eq!(erased.len(), 2);
        erased.clear();
        assert_eq!(erased.len(), 0);
    }
}
