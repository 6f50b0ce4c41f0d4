//! # Entity — Generational Handles for Game Objects
//!
//! An [`Entity`] carries no data of its own. It is a key into the
//! [`World`](super::world::World), which maps entities to components. Keeping
//! identity separate from data is what lets mini-games mix and match behavior
//! freely: a petal, a beat marker, and a card back are all "just entities".
//!
//! ## Design: Generational Indices
//!
//! Slot indices are recycled, but each slot carries a **generation** counter
//! that is bumped when the slot is freed. A handle is only valid while its
//! generation matches the slot's current one:
//!
//! ```text
//! spawn     → Entity(3v0)              slot 3, generation 0
//! despawn   → slot 3 freed, gen now 1
//! spawn     → Entity(3v1)              slot reused, new generation
//! ```
//!
//! The stale `Entity(3v0)` handle still exists in user code, but every lookup
//! with it fails safely: `get` returns `None`, `has` returns `false`, and a
//! second `despawn` is a no-op. No two live entities ever share a full
//! `(index, generation)` pair, so handles held across frames (a selected card,
//! a followed target) can never silently rebind to a different object.
//!
//! ## Comparison
//!
//! - **hecs** / **bevy_ecs**: same generational scheme, packed into a `u64`.
//! - **EnTT (C++)**: same idea with configurable bit splits.
//!
//! Two plain `u32` fields keep ours easy to read in a debugger.

use std::fmt;

/// A lightweight handle to an entity in the [`World`](super::world::World).
///
/// Obtained from [`World::spawn`](super::world::World::spawn). Handles are
/// `Copy` and cheap to store; a handle whose entity has been despawned simply
/// reads as absent everywhere.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    /// Slot index. Recycled after despawn.
    pub(crate) index: u32,
    /// Generation of the slot at spawn time. Mismatch means the handle is stale.
    pub(crate) generation: u32,
}

impl Entity {
    /// Returns the raw slot index. For diagnostics and logging.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation. For diagnostics and logging.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Allocates and recycles entity slots.
///
/// ```text
/// generations: [1, 0, 2, 0]   one entry per slot ever created
/// free:        [0, 2]          slots waiting for reuse
/// ```
///
/// `generations.len()` doubles as the next fresh index, so live count is
/// `generations.len() - free.len()` without any bookkeeping on the hot path.
pub(crate) struct EntityAllocator {
    /// Current generation of every slot, indexed by `Entity::index`.
    generations: Vec<u32>,
    /// Freed slot indices, popped on the next spawn.
    free: Vec<u32>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Hand out a handle, reusing a freed slot when one is available.
    pub fn allocate(&mut self) -> Entity {
        if let Some(index) = self.free.pop() {
            // Generation was bumped when the slot was freed, so this handle is
            // distinct from every handle the slot produced before.
            Entity {
                index,
                generation: self.generations[index as usize],
            }
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            Entity {
                index,
                generation: 0,
            }
        }
    }

    /// Free an entity's slot. Returns `false` if the handle was already stale,
    /// in which case nothing changes.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        // Invalidate all outstanding handles to this slot before recycling it.
        self.generations[entity.index as usize] += 1;
        self.free.push(entity.index);
        true
    }

    /// Whether the handle refers to a currently live entity.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.generations
            .get(entity.index as usize)
            .is_some_and(|&generation| generation == entity.generation)
    }

    /// Number of live entities.
    pub fn alive_count(&self) -> usize {
        self.generations.len() - self.free.len()
    }

    /// Forget every slot, live or freed. The next `allocate` starts again at
    /// index 0, generation 0.
    pub fn reset(&mut self) {
        self.generations.clear();
        self.free.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_slots_are_sequential() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        assert_eq!((a.index, a.generation), (0, 0));
        assert_eq!((b.index, b.generation), (1, 0));
    }

    #[test]
    fn recycled_slot_gets_new_generation() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        assert!(alloc.deallocate(a));
        let b = alloc.allocate();
        assert_eq!(b.index, a.index); // same slot
        assert_eq!(b.generation, 1); // different handle
        assert_ne!(a, b);
    }

    #[test]
    fn stale_handle_reads_dead() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        assert!(alloc.is_alive(a));
        alloc.deallocate(a);
        assert!(!alloc.is_alive(a));

        // Reusing the slot must not resurrect the old handle.
        let _b = alloc.allocate();
        assert!(!alloc.is_alive(a));
    }

    #[test]
    fn double_free_is_rejected() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        assert!(alloc.deallocate(a));
        assert!(!alloc.deallocate(a));
        assert_eq!(alloc.alive_count(), 0);
    }

    #[test]
    fn never_allocated_handle_reads_dead() {
        let alloc = EntityAllocator::new();
        let forged = Entity {
            index: 7,
            generation: 0,
        };
        assert!(!alloc.is_alive(forged));
    }

    #[test]
    fn alive_count_tracks_churn() {
        let mut alloc = EntityAllocator::new();
        assert_eq!(alloc.alive_count(), 0);
        let a = alloc.allocate();
        let _b = alloc.allocate();
        let _c = alloc.allocate();
        assert_eq!(alloc.alive_count(), 3);
        alloc.deallocate(a);
        assert_eq!(alloc.alive_count(), 2);
        alloc.allocate();
        assert_eq!(alloc.alive_count(), 3);
    }

    #[test]
    fn reset_starts_fresh() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        alloc.allocate();
        alloc.deallocate(a);
        alloc.reset();

        assert_eq!(alloc.alive_count(), 0);
        let first = alloc.allocate();
        assert_eq!((first.index, first.generation), (0, 0));
    }

    #[test]
    fn display_and_debug_formats() {
        let mut alloc = EntityAllocator::new();
        alloc.allocate();
        let e = {
            let a = alloc.allocate();
            alloc.deallocate(a);
            alloc.allocate()
        };
        assert_eq!(format!("{e}"), "1v1");
        assert_eq!(format!("{e:?}"), "Entity(1v1)");
    }
}
