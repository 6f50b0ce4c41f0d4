//! # Queries — Iterating Entities by Component Shape
//!
//! Queries answer "every entity that has all of these components" as a lazy
//! iterator of tuples. Nothing is cached: each call walks the live tables, so
//! results always reflect the world as it is right now.
//!
//! ## Iteration Order
//!
//! A query is driven by its **first** type parameter: entities come out in
//! the insertion order of that type's table, with entities missing any of the
//! other components skipped. Under pure insertion the order is stable across
//! frames, which mini-game logic leans on (the oldest beat marker is always
//! the first `query` result). Removal and despawn swap-fill table slots, so
//! after churn the order is still deterministic but no longer chronological.
//!
//! ## Mutation While Iterating
//!
//! Shared queries borrow the whole [`World`], so the borrow checker rules out
//! structural edits mid-iteration. The working pattern is collect-then-act:
//!
//! ```
//! # use sepal::ecs::World;
//! # struct Collected;
//! # let mut world = World::new();
//! let done: Vec<_> = world.query::<Collected>().map(|(e, _)| e).collect();
//! for entity in done {
//!     world.despawn(entity);
//! }
//! ```
//!
//! For in-place value edits of a single component type, [`World::query_mut`]
//! yields mutable references without the round trip.

use super::component::Component;
use super::entity::Entity;
use super::world::World;

impl World {
    /// Iterate all entities with a component of type `A`, in the insertion
    /// order of `A`'s table.
    pub fn query<A: Component>(&self) -> impl Iterator<Item = (Entity, &A)> {
        self.table::<A>().into_iter().flat_map(|table| table.iter())
    }

    /// Iterate all entities that have both `A` and `B`.
    ///
    /// Driven by `A`'s table; entities lacking `B` are skipped.
    pub fn query2<A: Component, B: Component>(&self) -> impl Iterator<Item = (Entity, &A, &B)> {
        let b = self.table::<B>();
        self.query::<A>()
            .filter_map(move |(entity, value_a)| Some((entity, value_a, b?.get(entity)?)))
    }

    /// Iterate all entities that have `A`, `B`, and `C`, driven by `A`'s table.
    pub fn query3<A: Component, B: Component, C: Component>(
        &self,
    ) -> impl Iterator<Item = (Entity, &A, &B, &C)> {
        let b = self.table::<B>();
        let c = self.table::<C>();
        self.query::<A>().filter_map(move |(entity, value_a)| {
            Some((entity, value_a, b?.get(entity)?, c?.get(entity)?))
        })
    }

    /// Iterate all entities that have `A`, `B`, `C`, and `D`, driven by `A`'s
    /// table. Four is plenty for mini-games; compose with [`World::get`] for
    /// anything wider.
    pub fn query4<A: Component, B: Component, C: Component, D: Component>(
        &self,
    ) -> impl Iterator<Item = (Entity, &A, &B, &C, &D)> {
        let b = self.table::<B>();
        let c = self.table::<C>();
        let d = self.table::<D>();
        self.query::<A>().filter_map(move |(entity, value_a)| {
            Some((
                entity,
                value_a,
                b?.get(entity)?,
                c?.get(entity)?,
                d?.get(entity)?,
            ))
        })
    }

    /// Iterate all entities with a component of type `A`, yielding mutable
    /// references in the insertion order of `A`'s table.
    pub fn query_mut<A: Component>(&mut self) -> impl Iterator<Item = (Entity, &mut A)> {
        self.table_mut::<A>()
            .into_iter()
            .flat_map(|table| table.iter_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Label(&'static str);

    #[derive(Debug, PartialEq)]
    struct Hp(i32);

    #[derive(Debug, PartialEq)]
    struct Armor(i32);

    #[derive(Debug, PartialEq)]
    struct Mana(i32);

    #[test]
    fn query_on_untouched_type_is_empty() {
        let mut world = World::new();
        world.spawn();
        assert_eq!(world.query::<Label>().count(), 0);
        assert_eq!(world.query2::<Label, Hp>().count(), 0);
    }

    #[test]
    fn query_follows_first_type_insertion_order() {
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();
        let c = world.spawn();
        world.insert(b, Label("b"));
        world.insert(c, Label("c"));
        world.insert(a, Label("a"));

        let names: Vec<&str> = world.query::<Label>().map(|(_, l)| l.0).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn query2_yields_exactly_the_conjunction() {
        let mut world = World::new();
        let knight = world.spawn();
        let ghost = world.spawn();
        let golem = world.spawn();
        let barrel = world.spawn();
        world.insert(knight, Hp(30));
        world.insert(ghost, Hp(10)); // Hp only
        world.insert(golem, Hp(80));
        world.insert(golem, Armor(12));
        world.insert(barrel, Armor(3)); // Armor only
        world.insert(knight, Armor(5));

        let rows: Vec<(Entity, i32, i32)> = world
            .query2::<Hp, Armor>()
            .map(|(e, hp, armor)| (e, hp.0, armor.0))
            .collect();
        // Driven by Hp insertion order; ghost and barrel never appear.
        assert_eq!(rows, vec![(knight, 30, 5), (golem, 80, 12)]);
    }

    #[test]
    fn query2_order_ignores_second_table_order() {
        let mut world = World::new();
        let first = world.spawn();
        let second = world.spawn();
        world.insert(first, Hp(1));
        world.insert(second, Hp(2));
        // Armor inserted in the opposite order.
        world.insert(second, Armor(20));
        world.insert(first, Armor(10));

        let order: Vec<Entity> = world.query2::<Hp, Armor>().map(|(e, ..)| e).collect();
        assert_eq!(order, vec![first, second]);
    }

    #[test]
    fn query3_and_query4_pair_values_per_entity() {
        let mut world = World::new();
        let full = world.spawn();
        let partial = world.spawn();
        world.insert(full, Hp(100));
        world.insert(full, Armor(50));
        world.insert(full, Mana(25));
        world.insert(full, Label("full"));
        world.insert(partial, Hp(1));
        world.insert(partial, Armor(1));

        let three: Vec<_> = world
            .query3::<Hp, Armor, Mana>()
            .map(|(e, hp, armor, mana)| (e, hp.0, armor.0, mana.0))
            .collect();
        assert_eq!(three, vec![(full, 100, 50, 25)]);

        let four: Vec<_> = world
            .query4::<Hp, Armor, Mana, Label>()
            .map(|(e, hp, armor, mana, label)| (e, hp.0, armor.0, mana.0, label.0))
            .collect();
        assert_eq!(four, vec![(full, 100, 50, 25, "full")]);
    }

    #[test]
    fn queries_are_computed_fresh_each_call() {
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();
        world.insert(a, Hp(1));
        world.insert(b, Hp(2));
        assert_eq!(world.query::<Hp>().count(), 2);

        world.despawn(a);
        assert_eq!(world.query::<Hp>().count(), 1);

        let c = world.spawn();
        world.insert(c, Hp(3));
        assert_eq!(world.query::<Hp>().count(), 2);
    }

    #[test]
    fn query_never_yields_despawned_entities() {
        let mut world = World::new();
        let doomed = world.spawn();
        let kept = world.spawn();
        world.insert(doomed, Label("doomed"));
        world.insert(kept, Label("kept"));
        world.despawn(doomed);

        let survivors: Vec<Entity> = world.query::<Label>().map(|(e, _)| e).collect();
        assert_eq!(survivors, vec![kept]);
    }

    #[test]
    fn query_mut_edits_are_visible_afterwards() {
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();
        world.insert(a, Hp(10));
        world.insert(b, Hp(20));

        for (_, hp) in world.query_mut::<Hp>() {
            hp.0 -= 10;
        }
        assert_eq!(world.get::<Hp>(a), Some(&Hp(0)));
        assert_eq!(world.get::<Hp>(b), Some(&Hp(10)));
    }

    #[test]
    fn collect_then_act_despawn_pattern() {
        let mut world = World::new();
        for i in 0..6 {
            let e = world.spawn();
            world.insert(e, Hp(i));
        }

        let dead: Vec<Entity> = world
            .query::<Hp>()
            .filter(|(_, hp)| hp.0 < 3)
            .map(|(e, _)| e)
            .collect();
        for e in dead {
            world.despawn(e);
        }
        assert_eq!(world.entity_count(), 3);
        assert!(world.query::<Hp>().all(|(_, hp)| hp.0 >= 3));
    }
}
