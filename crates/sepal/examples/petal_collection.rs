//! Petal collection — a headless mini-game on the real clock.
//!
//! Petals drift down a 240x160 field while a collector chases whichever is
//! nearest, scoring each one it touches. The simulation runs at a steady
//! 60 ticks per second no matter how fast the host loop below spins.
//!
//! Run with `RUST_LOG=debug` to watch the loop lifecycle.

use std::time::Duration;

use glam::Vec2;
use sepal::prelude::*;

/// Where something is on the field.
struct Position(Vec2);

/// Marks an uncollected petal; the payload is its sway phase.
struct Petal {
    sway: f32,
}

/// The one entity that does the collecting.
struct Collector {
    speed: f32,
    reach: f32,
}

struct Score(u32);

fn main() {
    env_logger::init();

    let mut world = World::new();
    spawn_field(&mut world);

    let mut game_loop = GameLoop::new(world, vec![drift, seek, collect])
        .on_event(|event| {
            if let LoopEvent::FpsSample { fps } = event {
                log::info!("host running at {fps} fps");
            }
        });
    game_loop.start();

    // Drive frames far faster than the tick rate; the accumulator turns the
    // surplus into idle frames instead of extra simulation.
    while petals_left(game_loop.world()) > 0 && game_loop.tick_count() < 3600 {
        game_loop.frame();
        std::thread::sleep(Duration::from_millis(4));
    }

    let ticks = game_loop.tick_count();
    let fixed_dt = game_loop.fixed_dt();
    game_loop.stop();

    let world = game_loop.world();
    let (_, score) = world.query::<Score>().next().expect("collector scores");
    println!(
        "collected {} petals in {:.1} simulated seconds ({} left)",
        score.0,
        ticks as f64 * fixed_dt,
        petals_left(world),
    );
}

fn spawn_field(world: &mut World) {
    // Deterministic scatter; no RNG needed for a demo.
    for i in 0..24u32 {
        let petal = world.spawn();
        let x = (i * 37 % 240) as f32 - 120.0;
        let y = 40.0 + (i * 53 % 120) as f32;
        world.insert(petal, Position(Vec2::new(x, y)));
        world.insert(
            petal,
            Petal {
                sway: i as f32 * 0.7,
            },
        );
    }

    let collector = world.spawn();
    world.insert(collector, Position(Vec2::new(0.0, -70.0)));
    world.insert(
        collector,
        Collector {
            speed: 90.0,
            reach: 6.0,
        },
    );
    world.insert(collector, Score(0));
}

/// Petals fall and sway.
fn drift(world: &mut World, dt: f32) {
    let mut fallen = Vec::new();
    for (entity, petal) in world.query_mut::<Petal>() {
        petal.sway += dt * 2.0;
        fallen.push((entity, petal.sway));
    }
    for (entity, sway) in fallen {
        if let Some(pos) = world.get_mut::<Position>(entity) {
            pos.0.y -= 12.0 * dt;
            pos.0.x += sway.sin() * 8.0 * dt;
        }
    }
}

/// The collector walks toward the nearest petal.
fn seek(world: &mut World, dt: f32) {
    let Some((collector, speed, here)) = world
        .query2::<Collector, Position>()
        .next()
        .map(|(e, c, p)| (e, c.speed, p.0))
    else {
        return;
    };

    let nearest = world
        .query2::<Petal, Position>()
        .map(|(_, _, p)| p.0)
        .min_by(|a, b| {
            a.distance_squared(here)
                .total_cmp(&b.distance_squared(here))
        });

    if let Some(target) = nearest {
        let step = (target - here).clamp_length_max(speed * dt);
        if let Some(pos) = world.get_mut::<Position>(collector) {
            pos.0 += step;
        }
    }
}

/// Petals within reach are collected and scored.
fn collect(world: &mut World, _dt: f32) {
    let Some((collector, reach, here)) = world
        .query2::<Collector, Position>()
        .map(|(e, c, p)| (e, c.reach, p.0))
        .next()
    else {
        return;
    };

    let caught: Vec<Entity> = world
        .query2::<Petal, Position>()
        .filter(|(_, _, p)| p.0.distance(here) <= reach)
        .map(|(e, _, _)| e)
        .collect();

    for petal in caught {
        world.despawn(petal);
        if let Some(score) = world.get_mut::<Score>(collector) {
            score.0 += 1;
            log::debug!("petal collected, score now {}", score.0);
        }
    }
}

fn petals_left(world: &World) -> usize {
    world.query::<Petal>().count()
}
