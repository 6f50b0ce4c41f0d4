use std::hint::black_box;

use criterion::*;
use sepal::prelude::*;

struct Position {
    x: f32,
    y: f32,
}

struct Velocity {
    x: f32,
    y: f32,
}

const SMALL: usize = 1_000;
const LARGE: usize = 10_000;

fn populate(world: &mut World, count: usize) {
    for i in 0..count {
        let e = world.spawn();
        world.insert(
            e,
            Position {
                x: i as f32,
                y: 0.0,
            },
        );
        if i % 2 == 0 {
            world.insert(e, Velocity { x: 1.0, y: -1.0 });
        }
    }
}

fn spawn_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn");

    group.bench_function("spawn_insert_10k", |b| {
        b.iter(|| {
            let mut world = World::new();
            populate(&mut world, LARGE);
            black_box(&world);
        });
    });

    group.bench_function("despawn_half_1k", |b| {
        b.iter_batched(
            || {
                let mut world = World::new();
                populate(&mut world, SMALL);
                let victims: Vec<Entity> = world
                    .query::<Velocity>()
                    .map(|(entity, _)| entity)
                    .collect();
                (world, victims)
            },
            |(mut world, victims)| {
                for entity in victims {
                    world.despawn(entity);
                }
                black_box(&world);
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("respawn_churn_1k", |b| {
        b.iter_batched(
            || {
                let mut world = World::new();
                populate(&mut world, SMALL);
                world
            },
            |mut world| {
                // Mini-games constantly recycle short-lived entities.
                let victims: Vec<Entity> =
                    world.query::<Position>().map(|(entity, _)| entity).collect();
                for entity in victims {
                    world.despawn(entity);
                }
                populate(&mut world, SMALL);
                black_box(&world);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, spawn_benchmark);
criterion_main!(benches);
