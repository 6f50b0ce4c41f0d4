//! Rhythm judging — deterministic replay on a manual clock.
//!
//! A beat chart and a scripted set of player taps are judged against each
//! other twice, with the clock advanced in the same irregular chunks both
//! times. Because simulation runs in fixed ticks, both plays land on exactly
//! the same perfect/good/miss totals, which is what makes score replays and
//! headless chart validation possible.

use sepal::prelude::*;

/// Ticks within which a tap still counts.
const GOOD_WINDOW: u64 = 4;
/// Ticks within which a tap is flawless.
const PERFECT_WINDOW: u64 = 1;

/// A beat the player is supposed to hit.
struct Note {
    at_tick: u64,
}

/// The song position, advanced once per tick.
struct Conductor {
    tick: u64,
}

/// Pre-scripted player input, sorted by tick.
struct TapScript {
    taps: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Judgments {
    perfect: u32,
    good: u32,
    miss: u32,
}

fn main() {
    env_logger::init();

    let first = play();
    let second = play();
    assert_eq!(first, second, "fixed-tick replays must be identical");

    println!(
        "judged {} perfect / {} good / {} miss — replay identical",
        first.perfect, first.good, first.miss
    );
}

/// Play the whole chart through and return the final judgments.
fn play() -> Judgments {
    let mut world = World::new();

    // Beats every half second at 60 ticks per second.
    for at_tick in (60..=360).step_by(30) {
        let note = world.spawn();
        world.insert(note, Note { at_tick });
    }

    let player = world.spawn();
    world.insert(player, Conductor { tick: 0 });
    world.insert(
        player,
        TapScript {
            // Two beats (210 and 300) are never tapped.
            taps: vec![60, 92, 120, 153, 181, 243, 270, 329, 362],
        },
    );
    world.insert(player, Judgments::default());

    let clock = ManualClock::new();
    let mut game_loop =
        GameLoop::with_clock(world, vec![advance_conductor, judge], clock.clone());
    game_loop.start();

    // An intentionally ugly frame cadence: fast frames, hitches, stalls.
    let cadence = [0.016, 0.007, 0.045, 0.002, 0.031, 0.012];
    for i in 0..400 {
        clock.advance(cadence[i % cadence.len()]);
        game_loop.frame();
    }

    let judgments = *game_loop
        .world()
        .query::<Judgments>()
        .next()
        .expect("player judgments")
        .1;
    game_loop.stop();
    judgments
}

fn advance_conductor(world: &mut World, _dt: f32) {
    for (_, conductor) in world.query_mut::<Conductor>() {
        conductor.tick += 1;
    }
}

fn judge(world: &mut World, _dt: f32) {
    let Some(now) = world.query::<Conductor>().next().map(|(_, c)| c.tick) else {
        return;
    };

    // Consume a tap scheduled for this exact tick.
    let mut tapped = false;
    for (_, script) in world.query_mut::<TapScript>() {
        if script.taps.first() == Some(&now) {
            script.taps.remove(0);
            tapped = true;
        }
    }

    if tapped {
        // The nearest note inside the window takes the hit.
        let hit = world
            .query::<Note>()
            .map(|(entity, note)| (entity, note.at_tick.abs_diff(now)))
            .filter(|&(_, distance)| distance <= GOOD_WINDOW)
            .min_by_key(|&(_, distance)| distance);

        if let Some((entity, distance)) = hit {
            world.despawn(entity);
            for (_, judgments) in world.query_mut::<Judgments>() {
                if distance <= PERFECT_WINDOW {
                    judgments.perfect += 1;
                } else {
                    judgments.good += 1;
                }
            }
            log::debug!("tick {now}: hit at distance {distance}");
        }
    }

    // Notes the window has passed are misses.
    let overdue: Vec<Entity> = world
        .query::<Note>()
        .filter(|(_, note)| note.at_tick + GOOD_WINDOW < now)
        .map(|(entity, _)| entity)
        .collect();
    for entity in overdue {
        world.despawn(entity);
        for (_, judgments) in world.query_mut::<Judgments>() {
            judgments.miss += 1;
        }
        log::debug!("tick {now}: miss");
    }
}
