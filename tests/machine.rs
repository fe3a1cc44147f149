use std::time::Duration;

use bevy_ecs::entity::Entity;
use pretty_assertions::assert_eq;
use reelspin::{
    clock::ManualClock,
    config::SpinConfig,
    events::SpinEvent,
    machine::SlotMachine,
    systems::{plan_stop, slot_offset, Blur, Reel, ReelTweens, SpinState, SystemId, SystemTimings},
    tween::{Property, Tween},
};
use speculoos::prelude::*;

mod common;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn test_reference_spin_lands_on_targets() {
    let mut machine = common::create_fixed_machine();
    let mut clock = common::stepping_clock();

    assert_that(&machine.request_spin(clock.now()).expect("spin should run")).is_true();
    assert_that(&machine.is_spinning()).is_true();

    while clock.now() < ms(2090) {
        machine.tick_with(&mut clock);
        assert_that(&machine.is_spinning()).is_true();
    }

    machine.tick_with(&mut clock);
    assert_eq!(clock.now(), ms(2100));
    assert_that(&machine.is_spinning()).is_false();

    let reels = machine.reels();
    assert_eq!(reels.iter().map(|r| r.position).collect::<Vec<_>>(), vec![20.0, 30.0, 40.0]);
    for reel in &reels {
        assert_eq!(reel.blur, Blur::NONE);
    }
    assert_eq!(machine.active_tweens(), 0);
}

#[test]
fn test_reels_stop_in_order() {
    let mut machine = common::create_fixed_machine();
    let mut clock = common::stepping_clock();
    machine.request_spin(clock.now()).expect("spin should run");

    let mut settled_at = Vec::new();
    let mut active = machine.active_tweens();
    while machine.is_spinning() && clock.now() < ms(3000) {
        machine.tick_with(&mut clock);
        if machine.active_tweens() < active {
            active = machine.active_tweens();
            settled_at.push(clock.now());
        }
    }

    assert_eq!(settled_at, vec![ms(1500), ms(1800), ms(2100)]);
}

#[test]
fn test_request_during_spin_is_ignored() {
    let mut machine = common::create_fixed_machine();
    let mut clock = common::stepping_clock();

    machine.request_spin(clock.now()).expect("spin should run");
    clock.advance(ms(500));
    machine.tick_with(&mut clock);
    let before = machine.reels();

    assert_that(&machine.request_spin(clock.now()).expect("spin should run")).is_false();
    assert_eq!(machine.reels(), before);
    assert_eq!(machine.active_tweens(), 3);
}

#[test]
fn test_spin_round_trip_events() {
    let mut machine = common::create_fixed_machine();
    let mut clock = common::stepping_clock();

    machine.request_spin(clock.now()).expect("spin should run");
    let started = machine.drain_events();
    assert_eq!(started.len(), 1);
    assert!(matches!(started[0], SpinEvent::Started { .. }));

    common::run_until_idle(&mut machine, &mut clock, ms(5000));

    let stopped = machine.drain_events();
    let [SpinEvent::Stopped { payline }] = stopped.as_slice() else {
        panic!("expected a single stop event, got {stopped:?}");
    };

    assert_eq!(payline.len(), 3);
    assert_that(&payline.iter().all(Option::is_some)).is_true();
    assert_eq!(*payline, machine.payline());
    assert_that(&machine.drain_events().is_empty()).is_true();
}

#[test]
fn test_undrained_events_expire_after_two_frames() {
    let mut machine = common::create_fixed_machine();
    let mut clock = common::stepping_clock();

    machine.request_spin(clock.now()).expect("spin should run");
    machine.tick_with(&mut clock);
    machine.tick_with(&mut clock);

    assert_that(&machine.drain_events().is_empty()).is_true();
}

#[test]
fn test_spin_is_timed_from_the_request() {
    let mut machine = common::create_fixed_machine();

    machine.tick(ms(0));
    machine.request_spin(ms(5000)).expect("spin should run");
    machine.tick(ms(5016));

    assert_that(&machine.is_spinning()).is_true();
    for reel in machine.reels() {
        let target = 20.0 + reel.index as f32 * 10.0;
        assert_that(&reel.position).is_greater_than(0.0);
        assert_that(&reel.position).is_less_than(target / 10.0);
    }

    machine.tick(ms(5000 + 2090));
    assert_that(&machine.is_spinning()).is_true();
    machine.tick(ms(5000 + 2100));
    assert_that(&machine.is_spinning()).is_false();
}

/// Starts a spin at time zero with a chosen extra per reel instead of random draws.
fn start_spin_with_extras(machine: &mut SlotMachine, extras: [u32; 3]) {
    let config = machine.config().clone();
    let mut reels: Vec<(Entity, usize)> = machine
        .world
        .query::<(Entity, &Reel)>()
        .iter(&machine.world)
        .map(|(entity, reel)| (entity, reel.index))
        .collect();
    reels.sort_by_key(|(_, index)| *index);

    let pending = reels
        .into_iter()
        .map(|(entity, index)| {
            let stop = plan_stop(&config, index, 0.0, extras[index]);
            let tween = Tween::new(entity, Property::Position, 0.0, stop.target, stop.duration).with_easing(config.easing());
            machine.world.resource_mut::<ReelTweens>().0.schedule(Duration::ZERO, tween)
        })
        .collect();

    *machine.world.resource_mut::<SpinState>() = SpinState::Spinning {
        started_at: Duration::ZERO,
        pending,
    };
}

#[test]
fn test_spin_waits_for_the_slowest_reel_not_the_last() {
    let mut machine = common::create_fixed_machine();
    let mut clock = common::stepping_clock();

    // Reel 0 with extra 2 runs 2500ms, past reel 2's 2100ms.
    start_spin_with_extras(&mut machine, [2, 0, 0]);

    while clock.now() < ms(2490) {
        machine.tick_with(&mut clock);
        assert_that(&machine.is_spinning()).is_true();
        if clock.now() >= ms(2100) {
            assert_eq!(machine.active_tweens(), 1);
        }
    }

    machine.tick_with(&mut clock);
    assert_eq!(clock.now(), ms(2500));
    assert_that(&machine.is_spinning()).is_false();
    assert_eq!(machine.active_tweens(), 0);
    assert_eq!(
        machine.reels().iter().map(|r| r.position).collect::<Vec<_>>(),
        vec![22.0, 30.0, 40.0]
    );
}

#[test]
fn test_slot_offsets_follow_position_every_frame() {
    let mut machine = common::create_machine(SpinConfig {
        seed: Some(common::SEED),
        ..SpinConfig::default()
    });
    let mut clock = common::stepping_clock();
    let slot_size = machine.config().slot_size;

    machine.request_spin(clock.now()).expect("spin should run");
    let mut frames = 0;
    while machine.is_spinning() && clock.now() < ms(5000) {
        machine.tick_with(&mut clock);
        frames += 1;

        for reel in machine.reels() {
            let count = reel.slots.len();
            for slot in &reel.slots {
                assert_eq!(
                    slot.offset,
                    slot_offset(reel.position, slot.index, count, slot_size),
                    "reel {} slot {} at {:?}",
                    reel.index,
                    slot.index,
                    clock.now()
                );
            }
        }
    }

    assert_that(&frames).is_greater_than(150);
}

#[test]
fn test_machine_can_spin_again_after_stopping() {
    let mut machine = common::create_fixed_machine();
    let mut clock = common::stepping_clock();

    for _ in 0..3 {
        assert_that(&machine.request_spin(clock.now()).expect("spin should run")).is_true();
        let limit = clock.now() + ms(3000);
        common::run_until_idle(&mut machine, &mut clock, limit);
        assert_that(&machine.is_spinning()).is_false();

        let positions: Vec<f32> = machine.reels().iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![20.0, 30.0, 40.0]);
    }
}

#[test]
fn test_payline_symbol_sits_at_zero_offset_after_stop() {
    let mut machine = common::create_fixed_machine();
    let mut clock = common::stepping_clock();

    machine.request_spin(clock.now()).expect("spin should run");
    common::run_until_idle(&mut machine, &mut clock, ms(5000));

    let slot_size = machine.config().slot_size;
    for reel in machine.reels() {
        let resting = reel.payline_slot(slot_size).expect("a slot should rest on the payline");
        assert_eq!(resting.offset, 0.0);
    }
}

#[test]
fn test_same_seed_same_outcome() {
    let play = || {
        let mut machine = common::create_machine(SpinConfig {
            seed: Some(99),
            ..SpinConfig::default()
        });
        let mut clock = common::stepping_clock();
        machine.request_spin(clock.now()).expect("spin should run");
        common::run_until_idle(&mut machine, &mut clock, ms(5000));
        (machine.payline(), machine.reels())
    };

    assert_eq!(play(), play());
}

#[test]
fn test_idle_frames_do_nothing() {
    let mut machine = common::create_fixed_machine();
    let mut clock = ManualClock::stepping(ms(16));
    let before = machine.reels();

    for _ in 0..30 {
        machine.tick_with(&mut clock);
    }

    assert_eq!(machine.reels(), before);
    assert_that(&machine.drain_events().is_empty()).is_true();
    assert_eq!(machine.frame_time().frame, 30);
}

#[test]
fn test_frames_are_profiled() {
    let mut machine = common::create_fixed_machine();
    let mut clock = common::stepping_clock();
    machine.request_spin(clock.now()).expect("spin should run");

    for _ in 0..5 {
        machine.tick_with(&mut clock);
    }

    let timings = machine.world.resource::<SystemTimings>();
    assert_that(&timings.most_recent(SystemId::Total)).is_greater_than(Duration::ZERO);
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = SlotMachine::new(
        SpinConfig {
            reel_count: 0,
            ..SpinConfig::default()
        },
        reelspin::symbols::SymbolAlphabet::standard(),
    );

    assert_that(&result.is_err()).is_true();
}
