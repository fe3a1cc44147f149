#![allow(dead_code)]

use std::time::Duration;

use bevy_ecs::{event::Events, world::World};
use rand::{rngs::SmallRng, SeedableRng};
use reelspin::{
    clock::ManualClock,
    config::SpinConfig,
    events::{SpinEvent, TweenCompleted},
    machine::SlotMachine,
    symbols::SymbolAlphabet,
    systems::{FrameTime, Reel, ReelTweens, SpinRng, SpinState, SystemTimings},
};

pub const SEED: u64 = 0x5EED;
pub const FRAME: Duration = Duration::from_millis(10);

/// Reference configuration with the random extra distance disabled, so every spin is identical.
pub fn fixed_config() -> SpinConfig {
    SpinConfig {
        max_extra: 0,
        seed: Some(SEED),
        ..SpinConfig::default()
    }
}

pub fn create_machine(config: SpinConfig) -> SlotMachine {
    SlotMachine::new(config, SymbolAlphabet::standard()).expect("machine should build")
}

pub fn create_fixed_machine() -> SlotMachine {
    create_machine(fixed_config())
}

/// A bare world holding the machine's resources and reels, for running systems one at a time.
pub fn create_test_world(config: SpinConfig) -> World {
    let mut world = World::new();
    let alphabet = SymbolAlphabet::standard();
    let mut rng = SmallRng::seed_from_u64(SEED);

    for index in 0..config.reel_count {
        world.spawn(Reel::new(index, config.slots_per_reel, config.slot_size, &alphabet, &mut rng));
    }

    world.insert_resource(Events::<SpinEvent>::default());
    world.insert_resource(Events::<TweenCompleted>::default());
    world.insert_resource(config);
    world.insert_resource(alphabet);
    world.insert_resource(SpinRng(rng));
    world.insert_resource(SpinState::default());
    world.insert_resource(ReelTweens::default());
    world.insert_resource(FrameTime::default());
    world.insert_resource(SystemTimings::default());

    world
}

/// Ticks the machine on `clock` until it comes to rest or `limit` is reached.
pub fn run_until_idle(machine: &mut SlotMachine, clock: &mut ManualClock, limit: Duration) {
    while machine.is_spinning() && clock.now() < limit {
        machine.tick_with(clock);
    }
}

pub fn stepping_clock() -> ManualClock {
    ManualClock::stepping(FRAME)
}
