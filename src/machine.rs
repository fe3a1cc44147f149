//! The slot machine: reels, tweens and spin state bundled into one ECS world.

use std::time::{Duration, Instant};

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule};
use bevy_ecs::system::RunSystemOnce;
use bevy_ecs::world::World;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::clock::FrameClock;
use crate::config::SpinConfig;
use crate::error::{ReelError, ReelResult};
use crate::events::{SpinEvent, TweenCompleted};
use crate::formatter;
use crate::platform;
use crate::symbols::{SymbolAlphabet, SymbolKind};
use crate::systems::{
    self, blur_system, present_reel, profile, recycle_system, spin_complete_system, tween_system, FrameTime, Reel,
    ReelSurface, ReelTweens, SpinRng, SpinState, SystemId, SystemTimings,
};

/// A set of reels that spin on request and come to rest on a staggered schedule.
///
/// All machine state lives in `world`; `schedule` advances it by one frame per [`tick`]. Frames
/// run in a fixed order: tweens move the reels, blur follows the movement, slots are placed and
/// recycled, and finally the spin is checked for completion.
///
/// [`tick`]: SlotMachine::tick
pub struct SlotMachine {
    pub world: World,
    pub schedule: Schedule,
}

impl SlotMachine {
    /// Builds a machine whose randomness comes from the configured seed, or the OS when unset.
    ///
    /// # Errors
    ///
    /// Returns `ReelError::Config` when the configuration is invalid.
    pub fn new(config: SpinConfig, alphabet: SymbolAlphabet) -> ReelResult<Self> {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut platform::rng()),
        };
        Self::with_rng(config, alphabet, rng)
    }

    /// Builds a machine drawing all of its randomness from `rng`.
    pub fn with_rng(config: SpinConfig, alphabet: SymbolAlphabet, mut rng: SmallRng) -> ReelResult<Self> {
        config.validate()?;
        info!(
            reels = config.reel_count,
            slots = config.slots_per_reel,
            symbols = alphabet.len(),
            longest_spin = ?config.longest_spin(),
            "Building slot machine"
        );

        let mut world = World::default();
        let mut schedule = Schedule::default();

        debug!("Registering events");
        Self::setup_ecs(&mut world);

        debug!("Spawning reels");
        for index in 0..config.reel_count {
            world.spawn(Reel::new(index, config.slots_per_reel, config.slot_size, &alphabet, &mut rng));
        }

        debug!("Inserting resources");
        world.insert_resource(config);
        world.insert_resource(alphabet);
        world.insert_resource(SpinRng(rng));
        world.insert_resource(SpinState::default());
        world.insert_resource(ReelTweens::default());
        world.insert_resource(FrameTime::default());
        world.insert_resource(SystemTimings::default());

        Self::configure_schedule(&mut schedule);

        Ok(SlotMachine { world, schedule })
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<SpinEvent>(world);
        EventRegistry::register_event::<TweenCompleted>(world);
    }

    fn configure_schedule(schedule: &mut Schedule) {
        let tween_system = profile(SystemId::Tween, tween_system);
        let blur_system = profile(SystemId::Blur, blur_system);
        let recycle_system = profile(SystemId::Recycle, recycle_system);
        let spin_complete_system = profile(SystemId::SpinComplete, spin_complete_system);

        schedule.add_systems((tween_system, blur_system, recycle_system, spin_complete_system).chain());
    }

    /// Requests a spin starting at `now`, on the same timeline as [`tick`](SlotMachine::tick).
    ///
    /// Returns whether it started; requests made mid-spin are ignored.
    pub fn request_spin(&mut self, now: Duration) -> ReelResult<bool> {
        self.world
            .run_system_once_with(systems::start_spin_system, now)
            .map_err(|e| ReelError::System(e.to_string()))
    }

    pub fn is_spinning(&self) -> bool {
        self.world.resource::<SpinState>().is_spinning()
    }

    /// Runs one frame at `now`, the time since the machine's clock started.
    pub fn tick(&mut self, now: Duration) {
        {
            let mut time = self.world.resource_mut::<FrameTime>();
            let delta = now.saturating_sub(time.now);
            *time = FrameTime {
                now,
                delta,
                frame: time.frame + 1,
            };
        }
        formatter::increment_tick();

        let start = Instant::now();
        self.schedule.run(&mut self.world);
        let total = start.elapsed();

        self.world.resource_mut::<Events<TweenCompleted>>().update();
        self.world.resource_mut::<Events<SpinEvent>>().update();

        let timings = self.world.resource::<SystemTimings>();
        timings.add_timing(SystemId::Total, total);

        let delta = self.world.resource::<FrameTime>().delta;
        if !delta.is_zero() && total > delta {
            let slowest = timings
                .slowest_systems()
                .iter()
                .map(|(id, duration)| format!("{id} ({duration:.2?})"))
                .collect::<Vec<_>>()
                .join(", ");
            warn!(total = ?total, budget = ?delta, systems = %slowest, "Frame took longer than its budget");
        }
    }

    /// Samples `clock` and runs one frame at that time.
    pub fn tick_with<C: FrameClock + ?Sized>(&mut self, clock: &mut C) {
        let now = clock.elapsed();
        self.tick(now);
    }

    /// Takes the spin events still buffered.
    ///
    /// Events are kept for two frames; call this once per frame to see every one of them.
    pub fn drain_events(&mut self) -> Vec<SpinEvent> {
        self.world.resource_mut::<Events<SpinEvent>>().drain().collect()
    }

    /// Every reel, in index order.
    pub fn reels(&mut self) -> Vec<Reel> {
        let mut reels: Vec<Reel> = self.world.query::<&Reel>().iter(&self.world).cloned().collect();
        reels.sort_by_key(|reel| reel.index);
        reels
    }

    /// The symbol resting on the payline of each reel, in reel order.
    pub fn payline(&mut self) -> SmallVec<[Option<SymbolKind>; 4]> {
        let slot_size = self.world.resource::<SpinConfig>().slot_size;
        let reels = self.reels();
        let alphabet = self.world.resource::<SymbolAlphabet>();

        reels
            .iter()
            .map(|reel| reel.payline_slot(slot_size).and_then(|slot| alphabet.kind(slot.symbol)))
            .collect()
    }

    /// Hands the current state of every reel to the rendering layer.
    pub fn present<S: ReelSurface + ?Sized>(&mut self, surface: &mut S) {
        let slot_size = self.world.resource::<SpinConfig>().slot_size;
        let reels = self.reels();
        let alphabet = self.world.resource::<SymbolAlphabet>();

        for reel in &reels {
            present_reel(surface, reel, alphabet, slot_size);
        }
    }

    pub fn config(&self) -> &SpinConfig {
        self.world.resource::<SpinConfig>()
    }

    pub fn frame_time(&self) -> FrameTime {
        *self.world.resource::<FrameTime>()
    }

    /// The number of reel tweens still in flight.
    pub fn active_tweens(&self) -> usize {
        self.world.resource::<ReelTweens>().0.len()
    }
}
