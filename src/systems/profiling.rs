use std::fmt::Display;
use std::time::{Duration, Instant};

use bevy_ecs::system::{IntoSystem, System};
use bevy_ecs::{resource::Resource, world::World};
use circular_buffer::CircularBuffer;
use parking_lot::Mutex;
use smallvec::SmallVec;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};
use thousands::Separable;

/// The number of systems that can be profiled.
const MAX_SYSTEMS: usize = SystemId::COUNT;
/// The number of durations kept per system.
const TIMING_WINDOW_SIZE: usize = 60;

/// A single system taking longer than this on one frame is reported as a likely culprit.
const SLOW_SYSTEM_THRESHOLD: Duration = Duration::from_millis(2);

#[derive(EnumCount, EnumIter, IntoStaticStr, Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum SystemId {
    Total,
    Tween,
    Blur,
    Recycle,
    SpinComplete,
}

impl Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Into::<&'static str>::into(self).to_ascii_lowercase())
    }
}

/// Recent frame durations of every profiled system.
#[derive(Resource, Debug)]
pub struct SystemTimings {
    timings: micromap::Map<SystemId, Mutex<CircularBuffer<TIMING_WINDOW_SIZE, Duration>>, MAX_SYSTEMS>,
}

impl Default for SystemTimings {
    fn default() -> Self {
        let mut timings = micromap::Map::new();

        for id in SystemId::iter() {
            timings.insert(id, Mutex::new(CircularBuffer::new()));
        }

        Self { timings }
    }
}

impl SystemTimings {
    pub fn add_timing(&self, id: SystemId, duration: Duration) {
        if let Some(buffer) = self.timings.get(&id) {
            buffer.lock().push_back(duration);
        }
    }

    /// Mean and standard deviation of the recorded window for `id`.
    pub fn stats(&self, id: SystemId) -> (Duration, Duration) {
        let Some(buffer) = self.timings.get(&id) else {
            return (Duration::ZERO, Duration::ZERO);
        };
        let buffer = buffer.lock();
        if buffer.is_empty() {
            return (Duration::ZERO, Duration::ZERO);
        }

        let count = buffer.len() as f64;
        let mean = buffer.iter().map(Duration::as_secs_f64).sum::<f64>() / count;
        let variance = buffer.iter().map(|d| (d.as_secs_f64() - mean).powi(2)).sum::<f64>() / count;

        (Duration::from_secs_f64(mean), Duration::from_secs_f64(variance.sqrt()))
    }

    pub fn most_recent(&self, id: SystemId) -> Duration {
        self.timings
            .get(&id)
            .and_then(|buffer| buffer.lock().back().copied())
            .unwrap_or(Duration::ZERO)
    }

    /// Systems whose most recent run exceeded the slow threshold, slowest first.
    pub fn slowest_systems(&self) -> SmallVec<[(SystemId, Duration); MAX_SYSTEMS]> {
        let mut slow: SmallVec<[(SystemId, Duration); MAX_SYSTEMS]> = SystemId::iter()
            .filter(|id| *id != SystemId::Total)
            .map(|id| (id, self.most_recent(id)))
            .filter(|(_, duration)| *duration > SLOW_SYSTEM_THRESHOLD)
            .collect();
        slow.sort_by(|a, b| b.1.cmp(&a.1));
        slow
    }

    /// One-line summary of the frame rate and per-system averages, for periodic logging.
    pub fn summary(&self, frames: u64) -> String {
        let (total, _) = self.stats(SystemId::Total);
        let mut parts = vec![format!("{} frames", frames.separate_with_commas())];

        for id in SystemId::iter() {
            let (mean, std_dev) = self.stats(id);
            parts.push(format!("{id} {mean:.1?} ±{std_dev:.1?}"));
        }

        if !total.is_zero() {
            parts.push(format!("{:.0} frames/s of budget", 1.0 / total.as_secs_f64()));
        }

        parts.join(", ")
    }
}

/// Wraps a system so every run is timed into [`SystemTimings`] under `id`.
pub fn profile<S, M>(id: SystemId, system: S) -> impl FnMut(&mut World)
where
    S: IntoSystem<(), (), M> + 'static,
{
    let mut system: S::System = IntoSystem::into_system(system);
    let mut is_initialized = false;
    move |world: &mut World| {
        if !is_initialized {
            system.initialize(world);
            is_initialized = true;
        }

        let start = Instant::now();
        system.run((), world);
        let duration = start.elapsed();

        if let Some(timings) = world.get_resource::<SystemTimings>() {
            timings.add_timing(id, duration);
        }
    }
}
