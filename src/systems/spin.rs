//! The spin state machine: staggered spin starts and completion detection.

use std::time::Duration;

use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    system::{In, Query, Res, ResMut},
};
use rand::Rng;
use smallvec::SmallVec;
use tracing::{debug, info, trace};

use crate::config::SpinConfig;
use crate::events::{ReelStop, SpinEvent, TweenCompleted};
use crate::symbols::{SymbolAlphabet, SymbolKind};
use crate::systems::{Blur, FrameTime, Reel, ReelTweens, SpinRng, SpinState};
use crate::tween::{Property, Tween, TweenId};

/// Computes where and when reel `index` stops, starting from `start`.
pub fn plan_stop(config: &SpinConfig, index: usize, start: f32, extra: u32) -> ReelStop {
    ReelStop {
        reel: index,
        extra,
        target: start + config.distance(index, extra),
        duration: config.duration(index, extra),
    }
}

/// Starts a spin at `now` if the reels are at rest.
///
/// Every reel is rewound, given the spin blur and a fresh set of symbols, then handed one tween
/// towards its staggered stop. Tweens measure their progress from `now`, the moment of the
/// request, not from the last frame. Returns `false` without touching anything while a spin is
/// already in progress.
#[allow(clippy::too_many_arguments)]
pub fn start_spin_system(
    In(now): In<Duration>,
    config: Res<SpinConfig>,
    alphabet: Res<SymbolAlphabet>,
    mut state: ResMut<SpinState>,
    mut rng: ResMut<SpinRng>,
    mut tweens: ResMut<ReelTweens>,
    mut reels: Query<(Entity, &mut Reel)>,
    mut events: EventWriter<SpinEvent>,
) -> bool {
    if state.is_spinning() {
        debug!("Spin requested while reels are still spinning, ignoring");
        return false;
    }

    let mut ordered: SmallVec<[_; 4]> = reels.iter_mut().collect();
    if ordered.is_empty() {
        debug!("Spin requested with no reels");
        return false;
    }
    ordered.sort_by_key(|(_, reel)| reel.index);

    let slot_size = config.slot_size;
    let mut pending: SmallVec<[TweenId; 4]> = SmallVec::new();
    let mut stops: SmallVec<[ReelStop; 4]> = SmallVec::new();

    for (entity, mut reel) in ordered {
        reel.rewind(slot_size);
        reel.blur = config.spin_blur();
        for slot in reel.slots.iter_mut() {
            slot.reroll(&alphabet, &mut rng.0, slot_size);
        }

        let extra = rng.0.random_range(0..=config.max_extra);
        let stop = plan_stop(&config, reel.index, reel.position, extra);
        let tween = Tween::new(entity, Property::Position, reel.position, stop.target, stop.duration)
            .with_easing(config.easing());

        pending.push(tweens.0.schedule(now, tween));
        trace!(reel = stop.reel, extra, target = stop.target, duration = ?stop.duration, "Reel stop planned");
        stops.push(stop);
    }

    let longest = stops.iter().map(|stop| stop.duration).max().unwrap_or_default();
    info!(reels = stops.len(), longest = ?longest, "Spin started");

    *state = SpinState::Spinning {
        started_at: now,
        pending,
    };
    events.write(SpinEvent::Started { stops });
    true
}

/// Returns the machine to rest once the last outstanding reel tween has completed.
pub fn spin_complete_system(
    config: Res<SpinConfig>,
    time: Res<FrameTime>,
    alphabet: Res<SymbolAlphabet>,
    mut state: ResMut<SpinState>,
    mut completed: EventReader<TweenCompleted>,
    mut reels: Query<&mut Reel>,
    mut events: EventWriter<SpinEvent>,
) {
    let SpinState::Spinning { started_at, pending } = &mut *state else {
        completed.clear();
        return;
    };

    for done in completed.read() {
        pending.retain(|id| *id != done.id);
    }

    if !pending.is_empty() {
        return;
    }
    let elapsed = time.now.saturating_sub(*started_at);

    let mut resting: SmallVec<[_; 4]> = reels.iter_mut().collect();
    resting.sort_by_key(|reel| reel.index);

    let mut payline: SmallVec<[Option<SymbolKind>; 4]> = SmallVec::new();
    for mut reel in resting {
        reel.blur = Blur::NONE;
        payline.push(
            reel.payline_slot(config.slot_size)
                .and_then(|slot| alphabet.kind(slot.symbol)),
        );
    }

    info!(elapsed = ?elapsed, payline = ?payline, "Reels stopped");
    *state = SpinState::Idle;
    events.write(SpinEvent::Stopped { payline });
}
