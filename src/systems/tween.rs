use bevy_ecs::{
    event::EventWriter,
    system::{Query, Res, ResMut},
};
use tracing::{trace, warn};

use crate::events::TweenCompleted;
use crate::systems::{FrameTime, Reel, ReelTweens};
use crate::tween::Animatable;

/// Advances every reel tween to the current frame time.
///
/// Each tween writes its interpolated value into its reel. Tweens that finish this frame are
/// dropped from the engine and announced with a [`TweenCompleted`] event.
pub fn tween_system(
    time: Res<FrameTime>,
    mut tweens: ResMut<ReelTweens>,
    mut reels: Query<&mut Reel>,
    mut completed: EventWriter<TweenCompleted>,
) {
    if tweens.0.is_empty() {
        return;
    }

    let finished = tweens.0.advance(time.now, |target, property, value| match reels.get_mut(*target) {
        Ok(mut reel) => reel.set_property(property, value),
        Err(e) => warn!(?target, %property, error = %e, "Tween target no longer exists"),
    });

    for done in finished {
        trace!(id = ?done.id, target = ?done.target, "Tween finished");
        completed.write(TweenCompleted {
            id: done.id,
            target: done.target,
        });
    }
}
