use bevy_ecs::system::{Query, Res, ResMut};
use tracing::trace;

use crate::config::SpinConfig;
use crate::symbols::SymbolAlphabet;
use crate::systems::{slot_offset, Reel, SpinRng};

/// Derives each reel's vertical blur from how far it moved since the previous frame.
///
/// Runs every frame, spinning or not, so a stationary reel settles at zero blur.
pub fn blur_system(config: Res<SpinConfig>, mut reels: Query<&mut Reel>) {
    for mut reel in reels.iter_mut() {
        reel.update_blur(config.frame_blur_gain);
    }
}

/// Places every slot on its reel's belt and recycles slots that wrapped past the top.
///
/// A slot that jumps from below the visible band to above it has scrolled off the bottom and
/// back around, so it receives a fresh symbol before it comes into view again.
pub fn recycle_system(
    config: Res<SpinConfig>,
    alphabet: Res<SymbolAlphabet>,
    mut rng: ResMut<SpinRng>,
    mut reels: Query<&mut Reel>,
) {
    let slot_size = config.slot_size;

    for mut reel in reels.iter_mut() {
        let reel = &mut *reel;
        let (index, position, count) = (reel.index, reel.position, reel.slots.len());

        for slot in reel.slots.iter_mut() {
            let previous = slot.offset;
            slot.offset = slot_offset(position, slot.index, count, slot_size);

            if slot.offset < 0.0 && previous > slot_size {
                slot.reroll(&alphabet, &mut rng.0, slot_size);
                trace!(reel = index, slot = slot.index, symbol = ?alphabet.kind(slot.symbol), "Recycled slot");
            }
        }
    }
}
