//! The boundary between the reel machine and whatever draws it.

use glam::Vec2;

use crate::symbols::{SymbolAlphabet, SymbolId, SymbolKind};
use crate::systems::{Blur, Reel};

/// Where and how a single symbol should be drawn this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymbolPlacement {
    pub reel: usize,
    pub slot: usize,
    pub symbol: SymbolId,
    pub kind: Option<SymbolKind>,
    /// Top-left corner of the symbol, relative to the reel window.
    pub origin: Vec2,
    pub scale: f32,
}

/// Implemented by the rendering layer to receive reel state each frame.
pub trait ReelSurface {
    fn place_symbol(&mut self, placement: &SymbolPlacement);
    fn apply_blur(&mut self, reel: usize, blur: Blur);
}

/// Pushes one reel's current state onto the surface.
///
/// Reel `i` is laid out `i` slots from the left edge of the window.
pub fn present_reel<S: ReelSurface + ?Sized>(surface: &mut S, reel: &Reel, alphabet: &SymbolAlphabet, slot_size: f32) {
    let left = reel.index as f32 * slot_size;

    for slot in &reel.slots {
        surface.place_symbol(&SymbolPlacement {
            reel: reel.index,
            slot: slot.index,
            symbol: slot.symbol,
            kind: alphabet.kind(slot.symbol),
            origin: Vec2::new(left + slot.sprite.x, slot.offset),
            scale: slot.sprite.scale,
        });
    }

    surface.apply_blur(reel.index, reel.blur);
}
