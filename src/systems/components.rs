use std::time::Duration;

use bevy_ecs::{component::Component, entity::Entity, resource::Resource};
use rand::rngs::SmallRng;
use smallvec::SmallVec;

use crate::symbols::{SymbolAlphabet, SymbolId, SymbolSprite};
use crate::tween::{Animatable, Property, TweenEngine, TweenId};

/// Blur intensity applied to a reel by the rendering layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Blur {
    pub x: f32,
    pub y: f32,
}

impl Blur {
    pub const NONE: Blur = Blur { x: 0.0, y: 0.0 };

    pub fn is_none(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// One visible cell of a reel, recycled as the reel scrolls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymbolSlot {
    pub index: usize,
    pub symbol: SymbolId,
    /// Vertical placement within the reel; always derived from the reel's position.
    pub offset: f32,
    pub sprite: SymbolSprite,
}

impl SymbolSlot {
    /// Replaces the slot's symbol with a fresh draw from the alphabet.
    pub fn reroll<R: rand::Rng>(&mut self, alphabet: &SymbolAlphabet, rng: &mut R, slot_size: f32) {
        self.symbol = alphabet.draw(rng);
        self.sprite = alphabet.fit(self.symbol, slot_size);
    }
}

/// A vertically scrolling column of symbols.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Reel {
    /// Ordinal of the reel, left to right. Later reels spin longer and further.
    pub index: usize,
    /// Accumulated scroll distance, in slots. Only ever written by a tween.
    pub position: f32,
    /// `position` as of the previous frame.
    pub previous_position: f32,
    pub blur: Blur,
    pub slots: SmallVec<[SymbolSlot; 4]>,
}

impl Reel {
    /// Creates a resting reel with `slot_count` freshly drawn symbols.
    pub fn new<R: rand::Rng>(
        index: usize,
        slot_count: usize,
        slot_size: f32,
        alphabet: &SymbolAlphabet,
        rng: &mut R,
    ) -> Self {
        let slots = (0..slot_count)
            .map(|j| {
                let symbol = alphabet.draw(rng);
                SymbolSlot {
                    index: j,
                    symbol,
                    offset: slot_offset(0.0, j, slot_count, slot_size),
                    sprite: alphabet.fit(symbol, slot_size),
                }
            })
            .collect();

        Self {
            index,
            position: 0.0,
            previous_position: 0.0,
            blur: Blur::NONE,
            slots,
        }
    }

    /// Rewinds the reel to the start of its belt and places every slot accordingly.
    pub fn rewind(&mut self, slot_size: f32) {
        self.position = 0.0;
        self.previous_position = 0.0;
        self.place_slots(slot_size);
    }

    /// Recomputes every slot's offset from the current position.
    pub fn place_slots(&mut self, slot_size: f32) {
        let (position, count) = (self.position, self.slots.len());
        for slot in self.slots.iter_mut() {
            slot.offset = slot_offset(position, slot.index, count, slot_size);
        }
    }

    /// Sets the vertical blur from the distance moved since the previous frame.
    pub fn update_blur(&mut self, gain: f32) {
        self.blur.y = ((self.position - self.previous_position) * gain).max(0.0);
        self.previous_position = self.position;
    }

    /// The slot currently resting on the payline row, i.e. at offset zero.
    pub fn payline_slot(&self, slot_size: f32) -> Option<&SymbolSlot> {
        self.slots.iter().find(|slot| slot.offset.abs() < slot_size / 2.0)
    }
}

impl Animatable for Reel {
    fn property(&self, property: Property) -> f32 {
        match property {
            Property::Position => self.position,
            Property::BlurX => self.blur.x,
            Property::BlurY => self.blur.y,
        }
    }

    fn set_property(&mut self, property: Property, value: f32) {
        match property {
            Property::Position => self.position = value,
            Property::BlurX => self.blur.x = value,
            Property::BlurY => self.blur.y = value,
        }
    }
}

/// Offset of slot `index` on a belt of `count` slots scrolled to `position`.
///
/// Slots run from one slot above the visible band down to the bottom of the belt.
pub fn slot_offset(position: f32, index: usize, count: usize, slot_size: f32) -> f32 {
    (position + index as f32).rem_euclid(count as f32) * slot_size - slot_size
}

/// Time of the frame currently being processed.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Time since the machine started.
    pub now: Duration,
    /// Time since the previous frame.
    pub delta: Duration,
    /// Number of frames processed so far.
    pub frame: u64,
}

/// Whether the reels are at rest or spinning.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub enum SpinState {
    #[default]
    Idle,
    Spinning {
        started_at: Duration,
        /// Reel tweens that have not yet completed.
        pending: SmallVec<[TweenId; 4]>,
    },
}

impl SpinState {
    pub fn is_spinning(&self) -> bool {
        matches!(self, SpinState::Spinning { .. })
    }
}

/// The machine's source of randomness, for symbol draws and stop staggering.
#[derive(Resource, Debug, Clone)]
pub struct SpinRng(pub SmallRng);

/// Tweens animating reel entities.
#[derive(Resource, Default)]
pub struct ReelTweens(pub TweenEngine<Entity>);
