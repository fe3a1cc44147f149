use bevy_ecs::prelude::*;
use smallvec::SmallVec;

use crate::symbols::SymbolKind;
use crate::tween::TweenId;

/// The planned stop of a single reel, decided when a spin starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReelStop {
    pub reel: usize,
    /// Random extra distance drawn for this spin.
    pub extra: u32,
    /// Position the reel comes to rest at.
    pub target: f32,
    pub duration: std::time::Duration,
}

#[derive(Event, Clone, Debug, PartialEq)]
pub enum SpinEvent {
    Started { stops: SmallVec<[ReelStop; 4]> },
    /// Every reel has come to rest. `payline` holds the symbol on the payline row of each reel,
    /// in reel order.
    Stopped { payline: SmallVec<[Option<SymbolKind>; 4]> },
}

/// Written once for every reel tween that reaches its end.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TweenCompleted {
    pub id: TweenId,
    pub target: Entity,
}
