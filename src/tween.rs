//! Time-based interpolation of numeric properties.
//!
//! A [`Tween`] describes one interpolation of one [`Property`] on one target. The
//! [`TweenEngine`] stores active tweens in an arena and advances all of them once per frame,
//! computing each value from the absolute frame time rather than accumulating per-frame steps.
//! Completed tweens are removed on the same frame their completion hook fires.

use std::fmt;
use std::time::Duration;

use smallvec::SmallVec;
use strum_macros::{Display, EnumIter};

use crate::easing::{lerp, Easing};

/// A numeric property that a tween can animate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Property {
    Position,
    BlurX,
    BlurY,
}

/// Anything exposing numeric properties that tweens can read and write.
pub trait Animatable {
    fn property(&self, property: Property) -> f32;
    fn set_property(&mut self, property: Property, value: f32);
}

pub type FrameHook = Box<dyn FnMut(f32) + Send + Sync>;
pub type CompleteHook = Box<dyn FnOnce() + Send + Sync>;

/// Handle to a scheduled tween.
///
/// Handles are generational: once a tween completes its slot may be reused, but the old handle
/// will never refer to the new occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TweenId {
    index: u32,
    generation: u32,
}

pub struct Tween<K> {
    pub target: K,
    pub property: Property,
    pub start_value: f32,
    pub target_value: f32,
    pub start_time: Duration,
    pub duration: Duration,
    pub easing: Easing,
    on_frame: Option<FrameHook>,
    on_complete: Option<CompleteHook>,
}

impl<K> Tween<K> {
    /// Creates a linear tween. The start time is stamped when it is scheduled.
    pub fn new(target: K, property: Property, start_value: f32, target_value: f32, duration: Duration) -> Self {
        Self {
            target,
            property,
            start_value,
            target_value,
            start_time: Duration::ZERO,
            duration,
            easing: Easing::Linear,
            on_frame: None,
            on_complete: None,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Called with the freshly written value on every frame the tween advances.
    pub fn on_frame(mut self, hook: impl FnMut(f32) + Send + Sync + 'static) -> Self {
        self.on_frame = Some(Box::new(hook));
        self
    }

    /// Called once, on the first frame where the tween's duration has fully elapsed.
    pub fn on_complete(mut self, hook: impl FnOnce() + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }

    /// Linear progress in `[0, 1]` at `now`. A zero duration is complete immediately.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }

        let elapsed = now.saturating_sub(self.start_time);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0) as f32
    }

    /// The eased, interpolated property value at `now`.
    pub fn value_at(&self, now: Duration) -> f32 {
        lerp(self.start_value, self.target_value, self.easing.apply(self.progress(now)))
    }
}

impl<K: fmt::Debug> fmt::Debug for Tween<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("target", &self.target)
            .field("property", &self.property)
            .field("start_value", &self.start_value)
            .field("target_value", &self.target_value)
            .field("start_time", &self.start_time)
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("on_frame", &self.on_frame.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Reported by [`TweenEngine::advance`] for every tween that completed on that frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TweenFinished<K> {
    pub id: TweenId,
    pub target: K,
}

struct Slot<K> {
    generation: u32,
    tween: Option<Tween<K>>,
}

/// Owns every active tween and advances them once per frame.
pub struct TweenEngine<K> {
    slots: Vec<Slot<K>>,
    free: Vec<u32>,
}

impl<K> Default for TweenEngine<K> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<K: Clone> TweenEngine<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tween starting at `now` and returns its handle.
    pub fn schedule(&mut self, now: Duration, mut tween: Tween<K>) -> TweenId {
        tween.start_time = now;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.tween = Some(tween);
            return TweenId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            tween: Some(tween),
        });
        TweenId { index, generation: 0 }
    }

    /// Advances every active tween to `now`.
    ///
    /// For each tween, the interpolated value is handed to `apply` along with the tween's target
    /// and property, then the frame hook runs. Tweens whose progress reached 1 run their
    /// completion hook, are removed, and are returned.
    pub fn advance<F>(&mut self, now: Duration, mut apply: F) -> SmallVec<[TweenFinished<K>; 4]>
    where
        F: FnMut(&K, Property, f32),
    {
        let mut finished = SmallVec::new();

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(tween) = slot.tween.as_mut() else {
                continue;
            };

            let progress = tween.progress(now);
            let value = tween.value_at(now);
            apply(&tween.target, tween.property, value);

            if let Some(hook) = tween.on_frame.as_mut() {
                hook(value);
            }

            if progress < 1.0 {
                continue;
            }

            let Some(mut done) = slot.tween.take() else {
                continue;
            };
            if let Some(hook) = done.on_complete.take() {
                hook();
            }

            let id = TweenId {
                index: index as u32,
                generation: slot.generation,
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(index as u32);
            finished.push(TweenFinished { id, target: done.target });
        }

        finished
    }

    /// Advances tweens whose targets are indices into `targets`.
    ///
    /// Tweens pointing past the end of the slice still advance and complete, but write nothing.
    pub fn advance_targets<A>(&mut self, now: Duration, targets: &mut [A]) -> SmallVec<[TweenFinished<K>; 4]>
    where
        A: Animatable,
        K: Into<usize>,
    {
        self.advance(now, |target, property, value| {
            if let Some(object) = targets.get_mut(target.clone().into()) {
                object.set_property(property, value);
            }
        })
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween<K>> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.tween.as_ref())
    }

    pub fn is_active(&self, id: TweenId) -> bool {
        self.get(id).is_some()
    }

    /// The number of active tweens.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
