//! The symbol alphabet drawn onto the reels.

use bevy_ecs::resource::Resource;
use rand::Rng;
use smallvec::SmallVec;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumCount, EnumIter, IntoStaticStr};

use crate::constants::SYMBOL_SIZE;
use crate::error::{ReelError, ReelResult};

/// The kinds of symbol the stock artwork provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, IntoStaticStr, EnumIter, EnumCount)]
#[strum(serialize_all = "lowercase")]
pub enum SymbolKind {
    Cherry,
    Banana,
    Melon,
}

impl SymbolKind {
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// A resolved, renderable symbol handle supplied by the rendering layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymbolTexture {
    pub kind: SymbolKind,
    /// Width of the source artwork, in pixels.
    pub width: f32,
}

impl SymbolTexture {
    pub fn new(kind: SymbolKind, width: f32) -> Self {
        Self { kind, width }
    }
}

/// Index of a symbol within a [`SymbolAlphabet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SymbolId(pub usize);

/// How a symbol's artwork is scaled and centered inside its slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymbolSprite {
    pub scale: f32,
    /// Horizontal offset within the slot, in whole pixels.
    pub x: f32,
}

/// A finite, non-empty set of symbols that reels draw from uniformly.
#[derive(Resource, Debug, Clone)]
pub struct SymbolAlphabet {
    textures: SmallVec<[SymbolTexture; 4]>,
}

impl SymbolAlphabet {
    /// Creates an alphabet from pre-resolved textures.
    ///
    /// # Errors
    ///
    /// Returns [`ReelError::EmptyAlphabet`] when no textures are given, and
    /// [`ReelError::InvalidTexture`] for a texture whose width is not a positive number.
    pub fn new(textures: impl IntoIterator<Item = SymbolTexture>) -> ReelResult<Self> {
        let textures: SmallVec<[SymbolTexture; 4]> = textures.into_iter().collect();
        if textures.is_empty() {
            return Err(ReelError::EmptyAlphabet);
        }

        if let Some(bad) = textures.iter().find(|t| !(t.width.is_finite() && t.width > 0.0)) {
            return Err(ReelError::InvalidTexture {
                kind: bad.kind.to_string(),
                width: bad.width,
            });
        }

        Ok(Self { textures })
    }

    /// Every [`SymbolKind`], with artwork exactly one slot wide.
    pub fn standard() -> Self {
        Self {
            textures: SymbolKind::iter().map(|kind| SymbolTexture::new(kind, SYMBOL_SIZE)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Always false; an alphabet cannot be constructed empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn get(&self, id: SymbolId) -> Option<&SymbolTexture> {
        self.textures.get(id.0)
    }

    pub fn kind(&self, id: SymbolId) -> Option<SymbolKind> {
        self.get(id).map(|texture| texture.kind)
    }

    /// Draws a symbol uniformly at random.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> SymbolId {
        SymbolId(rng.random_range(0..self.textures.len()))
    }

    /// Scales the symbol's artwork to the slot width and centers it horizontally.
    pub fn fit(&self, id: SymbolId, slot_size: f32) -> SymbolSprite {
        let width = self.get(id).map_or(slot_size, |texture| texture.width);
        let scale = slot_size / width;
        SymbolSprite {
            scale,
            x: ((slot_size - width * scale) / 2.0).round(),
        }
    }
}
