// src/tile.rs
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::errors::{ConstructionError, ConstructionResult};

/// Glyph carried by the empty-cell sentinel
pub const BLANK_MARKER: char = ' ';

/// Face shown on a wildcard before it is played
pub const WILDCARD_FACE: &str = "";

/// A physical tile.
///
/// Equality and hashing only look at `representable`, `points` and `chosen`.
/// The `face` is a display label: a wildcard's displayed glyph is picked at
/// play time and must not make two instances of the same tile differ.
#[derive(Debug, Clone, Serialize)]
pub struct Tile {
    face: String,
    representable: BTreeSet<char>,
    points: u32,
    chosen: Option<char>,
}

impl Tile {
    /// Build a tile, checking that `chosen` (if any) is one of the representable glyphs.
    pub fn new(
        face: impl Into<String>,
        representable: impl IntoIterator<Item = char>,
        points: u32,
        chosen: Option<char>,
    ) -> ConstructionResult<Self> {
        let face = face.into();
        let representable: BTreeSet<char> = representable.into_iter().collect();
        if representable.is_empty() {
            return Err(ConstructionError::EmptyRepresentable { face });
        }
        if let Some(chosen) = chosen {
            if !representable.contains(&chosen) {
                return Err(ConstructionError::ChosenNotRepresentable { face, chosen });
            }
        }
        Ok(Self {
            face,
            representable,
            points,
            chosen,
        })
    }

    /// A normal tile showing `face` that can stand for any glyph of `variants`.
    ///
    /// The first character of `face` is always representable.
    pub(crate) fn plain(face: &str, variants: &str, points: u32) -> Self {
        let representable = face.chars().take(1).chain(variants.chars()).collect();
        Self {
            face: face.to_string(),
            representable,
            points,
            chosen: None,
        }
    }

    /// An unplaced wildcard able to represent every glyph of `alphabet`
    pub(crate) fn wildcard(alphabet: &BTreeSet<char>) -> Self {
        Self {
            face: WILDCARD_FACE.to_string(),
            representable: alphabet.clone(),
            points: 0,
            chosen: None,
        }
    }

    /// The sentinel every board cell holds until a tile is committed on it
    pub fn empty() -> Self {
        Self {
            face: BLANK_MARKER.to_string(),
            representable: BTreeSet::from([BLANK_MARKER]),
            points: 0,
            chosen: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_none()
            && self.points == 0
            && self.representable.len() == 1
            && self.representable.contains(&BLANK_MARKER)
    }

    pub fn face(&self) -> &str {
        &self.face
    }

    pub fn representable(&self) -> &BTreeSet<char> {
        &self.representable
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn chosen(&self) -> Option<char> {
        self.chosen
    }

    pub fn can_represent(&self, glyph: char) -> bool {
        self.representable.contains(&glyph)
    }

    /// Fix the glyph this tile stands for, as done when a wildcard is played.
    ///
    /// The face follows the chosen glyph.
    pub fn resolve(&self, glyph: char) -> ConstructionResult<Self> {
        Self::new(
            glyph.to_string(),
            self.representable.iter().copied(),
            self.points,
            Some(glyph),
        )
    }

    /// The tile as it sat in the hand before any glyph was chosen
    pub fn unresolved(&self) -> Self {
        Self {
            chosen: None,
            ..self.clone()
        }
    }

    /// Whether `held` (a tile in a hand) can be spent to place `self`.
    ///
    /// Either the two are equal or `self` is `held` with a glyph chosen.
    pub fn playable_from(&self, held: &Tile) -> bool {
        self == held || (held.chosen.is_none() && self.unresolved() == *held)
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
            && self.chosen == other.chosen
            && self.representable == other.representable
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.representable.hash(state);
        self.points.hash(state);
        self.chosen.hash(state);
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.chosen, self.face.as_str()) {
            (Some(glyph), _) => write!(f, "{}*({})", glyph, self.points),
            (None, WILDCARD_FACE) => write!(f, "*({})", self.points),
            (None, face) => write!(f, "{}({})", face, self.points),
        }
    }
}
