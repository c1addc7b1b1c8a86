// src/word.rs
use std::fmt;

use serde::Serialize;

use crate::board::{Orientation, Position};
use crate::errors::{ConstructionError, ConstructionResult};
use crate::tile::Tile;

/// Shortest word that may be claimed
pub const MIN_WORD_LEN: usize = 2;

/// A claim that `tiles`, read along `orientation` from `origin`, spell `characters`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Word {
    characters: Vec<char>,
    tiles: Vec<Tile>,
    origin: Position,
    orientation: Orientation,
}

impl Word {
    pub fn new(
        characters: impl Into<String>,
        tiles: Vec<Tile>,
        origin: Position,
        orientation: Orientation,
    ) -> ConstructionResult<Self> {
        let word: String = characters.into();
        let characters: Vec<char> = word.chars().collect();

        if characters.len() != tiles.len() {
            return Err(ConstructionError::WordLengthMismatch {
                word,
                characters: characters.len(),
                tiles: tiles.len(),
            });
        }
        if characters.len() < MIN_WORD_LEN {
            return Err(ConstructionError::WordTooShort {
                len: characters.len(),
                word,
            });
        }
        for (index, (&character, tile)) in characters.iter().zip(&tiles).enumerate() {
            if !tile.can_represent(character) {
                return Err(ConstructionError::CharacterNotRepresentable {
                    word,
                    character,
                    index,
                });
            }
            if let Some(chosen) = tile.chosen().filter(|&c| c != character) {
                return Err(ConstructionError::ChosenMismatch {
                    word,
                    character,
                    chosen,
                    index,
                });
            }
        }

        Ok(Self {
            characters,
            tiles,
            origin,
            orientation,
        })
    }

    pub fn characters(&self) -> &[char] {
        &self.characters
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.characters.iter().try_for_each(|c| write!(f, "{}", c))
    }
}
