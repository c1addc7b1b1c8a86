// src/player.rs
use serde::Serialize;

use crate::tile::Tile;

/// A seat at the table: identity, the tiles in hand and the running score.
///
/// Hands are only changed by the turn engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub name: String,
    pub(crate) hand: Vec<Tile>,
    pub score: u32,
}

impl Player {
    /// A freshly joined player with an empty hand
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hand: Vec::new(),
            score: 0,
        }
    }

    /// A player holding `hand`, as used when seating a game from a saved layout
    pub fn with_hand(name: impl Into<String>, hand: Vec<Tile>) -> Self {
        Self {
            hand,
            ..Self::new(name)
        }
    }

    pub fn hand(&self) -> &[Tile] {
        &self.hand
    }

    /// Remove the tiles at the given hand slots; out-of-range slots are skipped
    pub(crate) fn remove_slots(&mut self, slots: &[usize]) -> usize {
        let mut slots = slots.to_vec();
        slots.sort_unstable_by(|a, b| b.cmp(a));
        slots.dedup();
        let mut removed = 0;
        for slot in slots {
            if slot < self.hand.len() {
                self.hand.remove(slot);
                removed += 1;
            } else {
                log::warn!("{} has no tile in hand slot {}", self.name, slot);
            }
        }
        removed
    }
}
