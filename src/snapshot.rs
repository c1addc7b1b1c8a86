// src/snapshot.rs
//
// Read-only projections handed to the transport layer. The bag's contents are
// hidden information and never appear here.

use serde::Serialize;

use crate::board::{BoardCell, Position};
use crate::tile::Tile;
use crate::word::Word;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub name: String,
    pub hand: Vec<Tile>,
    pub score: u32,
}

/// A bonus that has not been consumed yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BonusCellView {
    pub position: Position,
    pub cell: BoardCell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub players: Vec<PlayerView>,
    pub board: Vec<Vec<Tile>>,
    pub bonus_cells: Vec<BonusCellView>,
    pub words: Vec<Word>,
    pub current_turn: usize,
    pub hand_capacity: usize,
    pub tiles_in_bag: usize,
}

impl GameSnapshot {
    pub fn bonus_at(&self, position: Position) -> Option<BoardCell> {
        self.bonus_cells
            .iter()
            .find(|b| b.position == position)
            .map(|b| b.cell)
    }
}

/// Seat list shown before the game starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerListing {
    pub players: Vec<PlayerSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub name: String,
    pub score: u32,
}
