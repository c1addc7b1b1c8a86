// src/game.rs
//
// Turn engine: validates a submission against the board as it stood when the
// turn began, then commits it in one sweep.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::bag::TileBag;
use crate::board::{Board, BoardCell, Position};
use crate::config::GameConfig;
use crate::errors::{ConstructionError, ConstructionResult, TurnError, TurnResult};
use crate::player::Player;
use crate::snapshot::{BonusCellView, GameSnapshot, PlayerView};
use crate::tile::Tile;
use crate::word::Word;

/// Tiles tentatively laid by the words validated so far in one submission.
///
/// Records, per newly claimed cell, the tile and the hand slot it was drawn
/// from, so words crossing inside the same turn share one physical tile.
#[derive(Debug, Clone, Default)]
pub struct PendingPlacements {
    cells: BTreeMap<Position, (Tile, usize)>,
}

impl PendingPlacements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains_key(&pos)
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    /// Hand slots consumed so far
    pub fn hand_slots(&self) -> Vec<usize> {
        self.cells.values().map(|(_, slot)| *slot).collect()
    }

    fn slot_taken(&self, slot: usize) -> bool {
        self.cells.values().any(|(_, taken)| *taken == slot)
    }
}

/// Outcome of a committed turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnSummary {
    pub player: String,
    pub points: u32,
    pub tiles_placed: usize,
    pub tiles_drawn: usize,
}

#[derive(Debug, Clone)]
pub struct Game {
    players: Vec<Player>,
    board: Board,
    words: Vec<Word>,
    bag: TileBag,
    current_turn: usize,
    hand_capacity: usize,
}

impl Game {
    /// Seat `players` at `board` with `bag` as the reserve. Hands are not filled.
    pub fn new(
        players: Vec<Player>,
        board: Board,
        bag: TileBag,
        hand_capacity: usize,
    ) -> ConstructionResult<Self> {
        if players.is_empty() {
            return Err(ConstructionError::NoPlayers);
        }
        if hand_capacity == 0 {
            return Err(ConstructionError::ZeroHandCapacity);
        }
        if let Some(player) = players.iter().find(|p| p.hand.len() > hand_capacity) {
            return Err(ConstructionError::HandOverCapacity {
                name: player.name.clone(),
                held: player.hand.len(),
                capacity: hand_capacity,
            });
        }

        Ok(Self {
            players,
            board,
            words: Vec::new(),
            bag,
            current_turn: 0,
            hand_capacity,
        })
    }

    /// Standard board and inventory, every hand dealt in seating order
    pub fn standard(players: Vec<Player>, config: &GameConfig) -> ConstructionResult<Self> {
        let mut game = Self::new(
            players,
            Board::standard(),
            TileBag::standard(config.seed),
            config.hand_capacity,
        )?;
        for index in 0..game.players.len() {
            game.draw_tiles(index);
        }
        log::info!(
            "Game started with {} players, {} tiles left in the bag",
            game.players.len(),
            game.bag.len()
        );
        Ok(game)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_turn]
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn hand_capacity(&self) -> usize {
        self.hand_capacity
    }

    pub fn tiles_in_bag(&self) -> usize {
        self.bag.len()
    }

    /// Seat a player mid-game and deal them a full hand. Returns their seat index.
    pub fn add_player(&mut self, player: Player) -> usize {
        self.players.push(player);
        let index = self.players.len() - 1;
        self.draw_tiles(index);
        index
    }

    /// Top the hand of player `index` up to capacity from the bag.
    ///
    /// An exhausted bag leaves the hand short; that is not an error.
    pub fn draw_tiles(&mut self, index: usize) -> usize {
        let Some(player) = self.players.get_mut(index) else {
            return 0;
        };
        let need = self.hand_capacity.saturating_sub(player.hand.len());
        let drawn = self.bag.draw(need);
        let count = drawn.len();
        player.hand.extend(drawn);
        log::debug!(
            "{} drew {} of {} needed tiles, {} left in the bag",
            player.name,
            count,
            need,
            self.bag.len()
        );
        count
    }

    /// Check one proposed word against `board` and the acting player's `hand`.
    ///
    /// Every unclaimed cell must be covered by a tile from the hand not already
    /// spent by an earlier word of the submission (or by the same tile that word
    /// laid there); every claimed cell must already hold an equal tile.
    pub fn validate_word(
        hand: &[Tile],
        word: &Word,
        board: &Board,
        pending: &mut PendingPlacements,
    ) -> TurnResult<()> {
        let footprint = board
            .footprint(word.origin(), word.orientation(), word.len())
            .ok_or_else(|| TurnError::OutOfBounds {
                word: word.to_string(),
                origin: word.origin().to_string(),
                orientation: word.orientation(),
            })?;

        for (pos, tile) in footprint.into_iter().zip(word.tiles()) {
            if !board.is_unclaimed(pos) {
                if board.get(pos) != Some(tile) {
                    return Err(TurnError::SlotMismatch {
                        tile: tile.to_string(),
                        position: pos,
                    });
                }
                continue;
            }

            if let Some((laid, _)) = pending.cells.get(&pos) {
                if laid != tile {
                    return Err(TurnError::SlotMismatch {
                        tile: tile.to_string(),
                        position: pos,
                    });
                }
                continue;
            }

            let slot = hand
                .iter()
                .enumerate()
                .position(|(slot, held)| !pending.slot_taken(slot) && tile.playable_from(held))
                .ok_or_else(|| TurnError::MissingHandTile {
                    tile: tile.to_string(),
                })?;
            pending.cells.insert(pos, (tile.clone(), slot));
        }
        Ok(())
    }

    /// Score `word` against the pre-turn board.
    ///
    /// Every tile counts its points. A cell newly claimed this turn applies its
    /// live bonus to the first word of the submission covering it; `applied`
    /// collects those cells so later crossing words score them plainly.
    fn score_word(
        &self,
        word: &Word,
        pending: &PendingPlacements,
        applied: &mut HashSet<Position>,
    ) -> u32 {
        let mut letter_score = 0;
        let mut word_multiplier = 1;
        let cells = (0..word.len())
            .filter_map(|offset| word.orientation().step(word.origin(), offset, self.board.size()));
        for (pos, tile) in cells.zip(word.tiles()) {
            let bonus = if pending.contains(pos) && applied.insert(pos) {
                self.board.bonus_at(pos)
            } else {
                BoardCell::None
            };
            letter_score += tile.points() * bonus.letter_multiplier();
            word_multiplier *= bonus.word_multiplier();
        }
        letter_score * word_multiplier
    }

    /// Validate and commit a turn for the current player.
    ///
    /// Nothing is mutated unless every word passes. On success the words are
    /// scored, their tiles laid, bonuses under new tiles consumed, spent tiles
    /// removed from the hand, the hand refilled and the turn advanced. An empty
    /// submission is a pass.
    pub fn play_turn(&mut self, words: &[Word]) -> TurnResult<TurnSummary> {
        let mut pending = PendingPlacements::new();
        {
            let hand = &self.players[self.current_turn].hand;
            for word in words {
                if let Err(err) = Self::validate_word(hand, word, &self.board, &mut pending) {
                    log::warn!(
                        "Rejected turn from {}: {}",
                        self.players[self.current_turn].name,
                        err
                    );
                    return Err(err);
                }
            }
        }

        let mut applied = HashSet::new();
        let points: u32 = words
            .iter()
            .map(|w| self.score_word(w, &pending, &mut applied))
            .sum();
        let tiles_placed = pending.len();
        let slots = pending.hand_slots();

        for (pos, (tile, _)) in pending.cells {
            if let Some(bonus) = self.board.consume_bonus(pos) {
                log::debug!("Consumed {:?} at {}", bonus, pos);
            }
            self.board.place(pos, tile);
        }
        self.words.extend(words.iter().cloned());

        let index = self.current_turn;
        let player = &mut self.players[index];
        player.score += points;
        player.remove_slots(&slots);
        let name = player.name.clone();

        let tiles_drawn = self.draw_tiles(index);
        self.current_turn = (self.current_turn + 1) % self.players.len();

        log::info!(
            "{} played {} word(s) for {} points; next up {}",
            name,
            words.len(),
            points,
            self.players[self.current_turn].name
        );

        Ok(TurnSummary {
            player: name,
            points,
            tiles_placed,
            tiles_drawn,
        })
    }

    /// Forfeit the move: refill and rotate without placing anything
    pub fn pass_turn(&mut self) -> TurnSummary {
        let index = self.current_turn;
        let tiles_drawn = self.draw_tiles(index);
        self.current_turn = (index + 1) % self.players.len();
        log::info!("{} passed", self.players[index].name);
        TurnSummary {
            player: self.players[index].name.clone(),
            points: 0,
            tiles_placed: 0,
            tiles_drawn,
        }
    }

    /// Public projection of the game; the bag's contents are left out
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    name: p.name.clone(),
                    hand: p.hand.clone(),
                    score: p.score,
                })
                .collect(),
            board: self.board.rows(),
            bonus_cells: self
                .board
                .bonus_cells()
                .into_iter()
                .map(|(position, cell)| BonusCellView { position, cell })
                .collect(),
            words: self.words.clone(),
            current_turn: self.current_turn,
            hand_capacity: self.hand_capacity,
            tiles_in_bag: self.bag.len(),
        }
    }
}
