// src/protocol.rs
//
// Wire envelope: {"type": "<kind>", "payload": ...}. Inbound payloads decode
// into plain DTOs, which are converted into checked domain values before they
// reach a session.

use serde::{Deserialize, Serialize};

use crate::board::{Orientation, Position};
use crate::errors::{ConstructionError, KomaResult, ProtocolError, TurnError};
use crate::game::TurnSummary;
use crate::snapshot::{GameSnapshot, PlayerListing};
use crate::tile::Tile;
use crate::word::Word;

/// Messages sent by a client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ClientMessage {
    Join { name: String },
    StartGame,
    Turn(Vec<WordProposal>),
    Pass,
}

/// Messages sent to clients
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ServerMessage {
    PlayerList(PlayerListing),
    GameState(GameSnapshot),
    TurnResult(TurnSummary),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TileProposal {
    #[serde(default)]
    pub face: String,
    /// Every glyph the tile may stand for
    pub representable: String,
    pub points: u32,
    #[serde(default)]
    pub chosen: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordProposal {
    pub characters: String,
    pub tiles: Vec<TileProposal>,
    /// (row, column) of the first character
    pub origin: (i64, i64),
    pub orientation: Orientation,
}

impl ClientMessage {
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::serialization_failed)
    }
}

impl TryFrom<TileProposal> for Tile {
    type Error = ConstructionError;

    /// A proposal with a chosen glyph is a wildcard played as that glyph
    fn try_from(proposal: TileProposal) -> Result<Self, Self::Error> {
        let tile = Tile::new(
            proposal.face,
            proposal.representable.chars(),
            proposal.points,
            None,
        )?;
        match proposal.chosen {
            Some(glyph) => tile.resolve(glyph),
            None => Ok(tile),
        }
    }
}

impl WordProposal {
    /// Check the proposal and build the word it claims.
    ///
    /// A negative origin can never fit on the board and is reported as such.
    pub fn into_word(self) -> KomaResult<Word> {
        let (row, col) = self.origin;
        let origin = match (usize::try_from(row), usize::try_from(col)) {
            (Ok(row), Ok(col)) => Position::new(row, col),
            _ => {
                return Err(TurnError::OutOfBounds {
                    word: self.characters,
                    origin: format!("({}, {})", row, col),
                    orientation: self.orientation,
                }
                .into())
            }
        };
        let tiles = self
            .tiles
            .into_iter()
            .map(Tile::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Word::new(self.characters, tiles, origin, self.orientation)?)
    }
}

/// Convert a whole submission, failing on the first malformed word
pub fn parse_turn(proposals: Vec<WordProposal>) -> KomaResult<Vec<Word>> {
    proposals.into_iter().map(WordProposal::into_word).collect()
}
