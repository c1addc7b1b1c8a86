use thiserror::Error;

use crate::board::{Orientation, Position};

/// Identifier for a game session, assigned by the transport layer
pub type SessionId = String;

/// Top-level error type for the whole server
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KomaError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Malformed game configuration or value objects.
///
/// Raised by constructors only; a value that failed construction never exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("expected a nonzero number of players")]
    NoPlayers,

    #[error("board is not square: row {row} has {len} cells, expected {size}")]
    BoardNotSquare { row: usize, len: usize, size: usize },

    #[error("bonus cell {position} lies outside a board of size {size}")]
    BonusOutOfBounds { position: Position, size: usize },

    #[error("tile '{face}' has an empty set of representable characters")]
    EmptyRepresentable { face: String },

    #[error("tile '{face}' cannot represent its chosen character '{chosen}'")]
    ChosenNotRepresentable { face: String, chosen: char },

    #[error("word '{word}' is too short: {len} characters")]
    WordTooShort { word: String, len: usize },

    #[error("word '{word}' has {characters} characters but {tiles} tiles")]
    WordLengthMismatch { word: String, characters: usize, tiles: usize },

    #[error("invalid character '{character}' at index {index} of word '{word}'")]
    CharacterNotRepresentable { word: String, character: char, index: usize },

    #[error("character '{character}' at index {index} of word '{word}' disagrees with the wildcard's chosen '{chosen}'")]
    ChosenMismatch { word: String, character: char, chosen: char, index: usize },

    #[error("player {name} holds {held} tiles, above the hand capacity of {capacity}")]
    HandOverCapacity { name: String, held: usize, capacity: usize },

    #[error("hand capacity must be at least one tile")]
    ZeroHandCapacity,
}

/// A proposed turn that breaks the placement rules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    #[error("word '{word}' starting at {origin} ({orientation}) does not fit on the board")]
    OutOfBounds { word: String, origin: String, orientation: Orientation },

    #[error("player does not have the tile to play {tile}")]
    MissingHandTile { tile: String },

    #[error("tile {tile} not played on a corresponding slot at {position}")]
    SlotMismatch { tile: String, position: Position },
}

/// Session lifecycle violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no game is in progress")]
    NoActiveGame,

    #[error("the game has already started")]
    AlreadyStarted,

    #[error("joining is closed once the game has started")]
    JoinClosed,

    #[error("a player named {name} already joined")]
    DuplicateName { name: String },

    #[error("player name must not be empty")]
    EmptyName,

    #[error("not {attempted}'s turn: waiting on {current}")]
    NotPlayersTurn { current: String, attempted: String },

    #[error("join the session before playing")]
    NotJoined,

    #[error("session not found: {session_id}")]
    SessionNotFound { session_id: SessionId },
}

/// Inbound messages that cannot be decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("message deserialization failed: {details}")]
    DeserializationFailed { details: String },

    #[error("message serialization failed: {details}")]
    SerializationFailed { details: String },
}

/// Result type aliases for convenience
pub type KomaResult<T> = Result<T, KomaError>;
pub type ConstructionResult<T> = Result<T, ConstructionError>;
pub type TurnResult<T> = Result<T, TurnError>;
pub type SessionResult<T> = Result<T, SessionError>;

impl ProtocolError {
    pub fn deserialization_failed(details: impl ToString) -> Self {
        Self::DeserializationFailed {
            details: details.to_string(),
        }
    }

    pub fn serialization_failed(details: impl ToString) -> Self {
        Self::SerializationFailed {
            details: details.to_string(),
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::deserialization_failed(err)
    }
}
