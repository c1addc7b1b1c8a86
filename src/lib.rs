// Komaban Server Library - Core Module Organization
//
// Turn validation and scoring for a kana word-placement game, plus the
// session registry and WebSocket transport that host it.

// Core game data structures
pub mod bag;
pub mod board;
pub mod player;
pub mod tile;
pub mod word;

// Turn engine and its projections
pub mod game;
pub mod snapshot;

// Sessions and configuration
pub mod config;
pub mod errors;
pub mod session;

// Server implementation
pub mod application;
pub mod protocol;
pub mod websocket_service;

// Re-export common types for convenient access
pub use crate::bag::TileBag;
pub use crate::board::{Board, BoardCell, Orientation, Position};
pub use crate::config::{GameConfig, ServerArgs};
pub use crate::errors::{KomaError, KomaResult, SessionId};
pub use crate::game::{Game, PendingPlacements, TurnSummary};
pub use crate::player::Player;
pub use crate::session::Session;
pub use crate::snapshot::GameSnapshot;
pub use crate::tile::Tile;
pub use crate::word::Word;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
