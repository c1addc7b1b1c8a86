// src/config.rs
use std::net::SocketAddr;

use clap::Parser;

/// Tiles a full hand holds
pub const DEFAULT_HAND_CAPACITY: usize = 7;

/// Rules fixed for the lifetime of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub hand_capacity: usize,
    /// Seed for every bag shuffle; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Whether players may join after the game has started
    pub allow_late_join: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hand_capacity: DEFAULT_HAND_CAPACITY,
            seed: None,
            allow_late_join: true,
        }
    }
}

impl GameConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// Command line for the game server
#[derive(Debug, Parser)]
#[command(name = "komaban", version, about = "Kana tile-placement game server")]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Fix the bag shuffle for reproducible games
    #[arg(long)]
    pub seed: Option<u64>,

    /// Tiles per full hand
    #[arg(long, default_value_t = DEFAULT_HAND_CAPACITY)]
    pub hand_capacity: usize,

    /// Refuse joins once a game has started
    #[arg(long)]
    pub no_late_join: bool,
}

impl ServerArgs {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            hand_capacity: self.hand_capacity,
            seed: self.seed,
            allow_late_join: !self.no_late_join,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = ServerArgs::parse_from(["komaban"]);
        assert_eq!(args.bind, "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(args.game_config(), GameConfig::default());
    }

    #[test]
    fn test_flags() {
        let args = ServerArgs::parse_from([
            "komaban",
            "--seed",
            "9",
            "--hand-capacity",
            "5",
            "--no-late-join",
        ]);
        let config = args.game_config();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.hand_capacity, 5);
        assert!(!config.allow_late_join);
    }
}
