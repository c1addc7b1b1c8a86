// src/session.rs
use std::collections::HashSet;

use crate::config::GameConfig;
use crate::errors::{KomaResult, SessionError, SessionResult};
use crate::game::{Game, TurnSummary};
use crate::player::Player;
use crate::snapshot::{GameSnapshot, PlayerListing, PlayerSummary};
use crate::word::Word;

#[derive(Debug, Clone)]
enum SessionPhase {
    /// Players gathering before the first deal
    Lobby(Vec<Player>),
    Playing(Game),
}

/// One table: the players who joined and, once started, their game.
///
/// Owned by the transport layer, which must serialize calls per session.
#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    phase: SessionPhase,
    /// Seats currently held by a live connection
    occupied: HashSet<String>,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            phase: SessionPhase::Lobby(Vec::new()),
            occupied: HashSet::new(),
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self.phase, SessionPhase::Playing(_))
    }

    pub fn game(&self) -> Option<&Game> {
        match &self.phase {
            SessionPhase::Playing(game) => Some(game),
            SessionPhase::Lobby(_) => None,
        }
    }

    fn players(&self) -> &[Player] {
        match &self.phase {
            SessionPhase::Lobby(players) => players,
            SessionPhase::Playing(game) => game.players(),
        }
    }

    /// Seat a new player. Mid-game joiners are dealt a full hand at once.
    ///
    /// Joining under the name of a seat nobody holds any more reclaims it,
    /// hand and score included.
    pub fn join(&mut self, name: &str) -> SessionResult<Player> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        if let Some(seated) = self.players().iter().find(|p| p.name == name) {
            if self.occupied.contains(name) {
                return Err(SessionError::DuplicateName {
                    name: name.to_string(),
                });
            }
            let player = seated.clone();
            self.occupied.insert(name.to_string());
            log::info!("{} reclaimed their seat", name);
            return Ok(player);
        }

        let allow_late_join = self.config.allow_late_join;
        let player = match &mut self.phase {
            SessionPhase::Lobby(players) => {
                let player = Player::new(name);
                players.push(player.clone());
                player
            }
            SessionPhase::Playing(_) if !allow_late_join => return Err(SessionError::JoinClosed),
            SessionPhase::Playing(game) => {
                let index = game.add_player(Player::new(name));
                game.players()[index].clone()
            }
        };
        self.occupied.insert(name.to_string());
        log::info!("{} joined ({} seated)", name, self.players().len());
        Ok(player)
    }

    /// Release the seat held by `name` so a later connection can reclaim it
    pub fn leave(&mut self, name: &str) -> bool {
        let released = self.occupied.remove(name);
        if released {
            log::info!("{} left their seat", name);
        }
        released
    }

    /// Deal the standard game to everyone who joined
    pub fn start_game(&mut self) -> KomaResult<&Game> {
        let SessionPhase::Lobby(players) = &self.phase else {
            return Err(SessionError::AlreadyStarted.into());
        };
        let game = Game::standard(players.clone(), &self.config)?;
        self.phase = SessionPhase::Playing(game);
        self.game().ok_or_else(|| SessionError::NoActiveGame.into())
    }

    fn game_for_turn(&mut self, player: &str) -> SessionResult<&mut Game> {
        let SessionPhase::Playing(game) = &mut self.phase else {
            return Err(SessionError::NoActiveGame);
        };
        if game.player(player).is_none() {
            return Err(SessionError::NotJoined);
        }
        let current = &game.current_player().name;
        if current != player {
            return Err(SessionError::NotPlayersTurn {
                current: current.clone(),
                attempted: player.to_string(),
            });
        }
        Ok(game)
    }

    /// Play `words` on behalf of `player`, who must hold the current turn
    pub fn submit_turn(&mut self, player: &str, words: &[Word]) -> KomaResult<TurnSummary> {
        let game = self.game_for_turn(player)?;
        Ok(game.play_turn(words)?)
    }

    pub fn pass(&mut self, player: &str) -> KomaResult<TurnSummary> {
        let game = self.game_for_turn(player)?;
        Ok(game.pass_turn())
    }

    pub fn snapshot(&self) -> Option<GameSnapshot> {
        self.game().map(Game::snapshot)
    }

    pub fn player_listing(&self) -> PlayerListing {
        PlayerListing {
            players: self
                .players()
                .iter()
                .map(|p| PlayerSummary {
                    name: p.name.clone(),
                    score: p.score,
                })
                .collect(),
        }
    }
}
