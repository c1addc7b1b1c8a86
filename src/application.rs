use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::errors::{KomaResult, SessionError, SessionId, SessionResult};
use crate::protocol::{parse_turn, ClientMessage, ServerMessage};
use crate::session::Session;

/// Registry of live sessions, keyed by session id.
///
/// Each session sits behind its own mutex, so at most one join, start or turn
/// runs against a given game at a time while other sessions proceed. A session
/// is closed when its last connection detaches.
#[derive(Clone)]
pub struct SessionService {
    config: GameConfig,
    sessions: Arc<RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>>,
    /// Open connections per session
    connections: Arc<Mutex<HashMap<SessionId, usize>>>,
}

/// What a handled client message produced
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Broadcast to every connection of the session
    Broadcast(Vec<ServerMessage>),
    /// Send to the requesting connection only
    Reply(ServerMessage),
}

impl SessionService {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            connections: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Open a new session and return its id
    pub async fn create_session(&self) -> SessionId {
        let session_id = Uuid::new_v4().to_string();
        let session = Arc::new(Mutex::new(Session::new(self.config.clone())));
        self.sessions
            .write()
            .await
            .insert(session_id.clone(), session);
        log::info!("Opened session {}", session_id);
        session_id
    }

    pub async fn session(&self, session_id: &str) -> SessionResult<Arc<Mutex<Session>>> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::SessionNotFound {
                session_id: session_id.to_string(),
            })
    }

    /// Register a connection to an existing session
    pub async fn attach(&self, session_id: &str) -> SessionResult<()> {
        let mut connections = self.connections.lock().await;
        self.session(session_id).await?;
        *connections.entry(session_id.to_string()).or_insert(0) += 1;
        Ok(())
    }

    /// Drop a connection and release the seat it held.
    ///
    /// Returns whether this was the session's last connection, in which case
    /// the session is closed.
    pub async fn detach(&self, session_id: &str, player: Option<&str>) -> bool {
        let mut connections = self.connections.lock().await;
        if let (Some(name), Ok(session)) = (player, self.session(session_id).await) {
            session.lock().await.leave(name);
        }

        let Some(count) = connections.get_mut(session_id) else {
            return false;
        };
        *count = count.saturating_sub(1);
        if *count > 0 {
            return false;
        }
        connections.remove(session_id);
        self.remove_session(session_id).await
    }

    /// Current projection of a session: the game state once started, else the seat list
    pub async fn current_view(&self, session_id: &str) -> KomaResult<ServerMessage> {
        let session = self.session(session_id).await?;
        let session = session.lock().await;
        Ok(Self::view_of(&session))
    }

    fn view_of(session: &Session) -> ServerMessage {
        match session.snapshot() {
            Some(snapshot) => ServerMessage::GameState(snapshot),
            None => ServerMessage::PlayerList(session.player_listing()),
        }
    }

    /// Apply one client message for the connection known as `player`.
    ///
    /// `player` is updated when a join succeeds. Rule violations become a
    /// private error reply; successes are broadcast.
    pub async fn handle_message(
        &self,
        session_id: &str,
        player: &mut Option<String>,
        message: ClientMessage,
    ) -> KomaResult<Outcome> {
        let session = self.session(session_id).await?;
        let mut session = session.lock().await;

        let result: KomaResult<Vec<ServerMessage>> = match message {
            ClientMessage::Join { name } if player.is_some() => {
                log::debug!(
                    "{} tried to join again as {}",
                    player.as_deref().unwrap_or_default(),
                    name
                );
                Err(SessionError::DuplicateName { name }.into())
            }
            ClientMessage::Join { name } => session
                .join(&name)
                .map(|joined| {
                    *player = Some(joined.name);
                    vec![ServerMessage::PlayerList(session.player_listing())]
                })
                .map_err(Into::into),
            ClientMessage::StartGame => session.start_game().map(|_| Vec::new()),
            ClientMessage::Turn(proposals) => match player.as_deref() {
                None => Err(SessionError::NotJoined.into()),
                Some(name) => parse_turn(proposals)
                    .and_then(|words| session.submit_turn(name, &words))
                    .map(|summary| vec![ServerMessage::TurnResult(summary)]),
            },
            ClientMessage::Pass => match player.as_deref() {
                None => Err(SessionError::NotJoined.into()),
                Some(name) => session
                    .pass(name)
                    .map(|summary| vec![ServerMessage::TurnResult(summary)]),
            },
        };

        Ok(match result {
            Ok(mut messages) => {
                if session.is_started() {
                    messages.push(Self::view_of(&session));
                }
                Outcome::Broadcast(messages)
            }
            Err(err) => {
                log::warn!("Session {}: {}", session_id, err);
                Outcome::Reply(ServerMessage::Error(err.to_string()))
            }
        })
    }

    async fn remove_session(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            log::info!("Closed session {}", session_id);
        }
        removed
    }

    pub async fn list_sessions(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().cloned().collect()
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::KomaError;

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let service = SessionService::new(GameConfig::seeded(5));
        let a = service.create_session().await;
        let b = service.create_session().await;
        assert_ne!(a, b);

        let mut hana = None;
        service
            .handle_message(&a, &mut hana, ClientMessage::Join { name: "hana".into() })
            .await
            .unwrap();
        service
            .handle_message(&a, &mut hana, ClientMessage::StartGame)
            .await
            .unwrap();

        assert!(matches!(service.current_view(&a).await, Ok(ServerMessage::GameState(_))));
        assert!(matches!(service.current_view(&b).await, Ok(ServerMessage::PlayerList(_))));
        assert_eq!(service.list_sessions().await.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let service = SessionService::default();
        let err = service
            .handle_message("missing", &mut None, ClientMessage::Pass)
            .await
            .unwrap_err();
        assert!(matches!(err, KomaError::Session(SessionError::SessionNotFound { .. })));
        assert!(service.attach("missing").await.is_err());
        assert!(!service.detach("missing", None).await);
    }

    #[tokio::test]
    async fn test_last_connection_closes_session() {
        let service = SessionService::new(GameConfig::seeded(2));
        let id = service.create_session().await;
        service.attach(&id).await.unwrap();
        service.attach(&id).await.unwrap();

        let mut first = None;
        service
            .handle_message(&id, &mut first, ClientMessage::Join { name: "hana".into() })
            .await
            .unwrap();
        assert!(!service.detach(&id, first.as_deref()).await);

        // the dropped seat is free for the next connection under the same name
        let mut second = None;
        let outcome = service
            .handle_message(&id, &mut second, ClientMessage::Join { name: "hana".into() })
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Broadcast(_)));
        assert_eq!(second.as_deref(), Some("hana"));

        assert!(service.detach(&id, second.as_deref()).await);
        assert!(service.list_sessions().await.is_empty());
        assert!(service.current_view(&id).await.is_err());
    }

    #[tokio::test]
    async fn test_handle_message_flow() {
        let service = SessionService::new(GameConfig::seeded(5));
        let id = service.create_session().await;
        let mut hana = None;
        let mut taro = None;

        let outcome = service
            .handle_message(&id, &mut hana, ClientMessage::Join { name: "hana".into() })
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Broadcast(ref m) if matches!(m[0], ServerMessage::PlayerList(_))));
        assert_eq!(hana.as_deref(), Some("hana"));

        service
            .handle_message(&id, &mut taro, ClientMessage::Join { name: "taro".into() })
            .await
            .unwrap();

        // turns before joining or out of order only reach the sender
        let mut stranger = None;
        let outcome = service
            .handle_message(&id, &mut stranger, ClientMessage::Pass)
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Reply(ServerMessage::Error(_))));

        let outcome = service
            .handle_message(&id, &mut hana, ClientMessage::StartGame)
            .await
            .unwrap();
        let Outcome::Broadcast(messages) = outcome else {
            panic!("start should broadcast");
        };
        assert!(matches!(messages.last(), Some(ServerMessage::GameState(s)) if s.current_turn == 0));

        let outcome = service
            .handle_message(&id, &mut taro, ClientMessage::Pass)
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Reply(ServerMessage::Error(_))));

        let outcome = service
            .handle_message(&id, &mut hana, ClientMessage::Pass)
            .await
            .unwrap();
        let Outcome::Broadcast(messages) = outcome else {
            panic!("pass should broadcast");
        };
        assert!(matches!(&messages[0], ServerMessage::TurnResult(t) if t.player == "hana"));
        assert!(matches!(&messages[1], ServerMessage::GameState(s) if s.current_turn == 1));
    }
}
