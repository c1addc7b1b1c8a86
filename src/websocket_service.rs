use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, Mutex};

use crate::application::{Outcome, SessionService};
use crate::errors::{ProtocolError, SessionId};
use crate::protocol::{ClientMessage, ServerMessage};

/// WebSocket service that handles real-time communication
/// This is purely an infrastructure concern - no game rules here
#[derive(Clone)]
pub struct WebSocketService {
    sessions: SessionService,
    broadcaster: broadcast::Sender<(SessionId, ServerMessage)>,
}

impl WebSocketService {
    pub fn new(sessions: SessionService) -> Self {
        let (broadcaster, _) = broadcast::channel(1000);

        Self {
            sessions,
            broadcaster,
        }
    }

    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    /// Serve one client connected to `session_id` until either side hangs up
    pub async fn handle_connection(&self, socket: WebSocket, session_id: SessionId) {
        // Split socket for concurrent read/write
        let (mut sender, mut receiver) = socket.split();

        // Only sessions opened through the service can be joined
        if let Err(e) = self.sessions.attach(&session_id).await {
            log::warn!("Refused connection: {}", e);
            let _ = Self::send_message(&mut sender, &ServerMessage::Error(e.to_string())).await;
            return;
        }
        log::info!("WebSocket connected to session {}", session_id);

        // Send the current view before any updates
        match self.sessions.current_view(&session_id).await {
            Ok(view) => {
                if let Err(e) = Self::send_message(&mut sender, &view).await {
                    log::error!("Failed to send initial view: {}", e);
                    self.sessions.detach(&session_id, None).await;
                    return;
                }
            }
            Err(e) => {
                let _ = Self::send_message(&mut sender, &ServerMessage::Error(e.to_string())).await;
                self.sessions.detach(&session_id, None).await;
                return;
            }
        }

        // Subscribe to session updates; replies go to this connection only
        let mut updates = self.broadcaster.subscribe();
        let (reply_tx, mut replies) = mpsc::unbounded_channel::<ServerMessage>();

        let session_for_updates = session_id.clone();
        let mut update_task = tokio::spawn(async move {
            loop {
                let message = tokio::select! {
                    update = updates.recv() => match update {
                        Ok((id, message)) if id == session_for_updates => message,
                        Ok(_) => continue,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            log::warn!("Connection lagged, skipped {} updates", skipped);
                            continue;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    reply = replies.recv() => match reply {
                        Some(message) => message,
                        None => break,
                    },
                };
                if Self::send_message(&mut sender, &message).await.is_err() {
                    break; // Client disconnected
                }
            }
        });

        let sessions = self.sessions.clone();
        let broadcaster = self.broadcaster.clone();
        let session_for_messages = session_id.clone();
        // Seat taken by this connection; outlives the tasks so it can be released
        let seat: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let seat_for_messages = seat.clone();
        let mut message_task = tokio::spawn(async move {
            while let Some(Ok(message)) = receiver.next().await {
                match message {
                    Message::Text(text) => {
                        let mut player = seat_for_messages.lock().await;
                        Self::handle_text_message(
                            &sessions,
                            &broadcaster,
                            &reply_tx,
                            &session_for_messages,
                            &mut player,
                            text.as_str(),
                        )
                        .await;
                    }
                    Message::Close(_) => {
                        log::info!("WebSocket closed by client in session {}", session_for_messages);
                        break;
                    }
                    _ => {
                        // Ignore other message types
                    }
                }
            }
        });

        // Wait for either task to complete (client disconnect or error)
        tokio::select! {
            _ = &mut update_task => {
                message_task.abort();
            }
            _ = &mut message_task => {
                update_task.abort();
            }
        }

        let player = seat.lock().await.take();
        if self.sessions.detach(&session_id, player.as_deref()).await {
            log::info!("Last connection left, session {} closed", session_id);
        }
        log::info!("WebSocket connection terminated for session {}", session_id);
    }

    /// Decode and apply one text frame.
    ///
    /// Successful changes are broadcast to the whole session; errors only go
    /// back to the sender.
    async fn handle_text_message(
        sessions: &SessionService,
        broadcaster: &broadcast::Sender<(SessionId, ServerMessage)>,
        reply_tx: &mpsc::UnboundedSender<ServerMessage>,
        session_id: &str,
        player: &mut Option<String>,
        text: &str,
    ) {
        let outcome = match ClientMessage::from_json(text) {
            Ok(message) => sessions.handle_message(session_id, player, message).await,
            Err(e) => Err(e.into()),
        };

        match outcome {
            Ok(Outcome::Broadcast(messages)) => {
                for message in messages {
                    let _ = broadcaster.send((session_id.to_string(), message));
                }
            }
            Ok(Outcome::Reply(message)) => {
                let _ = reply_tx.send(message);
            }
            Err(e) => {
                log::warn!("Dropping message for session {}: {}", session_id, e);
                let _ = reply_tx.send(ServerMessage::Error(e.to_string()));
            }
        }
    }

    /// Send a message to a WebSocket sender
    async fn send_message(
        sender: &mut SplitSink<WebSocket, Message>,
        message: &ServerMessage,
    ) -> Result<(), axum::Error> {
        let json = message
            .to_json()
            .map_err(|e: ProtocolError| axum::Error::new(e))?;

        sender.send(Message::Text(json.into())).await
    }
}
