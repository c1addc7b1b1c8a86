use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::{
    extract::{Path, State, WebSocketUpgrade},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use komaban::application::SessionService;
use komaban::config::ServerArgs;
use komaban::protocol::ServerMessage;
use komaban::websocket_service::WebSocketService;
use komaban::VERSION;

// Application state
struct AppState {
    websocket: WebSocketService,
}

type SharedState = Arc<AppState>;

#[derive(Debug, Serialize)]
struct CreatedSession {
    session_id: String,
}

// API Routes

async fn hello_world() -> &'static str {
    "Hello from the Komaban backend!"
}

// Open a new session
async fn create_session(State(state): State<SharedState>) -> Json<CreatedSession> {
    let session_id = state.websocket.sessions().create_session().await;
    Json(CreatedSession { session_id })
}

// Ids of the open sessions
async fn list_sessions(State(state): State<SharedState>) -> Json<Vec<String>> {
    Json(state.websocket.sessions().list_sessions().await)
}

// Current view of a session
async fn get_session(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<ServerMessage>, StatusCode> {
    state
        .websocket
        .sessions()
        .current_view(&session_id)
        .await
        .map(Json)
        .map_err(|_| StatusCode::NOT_FOUND)
}

// WebSocket handler for session updates
async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(session_id): Path<String>,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        state.websocket.handle_connection(socket, session_id).await
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = ServerArgs::parse();
    let sessions = SessionService::new(args.game_config());
    let state = Arc::new(AppState {
        websocket: WebSocketService::new(sessions),
    });

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    let app = Router::new()
        .route("/", get(hello_world))
        .route("/sessions", get(list_sessions).post(create_session))
        .route("/sessions/{session_id}", get(get_session))
        .route("/ws/{session_id}", get(ws_handler))
        .with_state(state)
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    log::info!("Starting Komaban backend {} on {}", VERSION, args.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
