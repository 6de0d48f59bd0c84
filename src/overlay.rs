use axum::{
    extract::State as AxumState,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::types::{BracketSnapshot, SharedTournament};

pub fn overlay_router(state: SharedTournament, static_dir: Option<PathBuf>) -> Router {
    let router = Router::new()
        .route("/state.json", get(get_state_json))
        .with_state(state);
    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

pub async fn start_overlay_server(state: SharedTournament, static_dir: Option<PathBuf>, addr: String) {
    let app = overlay_router(state, static_dir);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("overlay server failed to bind {addr}: {e}");
            return;
        }
    };
    info!("overlay server listening at http://{addr}/");
    if let Err(e) = axum::serve(listener, app).await {
        error!("overlay server error: {e}");
    }
}

pub fn snapshot_of(state: &SharedTournament) -> BracketSnapshot {
    let guard = state.lock().unwrap_or_else(|e| e.into_inner());
    guard.snapshot()
}

async fn get_state_json(AxumState(state): AxumState<SharedTournament>) -> impl IntoResponse {
    let payload = snapshot_of(&state);
    let body = serde_json::to_string(&payload).unwrap_or_else(|_| "{}".to_string());
    (
        [
            ("Content-Type", "application/json"),
            ("Cache-Control", "no-store"),
            ("Pragma", "no-cache"),
            ("Expires", "0"),
        ],
        body,
    )
}
