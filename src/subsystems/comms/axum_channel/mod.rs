//! Axum-based HTTP channel — the backend the browser UI talks to.
//!
//! `run()` drives the axum event loop; the [`CancellationToken`] is wired to
//! axum's graceful shutdown.
//!
//! ## URL layout
//!
//! ```text
//! POST /omnIA/chat   {"message": "..."} → {"answer": "..."}
//! GET  /omnIA/nova   persona document
//! GET  /ping         liveness, literal "pong"
//! ```
//!
//! CORS is permissive: the UI is served from its own dev server origin.

mod api;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::AppError;
use crate::subsystems::agents::chat::ChatService;

pub use api::{ChatRequest, MISSING_MESSAGE};

// ── Shared request state ──────────────────────────────────────────────────────

/// Axum router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone — all fields are reference-counted.
#[derive(Clone)]
pub struct AxumState {
    /// Channel identifier used in log spans.
    pub channel_id: Arc<str>,
    pub chat: Arc<ChatService>,
}

impl AxumState {
    pub fn new(channel_id: &str, chat: Arc<ChatService>) -> Self {
        Self { channel_id: Arc::from(channel_id), chat }
    }
}

// ── AxumChannel ───────────────────────────────────────────────────────────────

pub struct AxumChannel {
    channel_id: String,
    bind_addr: String,
    chat: Arc<ChatService>,
}

impl AxumChannel {
    pub fn new(
        channel_id: impl Into<String>,
        bind_addr: impl Into<String>,
        chat: Arc<ChatService>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            bind_addr: bind_addr.into(),
            chat,
        }
    }

    /// Bind and serve until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), AppError> {
        let router = build_router(AxumState::new(&self.channel_id, self.chat));
        let channel_id = self.channel_id;
        let bind_addr = self.bind_addr;

        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| AppError::Comms(format!("axum bind failed on {bind_addr}: {e}")))?;

        info!(%channel_id, %bind_addr, "axum channel listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(|e| AppError::Comms(format!("axum server error: {e}")))?;

        info!(%channel_id, "axum channel shut down");
        Ok(())
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

pub fn build_router(state: AxumState) -> Router {
    Router::new()
        .route("/omnIA/chat", post(api::chat))
        .route("/omnIA/nova", get(api::nova))
        .route("/ping",       get(api::ping))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
