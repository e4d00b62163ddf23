//! Axum handlers for the OmnIA routes.
//!
//! Each handler receives [`AxumState`] via [`axum::extract::State`] and
//! returns an axum [`Response`].

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use super::AxumState;

/// Error text for a request without a usable `message`.
pub const MISSING_MESSAGE: &str = "Nenhuma entrada fornecida.";

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn json_error(status: StatusCode, msg: impl std::fmt::Display) -> Response {
    (status, Json(json!({ "error": msg.to_string() }))).into_response()
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// GET /ping
pub(super) async fn ping() -> &'static str {
    "pong"
}

/// GET /omnIA/nova — the persona document as loaded.
pub(super) async fn nova(State(state): State<AxumState>) -> Response {
    Json(state.chat.persona().document().clone()).into_response()
}

/// POST /omnIA/chat
///
/// An unparsable body is treated the same as a missing message.
pub(super) async fn chat(
    State(state): State<AxumState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let message = match payload {
        Ok(Json(ChatRequest { message: Some(m) })) if !m.is_empty() => m,
        Ok(_) => return json_error(StatusCode::BAD_REQUEST, MISSING_MESSAGE),
        Err(rejection) => {
            warn!(channel_id = %state.channel_id, "rejected chat body: {rejection}");
            return json_error(StatusCode::BAD_REQUEST, MISSING_MESSAGE);
        }
    };

    match state.chat.respond(&message).await {
        Ok(outcome) => (StatusCode::OK, Json(json!({ "answer": outcome.answer }))).into_response(),
        Err(e) => {
            error!(channel_id = %state.channel_id, "chat request failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}
