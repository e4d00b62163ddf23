//! Comms subsystem — external I/O channels.
//!
//! - **axum_channel** — the HTTP backend (`/omnIA/chat`, `/omnIA/nova`, `/ping`).
//! - **transcript** — the conversation list kept by chat clients.
//!
//! # Starting
//!
//! [`start`] spawns the HTTP channel as an independent task and returns its
//! join handle. If the channel exits with an error the shared `shutdown`
//! token is cancelled so the rest of the process stops cooperatively.

pub mod axum_channel;
pub mod transcript;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::config::Config;
use crate::error::AppError;
use crate::subsystems::agents::chat::ChatService;

pub use axum_channel::{AxumChannel, AxumState, build_router};
pub use transcript::{ChatTranscript, Message, Sender};

pub fn start(
    config: &Config,
    chat: Arc<ChatService>,
    shutdown: CancellationToken,
) -> JoinHandle<Result<(), AppError>> {
    let channel = AxumChannel::new("http0", config.bind.clone(), chat);
    tokio::spawn(async move {
        let result = channel.run(shutdown.clone()).await;
        if let Err(e) = &result {
            error!("http channel failed: {e}");
            shutdown.cancel();
        }
        result
    })
}
