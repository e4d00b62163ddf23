//! Agents — what turns an incoming message into a reply.
//!
//! - **chat** — the Nova chat agent (intercept rules + hosted model).
//! - **core** — shared building blocks (prompt assembly).

pub mod chat;
pub mod core;
