//! Memory subsystem — the rolling conversation log used as prompt context.
//!
//! A single flat-file store today ([`mind_log::MindLog`]). Callers serialise
//! access through the chat service's lock; the store itself does no locking.

pub mod mind_log;

pub use mind_log::{MindLog, Turn};
