//! Bootstrap layer — modules that run before the HTTP channel starts.
//!
//! - **logger** — tracing-subscriber initialisation.

pub mod logger;
