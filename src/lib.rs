// Library root — shared by the `omnia` server, the `omnia-chat` client and
// the integration tests under tests/.

pub mod bootstrap;
pub mod core;
pub mod llm;
pub mod subsystems;

pub use self::core::{config, error};
pub use bootstrap::logger;
