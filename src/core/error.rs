//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("persona error: {0}")]
    Persona(String),

    #[error("memory error: {0}")]
    Memory(String),

    #[error("comms error: {0}")]
    Comms(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_display() {
        let e = AppError::Config("missing field".into());
        assert!(!e.to_string().is_empty());
        assert!(e.to_string().contains("missing field"));
    }

    #[test]
    fn persona_error_display() {
        let e = AppError::Persona("nome missing".into());
        assert!(e.to_string().starts_with("persona error"));
        assert!(e.to_string().contains("nome missing"));
    }

    #[test]
    fn memory_error_display() {
        let e = AppError::Memory("cannot write mind.json".into());
        assert!(e.to_string().contains("mind.json"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let e: AppError = io_err.into();
        assert!(e.to_string().contains("io error"));
        let _: &dyn Error = &e;
    }
}
