//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `OMNIA_DATA_DIR`, `OMNIA_LOG_LEVEL` and `OMNIA_BIND` env
//! overrides. The hosted-model API key is only ever read from the
//! environment (`GEMINI_API_KEY`, or `LLM_API_KEY` for OpenAI-compatible
//! endpoints).
//!
//! # Module layout
//!
//! - **types** — Public configuration structs (`Config`, `LlmConfig`, …).
//! - **raw** — Raw TOML deserialization types. These mirror the file shape
//!   and use serde defaults; kept private.
//! - **load** — Loading logic: `merge_toml`, `load_raw_merged`, `load`,
//!   `load_from`, `expand_home`.

mod load;
mod raw;
mod types;

pub use load::{Overrides, expand_home, load, load_from};
pub use types::*;

impl Config {
    /// Safe `Config` for tests — dummy LLM, no API key, no external calls.
    pub fn test_default(data_dir: &std::path::Path) -> Self {
        let endpoint = EndpointConfig {
            api_base_url: "http://127.0.0.1:9".into(),
            model: "test-model".into(),
            temperature: 0.0,
            timeout_seconds: 1,
        };
        Self {
            name: "test".into(),
            data_dir: data_dir.to_path_buf(),
            log_level: "info".into(),
            log_file: None,
            bind: "127.0.0.1:0".into(),
            memory: MemoryConfig {
                cap: raw::default_memory_cap(),
                context_turns: raw::default_context_turns(),
            },
            llm: LlmConfig {
                provider: "dummy".into(),
                gemini: endpoint.clone(),
                openai: endpoint,
            },
            llm_api_key: None,
            prompts_dir: data_dir.join("prompts"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const MINIMAL_TOML: &str = r#"
[server]
name = "test-omnia"
data_dir = "~/.omnia"
log_level = "info"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    fn no_overrides() -> Overrides {
        Overrides::default()
    }

    #[test]
    fn parse_basic_config() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), &no_overrides()).unwrap();
        assert_eq!(cfg.name, "test-omnia");
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn empty_file_uses_defaults() {
        let f = write_toml("");
        let cfg = load_from(f.path(), &no_overrides()).unwrap();
        assert_eq!(cfg.bind, "0.0.0.0:3000");
        assert_eq!(cfg.memory.cap, 50);
        assert_eq!(cfg.memory.context_turns, 10);
        assert_eq!(cfg.llm.provider, "gemini");
        assert_eq!(cfg.llm.gemini.model, "gemini-2.5-flash");
        assert_eq!(cfg.data_dir, std::path::PathBuf::from("Nova"));
        assert_eq!(cfg.persona_path(), std::path::PathBuf::from("Nova/nova.json"));
        assert_eq!(cfg.mind_path(), std::path::PathBuf::from("Nova/mind.json"));
    }

    #[test]
    fn parse_llm_endpoints() {
        let toml = r#"
[llm]
default = "openai"

[llm.openai]
api_base_url = "http://localhost:11434/v1/chat/completions"
model = "llama3"
timeout_seconds = 5
"#;
        let f = write_toml(toml);
        let cfg = load_from(f.path(), &no_overrides()).unwrap();
        assert_eq!(cfg.llm.provider, "openai");
        assert_eq!(cfg.llm.openai.model, "llama3");
        assert_eq!(cfg.llm.openai.timeout_seconds, 5);
        // untouched keys keep their per-provider defaults
        assert_eq!(cfg.llm.openai.temperature, 0.7);
        assert_eq!(cfg.llm.gemini.api_base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(cfg.llm.api_key_var(), Some("LLM_API_KEY"));
    }

    #[test]
    fn dummy_provider_needs_no_key() {
        let f = write_toml("[llm]\ndefault = \"dummy\"\n");
        let cfg = load_from(f.path(), &no_overrides()).unwrap();
        assert_eq!(cfg.llm.api_key_var(), None);
        assert!(cfg.llm_api_key.is_none());
    }

    #[test]
    fn zero_memory_cap_rejected() {
        let f = write_toml("[memory]\ncap = 0\n");
        let msg = load_from(f.path(), &no_overrides()).unwrap_err().to_string();
        assert!(msg.contains("memory.cap"));
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let expanded = expand_home("~/.omnia");
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with(".omnia"));
    }

    #[test]
    fn absolute_path_unchanged() {
        let p = expand_home("/absolute/path");
        assert_eq!(p, std::path::PathBuf::from("/absolute/path"));
    }

    #[test]
    fn relative_path_unchanged() {
        let p = expand_home("relative/path");
        assert_eq!(p, std::path::PathBuf::from("relative/path"));
    }

    #[test]
    fn missing_file_errors() {
        let result = load_from(std::path::Path::new("/nonexistent/config.toml"), &no_overrides());
        assert!(result.is_err());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("config error"));
    }

    #[test]
    fn overrides_win() {
        let f = write_toml(MINIMAL_TOML);
        let overrides = Overrides {
            data_dir: Some("/tmp/test-override".into()),
            log_level: Some("debug".into()),
            bind: Some("127.0.0.1:4000".into()),
        };
        let cfg = load_from(f.path(), &overrides).unwrap();
        assert_eq!(cfg.data_dir, std::path::PathBuf::from("/tmp/test-override"));
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.bind, "127.0.0.1:4000");
    }

    const BASE_TOML: &str = r#"
[server]
name = "base-omnia"
data_dir = "~/.omnia"
log_level = "info"

[llm]
default = "gemini"

[llm.gemini]
model = "gemini-base"
temperature = 0.1
timeout_seconds = 30
"#;

    fn write_named(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let p = dir.path().join(name);
        std::fs::write(&p, content).unwrap();
        p
    }

    #[test]
    fn overlay_keeps_base_fields() {
        let dir = TempDir::new().unwrap();
        write_named(&dir, "base.toml", BASE_TOML);
        let overlay = r#"
[meta]
base = "base.toml"

[server]
log_level = "debug"
"#;
        let overlay_path = write_named(&dir, "overlay.toml", overlay);
        let cfg = load_from(&overlay_path, &no_overrides()).unwrap();
        assert_eq!(cfg.name, "base-omnia");
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn overlay_wins_scalar() {
        let dir = TempDir::new().unwrap();
        write_named(&dir, "base.toml", BASE_TOML);
        let overlay = r#"
[meta]
base = "base.toml"

[llm.gemini]
model = "gemini-overlay"
"#;
        let overlay_path = write_named(&dir, "overlay.toml", overlay);
        let cfg = load_from(&overlay_path, &no_overrides()).unwrap();
        assert_eq!(cfg.llm.gemini.model, "gemini-overlay");
        assert_eq!(cfg.llm.gemini.temperature, 0.1);
    }

    #[test]
    fn missing_base_errors() {
        let dir = TempDir::new().unwrap();
        let overlay = r#"
[meta]
base = "nonexistent.toml"
"#;
        let overlay_path = write_named(&dir, "overlay.toml", overlay);
        let msg = load_from(&overlay_path, &no_overrides()).unwrap_err().to_string();
        assert!(msg.contains("cannot read"));
    }

    #[test]
    fn cycle_detection() {
        let dir = TempDir::new().unwrap();
        let self_path = dir.path().join("self.toml");
        let content = format!("[meta]\nbase = \"{}\"\n\n{BASE_TOML}", self_path.display());
        std::fs::write(&self_path, content).unwrap();
        let msg = load_from(&self_path, &no_overrides()).unwrap_err().to_string();
        assert!(msg.contains("circular"));
    }
}
