//! Public configuration types.
//!
//! These are the resolved, ready-to-use structs that subsystems consume.
//! Raw TOML deserialization types live in `raw.rs`.

use std::path::PathBuf;

// ── Memory ───────────────────────────────────────────────────────────────────

/// Rolling memory log settings.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Maximum number of turns kept in `mind.json` (oldest dropped first).
    pub cap: usize,
    /// Number of most recent turns fed to the hosted model as context.
    pub context_turns: usize,
}

// ── LLM ──────────────────────────────────────────────────────────────────────

/// Connection settings for one hosted-model endpoint.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub api_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

/// LLM subsystem configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Active provider: `"gemini"`, `"openai"` or `"dummy"`.
    pub provider: String,
    pub gemini: EndpointConfig,
    pub openai: EndpointConfig,
}

impl LlmConfig {
    /// Environment variable holding the API key for the active provider,
    /// or `None` when the provider runs without one.
    pub fn api_key_var(&self) -> Option<&'static str> {
        match self.provider.as_str() {
            "gemini" => Some("GEMINI_API_KEY"),
            "openai" | "openai-compatible" => Some("LLM_API_KEY"),
            _ => None,
        }
    }
}

// ── Top-level ────────────────────────────────────────────────────────────────

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    /// Directory holding `nova.json` and `mind.json`.
    pub data_dir: PathBuf,
    pub log_level: String,
    /// Optional append-only log file; stderr when `None`.
    pub log_file: Option<PathBuf>,
    /// Socket address the HTTP channel binds to.
    pub bind: String,
    pub memory: MemoryConfig,
    pub llm: LlmConfig,
    /// Sourced from the environment only, never from TOML.
    pub llm_api_key: Option<String>,
    pub prompts_dir: PathBuf,
}

impl Config {
    pub fn persona_path(&self) -> PathBuf {
        self.data_dir.join("nova.json")
    }

    pub fn mind_path(&self) -> PathBuf {
        self.data_dir.join("mind.json")
    }
}
