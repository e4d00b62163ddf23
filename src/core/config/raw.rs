//! Raw TOML deserialization types.
//!
//! These structs mirror the TOML file shape and use `serde` defaults.
//! The `load` module converts them into the public `types` structs.

use serde::Deserialize;

// ── Top-level ────────────────────────────────────────────────────────────────

/// Raw TOML shape — serde target before resolution.
#[derive(Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub server: RawServer,
    #[serde(default)]
    pub memory: RawMemory,
    #[serde(default)]
    pub llm: RawLlm,
    #[serde(default)]
    pub prompts: RawPrompts,
}

#[derive(Deserialize)]
pub(super) struct RawServer {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            log_file: None,
            bind: default_bind(),
        }
    }
}

// ── Memory ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawMemory {
    #[serde(default = "default_memory_cap")]
    pub cap: usize,
    #[serde(default = "default_context_turns")]
    pub context_turns: usize,
}

impl Default for RawMemory {
    fn default() -> Self {
        Self {
            cap: default_memory_cap(),
            context_turns: default_context_turns(),
        }
    }
}

// ── LLM ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawLlm {
    #[serde(rename = "default", default = "default_llm_provider")]
    pub provider: String,
    #[serde(default)]
    pub gemini: RawEndpoint,
    #[serde(default)]
    pub openai: RawEndpoint,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            gemini: RawEndpoint::default(),
            openai: RawEndpoint::default(),
        }
    }
}

/// One hosted-model endpoint. Missing keys fall back per provider in `load`.
#[derive(Deserialize, Default)]
pub(super) struct RawEndpoint {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

// ── Prompts ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawPrompts {
    #[serde(default = "default_prompts_dir")]
    pub dir: String,
}

impl Default for RawPrompts {
    fn default() -> Self {
        Self { dir: default_prompts_dir() }
    }
}

// ── Defaults ────────────────────────────────────────────────────────────────

fn default_name() -> String {
    "omnia".to_string()
}

fn default_data_dir() -> String {
    "Nova".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

pub(super) fn default_memory_cap() -> usize {
    50
}

pub(super) fn default_context_turns() -> usize {
    10
}

fn default_llm_provider() -> String {
    "gemini".to_string()
}

fn default_prompts_dir() -> String {
    "config/prompts".to_string()
}

pub(super) const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub(super) const GEMINI_MODEL: &str = "gemini-2.5-flash";
pub(super) const OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
pub(super) const OPENAI_MODEL: &str = "gpt-4o-mini";
pub(super) const DEFAULT_TEMPERATURE: f32 = 0.7;
pub(super) const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
