//! LLM provider implementations.
//!
//! `build(config, api_key)` is the factory — called at startup.
//! Adding a new backend = new module + new match arm.

pub mod dummy;
pub mod gemini;
pub mod openai_compatible;

use crate::config::LlmConfig;
use crate::llm::{LlmProvider, ProviderError};

/// Construct a `LlmProvider` from config and an optional API key.
///
/// `api_key` is sourced from the environment (never TOML). Providers that
/// need one fail with [`ProviderError::MissingApiKey`] when it is absent.
pub fn build(config: &LlmConfig, api_key: Option<String>) -> Result<LlmProvider, ProviderError> {
    match config.provider.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider)),
        "gemini" => {
            let key = api_key.ok_or(ProviderError::MissingApiKey("GEMINI_API_KEY"))?;
            let g = &config.gemini;
            let p = gemini::GeminiProvider::new(
                g.api_base_url.clone(),
                g.model.clone(),
                g.temperature,
                g.timeout_seconds,
                key,
            )?;
            Ok(LlmProvider::Gemini(p))
        }
        "openai" | "openai-compatible" => {
            let oai = &config.openai;
            let p = openai_compatible::OpenAiCompatibleProvider::new(
                oai.api_base_url.clone(),
                oai.model.clone(),
                oai.temperature,
                oai.timeout_seconds,
                api_key,
            )?;
            Ok(LlmProvider::OpenAiCompatible(p))
        }
        _ => Err(ProviderError::UnknownProvider(config.provider.clone())),
    }
}
