//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete provider implementations.
//! Add a new variant + module in `providers/` for each additional backend.
//!
//! Provider instances are shared immutable capabilities — clone them freely.
//! Async is delegated to the underlying provider; the `complete` method is
//! `async fn` on the enum so callers need no trait-object machinery.

pub mod providers;

use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),
    #[error("provider request failed: {0}")]
    Request(String),
}

// ── Response ──────────────────────────────────────────────────────────────────

/// Token accounting reported by the provider, when it reports any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LlmUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// One completed generation.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub usage: Option<LlmUsage>,
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
///
/// Enum dispatch avoids `dyn` trait objects and the `async-trait` dependency.
/// Adding a backend = new module + new variant + new `complete` arm.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Dummy(providers::dummy::DummyProvider),
    Gemini(providers::gemini::GeminiProvider),
    OpenAiCompatible(providers::openai_compatible::OpenAiCompatibleProvider),
}

impl LlmProvider {
    /// Send `prompt` to the provider and return its text reply.
    pub async fn complete(&self, prompt: &str) -> Result<LlmResponse, ProviderError> {
        match self {
            LlmProvider::Dummy(p) => p.complete(prompt).await,
            LlmProvider::Gemini(p) => p.complete(prompt).await,
            LlmProvider::OpenAiCompatible(p) => p.complete(prompt).await,
        }
    }

    /// Short provider name for logs and startup output.
    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::Dummy(_) => "dummy",
            LlmProvider::Gemini(_) => "gemini",
            LlmProvider::OpenAiCompatible(_) => "openai",
        }
    }
}
