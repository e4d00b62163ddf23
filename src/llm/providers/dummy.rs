//! Dummy LLM provider — echoes the last prompt line back prefixed with `[echo]`.
//! Used for local runs and tests without a real API key.

use crate::llm::{LlmResponse, ProviderError};

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn complete(&self, prompt: &str) -> Result<LlmResponse, ProviderError> {
        // Prompts end with the user's line; echoing only that keeps replies short.
        let last = prompt.trim_end().lines().last().unwrap_or_default().trim();
        Ok(LlmResponse {
            text: format!("[echo] {last}"),
            usage: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn complete_prefixes_echo() {
        let p = DummyProvider;
        assert_eq!(p.complete("hello").await.unwrap().text, "[echo] hello");
    }

    #[tokio::test]
    async fn complete_echoes_last_line() {
        let p = DummyProvider;
        let reply = p.complete("context\n\nUser: \"oi\"\n").await.unwrap();
        assert_eq!(reply.text, "[echo] User: \"oi\"");
    }

    #[tokio::test]
    async fn complete_empty_input() {
        let p = DummyProvider;
        assert_eq!(p.complete("").await.unwrap().text, "[echo] ");
    }

    #[tokio::test]
    async fn complete_usage_is_none() {
        let p = DummyProvider;
        assert!(p.complete("test").await.unwrap().usage.is_none());
    }
}
