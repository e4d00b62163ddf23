//! Layered prompt builder.
//!
//! Prompts are assembled from plain-text template fragments stored under
//! `config/prompts/`. Each layer is appended in order; a missing or empty
//! file is replaced by a built-in fallback ([`layer_or`](PromptBuilder::layer_or)).
//! Text already in memory goes in with [`append`](PromptBuilder::append).
//!
//! Variable substitution uses `{{key}}` syntax and is applied once at
//! [`build()`](PromptBuilder::build) time, after all layers are joined.
//! Substitution is a single left-to-right pass, so placeholders that appear
//! inside substituted values (e.g. typed by the user) are left alone.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

const SEPARATOR: &str = "\n\n";

pub struct PromptBuilder {
    prompts_dir: PathBuf,
    parts: Vec<String>,
    vars: HashMap<String, String>,
}

impl PromptBuilder {
    /// Create a builder rooted at `prompts_dir` (e.g. `"config/prompts"`).
    pub fn new(prompts_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompts_dir: prompts_dir.into(),
            parts: Vec::new(),
            vars: HashMap::new(),
        }
    }

    /// Append a layer by loading `filename` from the prompts directory,
    /// or `fallback` when the file is missing or empty.
    pub fn layer_or(self, filename: &str, fallback: &str) -> Self {
        let path = self.prompts_dir.join(filename);
        let text = match fs::read_to_string(&path) {
            Ok(text) if !text.trim().is_empty() => text,
            _ => {
                tracing::debug!("prompt: layer '{}' not found — using fallback", path.display());
                fallback.to_string()
            }
        };
        self.append(text)
    }

    /// Directly append a text fragment (e.g. an already-loaded template body).
    pub fn append(mut self, text: impl Into<String>) -> Self {
        let s = text.into();
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            self.parts.push(trimmed.to_string());
        }
        self
    }

    /// Register `{{key}}` → `value` substitution pairs applied at build time.
    pub fn with_vars<'a, I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (k, v) in vars {
            self.vars.insert(k.to_string(), v.to_string());
        }
        self
    }

    /// Register a single variable.
    pub fn var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    /// Assemble all layers, join with blank lines, and apply variable substitution.
    /// Unknown placeholders are kept as-is.
    pub fn build(self) -> String {
        let template = self.parts.join(SEPARATOR);
        let mut out = String::with_capacity(template.len());
        let mut rest = template.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let key = after[..end].trim();
                    match self.vars.get(key) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(&rest[start..start + 2 + end + 2]),
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}
