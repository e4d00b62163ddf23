//! Persona document — who the assistant is and who it talks to.
//!
//! Loaded once at startup from `nova.json` and read-only afterwards.
//! The raw document is kept alongside the typed view so `GET /omnIA/nova`
//! can return it verbatim, unknown fields included.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Persona {
    document: Value,
    view: PersonaView,
}

// ── Typed view over the document ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct PersonaView {
    nome: String,
    #[serde(default)]
    idade: Value,
    #[serde(default)]
    personalidade: Value,
    #[serde(default, rename = "funcao_na_OmnIA")]
    funcao_na_omnia: Option<Role>,
    #[serde(default)]
    simbolismo: Option<Symbolism>,
    config: Operator,
}

#[derive(Debug, Clone, Deserialize)]
struct Role {
    #[serde(default)]
    objetivo: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Symbolism {
    #[serde(default)]
    lema: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Operator {
    usuario: String,
}

impl Persona {
    /// Read and validate the persona document at `path`.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let data = fs::read_to_string(path)
            .map_err(|e| AppError::Persona(format!("cannot read {}: {e}", path.display())))?;
        let document: Value = serde_json::from_str(&data)
            .map_err(|e| AppError::Persona(format!("malformed {}: {e}", path.display())))?;
        Self::from_value(document)
    }

    pub fn from_value(document: Value) -> Result<Self, AppError> {
        let view = PersonaView::deserialize(&document)
            .map_err(|e| AppError::Persona(format!("invalid persona document: {e}")))?;
        if view.nome.trim().is_empty() || view.config.usuario.trim().is_empty() {
            return Err(AppError::Persona(
                "persona needs a non-empty `nome` and `config.usuario`".into(),
            ));
        }
        Ok(Self { document, view })
    }

    /// The document exactly as loaded.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Assistant name (`nome`).
    pub fn name(&self) -> &str {
        &self.view.nome
    }

    /// Operator name (`config.usuario`).
    pub fn operator(&self) -> &str {
        &self.view.config.usuario
    }

    /// `idade` as written in the document. Any JSON type is accepted,
    /// numbers and strings alike.
    pub fn age(&self) -> Option<String> {
        match &self.view.idade {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Personality traits as compact JSON, the way they are quoted in prompts.
    pub fn traits_json(&self) -> String {
        match &self.view.personalidade {
            Value::Null => "{}".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn goal(&self) -> &str {
        self.view
            .funcao_na_omnia
            .as_ref()
            .and_then(|r| r.objetivo.as_deref())
            .unwrap_or_default()
    }

    pub fn motto(&self) -> &str {
        self.view
            .simbolismo
            .as_ref()
            .and_then(|s| s.lema.as_deref())
            .unwrap_or_default()
    }
}
