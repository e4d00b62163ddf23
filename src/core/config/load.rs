//! Configuration loading with env-var overrides.
//!
//! Reads TOML files, supports `[meta] base = "..."` inheritance chains,
//! and applies `OMNIA_DATA_DIR`, `OMNIA_LOG_LEVEL` and `OMNIA_BIND` env overrides.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;

use super::raw::{self, RawConfig, RawEndpoint};
use super::types::*;

/// Values that win over whatever the TOML file says.
///
/// [`load`] fills these from the environment; tests build them directly
/// instead of mutating process env.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub data_dir: Option<String>,
    pub log_level: Option<String>,
    pub bind: Option<String>,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var("OMNIA_DATA_DIR").ok(),
            log_level: env::var("OMNIA_LOG_LEVEL").ok(),
            bind: env::var("OMNIA_BIND").ok(),
        }
    }
}

/// Deep-merge two TOML values.
/// Tables are merged recursively — the overlay only needs to specify keys that
/// differ from the base. For every other type (string, integer, array, …)
/// the overlay value replaces the base value wholesale.
fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_tbl), toml::Value::Table(overlay_tbl)) => {
            for (key, ov_val) in overlay_tbl {
                let merged = match base_tbl.remove(&key) {
                    Some(base_val) => merge_toml(base_val, ov_val),
                    None => ov_val,
                };
                base_tbl.insert(key, merged);
            }
            toml::Value::Table(base_tbl)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file, follow any `[meta] base = "..."` chain, and return the
/// fully merged `toml::Value`. `visited` carries canonicalized paths already
/// seen in this chain so circular references are caught early.
fn load_raw_merged(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<toml::Value, AppError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical) {
        return Err(AppError::Config(format!(
            "circular base reference detected at: {}",
            path.display()
        )));
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let overlay_val: toml::Value = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    if let Some(base_str) = overlay_val
        .get("meta")
        .and_then(|m| m.get("base"))
        .and_then(|b| b.as_str())
    {
        let base_path = if Path::new(base_str).is_absolute() {
            PathBuf::from(base_str)
        } else {
            path.parent().unwrap_or(Path::new(".")).join(base_str)
        };
        let base_val = load_raw_merged(&base_path, visited)?;
        Ok(merge_toml(base_val, overlay_val))
    } else {
        Ok(overlay_val)
    }
}

/// Load config from the given path, or `config/default.toml`, then apply env-var overrides.
///
/// When no path is given and `config/default.toml` does not exist, the
/// built-in defaults are used.
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let overrides = Overrides::from_env();

    if let Some(path) = config_path {
        return load_from(Path::new(path), &overrides);
    }

    let default_path = Path::new("config/default.toml");
    if default_path.exists() {
        load_from(default_path, &overrides)
    } else {
        Ok(resolve(RawConfig::default(), &overrides))
    }
}

/// Internal loader — accepts an explicit path and overrides.
/// Follows `[meta] base = "..."` inheritance chains before resolving.
pub fn load_from(path: &Path, overrides: &Overrides) -> Result<Config, AppError> {
    let merged_val = load_raw_merged(path, &mut HashSet::new())?;

    let parsed: RawConfig = Deserialize::deserialize(merged_val).map_err(|e: toml::de::Error| {
        AppError::Config(format!("config error in {}: {e}", path.display()))
    })?;

    let config = resolve(parsed, overrides);
    if config.memory.cap == 0 {
        return Err(AppError::Config(format!(
            "memory.cap must be at least 1 in {}",
            path.display()
        )));
    }
    Ok(config)
}

fn resolve(parsed: RawConfig, overrides: &Overrides) -> Config {
    let s = parsed.server;

    let data_dir = expand_home(overrides.data_dir.as_deref().unwrap_or(&s.data_dir));
    let log_level = overrides.log_level.clone().unwrap_or(s.log_level);
    let bind = overrides.bind.clone().unwrap_or(s.bind);

    let llm = LlmConfig {
        provider: parsed.llm.provider,
        gemini: endpoint(parsed.llm.gemini, raw::GEMINI_API_BASE_URL, raw::GEMINI_MODEL),
        openai: endpoint(parsed.llm.openai, raw::OPENAI_API_BASE_URL, raw::OPENAI_MODEL),
    };
    let llm_api_key = llm
        .api_key_var()
        .and_then(|var| env::var(var).ok())
        .filter(|key| !key.trim().is_empty());

    Config {
        name: s.name,
        data_dir,
        log_level,
        log_file: s.log_file.as_deref().map(expand_home),
        bind,
        memory: MemoryConfig {
            cap: parsed.memory.cap,
            context_turns: parsed.memory.context_turns,
        },
        llm,
        llm_api_key,
        prompts_dir: expand_home(&parsed.prompts.dir),
    }
}

fn endpoint(raw: RawEndpoint, base_url: &str, model: &str) -> EndpointConfig {
    EndpointConfig {
        api_base_url: raw.api_base_url.unwrap_or_else(|| base_url.to_string()),
        model: raw.model.unwrap_or_else(|| model.to_string()),
        temperature: raw.temperature.unwrap_or(raw::DEFAULT_TEMPERATURE),
        timeout_seconds: raw.timeout_seconds.unwrap_or(raw::DEFAULT_TIMEOUT_SECONDS),
    }
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
