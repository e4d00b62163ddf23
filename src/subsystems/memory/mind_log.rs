//! `mind_log` store — capped, append-only JSON array of conversation turns.
//!
//! ## On-disk format
//!
//! `mind.json` is a pretty-printed array:
//!
//! ```json
//! [
//!   { "data": "2025-06-01T12:00:00.000Z", "entrada": "oi", "answer": "Oi, Kley!" }
//! ]
//! ```
//!
//! The whole file is read and rewritten on every append. Entries beyond the
//! cap are dropped oldest-first (FIFO).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppError;

/// One exchange: the user's message and the assistant's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// ISO-8601 UTC timestamp with millisecond precision.
    #[serde(rename = "data")]
    pub timestamp: String,
    #[serde(rename = "entrada")]
    pub user_input: String,
    #[serde(rename = "answer")]
    pub reply: String,
}

impl Turn {
    /// Build a turn stamped with the current time.
    pub fn now(user_input: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            user_input: user_input.into(),
            reply: reply.into(),
        }
    }
}

#[derive(Debug)]
pub struct MindLog {
    path: PathBuf,
    cap: usize,
}

impl MindLog {
    /// Open the log at `path`, creating it (and its directory) as `[]` when
    /// missing. `cap` is clamped to at least one entry.
    pub fn open(path: impl Into<PathBuf>, cap: usize) -> Result<Self, AppError> {
        let log = Self { path: path.into(), cap: cap.max(1) };
        if !log.path.exists() {
            if let Some(parent) = log.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::Memory(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
            log.write(&[])?;
            info!(path = %log.path.display(), "memory log not found — created an empty one");
        }
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// All stored turns, oldest first.
    ///
    /// A missing file reads as empty history. So does a malformed one; it is
    /// logged and overwritten by the next append.
    pub fn read_all(&self) -> Result<Vec<Turn>, AppError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::Memory(format!("cannot read {}: {e}", self.path.display())));
            }
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str(&data) {
            Ok(turns) => Ok(turns),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "malformed memory log — treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// The last `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> Result<Vec<Turn>, AppError> {
        let mut turns = self.read_all()?;
        let start = turns.len().saturating_sub(n);
        Ok(turns.split_off(start))
    }

    /// Append `turn`, drop the oldest entries beyond the cap, and rewrite the
    /// file. Returns the number of stored turns afterwards.
    pub fn append(&self, turn: Turn) -> Result<usize, AppError> {
        let mut turns = self.read_all()?;
        turns.push(turn);
        if turns.len() > self.cap {
            let excess = turns.len() - self.cap;
            turns.drain(..excess);
        }
        self.write(&turns)?;
        Ok(turns.len())
    }

    fn write(&self, turns: &[Turn]) -> Result<(), AppError> {
        let data = serde_json::to_string_pretty(turns)
            .map_err(|e| AppError::Memory(format!("serialise memory log: {e}")))?;
        fs::write(&self.path, data)
            .map_err(|e| AppError::Memory(format!("cannot write {}: {e}", self.path.display())))
    }
}
