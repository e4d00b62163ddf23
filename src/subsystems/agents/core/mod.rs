//! Building blocks shared by agents.

pub mod prompt;
