//! # CLI Error Type
//!
//! Everything that can stop a command before or after the core runs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  config file / env ──► ConfigError ─┐                                   │
//! │  input file read   ──► Io          ─┤                                   │
//! │  listing JSON      ──► Json        ─┼──► CliError ──► anyhow ──► exit 1 │
//! │  core builders     ──► CoreError   ─┤                                   │
//! │  rejected amount   ──► InvalidAmount┘                    (exit 2)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use searchable_core::CoreError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    /// The amount was checked and rejected; the message is the form text.
    #[error("{0}")]
    InvalidAmount(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidAmount(_) => 2,
            _ => 1,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::InvalidAmount("Minimum amount is $0.01".into()).exit_code(), 2);
        assert_eq!(CliError::Core(CoreError::NoSelections).exit_code(), 1);
    }

    #[test]
    fn test_core_errors_are_transparent() {
        let err = CliError::from(CoreError::MissingComponents);
        assert_eq!(err.to_string(), "Invalid searchable configuration");
    }
}
