use std::path::PathBuf;

use casework_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read case file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse case file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] casework_core::Error),

    #[error("case is invalid ({count} problem(s))")]
    InvalidCase { count: usize },
}

impl CliError {
    /// Process exit code: 1 for an invalid case, 2 for everything else.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidCase { .. } => 1,
            _ => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
