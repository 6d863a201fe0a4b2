use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum FaqError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed FAQ JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed FAQ entry at {}:{line}: {source}", .path.display())]
    JsonLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Generation failed: {0}")]
    Generation(String),
}

impl FaqError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FaqError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FaqError>;
