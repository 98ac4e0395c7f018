//! Error types for MinLib

use std::path::PathBuf;
use thiserror::Error;

/// MinLib error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Source file not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("File system error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Preprocessor error: {0}")]
    Preprocess(String),
}

impl Error {
    /// Wrap an I/O error together with the path it happened on
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileSystem {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for MinLib
pub type Result<T> = std::result::Result<T, Error>;
