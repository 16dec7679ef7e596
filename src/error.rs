use std::path::PathBuf;

/// Errors returned by the game engine for inputs it refuses to act on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("column {0} is out of range (0..7)")]
    InvalidColumn(usize),

    #[error("position ({row}, {column}) is off the board")]
    InvalidPosition { row: usize, column: usize },
}

/// Errors that can occur while loading or saving win counts.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read win counts from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse win counts from {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
