use rocker_core::GameError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RockerdError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Game(#[from] GameError),
}

impl RockerdError {
    /// Failure kind as reported in replay output
    pub fn kind(&self) -> &'static str {
        match self {
            RockerdError::Game(e) => e.kind(),
            RockerdError::Io { .. } => "io",
            RockerdError::Toml(_) | RockerdError::Config(_) => "config",
            RockerdError::Json(_) => "json",
        }
    }
}

pub type RockerdResult<T> = Result<T, RockerdError>;
