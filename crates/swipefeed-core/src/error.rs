use thiserror::Error;

use crate::orchestrator::ListenerKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to attach {kind} listener: {message}")]
    Attach { kind: ListenerKind, message: String },

    #[error("Feed source error: {0}")]
    Source(String),

    #[error("Async runtime unavailable: {0}")]
    Runtime(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
