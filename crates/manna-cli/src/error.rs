use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] manna_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Devotion ID cannot be empty")]
    EmptyDevotionId,
    #[error("Devotion not found for id/prefix: {0}")]
    DevotionNotFound(String),
    #[error("{0}")]
    AmbiguousDevotionId(String),
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("No devotion content provided")]
    EmptyContent,
    #[error("Configuration error: {0}")]
    Config(String),
}
