//! Error types for RakshaNav

use thiserror::Error;

/// RakshaNav error type
#[derive(Error, Debug)]
pub enum RakshaError {
    #[error("Invalid scan: {0}")]
    InvalidScan(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for RakshaError {
    fn from(e: toml::de::Error) -> Self {
        RakshaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RakshaError>;
