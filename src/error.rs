//! Crate error type
//!
//! The simulation itself is infallible; errors come from the edges
//! (storage, configuration files, GPU setup).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error("storage I/O failed for '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no storage location available on this platform")]
    NoStorage,

    #[error("unknown game '{0}' (expected 'shooter' or 'kingdom')")]
    UnknownGame(String),

    #[error("tuning value {field} = {value} is out of range")]
    InvalidTuning { field: &'static str, value: f64 },

    #[error("renderer setup failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, ArcadeError>;
