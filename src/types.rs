use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the drive mirror.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{path} returned {status}: {message}")]
    Server {
        path: String,
        status: StatusCode,
        message: String,
    },

    #[error("invalid drive number: {slot}; valid numbers are 1 through {count}")]
    InvalidSlot { slot: usize, count: usize },

    #[error("{path} gave no answer within {secs}s")]
    Timeout { path: String, secs: u64 },

    #[error("drive {slot} is busy or a hardware drive")]
    DriveUnavailable { slot: usize },

    #[error("unsupported cartridge format: {0}")]
    UnsupportedFormat(String),

    #[error("drive list has already been built")]
    AlreadyBootstrapped,

    #[error("drive list has not been built yet")]
    NotBootstrapped,

    #[error("no drive selected")]
    NoDriveSelected,
}
