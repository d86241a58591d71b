use thiserror::Error;

/// Crate-level failures. Expected domain conditions (parse errors, guard
/// rejections) are modeled as values elsewhere; this covers genuinely
/// broken inputs and IO at the loading boundary.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("invalid roster: {0}")]
    InvalidRoster(String),

    #[error("unknown team id: {0}")]
    UnknownTeam(String),

    #[error("unknown player id: {0}")]
    UnknownPlayer(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CaptureError>;
