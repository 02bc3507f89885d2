//! Error types for speech capture and playback.

/// Errors from the speech adapters and platform implementations.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
    #[error("recognition error: {0}")]
    Recognition(String),
    #[error("invalid listening transition: {0}")]
    InvalidTransition(String),
}
