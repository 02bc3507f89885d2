//! Error types for the chat session.

use janseva_core::JanSevaError;
use janseva_speech::SpeechError;

/// Errors from the chat session and reply fetching.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("malformed reply: {0}")]
    MalformedReply(String),
    #[error("voice input is not supported on this platform")]
    VoiceInputUnavailable,
    #[error("speech error: {0}")]
    Speech(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<SpeechError> for ChatError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Unsupported(_) => ChatError::VoiceInputUnavailable,
            other => ChatError::Speech(other.to_string()),
        }
    }
}

impl From<JanSevaError> for ChatError {
    fn from(err: JanSevaError) -> Self {
        ChatError::Config(err.to_string())
    }
}
