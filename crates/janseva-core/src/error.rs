use thiserror::Error;

/// Top-level error type for the JanSeva crates.
///
/// Subsystem crates define their own error types and implement
/// `From<JanSevaError>` where they need to carry a core failure upward.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JanSevaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown language code: {0}")]
    UnknownLanguage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for JanSevaError {
    fn from(err: toml::de::Error) -> Self {
        JanSevaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for JanSevaError {
    fn from(err: toml::ser::Error) -> Self {
        JanSevaError::Config(err.to_string())
    }
}

/// A specialized `Result` type for core operations.
pub type Result<T> = std::result::Result<T, JanSevaError>;
