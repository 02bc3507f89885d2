pub mod config;
pub mod error;
pub mod language;
pub mod types;

pub use config::JanSevaConfig;
pub use error::{JanSevaError, Result};
pub use language::{Language, LanguageSelection, LocalizedText, TextBundle};
pub use types::*;
