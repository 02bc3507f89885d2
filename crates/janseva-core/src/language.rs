//! Language selection shared across the widget.
//!
//! The supported set is closed: English, Hindi and Marathi. Marathi is the
//! default. [`LanguageSelection`] is an explicit, cloneable handle that every
//! component receives at construction time; changes are broadcast to
//! subscribers through a `tokio::sync::watch` channel.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::JanSevaError;

/// A supported interface language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[default]
    #[serde(rename = "mr")]
    Marathi,
}

impl Language {
    /// Every supported language, in selector order.
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Marathi];

    /// The language used when a bundle has no entry for the current one.
    pub const DEFAULT: Language = Language::Marathi;

    /// Short code sent to the backend (`en`, `hi`, `mr`).
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Marathi => "mr",
        }
    }

    /// Region-qualified locale tag understood by speech recognizers and voices.
    pub fn locale_tag(self) -> &'static str {
        match self {
            Language::English => "en-IN",
            Language::Hindi => "hi-IN",
            Language::Marathi => "mr-IN",
        }
    }

    /// Name of the language written in that language.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिंदी",
            Language::Marathi => "मराठी",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = JanSevaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::English),
            "hi" => Ok(Language::Hindi),
            "mr" => Ok(Language::Marathi),
            other => Err(JanSevaError::UnknownLanguage(other.to_string())),
        }
    }
}

/// A mapping from language to display text.
pub trait TextBundle {
    /// Text for `language`, if the bundle has an entry for it.
    fn text(&self, language: Language) -> Option<&str>;
}

/// A static string available in all three languages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalizedText {
    pub en: &'static str,
    pub hi: &'static str,
    pub mr: &'static str,
}

impl LocalizedText {
    pub const fn new(en: &'static str, hi: &'static str, mr: &'static str) -> Self {
        Self { en, hi, mr }
    }

    pub fn get(&self, language: Language) -> &'static str {
        match language {
            Language::English => self.en,
            Language::Hindi => self.hi,
            Language::Marathi => self.mr,
        }
    }
}

impl TextBundle for LocalizedText {
    fn text(&self, language: Language) -> Option<&str> {
        Some(self.get(language))
    }
}

impl<S: AsRef<str>> TextBundle for HashMap<Language, S> {
    fn text(&self, language: Language) -> Option<&str> {
        self.get(&language).map(AsRef::as_ref)
    }
}

/// Look up `language` in `bundle`, falling back to [`Language::DEFAULT`] and
/// then to the empty string. Empty entries count as missing.
pub fn resolve<B: TextBundle + ?Sized>(bundle: &B, language: Language) -> &str {
    let present = move |lang: Language| bundle.text(lang).filter(|text| !text.is_empty());
    present(language)
        .or_else(|| present(Language::DEFAULT))
        .unwrap_or("")
}

/// Process-wide language selection handle.
///
/// Cloning shares the same underlying selection.
#[derive(Debug, Clone)]
pub struct LanguageSelection {
    current: Arc<watch::Sender<Language>>,
}

impl Default for LanguageSelection {
    fn default() -> Self {
        Self::new(Language::DEFAULT)
    }
}

impl LanguageSelection {
    pub fn new(initial: Language) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            current: Arc::new(tx),
        }
    }

    pub fn current(&self) -> Language {
        *self.current.borrow()
    }

    /// Switch the active language. Subscribers are notified only when the
    /// value actually changes.
    pub fn set_current(&self, language: Language) {
        let changed = self.current.send_if_modified(|current| {
            if *current == language {
                false
            } else {
                *current = language;
                true
            }
        });
        if changed {
            tracing::info!(language = %language, "Language changed");
        }
    }

    /// Receive a notification each time the active language changes.
    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.current.subscribe()
    }

    /// Text from `bundle` for the active language.
    pub fn translate<'a, B: TextBundle + ?Sized>(&self, bundle: &'a B) -> &'a str {
        resolve(bundle, self.current())
    }
}
