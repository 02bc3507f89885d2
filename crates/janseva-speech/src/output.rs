//! Text-to-speech playback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use janseva_core::config::SpeechConfig;
use janseva_core::Language;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::SpeechError;

/// An installed platform voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    pub name: String,
    /// Locale tag, e.g. `hi-IN`.
    pub locale: String,
}

impl VoiceInfo {
    pub fn new(name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locale: locale.into(),
        }
    }
}

/// A fully specified request to speak some text.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub locale: String,
    /// `None` leaves voice choice to the platform.
    pub voice: Option<VoiceInfo>,
    pub rate: f32,
    pub pitch: f32,
}

/// Platform speech synthesis capability.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn is_supported(&self) -> bool;

    /// Voices currently installed.
    fn voices(&self) -> Vec<VoiceInfo>;

    /// Play `utterance`, resolving when playback ends, errors or is cancelled.
    async fn speak(&self, utterance: Utterance) -> Result<(), SpeechError>;

    /// Stop all playback.
    fn cancel(&self);
}

/// Locale and voice picked for a language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceChoice {
    pub locale: String,
    pub voice: Option<VoiceInfo>,
}

/// Secondary language whose voice stands in when none is installed for
/// the primary one. Marathi voices are often missing, Hindi ones rarely.
fn voice_fallback(language: Language) -> Option<Language> {
    match language {
        Language::Marathi => Some(Language::Hindi),
        Language::English | Language::Hindi => None,
    }
}

/// Pick a voice for `language` from `voices`.
///
/// An exact locale match wins. Otherwise the fallback language's voice is
/// tried, if the language has one. With no match at all the locale of the
/// last candidate is used and the platform picks the voice.
pub fn select_voice(language: Language, voices: &[VoiceInfo]) -> VoiceChoice {
    let candidates = std::iter::once(language).chain(voice_fallback(language));
    let mut last_tag = language.locale_tag();
    for candidate in candidates {
        let tag = candidate.locale_tag();
        last_tag = tag;
        if let Some(voice) = voices.iter().find(|v| v.locale == tag) {
            return VoiceChoice {
                locale: tag.to_string(),
                voice: Some(voice.clone()),
            };
        }
    }
    VoiceChoice {
        locale: last_tag.to_string(),
        voice: None,
    }
}

/// Wraps a [`SpeechSynthesizer`] with voice selection and the single
/// active utterance rule.
///
/// `speak` returns immediately; playback runs on a spawned task. The
/// `speaking` flag is observable through [`subscribe_speaking`].
///
/// [`subscribe_speaking`]: SpeechOutputAdapter::subscribe_speaking
pub struct SpeechOutputAdapter {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    rate: f32,
    pitch: f32,
    generation: Arc<AtomicU64>,
    speaking: Arc<watch::Sender<bool>>,
}

impl SpeechOutputAdapter {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, config: &SpeechConfig) -> Self {
        let (speaking, _rx) = watch::channel(false);
        Self {
            synthesizer,
            rate: config.rate,
            pitch: config.pitch,
            generation: Arc::new(AtomicU64::new(0)),
            speaking: Arc::new(speaking),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.synthesizer.is_supported()
    }

    pub fn is_speaking(&self) -> bool {
        *self.speaking.borrow()
    }

    pub fn subscribe_speaking(&self) -> watch::Receiver<bool> {
        self.speaking.subscribe()
    }

    /// Build the utterance that [`speak`](Self::speak) would play.
    pub fn utterance_for(&self, text: &str, language: Language) -> Utterance {
        let choice = select_voice(language, &self.synthesizer.voices());
        Utterance {
            text: text.to_string(),
            locale: choice.locale,
            voice: choice.voice,
            rate: self.rate,
            pitch: self.pitch,
        }
    }

    /// Speak `text`, stopping whatever is playing first.
    ///
    /// Silently does nothing when the platform has no synthesizer.
    pub fn speak(&self, text: &str, language: Language) {
        if !self.is_supported() {
            debug!("Speech synthesis unavailable; skipping playback");
            return;
        }
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "No async runtime for speech playback");
                return;
            }
        };

        let utterance = self.utterance_for(text, language);
        let generation = self.stop_current();
        self.speaking.send_replace(true);
        info!(
            locale = %utterance.locale,
            voice = utterance.voice.as_ref().map(|v| v.name.as_str()).unwrap_or("default"),
            text_len = text.len(),
            "Speaking"
        );

        let synthesizer = Arc::clone(&self.synthesizer);
        let current = Arc::clone(&self.generation);
        let speaking = Arc::clone(&self.speaking);
        handle.spawn(async move {
            // Superseded before it got to play.
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            if let Err(e) = synthesizer.speak(utterance).await {
                warn!(error = %e, "Speech playback failed");
            }
            if current.load(Ordering::SeqCst) == generation {
                speaking.send_replace(false);
            }
        });
    }

    /// Stop playback. Safe to call at any time, any number of times.
    pub fn cancel(&self) {
        self.stop_current();
        self.speaking.send_replace(false);
    }

    /// Stop if speaking, otherwise start speaking `text`.
    ///
    /// Returns whether playback was started.
    pub fn toggle(&self, text: &str, language: Language) -> bool {
        if self.is_speaking() {
            self.cancel();
            false
        } else {
            self.speak(text, language);
            self.is_speaking()
        }
    }

    /// Invalidate the active utterance and stop the platform. Returns the
    /// new generation.
    fn stop_current(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if self.is_supported() {
            self.synthesizer.cancel();
        }
        generation
    }
}

// =============================================================================
// Tests
// =============================================================================
