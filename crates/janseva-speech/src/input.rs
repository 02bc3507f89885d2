//! Voice-to-text capture.

use std::sync::Arc;

use async_trait::async_trait;
use janseva_core::Language;
use tracing::{debug, info, warn};

use crate::error::SpeechError;
use crate::state::{ListeningState, StateMachine};

/// Platform speech recognition capability.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Whether the platform can recognize speech at all.
    fn is_supported(&self) -> bool;

    /// Capture a single utterance in `locale` (e.g. `hi-IN`).
    ///
    /// Resolves when capture ends, with the transcript or `None` when
    /// nothing was recognized.
    async fn recognize(&self, locale: &str) -> Result<Option<String>, SpeechError>;

    /// Ask an in-progress capture to end early.
    fn stop(&self);
}

/// How a listening request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    Transcript(String),
    /// Capture ended without a usable transcript.
    Silence,
    /// A capture was already running; nothing was started.
    AlreadyListening,
}

/// Puts the machine back to Idle however the capture future ends,
/// including when it is dropped mid-flight.
struct ListeningGuard<'a> {
    state: &'a StateMachine,
}

impl Drop for ListeningGuard<'_> {
    fn drop(&mut self) {
        if self.state.transition(ListeningState::Idle).is_err() {
            self.state.reset();
        }
    }
}

/// Wraps a [`SpeechRecognizer`] with the listening lifecycle.
pub struct SpeechInputAdapter {
    recognizer: Arc<dyn SpeechRecognizer>,
    state: StateMachine,
}

impl SpeechInputAdapter {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self {
            recognizer,
            state: StateMachine::new(),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.recognizer.is_supported()
    }

    pub fn is_listening(&self) -> bool {
        self.state.current() == ListeningState::Listening
    }

    /// Capture one utterance in `language`.
    ///
    /// Fails immediately with [`SpeechError::Unsupported`] when the platform
    /// has no recognizer. Starting while already listening is a no-op.
    /// Recognition errors end the capture as silence.
    pub async fn listen(&self, language: Language) -> Result<ListenOutcome, SpeechError> {
        if !self.is_supported() {
            return Err(SpeechError::Unsupported("speech recognition"));
        }
        if self.state.transition(ListeningState::Listening).is_err() {
            debug!("Voice capture already active; ignoring start");
            return Ok(ListenOutcome::AlreadyListening);
        }
        let _guard = ListeningGuard { state: &self.state };

        let locale = language.locale_tag();
        info!(locale, "Voice capture started");

        let outcome = match self.recognizer.recognize(locale).await {
            Ok(Some(transcript)) if !transcript.trim().is_empty() => {
                info!(transcript_len = transcript.len(), "Voice capture produced transcript");
                ListenOutcome::Transcript(transcript)
            }
            Ok(_) => {
                debug!("Voice capture ended without speech");
                ListenOutcome::Silence
            }
            Err(e) => {
                warn!(error = %e, "Voice capture failed");
                ListenOutcome::Silence
            }
        };
        Ok(outcome)
    }

    /// End the current capture early. Does nothing when idle.
    pub fn stop(&self) {
        if self.is_listening() {
            info!("Voice capture stop requested");
            self.recognizer.stop();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
