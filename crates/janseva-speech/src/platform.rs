//! Speech platforms for hosts without speech support, such as a terminal.

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::input::SpeechRecognizer;
use crate::output::{SpeechSynthesizer, Utterance, VoiceInfo};

/// Recognizer for a host with no microphone or recognition engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableRecognizer;

#[async_trait]
impl SpeechRecognizer for UnavailableRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    async fn recognize(&self, _locale: &str) -> Result<Option<String>, SpeechError> {
        Err(SpeechError::Unsupported("speech recognition"))
    }

    fn stop(&self) {}
}

/// Synthesizer for a host with no text-to-speech engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSynthesizer;

#[async_trait]
impl SpeechSynthesizer for UnavailableSynthesizer {
    fn is_supported(&self) -> bool {
        false
    }

    fn voices(&self) -> Vec<VoiceInfo> {
        Vec::new()
    }

    async fn speak(&self, _utterance: Utterance) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported("speech synthesis"))
    }

    fn cancel(&self) {}
}
