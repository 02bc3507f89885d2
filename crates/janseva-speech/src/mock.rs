//! Scripted speech platforms for tests and demos.
//!
//! - `MockRecognizer` replays a queue of [`RecognizerStep`]s.
//! - `MockSynthesizer` records every utterance and playback event and
//!   "plays" for a fixed duration.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{oneshot, Notify};

use crate::error::SpeechError;
use crate::input::SpeechRecognizer;
use crate::output::{SpeechSynthesizer, Utterance, VoiceInfo};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// MockRecognizer
// ---------------------------------------------------------------------------

/// What the next `recognize` call does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerStep {
    Transcript(String),
    Silence,
    Fail(String),
    /// Keep listening until `stop` is called, then end silently.
    WaitForStop,
}

/// Recognizer that replays scripted steps. An exhausted script yields silence.
#[derive(Debug)]
pub struct MockRecognizer {
    supported: bool,
    script: Mutex<VecDeque<RecognizerStep>>,
    locales: Mutex<Vec<String>>,
    stop_signal: Notify,
    stops: AtomicUsize,
}

impl Default for MockRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::with_steps(Vec::new())
    }

    pub fn with_steps(steps: Vec<RecognizerStep>) -> Self {
        Self {
            supported: true,
            script: Mutex::new(steps.into()),
            locales: Mutex::new(Vec::new()),
            stop_signal: Notify::new(),
            stops: AtomicUsize::new(0),
        }
    }

    /// A platform without speech recognition.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    pub fn push(&self, step: RecognizerStep) {
        lock(&self.script).push_back(step);
    }

    /// Locales passed to `recognize`, in call order.
    pub fn locales(&self) -> Vec<String> {
        lock(&self.locales).clone()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn recognize(&self, locale: &str) -> Result<Option<String>, SpeechError> {
        lock(&self.locales).push(locale.to_string());
        let step = lock(&self.script)
            .pop_front()
            .unwrap_or(RecognizerStep::Silence);
        match step {
            RecognizerStep::Transcript(text) => Ok(Some(text)),
            RecognizerStep::Silence => Ok(None),
            RecognizerStep::Fail(msg) => Err(SpeechError::Recognition(msg)),
            RecognizerStep::WaitForStop => {
                self.stop_signal.notified().await;
                Ok(None)
            }
        }
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.stop_signal.notify_one();
    }
}

// ---------------------------------------------------------------------------
// MockSynthesizer
// ---------------------------------------------------------------------------

/// Playback event recorded by [`MockSynthesizer`], keyed by utterance text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthEvent {
    Started(String),
    Finished(String),
    Cancelled(String),
}

#[derive(Debug)]
struct ActiveUtterance {
    id: u64,
    text: String,
    cancel: oneshot::Sender<()>,
}

/// Synthesizer that records playback instead of producing audio.
#[derive(Debug)]
pub struct MockSynthesizer {
    supported: bool,
    voices: Vec<VoiceInfo>,
    duration: Duration,
    next_id: AtomicU64,
    active: Mutex<Option<ActiveUtterance>>,
    events: Mutex<Vec<SynthEvent>>,
    utterances: Mutex<Vec<Utterance>>,
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self {
            supported: true,
            voices: Vec::new(),
            duration: Duration::from_millis(5),
            next_id: AtomicU64::new(0),
            active: Mutex::new(None),
            events: Mutex::new(Vec::new()),
            utterances: Mutex::new(Vec::new()),
        }
    }

    /// A platform without speech synthesis.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    pub fn with_voices(mut self, voices: Vec<VoiceInfo>) -> Self {
        self.voices = voices;
        self
    }

    /// How long each utterance "plays" before finishing.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn events(&self) -> Vec<SynthEvent> {
        lock(&self.events).clone()
    }

    /// Utterances handed to `speak`, in call order.
    pub fn utterances(&self) -> Vec<Utterance> {
        lock(&self.utterances).clone()
    }

    fn begin(&self, utterance: Utterance) -> (u64, oneshot::Receiver<()>) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        lock(&self.events).push(SynthEvent::Started(utterance.text.clone()));
        *lock(&self.active) = Some(ActiveUtterance {
            id,
            text: utterance.text.clone(),
            cancel: tx,
        });
        lock(&self.utterances).push(utterance);
        (id, rx)
    }

    fn finish(&self, id: u64) {
        let mut active = lock(&self.active);
        if active.as_ref().map(|a| a.id) == Some(id) {
            if let Some(done) = active.take() {
                lock(&self.events).push(SynthEvent::Finished(done.text));
            }
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn voices(&self) -> Vec<VoiceInfo> {
        self.voices.clone()
    }

    async fn speak(&self, utterance: Utterance) -> Result<(), SpeechError> {
        let (id, cancelled) = self.begin(utterance);
        tokio::select! {
            _ = cancelled => {}
            _ = tokio::time::sleep(self.duration) => self.finish(id),
        }
        Ok(())
    }

    fn cancel(&self) {
        let active = lock(&self.active).take();
        if let Some(active) = active {
            lock(&self.events).push(SynthEvent::Cancelled(active.text));
            let _ = active.cancel.send(());
        }
    }
}
