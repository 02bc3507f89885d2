//! Speech input and output for the JanSeva widget.
//!
//! Platform speech capabilities sit behind the [`SpeechRecognizer`] and
//! [`SpeechSynthesizer`] traits. The adapters in this crate own the
//! behavior the widget depends on: the listening lifecycle
//! (Idle -> Listening -> Idle), locale mapping, voice selection with the
//! Marathi -> Hindi fallback, and the one-utterance-at-a-time playback rule.

pub mod error;
pub mod input;
pub mod mock;
pub mod output;
pub mod platform;
pub mod state;
pub mod summary;

pub use error::SpeechError;
pub use input::{ListenOutcome, SpeechInputAdapter, SpeechRecognizer};
pub use mock::{MockRecognizer, MockSynthesizer, RecognizerStep, SynthEvent};
pub use output::{select_voice, SpeechOutputAdapter, SpeechSynthesizer, Utterance, VoiceChoice, VoiceInfo};
pub use platform::{UnavailableRecognizer, UnavailableSynthesizer};
pub use state::ListeningState;
pub use summary::SchemeSummary;
