//! Conversational core of the "Ask JanSeva" widget.
//!
//! Owns the message log and the send -> fetch -> append-reply exchange,
//! and wires the speech adapters and the reply fetcher together under the
//! shared language selection.

pub mod controller;
pub mod error;
pub mod fetcher;
pub mod strings;

pub use controller::{ChatSessionController, SendOutcome, SessionState, VoiceInputOutcome};
pub use error::ChatError;
pub use fetcher::{ChatReply, ChatRequest, HttpReplyFetcher, ReplyFetcher};
