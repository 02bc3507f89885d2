//! Listening state machine for voice capture.
//!
//! Valid transitions:
//! - Idle -> Listening (capture started)
//! - Listening -> Idle (capture ended: result, silence, stop or error)

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::SpeechError;

/// Whether voice capture is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListeningState {
    Idle,
    Listening,
}

impl fmt::Display for ListeningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListeningState::Idle => write!(f, "Idle"),
            ListeningState::Listening => write!(f, "Listening"),
        }
    }
}

impl ListeningState {
    pub fn can_transition_to(&self, target: &ListeningState) -> bool {
        matches!(
            (self, target),
            (ListeningState::Idle, ListeningState::Listening)
                | (ListeningState::Listening, ListeningState::Idle)
        )
    }
}

/// Shared, validated listening state.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: Arc<Mutex<ListeningState>>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ListeningState::Idle)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListeningState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> ListeningState {
        *self.lock()
    }

    /// Move to `target`, or fail without changing state.
    pub fn transition(&self, target: ListeningState) -> Result<(), SpeechError> {
        let mut state = self.lock();
        if state.can_transition_to(&target) {
            tracing::debug!("Listening state: {} -> {}", *state, target);
            *state = target;
            Ok(())
        } else {
            Err(SpeechError::InvalidTransition(format!(
                "{} -> {}",
                *state, target
            )))
        }
    }

    /// Force the machine back to Idle.
    pub fn reset(&self) {
        let mut state = self.lock();
        if *state != ListeningState::Idle {
            tracing::warn!("Listening state reset to Idle from {}", *state);
        }
        *state = ListeningState::Idle;
    }
}

// =============================================================================
// Tests
// =============================================================================
