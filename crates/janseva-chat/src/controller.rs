//! Chat session controller: the state machine behind the widget.
//!
//! Each exchange moves Idle -> AwaitingReply -> Idle. The controller owns the
//! append-only message log and the draft, publishes a [`SessionState`]
//! snapshot on every change, and delegates voice capture and playback to
//! the speech adapters.

use std::sync::{Arc, Weak};

use janseva_core::{Language, LanguageSelection, Message, MessageIdGenerator, Origin};
use janseva_speech::{ListenOutcome, SchemeSummary, SpeechInputAdapter, SpeechOutputAdapter};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::ChatError;
use crate::fetcher::ReplyFetcher;
use crate::strings;

/// Everything the presentational layer renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    messages: Vec<Message>,
    draft: String,
    pending_reply: bool,
    listening: bool,
    /// The log holds only the synthesized greeting.
    greeting_only: bool,
}

impl SessionState {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_pending(&self) -> bool {
        self.pending_reply
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }
}

/// Result of [`ChatSessionController::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The backend's reply was appended.
    Replied,
    /// The fetch failed and the localized fallback was appended.
    FellBack,
    /// The draft was blank; nothing happened.
    EmptyDraft,
    /// Another reply is still pending; nothing happened.
    Busy,
}

/// Result of [`ChatSessionController::request_voice_input`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceInputOutcome {
    /// The draft now holds this transcript.
    Transcribed(String),
    NoSpeech,
    AlreadyListening,
}

struct PendingExchange {
    utterance: String,
    language: Language,
}

enum Activity {
    Reply,
    Voice,
}

/// Clears a busy flag however the owning future ends.
struct Settle<'a> {
    controller: &'a ChatSessionController,
    activity: Activity,
}

impl Drop for Settle<'_> {
    fn drop(&mut self) {
        match self.activity {
            Activity::Reply => self.controller.clear_pending(),
            Activity::Voice => self.controller.sync_listening(),
        }
    }
}

pub struct ChatSessionController {
    language: LanguageSelection,
    fetcher: Arc<dyn ReplyFetcher>,
    voice_input: SpeechInputAdapter,
    voice_output: SpeechOutputAdapter,
    ids: MessageIdGenerator,
    state: watch::Sender<SessionState>,
}

impl ChatSessionController {
    pub fn new(
        language: LanguageSelection,
        fetcher: Arc<dyn ReplyFetcher>,
        voice_input: SpeechInputAdapter,
        voice_output: SpeechOutputAdapter,
    ) -> Self {
        let (state, _rx) = watch::channel(SessionState::default());
        Self {
            language,
            fetcher,
            voice_input,
            voice_output,
            ids: MessageIdGenerator::new(),
            state,
        }
    }

    pub fn language(&self) -> &LanguageSelection {
        &self.language
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.borrow().messages.clone()
    }

    pub fn draft(&self) -> String {
        self.state.borrow().draft.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().pending_reply
    }

    pub fn is_listening(&self) -> bool {
        self.state.borrow().listening
    }

    pub fn is_speaking(&self) -> bool {
        self.voice_output.is_speaking()
    }

    // -- Greeting --

    /// Seed the log with a greeting in the current language if it is empty.
    pub fn initialize(&self) {
        let language = self.language.current();
        self.state.send_if_modified(|state| {
            if !state.messages.is_empty() {
                return false;
            }
            state.messages.push(self.greeting(language));
            state.greeting_only = true;
            true
        });
    }

    /// React to a language change: the greeting is regenerated while it is
    /// still the only message. Real history is never touched.
    pub fn apply_language(&self, language: Language) {
        let reseeded = self.state.send_if_modified(|state| {
            if !(state.messages.is_empty() || state.greeting_only) {
                return false;
            }
            let greeting = strings::GREETING.get(language);
            if state.greeting_only && state.messages.iter().all(|m| m.text == greeting) {
                return false;
            }
            state.messages.clear();
            state.messages.push(self.greeting(language));
            state.greeting_only = true;
            true
        });
        if reseeded {
            debug!(language = %language, "Greeting regenerated");
        }
    }

    /// Keep the greeting in step with the language selection.
    ///
    /// The task ends once the controller is dropped.
    pub fn spawn_language_watch(self: &Arc<Self>) -> JoinHandle<()> {
        let mut changes = self.language.subscribe();
        let controller: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let language = *changes.borrow_and_update();
                let Some(controller) = controller.upgrade() else {
                    break;
                };
                controller.apply_language(language);
            }
        })
    }

    fn greeting(&self, language: Language) -> Message {
        Message::new(self.ids.next_id(), strings::GREETING.get(language), Origin::Assistant)
    }

    // -- Draft --

    pub fn update_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|state| state.draft = text);
    }

    /// The suggested questions in the current language.
    pub fn suggested_questions(&self) -> Vec<&'static str> {
        let language = self.language.current();
        strings::SUGGESTED_QUESTIONS
            .iter()
            .map(|q| q.get(language))
            .collect()
    }

    /// Put suggested question `index` into the draft. Returns `false` for an
    /// index out of range.
    pub fn use_suggestion(&self, index: usize) -> bool {
        match strings::SUGGESTED_QUESTIONS.get(index) {
            Some(question) => {
                self.update_draft(question.get(self.language.current()));
                true
            }
            None => false,
        }
    }

    // -- Exchange --

    /// Send the draft and append the reply, or the fallback on failure.
    ///
    /// Blank drafts are ignored, and so is a send while a reply is pending.
    pub async fn send(&self) -> SendOutcome {
        let exchange = match self.begin_send() {
            Ok(exchange) => exchange,
            Err(outcome) => return outcome,
        };
        let _settle = Settle {
            controller: self,
            activity: Activity::Reply,
        };
        let result = self
            .fetcher
            .fetch(&exchange.utterance, exchange.language)
            .await;
        self.complete_send(exchange, result)
    }

    /// Idle -> AwaitingReply: append the user message and clear the draft.
    fn begin_send(&self) -> Result<PendingExchange, SendOutcome> {
        let language = self.language.current();
        let mut outcome = Err(SendOutcome::EmptyDraft);
        self.state.send_if_modified(|state| {
            if state.pending_reply {
                outcome = Err(SendOutcome::Busy);
                return false;
            }
            if state.draft.trim().is_empty() {
                return false;
            }
            let utterance = std::mem::take(&mut state.draft);
            state
                .messages
                .push(Message::new(self.ids.next_id(), utterance.clone(), Origin::User));
            state.greeting_only = false;
            state.pending_reply = true;
            outcome = Ok(PendingExchange { utterance, language });
            true
        });
        match &outcome {
            Ok(exchange) => info!(
                language = %exchange.language,
                utterance_len = exchange.utterance.len(),
                "Message sent"
            ),
            Err(SendOutcome::Busy) => debug!("Send ignored: reply pending"),
            Err(_) => debug!("Send ignored: empty draft"),
        }
        outcome
    }

    /// AwaitingReply -> Idle: append the reply or the fallback.
    fn complete_send(
        &self,
        exchange: PendingExchange,
        result: Result<String, ChatError>,
    ) -> SendOutcome {
        let (text, outcome) = match result {
            Ok(reply) => {
                info!(reply_len = reply.len(), "Reply received");
                (reply, SendOutcome::Replied)
            }
            Err(e) => {
                warn!(error = %e, "Reply fetch failed; showing fallback");
                (
                    strings::OUT_OF_SCOPE.get(exchange.language).to_string(),
                    SendOutcome::FellBack,
                )
            }
        };
        self.state.send_modify(|state| {
            state
                .messages
                .push(Message::new(self.ids.next_id(), text, Origin::Assistant));
            state.pending_reply = false;
        });
        outcome
    }

    fn clear_pending(&self) {
        self.state.send_if_modified(|state| {
            let was_pending = state.pending_reply;
            state.pending_reply = false;
            was_pending
        });
    }

    // -- Voice input --

    /// Capture speech in the current language and overwrite the draft with
    /// the transcript. Never sends.
    ///
    /// Fails with [`ChatError::VoiceInputUnavailable`] when the platform has
    /// no recognizer; show [`voice_unsupported_notice`] to the user then.
    ///
    /// [`voice_unsupported_notice`]: Self::voice_unsupported_notice
    pub async fn request_voice_input(&self) -> Result<VoiceInputOutcome, ChatError> {
        if !self.voice_input.is_supported() {
            warn!("Voice input requested but not supported");
            return Err(ChatError::VoiceInputUnavailable);
        }
        if self.voice_input.is_listening() {
            return Ok(VoiceInputOutcome::AlreadyListening);
        }

        let language = self.language.current();
        self.set_listening(true);
        let _settle = Settle {
            controller: self,
            activity: Activity::Voice,
        };

        match self.voice_input.listen(language).await? {
            ListenOutcome::Transcript(text) => {
                self.update_draft(text.clone());
                Ok(VoiceInputOutcome::Transcribed(text))
            }
            ListenOutcome::Silence => Ok(VoiceInputOutcome::NoSpeech),
            ListenOutcome::AlreadyListening => Ok(VoiceInputOutcome::AlreadyListening),
        }
    }

    /// End voice capture early.
    pub fn stop_voice_input(&self) {
        self.voice_input.stop();
    }

    pub fn voice_unsupported_notice(&self) -> &'static str {
        strings::VOICE_UNSUPPORTED.get(self.language.current())
    }

    fn set_listening(&self, listening: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.listening != listening;
            state.listening = listening;
            changed
        });
    }

    fn sync_listening(&self) {
        self.set_listening(self.voice_input.is_listening());
    }

    // -- Voice output --

    /// Read a message aloud in the current language.
    pub fn request_speak(&self, message: &Message) {
        self.voice_output
            .speak(&message.text, self.language.current());
    }

    /// Scheme card "Listen"/"Stop" button. Returns whether playback started.
    pub fn speak_scheme(&self, summary: &SchemeSummary) -> bool {
        let language = self.language.current();
        self.voice_output
            .toggle(&summary.narration(language), language)
    }

    pub fn stop_speaking(&self) {
        self.voice_output.cancel();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use janseva_core::config::SpeechConfig;
    use janseva_speech::{MockRecognizer, MockSynthesizer, RecognizerStep, SynthEvent};
    use tokio::sync::Notify;

    /// Fetcher that answers from a script, optionally waiting for a signal.
    #[derive(Default)]
    struct ScriptedFetcher {
        replies: Mutex<VecDeque<Result<String, ChatError>>>,
        calls: Mutex<Vec<(String, Language)>>,
        gate: Option<Notify>,
    }

    impl ScriptedFetcher {
        fn replying(replies: Vec<Result<String, ChatError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                ..Default::default()
            }
        }

        fn gated(replies: Vec<Result<String, ChatError>>) -> Self {
            Self {
                gate: Some(Notify::new()),
                ..Self::replying(replies)
            }
        }

        fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.notify_one();
            }
        }

        fn calls(&self) -> Vec<(String, Language)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReplyFetcher for ScriptedFetcher {
        async fn fetch(&self, utterance: &str, language: Language) -> Result<String, ChatError> {
            self.calls
                .lock()
                .unwrap()
                .push((utterance.to_string(), language));
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let next = self.replies.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Err(ChatError::Transport("script exhausted".into())))
        }
    }

    struct Harness {
        controller: Arc<ChatSessionController>,
        fetcher: Arc<ScriptedFetcher>,
        recognizer: Arc<MockRecognizer>,
        synthesizer: Arc<MockSynthesizer>,
    }

    fn harness_with(
        language: Language,
        fetcher: ScriptedFetcher,
        recognizer: MockRecognizer,
        synthesizer: MockSynthesizer,
    ) -> Harness {
        let fetcher = Arc::new(fetcher);
        let recognizer = Arc::new(recognizer);
        let synthesizer = Arc::new(synthesizer);
        let controller = Arc::new(ChatSessionController::new(
            LanguageSelection::new(language),
            fetcher.clone(),
            SpeechInputAdapter::new(recognizer.clone()),
            SpeechOutputAdapter::new(synthesizer.clone(), &SpeechConfig::default()),
        ));
        controller.initialize();
        Harness {
            controller,
            fetcher,
            recognizer,
            synthesizer,
        }
    }

    fn harness(language: Language, fetcher: ScriptedFetcher) -> Harness {
        harness_with(language, fetcher, MockRecognizer::new(), MockSynthesizer::new())
    }

    // ---- Greeting ----

    #[test]
    fn test_initialize_seeds_greeting_in_every_language() {
        for lang in Language::ALL {
            let h = harness(lang, ScriptedFetcher::default());
            let messages = h.controller.messages();
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].origin, Origin::Assistant);
            assert_eq!(messages[0].text, strings::GREETING.get(lang));
        }
    }

    #[test]
    fn test_initialize_twice_keeps_single_greeting() {
        let h = harness(Language::Marathi, ScriptedFetcher::default());
        h.controller.initialize();
        assert_eq!(h.controller.messages().len(), 1);
    }

    #[test]
    fn test_language_change_replaces_lone_greeting() {
        let h = harness(Language::Marathi, ScriptedFetcher::default());
        let before = h.controller.messages()[0].id;

        h.controller.apply_language(Language::English);
        let messages = h.controller.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, strings::GREETING.en);
        assert!(messages[0].id > before);

        // Same language again leaves the greeting alone.
        h.controller.apply_language(Language::English);
        assert_eq!(h.controller.messages()[0].id, messages[0].id);
    }

    #[tokio::test]
    async fn test_language_change_keeps_real_history() {
        let h = harness(
            Language::English,
            ScriptedFetcher::replying(vec![Ok("R".into())]),
        );
        h.controller.update_draft("hello");
        h.controller.send().await;

        h.controller.apply_language(Language::Hindi);
        let messages = h.controller.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].text, strings::GREETING.en);
    }

    #[tokio::test]
    async fn test_language_watch_reseeds_greeting() {
        let h = harness(Language::Marathi, ScriptedFetcher::default());
        let watch = h.controller.spawn_language_watch();
        let mut rx = h.controller.subscribe();

        h.controller.language().set_current(Language::Hindi);
        tokio::time::timeout(
            Duration::from_secs(2),
            rx.wait_for(|s| s.messages()[0].text == strings::GREETING.hi),
        )
        .await
        .unwrap()
        .unwrap();
        watch.abort();
    }

    // ---- Send ----

    #[tokio::test]
    async fn test_send_appends_user_and_reply() {
        let h = harness(
            Language::English,
            ScriptedFetcher::replying(vec![Ok("Girls born after 2016 can apply.".into())]),
        );
        h.controller.update_draft("Who can apply for scheme X?");

        let outcome = h.controller.send().await;
        assert_eq!(outcome, SendOutcome::Replied);

        let messages = h.controller.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].origin, Origin::User);
        assert_eq!(messages[1].text, "Who can apply for scheme X?");
        assert_eq!(messages[2].origin, Origin::Assistant);
        assert_eq!(messages[2].text, "Girls born after 2016 can apply.");
        assert!(messages[0].id < messages[1].id && messages[1].id < messages[2].id);
        assert_eq!(h.controller.draft(), "");
        assert!(!h.controller.is_pending());
        assert_eq!(
            h.fetcher.calls(),
            vec![("Who can apply for scheme X?".to_string(), Language::English)]
        );
    }

    #[tokio::test]
    async fn test_send_keeps_draft_verbatim() {
        let h = harness(Language::Hindi, ScriptedFetcher::replying(vec![Ok("R".into())]));
        h.controller.update_draft("  line one\nline two  ");
        h.controller.send().await;
        assert_eq!(h.controller.messages()[1].text, "  line one\nline two  ");
        assert_eq!(h.fetcher.calls()[0].0, "  line one\nline two  ");
    }

    #[tokio::test]
    async fn test_failure_appends_localized_fallback() {
        for (lang, err) in [
            (Language::English, ChatError::Transport("refused".into())),
            (Language::Hindi, ChatError::Status(500)),
            (Language::Marathi, ChatError::MalformedReply("no reply".into())),
        ] {
            let h = harness(lang, ScriptedFetcher::replying(vec![Err(err)]));
            h.controller.update_draft("question");
            assert_eq!(h.controller.send().await, SendOutcome::FellBack);

            let messages = h.controller.messages();
            assert_eq!(messages.len(), 3);
            assert_eq!(messages[2].text, strings::OUT_OF_SCOPE.get(lang));
            assert!(!h.controller.is_pending());
        }
    }

    #[tokio::test]
    async fn test_blank_draft_is_ignored() {
        let h = harness(Language::English, ScriptedFetcher::default());
        for draft in ["", "   ", "\n\t"] {
            h.controller.update_draft(draft);
            assert_eq!(h.controller.send().await, SendOutcome::EmptyDraft);
            assert_eq!(h.controller.messages().len(), 1);
            assert_eq!(h.controller.draft(), draft);
        }
        assert!(h.fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_pending_flag_and_busy_rejection() {
        let h = harness(
            Language::English,
            ScriptedFetcher::gated(vec![Ok("first reply".into())]),
        );
        h.controller.update_draft("first");

        let first = {
            let controller = Arc::clone(&h.controller);
            tokio::spawn(async move { controller.send().await })
        };
        while !h.controller.is_pending() {
            tokio::task::yield_now().await;
        }
        assert_eq!(h.controller.draft(), "");

        h.controller.update_draft("second");
        assert_eq!(h.controller.send().await, SendOutcome::Busy);
        assert_eq!(h.controller.draft(), "second");
        assert_eq!(h.controller.messages().len(), 2);

        h.fetcher.release();
        assert_eq!(first.await.unwrap(), SendOutcome::Replied);
        assert!(!h.controller.is_pending());
        assert_eq!(h.controller.messages()[2].text, "first reply");

        h.fetcher.release();
        assert_eq!(h.controller.send().await, SendOutcome::FellBack);
        let messages = h.controller.messages();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[3].text, "second");
        assert_eq!(messages[4].text, strings::OUT_OF_SCOPE.en);
    }

    #[tokio::test]
    async fn test_dropped_send_clears_pending() {
        let h = harness(Language::English, ScriptedFetcher::gated(vec![]));
        h.controller.update_draft("never answered");
        let timed =
            tokio::time::timeout(Duration::from_millis(10), h.controller.send()).await;
        assert!(timed.is_err());
        assert!(!h.controller.is_pending());
    }

    #[tokio::test]
    async fn test_fallback_uses_dispatch_language() {
        let h = harness(
            Language::Hindi,
            ScriptedFetcher::gated(vec![Err(ChatError::Status(503))]),
        );
        h.controller.update_draft("question");
        let send = {
            let controller = Arc::clone(&h.controller);
            tokio::spawn(async move { controller.send().await })
        };
        while !h.controller.is_pending() {
            tokio::task::yield_now().await;
        }
        h.controller.language().set_current(Language::English);
        h.fetcher.release();
        send.await.unwrap();
        assert_eq!(h.controller.messages()[2].text, strings::OUT_OF_SCOPE.hi);
    }

    #[tokio::test]
    async fn test_subscribers_see_pending_then_reply() {
        let h = harness(
            Language::English,
            ScriptedFetcher::gated(vec![Ok("R".into())]),
        );
        let mut rx = h.controller.subscribe();
        h.controller.update_draft("q");
        let send = {
            let controller = Arc::clone(&h.controller);
            tokio::spawn(async move { controller.send().await })
        };

        let pending = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| s.is_pending()))
            .await
            .unwrap()
            .unwrap()
            .clone();
        assert_eq!(pending.messages().len(), 2);
        assert_eq!(pending.draft(), "");

        h.fetcher.release();
        let settled = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| !s.is_pending()))
            .await
            .unwrap()
            .unwrap()
            .clone();
        assert_eq!(settled.messages().len(), 3);
        assert_eq!(settled.messages()[2].text, "R");
        assert_eq!(send.await.unwrap(), SendOutcome::Replied);
        assert_eq!(settled, h.controller.snapshot());
    }

    // ---- Suggestions ----

    #[test]
    fn test_suggestions_fill_draft_without_sending() {
        let h = harness(Language::Marathi, ScriptedFetcher::default());
        assert_eq!(h.controller.suggested_questions().len(), 3);
        assert!(h.controller.use_suggestion(2));
        assert_eq!(h.controller.draft(), strings::SUGGESTED_QUESTIONS[2].mr);
        assert_eq!(h.controller.messages().len(), 1);
        assert!(!h.controller.use_suggestion(3));
    }

    // ---- Voice input ----

    #[tokio::test]
    async fn test_transcript_overwrites_draft() {
        let h = harness_with(
            Language::Hindi,
            ScriptedFetcher::default(),
            MockRecognizer::with_steps(vec![RecognizerStep::Transcript("xyz".into())]),
            MockSynthesizer::new(),
        );
        h.controller.update_draft("abc");

        let outcome = h.controller.request_voice_input().await.unwrap();
        assert_eq!(outcome, VoiceInputOutcome::Transcribed("xyz".into()));
        assert_eq!(h.controller.draft(), "xyz");
        assert_eq!(h.controller.messages().len(), 1);
        assert!(!h.controller.is_listening());
        assert_eq!(h.recognizer.locales(), vec!["hi-IN".to_string()]);
    }

    #[tokio::test]
    async fn test_silence_keeps_draft() {
        let h = harness(Language::English, ScriptedFetcher::default());
        h.controller.update_draft("abc");
        let outcome = h.controller.request_voice_input().await.unwrap();
        assert_eq!(outcome, VoiceInputOutcome::NoSpeech);
        assert_eq!(h.controller.draft(), "abc");
    }

    #[tokio::test]
    async fn test_voice_input_unavailable_is_reported() {
        let h = harness_with(
            Language::Marathi,
            ScriptedFetcher::default(),
            MockRecognizer::unsupported(),
            MockSynthesizer::new(),
        );
        let err = h.controller.request_voice_input().await.unwrap_err();
        assert!(matches!(err, ChatError::VoiceInputUnavailable));
        assert_eq!(
            h.controller.voice_unsupported_notice(),
            strings::VOICE_UNSUPPORTED.mr
        );
        assert!(!h.controller.is_listening());
    }

    #[tokio::test]
    async fn test_listening_flag_and_restart_is_noop() {
        let h = harness_with(
            Language::English,
            ScriptedFetcher::default(),
            MockRecognizer::with_steps(vec![RecognizerStep::WaitForStop]),
            MockSynthesizer::new(),
        );
        let first = {
            let controller = Arc::clone(&h.controller);
            tokio::spawn(async move { controller.request_voice_input().await })
        };
        while h.recognizer.locales().is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(h.controller.is_listening());

        let second = h.controller.request_voice_input().await.unwrap();
        assert_eq!(second, VoiceInputOutcome::AlreadyListening);
        assert!(h.controller.is_listening());

        h.controller.stop_voice_input();
        assert_eq!(first.await.unwrap().unwrap(), VoiceInputOutcome::NoSpeech);
        assert!(!h.controller.is_listening());
    }

    #[tokio::test]
    async fn test_voice_input_while_reply_pending() {
        let h = harness_with(
            Language::English,
            ScriptedFetcher::gated(vec![Ok("R".into())]),
            MockRecognizer::with_steps(vec![RecognizerStep::Transcript("next".into())]),
            MockSynthesizer::new(),
        );
        h.controller.update_draft("first");
        let send = {
            let controller = Arc::clone(&h.controller);
            tokio::spawn(async move { controller.send().await })
        };
        while !h.controller.is_pending() {
            tokio::task::yield_now().await;
        }
        h.controller.request_voice_input().await.unwrap();
        assert_eq!(h.controller.draft(), "next");
        assert!(h.controller.is_pending());

        h.fetcher.release();
        send.await.unwrap();
        assert_eq!(h.controller.draft(), "next");
    }

    // ---- Voice output ----

    #[tokio::test]
    async fn test_request_speak_replaces_previous_utterance() {
        let h = harness_with(
            Language::English,
            ScriptedFetcher::default(),
            MockRecognizer::new(),
            MockSynthesizer::new().with_duration(Duration::from_millis(50)),
        );
        let a = Message::new(janseva_core::MessageId(100), "A", Origin::Assistant);
        let b = Message::new(janseva_core::MessageId(101), "B", Origin::Assistant);

        h.controller.request_speak(&a);
        while h.synthesizer.events().is_empty() {
            tokio::task::yield_now().await;
        }
        h.controller.request_speak(&b);

        let mut speaking = h.controller.voice_output.subscribe_speaking();
        tokio::time::timeout(Duration::from_secs(2), speaking.wait_for(|s| !*s))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            h.synthesizer.events(),
            vec![
                SynthEvent::Started("A".into()),
                SynthEvent::Cancelled("A".into()),
                SynthEvent::Started("B".into()),
                SynthEvent::Finished("B".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_speak_scheme_toggles() {
        let h = harness_with(
            Language::Marathi,
            ScriptedFetcher::default(),
            MockRecognizer::new(),
            MockSynthesizer::new().with_duration(Duration::from_millis(200)),
        );
        let summary = SchemeSummary {
            name: "योजना".into(),
            description: "वर्णन".into(),
            eligibility: vec!["अट".into()],
            benefits: vec!["लाभ".into()],
        };
        assert!(h.controller.speak_scheme(&summary));
        assert!(h.controller.is_speaking());
        assert!(!h.controller.speak_scheme(&summary));
        assert!(!h.controller.is_speaking());
        h.controller.stop_speaking();
    }
}
