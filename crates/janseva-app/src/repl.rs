//! Line-oriented front-end over the chat session controller.
//!
//! Plain text is sent as a message. Lines starting with `/` are commands.

use std::io::Write;
use std::sync::Arc;

use janseva_chat::{strings, ChatError, ChatSessionController, SendOutcome, VoiceInputOutcome};
use janseva_core::{Language, Message, MessageId};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

/// Command reference, with the widget labels in `language`.
pub fn help_text(language: Language) -> String {
    format!(
        "\
Commands:
  /lang <en|hi|mr>   switch language
  /voice             {voice}: fill the draft from the microphone
  /suggest [n]       {suggested}: list them, or put question n in the draft
  /draft             show the draft
  /send              {send}: send the draft
  /speak             {listen}: read the latest reply aloud
  /stop              {stop}: stop speaking
  /help              show this help
  /quit              exit
Anything else is sent as a message.",
        voice = strings::VOICE_INPUT.get(language),
        suggested = strings::SUGGESTED_HEADING.get(language),
        send = strings::SEND.get(language),
        listen = strings::LISTEN.get(language),
        stop = strings::STOP.get(language),
    )
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Language(Language),
    Voice,
    Suggestions,
    Suggest(usize),
    ShowDraft,
    Send,
    Speak,
    Stop,
    Help,
    Quit,
    Invalid(String),
    Nothing,
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Nothing;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Say(line.trim_end_matches(['\r', '\n']).to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();
    match (name, arg) {
        ("lang", Some(code)) => match code.parse() {
            Ok(language) => Command::Language(language),
            Err(e) => Command::Invalid(e.to_string()),
        },
        ("lang", None) => Command::Invalid("usage: /lang <en|hi|mr>".to_string()),
        ("voice", _) => Command::Voice,
        ("suggest", None) => Command::Suggestions,
        ("suggest", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Suggest(n - 1),
            _ => Command::Invalid(format!("not a question number: {n}")),
        },
        ("draft", _) => Command::ShowDraft,
        ("send", _) => Command::Send,
        ("speak", _) => Command::Speak,
        ("stop", _) => Command::Stop,
        ("help", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        _ => Command::Invalid(format!("unknown command: /{name}")),
    }
}

/// Print each message once, as the session publishes it.
///
/// Runs until the controller is dropped.
fn spawn_transcript(controller: &ChatSessionController) -> JoinHandle<()> {
    let mut updates = controller.subscribe();
    tokio::spawn(async move {
        let mut last_shown: Option<MessageId> = None;
        loop {
            let fresh: Vec<Message> = updates
                .borrow_and_update()
                .messages()
                .iter()
                .filter(|m| last_shown.map_or(true, |id| m.id > id))
                .cloned()
                .collect();
            for message in fresh {
                let who = if message.is_user() { "you" } else { "janseva" };
                println!("[{who}] {}", message.text);
                last_shown = Some(message.id);
            }
            if updates.changed().await.is_err() {
                break;
            }
        }
    })
}

/// Read stdin until EOF or `/quit`.
pub async fn run(controller: Arc<ChatSessionController>) -> std::io::Result<()> {
    let language = controller.language().current();
    println!("{}: {}", strings::TITLE.get(language), strings::SUBTITLE.get(language));
    println!("{} (/help)\n", strings::PLACEHOLDER.get(language));

    let transcript = spawn_transcript(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Command::Nothing => {}
            Command::Quit => break,
            Command::Help => println!("{}", help_text(controller.language().current())),
            Command::Invalid(reason) => println!("{reason}"),
            Command::Say(text) => {
                controller.update_draft(text);
                report_send(controller.send().await);
            }
            Command::Send => report_send(controller.send().await),
            Command::ShowDraft => println!("draft: {}", controller.draft()),
            Command::Language(language) => {
                controller.language().set_current(language);
                println!("{} ({})", language.native_name(), language.code());
            }
            Command::Voice => match controller.request_voice_input().await {
                Ok(VoiceInputOutcome::Transcribed(text)) => println!("draft: {text}"),
                Ok(VoiceInputOutcome::NoSpeech) => println!("(no speech heard)"),
                Ok(VoiceInputOutcome::AlreadyListening) => println!("(already listening)"),
                Err(ChatError::VoiceInputUnavailable) => {
                    println!("{}", controller.voice_unsupported_notice())
                }
                Err(e) => tracing::warn!(error = %e, "Voice input failed"),
            },
            Command::Suggestions => {
                let language = controller.language().current();
                println!("{}:", strings::SUGGESTED_HEADING.get(language));
                for (i, question) in controller.suggested_questions().iter().enumerate() {
                    println!("  {}. {question}", i + 1);
                }
            }
            Command::Suggest(index) => {
                if controller.use_suggestion(index) {
                    println!("draft: {}", controller.draft());
                } else {
                    println!("no suggested question {}", index + 1);
                }
            }
            Command::Speak => {
                let latest = controller
                    .messages()
                    .into_iter()
                    .rev()
                    .find(|m| !m.is_user());
                if let Some(message) = latest {
                    controller.request_speak(&message);
                }
            }
            Command::Stop => controller.stop_speaking(),
        }
    }
    transcript.abort();
    Ok(())
}

fn report_send(outcome: SendOutcome) {
    match outcome {
        SendOutcome::Replied | SendOutcome::FellBack => {}
        SendOutcome::EmptyDraft => println!("(nothing to send)"),
        SendOutcome::Busy => println!("(still waiting for the last reply)"),
    }
}
