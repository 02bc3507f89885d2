//! Reply fetching from the JanSeva backend.
//!
//! One `POST {base_url}/chat` per utterance. No retry, caching or
//! localization happens here; the controller turns failures into the
//! fallback message.

use std::time::Duration;

use async_trait::async_trait;
use janseva_core::config::BackendConfig;
use janseva_core::Language;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Something that can answer an utterance.
#[async_trait]
pub trait ReplyFetcher: Send + Sync {
    /// Ask for a reply to `utterance` in `language`.
    async fn fetch(&self, utterance: &str, language: Language) -> Result<String, ChatError>;
}

/// Request body for `/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub language: Language,
    /// Always false: speech is produced on the client.
    pub enable_tts: bool,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, language: Language) -> Self {
        Self {
            message: message.into(),
            language,
            enable_tts: false,
        }
    }
}

/// The part of the `/chat` response the widget consumes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// [`ReplyFetcher`] backed by the HTTP chat endpoint.
#[derive(Debug, Clone)]
pub struct HttpReplyFetcher {
    client: Client,
    endpoint: String,
}

impl HttpReplyFetcher {
    /// Fetcher for `{base_url}/chat` using the transport's default timeout.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: chat_endpoint(base_url),
        }
    }

    /// Fetcher built from the `[backend]` configuration section.
    pub fn from_config(config: &BackendConfig) -> Result<Self, ChatError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ChatError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: chat_endpoint(&config.base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat", base_url.trim_end_matches('/'))
}

#[async_trait]
impl ReplyFetcher for HttpReplyFetcher {
    async fn fetch(&self, utterance: &str, language: Language) -> Result<String, ChatError> {
        let body = ChatRequest::new(utterance, language);
        tracing::debug!(endpoint = %self.endpoint, language = %language, "Requesting reply");

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ChatError::Status(status.as_u16()));
        }

        let reply: ChatReply = resp
            .json()
            .await
            .map_err(|e| ChatError::MalformedReply(e.to_string()))?;
        Ok(reply.reply)
    }
}
