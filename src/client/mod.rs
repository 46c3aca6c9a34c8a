// src/client/mod.rs
//! Chat widget logic: turns, status handling and reply rendering.
//!
//! Each submission is independent. Only the raw message is sent, no
//! history travels with it.
pub mod chat_log;
pub mod transport;

use tracing::{debug, warn};

use crate::message::ChatReply;
pub use chat_log::{ChatLog, PendingTurn, RenderedReply, SettledTurn, Turn, TurnId, TurnState};
pub use transport::{ChatTransport, HttpReply, HttpTransport};

pub const FORBIDDEN_MESSAGE: &str = "API Key is invalid or forbidden. Please check that the \
Gemini API is enabled in your Google Cloud project and that the key is configured correctly.";
pub const EMPTY_REPLY_FALLBACK: &str = "My oven is acting up! Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{}", FORBIDDEN_MESSAGE)]
    Forbidden,
    #[error("API error: {0}")]
    Api(u16),
    #[error("{0}")]
    Network(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

/// Maps an endpoint answer to the text to show, or the error to display.
pub fn interpret(reply: &HttpReply) -> Result<String, ClientError> {
    match reply.status {
        403 => Err(ClientError::Forbidden),
        _ if !reply.is_success() => Err(ClientError::Api(reply.status)),
        _ => {
            let text = serde_json::from_str::<ChatReply>(&reply.body)
                .map(|r| r.reply)
                .unwrap_or_default();
            if text.is_empty() {
                Ok(EMPTY_REPLY_FALLBACK.to_string())
            } else {
                Ok(text)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatClient<T> {
    transport: T,
}

impl<T: ChatTransport> ChatClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Posts one message and interprets the answer.
    pub async fn fetch(&self, message: &str) -> Result<String, ClientError> {
        let reply = self.transport.post_chat(message).await?;
        interpret(&reply)
    }

    /// Fetches the reply for a started turn. The log is not borrowed while
    /// the request is in flight, so several turns can be pending at once.
    pub async fn complete(&self, pending: PendingTurn) -> SettledTurn {
        let outcome = self.fetch(&pending.message).await.map_err(|err| {
            warn!(error = %err, "chat request failed");
            err.to_string()
        });
        debug!(ok = outcome.is_ok(), "turn settled");
        SettledTurn {
            id: pending.id,
            outcome,
        }
    }

    /// Runs one full turn. Blank input adds nothing and sends nothing.
    pub async fn submit(&self, log: &mut ChatLog, input: &str) -> Option<TurnId> {
        let pending = log.start(input)?;
        let settled = self.complete(pending).await;
        let id = settled.id;
        log.settle(settled);
        Some(id)
    }
}
