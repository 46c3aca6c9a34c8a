// src/client/transport.rs
use async_trait::async_trait;
use reqwest::Client;

use super::ClientError;
use crate::message::ChatRequest;

/// Status and raw body of an answer from the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn post_chat(&self, message: &str) -> Result<HttpReply, ClientError>;
}

/// Posts `{"message": ...}` to `{base_url}/api/chat`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn post_chat(&self, message: &str) -> Result<HttpReply, ClientError> {
        let res = self
            .client
            .post(self.endpoint())
            .json(&ChatRequest::new(message))
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res.text().await?;
        Ok(HttpReply { status, body })
    }
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for &T {
    async fn post_chat(&self, message: &str) -> Result<HttpReply, ClientError> {
        (**self).post_chat(message).await
    }
}
