// src/services/generator.rs
use async_trait::async_trait;
use std::fmt::Debug;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider blocked the prompt: {0}")]
    Blocked(String),
}

/// Anything that can turn a prompt into generated text.
#[async_trait]
pub trait Generator: Debug + Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Replies with the prompt it was given.
#[derive(Debug, Default, Clone)]
pub struct EchoGenerator;

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        Ok(prompt.to_string())
    }
}

/// Always fails, as if the provider were unreachable.
#[derive(Debug, Default, Clone)]
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Status {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}
