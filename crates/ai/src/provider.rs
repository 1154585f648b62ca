use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat credentials are not configured")]
    MissingCredentials,

    #[error("chat provider rejected the request: {0}")]
    Provider(String),

    #[error("chat transport failed: {0}")]
    Transport(String),

    #[error("chat provider returned an unreadable body: {0}")]
    Malformed(String),
}

/// A hosted LLM the relay can forward a message to.
///
/// Implementations live in infra (HTTP adapters); tests use local fakes.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_message: &str)
    -> Result<String, ChatError>;
}
