use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use kitflow_ai::{ChatError, ChatProvider};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";

/// Chat provider backed by the Anthropic messages API.
pub struct AnthropicChatProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl AnthropicChatProvider {
    /// `api_key: None` builds a provider that fails with
    /// `MissingCredentials` — the relay downgrades that to its apology, so
    /// an unconfigured deployment still serves the rest of the app.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl ChatProvider for AnthropicChatProvider {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, ChatError> {
        let api_key = self.api_key.as_deref().ok_or(ChatError::MissingCredentials)?;

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&json!({
                "model": self.model,
                "max_tokens": 1024,
                "system": system_prompt,
                "messages": [{"role": "user", "content": user_message}],
            }))
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Provider(format!("status {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ChatError::Malformed(e.to_string()))?;

        body["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ChatError::Malformed("no text content in response".to_string()))
    }
}
