use crate::context::ChatContext;
use crate::provider::ChatProvider;

/// What the user sees when the upstream provider is unreachable or broken.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't reach the assistant right now. Please try again in a moment.";

/// Forwards a user message plus a state snapshot to a provider, degrading
/// every failure to [`FALLBACK_REPLY`].
pub struct ChatRelay<P> {
    provider: P,
}

impl<P: ChatProvider> ChatRelay<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub async fn ask(&self, context: &ChatContext, message: &str) -> String {
        match self
            .provider
            .complete(&context.system_prompt(), message)
            .await
        {
            Ok(text) => text,
            Err(_) => FALLBACK_REPLY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ChatError;
    use async_trait::async_trait;

    struct Canned(Result<String, ChatError>);

    #[async_trait]
    impl ChatProvider for Canned {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, ChatError> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(ChatError::MissingCredentials) => Err(ChatError::MissingCredentials),
                Err(ChatError::Provider(m)) => Err(ChatError::Provider(m.clone())),
                Err(ChatError::Transport(m)) => Err(ChatError::Transport(m.clone())),
                Err(ChatError::Malformed(m)) => Err(ChatError::Malformed(m.clone())),
            }
        }
    }

    fn empty_context() -> ChatContext {
        ChatContext::new(vec![], vec![])
    }

    #[tokio::test]
    async fn relays_the_provider_reply() {
        let relay = ChatRelay::new(Canned(Ok("You have 4 kits.".to_string())));
        let reply = relay.ask(&empty_context(), "how many kits?").await;
        assert_eq!(reply, "You have 4 kits.");
    }

    #[tokio::test]
    async fn degrades_every_failure_to_the_apology() {
        for err in [
            ChatError::MissingCredentials,
            ChatError::Provider("429".to_string()),
            ChatError::Transport("connection refused".to_string()),
            ChatError::Malformed("not json".to_string()),
        ] {
            let relay = ChatRelay::new(Canned(Err(err)));
            let reply = relay.ask(&empty_context(), "hello").await;
            assert_eq!(reply, FALLBACK_REPLY);
        }
    }
}
