//! Infra-side adapters for the pure `kitflow-ai` boundary: the HTTP chat
//! provider and the snapshot builder that feeds current store state into
//! the relay.

mod anthropic;
mod snapshot;

pub use anthropic::AnthropicChatProvider;
pub use snapshot::chat_context;
