//! `kitflow-ai`
//!
//! **Responsibility:** the chat-assistant relay boundary.
//!
//! This crate is intentionally **not** part of the domain model:
//! - It must not depend on kitflow record crates (kits/assignments/etc).
//! - It must not mutate domain state.
//! - Callers hand it plain snapshots; it hands back free text.
//!
//! Provider failures never propagate: the relay degrades to a fixed
//! apology so a broken upstream can't take the page down with it.

pub mod context;
pub mod provider;
pub mod relay;

pub use context::{ChatContext, InventorySummaryLine, KIT_SNAPSHOT_LIMIT, KitSnapshot};
pub use provider::{ChatError, ChatProvider};
pub use relay::{ChatRelay, FALLBACK_REPLY};
