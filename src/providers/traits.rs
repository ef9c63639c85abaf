//! Provider trait for the chat capability.

use async_trait::async_trait;

use crate::Result;
use crate::types::{ChatOptions, ChatResponse, Message};

/// A backend that can answer one chat request for a named model.
///
/// Implementations self-report failure through the error taxonomy:
/// rate limits and timeouts are transient (the fallback chain backs off
/// and retries the same model), everything else advances the chain to the
/// next candidate model.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Non-streaming chat completion against `options.model`.
    async fn chat(&self, messages: &[Message], options: &ChatOptions) -> Result<ChatResponse>;
}
