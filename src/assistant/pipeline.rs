//! The request pipeline behind the transport-facing surface.
//!
//! One [`Assistant`] owns the fallback chain, the response cache, and the
//! per-user stores. Every public entry point resolves to a reply string:
//! failures anywhere below this boundary are logged and mapped to a short
//! in-character fallback, never surfaced to the transport as an error.
//!
//! # Converse flow
//!
//! Context lookup → append the user turn → cache check (only when the
//! context was empty) → model call with retry/fallback → truncation →
//! history update → cache write (again only context-free). Caching is
//! deliberately restricted to context-free queries: once a user has
//! conversation state, the model is always consulted so replies can build
//! on the dialogue, even if the cache holds the same raw text.

use std::time::Instant;

use tracing::{error, info};

use crate::cache::{CacheStats, ResponseCache};
use crate::conversation::ConversationStore;
use crate::pagination::PaginationStore;
use crate::prompts;
use crate::providers::FallbackChain;
use crate::render;
use crate::telemetry;
use crate::types::{Category, ChatOptions, Message, Role};
use crate::Result;

/// Token budget for the conversation context window.
const CONTEXT_TOKEN_BUDGET: usize = 3000;

/// Output token cap passed to the model endpoint.
const MAX_OUTPUT_TOKENS: usize = 1000;

/// Sampling temperature for every request.
const TEMPERATURE: f32 = 0.7;

/// The conversational core consumed by the messaging transport.
pub struct Assistant {
    chain: FallbackChain,
    cache: ResponseCache,
    conversation: ConversationStore,
    pagination: PaginationStore,
    max_reply_len: usize,
    request_timeout: std::time::Duration,
}

impl Assistant {
    pub(crate) fn new(
        chain: FallbackChain,
        cache: ResponseCache,
        max_reply_len: usize,
        request_timeout: std::time::Duration,
    ) -> Self {
        Self {
            chain,
            cache,
            conversation: ConversationStore::new(),
            pagination: PaginationStore::new(),
            max_reply_len,
            request_timeout,
        }
    }

    /// Answer free-form user text. Always returns a sendable reply.
    pub async fn converse(&self, user_id: i64, text: &str) -> String {
        let start = Instant::now();
        let reply = match self.try_converse(user_id, text).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(user_id, error = %e, "conversation request failed");
                prompts::error_reply(e.reply_kind()).to_string()
            }
        };
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "operation" => "converse")
            .record(start.elapsed().as_secs_f64());
        reply
    }

    async fn try_converse(&self, user_id: i64, text: &str) -> Result<String> {
        info!(user_id, "conversation request");

        let context = self
            .conversation
            .context_window(user_id, CONTEXT_TOKEN_BUDGET);
        let context_free = context.is_empty();

        // The query joins the history before the cache check and model call.
        self.conversation.append_turn(user_id, Role::User, text);

        if context_free
            && let Some(cached) = self.cache.get(text)
        {
            info!(user_id, "serving cached reply");
            self.conversation
                .append_turn(user_id, Role::Assistant, cached.clone());
            return Ok(cached);
        }

        let mut messages = Vec::with_capacity(context.len() + 2);
        messages.push(Message::system(prompts::SYSTEM_PROMPT));
        if !context_free {
            info!(user_id, turns = context.len(), "using conversation context");
            messages.extend(context);
        }
        messages.push(Message::user(text));

        let response = self.chain.chat(&messages, &self.chat_options()).await?;
        let reply = render::truncate_reply(&response.content, self.max_reply_len);

        self.conversation
            .append_turn(user_id, Role::Assistant, reply.clone());
        if context_free {
            let model = response.model.as_deref().unwrap_or_default();
            self.cache.put(text, &reply, model);
        }

        Ok(reply)
    }

    /// Answer a templated category request. Always returns a sendable reply.
    ///
    /// Bypasses the cache and conversation context entirely, but records a
    /// `/category` exchange in the history so follow-ups have continuity.
    pub async fn category_reply(&self, category: Category, user_id: i64) -> String {
        let start = Instant::now();
        let reply = match self.try_category(category, user_id).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(user_id, %category, error = %e, "category request failed");
                prompts::error_reply(e.reply_kind()).to_string()
            }
        };
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "operation" => "category")
            .record(start.elapsed().as_secs_f64());
        reply
    }

    async fn try_category(&self, category: Category, user_id: i64) -> Result<String> {
        info!(user_id, %category, "category request");

        let (system, user_line) = prompts::category_prompt(category);
        let messages = [Message::system(system), Message::user(user_line)];

        let response = self.chain.chat(&messages, &self.chat_options()).await?;
        let reply = render::truncate_reply(&response.content, self.max_reply_len);

        self.conversation
            .append_turn(user_id, Role::User, format!("/{category}"));
        self.conversation
            .append_turn(user_id, Role::Assistant, reply.clone());

        Ok(reply)
    }

    /// Discard the user's conversation history.
    pub fn reset_user(&self, user_id: i64) {
        self.conversation.reset(user_id);
    }

    /// Render the user's current (or requested) list page as reply text.
    pub fn render_page(&self, user_id: i64, page: Option<usize>) -> Option<String> {
        let view = self.pagination.get_page(user_id, page)?;
        let mut text = render::format_items(&view.items, view.category);
        text.push_str(&render::page_footer(
            view.current_page,
            view.total_pages,
            view.total_items,
        ));
        Some(text)
    }

    /// The per-user conversation store.
    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    /// The per-user pagination store.
    pub fn pagination(&self) -> &PaginationStore {
        &self.pagination
    }

    /// Remove expired cache entries, returning the removal count.
    pub fn evict_expired(&self) -> usize {
        self.cache.evict_expired()
    }

    /// Read-only cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn chat_options(&self) -> ChatOptions {
        ChatOptions::default()
            .max_tokens(MAX_OUTPUT_TOKENS)
            .temperature(TEMPERATURE)
            .timeout(self.request_timeout)
    }
}
