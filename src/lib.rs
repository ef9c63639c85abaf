//! Aniki - conversation core for a deadpan anime-recommendation assistant
//!
//! This crate is the brain behind a chat bot: it relays user text to a
//! model endpoint with retry and model fallback, caches context-free
//! replies in a TTL'd flat-file store, keeps per-user conversation memory
//! with a token-budgeted context window, and tracks paginated
//! recommendation lists. The messaging transport (command routing, inline
//! keyboards, send/receive) lives outside this crate and consumes the
//! [`Assistant`] surface.
//!
//! # Example
//!
//! ```rust,no_run
//! use aniki::{Aniki, Config};
//!
//! #[tokio::main]
//! async fn main() -> aniki::Result<()> {
//!     let assistant = Aniki::builder()
//!         .config(Config::from_env()?)
//!         .build()?;
//!
//!     let reply = assistant.converse(42, "what's good with fights in it").await;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod cache;
pub mod config;
pub mod conversation;
pub mod error;
pub mod pagination;
pub mod prompts;
pub mod providers;
pub mod render;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use assistant::{Aniki, AnikiBuilder, Assistant};
pub use cache::{CacheStats, ResponseCache};
pub use config::Config;
pub use conversation::{ConversationStore, ConversationTurn, UserConversation, UserStats};
pub use error::{AnikiError, FailureKind, Result};
pub use pagination::{NavAction, NavButton, NavKeyboard, PageView, PaginationStore};
pub use providers::{ChatProvider, FallbackChain, OpenRouterClient};
pub use types::{Category, ChatOptions, ChatResponse, ListItem, Message, Role, Usage};
