//! Per-user conversation memory.
//!
//! [`ConversationStore`] maps a user identifier to an ordered turn history
//! and produces the token-budgeted context window that accompanies each
//! model request. History is capped per user: once a conversation reaches
//! [`MAX_TURNS`], the oldest turns are dropped as new ones are appended, so
//! a long-lived process cannot grow without bound. An explicit
//! [`reset`](ConversationStore::reset) discards the history entirely.
//!
//! The store is a shared component: methods take `&self` and guard the map
//! with a mutex that is never held across an await point.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::types::{Message, Role};

/// Hard cap on retained turns per user. Oldest turns are dropped first.
pub const MAX_TURNS: usize = 100;

/// Fixed chars-per-token heuristic used for the context window budget.
const CHARS_PER_TOKEN: usize = 4;

/// One message in a user's history.
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    /// Unix timestamp when the turn was appended.
    pub timestamp: u64,
}

/// A user's conversation state.
#[derive(Debug, Clone)]
pub struct UserConversation {
    pub user_id: i64,
    pub turns: VecDeque<ConversationTurn>,
    /// The most recent user-role message.
    pub last_query: String,
    pub created_at: u64,
    pub updated_at: u64,
}

impl UserConversation {
    fn new(user_id: i64) -> Self {
        let now = now_secs();
        Self {
            user_id,
            turns: VecDeque::new(),
            last_query: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Aggregate view of one user's activity.
#[derive(Debug, Clone)]
pub struct UserStats {
    pub user_id: i64,
    pub turn_count: usize,
    pub created_at: u64,
    pub updated_at: u64,
}

/// In-memory store of per-user conversation state.
pub struct ConversationStore {
    inner: Mutex<HashMap<i64, UserConversation>>,
    max_turns: usize,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    /// Create an empty store with the default turn cap.
    pub fn new() -> Self {
        Self::with_max_turns(MAX_TURNS)
    }

    /// Create a store with a custom per-user turn cap (minimum 1).
    pub fn with_max_turns(max_turns: usize) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            max_turns: max_turns.max(1),
        }
    }

    /// Snapshot of the user's state, creating a fresh empty one if absent.
    pub fn get_or_create(&self, user_id: i64) -> UserConversation {
        let mut map = self.lock();
        map.entry(user_id)
            .or_insert_with(|| {
                debug!(user_id, "created conversation state");
                UserConversation::new(user_id)
            })
            .clone()
    }

    /// Append a turn to the end of the user's history.
    ///
    /// Creates the state if absent. Turns beyond the cap fall off the front.
    pub fn append_turn(&self, user_id: i64, role: Role, content: impl Into<String>) {
        let content = content.into();
        let mut map = self.lock();
        let state = map
            .entry(user_id)
            .or_insert_with(|| UserConversation::new(user_id));

        if role == Role::User {
            state.last_query = content.clone();
        }
        state.turns.push_back(ConversationTurn {
            role,
            content,
            timestamp: now_secs(),
        });
        while state.turns.len() > self.max_turns {
            state.turns.pop_front();
        }
        state.updated_at = now_secs();
        debug!(user_id, ?role, turns = state.turns.len(), "appended turn");
    }

    /// Token-budgeted context window for a new request.
    ///
    /// Walks the history newest-to-oldest, accepting turns until the next
    /// one would push the accumulated character count past
    /// `max_token_budget * 4`. The returned messages are the selected
    /// suffix in chronological order; empty when the user has no history.
    pub fn context_window(&self, user_id: i64, max_token_budget: usize) -> Vec<Message> {
        let map = self.lock();
        let Some(state) = map.get(&user_id) else {
            return Vec::new();
        };

        let budget_chars = max_token_budget * CHARS_PER_TOKEN;
        let mut selected = Vec::new();
        let mut total_chars = 0;
        for turn in state.turns.iter().rev() {
            let turn_chars = turn.content.chars().count();
            if total_chars + turn_chars > budget_chars {
                break;
            }
            selected.push(Message {
                role: turn.role,
                content: turn.content.clone(),
            });
            total_chars += turn_chars;
        }
        selected.reverse();
        debug!(
            user_id,
            messages = selected.len(),
            chars = total_chars,
            "built context window"
        );
        selected
    }

    /// Discard the user's history, replacing it with fresh empty state.
    pub fn reset(&self, user_id: i64) {
        let mut map = self.lock();
        match map.get(&user_id) {
            Some(state) => {
                let cleared = state.turns.len();
                map.insert(user_id, UserConversation::new(user_id));
                info!(user_id, cleared, "reset conversation state");
            }
            None => debug!(user_id, "no conversation state to reset"),
        }
    }

    /// Per-user activity statistics, creating the state if absent.
    pub fn stats(&self, user_id: i64) -> UserStats {
        let state = self.get_or_create(user_id);
        UserStats {
            user_id,
            turn_count: state.turns.len(),
            created_at: state.created_at,
            updated_at: state.updated_at,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<i64, UserConversation>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_create_is_idempotent() {
        let store = ConversationStore::new();
        let first = store.get_or_create(7);
        store.append_turn(7, Role::User, "hi");
        let second = store.get_or_create(7);
        assert_eq!(first.user_id, second.user_id);
        assert_eq!(second.turns.len(), 1);
    }

    #[test]
    fn append_tracks_last_query() {
        let store = ConversationStore::new();
        store.append_turn(1, Role::User, "first");
        store.append_turn(1, Role::Assistant, "reply");
        store.append_turn(1, Role::User, "second");
        assert_eq!(store.get_or_create(1).last_query, "second");
    }

    #[test]
    fn turn_cap_drops_oldest() {
        let store = ConversationStore::with_max_turns(3);
        for i in 0..5 {
            store.append_turn(1, Role::User, format!("m{i}"));
        }
        let state = store.get_or_create(1);
        assert_eq!(state.turns.len(), 3);
        assert_eq!(state.turns[0].content, "m2");
        assert_eq!(state.turns[2].content, "m4");
    }

    #[test]
    fn context_window_empty_without_history() {
        let store = ConversationStore::new();
        assert!(store.context_window(42, 3000).is_empty());
    }

    #[test]
    fn reset_discards_history() {
        let store = ConversationStore::new();
        store.append_turn(1, Role::User, "hello");
        store.reset(1);
        assert!(store.get_or_create(1).turns.is_empty());
        assert_eq!(store.stats(1).turn_count, 0);
    }
}
