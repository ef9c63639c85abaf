//! Paginated list state and navigation affordances.
//!
//! [`PaginationStore`] keeps one materialized item list per user with a
//! page cursor. A new `create` replaces any prior list wholesale. Page
//! numbers are always clamped into `[1, total_pages]`; an empty list has
//! zero pages and renders as a single empty page.
//!
//! The navigation keyboard is transport-agnostic: [`NavKeyboard`] rows of
//! labeled [`NavAction`]s that the messaging layer maps onto its own
//! inline-keyboard type.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};

use crate::types::{Category, ListItem};

/// Pagination state for one user.
#[derive(Debug, Clone)]
pub struct PaginationState {
    pub user_id: i64,
    pub items: Vec<ListItem>,
    /// Always within `[1, total_pages]` (1 when the list is empty).
    pub current_page: usize,
    pub items_per_page: usize,
    pub category: Category,
}

/// One rendered page of a user's list.
#[derive(Debug, Clone)]
pub struct PageView {
    pub items: Vec<ListItem>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub category: Category,
}

/// What pressing a navigation button should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// Jump to this page.
    Page(usize),
    /// Inert position indicator.
    Indicator,
    /// Dismiss the list.
    Close,
}

/// A labeled navigation button.
#[derive(Debug, Clone)]
pub struct NavButton {
    pub label: String,
    pub action: NavAction,
}

/// Navigation control rows for the current page.
#[derive(Debug, Clone)]
pub struct NavKeyboard {
    pub rows: Vec<Vec<NavButton>>,
}

/// In-memory store of per-user pagination state.
#[derive(Default)]
pub struct PaginationStore {
    inner: Mutex<HashMap<i64, PaginationState>>,
}

impl PaginationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize a new list for the user, replacing any prior state.
    ///
    /// The cursor starts at page 1. `items_per_page` is clamped to at
    /// least 1.
    pub fn create(
        &self,
        user_id: i64,
        items: Vec<ListItem>,
        items_per_page: usize,
        category: Category,
    ) -> PaginationState {
        let state = PaginationState {
            user_id,
            items,
            current_page: 1,
            items_per_page: items_per_page.max(1),
            category,
        };
        info!(
            user_id,
            items = state.items.len(),
            per_page = state.items_per_page,
            %category,
            "created pagination"
        );
        self.lock().insert(user_id, state.clone());
        state
    }

    /// A page of the user's list, or `None` if no list exists.
    ///
    /// `page` defaults to the stored cursor; either way the result is
    /// clamped into `[1, total_pages]` and the clamped value becomes the
    /// new cursor. An empty list yields one empty page at cursor 1 with
    /// `total_pages` 0.
    pub fn get_page(&self, user_id: i64, page: Option<usize>) -> Option<PageView> {
        let mut map = self.lock();
        let state = map.get_mut(&user_id)?;

        let total_items = state.items.len();
        let total_pages = total_items.div_ceil(state.items_per_page);

        let requested = page.unwrap_or(state.current_page);
        state.current_page = requested.clamp(1, total_pages.max(1));

        let start = (state.current_page - 1) * state.items_per_page;
        let end = (start + state.items_per_page).min(total_items);
        let items = if start < total_items {
            state.items[start..end].to_vec()
        } else {
            Vec::new()
        };

        Some(PageView {
            items,
            current_page: state.current_page,
            total_pages,
            total_items,
            category: state.category,
        })
    }

    /// Navigation controls for the user's current page.
    ///
    /// `None` when the user has no list or it fits on a single page.
    /// Previous/next appear only when a page exists in that direction; the
    /// indicator is always present, as is the close row.
    pub fn keyboard(&self, user_id: i64) -> Option<NavKeyboard> {
        let map = self.lock();
        let state = map.get(&user_id)?;
        let total_pages = state.items.len().div_ceil(state.items_per_page);
        if total_pages <= 1 {
            return None;
        }

        let mut nav_row = Vec::new();
        if state.current_page > 1 {
            nav_row.push(NavButton {
                label: "⬅️ Previous".to_string(),
                action: NavAction::Page(state.current_page - 1),
            });
        }
        nav_row.push(NavButton {
            label: format!("{}/{}", state.current_page, total_pages),
            action: NavAction::Indicator,
        });
        if state.current_page < total_pages {
            nav_row.push(NavButton {
                label: "Next ➡️".to_string(),
                action: NavAction::Page(state.current_page + 1),
            });
        }

        let close_row = vec![NavButton {
            label: "❌ Close".to_string(),
            action: NavAction::Close,
        }];

        Some(NavKeyboard {
            rows: vec![nav_row, close_row],
        })
    }

    /// Whether the user currently has a list.
    pub fn has(&self, user_id: i64) -> bool {
        self.lock().contains_key(&user_id)
    }

    /// Remove the user's list. Subsequent `get_page` returns `None`.
    pub fn clear(&self, user_id: i64) {
        if self.lock().remove(&user_id).is_some() {
            debug!(user_id, "cleared pagination");
        }
    }

    /// Page count for the user's list; 0 when no list exists.
    pub fn total_pages(&self, user_id: i64) -> usize {
        let map = self.lock();
        map.get(&user_id)
            .map(|s| s.items.len().div_ceil(s.items_per_page))
            .unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<i64, PaginationState>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
