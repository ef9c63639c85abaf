//! Tests for [`PaginationStore`] — page math and navigation affordances.

use aniki::{Category, ListItem, NavAction, PaginationStore};

fn items(n: usize) -> Vec<ListItem> {
    (0..n).map(|i| ListItem::new(format!("title-{i}"))).collect()
}

#[test]
fn seven_items_by_three_make_three_pages() {
    let store = PaginationStore::new();
    store.create(1, items(7), 3, Category::Popular);
    assert_eq!(store.total_pages(1), 3);

    let view = store.get_page(1, None).unwrap();
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.total_items, 7);
    assert_eq!(view.current_page, 1);
}

#[test]
fn out_of_range_pages_clamp() {
    let store = PaginationStore::new();
    store.create(1, items(7), 3, Category::Popular);

    assert_eq!(store.get_page(1, Some(0)).unwrap().current_page, 1);
    assert_eq!(store.get_page(1, Some(4)).unwrap().current_page, 3);
}

#[test]
fn page_two_slices_exactly() {
    let store = PaginationStore::new();
    store.create(1, items(7), 3, Category::Popular);

    let view = store.get_page(1, Some(2)).unwrap();
    let titles: Vec<_> = view.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["title-3", "title-4", "title-5"]);
}

#[test]
fn last_page_holds_the_remainder() {
    let store = PaginationStore::new();
    store.create(1, items(7), 3, Category::Popular);

    let view = store.get_page(1, Some(3)).unwrap();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].title, "title-6");
}

#[test]
fn clamped_page_becomes_the_cursor() {
    let store = PaginationStore::new();
    store.create(1, items(7), 3, Category::Popular);

    store.get_page(1, Some(99)).unwrap();
    // A default-page request now sees the clamped cursor
    assert_eq!(store.get_page(1, None).unwrap().current_page, 3);
}

#[test]
fn empty_list_is_one_empty_page_with_zero_total() {
    let store = PaginationStore::new();
    store.create(1, Vec::new(), 3, Category::New);

    let view = store.get_page(1, None).unwrap();
    assert_eq!(view.total_pages, 0);
    assert_eq!(view.current_page, 1);
    assert!(view.items.is_empty());
}

#[test]
fn absent_user_has_no_pages() {
    let store = PaginationStore::new();
    assert!(store.get_page(42, None).is_none());
    assert_eq!(store.total_pages(42), 0);
    assert!(!store.has(42));
}

#[test]
fn create_replaces_prior_state() {
    let store = PaginationStore::new();
    store.create(1, items(7), 3, Category::Popular);
    store.get_page(1, Some(3)).unwrap();

    store.create(1, items(2), 3, Category::Classic);
    let view = store.get_page(1, None).unwrap();
    assert_eq!(view.current_page, 1, "cursor resets on replace");
    assert_eq!(view.total_items, 2);
    assert_eq!(view.category, Category::Classic);
}

#[test]
fn clear_removes_state() {
    let store = PaginationStore::new();
    store.create(1, items(7), 3, Category::Popular);
    store.clear(1);
    assert!(store.get_page(1, None).is_none());
}

// =========================================================================
// Navigation keyboard
// =========================================================================

#[test]
fn first_page_has_indicator_and_next_only() {
    let store = PaginationStore::new();
    store.create(1, items(7), 3, Category::Popular);

    let keyboard = store.keyboard(1).unwrap();
    let nav = &keyboard.rows[0];
    assert_eq!(nav.len(), 2);
    assert_eq!(nav[0].action, NavAction::Indicator);
    assert_eq!(nav[0].label, "1/3");
    assert_eq!(nav[1].action, NavAction::Page(2));
}

#[test]
fn middle_page_has_both_directions() {
    let store = PaginationStore::new();
    store.create(1, items(7), 3, Category::Popular);
    store.get_page(1, Some(2)).unwrap();

    let nav = &store.keyboard(1).unwrap().rows[0];
    assert_eq!(nav.len(), 3);
    assert_eq!(nav[0].action, NavAction::Page(1));
    assert_eq!(nav[1].action, NavAction::Indicator);
    assert_eq!(nav[2].action, NavAction::Page(3));
}

#[test]
fn last_page_has_previous_only() {
    let store = PaginationStore::new();
    store.create(1, items(7), 3, Category::Popular);
    store.get_page(1, Some(3)).unwrap();

    let nav = &store.keyboard(1).unwrap().rows[0];
    assert_eq!(nav.len(), 2);
    assert_eq!(nav[0].action, NavAction::Page(2));
    assert_eq!(nav[1].action, NavAction::Indicator);
}

#[test]
fn close_row_is_always_present() {
    let store = PaginationStore::new();
    store.create(1, items(7), 3, Category::Popular);

    let keyboard = store.keyboard(1).unwrap();
    assert_eq!(keyboard.rows.len(), 2);
    assert_eq!(keyboard.rows[1][0].action, NavAction::Close);
}

#[test]
fn single_page_list_has_no_keyboard() {
    let store = PaginationStore::new();
    store.create(1, items(3), 3, Category::Popular);
    assert!(store.keyboard(1).is_none());
}

#[test]
fn absent_user_has_no_keyboard() {
    let store = PaginationStore::new();
    assert!(store.keyboard(9).is_none());
}
