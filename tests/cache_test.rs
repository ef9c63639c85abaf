//! Tests for [`ResponseCache`] — flat-file TTL cache for context-free replies.

use aniki::ResponseCache;

use serde_json::json;
use tempfile::tempdir;

/// Write a cache file by hand so tests control `created_at` directly.
fn write_cache_file(path: &std::path::Path, query: &str, response: &str, created_at: u64) {
    let key = ResponseCache::query_hash(query);
    let body = json!({
        "entries": {
            key: {
                "query": query,
                "response": response,
                "created_at": created_at,
                "model": "openai/gpt-3.5-turbo",
            }
        }
    });
    std::fs::write(path, serde_json::to_string_pretty(&body).unwrap()).unwrap();
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

// =========================================================================
// Normalization
// =========================================================================

#[test]
fn case_and_whitespace_variants_hash_identically() {
    let base = ResponseCache::query_hash("what's good with fights in it");
    assert_eq!(ResponseCache::query_hash("  What's Good With Fights In It "), base);
    assert_eq!(ResponseCache::query_hash("WHAT'S GOOD WITH FIGHTS IN IT"), base);
}

#[test]
fn normalization_is_idempotent() {
    let once = " Some Query ".trim().to_lowercase();
    assert_eq!(
        ResponseCache::query_hash(" Some Query "),
        ResponseCache::query_hash(&once)
    );
}

#[test]
fn variants_share_one_entry() {
    let dir = tempdir().unwrap();
    let cache = ResponseCache::with_path(dir.path().join("responses.json"), 24);
    cache.put("  Mecha Stuff ", "watch gundam", "m");
    assert_eq!(cache.get("mecha stuff"), Some("watch gundam".into()));
    assert_eq!(cache.stats().total, 1);
}

// =========================================================================
// TTL
// =========================================================================

#[test]
fn age_exactly_ttl_is_not_expired() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("responses.json");
    write_cache_file(&path, "q", "a", now_secs() - 3600);

    let cache = ResponseCache::with_path(path, 1);
    assert_eq!(cache.get("q"), Some("a".into()));
}

#[test]
fn age_past_ttl_is_expired() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("responses.json");
    write_cache_file(&path, "q", "a", now_secs() - 3602);

    let cache = ResponseCache::with_path(path, 1);
    assert!(cache.get("q").is_none());
    assert_eq!(cache.stats().total, 0, "expired entry is removed on read");
}

#[test]
fn evict_expired_removes_only_stale_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("responses.json");
    write_cache_file(&path, "stale", "old", now_secs() - 10_000);

    let cache = ResponseCache::with_path(path, 1);
    cache.put("fresh", "new", "m");
    assert_eq!(cache.evict_expired(), 1);
    assert_eq!(cache.evict_expired(), 0);
    assert_eq!(cache.get("fresh"), Some("new".into()));
}

// =========================================================================
// Persistence
// =========================================================================

#[test]
fn entries_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("responses.json");
    {
        let cache = ResponseCache::with_path(path.clone(), 24);
        cache.put("q", "persisted", "openai/gpt-3.5-turbo");
    }
    let reopened = ResponseCache::with_path(path, 24);
    assert_eq!(reopened.get("q"), Some("persisted".into()));
}

#[test]
fn corrupt_file_degrades_to_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("responses.json");
    std::fs::write(&path, "this is not json").unwrap();

    let cache = ResponseCache::with_path(path, 24);
    assert!(cache.get("q").is_none());
    // Still usable after the bad load
    cache.put("q", "a", "m");
    assert_eq!(cache.get("q"), Some("a".into()));
}

#[test]
fn missing_file_starts_empty() {
    let dir = tempdir().unwrap();
    let cache = ResponseCache::with_path(dir.path().join("nope").join("responses.json"), 24);
    assert_eq!(cache.stats().total, 0);
}

#[test]
fn duplicate_query_overwrites_wholesale() {
    let dir = tempdir().unwrap();
    let cache = ResponseCache::with_path(dir.path().join("responses.json"), 24);
    cache.put("q", "first", "model-a");
    cache.put("q", "second", "model-b");
    assert_eq!(cache.get("q"), Some("second".into()));
    assert_eq!(cache.stats().total, 1);
}

// =========================================================================
// Stats
// =========================================================================

#[test]
fn stats_report_without_evicting() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("responses.json");
    write_cache_file(&path, "stale", "old", now_secs() - 10_000);

    let cache = ResponseCache::with_path(path, 1);
    cache.put("fresh", "new", "m");

    let stats = cache.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.expired, 1);
    assert_eq!(stats.valid, 1);
    assert!(stats.storage_bytes > 0);
    assert_eq!(cache.stats().total, 2, "stats must not mutate");
}
