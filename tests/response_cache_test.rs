//! Tests for [`ResponseCache`]: TTL expiry, explicit invalidation and
//! read-through loading.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use lyceum::LyceumError;
use lyceum::cache::{CacheConfig, CacheKey, Params, ResponseCache, TtlTier};
use serde_json::{Value, json};

const MINUTE: Duration = Duration::from_secs(60);

fn json_cache() -> ResponseCache {
    ResponseCache::default()
}

fn key(resource: &str) -> CacheKey {
    CacheKey::resource(resource)
}

// =========================================================================
// get / put
// =========================================================================

#[test]
fn put_then_get_returns_value() {
    let cache = json_cache();
    cache.put(key("courses"), json!([{"id": 1}]), MINUTE);
    assert_eq!(cache.get(&key("courses")), Some(json!([{"id": 1}])));
}

#[test]
fn get_missing_key_is_none() {
    let cache = json_cache();
    assert_eq!(cache.get(&key("courses")), None);
}

#[test]
fn overwrite_replaces_value() {
    let cache = json_cache();
    cache.put(key("home"), json!({"v": 1}), MINUTE);
    cache.put(key("home"), json!({"v": 2}), MINUTE);
    assert_eq!(cache.get(&key("home")), Some(json!({"v": 2})));
}

#[test]
fn distinct_params_are_distinct_entries() {
    let cache = json_cache();
    let page1 = CacheKey::new("blogs", &Params::new().with("page", 1));
    let page2 = CacheKey::new("blogs", &Params::new().with("page", 2));

    cache.put(page1.clone(), json!("one"), MINUTE);
    assert_eq!(cache.get(&page2), None);

    cache.put(page2.clone(), json!("two"), MINUTE);
    assert_eq!(cache.get(&page1), Some(json!("one")));
    assert_eq!(cache.get(&page2), Some(json!("two")));
}

#[test]
fn param_order_does_not_change_key() {
    let cache = json_cache();
    let a = CacheKey::new(
        "blogs",
        &Params::new().with("page", 2).with("category", "cloud"),
    );
    let b = CacheKey::new(
        "blogs",
        &Params::new().with("category", "cloud").with("page", 2),
    );

    cache.put(a, json!("posts"), MINUTE);
    assert_eq!(cache.get(&b), Some(json!("posts")));
}

// =========================================================================
// Expiry
// =========================================================================

#[tokio::test]
async fn entry_expires_after_ttl() {
    let cache = json_cache();
    cache.put(key("placements"), json!([]), Duration::from_millis(50));
    assert!(cache.get(&key("placements")).is_some());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(cache.get(&key("placements")), None);
    assert!(!cache.contains_key(&key("placements")));
}

#[tokio::test]
async fn entries_keep_their_own_ttl() {
    let cache = json_cache();
    cache.put(key("courses"), json!("short"), Duration::from_millis(50));
    cache.put(key("navbar"), json!("long"), MINUTE);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(cache.get(&key("courses")), None);
    assert_eq!(cache.get(&key("navbar")), Some(json!("long")));
}

#[tokio::test]
async fn overwrite_restarts_the_clock() {
    let cache = json_cache();
    cache.put(key("about"), json!(1), Duration::from_millis(80));
    tokio::time::sleep(Duration::from_millis(50)).await;

    cache.put(key("about"), json!(2), Duration::from_millis(80));
    tokio::time::sleep(Duration::from_millis(50)).await;

    // 100ms since the first put, 50ms since the second.
    assert_eq!(cache.get(&key("about")), Some(json!(2)));
}

#[test]
fn zero_ttl_entry_is_never_returned() {
    let cache = json_cache();
    cache.put(key("footer"), json!({}), Duration::ZERO);
    assert_eq!(cache.get(&key("footer")), None);
}

// =========================================================================
// Invalidation
// =========================================================================

#[test]
fn invalidate_removes_only_that_key() {
    let cache = json_cache();
    cache.put(key("courses"), json!(1), MINUTE);
    cache.put(key("blogs"), json!(2), MINUTE);

    cache.invalidate(&key("courses"));
    assert_eq!(cache.get(&key("courses")), None);
    assert_eq!(cache.get(&key("blogs")), Some(json!(2)));
}

#[test]
fn invalidate_missing_key_is_a_no_op() {
    let cache = json_cache();
    cache.invalidate(&key("courses"));
    assert!(cache.is_empty());
}

#[test]
fn invalidate_resource_covers_params_and_items() {
    let cache = json_cache();
    cache.put(key("blogs"), json!("all"), MINUTE);
    cache.put(
        CacheKey::new("blogs", &Params::new().with("page", 3)),
        json!("p3"),
        MINUTE,
    );
    cache.put(key("blogs/rust-intro"), json!("post"), MINUTE);
    cache.put(key("courses"), json!("courses"), MINUTE);

    let removed = cache.invalidate_resource("blogs");

    assert_eq!(removed, 3);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&key("courses")), Some(json!("courses")));
}

#[test]
fn invalidate_all_empties_the_cache() {
    let cache = json_cache();
    for page in 1..=25 {
        cache.put(
            CacheKey::new("blogs", &Params::new().with("page", page)),
            json!(page),
            MINUTE,
        );
    }
    assert_eq!(cache.len(), 25);

    cache.invalidate_all();
    assert!(cache.is_empty());
    for page in 1..=25 {
        let k = CacheKey::new("blogs", &Params::new().with("page", page));
        assert_eq!(cache.get(&k), None);
    }
}

// =========================================================================
// fetch_with_cache
// =========================================================================

#[tokio::test]
async fn fetch_loads_once_within_ttl() {
    let cache = json_cache();
    let calls = AtomicUsize::new(0);

    for _ in 0..3 {
        let value: Result<Value, LyceumError> = cache
            .fetch_with_cache(key("courses"), MINUTE, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!(["rust", "go"]))
            })
            .await;
        assert_eq!(value.unwrap(), json!(["rust", "go"]));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fetch_reloads_after_expiry() {
    let cache = json_cache();
    let calls = AtomicUsize::new(0);
    let ttl = Duration::from_millis(50);

    let load = || async {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, LyceumError>(json!(n))
    };

    assert_eq!(cache.fetch_with_cache(key("home"), ttl, load).await.unwrap(), json!(0));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(cache.fetch_with_cache(key("home"), ttl, load).await.unwrap(), json!(1));
}

#[tokio::test]
async fn fetch_reloads_after_invalidation() {
    let cache = json_cache();
    let calls = AtomicUsize::new(0);

    let load = || async {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, LyceumError>(json!(n))
    };

    cache.fetch_with_cache(key("courses"), MINUTE, load).await.unwrap();
    cache.invalidate_resource("courses");
    let value = cache.fetch_with_cache(key("courses"), MINUTE, load).await.unwrap();

    assert_eq!(value, json!(1));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn fetch_error_passes_through_and_is_not_cached() {
    let cache = json_cache();

    let result = cache
        .fetch_with_cache(key("courses"), MINUTE, || async {
            Err(LyceumError::Http("connection refused".to_string()))
        })
        .await;

    match result {
        Err(LyceumError::Http(msg)) => assert_eq!(msg, "connection refused"),
        other => panic!("expected Http error, got {other:?}"),
    }
    assert!(!cache.contains_key(&key("courses")));

    // The next call retries and succeeds.
    let value = cache
        .fetch_with_cache(key("courses"), MINUTE, || async {
            Ok::<_, LyceumError>(json!([]))
        })
        .await
        .unwrap();
    assert_eq!(value, json!([]));
    assert!(cache.contains_key(&key("courses")));
}

#[tokio::test]
async fn fetch_works_with_custom_payload_and_error_types() {
    let cache: ResponseCache<String> = ResponseCache::new(&CacheConfig::default());

    let err = cache
        .fetch_with_cache(key("about"), MINUTE, || async { Err::<String, _>("offline") })
        .await
        .unwrap_err();
    assert_eq!(err, "offline");

    let value = cache
        .fetch_with_cache(key("about"), MINUTE, || async {
            Ok::<_, &str>("about us".to_string())
        })
        .await
        .unwrap();
    assert_eq!(value, "about us");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_fetches_all_see_the_value() {
    let cache = Arc::new(json_cache());
    let calls = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = Arc::clone(&cache);
        let calls = Arc::clone(&calls);
        handles.push(tokio::spawn(async move {
            cache
                .fetch_with_cache(key("placements"), MINUTE, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Ok::<_, LyceumError>(json!(["acme"]))
                })
                .await
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), json!(["acme"]));
    }
    // Loads are not coalesced, but at least one ran and the result stuck.
    assert!(calls.load(Ordering::SeqCst) >= 1);
    assert!(cache.contains_key(&key("placements")));
}

// =========================================================================
// Configuration
// =========================================================================

#[test]
fn ttl_follows_configured_tiers() {
    let config = CacheConfig::new()
        .tier(TtlTier::Short, Duration::from_secs(5))
        .tier(TtlTier::Long, Duration::from_secs(7200));
    let cache: ResponseCache = ResponseCache::new(&config);

    assert_eq!(cache.ttl(TtlTier::Short), Duration::from_secs(5));
    assert_eq!(cache.ttl(TtlTier::Medium), Duration::from_secs(300));
    assert_eq!(cache.ttl(TtlTier::Long), Duration::from_secs(7200));
}
