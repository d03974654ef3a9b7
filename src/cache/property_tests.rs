//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify freshness, stale fallback and clearing behavior.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::{CacheStore, ManualClock, DEFAULT_TTL_MS};
use crate::storage::{KeyValueStore, MemoryStore};

const START: u64 = 1_700_000_000_000;

// == Strategies ==
/// Generates valid cache keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

/// Generates cacheable payloads
fn valid_value_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9 ]{0,32}", 0..8)
}

fn fixture() -> (CacheStore, Arc<MemoryStore>, Arc<ManualClock>) {
    let backend = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(START));
    let store = CacheStore::new(backend.clone()).with_clock(clock.clone());
    (store, backend, clock)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing a payload and reading it back inside the TTL returns the same payload.
    #[test]
    fn prop_roundtrip_within_ttl(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        elapsed in 0..DEFAULT_TTL_MS
    ) {
        let (store, _, clock) = fixture();
        let retrieved: Option<Vec<String>> = tokio_test::block_on(async {
            store.set(&key, &value).await;
            clock.advance(elapsed);
            store.get(&key).await
        });
        prop_assert_eq!(retrieved, Some(value));
    }

    // Once the TTL has elapsed a fresh read misses while a stale read still succeeds.
    #[test]
    fn prop_expired_entries_only_served_stale(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        overshoot in 1u64..10 * DEFAULT_TTL_MS
    ) {
        let (store, _, clock) = fixture();
        let (fresh, stale): (Option<Vec<String>>, Option<Vec<String>>) =
            tokio_test::block_on(async {
                store.set(&key, &value).await;
                clock.advance(DEFAULT_TTL_MS + overshoot);
                (store.get(&key).await, store.get_stale(&key).await)
            });
        prop_assert!(fresh.is_none(), "Entry should be stale after TTL");
        prop_assert_eq!(stale, Some(value));
    }

    // The last write to a key wins.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let (store, backend, _) = fixture();
        let (retrieved, len) = tokio_test::block_on(async {
            store.set(&key, &value1).await;
            store.set(&key, &value2).await;
            (store.get::<Vec<String>>(&key).await, backend.len().await)
        });
        prop_assert_eq!(retrieved, Some(value2));
        prop_assert_eq!(len, 1);
    }

    // Clearing a prefix removes exactly the keys that carry it.
    #[test]
    fn prop_clear_all_removes_only_prefixed(
        cached in prop::collection::hash_set(valid_key_strategy(), 0..20),
        other in prop::collection::hash_set(valid_key_strategy(), 0..20)
    ) {
        let (store, backend, _) = fixture();
        let remaining: HashSet<String> = tokio_test::block_on(async {
            for key in &cached {
                store.set(&format!("cache_{}", key), key).await;
            }
            for key in &other {
                backend.set(&format!("@pref_{}", key), key.clone()).await.unwrap();
            }
            let removed = store.clear_all("cache_").await;
            assert_eq!(removed, cached.len());
            backend.list_keys().await.unwrap().into_iter().collect()
        });

        let expected: HashSet<String> = other.iter().map(|k| format!("@pref_{}", k)).collect();
        prop_assert_eq!(remaining, expected);
    }
}
