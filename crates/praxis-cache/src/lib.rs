// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Bounded TTL/LRU cache for memoizing successful tool-call results (spec
//! §4.2).
//!
//! `lru::LruCache` already tracks recency on every touch and evicts the
//! least-recently-used entry once the cache is at capacity, which is
//! exactly the eviction rule the spec calls for — there is no need for a
//! hand-rolled recency list on top of it.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use chrono::Duration;
use lru::LruCache;
use praxis_types::{cache_key, ArgMap, ToolCacheEntry};

const DEFAULT_MAX_SIZE: usize = 512;
const DEFAULT_TTL_SECONDS: i64 = 300;

pub struct ToolCache {
    entries: Mutex<LruCache<String, ToolCacheEntry>>,
    ttl: Duration,
}

impl Default for ToolCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE, Duration::seconds(DEFAULT_TTL_SECONDS))
    }
}

impl ToolCache {
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        let cap = NonZeroUsize::new(max_size).unwrap_or(NonZeroUsize::new(1).unwrap());
        ToolCache {
            entries: Mutex::new(LruCache::new(cap)),
            ttl,
        }
    }

    /// Deterministic cache key helper, exposed so callers (the DSL analyzer,
    /// the executor) don't have to depend on `praxis-types` directly for it.
    pub fn key_for(tool_name: &str, args: &ArgMap) -> String {
        cache_key(tool_name, args)
    }

    /// Returns the cached value if present and not expired; absent entries
    /// and expired entries both return `None`. A hit updates the
    /// last-access timestamp and access counter.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let now = chrono::Utc::now();
        let mut guard = self.entries.lock().expect("tool cache mutex poisoned");
        let expired = match guard.peek(key) {
            Some(entry) => entry.is_expired(self.ttl, now),
            None => return None,
        };
        if expired {
            guard.pop(key);
            return None;
        }
        let entry = guard.get_mut(key).expect("entry just confirmed present");
        entry.touch(now);
        Some(entry.value.clone())
    }

    /// Inserts a successful result. Overflow evicts the least-recently-used
    /// entry automatically via the underlying `LruCache`.
    pub fn set(&self, key: impl Into<String>, value: serde_json::Value) {
        let key = key.into();
        let entry = ToolCacheEntry::new(key.clone(), value);
        let mut guard = self.entries.lock().expect("tool cache mutex poisoned");
        guard.put(key, entry);
    }

    pub fn clear(&self) {
        self.entries.lock().expect("tool cache mutex poisoned").clear();
    }

    pub fn size(&self) -> usize {
        self.entries.lock().expect("tool cache mutex poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use praxis_types::DslValue;

    fn args(filename: &str) -> ArgMap {
        let mut m = ArgMap::new();
        m.insert("filename".into(), DslValue::str(filename));
        m
    }

    #[test]
    fn set_then_get_returns_same_value() {
        let cache = ToolCache::default();
        let key = ToolCache::key_for("read_file", &args("a.txt"));
        cache.set(key.clone(), serde_json::json!({"status": "executed"}));
        assert_eq!(cache.get(&key), Some(serde_json::json!({"status": "executed"})));
    }

    #[test]
    fn get_on_missing_key_returns_none() {
        let cache = ToolCache::default();
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn entry_expires_after_ttl() {
        let cache = ToolCache::new(10, Duration::seconds(-1));
        let key = ToolCache::key_for("read_file", &args("a.txt"));
        cache.set(key.clone(), serde_json::json!(1));
        assert_eq!(cache.get(&key), None);
    }

    #[test]
    fn size_never_exceeds_max_size() {
        let cache = ToolCache::new(2, Duration::seconds(60));
        for i in 0..5 {
            let key = ToolCache::key_for("t", &args(&format!("f{i}")));
            cache.set(key, serde_json::json!(i));
        }
        assert!(cache.size() <= 2);
    }

    #[test]
    fn eviction_removes_least_recently_accessed() {
        let cache = ToolCache::new(2, Duration::seconds(60));
        let k1 = ToolCache::key_for("t", &args("f1"));
        let k2 = ToolCache::key_for("t", &args("f2"));
        let k3 = ToolCache::key_for("t", &args("f3"));

        cache.set(k1.clone(), serde_json::json!(1));
        cache.set(k2.clone(), serde_json::json!(2));
        // touch k1 so it is more recent than k2
        cache.get(&k1);
        cache.set(k3.clone(), serde_json::json!(3));

        assert_eq!(cache.get(&k2), None);
        assert!(cache.get(&k1).is_some());
        assert!(cache.get(&k3).is_some());
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = ToolCache::default();
        let key = ToolCache::key_for("t", &args("f"));
        cache.set(key, serde_json::json!(1));
        cache.clear();
        assert_eq!(cache.size(), 0);
    }
}
