// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Tool cache entry shape (spec §3 "Tool Cache Entry", §4.2).

use serde::{Deserialize, Serialize};

/// One memoized tool result. *Invariants*: entries expire `TTL` after
/// `created_at`; eviction removes the least-recently-accessed entry; error
/// results are never wrapped in this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCacheEntry {
    pub key: String,
    pub value: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_access: chrono::DateTime<chrono::Utc>,
    pub access_count: u64,
}

impl ToolCacheEntry {
    pub fn new(key: impl Into<String>, value: serde_json::Value) -> Self {
        let now = chrono::Utc::now();
        ToolCacheEntry {
            key: key.into(),
            value,
            created_at: now,
            last_access: now,
            access_count: 0,
        }
    }

    pub fn is_expired(&self, ttl: chrono::Duration, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.created_at + ttl < now
    }

    pub fn touch(&mut self, now: chrono::DateTime<chrono::Utc>) {
        self.last_access = now;
        self.access_count += 1;
    }
}

/// Deterministic cache key: `toolName + ":" + canonical-JSON(args)`.
pub fn cache_key(tool_name: &str, args: &crate::value::ArgMap) -> String {
    format!("{tool_name}:{}", crate::value::canonical_json(args))
}
