// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Secret masking (spec §3 Parameter Store invariant, §4.3, §7, §8).
//!
//! Any text or JSON value that might embed a secret's literal value must be
//! routed through here before it reaches a log line, an event payload, or a
//! cached tool result. Reused by `execute`'s own `Call`/`Parallel` dispatch
//! and by the workflow executor's per-node log/result recording, not just
//! the analyzer's own callers.

use praxis_types::ParamStore;

pub fn mask_secrets(text: &str, store: &ParamStore) -> String {
    let mut out = text.to_string();
    for secret in store.secret_values() {
        if secret.is_empty() {
            continue;
        }
        out = out.replace(secret, "***");
    }
    out
}

pub fn mask_secrets_json(value: &serde_json::Value, store: &ParamStore) -> serde_json::Value {
    match value {
        serde_json::Value::String(s) => serde_json::Value::String(mask_secrets(s, store)),
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(|v| mask_secrets_json(v, store)).collect())
        }
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), mask_secrets_json(v, store)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn store_with_secret(k: &str, v: &str) -> ParamStore {
        let mut secrets = BTreeMap::new();
        secrets.insert(k.to_string(), v.to_string());
        ParamStore {
            params: BTreeMap::new(),
            secrets,
            env: BTreeMap::new(),
        }
    }

    #[test]
    fn secret_value_is_replaced_with_asterisks() {
        let store = store_with_secret("k", "K123");
        let masked = mask_secrets("the key is K123 exactly", &store);
        assert_eq!(masked, "the key is *** exactly");
        assert!(!masked.contains("K123"));
    }

    #[test]
    fn empty_secret_values_are_never_substituted() {
        let store = store_with_secret("k", "");
        let masked = mask_secrets("nothing to mask here", &store);
        assert_eq!(masked, "nothing to mask here");
    }

    #[test]
    fn masks_secrets_recursively_through_json() {
        let store = store_with_secret("k", "K123");
        let value = serde_json::json!({"log": ["key=K123", {"nested": "K123 again"}]});
        let masked = mask_secrets_json(&value, &store);
        let rendered = masked.to_string();
        assert!(!rendered.contains("K123"));
    }
}
