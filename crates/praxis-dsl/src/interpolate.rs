// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Parameter/secret/env interpolation (spec §4.3 "Interpolation").
//!
//! Every string value in an argument mapping is scanned for
//! `{{ scope.path }}`. When the whole (trimmed) string is a single
//! placeholder, the resolved value's type is preserved instead of being
//! stringified — this is the one case where interpolation can turn a
//! string-shaped argument into a number, bool, list, or map.

use std::sync::OnceLock;

use praxis_types::{ArgMap, DslValue, ParamStore};
use regex::Regex;

fn whole_placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\{\{\s*(params|secrets|env)\.([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)*)\s*\}\}$")
            .expect("valid regex")
    })
}

fn inline_placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*(params|secrets|env)\.([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)*)\s*\}\}")
            .expect("valid regex")
    })
}

pub fn interpolate_args(args: &ArgMap, store: &ParamStore) -> ArgMap {
    args.iter()
        .map(|(k, v)| (k.clone(), interpolate_value(v, store)))
        .collect()
}

pub fn interpolate_value(value: &DslValue, store: &ParamStore) -> DslValue {
    match value {
        DslValue::String(s) => interpolate_string(s, store),
        DslValue::List(items) => {
            DslValue::List(items.iter().map(|v| interpolate_value(v, store)).collect())
        }
        DslValue::Map(m) => DslValue::Map(
            m.iter()
                .map(|(k, v)| (k.clone(), interpolate_value(v, store)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn interpolate_string(s: &str, store: &ParamStore) -> DslValue {
    if let Some(caps) = whole_placeholder_re().captures(s.trim()) {
        return resolve_placeholder(&caps[1], &caps[2], store);
    }
    let replaced = inline_placeholder_re().replace_all(s, |caps: &regex::Captures| {
        resolve_placeholder(&caps[1], &caps[2], store).render()
    });
    DslValue::String(replaced.into_owned())
}

fn resolve_placeholder(scope: &str, path: &str, store: &ParamStore) -> DslValue {
    match scope {
        "params" => resolve_params_path(&store.params, path).unwrap_or_else(|| DslValue::str("")),
        "secrets" => store
            .secrets
            .get(path)
            .cloned()
            .map(DslValue::String)
            .unwrap_or_else(|| DslValue::str("")),
        "env" => store
            .env
            .get(path)
            .cloned()
            .or_else(|| std::env::var(path).ok())
            .map(DslValue::String)
            .unwrap_or_else(|| DslValue::str("")),
        _ => DslValue::str(""),
    }
}

fn resolve_params_path(
    params: &std::collections::BTreeMap<String, DslValue>,
    path: &str,
) -> Option<DslValue> {
    let mut parts = path.split('.');
    let mut current = params.get(parts.next()?)?.clone();
    for part in parts {
        match current {
            DslValue::Map(m) => current = m.get(part)?.clone(),
            _ => return None,
        }
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn store() -> ParamStore {
        let mut params = BTreeMap::new();
        params.insert("username".to_string(), DslValue::str("alice"));
        let mut secrets = BTreeMap::new();
        secrets.insert("k".to_string(), "K123".to_string());
        ParamStore {
            params,
            secrets,
            env: BTreeMap::new(),
        }
    }

    #[test]
    fn interpolates_params_secrets_and_literal_text_together() {
        let mut args = ArgMap::new();
        args.insert("user".into(), DslValue::str("{{params.username}}"));
        args.insert("apiKey".into(), DslValue::str("{{secrets.k}}"));
        args.insert("note".into(), DslValue::str("hi"));

        let resolved = interpolate_args(&args, &store());
        assert_eq!(resolved.get("user").unwrap().as_str(), Some("alice"));
        assert_eq!(resolved.get("apiKey").unwrap().as_str(), Some("K123"));
        assert_eq!(resolved.get("note").unwrap().as_str(), Some("hi"));
    }

    #[test]
    fn missing_key_expands_to_empty_string() {
        let resolved = interpolate_string("{{params.nope}}", &store());
        assert_eq!(resolved.as_str(), Some(""));
    }

    #[test]
    fn whole_value_placeholder_preserves_type() {
        let mut params = BTreeMap::new();
        params.insert("count".to_string(), DslValue::Number(3.0));
        let store = ParamStore {
            params,
            secrets: BTreeMap::new(),
            env: BTreeMap::new(),
        };
        let resolved = interpolate_string("{{ params.count }}", &store);
        assert_eq!(resolved, DslValue::Number(3.0));
    }

    #[test]
    fn inline_placeholder_within_text_is_stringified() {
        let resolved = interpolate_string("hello {{params.username}}!", &store());
        assert_eq!(resolved.as_str(), Some("hello alice!"));
    }

    #[test]
    fn interpolation_recurses_into_nested_lists_and_maps() {
        let mut inner = ArgMap::new();
        inner.insert("u".into(), DslValue::str("{{params.username}}"));
        let value = DslValue::List(vec![DslValue::Map(inner)]);
        let resolved = interpolate_value(&value, &store());
        match resolved {
            DslValue::List(items) => match &items[0] {
                DslValue::Map(m) => assert_eq!(m.get("u").unwrap().as_str(), Some("alice")),
                _ => panic!("expected map"),
            },
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn env_scope_falls_back_to_process_environment() {
        std::env::set_var("PRAXIS_TEST_VAR", "from-process-env");
        let resolved = interpolate_string("{{env.PRAXIS_TEST_VAR}}", &store());
        assert_eq!(resolved.as_str(), Some("from-process-env"));
        std::env::remove_var("PRAXIS_TEST_VAR");
    }
}
