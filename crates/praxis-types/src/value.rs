// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Tagged argument-value type shared by the DSL, the workflow graph, and the
//! wire protocol.
//!
//! Per the design notes in the specification: the source language uses
//! dynamically-typed argument dictionaries throughout.  Rather than threading
//! `serde_json::Value` through every seam (and re-deriving canonical ordering
//! by hand at each cache lookup), `DslValue::Map` is backed by a `BTreeMap`,
//! so any two equal argument maps serialize to byte-identical JSON without a
//! separate sort pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single argument value: string, number, bool, list, map, or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DslValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<DslValue>),
    Map(BTreeMap<String, DslValue>),
}

/// Ordered argument map: argument name → value.
pub type ArgMap = BTreeMap<String, DslValue>;

impl DslValue {
    pub fn str(s: impl Into<String>) -> Self {
        DslValue::String(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DslValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DslValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DslValue::Null)
    }

    /// True for values whose string rendering is empty — used by the planner
    /// to skip blank default arguments (spec §4.4 path B step 3).
    pub fn is_blank_string(&self) -> bool {
        matches!(self, DslValue::String(s) if s.is_empty())
    }

    /// Render as a plain string the way the tokenizer/flag-parser would have
    /// produced it (used for interpolation and logging).
    pub fn render(&self) -> String {
        match self {
            DslValue::Null => String::new(),
            DslValue::Bool(b) => b.to_string(),
            DslValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            DslValue::String(s) => s.clone(),
            DslValue::List(_) | DslValue::Map(_) => {
                serde_json::to_string(&self.to_json()).unwrap_or_default()
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            DslValue::Null => serde_json::Value::Null,
            DslValue::Bool(b) => serde_json::Value::Bool(*b),
            DslValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            DslValue::String(s) => serde_json::Value::String(s.clone()),
            DslValue::List(items) => {
                serde_json::Value::Array(items.iter().map(DslValue::to_json).collect())
            }
            DslValue::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    pub fn from_json(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => DslValue::Null,
            serde_json::Value::Bool(b) => DslValue::Bool(*b),
            serde_json::Value::Number(n) => DslValue::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => DslValue::String(s.clone()),
            serde_json::Value::Array(items) => {
                DslValue::List(items.iter().map(DslValue::from_json).collect())
            }
            serde_json::Value::Object(map) => DslValue::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), DslValue::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for DslValue {
    fn from(s: &str) -> Self {
        DslValue::String(s.to_string())
    }
}

impl From<bool> for DslValue {
    fn from(b: bool) -> Self {
        DslValue::Bool(b)
    }
}

/// Deterministic JSON rendering of an argument map — the value side of the
/// tool-cache key (spec §4.2: `toolName + ":" + canonical-JSON(args)`).
///
/// `BTreeMap` already serializes in key order, so this is just a direct
/// `serde_json::to_string` — no extra canonicalization pass is needed.
pub fn canonical_json(args: &ArgMap) -> String {
    serde_json::to_string(args).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_json_is_order_independent() {
        let mut a = ArgMap::new();
        a.insert("b".into(), DslValue::str("2"));
        a.insert("a".into(), DslValue::str("1"));

        let mut b = ArgMap::new();
        b.insert("a".into(), DslValue::str("1"));
        b.insert("b".into(), DslValue::str("2"));

        assert_eq!(canonical_json(&a), canonical_json(&b));
    }

    #[test]
    fn render_integral_number_has_no_decimal_point() {
        assert_eq!(DslValue::Number(3.0).render(), "3");
    }

    #[test]
    fn render_fractional_number_keeps_decimal() {
        assert_eq!(DslValue::Number(3.5).render(), "3.5");
    }

    #[test]
    fn is_blank_string_true_only_for_empty_string() {
        assert!(DslValue::str("").is_blank_string());
        assert!(!DslValue::str("x").is_blank_string());
        assert!(!DslValue::Null.is_blank_string());
    }

    #[test]
    fn json_round_trip_preserves_structure() {
        let mut inner = ArgMap::new();
        inner.insert("k".into(), DslValue::Bool(true));
        let v = DslValue::List(vec![DslValue::Number(1.0), DslValue::Map(inner)]);
        let json = v.to_json();
        let back = DslValue::from_json(&json);
        assert_eq!(v, back);
    }
}
