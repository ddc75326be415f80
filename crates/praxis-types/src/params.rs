// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Parameter store: the three runtime-injected value mappings attached to a
//! DSL analyzer or an executor (spec §3 "Parameter Store").

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::DslValue;

/// `Params` (arbitrary values), `Secrets` (string-only, masked in all
/// output), and `Env` (process environment overlay, checked before the real
/// environment).
///
/// *Invariant*: secrets are never serialized into tool results, progress
/// events, or log output — callers must route any text that might embed a
/// secret value through the analyzer's secret-masking helper first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamStore {
    #[serde(default)]
    pub params: BTreeMap<String, DslValue>,
    #[serde(default)]
    pub secrets: BTreeMap<String, String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(mut self, params: BTreeMap<String, DslValue>) -> Self {
        self.params = params;
        self
    }

    pub fn with_secrets(mut self, secrets: BTreeMap<String, String>) -> Self {
        self.secrets = secrets;
        self
    }

    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Every secret value currently held, for use by a secret-masking pass.
    pub fn secret_values(&self) -> impl Iterator<Item = &str> {
        self.secrets.values().map(|s| s.as_str())
    }
}
