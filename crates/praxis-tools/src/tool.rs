// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! The `Tool` trait every built-in local tool implements.

use async_trait::async_trait;
use serde_json::Value;

/// A single tool invocation.
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub args: Value,
}

/// Trait every locally registered tool must implement.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON Schema for this tool's parameters.
    fn parameters_schema(&self) -> Value;
    /// Execute the tool. Errors are returned as plain messages — never
    /// panics, never a secret value (secret masking happens one layer up,
    /// at the DSL/executor boundary, since tools here have no visibility
    /// into the secrets map).
    async fn execute(&self, args: &Value) -> Result<Value, String>;
}

/// Pulls a required string argument out of `args`, or a uniform error.
pub(crate) fn require_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing required parameter '{key}'"))
}
