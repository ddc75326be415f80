// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Central registry of locally available tools.
//!
//! Grounded on `sven-tools::registry::ToolRegistry` — a name-keyed map,
//! populated at startup, immutable thereafter so lookups never need a lock.

use std::collections::HashMap;
use std::sync::Arc;

use praxis_types::{ParamSpec, ToolSpec};
use serde_json::Value;

use crate::error::ToolsError;
use crate::tool::{Tool, ToolCall};

pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    /// A registry pre-loaded with every built-in tool.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register(crate::builtin::read_file::ReadFileTool);
        reg.register(crate::builtin::write_file::WriteFileTool);
        reg.register(crate::builtin::delete_file::DeleteFileTool);
        reg.register(crate::builtin::list_files::ListFilesTool);
        reg
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Tool specs for every registered tool, suitable for a `PeerCard`.
    pub fn tool_specs(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self
            .tools
            .values()
            .map(|t| ToolSpec {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: schema_to_param_specs(&t.parameters_schema()),
            })
            .collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub async fn execute(&self, call: &ToolCall) -> Result<Value, ToolsError> {
        match self.tools.get(&call.name) {
            Some(tool) => match tool.execute(&call.args).await {
                Ok(result) => Ok(result),
                Err(message) => Ok(serde_json::json!({"error": message})),
            },
            None => Err(ToolsError::UnknownTool(call.name.clone())),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts a JSON-Schema `{type, properties, required}` object into the
/// flat `ParamSpec` list a `ToolSpec` carries (spec §3 "Peer Card").
fn schema_to_param_specs(schema: &Value) -> Vec<ParamSpec> {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    schema
        .get("properties")
        .and_then(|v| v.as_object())
        .map(|props| {
            props
                .iter()
                .map(|(name, spec)| ParamSpec {
                    name: name.clone(),
                    type_name: spec
                        .get("type")
                        .and_then(|t| t.as_str())
                        .unwrap_or("string")
                        .to_string(),
                    description: spec
                        .get("description")
                        .and_then(|d| d.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    required: required.contains(&name.as_str()),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echoes its input"
        }
        fn parameters_schema(&self) -> Value {
            serde_json::json!({
                "type": "object",
                "properties": {"text": {"type": "string", "description": "text to echo"}},
                "required": ["text"]
            })
        }
        async fn execute(&self, args: &Value) -> Result<Value, String> {
            Ok(args.clone())
        }
    }

    fn call(name: &str, args: Value) -> ToolCall {
        ToolCall { id: "1".into(), name: name.into(), args }
    }

    #[test]
    fn register_and_get() {
        let mut reg = ToolRegistry::new();
        reg.register(EchoTool);
        assert!(reg.get("echo").is_some());
        assert!(reg.has("echo"));
    }

    #[test]
    fn tool_specs_reflect_the_schema() {
        let mut reg = ToolRegistry::new();
        reg.register(EchoTool);
        let specs = reg.tool_specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "echo");
        assert!(specs[0].parameters.iter().any(|p| p.name == "text" && p.required));
    }

    #[tokio::test]
    async fn execute_known_tool_succeeds() {
        let mut reg = ToolRegistry::new();
        reg.register(EchoTool);
        let result = reg.execute(&call("echo", serde_json::json!({"text": "hi"}))).await.unwrap();
        assert_eq!(result, serde_json::json!({"text": "hi"}));
    }

    #[tokio::test]
    async fn execute_unknown_tool_is_an_error() {
        let reg = ToolRegistry::new();
        let err = reg.execute(&call("missing", serde_json::json!({}))).await.unwrap_err();
        assert!(matches!(err, ToolsError::UnknownTool(name) if name == "missing"));
    }

    #[test]
    fn with_builtins_registers_every_builtin() {
        let reg = ToolRegistry::with_builtins();
        assert_eq!(
            reg.names(),
            vec!["delete_file", "list_files", "read_file", "write_file"]
        );
    }
}
