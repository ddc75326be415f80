// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! `delete_file` — removes a file from disk.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{require_str, Tool};

pub struct DeleteFileTool;

#[async_trait]
impl Tool for DeleteFileTool {
    fn name(&self) -> &str {
        "delete_file"
    }

    fn description(&self) -> &str {
        "Deletes a file at the given path."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Path to the file to delete"
                }
            },
            "required": ["filename"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: &Value) -> Result<Value, String> {
        let filename = require_str(args, "filename")?;
        tokio::fs::remove_file(filename)
            .await
            .map_err(|e| format!("failed to delete {filename}: {e}"))?;
        Ok(json!({"filename": filename, "deleted": true}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deletes_an_existing_file() {
        let path = std::env::temp_dir().join(format!("praxis_delete_{}.txt", std::process::id()));
        std::fs::write(&path, "x").unwrap();
        let tool = DeleteFileTool;
        let result = tool
            .execute(&json!({"filename": path.to_string_lossy()}))
            .await
            .unwrap();
        assert_eq!(result["deleted"], true);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn deleting_a_missing_file_is_an_error() {
        let tool = DeleteFileTool;
        let err = tool
            .execute(&json!({"filename": "/nonexistent/praxis/gone.txt"}))
            .await
            .unwrap_err();
        assert!(err.contains("failed to delete"));
    }
}
