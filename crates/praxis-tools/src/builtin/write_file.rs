// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! `write_file` — writes (overwrites) a UTF-8 text file on disk.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{require_str, Tool};

pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Writes content to a file, creating or overwriting it."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Path to the file to write"
                },
                "content": {
                    "type": "string",
                    "description": "Text content to write"
                }
            },
            "required": ["filename", "content"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: &Value) -> Result<Value, String> {
        let filename = require_str(args, "filename")?;
        let content = args.get("content").and_then(|v| v.as_str()).unwrap_or("");
        tokio::fs::write(filename, content)
            .await
            .map_err(|e| format!("failed to write {filename}: {e}"))?;
        Ok(json!({"filename": filename, "bytes_written": content.len()}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_content_to_a_new_file() {
        let path = std::env::temp_dir().join(format!("praxis_write_{}.txt", std::process::id()));
        let tool = WriteFileTool;
        let result = tool
            .execute(&json!({"filename": path.to_string_lossy(), "content": "hi there"}))
            .await
            .unwrap();
        assert_eq!(result["bytes_written"], 8);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hi there");
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn missing_content_defaults_to_empty() {
        let path = std::env::temp_dir().join(format!("praxis_write_empty_{}.txt", std::process::id()));
        let tool = WriteFileTool;
        tool.execute(&json!({"filename": path.to_string_lossy()}))
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        let _ = std::fs::remove_file(&path);
    }
}
