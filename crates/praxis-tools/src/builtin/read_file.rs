// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! `read_file` — reads a UTF-8 text file from disk.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{require_str, Tool};

pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Reads the full contents of a file at the given path."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Path to the file to read"
                }
            },
            "required": ["filename"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: &Value) -> Result<Value, String> {
        let filename = require_str(args, "filename")?;
        let content = tokio::fs::read_to_string(filename)
            .await
            .map_err(|e| format!("failed to read {filename}: {e}"))?;
        Ok(json!({"filename": filename, "content": content}))
    }
}
