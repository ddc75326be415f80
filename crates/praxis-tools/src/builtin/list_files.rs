// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! `list_files` — lists the entries of a directory.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{require_str, Tool};

pub struct ListFilesTool;

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "Lists the entries of a directory."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "Path to the directory to list"
                }
            },
            "required": ["directory"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: &Value) -> Result<Value, String> {
        let directory = require_str(args, "directory")?;
        let mut entries = tokio::fs::read_dir(directory)
            .await
            .map_err(|e| format!("failed to list {directory}: {e}"))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| format!("failed to read entry in {directory}: {e}"))?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(json!({"directory": directory, "entries": names}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_entries_sorted() {
        let dir = std::env::temp_dir().join(format!("praxis_list_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.txt"), "").unwrap();
        std::fs::write(dir.join("a.txt"), "").unwrap();
        let tool = ListFilesTool;
        let result = tool
            .execute(&json!({"directory": dir.to_string_lossy()}))
            .await
            .unwrap();
        assert_eq!(result["entries"], json!(["a.txt", "b.txt"]));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let tool = ListFilesTool;
        let err = tool
            .execute(&json!({"directory": "/nonexistent/praxis/dir"}))
            .await
            .unwrap_err();
        assert!(err.contains("failed to list"));
    }
}
