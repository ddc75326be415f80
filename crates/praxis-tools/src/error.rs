// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Errors surfaced by the local tool registry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolsError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}
