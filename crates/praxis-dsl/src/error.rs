// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DslError {
    #[error("unrecognized DSL keyword: {0:?}")]
    UnrecognizedKeyword(String),
    #[error("call node missing tool name")]
    MissingToolName,
    #[error("execution cancelled")]
    Cancelled,
}
