// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Errors surfaced by the workflow executor (spec §4.5).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("workflow graph has no nodes")]
    EmptyGraph,

    #[error("unknown workflow execution id: {0}")]
    UnknownExecution(String),
}
