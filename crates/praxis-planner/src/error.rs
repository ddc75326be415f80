// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlannerError {
    #[error("plan description must not be empty")]
    EmptyDescription,
    #[error("plan must contain at least one node")]
    NoNodes,
    #[error("plan node {0} is missing an id or kind")]
    MalformedNode(String),
    #[error("tool node {0} is missing a tool-name or agent-id")]
    MalformedToolNode(String),
    #[error("plan node {0} references unknown agent {1}")]
    UnknownAgent(String, String),
    #[error("no workflow stored under id {0}")]
    NotFound(String),
    #[error(transparent)]
    Dsl(#[from] praxis_dsl::DslError),
}
