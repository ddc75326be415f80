// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Errors surfaced by the agent facade (spec §2 item 8, §4.8).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Task(#[from] praxis_tasks::TaskError),

    #[error(transparent)]
    Planner(#[from] praxis_planner::PlannerError),

    #[error(transparent)]
    Executor(#[from] praxis_executor::ExecutorError),

    #[error(transparent)]
    Dsl(#[from] praxis_dsl::DslError),

    #[error(transparent)]
    P2p(#[from] praxis_p2p::P2pError),

    #[error("no workflow stored under id {0}")]
    WorkflowNotFound(String),
}
