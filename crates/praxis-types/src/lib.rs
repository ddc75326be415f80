// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Shared data-model and wire types for the praxis agent runtime.
//!
//! Every other crate in the workspace depends on this one for the shapes
//! that cross a component boundary, so the types here carry no behavior
//! beyond small, pure helper methods.

pub mod card;
pub mod cache;
pub mod error;
pub mod event;
pub mod graph;
pub mod params;
pub mod plan;
pub mod task;
pub mod token;
pub mod value;
pub mod wire;

pub use card::{ParamSpec, PeerCard, ToolSpec};
pub use cache::{cache_key, ToolCacheEntry};
pub use error::AppError;
pub use event::{DslProgressStage, Event, LogLevel};
pub use graph::{
    EdgeKind, ExecutionStatus, NodeKind, NodeStatus, Position, WorkflowEdge, WorkflowExecution,
    WorkflowGraph, WorkflowNode,
};
pub use params::ParamStore;
pub use plan::{NetworkContext, PlanEdge, PlanEdgeKind, PlanMetadata, PlanNode, WorkflowPlan};
pub use task::{Artifact, Task, TaskMessage, TaskState, TaskStatus};
pub use token::{AstKind, AstNode, Keyword, Token};
pub use value::{canonical_json, ArgMap, DslValue};
pub use wire::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, OpaqueA2ACard, RpcEnvelope, ToolErrorShape,
    ToolRequest, ToolResponse, ERR_INTERNAL, ERR_INVALID_PARAMS, ERR_METHOD_NOT_FOUND,
    PROTOCOL_A2A, PROTOCOL_A2A_CARD, PROTOCOL_CARD, PROTOCOL_MCP, PROTOCOL_TOOL,
};
