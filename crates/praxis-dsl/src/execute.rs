// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! `execute(ast)` (spec §4.3 "Execution").

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use praxis_cache::ToolCache;
use praxis_types::{ArgMap, AstKind, AstNode, ParamStore};
use tracing::warn;

use crate::cancel::CancellationToken;
use crate::collaborator::AgentCollaborator;
use crate::error::DslError;
use crate::interpolate::interpolate_args;
use crate::mask::{mask_secrets, mask_secrets_json};

#[derive(Clone)]
pub struct ExecCtx {
    pub store: Arc<ParamStore>,
    pub cache: Arc<ToolCache>,
    pub collaborator: Option<Arc<dyn AgentCollaborator>>,
    pub cancel: CancellationToken,
}

impl ExecCtx {
    pub fn new(store: Arc<ParamStore>, cache: Arc<ToolCache>) -> Self {
        ExecCtx {
            store,
            cache,
            collaborator: None,
            cancel: CancellationToken::never(),
        }
    }

    pub fn with_collaborator(mut self, collaborator: Arc<dyn AgentCollaborator>) -> Self {
        self.collaborator = Some(collaborator);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Walk the parsed nodes in order, checking cancellation between each.
/// Aggregate return: `{status: "completed", results: [...]}`.
pub async fn execute(nodes: Vec<AstNode>, ctx: ExecCtx) -> Result<serde_json::Value, DslError> {
    let mut results = Vec::new();
    for node in nodes {
        if ctx.cancel.is_cancelled() {
            return Err(DslError::Cancelled);
        }
        results.push(execute_node(node, ctx.clone()).await);
    }
    Ok(serde_json::json!({"status": "completed", "results": results}))
}

fn execute_node(node: AstNode, ctx: ExecCtx) -> BoxFuture<'static, serde_json::Value> {
    async move {
        match node.kind {
            AstKind::Call => execute_call(&node, &ctx).await,
            AstKind::Parallel => execute_parallel(node, ctx).await,
            AstKind::Sequence => execute_sequence(node, ctx).await,
            AstKind::Workflow | AstKind::Task | AstKind::Agent => serde_json::json!({
                "status": "completed",
                "kind": format!("{:?}", node.kind).to_lowercase(),
                "command": node.command,
            }),
            AstKind::Param => serde_json::json!({"status": "completed", "kind": "param"}),
        }
    }
    .boxed()
}

async fn execute_call(node: &AstNode, ctx: &ExecCtx) -> serde_json::Value {
    let Some(tool_name) = node.tool_name.clone() else {
        return serde_json::json!({"status": "failed", "error": "call node missing tool name"});
    };

    let resolved = interpolate_args(&node.args, &ctx.store);
    let key = ToolCache::key_for(&tool_name, &resolved);
    if let Some(cached) = ctx.cache.get(&key) {
        return cached;
    }

    match &ctx.collaborator {
        None => {
            let result = serde_json::json!({
                "tool": tool_name,
                "status": "simulated",
                "payload": {"args": args_to_json(&resolved)},
            });
            ctx.cache.set(key, result.clone());
            result
        }
        Some(agent) => {
            if agent.has_local_tool(&tool_name) {
                match agent.execute_local_tool(&tool_name, &resolved).await {
                    Ok(value) => {
                        let result = serde_json::json!({
                            "tool": tool_name,
                            "status": "executed",
                            "result": value,
                        });
                        ctx.cache.set(key, result.clone());
                        result
                    }
                    Err(error) => {
                        let masked = mask_secrets(&error, &ctx.store);
                        serde_json::json!({"tool": tool_name, "status": "failed", "error": masked})
                    }
                }
            } else {
                match agent.find_agent_with_tool(&tool_name).await {
                    Some(peer_id) => {
                        match agent.execute_remote_tool(&peer_id, &tool_name, &resolved).await {
                            Ok(_) => {
                                let result = serde_json::json!({
                                    "tool": tool_name,
                                    "status": "executed",
                                    "executed_by": peer_id,
                                });
                                ctx.cache.set(key, result.clone());
                                result
                            }
                            Err(error) => {
                                let masked = mask_secrets(&error, &ctx.store);
                                serde_json::json!({
                                    "tool": tool_name,
                                    "status": "failed",
                                    "error": masked,
                                })
                            }
                        }
                    }
                    None => serde_json::json!({
                        "tool": tool_name,
                        "status": "failed",
                        "error": "no agent found with this tool",
                    }),
                }
            }
        }
    }
}

/// Every child runs concurrently; a child's failure is logged and skipped,
/// never fatal to its siblings.
async fn execute_parallel(node: AstNode, ctx: ExecCtx) -> serde_json::Value {
    let handles: Vec<_> = node
        .children
        .into_iter()
        .map(|child| {
            let child_ctx = ctx.clone();
            tokio::spawn(execute_node(child, child_ctx))
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        match handle.await {
            Ok(value) => {
                if value.get("status").and_then(|s| s.as_str()) == Some("failed") {
                    let masked = mask_secrets_json(&value, &ctx.store);
                    warn!(value = ?masked, "parallel child failed, continuing with siblings");
                }
                results.push(value);
            }
            Err(_) => results.push(serde_json::json!({"status": "failed", "error": "child task panicked"})),
        }
    }
    serde_json::json!({"status": "completed", "results": results})
}

/// Children run in order; the first failure aborts the remaining siblings
/// and propagates as the sequence's own result.
async fn execute_sequence(node: AstNode, ctx: ExecCtx) -> serde_json::Value {
    let mut results = Vec::new();
    for child in node.children {
        let value = execute_node(child, ctx.clone()).await;
        let failed = value.get("status").and_then(|s| s.as_str()) == Some("failed");
        let error = value.get("error").cloned();
        results.push(value);
        if failed {
            return serde_json::json!({
                "status": "failed",
                "error": error.unwrap_or(serde_json::Value::Null),
                "results": results,
            });
        }
    }
    serde_json::json!({"status": "completed", "results": results})
}

fn args_to_json(args: &ArgMap) -> serde_json::Value {
    serde_json::Value::Object(args.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
}
