// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Per-node-kind dispatch (spec §4.5 step 3).

use std::sync::Arc;

use praxis_dsl::{interpolate_args, AgentCollaborator};
use praxis_types::{NodeKind, ParamStore, WorkflowNode};

/// Run whatever `node`'s kind calls for and return its result payload, or an
/// error string the caller marks the node `error` with.
pub async fn dispatch_node(
    node: &WorkflowNode,
    store: &ParamStore,
    collaborator: Option<&Arc<dyn AgentCollaborator>>,
) -> Result<serde_json::Value, String> {
    match node.kind {
        NodeKind::Orchestrator => {
            Ok(serde_json::json!({"status": "completed", "kind": "orchestrator"}))
        }
        NodeKind::Executor | NodeKind::Tool => dispatch_tool(node, store, collaborator).await,
        NodeKind::Agent => Ok(serde_json::json!({
            "status": "completed",
            "kind": "agent",
            "agent-id": node.agent_id(),
        })),
        NodeKind::Generic => Ok(serde_json::json!({"status": "completed", "kind": "generic"})),
    }
}

async fn dispatch_tool(
    node: &WorkflowNode,
    store: &ParamStore,
    collaborator: Option<&Arc<dyn AgentCollaborator>>,
) -> Result<serde_json::Value, String> {
    let tool_name = node
        .tool_name()
        .ok_or_else(|| "node missing tool-name".to_string())?
        .to_string();
    let args = interpolate_args(&node.tool_args(), store);

    match collaborator {
        None => Ok(serde_json::json!({
            "tool": tool_name,
            "status": "simulated",
            "payload": {"args": args_to_json(&args)},
        })),
        Some(agent) => {
            if agent.has_local_tool(&tool_name) {
                let value = agent.execute_local_tool(&tool_name, &args).await?;
                Ok(serde_json::json!({
                    "tool": tool_name,
                    "status": "executed",
                    "result": value,
                }))
            } else {
                match agent.find_agent_with_tool(&tool_name).await {
                    Some(peer_id) => {
                        agent
                            .execute_remote_tool(&peer_id, &tool_name, &args)
                            .await?;
                        Ok(serde_json::json!({
                            "tool": tool_name,
                            "status": "executed",
                            "executed_by": peer_id,
                        }))
                    }
                    None => Err("no agent found with this tool".to_string()),
                }
            }
        }
    }
}

fn args_to_json(args: &praxis_types::ArgMap) -> serde_json::Value {
    serde_json::Value::Object(args.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
}
