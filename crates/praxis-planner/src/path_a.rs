// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Planning path A: raw DSL text, no external plan (spec §4.4 "Planning
//! path A").

use std::collections::BTreeMap;
use std::sync::Arc;

use praxis_dsl::AgentCollaborator;
use praxis_types::{ArgMap, DslValue, NodeKind, ParamStore, Position, WorkflowEdge, WorkflowGraph, WorkflowNode};

use crate::complexity::{classify, flatten_calls};
use crate::error::PlannerError;

pub struct PathAOutput {
    pub execution_ast: Vec<praxis_types::AstNode>,
    pub ui_graph: WorkflowGraph,
}

/// Tokenize and parse `text`, classify its complexity, and resolve which
/// agent serves each `Call` node, producing a UI graph with one
/// orchestrator node and one node per distinct selected agent.
pub async fn plan_from_text(
    text: &str,
    base_store: ParamStore,
    collaborator: Option<&Arc<dyn AgentCollaborator>>,
) -> Result<PathAOutput, PlannerError> {
    let analyzed = praxis_dsl::analyze_dsl(text, base_store)?;
    let complexity = classify(&analyzed.nodes);

    let mut nodes: BTreeMap<String, WorkflowNode> = BTreeMap::new();
    let mut edges = Vec::new();
    let mut seen_agents: BTreeMap<String, ()> = BTreeMap::new();

    let orchestrator_id = "orchestrator".to_string();
    let mut orchestrator_data = ArgMap::new();
    orchestrator_data.insert("complexity".to_string(), DslValue::str(complexity.as_str()));
    let mut orchestrator_node = WorkflowNode::new(orchestrator_id.clone(), NodeKind::Orchestrator);
    orchestrator_node.data = orchestrator_data;
    nodes.insert(orchestrator_id.clone(), orchestrator_node);

    for call in flatten_calls(&analyzed.nodes) {
        let Some(tool_name) = call.tool_name.as_deref() else {
            continue;
        };
        let agent_id = resolve_agent_for_tool(tool_name, collaborator).await;
        if seen_agents.contains_key(&agent_id) {
            continue;
        }
        seen_agents.insert(agent_id.clone(), ());

        let node_id = format!("agent-{agent_id}");
        let mut data = ArgMap::new();
        data.insert("agent-id".to_string(), DslValue::str(agent_id.clone()));
        data.insert("tool-name".to_string(), DslValue::str(tool_name));
        let mut node = WorkflowNode::new(node_id.clone(), NodeKind::Agent);
        node.position = Position { x: 0.0, y: 0.0 };
        node.data = data;
        nodes.insert(node_id.clone(), node);

        edges.push(WorkflowEdge {
            id: format!("e-{orchestrator_id}-{node_id}"),
            source: orchestrator_id.clone(),
            target: node_id,
            kind: Default::default(),
        });
    }

    Ok(PathAOutput {
        execution_ast: analyzed.nodes,
        ui_graph: WorkflowGraph::new(nodes, edges),
    })
}

/// Prefer local (`"local"`) if the collaborator reports the tool locally
/// available; otherwise ask it to find a remote peer. With no collaborator
/// bound at all, every tool call is attributed to `"local"` (mirrors the
/// DSL executor's no-agent simulated-result path).
async fn resolve_agent_for_tool(
    tool_name: &str,
    collaborator: Option<&Arc<dyn AgentCollaborator>>,
) -> String {
    match collaborator {
        None => "local".to_string(),
        Some(agent) => {
            if agent.has_local_tool(tool_name) {
                "local".to_string()
            } else {
                agent
                    .find_agent_with_tool(tool_name)
                    .await
                    .unwrap_or_else(|| "unassigned".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_collaborator_attributes_every_call_to_local() {
        let out = plan_from_text("CALL read_file a.txt", ParamStore::new(), None)
            .await
            .unwrap();
        assert!(out.ui_graph.nodes.contains_key("agent-local"));
        assert!(out.ui_graph.nodes.contains_key("orchestrator"));
        assert_eq!(out.ui_graph.edges.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_agent_selection_is_deduplicated() {
        let out = plan_from_text(
            "CALL read_file a.txt\nCALL read_file b.txt\nCALL read_file c.txt",
            ParamStore::new(),
            None,
        )
        .await
        .unwrap();
        // three calls to the same (local) agent collapse to one agent node
        assert_eq!(out.ui_graph.nodes.len(), 2);
        assert_eq!(out.ui_graph.edges.len(), 1);
    }
}
