// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Planning path B: an externally-supplied plan, e.g. from the LLM adapter
//! (spec §4.4 "Planning path B").

use std::collections::BTreeMap;

use praxis_types::{
    ArgMap, AstKind, AstNode, DslValue, NetworkContext, NodeKind, PlanEdgeKind, WorkflowEdge,
    WorkflowGraph, WorkflowNode, WorkflowPlan,
};

use crate::defaults::apply_defaults;
use crate::error::PlannerError;
use crate::path_a::PathAOutput;

/// Validate `plan` against `network`, then emit `(execution_ast, ui_graph)`.
pub fn plan_from_external(
    plan: WorkflowPlan,
    network: &NetworkContext,
) -> Result<PathAOutput, PlannerError> {
    validate(&plan, network)?;

    let mut execution_ast = Vec::new();
    let mut nodes: BTreeMap<String, WorkflowNode> = BTreeMap::new();

    let orchestrator_id = "orchestrator".to_string();
    nodes.insert(
        orchestrator_id.clone(),
        WorkflowNode::new(orchestrator_id.clone(), NodeKind::Orchestrator),
    );

    for plan_node in &plan.nodes {
        let mut args = plan_node.args.clone();
        if let Some(tool_name) = &plan_node.tool_name {
            apply_defaults(tool_name, &mut args);
        }

        let kind = node_kind_from_str(&plan_node.kind);
        let mut data = ArgMap::new();
        if let Some(agent_id) = &plan_node.agent_id {
            data.insert("agent-id".to_string(), DslValue::str(agent_id.clone()));
        }
        if let Some(tool_name) = &plan_node.tool_name {
            data.insert("tool-name".to_string(), DslValue::str(tool_name.clone()));
        }
        data.insert("args".to_string(), DslValue::Map(args.clone()));

        let mut ui_node = WorkflowNode::new(plan_node.id.clone(), kind);
        ui_node.position = plan_node.position;
        ui_node.data = data;
        nodes.insert(plan_node.id.clone(), ui_node);

        if plan_node.is_tool_node() {
            let mut call = AstNode::new(AstKind::Call, "CALL");
            call.tool_name = plan_node.tool_name.clone();
            call.args = args;
            execution_ast.push(call);
        }
    }

    let edges = if plan.edges.is_empty() {
        plan.nodes
            .iter()
            .map(|n| WorkflowEdge {
                id: format!("e-{orchestrator_id}-{}", n.id),
                source: orchestrator_id.clone(),
                target: n.id.clone(),
                kind: Default::default(),
            })
            .collect()
    } else {
        plan.edges
            .iter()
            .map(|e| WorkflowEdge {
                id: e.id.clone(),
                source: e.from.clone(),
                target: e.to.clone(),
                kind: match e.kind {
                    PlanEdgeKind::Default => Default::default(),
                    PlanEdgeKind::Dependency => praxis_types::EdgeKind::Dependency,
                },
            })
            .collect()
    };

    Ok(PathAOutput {
        execution_ast,
        ui_graph: WorkflowGraph::new(nodes, edges),
    })
}

fn node_kind_from_str(kind: &str) -> NodeKind {
    match kind {
        "orchestrator" => NodeKind::Orchestrator,
        "executor" => NodeKind::Executor,
        "tool" => NodeKind::Tool,
        "agent" => NodeKind::Agent,
        _ => NodeKind::Generic,
    }
}

fn validate(plan: &WorkflowPlan, network: &NetworkContext) -> Result<(), PlannerError> {
    if plan.description.trim().is_empty() {
        return Err(PlannerError::EmptyDescription);
    }
    if plan.nodes.is_empty() {
        return Err(PlannerError::NoNodes);
    }
    for node in &plan.nodes {
        if node.id.trim().is_empty() || node.kind.trim().is_empty() {
            return Err(PlannerError::MalformedNode(node.id.clone()));
        }
        if node.is_tool_node() {
            let agent_ok = node.agent_id.as_deref().is_some_and(|a| !a.trim().is_empty());
            let tool_ok = node.tool_name.as_deref().is_some_and(|t| !t.trim().is_empty());
            if !agent_ok || !tool_ok {
                return Err(PlannerError::MalformedToolNode(node.id.clone()));
            }
            let agent_id = node.agent_id.as_deref().unwrap();
            if agent_id != "local" && !network.has_agent(agent_id) {
                return Err(PlannerError::UnknownAgent(
                    node.id.clone(),
                    agent_id.to_string(),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use praxis_types::{PlanMetadata, PlanNode};

    fn base_plan() -> WorkflowPlan {
        WorkflowPlan {
            description: "list shared files".into(),
            nodes: vec![PlanNode {
                id: "n1".into(),
                kind: "tool".into(),
                agent_id: Some("local".into()),
                tool_name: Some("list_files".into()),
                args: ArgMap::new(),
                depends_on: vec![],
                position: Default::default(),
            }],
            edges: vec![],
            metadata: PlanMetadata::default(),
        }
    }

    #[test]
    fn valid_plan_produces_one_call_node_with_defaults_applied() {
        let out = plan_from_external(base_plan(), &NetworkContext::default()).unwrap();
        assert_eq!(out.execution_ast.len(), 1);
        assert_eq!(
            out.execution_ast[0].args.get("directory").unwrap().as_str(),
            Some("/shared")
        );
        // orchestrator + n1
        assert_eq!(out.ui_graph.nodes.len(), 2);
        assert_eq!(out.ui_graph.edges.len(), 1);
    }

    #[test]
    fn empty_description_is_rejected() {
        let mut plan = base_plan();
        plan.description = "  ".into();
        assert_eq!(
            plan_from_external(plan, &NetworkContext::default()).unwrap_err(),
            PlannerError::EmptyDescription
        );
    }

    #[test]
    fn tool_node_missing_agent_id_is_rejected() {
        let mut plan = base_plan();
        plan.nodes[0].agent_id = None;
        assert!(matches!(
            plan_from_external(plan, &NetworkContext::default()),
            Err(PlannerError::MalformedToolNode(_))
        ));
    }

    #[test]
    fn unknown_remote_agent_is_rejected() {
        let mut plan = base_plan();
        plan.nodes[0].agent_id = Some("peer-9".into());
        assert!(matches!(
            plan_from_external(plan, &NetworkContext::default()),
            Err(PlannerError::UnknownAgent(_, _))
        ));
    }

    #[test]
    fn known_remote_agent_is_accepted() {
        let mut plan = base_plan();
        plan.nodes[0].agent_id = Some("peer-9".into());
        let network = NetworkContext {
            known_agent_ids: vec!["peer-9".into()],
        };
        assert!(plan_from_external(plan, &network).is_ok());
    }
}
