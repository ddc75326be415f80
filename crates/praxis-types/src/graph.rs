// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Workflow graph and workflow execution types (spec §3, §4.5).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{ArgMap, DslValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Orchestrator,
    Executor,
    Tool,
    Agent,
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Pending,
    Running,
    Success,
    Error,
}

impl Default for NodeStatus {
    fn default() -> Self {
        NodeStatus::Pending
    }
}

/// UI position hint, carried through verbatim, never interpreted by the
/// executor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Position,
    /// `tool-name`, `args`, `agent-id`, and any other per-kind payload.
    #[serde(default)]
    pub data: ArgMap,
    #[serde(default)]
    pub status: NodeStatus,
}

impl WorkflowNode {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        WorkflowNode {
            id: id.into(),
            kind,
            position: Position::default(),
            data: ArgMap::new(),
            status: NodeStatus::Pending,
        }
    }

    pub fn tool_name(&self) -> Option<&str> {
        self.data.get("tool-name").and_then(DslValue::as_str)
    }

    pub fn agent_id(&self) -> Option<&str> {
        self.data.get("agent-id").and_then(DslValue::as_str)
    }

    /// The `args` sub-map of `data`, if present, else an empty map.
    pub fn tool_args(&self) -> ArgMap {
        match self.data.get("args") {
            Some(DslValue::Map(m)) => m.clone(),
            _ => ArgMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Default,
    Dependency,
}

impl Default for EdgeKind {
    fn default() -> Self {
        EdgeKind::Default
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub kind: EdgeKind,
}

/// Node-id keyed graph plus its ordered edge list and derived adjacency map.
///
/// *Invariant*: edges reference defined nodes; cycles are tolerated but the
/// executor visits each node at most once per execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowGraph {
    pub nodes: BTreeMap<String, WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
    #[serde(skip)]
    adjacency: BTreeMap<String, Vec<String>>,
}

impl WorkflowGraph {
    pub fn new(nodes: BTreeMap<String, WorkflowNode>, edges: Vec<WorkflowEdge>) -> Self {
        let mut adjacency: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for edge in &edges {
            adjacency
                .entry(edge.source.clone())
                .or_default()
                .push(edge.target.clone());
        }
        WorkflowGraph {
            nodes,
            edges,
            adjacency,
        }
    }

    pub fn adjacency(&self) -> &BTreeMap<String, Vec<String>> {
        &self.adjacency
    }

    pub fn targets_of(&self, node_id: &str) -> &[String] {
        self.adjacency
            .get(node_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Nodes with no incoming edge, in stable (`BTreeMap`) iteration order.
    pub fn entry_nodes(&self) -> Vec<String> {
        let has_incoming: std::collections::BTreeSet<&str> =
            self.edges.iter().map(|e| e.target.as_str()).collect();
        self.nodes
            .keys()
            .filter(|id| !has_incoming.contains(id.as_str()))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Running,
    Completed,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowExecution {
    pub execution_id: String,
    pub graph: WorkflowGraph,
    pub status: ExecutionStatus,
    pub started_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<chrono::DateTime<chrono::Utc>>,
    pub results: BTreeMap<String, DslValue>,
}

impl WorkflowExecution {
    pub fn new(execution_id: impl Into<String>, graph: WorkflowGraph) -> Self {
        WorkflowExecution {
            execution_id: execution_id.into(),
            graph,
            status: ExecutionStatus::Running,
            started_at: chrono::Utc::now(),
            ended_at: None,
            results: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, kind: NodeKind) -> WorkflowNode {
        WorkflowNode::new(id, kind)
    }

    #[test]
    fn entry_nodes_excludes_targets() {
        let mut nodes = BTreeMap::new();
        for id in ["a", "b", "c"] {
            nodes.insert(id.to_string(), node(id, NodeKind::Tool));
        }
        let edges = vec![
            WorkflowEdge {
                id: "e1".into(),
                source: "a".into(),
                target: "b".into(),
                kind: EdgeKind::Default,
            },
            WorkflowEdge {
                id: "e2".into(),
                source: "a".into(),
                target: "c".into(),
                kind: EdgeKind::Default,
            },
        ];
        let graph = WorkflowGraph::new(nodes, edges);
        assert_eq!(graph.entry_nodes(), vec!["a".to_string()]);
    }

    #[test]
    fn single_self_loop_has_no_entry_node() {
        let mut nodes = BTreeMap::new();
        nodes.insert("n1".to_string(), node("n1", NodeKind::Tool));
        let edges = vec![WorkflowEdge {
            id: "e1".into(),
            source: "n1".into(),
            target: "n1".into(),
            kind: EdgeKind::Default,
        }];
        let graph = WorkflowGraph::new(nodes, edges);
        assert!(graph.entry_nodes().is_empty());
    }

    #[test]
    fn targets_of_reflects_adjacency() {
        let mut nodes = BTreeMap::new();
        for id in ["a", "b"] {
            nodes.insert(id.to_string(), node(id, NodeKind::Tool));
        }
        let edges = vec![WorkflowEdge {
            id: "e1".into(),
            source: "a".into(),
            target: "b".into(),
            kind: EdgeKind::Default,
        }];
        let graph = WorkflowGraph::new(nodes, edges);
        assert_eq!(graph.targets_of("a"), &["b".to_string()]);
        assert!(graph.targets_of("b").is_empty());
    }
}
