// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! External workflow plan shape — the thing the (optional) LLM adapter
//! produces and the orchestrator planner's path B consumes (spec §4.4
//! "Planning path B", §6 "LLM adapter contract").

use serde::{Deserialize, Serialize};

use crate::graph::Position;
use crate::value::ArgMap;

/// One node in an externally-supplied plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanNode {
    pub id: String,
    pub kind: String,
    #[serde(rename = "agent-id", default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(rename = "tool-name", default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub args: ArgMap,
    #[serde(rename = "depends-on", default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub position: Position,
}

impl PlanNode {
    pub fn is_tool_node(&self) -> bool {
        self.kind == "tool"
    }

    pub fn is_local_agent(&self) -> bool {
        matches!(self.agent_id.as_deref(), Some("local"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanEdgeKind {
    Default,
    Dependency,
}

impl Default for PlanEdgeKind {
    fn default() -> Self {
        PlanEdgeKind::Default
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub kind: PlanEdgeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanMetadata {
    pub complexity: String,
    #[serde(rename = "parallelism-factor", default)]
    pub parallelism_factor: f64,
    #[serde(rename = "estimated-duration-ms", default)]
    pub estimated_duration_ms: i64,
    #[serde(rename = "critical-path", default)]
    pub critical_path: Vec<String>,
}

impl Default for PlanMetadata {
    fn default() -> Self {
        PlanMetadata {
            complexity: "simple".to_string(),
            parallelism_factor: 1.0,
            estimated_duration_ms: 0,
            critical_path: Vec::new(),
        }
    }
}

/// An externally-supplied (or LLM-generated) workflow plan (spec §4.4 path
/// B step 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowPlan {
    pub description: String,
    pub nodes: Vec<PlanNode>,
    #[serde(default)]
    pub edges: Vec<PlanEdge>,
    #[serde(default)]
    pub metadata: PlanMetadata,
}

/// Snapshot of the network the planner/LLM adapter can consult when
/// validating agent-ids in a plan (spec §4.4 path B step 2: "every
/// non-`local` agent-id exists in the current network context").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkContext {
    pub known_agent_ids: Vec<String>,
}

impl NetworkContext {
    pub fn has_agent(&self, agent_id: &str) -> bool {
        agent_id == "local" || self.known_agent_ids.iter().any(|a| a == agent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_context_always_knows_local() {
        let ctx = NetworkContext::default();
        assert!(ctx.has_agent("local"));
        assert!(!ctx.has_agent("peer-1"));
    }

    #[test]
    fn plan_metadata_defaults_to_simple() {
        assert_eq!(PlanMetadata::default().complexity, "simple");
    }
}
