// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! LLM adapter contract (spec §6 "LLM adapter contract").
//!
//! This crate specifies the one interface the orchestrator planner
//! consumes — it does not implement a concrete provider. When no adapter is
//! bound, or the bound adapter reports itself disabled, the planner must
//! fall back to its local path A (DSL analyzer) only.

use async_trait::async_trait;
use praxis_types::{NetworkContext, WorkflowPlan};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM adapter is disabled")]
    Disabled,
    #[error("LLM adapter request failed: {0}")]
    RequestFailed(String),
    #[error("LLM adapter produced an invalid plan: {0}")]
    InvalidPlan(String),
}

/// The one interface the planner consumes (spec §6).
#[async_trait]
pub trait LlmAdapter: Send + Sync {
    /// Whether this adapter is currently able to serve requests. The
    /// planner must function using path A alone when this returns `false`.
    fn is_enabled(&self) -> bool;

    /// Turn free-form natural language into a `WorkflowPlan`, given a
    /// snapshot of the currently known network (agent-ids eligible for
    /// dispatch).
    async fn generate_workflow_from_natural_language(
        &self,
        text: &str,
        network: &NetworkContext,
    ) -> Result<WorkflowPlan, LlmError>;

    /// Validate a plan (whether self-generated or supplied by a caller)
    /// against the current network context.
    fn validate_workflow_plan(
        &self,
        plan: &WorkflowPlan,
        network: &NetworkContext,
    ) -> Result<(), LlmError>;
}

/// The null adapter: always disabled, every call fails with
/// [`LlmError::Disabled`]. This is what the agent facade binds when no LLM
/// is configured, so the core keeps working exactly as the spec requires
/// ("the core must work when it is absent").
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLlmAdapter;

#[async_trait]
impl LlmAdapter for DisabledLlmAdapter {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn generate_workflow_from_natural_language(
        &self,
        _text: &str,
        _network: &NetworkContext,
    ) -> Result<WorkflowPlan, LlmError> {
        Err(LlmError::Disabled)
    }

    fn validate_workflow_plan(
        &self,
        _plan: &WorkflowPlan,
        _network: &NetworkContext,
    ) -> Result<(), LlmError> {
        Err(LlmError::Disabled)
    }
}

/// A pre-scripted adapter for tests: returns a fixed plan regardless of
/// input text, and accepts whatever validation its caller asks of
/// `validate_workflow_plan` using the same rules path B applies. Mirrors the
/// teacher's `ScriptedMockProvider`, which pops canned responses rather than
/// calling out to a real model.
pub struct ScriptedLlmAdapter {
    plan: WorkflowPlan,
}

impl ScriptedLlmAdapter {
    pub fn new(plan: WorkflowPlan) -> Self {
        ScriptedLlmAdapter { plan }
    }
}

#[async_trait]
impl LlmAdapter for ScriptedLlmAdapter {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn generate_workflow_from_natural_language(
        &self,
        _text: &str,
        _network: &NetworkContext,
    ) -> Result<WorkflowPlan, LlmError> {
        Ok(self.plan.clone())
    }

    fn validate_workflow_plan(
        &self,
        plan: &WorkflowPlan,
        network: &NetworkContext,
    ) -> Result<(), LlmError> {
        if plan.description.trim().is_empty() {
            return Err(LlmError::InvalidPlan("description must not be empty".into()));
        }
        if plan.nodes.is_empty() {
            return Err(LlmError::InvalidPlan("plan must have at least one node".into()));
        }
        for node in &plan.nodes {
            if node.is_tool_node() {
                if node.tool_name.is_none() {
                    return Err(LlmError::InvalidPlan(format!(
                        "tool node {} missing tool-name",
                        node.id
                    )));
                }
                match &node.agent_id {
                    Some(agent_id) if network.has_agent(agent_id) => {}
                    Some(agent_id) => {
                        return Err(LlmError::InvalidPlan(format!(
                            "tool node {} references unknown agent {agent_id}",
                            node.id
                        )))
                    }
                    None => {
                        return Err(LlmError::InvalidPlan(format!(
                            "tool node {} missing agent-id",
                            node.id
                        )))
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use praxis_types::{PlanMetadata, PlanNode};

    fn sample_plan() -> WorkflowPlan {
        WorkflowPlan {
            description: "read a file".into(),
            nodes: vec![PlanNode {
                id: "n1".into(),
                kind: "tool".into(),
                agent_id: Some("local".into()),
                tool_name: Some("read_file".into()),
                args: Default::default(),
                depends_on: vec![],
                position: Default::default(),
            }],
            edges: vec![],
            metadata: PlanMetadata::default(),
        }
    }

    #[tokio::test]
    async fn disabled_adapter_reports_disabled_and_fails_every_call() {
        let adapter = DisabledLlmAdapter;
        assert!(!adapter.is_enabled());
        let network = NetworkContext::default();
        let err = adapter
            .generate_workflow_from_natural_language("do it", &network)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Disabled));
        assert!(matches!(
            adapter.validate_workflow_plan(&sample_plan(), &network),
            Err(LlmError::Disabled)
        ));
    }

    #[tokio::test]
    async fn scripted_adapter_returns_the_canned_plan() {
        let adapter = ScriptedLlmAdapter::new(sample_plan());
        let network = NetworkContext::default();
        let plan = adapter
            .generate_workflow_from_natural_language("anything", &network)
            .await
            .unwrap();
        assert_eq!(plan.description, "read a file");
    }

    #[test]
    fn scripted_adapter_rejects_plan_referencing_unknown_agent() {
        let mut plan = sample_plan();
        plan.nodes[0].agent_id = Some("peer-9".into());
        let adapter = ScriptedLlmAdapter::new(plan.clone());
        let network = NetworkContext::default();
        assert!(adapter.validate_workflow_plan(&plan, &network).is_err());
    }

    #[test]
    fn scripted_adapter_accepts_known_peer_agent() {
        let mut plan = sample_plan();
        plan.nodes[0].agent_id = Some("peer-9".into());
        let network = NetworkContext {
            known_agent_ids: vec!["peer-9".into()],
        };
        let adapter = ScriptedLlmAdapter::new(plan.clone());
        assert!(adapter.validate_workflow_plan(&plan, &network).is_ok());
    }
}
