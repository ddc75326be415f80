// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Orchestrator planner (spec §4.4): converts either raw DSL text or an
//! externally-supplied plan into an executable workflow graph plus a UI
//! graph, and stores the pair under a generated workflow-id for deferred
//! execution.

pub mod complexity;
pub mod defaults;
pub mod error;
pub mod path_a;
pub mod path_b;
pub mod registry;

pub use error::PlannerError;
pub use registry::{StoredWorkflow, WorkflowRegistry};

use std::sync::Arc;

use praxis_dsl::AgentCollaborator;
use praxis_events::EventBus;
use praxis_types::{DslProgressStage, NetworkContext, ParamStore, WorkflowPlan};

pub struct OrchestratorPlanner {
    events: Arc<EventBus>,
    registry: Arc<WorkflowRegistry>,
    collaborator: Option<Arc<dyn AgentCollaborator>>,
}

impl OrchestratorPlanner {
    pub fn new(events: Arc<EventBus>, registry: Arc<WorkflowRegistry>) -> Self {
        OrchestratorPlanner {
            events,
            registry,
            collaborator: None,
        }
    }

    pub fn with_collaborator(mut self, collaborator: Arc<dyn AgentCollaborator>) -> Self {
        self.collaborator = Some(collaborator);
        self
    }

    /// Path A: tokenize/parse `text` locally and select agents per-call.
    /// Returns the generated workflow-id the plan was stored under.
    pub async fn plan_from_dsl(&self, text: &str) -> Result<String, PlannerError> {
        let workflow_id = uuid::Uuid::new_v4().to_string();
        self.emit_progress(&workflow_id, DslProgressStage::Analyzing);
        let output =
            path_a::plan_from_text(text, ParamStore::new(), self.collaborator.as_ref()).await?;

        self.emit_progress(&workflow_id, DslProgressStage::Discovering);
        self.emit_progress(&workflow_id, DslProgressStage::Matching);
        self.emit_progress(&workflow_id, DslProgressStage::Generating);

        self.registry.store(StoredWorkflow {
            workflow_id: workflow_id.clone(),
            execution_ast: output.execution_ast,
            ui_graph: output.ui_graph.clone(),
            original_text: Some(text.to_string()),
        });
        self.events
            .publish_workflow_planned(workflow_id.clone(), output.ui_graph);
        self.emit_progress(&workflow_id, DslProgressStage::Complete);

        Ok(workflow_id)
    }

    /// Path B: validate and lower an externally-supplied plan.
    pub fn plan_from_external(
        &self,
        plan: WorkflowPlan,
        network: &NetworkContext,
    ) -> Result<String, PlannerError> {
        let workflow_id = uuid::Uuid::new_v4().to_string();
        self.emit_progress(&workflow_id, DslProgressStage::Analyzing);
        self.emit_progress(&workflow_id, DslProgressStage::Discovering);
        self.emit_progress(&workflow_id, DslProgressStage::Matching);

        let output = path_b::plan_from_external(plan, network)?;

        self.emit_progress(&workflow_id, DslProgressStage::Generating);
        self.registry.store(StoredWorkflow {
            workflow_id: workflow_id.clone(),
            execution_ast: output.execution_ast,
            ui_graph: output.ui_graph.clone(),
            original_text: None,
        });
        self.events
            .publish_workflow_planned(workflow_id.clone(), output.ui_graph);
        self.emit_progress(&workflow_id, DslProgressStage::Complete);

        Ok(workflow_id)
    }

    /// Non-destructive lookup of peer cards is implemented by the agent
    /// facade (which owns the p2p layer); the planner only needs the
    /// snapshot at validation/selection time, passed in by the caller.
    fn emit_progress(&self, workflow_id: &str, stage: DslProgressStage) {
        self.events.publish_dsl_progress(workflow_id, stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use praxis_types::Event;

    fn planner() -> (OrchestratorPlanner, Arc<EventBus>) {
        let events = Arc::new(EventBus::new());
        let registry = Arc::new(WorkflowRegistry::new());
        (OrchestratorPlanner::new(events.clone(), registry), events)
    }

    #[tokio::test]
    async fn plan_from_dsl_stores_a_retrievable_workflow() {
        let (planner, _events) = planner();
        let id = planner.plan_from_dsl("CALL read_file a.txt").await.unwrap();
        let stored = planner.registry.take(&id).unwrap();
        assert_eq!(stored.execution_ast.len(), 1);
        assert!(stored.ui_graph.nodes.contains_key("orchestrator"));
    }

    #[tokio::test]
    async fn progress_events_arrive_in_strict_spec_order() {
        let (planner, events) = planner();
        let mut rx = events.subscribe();
        planner.plan_from_dsl("CALL read_file a.txt").await.unwrap();

        let mut stages = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let Event::DslProgress { stage, .. } = event {
                stages.push(stage);
            }
        }
        assert_eq!(
            stages,
            vec![
                DslProgressStage::Analyzing,
                DslProgressStage::Discovering,
                DslProgressStage::Matching,
                DslProgressStage::Generating,
                DslProgressStage::Complete,
            ]
        );
    }

    #[test]
    fn plan_from_external_rejects_invalid_plans_without_storing() {
        let (planner, _events) = planner();
        let plan = WorkflowPlan {
            description: String::new(),
            nodes: vec![],
            edges: vec![],
            metadata: Default::default(),
        };
        assert!(planner
            .plan_from_external(plan, &NetworkContext::default())
            .is_err());
        assert!(planner.registry.is_empty());
    }
}
