// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! The workflow executor: a DAG scheduler that fans out from entry nodes,
//! dispatches each node by kind, and joins every spawned traversal (spec
//! §4.5).

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use praxis_dsl::AgentCollaborator;
use praxis_events::EventBus;
use praxis_types::{
    DslValue, LogLevel, NodeKind, NodeStatus, ParamStore, WorkflowEdge, WorkflowExecution,
    WorkflowGraph, WorkflowNode,
};
use tokio::sync::RwLock;
use tracing::warn;

use crate::dispatch::dispatch_node;
use crate::error::ExecutorError;

/// Delay between a node's success and spawning traversal of its children,
/// so status-update events reach subscribers in a rendering-friendly order.
const PACING_DELAY: Duration = Duration::from_millis(20);

pub struct WorkflowExecutor {
    events: Arc<EventBus>,
    collaborator: Option<Arc<dyn AgentCollaborator>>,
    executions: RwLock<HashMap<String, Arc<RwLock<WorkflowExecution>>>>,
}

impl WorkflowExecutor {
    pub fn new(events: Arc<EventBus>) -> Self {
        WorkflowExecutor {
            events,
            collaborator: None,
            executions: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_collaborator(mut self, collaborator: Arc<dyn AgentCollaborator>) -> Self {
        self.collaborator = Some(collaborator);
        self
    }

    /// Build the graph, fan out from its entry nodes, and run every node to
    /// completion. Returns a summary `{status, execution-id, node-count}`.
    pub async fn execute_workflow(
        &self,
        execution_id: impl Into<String>,
        nodes: Vec<WorkflowNode>,
        edges: Vec<WorkflowEdge>,
        store: ParamStore,
    ) -> Result<serde_json::Value, ExecutorError> {
        let execution_id = execution_id.into();
        if nodes.is_empty() {
            return Err(ExecutorError::EmptyGraph);
        }

        let node_map: BTreeMap<String, WorkflowNode> =
            nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
        let node_count = node_map.len();
        let graph = WorkflowGraph::new(node_map, edges);
        let entries = entry_nodes_with_fallback(&graph);

        let execution = WorkflowExecution::new(execution_id.clone(), graph);
        let state = Arc::new(RwLock::new(execution));
        self.executions
            .write()
            .await
            .insert(execution_id.clone(), state.clone());

        let store = Arc::new(store);
        let started = chrono::Utc::now();

        let handles: Vec<_> = entries
            .into_iter()
            .map(|entry| {
                tokio::spawn(run_node(
                    state.clone(),
                    self.events.clone(),
                    self.collaborator.clone(),
                    store.clone(),
                    entry,
                ))
            })
            .collect();

        let mut all_ok = true;
        for handle in handles {
            match handle.await {
                Ok(ok) => all_ok &= ok,
                Err(_) => all_ok = false,
            }
        }

        let duration_ms = (chrono::Utc::now() - started).num_milliseconds();
        {
            let mut exec = state.write().await;
            exec.status = if all_ok {
                praxis_types::ExecutionStatus::Completed
            } else {
                praxis_types::ExecutionStatus::Error
            };
            exec.ended_at = Some(chrono::Utc::now());
        }

        if all_ok {
            self.events
                .publish_workflow_complete(execution_id.clone(), duration_ms, node_count);
        } else {
            self.events.publish_workflow_error(
                execution_id.clone(),
                "one or more workflow nodes failed",
            );
        }

        Ok(serde_json::json!({
            "status": if all_ok { "completed" } else { "error" },
            "execution-id": execution_id,
            "node-count": node_count,
            "duration-ms": duration_ms,
        }))
    }

    /// `GetWorkflowStatus(id)`: the execution overview plus per-node status.
    pub async fn workflow_status(&self, execution_id: &str) -> Result<serde_json::Value, ExecutorError> {
        let executions = self.executions.read().await;
        let state = executions
            .get(execution_id)
            .ok_or_else(|| ExecutorError::UnknownExecution(execution_id.to_string()))?;
        let exec = state.read().await;

        let nodes: serde_json::Value = exec
            .graph
            .nodes
            .values()
            .map(|n| (n.id.clone(), serde_json::json!({"status": n.status})))
            .collect::<serde_json::Map<_, _>>()
            .into();

        Ok(serde_json::json!({
            "execution-id": exec.execution_id,
            "status": exec.status,
            "started-at": exec.started_at,
            "ended-at": exec.ended_at,
            "nodes": nodes,
        }))
    }
}

/// Entry nodes per spec step 2: nodes with no incoming edge; if none exist,
/// prefer a node of kind `agent`, else the first node in iteration order.
fn entry_nodes_with_fallback(graph: &WorkflowGraph) -> Vec<String> {
    let entries = graph.entry_nodes();
    if !entries.is_empty() {
        return entries;
    }
    let fallback = graph
        .nodes
        .values()
        .find(|n| n.kind == NodeKind::Agent)
        .or_else(|| graph.nodes.values().next());
    fallback.map(|n| vec![n.id.clone()]).unwrap_or_default()
}

/// Visit one node: cycle-guard, dispatch, record result, then recursively
/// fan out into its children after a pacing delay. Returns whether this
/// node and every descendant it spawned succeeded.
fn run_node(
    state: Arc<RwLock<WorkflowExecution>>,
    events: Arc<EventBus>,
    collaborator: Option<Arc<dyn AgentCollaborator>>,
    store: Arc<ParamStore>,
    node_id: String,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = bool> + Send>> {
    Box::pin(async move {
        let execution_id = { state.read().await.execution_id.clone() };

        let node = {
            let mut exec = state.write().await;
            let Some(node) = exec.graph.nodes.get(&node_id) else {
                warn!(node_id, "traversal target not present in graph, skipping");
                return true;
            };
            if matches!(node.status, NodeStatus::Running | NodeStatus::Success) {
                return true;
            }
            let node = exec.graph.nodes.get_mut(&node_id).unwrap();
            node.status = NodeStatus::Running;
            node.clone()
        };

        events.publish_node_status_update(&execution_id, &node_id, NodeStatus::Running);
        events.publish_workflow_log(
            &execution_id,
            LogLevel::Info,
            format!("executing node {node_id} ({:?})", node.kind),
        );

        let outcome = dispatch_node(&node, &store, collaborator.as_ref()).await;
        let ok = outcome.is_ok();

        {
            let mut exec = state.write().await;
            if let Some(n) = exec.graph.nodes.get_mut(&node_id) {
                n.status = if ok { NodeStatus::Success } else { NodeStatus::Error };
            }
            let value = match &outcome {
                Ok(v) => DslValue::from_json(v),
                Err(e) => {
                    let masked = praxis_dsl::mask_secrets(e, &store);
                    DslValue::from_json(&serde_json::json!({"status": "failed", "error": masked}))
                }
            };
            exec.results.insert(node_id.clone(), value);
        }

        events.publish_node_status_update(
            &execution_id,
            &node_id,
            if ok { NodeStatus::Success } else { NodeStatus::Error },
        );
        if let Err(error) = &outcome {
            let masked_error = praxis_dsl::mask_secrets(error, &store);
            events.publish_workflow_log(
                &execution_id,
                LogLevel::Error,
                format!("node {node_id} failed: {masked_error}"),
            );
        }

        let targets = { state.read().await.graph.targets_of(&node_id).to_vec() };
        let mut children_ok = true;
        if !targets.is_empty() {
            tokio::time::sleep(PACING_DELAY).await;
            let handles: Vec<_> = targets
                .into_iter()
                .map(|target| {
                    tokio::spawn(run_node(
                        state.clone(),
                        events.clone(),
                        collaborator.clone(),
                        store.clone(),
                        target,
                    ))
                })
                .collect();
            for handle in handles {
                match handle.await {
                    Ok(child_ok) => children_ok &= child_ok,
                    Err(_) => children_ok = false,
                }
            }
        }

        ok && children_ok
    })
}
