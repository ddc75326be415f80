// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Workflow executor: a DAG scheduler over a stored or externally-submitted
//! workflow graph (spec §4.5).

pub mod dispatch;
pub mod error;
pub mod executor;

pub use error::ExecutorError;
pub use executor::WorkflowExecutor;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use praxis_events::EventBus;
    use praxis_types::{
        ArgMap, DslValue, EdgeKind, NodeKind, ParamStore, WorkflowEdge, WorkflowNode,
    };

    use super::*;

    fn tool_node(id: &str, tool_name: &str) -> WorkflowNode {
        let mut node = WorkflowNode::new(id, NodeKind::Tool);
        let mut data = ArgMap::new();
        data.insert("tool-name".into(), DslValue::str(tool_name));
        data.insert("args".into(), DslValue::Map(ArgMap::new()));
        node.data = data;
        node
    }

    fn edge(id: &str, source: &str, target: &str) -> WorkflowEdge {
        WorkflowEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            kind: EdgeKind::Default,
        }
    }

    #[tokio::test]
    async fn a_linear_workflow_completes_and_runs_every_node() {
        let executor = WorkflowExecutor::new(Arc::new(EventBus::new()));
        let nodes = vec![
            WorkflowNode::new("orchestrator", NodeKind::Orchestrator),
            tool_node("n1", "read_file"),
            tool_node("n2", "write_file"),
        ];
        let edges = vec![edge("e1", "orchestrator", "n1"), edge("e2", "n1", "n2")];

        let summary = executor
            .execute_workflow("exec-1", nodes, edges, ParamStore::new())
            .await
            .unwrap();
        assert_eq!(summary["status"], "completed");
        assert_eq!(summary["node-count"], 3);

        let status = executor.workflow_status("exec-1").await.unwrap();
        assert_eq!(status["nodes"]["n2"]["status"], "success");
    }

    #[tokio::test]
    async fn a_cyclic_graph_with_no_entry_node_still_runs_via_fallback() {
        let executor = WorkflowExecutor::new(Arc::new(EventBus::new()));
        let nodes = vec![tool_node("n1", "read_file")];
        let edges = vec![edge("e1", "n1", "n1")];

        let summary = executor
            .execute_workflow("exec-2", nodes, edges, ParamStore::new())
            .await
            .unwrap();
        assert_eq!(summary["status"], "completed");
    }

    #[tokio::test]
    async fn empty_node_list_is_rejected() {
        let executor = WorkflowExecutor::new(Arc::new(EventBus::new()));
        let err = executor
            .execute_workflow("exec-3", vec![], vec![], ParamStore::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutorError::EmptyGraph));
    }

    #[tokio::test]
    async fn unknown_execution_status_lookup_errors() {
        let executor = WorkflowExecutor::new(Arc::new(EventBus::new()));
        assert!(executor.workflow_status("nope").await.is_err());
    }

    struct FailingAgent;

    #[async_trait]
    impl praxis_dsl::AgentCollaborator for FailingAgent {
        fn has_local_tool(&self, _tool_name: &str) -> bool {
            true
        }

        async fn execute_local_tool(
            &self,
            _tool_name: &str,
            _args: &ArgMap,
        ) -> Result<serde_json::Value, String> {
            Err("disk full".to_string())
        }

        async fn find_agent_with_tool(&self, _tool_name: &str) -> Option<String> {
            None
        }

        async fn execute_remote_tool(
            &self,
            _peer_id: &str,
            _tool_name: &str,
            _args: &ArgMap,
        ) -> Result<serde_json::Value, String> {
            Err("not reached".to_string())
        }
    }

    #[tokio::test]
    async fn a_failing_node_marks_the_whole_workflow_error() {
        let executor = WorkflowExecutor::new(Arc::new(EventBus::new()))
            .with_collaborator(Arc::new(FailingAgent));
        let nodes = vec![tool_node("n1", "write_file")];
        let summary = executor
            .execute_workflow("exec-4", nodes, vec![], ParamStore::new())
            .await
            .unwrap();
        assert_eq!(summary["status"], "error");
    }
}
