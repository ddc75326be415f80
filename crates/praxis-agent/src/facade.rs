// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! `AgentFacade` — the single entry point a binary (or RPC handler) drives:
//! submit DSL text, plan an externally-supplied workflow, execute a stored
//! workflow, or start the P2P swarm (spec §4.8, §2 item 8).
//!
//! Grounded on `sven-node`'s top-level `Node` type, which likewise owns every
//! component and exposes a small facade surface rather than letting callers
//! reach into the planner/executor/p2p layers directly.

use std::sync::Arc;

use praxis_cache::ToolCache;
use praxis_config::Config;
use praxis_dsl::{execute as dsl_execute, AgentCollaborator, ExecCtx};
use praxis_events::EventBus;
use praxis_executor::WorkflowExecutor;
use praxis_llm::{DisabledLlmAdapter, LlmAdapter};
use praxis_p2p::{P2pConfig, P2pError, P2pEvent, P2pHandle, P2pNode};
use praxis_planner::{OrchestratorPlanner, WorkflowRegistry};
use praxis_tasks::TaskManager;
use praxis_types::{ArgMap, NetworkContext, ParamStore, WorkflowPlan};

use crate::core::AgentCore;
use crate::error::AgentError;

/// Binds every component of a running agent. Cheap to clone: everything it
/// holds is already an `Arc` or is itself internally `Arc`-backed.
#[derive(Clone)]
pub struct AgentFacade {
    core: Arc<AgentCore>,
    cache: Arc<ToolCache>,
    events: Arc<EventBus>,
    tasks: Arc<TaskManager>,
    registry: Arc<WorkflowRegistry>,
    planner: Arc<OrchestratorPlanner>,
    executor: Arc<WorkflowExecutor>,
    llm: Arc<dyn LlmAdapter>,
}

impl AgentFacade {
    /// Wires every component together from loaded configuration. The same
    /// `Arc<AgentCore>` is handed to both the planner and the executor so
    /// remote-tool lookup and local-tool dispatch stay consistent between
    /// DSL execution (path A) and DAG execution (path B).
    pub fn new(config: &Config, tools: praxis_tools::ToolRegistry) -> Self {
        let events = Arc::new(EventBus::new());
        let cache = Arc::new(ToolCache::new(
            config.cache.max_size,
            std::time::Duration::from_secs(config.cache.ttl_secs),
        ));
        let tasks = Arc::new(TaskManager::new((*events).clone()));
        let registry = Arc::new(WorkflowRegistry::new());
        let core = Arc::new(AgentCore::new(tools, config.agent.clone()));

        let collaborator: Arc<dyn AgentCollaborator> = core.clone();
        let planner = Arc::new(
            OrchestratorPlanner::new(events.clone(), registry.clone())
                .with_collaborator(collaborator.clone()),
        );
        let executor = Arc::new(
            WorkflowExecutor::new(events.clone()).with_collaborator(collaborator),
        );

        AgentFacade {
            core,
            cache,
            events,
            tasks,
            registry,
            planner,
            executor,
            llm: Arc::new(DisabledLlmAdapter),
        }
    }

    pub fn events(&self) -> Arc<EventBus> {
        self.events.clone()
    }

    pub fn tasks(&self) -> Arc<TaskManager> {
        self.tasks.clone()
    }

    /// The bound LLM adapter, `DisabledLlmAdapter` unless a binary has
    /// replaced it (spec §4.8 leaves real LLM wiring out of scope).
    pub fn llm(&self) -> Arc<dyn LlmAdapter> {
        self.llm.clone()
    }

    pub fn has_local_tool(&self, tool_name: &str) -> bool {
        self.core.has_local_tool(tool_name)
    }

    pub async fn execute_local_tool(
        &self,
        tool_name: &str,
        args: &ArgMap,
    ) -> Result<serde_json::Value, String> {
        self.core.run_local_tool(tool_name, args).await
    }

    pub async fn find_agent_with_tool(&self, tool_name: &str) -> Option<String> {
        self.core.find_remote_peer(tool_name).await
    }

    pub async fn execute_remote_tool(
        &self,
        peer_id: &str,
        tool_name: &str,
        args: &ArgMap,
    ) -> Result<serde_json::Value, String> {
        self.core.call_remote_tool(peer_id, tool_name, args).await
    }

    pub async fn dispatch_a2a_request(
        &self,
        request: praxis_types::JsonRpcRequest,
    ) -> praxis_types::JsonRpcResponse {
        self.core.dispatch_rpc(request).await
    }

    /// Starts the libp2p swarm on its own task and binds the resulting
    /// handle into `core` so remote-tool discovery and A2A dispatch start
    /// working. Returns the handle for callers that also want direct
    /// access (e.g. a CLI `serve` command printing the local peer id).
    pub fn start_p2p(&self, config: &Config) -> Result<P2pHandle, P2pError> {
        let listen_addr = config
            .network
            .listen_addr
            .parse()
            .map_err(|e| P2pError::Transport(format!("invalid listen address: {e}")))?;

        let mut p2p_config = P2pConfig::new(listen_addr, self.core.card());
        p2p_config.discovery_stabilization_delay =
            std::time::Duration::from_secs(config.discovery.stabilization_delay_secs);
        p2p_config.reconciliation_interval =
            std::time::Duration::from_secs(config.discovery.reconciliation_interval_secs);
        p2p_config.peer_timeout = std::time::Duration::from_secs(config.discovery.peer_timeout_secs);

        let node = P2pNode::new(p2p_config, self.core.clone())?;
        let handle = node.handle();
        self.core.bind_p2p(handle.clone());

        let mut p2p_events = handle.subscribe_events();
        let bus = self.events.clone();
        tokio::spawn(async move {
            loop {
                match p2p_events.recv().await {
                    Ok(event) => forward_p2p_event(&bus, event),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "p2p event bridge lagged, dropping oldest events");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        tokio::spawn(async move {
            if let Err(error) = node.run().await {
                tracing::warn!(%error, "p2p node stopped");
            }
        });
        Ok(handle)
    }

    /// Tokenizes, parses, and immediately runs DSL text without going
    /// through the planner/registry detour — the synchronous "just run
    /// this" path a CLI's `run` subcommand wants (spec §4.3 + §8 scenario 1).
    pub async fn submit_dsl(&self, text: &str) -> Result<serde_json::Value, AgentError> {
        let analyzed = praxis_dsl::analyze_dsl(text, ParamStore::new())?;
        let ctx = ExecCtx::new(Arc::new(analyzed.store), self.cache.clone())
            .with_collaborator(self.collaborator());
        Ok(dsl_execute(analyzed.nodes, ctx).await?)
    }

    /// Plans DSL text via the orchestrator (path A), storing the result
    /// under a generated workflow-id for later execution.
    pub async fn plan_from_dsl(&self, text: &str) -> Result<String, AgentError> {
        Ok(self.planner.plan_from_dsl(text).await?)
    }

    /// Validates and lowers an externally-supplied plan (path B), storing
    /// the result under a generated workflow-id for later execution.
    pub async fn plan_from_external(&self, plan: WorkflowPlan) -> Result<String, AgentError> {
        let network = NetworkContext {
            known_agent_ids: self.core.known_peers().await,
        };
        Ok(self.planner.plan_from_external(plan, &network)?)
    }

    /// Executes a previously stored workflow and removes it from the
    /// registry. Path A workflows (built from raw DSL text) replay their
    /// `execution_ast` through the DSL walker; path B workflows (built from
    /// an externally-supplied plan) run their `ui_graph` through the DAG
    /// executor, since only path B's graph carries real tool/agent args.
    pub async fn execute_stored_workflow(
        &self,
        workflow_id: &str,
    ) -> Result<serde_json::Value, AgentError> {
        let stored = self
            .registry
            .take(workflow_id)
            .ok_or_else(|| AgentError::WorkflowNotFound(workflow_id.to_string()))?;

        if stored.original_text.is_some() {
            let ctx = ExecCtx::new(Arc::new(ParamStore::new()), self.cache.clone())
                .with_collaborator(self.collaborator());
            Ok(dsl_execute(stored.execution_ast, ctx).await?)
        } else {
            let nodes = stored.ui_graph.nodes.into_values().collect();
            let edges = stored.ui_graph.edges;
            Ok(self
                .executor
                .execute_workflow(workflow_id, nodes, edges, ParamStore::new())
                .await?)
        }
    }

    fn collaborator(&self) -> Arc<dyn AgentCollaborator> {
        self.core.clone()
    }
}

/// Translates a P2P-layer-local event onto the shared cross-cutting event
/// bus, so a subscriber never has to know the P2P protocol layer has its
/// own private broadcast channel (spec §4.1, §4.6).
fn forward_p2p_event(bus: &EventBus, event: P2pEvent) {
    match event {
        P2pEvent::PeerDiscovered { card, .. } => bus.publish(praxis_types::Event::PeerDiscovered { card }),
        P2pEvent::Connected { peer_id } => bus.publish_peer_connected(peer_id.to_string()),
        P2pEvent::Disconnected { peer_id } => bus.publish_peer_disconnected(peer_id.to_string()),
        P2pEvent::PeerLeft { peer_id } => bus.publish_peer_left(peer_id.to_string()),
        P2pEvent::Error(message) => bus.publish_p2p_error(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facade() -> AgentFacade {
        AgentFacade::new(&Config::default(), praxis_tools::ToolRegistry::with_builtins())
    }

    #[tokio::test]
    async fn submit_dsl_runs_a_local_tool_call() {
        let facade = facade();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "hi").unwrap();

        let text = format!("CALL read_file {}", path.display());
        let result = facade.submit_dsl(&text).await.unwrap();
        assert_eq!(result["status"], "completed");
    }

    #[tokio::test]
    async fn plan_then_execute_stored_dsl_workflow() {
        let facade = facade();
        let id = facade.plan_from_dsl("CALL list_files .").await.unwrap();
        let result = facade.execute_stored_workflow(&id).await.unwrap();
        assert_eq!(result["status"], "completed");
    }

    #[tokio::test]
    async fn executing_an_unknown_workflow_id_is_an_error() {
        let facade = facade();
        assert!(facade.execute_stored_workflow("nope").await.is_err());
    }

    #[tokio::test]
    async fn plan_from_external_rejects_an_empty_plan() {
        let facade = facade();
        let plan = WorkflowPlan {
            description: String::new(),
            nodes: vec![],
            edges: vec![],
            metadata: Default::default(),
        };
        assert!(facade.plan_from_external(plan).await.is_err());
    }
}
