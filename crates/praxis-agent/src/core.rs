// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! `AgentCore` — the local identity, tool registry, cache, and (optional)
//! bound P2P handle a running agent carries. Implements both seams the rest
//! of the workspace dispatches through: `AgentCollaborator` (consumed by
//! `praxis-dsl`/`praxis-planner`/`praxis-executor`) and `LocalToolHandler`
//! (consumed by `praxis-p2p` for inbound requests).
//!
//! Grounded on `sven-node`'s split between a long-lived node identity and
//! the swarm it may or may not have started yet — the p2p handle is bound
//! in after construction rather than required up front, so an agent can run
//! the DSL/executor/planner stack standalone with no network at all.

use std::sync::{Arc, RwLock as StdRwLock};

use async_trait::async_trait;
use praxis_config::AgentConfig;
use praxis_p2p::{LocalToolHandler, P2pError, P2pHandle};
use praxis_types::{
    ArgMap, DslValue, JsonRpcRequest, JsonRpcResponse, PeerCard, RpcEnvelope, ToolErrorShape,
    ToolRequest, ToolResponse, ERR_INTERNAL, ERR_INVALID_PARAMS, ERR_METHOD_NOT_FOUND,
};
use praxis_tools::ToolRegistry;

pub struct AgentCore {
    tools: ToolRegistry,
    identity: AgentConfig,
    p2p: StdRwLock<Option<P2pHandle>>,
}

impl AgentCore {
    pub fn new(tools: ToolRegistry, identity: AgentConfig) -> Self {
        AgentCore {
            tools,
            identity,
            p2p: StdRwLock::new(None),
        }
    }

    /// Binds the P2P layer's handle once the swarm has been started,
    /// enabling `find_agent_with_tool`/`execute_remote_tool` to actually
    /// reach peers instead of acting as if the network were absent.
    pub fn bind_p2p(&self, handle: P2pHandle) {
        *self.p2p.write().expect("p2p handle lock poisoned") = Some(handle);
    }

    fn p2p_handle(&self) -> Option<P2pHandle> {
        self.p2p.read().expect("p2p handle lock poisoned").clone()
    }

    /// This node's own capability card (spec §3 "Peer Card").
    pub fn card(&self) -> PeerCard {
        let peer_id = self
            .p2p_handle()
            .map(|h| h.local_peer_id().to_string())
            .unwrap_or_else(|| "local".to_string());
        PeerCard {
            name: self.identity.name.clone(),
            version: self.identity.version.clone(),
            peer_id,
            capabilities: self.identity.capabilities.clone(),
            tools: self.tools.tool_specs(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn has_local_tool(&self, tool_name: &str) -> bool {
        self.tools.has(tool_name)
    }

    pub fn tool_registry(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Runs a locally registered tool directly (bypassing the registry's
    /// own error-to-`{"error": ...}` wrapping) so callers get a real `Err`
    /// on tool failure, as the `AgentCollaborator` contract requires.
    pub async fn run_local_tool(
        &self,
        tool_name: &str,
        args: &ArgMap,
    ) -> Result<serde_json::Value, String> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| format!("unknown tool: {tool_name}"))?;
        tool.execute(&DslValue::Map(args.clone()).to_json()).await
    }

    /// Every peer id this agent's P2P layer currently knows about, used by
    /// the facade to build a `NetworkContext` for path B plan validation.
    pub async fn known_peers(&self) -> Vec<String> {
        match self.p2p_handle() {
            Some(handle) => handle.known_peers().await.iter().map(|p| p.to_string()).collect(),
            None => Vec::new(),
        }
    }

    /// First peer whose cached card advertises `tool_name`, if the P2P
    /// layer is bound and has learned of one.
    pub async fn find_remote_peer(&self, tool_name: &str) -> Option<String> {
        let handle = self.p2p_handle()?;
        handle
            .peers_with_tool(tool_name)
            .await
            .first()
            .map(|p| p.to_string())
    }

    pub async fn call_remote_tool(
        &self,
        peer_id: &str,
        tool_name: &str,
        args: &ArgMap,
    ) -> Result<serde_json::Value, String> {
        let handle = self
            .p2p_handle()
            .ok_or_else(|| "p2p layer is not bound".to_string())?;
        let peer: libp2p::PeerId = peer_id
            .parse()
            .map_err(|e| format!("invalid peer id {peer_id}: {e}"))?;
        let request = ToolRequest {
            id: uuid::Uuid::new_v4().to_string(),
            name: tool_name.to_string(),
            arguments: DslValue::Map(args.clone()).to_json(),
            timestamp: chrono::Utc::now().timestamp(),
        };
        let response = handle.call_tool(peer, request).await.map_err(|e| e.to_string())?;
        match (response.result, response.error) {
            (Some(value), _) => Ok(value),
            (None, Some(err)) => Err(err.message),
            (None, None) => Ok(serde_json::Value::Null),
        }
    }

    /// Shared JSON-RPC 2.0 method dispatch, used both by `call_rpc` (inbound
    /// over `/praxis/a2a/1.0.0`) and the facade's `dispatch_a2a_request`
    /// (outbound-originated or locally-invoked requests).
    pub async fn dispatch_rpc(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "tools.list" => JsonRpcResponse::ok(
                request.id,
                serde_json::to_value(self.tools.tool_specs()).unwrap_or_default(),
            ),
            "card" => {
                JsonRpcResponse::ok(request.id, serde_json::to_value(self.card()).unwrap_or_default())
            }
            "tool.invoke" => {
                let params = request.params.clone().unwrap_or(serde_json::Value::Null);
                let name = params
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                if name.is_empty() {
                    return JsonRpcResponse::err(request.id, ERR_INVALID_PARAMS, "missing 'name'");
                }
                let args = args_from_json(params.get("arguments").unwrap_or(&serde_json::Value::Null));
                match self.run_local_tool(&name, &args).await {
                    Ok(value) => JsonRpcResponse::ok(request.id, value),
                    Err(err) => JsonRpcResponse::err(request.id, ERR_INTERNAL, err),
                }
            }
            other => JsonRpcResponse::err(
                request.id,
                ERR_METHOD_NOT_FOUND,
                format!("unknown method: {other}"),
            ),
        }
    }
}

fn args_from_json(value: &serde_json::Value) -> ArgMap {
    match DslValue::from_json(value) {
        DslValue::Map(map) => map,
        _ => ArgMap::new(),
    }
}

#[async_trait]
impl praxis_dsl::AgentCollaborator for AgentCore {
    fn has_local_tool(&self, tool_name: &str) -> bool {
        AgentCore::has_local_tool(self, tool_name)
    }

    async fn execute_local_tool(
        &self,
        tool_name: &str,
        args: &ArgMap,
    ) -> Result<serde_json::Value, String> {
        self.run_local_tool(tool_name, args).await
    }

    async fn find_agent_with_tool(&self, tool_name: &str) -> Option<String> {
        self.find_remote_peer(tool_name).await
    }

    async fn execute_remote_tool(
        &self,
        peer_id: &str,
        tool_name: &str,
        args: &ArgMap,
    ) -> Result<serde_json::Value, String> {
        self.call_remote_tool(peer_id, tool_name, args).await
    }
}

#[async_trait]
impl LocalToolHandler for AgentCore {
    fn card(&self) -> PeerCard {
        AgentCore::card(self)
    }

    async fn call_tool(&self, request: ToolRequest) -> Result<ToolResponse, P2pError> {
        let args = args_from_json(&request.arguments);
        match self.run_local_tool(&request.name, &args).await {
            Ok(value) => Ok(ToolResponse::ok(request.id, value)),
            Err(err) => Ok(ToolResponse::err(request.id, ERR_INTERNAL, err)),
        }
    }

    async fn call_envelope(&self, request: RpcEnvelope) -> Result<RpcEnvelope, P2pError> {
        let response = match request.method.as_deref() {
            Some("tools.list") => RpcEnvelope {
                kind: "response".to_string(),
                id: request.id.clone(),
                method: request.method.clone(),
                params: None,
                result: Some(serde_json::to_value(self.tools.tool_specs()).unwrap_or_default()),
                error: None,
            },
            Some("tool.invoke") => {
                let params = request.params.clone().unwrap_or(serde_json::Value::Null);
                let name = params
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                let args =
                    args_from_json(params.get("arguments").unwrap_or(&serde_json::Value::Null));
                match self.run_local_tool(&name, &args).await {
                    Ok(value) => RpcEnvelope {
                        kind: "response".to_string(),
                        id: request.id.clone(),
                        method: request.method.clone(),
                        params: None,
                        result: Some(value),
                        error: None,
                    },
                    Err(err) => RpcEnvelope {
                        kind: "response".to_string(),
                        id: request.id.clone(),
                        method: request.method.clone(),
                        params: None,
                        result: None,
                        error: Some(ToolErrorShape { code: ERR_INTERNAL, message: err }),
                    },
                }
            }
            other => RpcEnvelope {
                kind: "response".to_string(),
                id: request.id.clone(),
                method: request.method.clone(),
                params: None,
                result: None,
                error: Some(ToolErrorShape {
                    code: ERR_METHOD_NOT_FOUND,
                    message: format!("unknown method: {other:?}"),
                }),
            },
        };
        Ok(response)
    }

    async fn call_rpc(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse, P2pError> {
        Ok(self.dispatch_rpc(request).await)
    }
}
