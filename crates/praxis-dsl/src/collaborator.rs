// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! The agent-facade contract the analyzer and executor dispatch `Call`
//! nodes through (spec §4.3 Execution, §4.5). `praxis-agent` implements
//! this trait; tests use a local stub.

use async_trait::async_trait;
use praxis_types::ArgMap;

#[async_trait]
pub trait AgentCollaborator: Send + Sync {
    /// Whether a tool of this name is registered locally.
    fn has_local_tool(&self, tool_name: &str) -> bool;

    /// Execute a locally-registered tool.
    async fn execute_local_tool(
        &self,
        tool_name: &str,
        args: &ArgMap,
    ) -> Result<serde_json::Value, String>;

    /// Locate a peer advertising this tool, returning its peer-id.
    async fn find_agent_with_tool(&self, tool_name: &str) -> Option<String>;

    /// Dispatch a tool call to a specific remote peer.
    async fn execute_remote_tool(
        &self,
        peer_id: &str,
        tool_name: &str,
        args: &ArgMap,
    ) -> Result<serde_json::Value, String>;
}
