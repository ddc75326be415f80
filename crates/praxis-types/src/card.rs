// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Peer card and tool spec wire shapes (spec §3 "Peer Card", §6 native peer
//! card shape).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParamSpec>,
}

/// `{name, version, peerId, capabilities, tools, timestamp}` — the native
/// card shape exchanged on `/praxis/card/1.0.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerCard {
    pub name: String,
    pub version: String,
    #[serde(rename = "peerId")]
    pub peer_id: String,
    pub capabilities: Vec<String>,
    pub tools: Vec<ToolSpec>,
    pub timestamp: i64,
}

impl PeerCard {
    pub fn has_tool(&self, tool_name: &str) -> bool {
        self.tools.iter().any(|t| t.name == tool_name)
    }
}
