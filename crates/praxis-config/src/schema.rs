// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Layered configuration schema (spec SPEC_FULL.md §4.0 "Configuration").
//!
//! Covers exactly the knobs the rest of the workspace needs: listen address,
//! network/room name, agent identity, discovery timing, cache sizing, and the
//! task cleanup interval. Everything has a sane default so a bare `Config::default()`
//! boots a usable single-node agent.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Display name advertised in this agent's peer card.
    pub name: String,
    /// Card version string.
    pub version: String,
    /// Capability tags advertised alongside the tool list.
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "praxis-agent".to_string(),
            version: "0.1.0".to_string(),
            capabilities: vec!["dsl".to_string(), "workflow".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// libp2p multiaddr this node listens on.
    pub listen_addr: String,
    /// Logical network/room name, used to scope mDNS discovery peers.
    pub room: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_addr: "/ip4/0.0.0.0/tcp/0".to_string(),
            room: "praxis".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Delay (seconds) after an mDNS sighting before dialing and card exchange.
    pub stabilization_delay_secs: u64,
    /// How often (seconds) the reconciliation ticker re-checks known peers.
    pub reconciliation_interval_secs: u64,
    /// A peer not seen for this many seconds is evicted.
    pub peer_timeout_secs: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            stabilization_delay_secs: 1,
            reconciliation_interval_secs: 10,
            peer_timeout_secs: 5 * 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries the tool cache retains before LRU eviction.
    pub max_size: usize,
    /// Entry time-to-live, in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_size: 1000, ttl_secs: 300 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Terminal tasks older than this many seconds are purged by
    /// `cleanup_completed_tasks`.
    pub cleanup_after_secs: i64,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self { cleanup_after_secs: 24 * 60 * 60 }
    }
}
