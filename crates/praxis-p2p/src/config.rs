// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Node configuration and the inbound-dispatch seam.
//!
//! `P2pConfig` plays the same role as the teacher's `sven-p2p::config::P2pConfig`
//! (listen address + identity + keypair path + a `new()` constructor with
//! sane defaults), trimmed of the `DiscoveryProvider`/relay/allowlist fields
//! — this spec's discovery is mDNS-only, with no relay server and no
//! peer-id allowlist named in the spec.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use libp2p::Multiaddr;
use praxis_types::{JsonRpcRequest, JsonRpcResponse, PeerCard, RpcEnvelope, ToolRequest, ToolResponse};

use crate::error::P2pError;

/// Configuration for a praxis P2P node.
pub struct P2pConfig {
    /// Local TCP listen address. Use `/ip4/0.0.0.0/tcp/0` for an OS-assigned port.
    pub listen_addr: Multiaddr,

    /// This node's capability card, exchanged with every peer it meets.
    pub local_card: PeerCard,

    /// Path to persist the libp2p keypair. `None` generates a fresh ephemeral key.
    pub keypair_path: Option<PathBuf>,

    /// Delay after an mDNS sighting before dialing and exchanging cards,
    /// giving the peer's own listener time to come up.
    pub discovery_stabilization_delay: Duration,

    /// How often the reconciliation ticker re-checks known peers (redial
    /// dropped connections, refresh stale cards).
    pub reconciliation_interval: Duration,

    /// A peer with no successful contact for this long is evicted from the cache.
    pub peer_timeout: Duration,
}

impl P2pConfig {
    pub fn new(listen_addr: Multiaddr, local_card: PeerCard) -> Self {
        Self {
            listen_addr,
            local_card,
            keypair_path: None,
            discovery_stabilization_delay: Duration::from_secs(1),
            reconciliation_interval: Duration::from_secs(10),
            peer_timeout: Duration::from_secs(5 * 60),
        }
    }
}

/// Routes inbound protocol requests to this node's locally registered tools
/// and RPC handlers.
///
/// Unlike the teacher's gateway (which defers task execution to a separate
/// process via a pending-reply channel, because task execution there lives
/// outside the P2P node), this node runs in-process alongside its tool
/// registry, so dispatch can simply `.await` the handler inline.
#[async_trait]
pub trait LocalToolHandler: Send + Sync {
    /// This node's own capability card, returned verbatim to card-exchange peers.
    fn card(&self) -> PeerCard;

    /// Execute a locally registered tool by name.
    async fn call_tool(&self, request: ToolRequest) -> Result<ToolResponse, P2pError>;

    /// Handle an inbound legacy `tools.list`/`tool.invoke`-style envelope
    /// on the generic Message/RPC protocol.
    async fn call_envelope(&self, request: RpcEnvelope) -> Result<RpcEnvelope, P2pError>;

    /// Handle an inbound Agent-to-Agent JSON-RPC 2.0 request.
    async fn call_rpc(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse, P2pError>;
}
