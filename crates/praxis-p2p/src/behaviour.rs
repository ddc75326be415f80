// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! The combined libp2p `NetworkBehaviour` for a praxis agent node.
//!
//! Mirrors the shape of the teacher's `sven-p2p::behaviour::P2pBehaviour`
//! (one struct, hand-written `out_event` enum, a `new()` constructor), but
//! swaps `relay_client`/`dcutr`/`autonat` for `mdns` — this spec's discovery
//! model is local-network mDNS, not relay-assisted NAT traversal — and
//! carries five `request_response` sub-behaviours (one per named protocol
//! in the External Interfaces table) instead of the teacher's single `task`
//! channel.

use std::time::Duration;

use libp2p::{identify, identity, mdns, ping, request_response, swarm::NetworkBehaviour, PeerId};

use praxis_types::{PROTOCOL_A2A, PROTOCOL_A2A_CARD, PROTOCOL_CARD, PROTOCOL_MCP, PROTOCOL_TOOL};

use crate::codec::{A2aCardCodec, A2aCodec, CardCodec, RpcCodec, ToolCodec};

const APP_PROTO: &str = "/praxis/1.0.0";

#[derive(NetworkBehaviour)]
#[behaviour(out_event = "P2pBehaviourEvent")]
pub struct P2pBehaviour {
    pub mdns: mdns::tokio::Behaviour,
    pub identify: identify::Behaviour,
    pub ping: ping::Behaviour,
    pub card: request_response::Behaviour<CardCodec>,
    pub tool: request_response::Behaviour<ToolCodec>,
    pub rpc: request_response::Behaviour<RpcCodec>,
    pub a2a: request_response::Behaviour<A2aCodec>,
    pub a2a_card: request_response::Behaviour<A2aCardCodec>,
}

#[derive(Debug)]
#[allow(clippy::large_enum_variant)]
pub enum P2pBehaviourEvent {
    Mdns(mdns::Event),
    Identify(identify::Event),
    Ping(ping::Event),
    Card(request_response::Event<praxis_types::PeerCard, praxis_types::PeerCard>),
    Tool(request_response::Event<praxis_types::ToolRequest, praxis_types::ToolResponse>),
    Rpc(request_response::Event<praxis_types::RpcEnvelope, praxis_types::RpcEnvelope>),
    A2a(request_response::Event<praxis_types::JsonRpcRequest, praxis_types::JsonRpcResponse>),
    A2aCard(request_response::Event<praxis_types::OpaqueA2ACard, praxis_types::OpaqueA2ACard>),
}

impl From<mdns::Event> for P2pBehaviourEvent {
    fn from(e: mdns::Event) -> Self {
        P2pBehaviourEvent::Mdns(e)
    }
}
impl From<identify::Event> for P2pBehaviourEvent {
    fn from(e: identify::Event) -> Self {
        P2pBehaviourEvent::Identify(e)
    }
}
impl From<ping::Event> for P2pBehaviourEvent {
    fn from(e: ping::Event) -> Self {
        P2pBehaviourEvent::Ping(e)
    }
}
impl From<request_response::Event<praxis_types::PeerCard, praxis_types::PeerCard>>
    for P2pBehaviourEvent
{
    fn from(e: request_response::Event<praxis_types::PeerCard, praxis_types::PeerCard>) -> Self {
        P2pBehaviourEvent::Card(e)
    }
}
impl From<request_response::Event<praxis_types::ToolRequest, praxis_types::ToolResponse>>
    for P2pBehaviourEvent
{
    fn from(
        e: request_response::Event<praxis_types::ToolRequest, praxis_types::ToolResponse>,
    ) -> Self {
        P2pBehaviourEvent::Tool(e)
    }
}
impl From<request_response::Event<praxis_types::RpcEnvelope, praxis_types::RpcEnvelope>>
    for P2pBehaviourEvent
{
    fn from(e: request_response::Event<praxis_types::RpcEnvelope, praxis_types::RpcEnvelope>) -> Self {
        P2pBehaviourEvent::Rpc(e)
    }
}
impl From<request_response::Event<praxis_types::JsonRpcRequest, praxis_types::JsonRpcResponse>>
    for P2pBehaviourEvent
{
    fn from(
        e: request_response::Event<praxis_types::JsonRpcRequest, praxis_types::JsonRpcResponse>,
    ) -> Self {
        P2pBehaviourEvent::A2a(e)
    }
}
impl From<request_response::Event<praxis_types::OpaqueA2ACard, praxis_types::OpaqueA2ACard>>
    for P2pBehaviourEvent
{
    fn from(
        e: request_response::Event<praxis_types::OpaqueA2ACard, praxis_types::OpaqueA2ACard>,
    ) -> Self {
        P2pBehaviourEvent::A2aCard(e)
    }
}

impl P2pBehaviour {
    pub fn new(key: &identity::Keypair) -> Result<Self, crate::error::P2pError> {
        let local_peer_id = PeerId::from(key.public());
        let mdns = mdns::tokio::Behaviour::new(mdns::Config::default(), local_peer_id)
            .map_err(|e| crate::error::P2pError::Transport(e.to_string()))?;

        let rr_config = request_response::Config::default().with_request_timeout(Duration::from_secs(30));

        Ok(Self {
            mdns,
            identify: identify::Behaviour::new(identify::Config::new(APP_PROTO.into(), key.public())),
            ping: ping::Behaviour::new(ping::Config::new().with_interval(Duration::from_secs(15))),
            card: request_response::Behaviour::with_codec(
                CardCodec::default(),
                [(
                    libp2p::StreamProtocol::new(PROTOCOL_CARD),
                    request_response::ProtocolSupport::Full,
                )],
                rr_config.clone(),
            ),
            tool: request_response::Behaviour::with_codec(
                ToolCodec::default(),
                [(
                    libp2p::StreamProtocol::new(PROTOCOL_TOOL),
                    request_response::ProtocolSupport::Full,
                )],
                rr_config.clone(),
            ),
            rpc: request_response::Behaviour::with_codec(
                RpcCodec::default(),
                [(
                    libp2p::StreamProtocol::new(PROTOCOL_MCP),
                    request_response::ProtocolSupport::Full,
                )],
                rr_config.clone(),
            ),
            a2a: request_response::Behaviour::with_codec(
                A2aCodec::default(),
                [(
                    libp2p::StreamProtocol::new(PROTOCOL_A2A),
                    request_response::ProtocolSupport::Full,
                )],
                rr_config.clone(),
            ),
            a2a_card: request_response::Behaviour::with_codec(
                A2aCardCodec::default(),
                [(
                    libp2p::StreamProtocol::new(PROTOCOL_A2A_CARD),
                    request_response::ProtocolSupport::Full,
                )],
                rr_config,
            ),
        })
    }
}
