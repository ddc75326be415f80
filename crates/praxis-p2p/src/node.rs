// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! High-level P2P node for a praxis agent instance.
//!
//! Architecture mirrors the teacher's `sven-p2p::node`: obtain a `P2pHandle`
//! before calling `run()`, then send commands / subscribe to events while
//! the event loop runs in a spawned task. Discovery is mDNS-driven rather
//! than relay/git-backed — peers are found on the local network, dialed
//! after a short stabilization delay, and exchange capability cards
//! symmetrically over the card protocol.

use std::collections::HashMap;
use std::sync::Arc;

use futures::StreamExt;
use libp2p::{
    identify, mdns, request_response,
    swarm::{Swarm, SwarmEvent},
    Multiaddr, PeerId,
};
use tokio::sync::{broadcast, mpsc, oneshot, RwLock};
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

use praxis_types::{JsonRpcRequest, JsonRpcResponse, OpaqueA2ACard, PeerCard, RpcEnvelope, ToolRequest, ToolResponse};

use crate::{
    behaviour::{P2pBehaviour, P2pBehaviourEvent},
    config::{LocalToolHandler, P2pConfig},
    error::P2pError,
    transport::{build_transport, default_swarm_config, load_or_create_keypair},
};

type NodeSwarm = Swarm<P2pBehaviour>;

/// Events emitted by the P2P node to the host application.
#[derive(Debug, Clone)]
pub enum P2pEvent {
    PeerDiscovered { peer_id: PeerId, card: PeerCard },
    PeerLeft { peer_id: PeerId },
    Connected { peer_id: PeerId },
    Disconnected { peer_id: PeerId },
    Error(String),
}

#[derive(Debug)]
enum P2pCommand {
    DialAndExchange(PeerId, Multiaddr),
    CallTool {
        peer: PeerId,
        request: ToolRequest,
        reply_tx: oneshot::Sender<Result<ToolResponse, P2pError>>,
    },
    CallEnvelope {
        peer: PeerId,
        request: RpcEnvelope,
        reply_tx: oneshot::Sender<Result<RpcEnvelope, P2pError>>,
    },
    CallRpc {
        peer: PeerId,
        request: JsonRpcRequest,
        reply_tx: oneshot::Sender<Result<JsonRpcResponse, P2pError>>,
    },
    Shutdown,
}

/// Single lock guarding both peer-card caches (spec §5: "P2P protocol
/// handler: one read/write lock guarding both peer-card caches").
#[derive(Default)]
struct CardCaches {
    native: HashMap<PeerId, PeerCard>,
    a2a: HashMap<PeerId, OpaqueA2ACard>,
}

/// Cheap-to-clone handle to the running `P2pNode`.
#[derive(Clone)]
pub struct P2pHandle {
    cmd_tx: mpsc::Sender<P2pCommand>,
    event_tx: broadcast::Sender<P2pEvent>,
    cards: Arc<RwLock<CardCaches>>,
    local_peer_id: PeerId,
}

impl P2pHandle {
    pub fn local_peer_id(&self) -> PeerId {
        self.local_peer_id
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<P2pEvent> {
        self.event_tx.subscribe()
    }

    /// This node's cached card for `peer`, if the handshake has completed.
    pub async fn peer_card(&self, peer: PeerId) -> Option<PeerCard> {
        self.cards.read().await.native.get(&peer).cloned()
    }

    /// All peers currently believed to carry a tool named `tool_name`.
    pub async fn peers_with_tool(&self, tool_name: &str) -> Vec<PeerId> {
        self.cards
            .read()
            .await
            .native
            .iter()
            .filter(|(_, card)| card.has_tool(tool_name))
            .map(|(peer, _)| *peer)
            .collect()
    }

    pub async fn known_peers(&self) -> Vec<PeerId> {
        self.cards.read().await.native.keys().copied().collect()
    }

    pub async fn call_tool(&self, peer: PeerId, request: ToolRequest) -> Result<ToolResponse, P2pError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(P2pCommand::CallTool { peer, request, reply_tx })
            .await
            .map_err(|_| P2pError::Shutdown)?;
        reply_rx.await.map_err(|_| P2pError::Shutdown)?
    }

    pub async fn call_envelope(&self, peer: PeerId, request: RpcEnvelope) -> Result<RpcEnvelope, P2pError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(P2pCommand::CallEnvelope { peer, request, reply_tx })
            .await
            .map_err(|_| P2pError::Shutdown)?;
        reply_rx.await.map_err(|_| P2pError::Shutdown)?
    }

    pub async fn call_rpc(&self, peer: PeerId, request: JsonRpcRequest) -> Result<JsonRpcResponse, P2pError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(P2pCommand::CallRpc { peer, request, reply_tx })
            .await
            .map_err(|_| P2pError::Shutdown)?;
        reply_rx.await.map_err(|_| P2pError::Shutdown)?
    }

    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(P2pCommand::Shutdown).await;
    }
}

pub struct P2pNode {
    config: P2pConfig,
    handler: Arc<dyn LocalToolHandler>,
    key: libp2p::identity::Keypair,
    local_peer_id: PeerId,
    event_tx: broadcast::Sender<P2pEvent>,
    cmd_tx: mpsc::Sender<P2pCommand>,
    cmd_rx: mpsc::Receiver<P2pCommand>,
    cards: Arc<RwLock<CardCaches>>,
}

impl P2pNode {
    pub fn new(config: P2pConfig, handler: Arc<dyn LocalToolHandler>) -> Result<Self, P2pError> {
        let key = match &config.keypair_path {
            Some(p) => load_or_create_keypair(p)?,
            None => libp2p::identity::Keypair::generate_ed25519(),
        };
        let local_peer_id = PeerId::from(key.public());
        let (event_tx, _) = broadcast::channel(256);
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        Ok(Self {
            config,
            handler,
            key,
            local_peer_id,
            event_tx,
            cmd_tx,
            cmd_rx,
            cards: Arc::new(RwLock::new(CardCaches::default())),
        })
    }

    pub fn handle(&self) -> P2pHandle {
        P2pHandle {
            cmd_tx: self.cmd_tx.clone(),
            event_tx: self.event_tx.clone(),
            cards: Arc::clone(&self.cards),
            local_peer_id: self.local_peer_id,
        }
    }

    /// Build the swarm, then run the event loop until `Shutdown` or Ctrl-C.
    pub async fn run(self) -> Result<(), P2pError> {
        let key = self.key;
        let local_peer_id = self.local_peer_id;
        tracing::info!("P2pNode starting peer_id={local_peer_id}");

        let transport = build_transport(&key)?;
        let behaviour = P2pBehaviour::new(&key)?;
        let mut swarm = Swarm::new(transport, behaviour, local_peer_id, default_swarm_config());
        swarm
            .listen_on(self.config.listen_addr.clone())
            .map_err(|e| P2pError::Transport(e.to_string()))?;

        let state = NodeState {
            local_peer_id,
            config: self.config,
            handler: self.handler,
            event_tx: self.event_tx,
            cmd_tx: self.cmd_tx,
            cards: self.cards,
            last_contact: HashMap::new(),
            dialed: std::collections::HashSet::new(),
            pending_tool: HashMap::new(),
            pending_envelope: HashMap::new(),
            pending_rpc: HashMap::new(),
        };

        state.event_loop(swarm, self.cmd_rx).await
    }
}

struct NodeState {
    local_peer_id: PeerId,
    config: P2pConfig,
    handler: Arc<dyn LocalToolHandler>,
    event_tx: broadcast::Sender<P2pEvent>,
    cmd_tx: mpsc::Sender<P2pCommand>,
    cards: Arc<RwLock<CardCaches>>,
    last_contact: HashMap<PeerId, Instant>,
    dialed: std::collections::HashSet<PeerId>,
    pending_tool: HashMap<request_response::OutboundRequestId, oneshot::Sender<Result<ToolResponse, P2pError>>>,
    pending_envelope: HashMap<request_response::OutboundRequestId, oneshot::Sender<Result<RpcEnvelope, P2pError>>>,
    pending_rpc: HashMap<request_response::OutboundRequestId, oneshot::Sender<Result<JsonRpcResponse, P2pError>>>,
}

impl NodeState {
    async fn event_loop(mut self, mut swarm: NodeSwarm, mut cmd_rx: mpsc::Receiver<P2pCommand>) -> Result<(), P2pError> {
        let reconcile_every = self.config.reconciliation_interval;
        let mut reconcile = interval_at(Instant::now() + reconcile_every, reconcile_every);
        reconcile.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                event = swarm.select_next_some() => {
                    self.on_swarm_event(&mut swarm, event).await;
                }
                _ = reconcile.tick() => {
                    self.on_reconcile_tick().await;
                }
                Some(cmd) = cmd_rx.recv() => {
                    if self.on_command(&mut swarm, cmd).await { break; }
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }

        tracing::info!("P2pNode shut down");
        Ok(())
    }

    async fn on_swarm_event(&mut self, swarm: &mut NodeSwarm, event: SwarmEvent<P2pBehaviourEvent>) {
        match event {
            SwarmEvent::NewListenAddr { address, .. } => {
                tracing::info!("listening on {address}");
            }

            SwarmEvent::ConnectionEstablished { peer_id, .. } => {
                self.last_contact.insert(peer_id, Instant::now());
                self.emit(P2pEvent::Connected { peer_id });
            }

            SwarmEvent::ConnectionClosed { peer_id, .. } => {
                self.emit(P2pEvent::Disconnected { peer_id });
            }

            SwarmEvent::Behaviour(P2pBehaviourEvent::Mdns(mdns::Event::Discovered(list))) => {
                for (peer_id, addr) in list {
                    if self.dialed.contains(&peer_id) || peer_id == self.local_peer_id {
                        continue;
                    }
                    self.dialed.insert(peer_id);
                    let delay = self.config.discovery_stabilization_delay;
                    let cmd_tx = self.cmd_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = cmd_tx.send(P2pCommand::DialAndExchange(peer_id, addr)).await;
                    });
                }
            }

            SwarmEvent::Behaviour(P2pBehaviourEvent::Mdns(mdns::Event::Expired(list))) => {
                for (peer_id, _) in list {
                    tracing::debug!("mdns record expired for {peer_id}");
                }
            }

            SwarmEvent::Behaviour(P2pBehaviourEvent::Identify(identify::Event::Received { peer_id, .. })) => {
                tracing::debug!("identify received from {peer_id}");
            }

            SwarmEvent::Behaviour(P2pBehaviourEvent::Card(request_response::Event::Message {
                peer,
                message,
                ..
            })) => {
                self.on_card_message(swarm, peer, message).await;
            }

            SwarmEvent::Behaviour(P2pBehaviourEvent::Tool(request_response::Event::Message {
                peer,
                message,
                ..
            })) => {
                self.on_tool_message(swarm, peer, message).await;
            }

            SwarmEvent::Behaviour(P2pBehaviourEvent::Rpc(request_response::Event::Message {
                peer,
                message,
                ..
            })) => {
                self.on_envelope_message(swarm, peer, message).await;
            }

            SwarmEvent::Behaviour(P2pBehaviourEvent::A2a(request_response::Event::Message {
                peer,
                message,
                ..
            })) => {
                self.on_a2a_message(swarm, peer, message).await;
            }

            SwarmEvent::Behaviour(P2pBehaviourEvent::A2aCard(request_response::Event::Message {
                peer,
                message,
                ..
            })) => {
                self.on_a2a_card_message(swarm, peer, message);
            }

            SwarmEvent::OutgoingConnectionError { peer_id, error, .. } => {
                if let Some(peer_id) = peer_id {
                    tracing::debug!("dial to {peer_id} failed: {error}");
                }
            }

            _ => {}
        }
    }

    // ── Card exchange ────────────────────────────────────────────────────

    async fn on_card_message(
        &mut self,
        swarm: &mut NodeSwarm,
        peer: PeerId,
        message: request_response::Message<PeerCard, PeerCard>,
    ) {
        match message {
            request_response::Message::Request { request, channel, .. } => {
                self.cards.write().await.native.insert(peer, request.clone());
                self.emit(P2pEvent::PeerDiscovered {
                    peer_id: peer,
                    card: request,
                });
                let _ = swarm.behaviour_mut().card.send_response(channel, self.handler.card());
            }
            request_response::Message::Response { response, .. } => {
                self.last_contact.insert(peer, Instant::now());
                self.cards.write().await.native.insert(peer, response.clone());
                self.emit(P2pEvent::PeerDiscovered { peer_id: peer, card: response });
            }
        }
    }

    // ── Tool invocation ──────────────────────────────────────────────────

    async fn on_tool_message(
        &mut self,
        swarm: &mut NodeSwarm,
        peer: PeerId,
        message: request_response::Message<ToolRequest, ToolResponse>,
    ) {
        match message {
            request_response::Message::Request { request, channel, .. } => {
                let response = match self.handler.call_tool(request.clone()).await {
                    Ok(resp) => resp,
                    Err(e) => praxis_types::ToolResponse::err(
                        request.id.clone(),
                        praxis_types::ERR_INTERNAL,
                        e.to_string(),
                    ),
                };
                let _ = swarm.behaviour_mut().tool.send_response(channel, response);
            }
            request_response::Message::Response { request_id, response, .. } => {
                self.last_contact.insert(peer, Instant::now());
                if let Some(reply_tx) = self.pending_tool.remove(&request_id) {
                    let _ = reply_tx.send(Ok(response));
                }
            }
        }
    }

    // ── Generic message/RPC envelope ─────────────────────────────────────

    async fn on_envelope_message(
        &mut self,
        swarm: &mut NodeSwarm,
        peer: PeerId,
        message: request_response::Message<RpcEnvelope, RpcEnvelope>,
    ) {
        match message {
            request_response::Message::Request { request, channel, .. } => {
                let response = match self.handler.call_envelope(request.clone()).await {
                    Ok(resp) => resp,
                    Err(e) => RpcEnvelope {
                        kind: request.kind,
                        id: request.id,
                        method: None,
                        params: None,
                        result: None,
                        error: Some(praxis_types::ToolErrorShape {
                            code: praxis_types::ERR_INTERNAL,
                            message: e.to_string(),
                        }),
                    },
                };
                let _ = swarm.behaviour_mut().rpc.send_response(channel, response);
            }
            request_response::Message::Response { request_id, response, .. } => {
                self.last_contact.insert(peer, Instant::now());
                if let Some(reply_tx) = self.pending_envelope.remove(&request_id) {
                    let _ = reply_tx.send(Ok(response));
                }
            }
        }
    }

    // ── Agent-to-Agent JSON-RPC ───────────────────────────────────────────

    async fn on_a2a_message(
        &mut self,
        swarm: &mut NodeSwarm,
        peer: PeerId,
        message: request_response::Message<JsonRpcRequest, JsonRpcResponse>,
    ) {
        match message {
            request_response::Message::Request { request, channel, .. } => {
                let id = request.id.clone();
                let response = match self.handler.call_rpc(request).await {
                    Ok(resp) => resp,
                    Err(e) => JsonRpcResponse::err(id, praxis_types::ERR_INTERNAL, e.to_string()),
                };
                let _ = swarm.behaviour_mut().a2a.send_response(channel, response);
            }
            request_response::Message::Response { request_id, response, .. } => {
                self.last_contact.insert(peer, Instant::now());
                if let Some(reply_tx) = self.pending_rpc.remove(&request_id) {
                    let _ = reply_tx.send(Ok(response));
                }
            }
        }
    }

    // ── A2A card exchange (opaque) ────────────────────────────────────────

    fn on_a2a_card_message(
        &mut self,
        swarm: &mut NodeSwarm,
        peer: PeerId,
        message: request_response::Message<OpaqueA2ACard, OpaqueA2ACard>,
    ) {
        if let request_response::Message::Request { request, channel, .. } = message {
            let cards = Arc::clone(&self.cards);
            let local_card = self.config.local_card.clone();
            tokio::spawn(async move {
                cards.write().await.a2a.insert(peer, request);
            });
            let local_a2a = OpaqueA2ACard {
                kind: "card".to_string(),
                body: serde_json::to_value(&local_card).unwrap_or(serde_json::Value::Null),
            };
            let _ = swarm.behaviour_mut().a2a_card.send_response(channel, local_a2a);
        }
    }

    // ── Periodic reconciliation ───────────────────────────────────────────

    async fn on_reconcile_tick(&mut self) {
        let timeout = self.config.peer_timeout;
        let now = Instant::now();
        let stale: Vec<PeerId> = self
            .last_contact
            .iter()
            .filter(|(_, seen)| now.duration_since(**seen) > timeout)
            .map(|(peer, _)| *peer)
            .collect();

        if stale.is_empty() {
            return;
        }

        let mut cards = self.cards.write().await;
        for peer in stale {
            cards.native.remove(&peer);
            cards.a2a.remove(&peer);
            self.last_contact.remove(&peer);
            self.dialed.remove(&peer);
            let _ = self.event_tx.send(P2pEvent::PeerLeft { peer_id: peer });
        }
    }

    // ── Commands ───────────────────────────────────────────────────────────

    async fn on_command(&mut self, swarm: &mut NodeSwarm, cmd: P2pCommand) -> bool {
        match cmd {
            P2pCommand::DialAndExchange(peer_id, addr) => {
                if swarm.dial(addr.clone()).is_ok() {
                    swarm
                        .behaviour_mut()
                        .card
                        .send_request(&peer_id, self.handler.card());
                }
                false
            }
            P2pCommand::CallTool { peer, request, reply_tx } => {
                let req_id = swarm.behaviour_mut().tool.send_request(&peer, request);
                self.pending_tool.insert(req_id, reply_tx);
                false
            }
            P2pCommand::CallEnvelope { peer, request, reply_tx } => {
                let req_id = swarm.behaviour_mut().rpc.send_request(&peer, request);
                self.pending_envelope.insert(req_id, reply_tx);
                false
            }
            P2pCommand::CallRpc { peer, request, reply_tx } => {
                let req_id = swarm.behaviour_mut().a2a.send_request(&peer, request);
                self.pending_rpc.insert(req_id, reply_tx);
                false
            }
            P2pCommand::Shutdown => true,
        }
    }

    fn emit(&self, event: P2pEvent) {
        let _ = self.event_tx.send(event);
    }
}
