// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! In-process event bus: typed fan-out of lifecycle events to zero-or-more
//! subscribers.
//!
//! `Publish` never blocks the caller and never blocks on a slow subscriber —
//! it rides on [`tokio::sync::broadcast`], whose bounded per-subscriber
//! queue already drops the oldest unread event when a receiver falls behind,
//! which is exactly the back-pressure policy the spec calls for.

use praxis_types::{DslProgressStage, Event, LogLevel, NodeStatus, WorkflowGraph};
use tokio::sync::broadcast;
use tracing::warn;

const DEFAULT_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        EventBus { sender }
    }

    /// Register a subscriber. The returned receiver sees every event
    /// published after this call, in publication order for this publisher;
    /// there is no ordering guarantee across distinct publish call sites
    /// running on different tasks.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Publish an event. Non-blocking: if there are no subscribers this is a
    /// no-op: the spec never requires a publish to wait for delivery.
    pub fn publish(&self, event: Event) {
        let _ = self.sender.send(event);
    }

    pub fn publish_workflow_log(
        &self,
        execution_id: impl Into<String>,
        level: LogLevel,
        message: impl Into<String>,
    ) {
        self.publish(Event::WorkflowLog {
            execution_id: execution_id.into(),
            level,
            message: message.into(),
        });
    }

    pub fn publish_node_status_update(
        &self,
        execution_id: impl Into<String>,
        node_id: impl Into<String>,
        status: NodeStatus,
    ) {
        self.publish(Event::NodeStatusUpdate {
            execution_id: execution_id.into(),
            node_id: node_id.into(),
            status,
        });
    }

    pub fn publish_workflow_complete(
        &self,
        execution_id: impl Into<String>,
        duration_ms: i64,
        node_count: usize,
    ) {
        self.publish(Event::WorkflowComplete {
            execution_id: execution_id.into(),
            duration_ms,
            node_count,
        });
    }

    pub fn publish_workflow_error(&self, execution_id: impl Into<String>, error: impl Into<String>) {
        self.publish(Event::WorkflowError {
            execution_id: execution_id.into(),
            error: error.into(),
        });
    }

    pub fn publish_dsl_progress(&self, workflow_id: impl Into<String>, stage: DslProgressStage) {
        self.publish(Event::DslProgress {
            workflow_id: workflow_id.into(),
            stage,
        });
    }

    pub fn publish_workflow_planned(&self, workflow_id: impl Into<String>, ui_graph: WorkflowGraph) {
        self.publish(Event::WorkflowPlanned {
            workflow_id: workflow_id.into(),
            ui_graph,
        });
    }

    pub fn publish_peer_connected(&self, peer_id: impl Into<String>) {
        self.publish(Event::PeerConnected {
            peer_id: peer_id.into(),
        });
    }

    pub fn publish_peer_disconnected(&self, peer_id: impl Into<String>) {
        self.publish(Event::PeerDisconnected {
            peer_id: peer_id.into(),
        });
    }

    pub fn publish_peer_left(&self, peer_id: impl Into<String>) {
        self.publish(Event::PeerLeft {
            peer_id: peer_id.into(),
        });
    }

    pub fn publish_p2p_error(&self, message: impl Into<String>) {
        self.publish(Event::P2pError {
            message: message.into(),
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Drain every event currently queued for `rx` without blocking, skipping
/// over a lag gap and logging it rather than treating it as an error.
///
/// Mirrors the poll-then-drain pattern the teacher uses for its P2P event
/// buffer: loop on `try_recv`, absorb `Lagged` by continuing, stop on
/// `Empty`/`Closed`.
pub fn drain_available(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => out.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "event bus subscriber lagged, dropping oldest events");
                continue;
            }
            Err(broadcast::error::TryRecvError::Empty)
            | Err(broadcast::error::TryRecvError::Closed) => break,
        }
    }
    out
}
