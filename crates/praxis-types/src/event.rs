// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Event bus payload union (spec §3 "Event", §4.1).

use serde::{Deserialize, Serialize};

use crate::card::PeerCard;
use crate::graph::NodeStatus;
use crate::task::{Artifact, Task, TaskStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Event {
    TaskCreated {
        task: Task,
    },
    TaskStatusUpdate {
        task_id: String,
        status: TaskStatus,
    },
    ArtifactAdded {
        task_id: String,
        artifact: Artifact,
    },
    DslProgress {
        workflow_id: String,
        stage: DslProgressStage,
    },
    DslResult {
        workflow_id: String,
        result: serde_json::Value,
    },
    ChatMessage {
        peer_id: Option<String>,
        text: String,
    },
    NodeStatusUpdate {
        execution_id: String,
        node_id: String,
        status: NodeStatus,
    },
    WorkflowLog {
        execution_id: String,
        level: LogLevel,
        message: String,
    },
    WorkflowComplete {
        execution_id: String,
        duration_ms: i64,
        node_count: usize,
    },
    WorkflowError {
        execution_id: String,
        error: String,
    },
    PeerDiscovered {
        card: PeerCard,
    },
    /// Emitted when the P2P layer completes a connection to a peer, distinct
    /// from card exchange (spec §4.6 discovery/reconciliation).
    PeerConnected {
        peer_id: String,
    },
    /// Emitted when a connection drops, before the peer-timeout reconciler
    /// decides whether to forget the peer entirely.
    PeerDisconnected {
        peer_id: String,
    },
    /// Emitted when the reconciliation ticker evicts a peer not seen within
    /// the configured timeout (spec §4.6 "removes peers not seen for > 5
    /// minutes").
    PeerLeft {
        peer_id: String,
    },
    /// A P2P-layer failure worth surfacing to subscribers (dial failure,
    /// protocol error) that isn't tied to one specific workflow execution.
    P2pError {
        message: String,
    },
    /// Emitted once planning finishes (either path): carries the UI graph
    /// so a front-end can render it before `ExecuteStoredWorkflow` is
    /// called (spec §4.4 "The UI graph is published to subscribers").
    WorkflowPlanned {
        workflow_id: String,
        ui_graph: crate::graph::WorkflowGraph,
    },
}

/// Progress stages emitted strictly in order during planning (spec §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DslProgressStage {
    Analyzing,
    Discovering,
    Matching,
    Generating,
    Complete,
}

impl DslProgressStage {
    /// The full emission order a single planning pass walks through.
    pub const ORDER: [DslProgressStage; 5] = [
        DslProgressStage::Analyzing,
        DslProgressStage::Discovering,
        DslProgressStage::Matching,
        DslProgressStage::Generating,
        DslProgressStage::Complete,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_order_is_strictly_the_spec_sequence() {
        assert_eq!(
            DslProgressStage::ORDER,
            [
                DslProgressStage::Analyzing,
                DslProgressStage::Discovering,
                DslProgressStage::Matching,
                DslProgressStage::Generating,
                DslProgressStage::Complete,
            ]
        );
    }
}
