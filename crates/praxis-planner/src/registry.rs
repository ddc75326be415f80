// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! The stored-workflow registry (spec §9 design notes: "re-architect as a
//! component owned by the agent facade with explicit `Store`, `Take`, and
//! `Purge` operations, not a free-standing module variable").
//!
//! A planning pass stores its result here under a generated workflow-id;
//! execution is deferred until a separate `ExecuteStoredWorkflow(id)` call
//! arrives and `take`s it back out.

use std::collections::HashMap;
use std::sync::RwLock;

use praxis_types::{AstNode, WorkflowGraph};

/// One planning pass's output: an executable AST for the DSL executor, the
/// UI-facing graph, and the original input text (if this came from path A).
#[derive(Debug, Clone)]
pub struct StoredWorkflow {
    pub workflow_id: String,
    pub execution_ast: Vec<AstNode>,
    pub ui_graph: WorkflowGraph,
    pub original_text: Option<String>,
}

#[derive(Default)]
pub struct WorkflowRegistry {
    entries: RwLock<HashMap<String, StoredWorkflow>>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Written once by the planner when a planning pass completes.
    pub fn store(&self, workflow: StoredWorkflow) {
        self.entries
            .write()
            .expect("workflow registry lock poisoned")
            .insert(workflow.workflow_id.clone(), workflow);
    }

    /// Removes and returns the entry — called by `ExecuteStoredWorkflow`.
    /// Each entry is taken at most once.
    pub fn take(&self, workflow_id: &str) -> Option<StoredWorkflow> {
        self.entries
            .write()
            .expect("workflow registry lock poisoned")
            .remove(workflow_id)
    }

    /// Non-destructive peek, for status/debugging endpoints.
    pub fn peek(&self, workflow_id: &str) -> Option<StoredWorkflow> {
        self.entries
            .read()
            .expect("workflow registry lock poisoned")
            .get(workflow_id)
            .cloned()
    }

    /// Drops every pending entry, e.g. on process shutdown.
    pub fn purge(&self) {
        self.entries
            .write()
            .expect("workflow registry lock poisoned")
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("workflow registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use praxis_types::graph::WorkflowGraph as Graph;

    fn sample(id: &str) -> StoredWorkflow {
        StoredWorkflow {
            workflow_id: id.to_string(),
            execution_ast: Vec::new(),
            ui_graph: Graph::default(),
            original_text: None,
        }
    }

    #[test]
    fn take_removes_the_entry() {
        let registry = WorkflowRegistry::new();
        registry.store(sample("w1"));
        assert!(registry.take("w1").is_some());
        assert!(registry.take("w1").is_none());
    }

    #[test]
    fn purge_clears_every_entry() {
        let registry = WorkflowRegistry::new();
        registry.store(sample("w1"));
        registry.store(sample("w2"));
        registry.purge();
        assert!(registry.is_empty());
    }

    #[test]
    fn peek_does_not_remove() {
        let registry = WorkflowRegistry::new();
        registry.store(sample("w1"));
        assert!(registry.peek("w1").is_some());
        assert!(registry.peek("w1").is_some());
    }
}
