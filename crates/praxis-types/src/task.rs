// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Externally-visible task types (spec §3 "Task", §4.7, §6 task state
//! vocabulary).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    AuthRequired,
    Completed,
    Failed,
    Canceled,
    Rejected,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Canceled | TaskState::Rejected
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::AuthRequired => "auth-required",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Canceled => "canceled",
            TaskState::Rejected => "rejected",
        }
    }
}

/// One role-tagged message in a task's append-only history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMessage {
    pub role: String,
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl TaskMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        TaskMessage {
            role: role.into(),
            content: content.into(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// One append-only artifact produced while working a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    pub name: String,
    pub content: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Current state plus the timestamp of the most recent transition and an
/// optional trailing agent message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub context_id: String,
    pub status: TaskStatus,
    pub history: Vec<TaskMessage>,
    pub artifacts: Vec<Artifact>,
    pub kind: String,
}

impl Task {
    /// A fresh task in `submitted` state, with the initial message appended
    /// to history. `context_id` defaults to a new id when none is supplied.
    pub fn new(id: String, context_id: Option<String>, initial_message: TaskMessage) -> Self {
        Task {
            id,
            context_id: context_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            status: TaskStatus {
                state: TaskState::Submitted,
                timestamp: chrono::Utc::now(),
                message: None,
            },
            history: vec![initial_message],
            artifacts: Vec::new(),
            kind: "task".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_are_flagged() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(TaskState::Canceled.is_terminal());
        assert!(TaskState::Rejected.is_terminal());
        assert!(!TaskState::Working.is_terminal());
        assert!(!TaskState::Submitted.is_terminal());
    }

    #[test]
    fn new_task_starts_submitted_with_initial_message_in_history() {
        let task = Task::new(
            "t1".into(),
            None,
            TaskMessage::new("user", "do the thing"),
        );
        assert_eq!(task.status.state, TaskState::Submitted);
        assert_eq!(task.history.len(), 1);
        assert!(!task.context_id.is_empty());
    }

    #[test]
    fn state_vocabulary_strings_match_spec() {
        assert_eq!(TaskState::InputRequired.as_str(), "input-required");
        assert_eq!(TaskState::AuthRequired.as_str(), "auth-required");
    }
}
