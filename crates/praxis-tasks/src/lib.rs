// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Task manager: lifecycle and state machine for externally-visible
//! **Tasks** (spec §4.7).

use std::collections::HashMap;

use chrono::Duration;
use praxis_events::EventBus;
use praxis_types::{Artifact, Event, Task, TaskMessage, TaskState, TaskStatus};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task not found")]
    NotFound,
    #[error("task not cancelable")]
    NotCancelable,
}

pub struct TaskManager {
    tasks: RwLock<HashMap<String, Task>>,
    events: EventBus,
}

impl TaskManager {
    pub fn new(events: EventBus) -> Self {
        TaskManager {
            tasks: RwLock::new(HashMap::new()),
            events,
        }
    }

    pub async fn create_task(
        &self,
        initial_message: TaskMessage,
        context_id: Option<String>,
    ) -> Task {
        let id = uuid::Uuid::new_v4().to_string();
        let task = Task::new(id, context_id, initial_message);
        {
            let mut guard = self.tasks.write().await;
            guard.insert(task.id.clone(), task.clone());
        }
        self.events.publish(Event::TaskCreated { task: task.clone() });
        task
    }

    pub async fn get_task(&self, id: &str) -> Option<Task> {
        self.tasks.read().await.get(id).cloned()
    }

    /// Monotonic state transition: records a fresh timestamp, appends
    /// `agent_message` to both `status.message` and history when present,
    /// and publishes `TaskStatusUpdate`. Updating a non-existent task is a
    /// warning, not an error, per spec §4.7.
    pub async fn update_task_status(
        &self,
        id: &str,
        new_state: TaskState,
        agent_message: Option<String>,
    ) {
        let status = {
            let mut guard = self.tasks.write().await;
            let Some(task) = guard.get_mut(id) else {
                warn!(task_id = id, "update_task_status on unknown task");
                return;
            };
            task.status = TaskStatus {
                state: new_state,
                timestamp: chrono::Utc::now(),
                message: agent_message.clone(),
            };
            if let Some(msg) = &agent_message {
                task.history.push(TaskMessage::new("agent", msg.clone()));
            }
            task.status.clone()
        };
        self.events.publish(Event::TaskStatusUpdate {
            task_id: id.to_string(),
            status,
        });
    }

    pub async fn add_artifact_to_task(&self, id: &str, artifact: Artifact) -> Result<(), TaskError> {
        {
            let mut guard = self.tasks.write().await;
            let task = guard.get_mut(id).ok_or(TaskError::NotFound)?;
            task.artifacts.push(artifact.clone());
        }
        self.events.publish(Event::ArtifactAdded {
            task_id: id.to_string(),
            artifact,
        });
        Ok(())
    }

    pub async fn add_message_to_history(&self, id: &str, message: TaskMessage) -> Result<(), TaskError> {
        let mut guard = self.tasks.write().await;
        let task = guard.get_mut(id).ok_or(TaskError::NotFound)?;
        task.history.push(message);
        Ok(())
    }

    pub async fn cancel_task(&self, id: &str) -> Result<(), TaskError> {
        let status = {
            let mut guard = self.tasks.write().await;
            let task = guard.get_mut(id).ok_or(TaskError::NotFound)?;
            if task.status.state.is_terminal() {
                return Err(TaskError::NotCancelable);
            }
            task.status = TaskStatus {
                state: TaskState::Canceled,
                timestamp: chrono::Utc::now(),
                message: None,
            };
            task.status.clone()
        };
        self.events.publish(Event::TaskStatusUpdate {
            task_id: id.to_string(),
            status,
        });
        Ok(())
    }

    /// Removes tasks in a terminal state whose last status timestamp is
    /// older than `now - older_than`. Returns the count removed.
    pub async fn cleanup_completed_tasks(&self, older_than: Duration) -> usize {
        let cutoff = chrono::Utc::now() - older_than;
        let mut guard = self.tasks.write().await;
        let before = guard.len();
        guard.retain(|_, task| !(task.status.state.is_terminal() && task.status.timestamp < cutoff));
        before - guard.len()
    }

    /// Histogram of task count by state, with an `unknown` bucket reserved
    /// for states this manager cannot otherwise classify.
    pub async fn get_task_count(&self) -> HashMap<String, usize> {
        let guard = self.tasks.read().await;
        let mut counts: HashMap<String, usize> = HashMap::new();
        counts.insert("unknown".to_string(), 0);
        for task in guard.values() {
            *counts.entry(task.status.state.as_str().to_string()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> TaskManager {
        TaskManager::new(EventBus::new())
    }

    #[tokio::test]
    async fn create_task_starts_submitted() {
        let mgr = manager();
        let task = mgr
            .create_task(TaskMessage::new("user", "do it"), None)
            .await;
        assert_eq!(task.status.state, TaskState::Submitted);
        assert_eq!(mgr.get_task(&task.id).await.unwrap().id, task.id);
    }

    #[tokio::test]
    async fn lifecycle_advances_timestamps_strictly() {
        let mgr = manager();
        let task = mgr.create_task(TaskMessage::new("user", "x"), None).await;

        mgr.update_task_status(&task.id, TaskState::Working, None).await;
        let working = mgr.get_task(&task.id).await.unwrap();

        mgr.update_task_status(&task.id, TaskState::Completed, Some("done".into()))
            .await;
        let completed = mgr.get_task(&task.id).await.unwrap();

        assert!(completed.status.timestamp >= working.status.timestamp);
        assert_eq!(completed.status.state, TaskState::Completed);
        assert_eq!(completed.history.last().unwrap().content, "done");
    }

    #[tokio::test]
    async fn cancel_after_completed_returns_not_cancelable() {
        let mgr = manager();
        let task = mgr.create_task(TaskMessage::new("user", "x"), None).await;
        mgr.update_task_status(&task.id, TaskState::Completed, None).await;
        let result = mgr.cancel_task(&task.id).await;
        assert_eq!(result, Err(TaskError::NotCancelable));
    }

    #[tokio::test]
    async fn cancel_unknown_task_returns_not_found() {
        let mgr = manager();
        assert_eq!(mgr.cancel_task("nope").await, Err(TaskError::NotFound));
    }

    #[tokio::test]
    async fn update_on_unknown_task_does_not_panic() {
        let mgr = manager();
        mgr.update_task_status("nope", TaskState::Working, None).await;
    }

    #[tokio::test]
    async fn cleanup_removes_only_old_terminal_tasks() {
        let mgr = manager();
        let keep = mgr.create_task(TaskMessage::new("user", "keep"), None).await;
        let remove = mgr.create_task(TaskMessage::new("user", "remove"), None).await;

        mgr.update_task_status(&keep.id, TaskState::Working, None).await;
        mgr.update_task_status(&remove.id, TaskState::Completed, None).await;

        // only the terminal task, and only once "older_than" has elapsed,
        // is eligible; a zero-length window still counts it as older.
        let removed = mgr.cleanup_completed_tasks(Duration::seconds(-1)).await;
        assert_eq!(removed, 1);
        assert!(mgr.get_task(&remove.id).await.is_none());
        assert!(mgr.get_task(&keep.id).await.is_some());
    }

    #[tokio::test]
    async fn task_count_histogram_has_unknown_bucket() {
        let mgr = manager();
        mgr.create_task(TaskMessage::new("user", "a"), None).await;
        let counts = mgr.get_task_count().await;
        assert_eq!(counts.get("submitted"), Some(&1));
        assert_eq!(counts.get("unknown"), Some(&0));
    }

    #[tokio::test]
    async fn add_artifact_to_unknown_task_returns_not_found() {
        let mgr = manager();
        let artifact = Artifact {
            id: "a1".into(),
            name: "out.txt".into(),
            content: serde_json::json!("hi"),
            created_at: chrono::Utc::now(),
        };
        assert_eq!(
            mgr.add_artifact_to_task("nope", artifact).await,
            Err(TaskError::NotFound)
        );
    }
}
