//! Paths of the task HTTP API, shared by the server router and the browser
//! client.

use crate::TaskId;

pub const API_PREFIX: &str = "/api/v1";
pub const HEALTH: &str = "/health";

/// Router patterns, in axum's `{param}` syntax.
pub const TASKS_PATTERN: &str =
  "/api/v1/tasks";
pub const TASK_PATTERN: &str =
  "/api/v1/tasks/{id}";
pub const TASK_COMPLETE_PATTERN: &str =
  "/api/v1/tasks/{id}/complete";

pub fn tasks_path() -> String {
  TASKS_PATTERN.to_string()
}

pub fn task_path(id: &TaskId) -> String {
  format!("{API_PREFIX}/tasks/{id}")
}

pub fn task_complete_path(
  id: &TaskId
) -> String {
  format!(
    "{API_PREFIX}/tasks/{id}/complete"
  )
}
