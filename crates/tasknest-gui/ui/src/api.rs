use std::fmt;

use gloo::net::http::{
  Request,
  Response
};
use serde::de::DeserializeOwned;
use tasknest_shared::routes::{
  task_complete_path,
  task_path,
  tasks_path
};
use tasknest_shared::{
  ErrorBody,
  TaskCreate,
  TaskDto,
  TaskId,
  TaskPatch
};

use crate::config::api_base;

/// Any failed call to the task API. Callers in the UI treat every variant
/// the same way; the split only feeds the logs.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
  Network(String),
  Status {
    status: u16,
    detail: String
  },
  Decode(String),
  Encode(String)
}

impl fmt::Display for ApiError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | ApiError::Network(msg) => {
        write!(f, "network error: {msg}")
      }
      | ApiError::Status {
        status,
        detail
      } => {
        write!(f, "HTTP {status}: {detail}")
      }
      | ApiError::Decode(msg) => {
        write!(
          f,
          "failed to decode response: \
           {msg}"
        )
      }
      | ApiError::Encode(msg) => {
        write!(
          f,
          "failed to encode request: \
           {msg}"
        )
      }
    }
  }
}

impl std::error::Error for ApiError {}

fn endpoint(path: &str) -> String {
  format!("{}{path}", api_base())
}

pub async fn list_tasks()
-> Result<Vec<TaskDto>, ApiError> {
  let response =
    Request::get(&endpoint(&tasks_path()))
      .send()
      .await
      .map_err(network)?;
  decode_json(response).await
}

pub async fn create_task(
  input: &TaskCreate
) -> Result<TaskDto, ApiError> {
  let response =
    Request::post(&endpoint(&tasks_path()))
      .json(input)
      .map_err(|err| {
        ApiError::Encode(err.to_string())
      })?
      .send()
      .await
      .map_err(network)?;
  decode_json(response).await
}

pub async fn update_task(
  id: &TaskId,
  patch: &TaskPatch
) -> Result<TaskDto, ApiError> {
  let response =
    Request::patch(&endpoint(&task_path(id)))
      .json(patch)
      .map_err(|err| {
        ApiError::Encode(err.to_string())
      })?
      .send()
      .await
      .map_err(network)?;
  decode_json(response).await
}

pub async fn delete_task(
  id: &TaskId
) -> Result<(), ApiError> {
  let response = Request::delete(
    &endpoint(&task_path(id))
  )
  .send()
  .await
  .map_err(network)?;
  ensure_success(response).await?;
  Ok(())
}

pub async fn toggle_task_completion(
  id: &TaskId
) -> Result<TaskDto, ApiError> {
  let response = Request::patch(
    &endpoint(&task_complete_path(id))
  )
  .send()
  .await
  .map_err(network)?;
  decode_json(response).await
}

fn network(
  err: gloo::net::Error
) -> ApiError {
  ApiError::Network(err.to_string())
}

async fn ensure_success(
  response: Response
) -> Result<Response, ApiError> {
  if response.ok() {
    return Ok(response);
  }

  let status = response.status();
  let body =
    response.text().await.unwrap_or_default();
  let detail = error_detail(&body)
    .unwrap_or_else(|| {
      response.status_text()
    });
  Err(ApiError::Status {
    status,
    detail
  })
}

async fn decode_json<T>(
  response: Response
) -> Result<T, ApiError>
where
  T: DeserializeOwned
{
  let response =
    ensure_success(response).await?;
  response.json::<T>().await.map_err(
    |err| ApiError::Decode(err.to_string())
  )
}

/// Pulls the `detail` message out of an error body. Validation errors may
/// carry a list instead of a string; those are rendered as JSON.
fn error_detail(
  body: &str
) -> Option<String> {
  if let Ok(parsed) =
    serde_json::from_str::<ErrorBody>(body)
  {
    return Some(parsed.detail);
  }

  let value: serde_json::Value =
    serde_json::from_str(body).ok()?;
  let detail = value.get("detail")?;
  Some(
    detail
      .as_str()
      .map(ToString::to_string)
      .unwrap_or_else(|| {
        detail.to_string()
      })
  )
}
