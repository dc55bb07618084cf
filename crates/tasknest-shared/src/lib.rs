pub mod display;
pub mod routes;

use std::fmt;

use chrono::{
  DateTime,
  TimeZone,
  Utc
};
use serde::{
  Deserialize,
  Deserializer,
  Serialize
};
use uuid::Uuid;

pub use display::{
  due_instant_in,
  format_short_date,
  parse_task_instant
};

/// Opaque task identifier. The backend may hand out strings or integers;
/// both are carried as text.
#[derive(
  Debug,
  Clone,
  Serialize,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
  pub fn new(
    value: impl Into<String>
  ) -> Self {
    Self(value.into())
  }

  pub fn generate() -> Self {
    Self(Uuid::new_v4().to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for TaskId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for TaskId {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

impl From<String> for TaskId {
  fn from(value: String) -> Self {
    Self(value)
  }
}

impl<'de> Deserialize<'de> for TaskId {
  fn deserialize<D>(
    deserializer: D
  ) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>
  {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
      Text(String),
      Signed(i64),
      Unsigned(u64)
    }

    Ok(
      match RawId::deserialize(
        deserializer
      )? {
        | RawId::Text(text) => {
          Self(text)
        }
        | RawId::Signed(number) => {
          Self(number.to_string())
        }
        | RawId::Unsigned(number) => {
          Self(number.to_string())
        }
      }
    )
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
  High,
  Medium,
  Low
}

impl TaskPriority {
  pub const ALL: [TaskPriority; 3] = [
    TaskPriority::High,
    TaskPriority::Medium,
    TaskPriority::Low
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      | TaskPriority::High => "high",
      | TaskPriority::Medium => {
        "medium"
      }
      | TaskPriority::Low => "low"
    }
  }

  pub fn parse(
    value: &str
  ) -> Option<Self> {
    match value
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "high" => Some(Self::High),
      | "medium" => Some(Self::Medium),
      | "low" => Some(Self::Low),
      | _ => None
    }
  }

  /// Badge text, e.g. `HIGH`.
  pub fn label(self) -> &'static str {
    match self {
      | TaskPriority::High => "HIGH",
      | TaskPriority::Medium => {
        "MEDIUM"
      }
      | TaskPriority::Low => "LOW"
    }
  }

  pub fn badge_class(
    self
  ) -> &'static str {
    match self {
      | TaskPriority::High => {
        "priority-high"
      }
      | TaskPriority::Medium => {
        "priority-medium"
      }
      | TaskPriority::Low => {
        "priority-low"
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct TaskDto {
  pub id:          TaskId,
  pub title:       String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub priority:    Option<TaskPriority>,
  #[serde(
    default,
    deserialize_with = "null_as_empty"
  )]
  pub tags:        Vec<String>,
  #[serde(default)]
  pub due_date:    Option<String>,
  #[serde(default)]
  pub recurrence:  Option<String>,
  #[serde(default)]
  pub completed:   bool,
  pub created_at:  String
}

impl TaskDto {
  /// Due date set, not completed, and strictly before `now`. Never stored.
  pub fn is_overdue(
    &self,
    now: DateTime<Utc>
  ) -> bool {
    self.is_overdue_in(now, &Utc)
  }

  /// Overdue as seen from `tz`: a date-only due date lapses at local
  /// midnight, so the marker agrees with the date shown next to it.
  pub fn is_overdue_in<Tz>(
    &self,
    now: DateTime<Utc>,
    tz: &Tz
  ) -> bool
  where
    Tz: TimeZone
  {
    if self.completed {
      return false;
    }
    self
      .due_date
      .as_deref()
      .and_then(|raw| {
        due_instant_in(raw, tz)
      })
      .is_some_and(|due| due < now)
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct TaskCreate {
  pub title:       String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub priority:    Option<TaskPriority>,
  #[serde(
    default,
    deserialize_with = "null_as_empty"
  )]
  pub tags:        Vec<String>,
  #[serde(default)]
  pub due_date:    Option<String>,
  #[serde(default)]
  pub recurrence:  Option<String>
}

/// Partial update. An absent field keeps the stored value; for optional
/// fields an explicit `null` clears it.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  Default,
  PartialEq,
)]
pub struct TaskPatch {
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub title: Option<String>,
  #[serde(
    default,
    deserialize_with = "deserialize_some",
    skip_serializing_if = "Option::is_none"
  )]
  pub description:
    Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "deserialize_some",
    skip_serializing_if = "Option::is_none"
  )]
  pub priority:
    Option<Option<TaskPriority>>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub tags: Option<Vec<String>>,
  #[serde(
    default,
    deserialize_with = "deserialize_some",
    skip_serializing_if = "Option::is_none"
  )]
  pub due_date: Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "deserialize_some",
    skip_serializing_if = "Option::is_none"
  )]
  pub recurrence:
    Option<Option<String>>
}

impl TaskPatch {
  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

/// Error body returned by the task API.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ErrorBody {
  pub detail: String
}

fn deserialize_some<'de, T, D>(
  deserializer: D
) -> Result<Option<T>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>
{
  T::deserialize(deserializer).map(Some)
}

fn null_as_empty<'de, D>(
  deserializer: D
) -> Result<Vec<String>, D::Error>
where
  D: Deserializer<'de>
{
  Ok(
    Option::<Vec<String>>::deserialize(
      deserializer
    )?
    .unwrap_or_default()
  )
}
