use std::fmt;

use tasknest_shared::display::date_input_value;
use tasknest_shared::{
  TaskCreate,
  TaskDto,
  TaskId,
  TaskPatch,
  TaskPriority
};

pub const RECURRENCE_PRESETS: [&str; 4] = [
  "daily", "weekly", "monthly", "yearly"
];

#[derive(Debug, Clone, PartialEq)]
pub enum TaskFormMode {
  Create,
  Edit(TaskId)
}

/// Editable fields of a task. `id`, `completed` and `created_at` are not
/// part of it.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Default,
)]
pub struct TaskFormValues {
  pub title:       String,
  pub description: Option<String>,
  pub priority:    Option<TaskPriority>,
  pub tags:        Vec<String>,
  pub due_date:    Option<String>,
  pub recurrence:  Option<String>
}

impl TaskFormValues {
  pub fn from_task(
    task: &TaskDto
  ) -> Self {
    Self {
      title:       task.title.clone(),
      description: task
        .description
        .clone(),
      priority:    task.priority,
      tags:        task.tags.clone(),
      due_date:    task.due_date.clone(),
      recurrence:  task
        .recurrence
        .clone()
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum FormError {
  TitleRequired,
  InvalidDueDate
}

impl fmt::Display for FormError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | FormError::TitleRequired => {
        f.write_str("Title is required.")
      }
      | FormError::InvalidDueDate => {
        f.write_str(
          "Due date must be a valid \
           date."
        )
      }
    }
  }
}

/// Raw input values as the form controls hold them.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Default,
)]
pub struct TaskFormDraft {
  pub title:       String,
  pub description: String,
  pub priority:    String,
  pub tags:        String,
  pub due_date:    String,
  pub recurrence:  String,
  original_due:    Option<String>
}

impl TaskFormDraft {
  pub fn from_values(
    values: &TaskFormValues
  ) -> Self {
    Self {
      title:        values.title.clone(),
      description:  values
        .description
        .clone()
        .unwrap_or_default(),
      priority:     values
        .priority
        .map(|priority| {
          priority.as_str().to_string()
        })
        .unwrap_or_default(),
      tags:         values.tags.join(", "),
      due_date:     values
        .due_date
        .as_deref()
        .and_then(date_input_value)
        .unwrap_or_default(),
      recurrence:   values
        .recurrence
        .clone()
        .unwrap_or_default(),
      original_due: values
        .due_date
        .clone()
    }
  }

  /// Validated values. A due date whose calendar day was left untouched
  /// keeps its original time of day.
  pub fn values(
    &self
  ) -> Result<TaskFormValues, FormError>
  {
    let title = self.title.trim();
    if title.is_empty() {
      return Err(
        FormError::TitleRequired
      );
    }

    let due_date =
      match non_empty(&self.due_date) {
        | None => None,
        | Some(day) => {
          let Some(normalized) =
            date_input_value(&day)
          else {
            return Err(
              FormError::InvalidDueDate
            );
          };
          let unchanged = self
            .original_due
            .as_deref()
            .and_then(date_input_value)
            .is_some_and(|original| {
              original == normalized
            });
          if unchanged {
            self.original_due.clone()
          } else {
            Some(normalized)
          }
        }
      };

    Ok(TaskFormValues {
      title: title.to_string(),
      description: non_empty(
        &self.description
      ),
      priority: TaskPriority::parse(
        &self.priority
      ),
      tags: split_tags(&self.tags),
      due_date,
      recurrence: non_empty(
        &self.recurrence
      )
    })
  }

  pub fn to_create(
    &self
  ) -> Result<TaskCreate, FormError> {
    let values = self.values()?;
    Ok(TaskCreate {
      title:       values.title,
      description: values.description,
      priority:    values.priority,
      tags:        values.tags,
      due_date:    values.due_date,
      recurrence:  values.recurrence
    })
  }

  /// Full patch of every editable field; empty inputs clear the stored
  /// value.
  pub fn to_patch(
    &self
  ) -> Result<TaskPatch, FormError> {
    let values = self.values()?;
    Ok(TaskPatch {
      title:       Some(values.title),
      description: Some(
        values.description
      ),
      priority:    Some(values.priority),
      tags:        Some(values.tags),
      due_date:    Some(values.due_date),
      recurrence:  Some(
        values.recurrence
      )
    })
  }

  /// Recurrence choices for the select, keeping a custom stored rule.
  pub fn recurrence_options(
    &self
  ) -> Vec<String> {
    let mut options: Vec<String> =
      RECURRENCE_PRESETS
        .iter()
        .map(|preset| preset.to_string())
        .collect();
    let current = self.recurrence.trim();
    if !current.is_empty()
      && !options
        .iter()
        .any(|option| option == current)
    {
      options.push(current.to_string());
    }
    options
  }
}

/// Comma separated tags, trimmed, blanks dropped. Order and duplicates are
/// kept.
pub fn split_tags(
  raw: &str
) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|tag| !tag.is_empty())
    .map(ToString::to_string)
    .collect()
}

fn non_empty(
  raw: &str
) -> Option<String> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    None
  } else {
    Some(trimmed.to_string())
  }
}
