use chrono::{
  DateTime,
  TimeZone,
  Utc
};
use tasknest_shared::{
  TaskDto,
  TaskPriority,
  format_short_date
};

use super::state::{
  CardPhase,
  CardState
};

pub const OVERDUE_MARKER: &str =
  " (Overdue)";

/// Everything the task card renders that is derived from the task and the
/// card state, computed fresh on every render.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
  pub overdue:            bool,
  pub card_class:         &'static str,
  pub title_class:        &'static str,
  pub priority:           Option<TaskPriority>,
  pub due_label:          Option<String>,
  pub created_label:      Option<String>,
  pub checkbox_disabled:  bool,
  pub actions_enabled:    bool,
  pub show_delete_dialog: bool,
  pub delete_busy:        bool,
  pub confirm_label:      &'static str
}

impl CardView {
  pub fn build<Tz>(
    task: &TaskDto,
    state: &CardState,
    now: DateTime<Utc>,
    tz: &Tz
  ) -> Self
  where
    Tz: TimeZone
  {
    let overdue =
      task.is_overdue_in(now, tz);
    let phase = state.phase;

    let card_class = if task.completed {
      "task-card completed"
    } else if overdue {
      "task-card overdue"
    } else {
      "task-card"
    };

    let due_label = task
      .due_date
      .as_deref()
      .and_then(|raw| {
        format_short_date(raw, tz)
      })
      .map(|date| {
        if overdue {
          format!("{date}{OVERDUE_MARKER}")
        } else {
          date
        }
      });

    let created_label =
      format_short_date(
        &task.created_at,
        tz
      )
      .map(|date| format!("Created {date}"));

    Self {
      overdue,
      card_class,
      title_class: if task.completed {
        "task-title done"
      } else {
        "task-title"
      },
      priority: task.priority,
      due_label,
      created_label,
      checkbox_disabled: phase
        .is_toggling(),
      actions_enabled: phase
        == CardPhase::Viewing,
      show_delete_dialog: phase
        .shows_delete_dialog(),
      delete_busy: phase.is_deleting(),
      confirm_label: if phase
        .is_deleting()
      {
        "Deleting..."
      } else {
        "Yes, Delete"
      }
    }
  }
}
