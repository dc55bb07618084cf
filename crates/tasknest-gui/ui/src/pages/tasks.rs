use chrono::{
  DateTime,
  Local,
  TimeZone,
  Utc
};
use std::cell::RefCell;

use tasknest_shared::TaskDto;
use wasm_bindgen_futures::spawn_local;
use yew::{
  Callback,
  Html,
  MouseEvent,
  function_component,
  html,
  use_effect_with,
  use_force_update,
  use_mut_ref,
  use_state
};

use crate::api;
use crate::card::{
  ToastKind,
  ToastMessage
};
use crate::components::{
  TaskCard,
  TaskForm,
  Toast
};
use crate::form::TaskFormMode;

const TASK_CREATED_MESSAGE: &str =
  "Task created!";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
struct TaskSummary {
  total:     usize,
  completed: usize,
  overdue:   usize
}

impl TaskSummary {
  fn of<Tz>(
    tasks: &[TaskDto],
    now: DateTime<Utc>,
    tz: &Tz
  ) -> Self
  where
    Tz: TimeZone
  {
    tasks.iter().fold(
      Self {
        total: tasks.len(),
        ..Self::default()
      },
      |mut summary, task| {
        if task.completed {
          summary.completed += 1;
        } else if task.is_overdue_in(now, tz) {
          summary.overdue += 1;
        }
        summary
      }
    )
  }

  fn label(self) -> String {
    let noun = if self.total == 1 {
      "task"
    } else {
      "tasks"
    };
    format!(
      "{} {noun}, {} completed, {} \
       overdue",
      self.total,
      self.completed,
      self.overdue
    )
  }
}

/// Reload bookkeeping for the task list. A bump works on the live counter,
/// so callbacks captured in an older render still advance it, and only the
/// response to the newest request is applied.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
struct RefreshTracker {
  tick: u64
}

impl RefreshTracker {
  fn tick(self) -> u64 {
    self.tick
  }

  fn bump(&mut self) -> u64 {
    self.tick = self.tick.saturating_add(1);
    self.tick
  }

  fn accepts(self, tick: u64) -> bool {
    tick == self.tick
  }
}

fn next_notice(
  shown: &RefCell<u64>,
  kind: ToastKind,
  message: &str
) -> ToastMessage {
  let mut shown = shown.borrow_mut();
  *shown += 1;
  ToastMessage {
    kind,
    message: message.to_string(),
    seq: *shown
  }
}

#[function_component(TasksPage)]
pub fn tasks_page() -> Html {
  let tasks = use_state(Vec::<TaskDto>::new);
  let loading = use_state(|| true);
  let load_error =
    use_state(|| None::<String>);
  let refresh =
    use_mut_ref(RefreshTracker::default);
  let rerender = use_force_update();
  let notices_shown = use_mut_ref(|| 0_u64);
  let creating = use_state(|| false);
  let notice =
    use_state(|| None::<ToastMessage>);

  {
    let tasks = tasks.clone();
    let loading = loading.clone();
    let load_error = load_error.clone();
    let notice = notice.clone();
    let refresh = refresh.clone();
    let notices_shown =
      notices_shown.clone();
    let tick = refresh.borrow().tick();
    use_effect_with(
      tick,
      move |tick| {
        let tick = *tick;
        spawn_local(async move {
          tracing::debug!(tick, "refreshing task list");
          let result = api::list_tasks().await;
          if !refresh.borrow().accepts(tick) {
            tracing::debug!(tick, "dropping stale task list");
            return;
          }

          match result {
            | Ok(list) => {
              tracing::debug!(count = list.len(), "loaded tasks");
              tasks.set(list);
              load_error.set(None);
            }
            | Err(err) => {
              tracing::error!(error = %err, "listing tasks failed");
              load_error.set(Some(format!(
                "Could not load tasks: {err}"
              )));
              notice.set(Some(next_notice(
                &notices_shown,
                ToastKind::Error,
                "Failed to load tasks."
              )));
            }
          }
          loading.set(false);
        });
        || ()
      }
    );
  }

  let on_refresh = {
    let refresh = refresh.clone();
    let rerender = rerender.clone();
    Callback::from(move |()| {
      let tick = refresh.borrow_mut().bump();
      tracing::debug!(tick, "task list refresh requested");
      rerender.force_update();
    })
  };

  let on_toggle_create = {
    let creating = creating.clone();
    Callback::from(
      move |_: MouseEvent| {
        creating.set(!*creating);
      }
    )
  };

  let on_created = {
    let creating = creating.clone();
    let notice = notice.clone();
    let notices_shown =
      notices_shown.clone();
    let on_refresh = on_refresh.clone();
    Callback::from(
      move |_: TaskDto| {
        creating.set(false);
        notice.set(Some(next_notice(
          &notices_shown,
          ToastKind::Success,
          TASK_CREATED_MESSAGE
        )));
        on_refresh.emit(());
      }
    )
  };

  let on_create_cancel = {
    let creating = creating.clone();
    Callback::from(move |()| {
      creating.set(false)
    })
  };

  let on_notice_close = {
    let notice = notice.clone();
    Callback::from(move |()| {
      notice.set(None)
    })
  };

  let summary =
    TaskSummary::of(
      &tasks,
      Utc::now(),
      &Local
    );

  let body = if *loading {
    html! { <div class="empty">{ "Loading tasks..." }</div> }
  } else if let Some(message) =
    (*load_error).clone()
  {
    html! { <div class="form-error" role="alert">{ message }</div> }
  } else if tasks.is_empty() {
    html! {
        <div class="empty">
            { "No tasks yet. Create your first task to get started." }
        </div>
    }
  } else {
    html! {
        <div class="task-list">
            {
                for tasks.iter().map(|task| html! {
                    <TaskCard
                        key={task.id.to_string()}
                        task={task.clone()}
                        on_task_updated={on_refresh.clone()}
                    />
                })
            }
        </div>
    }
  };

  html! {
      <section class="tasks-page">
          <header class="tasks-header">
              <div>
                  <h1>{ "My Tasks" }</h1>
                  <p class="summary">{ summary.label() }</p>
              </div>
              <button class="btn primary" type="button" onclick={on_toggle_create}>
                  { if *creating { "Close" } else { "New Task" } }
              </button>
          </header>
          if *creating {
              <div class="panel create-panel">
                  <TaskForm
                      mode={TaskFormMode::Create}
                      on_success={on_created}
                      on_cancel={on_create_cancel}
                  />
              </div>
          }
          { body }
          if let Some(toast) = (*notice).clone() {
              <Toast
                  message={toast.message}
                  kind={toast.kind}
                  seq={toast.seq}
                  on_close={on_notice_close}
              />
          }
      </section>
  }
}

#[cfg(test)]
mod tests {
  use std::rc::Rc;

  use tasknest_shared::TaskId;

  use super::*;
  use crate::card::{
    CardEvent,
    CardState,
    route_effect
  };

  fn task(
    id: &str,
    due: Option<&str>,
    completed: bool
  ) -> TaskDto {
    TaskDto {
      id: TaskId::from(id),
      title: id.to_string(),
      description: None,
      priority: None,
      tags: vec![],
      due_date: due.map(ToString::to_string),
      recurrence: None,
      completed,
      created_at: "2025-01-01T00:00:00Z"
        .to_string()
    }
  }

  #[test]
  fn summary_counts_completed_and_overdue(
  ) {
    let now = Utc
      .with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
      .single()
      .expect("valid timestamp");
    let tasks = vec![
      task("a", Some("2020-01-01"), false),
      task("b", Some("2020-01-01"), true),
      task("c", Some("2030-01-01"), false),
      task("d", None, false),
    ];

    let summary =
      TaskSummary::of(&tasks, now, &Utc);
    assert_eq!(summary, TaskSummary {
      total:     4,
      completed: 1,
      overdue:   1
    });
    assert_eq!(
      summary.label(),
      "4 tasks, 1 completed, 1 overdue"
    );
  }

  #[test]
  fn summary_of_single_task_is_singular(
  ) {
    let summary = TaskSummary {
      total: 1,
      ..TaskSummary::default()
    };
    assert_eq!(
      summary.label(),
      "1 task, 0 completed, 0 overdue"
    );
  }

  #[test]
  fn bumps_from_one_render_both_count() {
    let refresh = Rc::new(RefCell::new(
      RefreshTracker::default()
    ));
    // Two cards holding the callback from the same render.
    let bump = |refresh: Rc<RefCell<RefreshTracker>>| {
      move || refresh.borrow_mut().bump()
    };
    let first = bump(refresh.clone());
    let second = bump(refresh.clone());

    assert_eq!(second(), 1);
    assert_eq!(first(), 2);
    assert_eq!(refresh.borrow().tick(), 2);
  }

  #[test]
  fn only_newest_list_response_applies() {
    let mut refresh =
      RefreshTracker::default();
    let initial = refresh.tick();
    let after_toggle = refresh.bump();
    let after_delete = refresh.bump();

    assert!(!refresh.accepts(initial));
    assert!(!refresh.accepts(after_toggle));
    assert!(refresh.accepts(after_delete));
  }

  #[test]
  fn card_outcomes_drive_page_refreshes() {
    let refresh = RefCell::new(
      RefreshTracker::default()
    );
    let mut card = CardState::default();
    let mut send = |event: CardEvent| {
      route_effect(
        card.apply(event),
        || {
          refresh.borrow_mut().bump();
        },
        |_| {}
      )
    };

    send(CardEvent::ToggleRequested);
    send(CardEvent::ToggleFailed);
    send(CardEvent::ToggleSettled);
    send(CardEvent::ToggleRequested);
    send(CardEvent::ToggleSucceeded {
      was_completed: false
    });
    send(CardEvent::ToggleSettled);
    send(CardEvent::DeleteRequested);
    send(CardEvent::DeleteConfirmed);
    send(CardEvent::DeleteSucceeded);

    assert_eq!(refresh.borrow().tick(), 2);
  }

  #[test]
  fn notices_get_increasing_sequence() {
    let shown = RefCell::new(0);
    let first = next_notice(
      &shown,
      ToastKind::Success,
      TASK_CREATED_MESSAGE
    );
    let second = next_notice(
      &shown,
      ToastKind::Success,
      TASK_CREATED_MESSAGE
    );

    assert_eq!(first.message, second.message);
    assert!(second.seq > first.seq);
  }
}
