use std::cell::RefCell;
use std::rc::Rc;

use chrono::{
  Local,
  Utc
};
use tasknest_shared::TaskDto;
use wasm_bindgen_futures::spawn_local;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html,
  use_force_update,
  use_mut_ref
};
use yew::functional::UseForceUpdateHandle;

use super::{
  DeleteConfirmModal,
  PriorityBadge,
  TaskForm,
  TaskTagBadge,
  Toast
};
use crate::api;
use crate::card::{
  CardEffect,
  CardEvent,
  CardState,
  CardView,
  InFlightGuard,
  route_effect
};
use crate::form::{
  TaskFormMode,
  TaskFormValues
};

#[derive(Properties, PartialEq)]
pub struct TaskCardProps {
  pub task:            TaskDto,
  #[prop_or_default]
  pub on_task_updated: Option<Callback<()>>
}

/// Shared handle on the card state. Events are applied to the cell right
/// away so a second click before the next render sees the new phase.
#[derive(Clone)]
struct CardHandle {
  state:           Rc<RefCell<CardState>>,
  rerender:        UseForceUpdateHandle,
  on_task_updated: Option<Callback<()>>
}

impl CardHandle {
  /// Applies `event` and handles the parent and alert effects; the API
  /// effects are handed back to the caller.
  fn dispatch(
    &self,
    event: CardEvent
  ) -> Option<CardEffect> {
    let effect =
      self.state.borrow_mut().apply(event);
    self.rerender.force_update();

    route_effect(
      effect,
      || {
        if let Some(on_task_updated) =
          self.on_task_updated.as_ref()
        {
          on_task_updated.emit(());
        }
      },
      gloo::dialogs::alert
    )
  }

  fn callback<E>(
    &self,
    event: CardEvent
  ) -> Callback<E>
  where
    E: 'static
  {
    let handle = self.clone();
    Callback::from(move |_: E| {
      handle.dispatch(event);
    })
  }
}

#[function_component(TaskCard)]
pub fn task_card(
  props: &TaskCardProps
) -> Html {
  let handle = CardHandle {
    state:           use_mut_ref(
      CardState::default
    ),
    rerender:        use_force_update(),
    on_task_updated: props
      .on_task_updated
      .clone()
  };
  let task = &props.task;
  let state = handle.state.borrow().clone();
  let view = CardView::build(
    task,
    &state,
    Utc::now(),
    &Local
  );

  let on_toggle = {
    let handle = handle.clone();
    let task = task.clone();
    Callback::from(
      move |_: web_sys::Event| {
        if handle.dispatch(
          CardEvent::ToggleRequested
        ) != Some(CardEffect::IssueToggle)
        {
          return;
        }

        let handle = handle.clone();
        let task = task.clone();
        spawn_local(async move {
          let _settle = {
            let handle = handle.clone();
            InFlightGuard::new(move || {
              handle.dispatch(
                CardEvent::ToggleSettled
              );
            })
          };

          match api::toggle_task_completion(
            &task.id
          )
          .await
          {
            | Ok(updated) => {
              tracing::info!(
                task = %updated.id,
                completed = updated.completed,
                "toggled task completion"
              );
              handle.dispatch(
                CardEvent::ToggleSucceeded {
                  was_completed: task
                    .completed
                }
              );
            }
            | Err(err) => {
              tracing::error!(
                task = %task.id,
                error = %err,
                "toggling task failed"
              );
              handle.dispatch(
                CardEvent::ToggleFailed
              );
            }
          }
        });
      }
    )
  };

  let on_confirm_delete = {
    let handle = handle.clone();
    let id = task.id.clone();
    Callback::from(move |()| {
      if handle.dispatch(
        CardEvent::DeleteConfirmed
      ) != Some(CardEffect::IssueDelete)
      {
        return;
      }

      let handle = handle.clone();
      let id = id.clone();
      spawn_local(async move {
        match api::delete_task(&id).await {
          | Ok(()) => {
            tracing::info!(task = %id, "deleted task");
            handle.dispatch(
              CardEvent::DeleteSucceeded
            );
          }
          | Err(err) => {
            tracing::error!(
              task = %id,
              error = %err,
              "deleting task failed"
            );
            handle.dispatch(
              CardEvent::DeleteFailed
            );
          }
        }
      });
    })
  };

  let on_toast_close = handle
    .callback::<()>(CardEvent::ToastDismissed);

  let toast = state.toast.clone().map(
    |toast| {
      html! {
          <Toast
              message={toast.message}
              kind={toast.kind}
              seq={toast.seq}
              on_close={on_toast_close}
          />
      }
    }
  );

  if state.phase.is_editing() {
    return html! {
        <div class="task-card editing">
            <TaskForm
                initial={TaskFormValues::from_task(task)}
                mode={TaskFormMode::Edit(task.id.clone())}
                on_success={handle.callback::<TaskDto>(CardEvent::EditSaved)}
                on_cancel={handle.callback::<()>(CardEvent::EditCancelled)}
            />
            { for toast }
        </div>
    };
  }

  html! {
      <div class={view.card_class}>
          <div class="task-card-header">
              <input
                  class="task-checkbox"
                  type="checkbox"
                  aria-label="Toggle completion"
                  checked={task.completed}
                  disabled={view.checkbox_disabled}
                  onchange={on_toggle}
              />
              <div class="task-card-body">
                  <div class={view.title_class}>{ task.title.clone() }</div>
                  if let Some(description) = task.description.as_ref() {
                      <div class="task-description">{ description.clone() }</div>
                  }
              </div>
              <div class="task-card-actions">
                  <button
                      class="btn icon"
                      type="button"
                      title="Edit task"
                      disabled={!view.actions_enabled}
                      onclick={handle.callback::<MouseEvent>(CardEvent::EditRequested)}
                  >
                      { "Edit" }
                  </button>
                  <button
                      class="btn icon danger"
                      type="button"
                      title="Delete task"
                      disabled={!view.actions_enabled}
                      onclick={handle.callback::<MouseEvent>(CardEvent::DeleteRequested)}
                  >
                      { "Delete" }
                  </button>
              </div>
          </div>
          <div class="task-card-meta">
              if let Some(priority) = view.priority {
                  <PriorityBadge priority={priority} />
              }
              if let Some(due) = view.due_label.clone() {
                  <span class={if view.overdue { "due-date overdue" } else { "due-date" }}>
                      { format!("Due {due}") }
                  </span>
              }
              if let Some(recurrence) = task.recurrence.as_ref() {
                  <span class="recurrence">{ format!("Repeats {recurrence}") }</span>
              }
              if let Some(created) = view.created_label.clone() {
                  <span class="created-at">{ created }</span>
              }
          </div>
          if !task.tags.is_empty() {
              <div class="task-tags">
                  { for task.tags.iter().map(|tag| html! { <TaskTagBadge tag={tag.clone()} /> }) }
              </div>
          }
          if view.show_delete_dialog {
              <DeleteConfirmModal
                  task_title={task.title.clone()}
                  busy={view.delete_busy}
                  confirm_label={view.confirm_label}
                  on_confirm={on_confirm_delete}
                  on_cancel={handle.callback::<()>(CardEvent::DeleteCancelled)}
              />
          }
          { for toast }
      </div>
  }
}
