use tasknest_shared::{
  TaskCreate,
  TaskDto,
  TaskId,
  TaskPatch,
  TaskPriority
};
use wasm_bindgen_futures::spawn_local;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  SubmitEvent,
  TargetCast,
  function_component,
  html,
  use_state
};

use crate::api;
use crate::form::{
  TaskFormDraft,
  TaskFormMode,
  TaskFormValues
};

#[derive(Properties, PartialEq)]
pub struct TaskFormProps {
  #[prop_or_default]
  pub initial:    TaskFormValues,
  pub mode:       TaskFormMode,
  pub on_success: Callback<TaskDto>,
  pub on_cancel:  Callback<()>
}

enum SaveRequest {
  Create(TaskCreate),
  Update(TaskId, TaskPatch)
}

#[function_component(TaskForm)]
pub fn task_form(
  props: &TaskFormProps
) -> Html {
  let draft = {
    let initial = props.initial.clone();
    use_state(move || {
      TaskFormDraft::from_values(&initial)
    })
  };
  let saving = use_state(|| false);
  let error = use_state(|| None::<String>);

  let edit_field =
    |apply: fn(&mut TaskFormDraft, String)| {
      let draft = draft.clone();
      let error = error.clone();
      Callback::from(
        move |value: String| {
          let mut next = (*draft).clone();
          apply(&mut next, value);
          draft.set(next);
          error.set(None);
        }
      )
    };

  let on_title = edit_field(
    |draft, value| draft.title = value
  );
  let on_description = edit_field(
    |draft, value| {
      draft.description = value
    }
  );
  let on_priority = edit_field(
    |draft, value| draft.priority = value
  );
  let on_tags = edit_field(
    |draft, value| draft.tags = value
  );
  let on_due = edit_field(
    |draft, value| draft.due_date = value
  );
  let on_recurrence = edit_field(
    |draft, value| {
      draft.recurrence = value
    }
  );

  let onsubmit = {
    let draft = draft.clone();
    let saving = saving.clone();
    let error = error.clone();
    let mode = props.mode.clone();
    let on_success =
      props.on_success.clone();
    Callback::from(
      move |event: SubmitEvent| {
        event.prevent_default();
        if *saving {
          return;
        }

        let request = match &mode {
          | TaskFormMode::Create => draft
            .to_create()
            .map(SaveRequest::Create),
          | TaskFormMode::Edit(id) => {
            draft.to_patch().map(|patch| {
              SaveRequest::Update(
                id.clone(),
                patch
              )
            })
          }
        };
        let request = match request {
          | Ok(request) => request,
          | Err(err) => {
            error.set(Some(err.to_string()));
            return;
          }
        };

        saving.set(true);
        error.set(None);

        let saving = saving.clone();
        let error = error.clone();
        let on_success = on_success.clone();
        spawn_local(async move {
          let result = match &request {
            | SaveRequest::Create(input) => {
              api::create_task(input).await
            }
            | SaveRequest::Update(id, patch) => {
              api::update_task(id, patch).await
            }
          };
          saving.set(false);

          match result {
            | Ok(task) => {
              tracing::info!(task = %task.id, "saved task");
              on_success.emit(task);
            }
            | Err(err) => {
              tracing::error!(error = %err, "saving task failed");
              error.set(Some(format!(
                "Could not save the task: {err}"
              )));
            }
          }
        });
      }
    )
  };

  let on_cancel = {
    let on_cancel =
      props.on_cancel.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_cancel.emit(())
      }
    )
  };

  let submit_label = match (
    *saving,
    &props.mode
  ) {
    | (true, _) => "Saving...",
    | (false, TaskFormMode::Create) => {
      "Create Task"
    }
    | (false, TaskFormMode::Edit(_)) => {
      "Save Changes"
    }
  };
  let busy = *saving;

  html! {
      <form class="task-form" onsubmit={onsubmit}>
          <label class="field">
              <span>{ "Title" }</span>
              <input
                  type="text"
                  required=true
                  placeholder="What needs to be done?"
                  value={draft.title.clone()}
                  oninput={Callback::from(move |e: web_sys::InputEvent| {
                      let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                      on_title.emit(input.value());
                  })}
              />
          </label>
          <label class="field">
              <span>{ "Description" }</span>
              <textarea
                  rows="3"
                  value={draft.description.clone()}
                  oninput={Callback::from(move |e: web_sys::InputEvent| {
                      let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
                      on_description.emit(input.value());
                  })}
              />
          </label>
          <div class="field-row">
              <label class="field">
                  <span>{ "Priority" }</span>
                  <select
                      onchange={Callback::from(move |e: web_sys::Event| {
                          let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
                          on_priority.emit(select.value());
                      })}
                  >
                      <option value="" selected={draft.priority.is_empty()}>{ "None" }</option>
                      {
                          for TaskPriority::ALL.iter().map(|priority| html! {
                              <option
                                  value={priority.as_str()}
                                  selected={draft.priority == priority.as_str()}
                              >
                                  { priority.label() }
                              </option>
                          })
                      }
                  </select>
              </label>
              <label class="field">
                  <span>{ "Due date" }</span>
                  <input
                      type="date"
                      value={draft.due_date.clone()}
                      oninput={Callback::from(move |e: web_sys::InputEvent| {
                          let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                          on_due.emit(input.value());
                      })}
                  />
              </label>
              <label class="field">
                  <span>{ "Repeats" }</span>
                  <select
                      onchange={Callback::from(move |e: web_sys::Event| {
                          let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
                          on_recurrence.emit(select.value());
                      })}
                  >
                      <option value="" selected={draft.recurrence.is_empty()}>{ "Never" }</option>
                      {
                          for draft.recurrence_options().into_iter().map(|option| {
                              let selected = draft.recurrence.trim() == option;
                              html! {
                                  <option value={option.clone()} selected={selected}>{ option }</option>
                              }
                          })
                      }
                  </select>
              </label>
          </div>
          <label class="field">
              <span>{ "Tags" }</span>
              <input
                  type="text"
                  placeholder="work, errands"
                  value={draft.tags.clone()}
                  oninput={Callback::from(move |e: web_sys::InputEvent| {
                      let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                      on_tags.emit(input.value());
                  })}
              />
          </label>
          if let Some(message) = (*error).clone() {
              <div class="form-error" role="alert">{ message }</div>
          }
          <div class="footer">
              <button class="btn primary" type="submit" disabled={busy}>
                  { submit_label }
              </button>
              <button class="btn" type="button" disabled={busy} onclick={on_cancel}>
                  { "Cancel" }
              </button>
          </div>
      </form>
  }
}
