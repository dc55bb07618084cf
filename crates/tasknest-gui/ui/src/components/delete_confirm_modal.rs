use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct DeleteConfirmModalProps {
  pub task_title:    String,
  pub busy:          bool,
  pub confirm_label: &'static str,
  pub on_confirm:    Callback<()>,
  pub on_cancel:     Callback<()>
}

#[function_component(DeleteConfirmModal)]
pub fn delete_confirm_modal(
  props: &DeleteConfirmModalProps
) -> Html {
  let on_confirm = {
    let on_confirm =
      props.on_confirm.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_confirm.emit(())
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

  html! {
      <div class="modal-backdrop" onclick={on_cancel.clone()}>
          <div class="modal modal-sm delete-modal" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
              <div class="modal-icon">{ "🗑️" }</div>
              <div class="header">{ "Delete Task?" }</div>
              <div class="content">
                  { "Are you sure you want to delete " }
                  <strong>{ format!("\"{}\"", props.task_title) }</strong>
                  { "? This action cannot be undone." }
              </div>
              <div class="footer">
                  <button
                      class="btn danger"
                      type="button"
                      disabled={props.busy}
                      onclick={on_confirm}
                  >
                      { props.confirm_label }
                  </button>
                  <button
                      class="btn"
                      type="button"
                      disabled={props.busy}
                      onclick={on_cancel}
                  >
                      { "Cancel" }
                  </button>
              </div>
          </div>
      </div>
  }
}
