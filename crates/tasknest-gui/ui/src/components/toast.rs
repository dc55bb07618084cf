use gloo::timers::callback::Timeout;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html,
  use_effect_with
};

use crate::card::ToastKind;

#[derive(Properties, PartialEq)]
pub struct ToastProps {
  pub message:     String,
  pub kind:        ToastKind,
  pub seq:         u64,
  pub on_close:    Callback<()>,
  #[prop_or(3_000)]
  pub duration_ms: u32
}

#[function_component(Toast)]
pub fn toast(
  props: &ToastProps
) -> Html {
  {
    let on_close =
      props.on_close.clone();
    let duration_ms = props.duration_ms;
    use_effect_with(
      (props.seq, props.message.clone()),
      move |_| {
        let timeout = Timeout::new(
          duration_ms,
          move || on_close.emit(())
        );
        move || drop(timeout)
      }
    );
  }

  let on_dismiss = {
    let on_close =
      props.on_close.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_close.emit(())
      }
    )
  };

  let icon = match props.kind {
    | ToastKind::Success => "✓",
    | ToastKind::Error => "!"
  };

  html! {
      <div class={props.kind.class()} role="status">
          <span class="toast-icon">{ icon }</span>
          <span class="toast-message">{ &props.message }</span>
          <button class="toast-close" type="button" aria-label="Dismiss" onclick={on_dismiss}>
              { "×" }
          </button>
      </div>
  }
}
