use tasknest_shared::TaskPriority;
use yew::{
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct PriorityBadgeProps {
  pub priority: TaskPriority
}

#[function_component(PriorityBadge)]
pub fn priority_badge(
  props: &PriorityBadgeProps
) -> Html {
  html! {
      <span class={classes!("badge", "priority-badge", props.priority.badge_class())}>
          { props.priority.label() }
      </span>
  }
}
