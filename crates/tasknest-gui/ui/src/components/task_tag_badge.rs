use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskTagBadgeProps {
  pub tag: String
}

#[function_component(TaskTagBadge)]
pub fn task_tag_badge(
  props: &TaskTagBadgeProps
) -> Html {
  html! {
      <span class="badge tag-badge">{ &props.tag }</span>
  }
}
