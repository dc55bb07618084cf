use yew::{
  Html,
  function_component,
  html
};
use yew_router::prelude::Link;

use crate::app::Route;

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
  html! {
      <section class="panel not-found">
          <h1>{ "Page not found" }</h1>
          <p>{ "The page you are looking for does not exist." }</p>
          <Link<Route> classes="btn primary" to={Route::Landing}>{ "Back to home" }</Link<Route>>
      </section>
  }
}
