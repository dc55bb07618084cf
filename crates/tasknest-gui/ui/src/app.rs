use yew::{
  Html,
  function_component,
  html
};
use yew_router::prelude::{
  BrowserRouter,
  Link,
  Routable,
  Switch
};

use crate::pages::{
  LandingPage,
  NotFoundPage,
  TasksPage
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Routable,
)]
pub enum Route {
  #[at("/")]
  Landing,
  #[at("/tasks")]
  Tasks,
  #[not_found]
  #[at("/404")]
  NotFound
}

fn switch(route: Route) -> Html {
  tracing::debug!(?route, "routing");
  match route {
    | Route::Landing => {
      html! { <LandingPage /> }
    }
    | Route::Tasks => {
      html! { <TasksPage /> }
    }
    | Route::NotFound => {
      html! { <NotFoundPage /> }
    }
  }
}

#[function_component(App)]
pub fn app() -> Html {
  html! {
      <BrowserRouter>
          <nav class="topbar">
              <Link<Route> classes="brand" to={Route::Landing}>{ "TaskNest" }</Link<Route>>
              <Link<Route> classes="nav-link" to={Route::Tasks}>{ "My Tasks" }</Link<Route>>
          </nav>
          <main class="shell">
              <Switch<Route> render={switch} />
          </main>
      </BrowserRouter>
  }
}
