use yew::{
  Html,
  function_component,
  html
};
use yew_router::prelude::Link;

use crate::app::Route;

struct Feature {
  icon:  &'static str,
  title: &'static str,
  blurb: &'static str
}

const FEATURES: [Feature; 3] = [
  Feature {
    icon:  "🎯",
    title: "Set Priorities",
    blurb: "High, medium, or low: organize \
            tasks by importance and never \
            miss what matters most."
  },
  Feature {
    icon:  "🏷️",
    title: "Tag & Organize",
    blurb: "Use tags to categorize tasks \
            such as work, personal or \
            urgent, or create your own."
  },
  Feature {
    icon:  "📅",
    title: "Track Deadlines",
    blurb: "Set due dates and recurring \
            tasks with automatic overdue \
            detection to stay on schedule."
  }
];

const HIGHLIGHTS: [(&str, &str); 4] = [
  ("✅", "Quick Toggle"),
  ("🔍", "Smart Search"),
  ("🔄", "Recurring Tasks"),
  ("📱", "Mobile Ready")
];

#[function_component(LandingPage)]
pub fn landing_page() -> Html {
  html! {
      <section class="landing">
          <div class="hero">
              <h1>{ "Todo App" }</h1>
              <p class="tagline">{ "Your Personal Productivity Hub" }</p>
              <p class="lede">
                  { "Organize tasks, set priorities, track deadlines, and achieve more with a focused task manager." }
              </p>
              <div class="cta-row">
                  <Link<Route> classes="btn cta primary" to={Route::Tasks}>{ "Get Started Free" }</Link<Route>>
              </div>
          </div>
          <div class="feature-grid">
              {
                  for FEATURES.iter().map(|feature| html! {
                      <div class="feature-card">
                          <div class="feature-icon">{ feature.icon }</div>
                          <h3>{ feature.title }</h3>
                          <p>{ feature.blurb }</p>
                      </div>
                  })
              }
          </div>
          <div class="highlight-grid">
              {
                  for HIGHLIGHTS.iter().map(|(icon, label)| html! {
                      <div class="highlight">
                          <div class="feature-icon">{ *icon }</div>
                          <p>{ *label }</p>
                      </div>
                  })
              }
          </div>
      </section>
  }
}
