const API_BASE_STORAGE_KEY: &str =
  "tasknest.api_base";
const DEFAULT_API_BASE: &str =
  "http://127.0.0.1:8000";

/// Base URL of the task API: a local storage override first, then the value
/// baked in at build time through `TASKNEST_API_BASE`.
pub fn api_base() -> String {
  resolve_api_base(
    load_api_base_override(),
    option_env!("TASKNEST_API_BASE")
  )
}

pub fn resolve_api_base(
  stored: Option<String>,
  compiled: Option<&str>
) -> String {
  let chosen = stored
    .as_deref()
    .map(str::trim)
    .filter(|value| !value.is_empty())
    .or_else(|| {
      compiled
        .map(str::trim)
        .filter(|value| {
          !value.is_empty()
        })
    })
    .unwrap_or(DEFAULT_API_BASE);

  chosen
    .trim_end_matches('/')
    .to_string()
}

fn load_api_base_override()
-> Option<String> {
  web_sys::window()
    .and_then(|window| {
      window
        .local_storage()
        .ok()
        .flatten()
    })
    .and_then(|storage| {
      storage
        .get_item(API_BASE_STORAGE_KEY)
        .ok()
        .flatten()
    })
}
