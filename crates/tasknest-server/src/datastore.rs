use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use tasknest_shared::{TaskCreate, TaskDto, TaskId, TaskPatch, parse_task_instant};
use tempfile::NamedTempFile;
use tracing::{debug, info};

#[derive(Debug)]
pub enum StoreError {
    NotFound(TaskId),
    Invalid(String),
    Persist(anyhow::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "task {id} not found"),
            StoreError::Invalid(reason) => f.write_str(reason),
            StoreError::Persist(err) => write!(f, "failed to persist tasks: {err:#}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Task collection guarded by a mutex, optionally mirrored to a JSON-lines
/// file. Every mutation is applied to a copy and only swapped in once the
/// file write succeeded.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Mutex<Vec<TaskDto>>,
    path: Option<PathBuf>,
}

impl TaskStore {
    pub fn in_memory() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            path: None,
        }
    }

    #[tracing::instrument(skip(path))]
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let tasks = if path.exists() {
            load_jsonl(path)?
        } else {
            Vec::new()
        };

        info!(file = %path.display(), count = tasks.len(), "opened task store");

        Ok(Self {
            tasks: Mutex::new(tasks),
            path: Some(path.to_path_buf()),
        })
    }

    /// Newest first; tasks sharing a timestamp keep reverse insertion order.
    pub fn list(&self) -> Vec<TaskDto> {
        let mut tasks = self.tasks.lock().clone();
        tasks.reverse();
        tasks.sort_by(|a, b| created_key(b).cmp(&created_key(a)));
        tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<TaskDto> {
        self.tasks.lock().iter().find(|task| &task.id == id).cloned()
    }

    #[tracing::instrument(skip(self, input), fields(title_len = input.title.len()))]
    pub fn create(&self, input: TaskCreate, now: DateTime<Utc>) -> Result<TaskDto, StoreError> {
        let task = TaskDto {
            id: TaskId::generate(),
            title: required_title(&input.title)?,
            description: optional_text(input.description),
            priority: input.priority,
            tags: clean_tags(input.tags),
            due_date: checked_due_date(input.due_date)?,
            recurrence: optional_text(input.recurrence),
            completed: false,
            created_at: now.to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        self.mutate(|tasks| {
            tasks.push(task.clone());
            Ok(task.clone())
        })
    }

    #[tracing::instrument(skip(self, patch))]
    pub fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<TaskDto, StoreError> {
        if patch.is_empty() {
            debug!("empty patch, nothing to write");
            return self.get(id).ok_or_else(|| StoreError::NotFound(id.clone()));
        }
        self.mutate(|tasks| {
            let task = find_mut(tasks, id)?;
            apply_patch(task, patch)?;
            Ok(task.clone())
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn toggle_completion(&self, id: &TaskId) -> Result<TaskDto, StoreError> {
        self.mutate(|tasks| {
            let task = find_mut(tasks, id)?;
            task.completed = !task.completed;
            debug!(completed = task.completed, "toggled completion");
            Ok(task.clone())
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn delete(&self, id: &TaskId) -> Result<(), StoreError> {
        self.mutate(|tasks| {
            let before = tasks.len();
            tasks.retain(|task| &task.id != id);
            if tasks.len() == before {
                return Err(StoreError::NotFound(id.clone()));
            }
            Ok(())
        })
    }

    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Vec<TaskDto>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.tasks.lock();
        let mut next = guard.clone();
        let out = change(&mut next)?;

        if let Some(path) = self.path.as_deref() {
            save_jsonl_atomic(path, &next).map_err(StoreError::Persist)?;
        }

        *guard = next;
        Ok(out)
    }
}

fn find_mut<'a>(tasks: &'a mut [TaskDto], id: &TaskId) -> Result<&'a mut TaskDto, StoreError> {
    tasks
        .iter_mut()
        .find(|task| &task.id == id)
        .ok_or_else(|| StoreError::NotFound(id.clone()))
}

fn apply_patch(task: &mut TaskDto, patch: TaskPatch) -> Result<(), StoreError> {
    if let Some(title) = patch.title {
        task.title = required_title(&title)?;
    }
    if let Some(description) = patch.description {
        task.description = optional_text(description);
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(tags) = patch.tags {
        task.tags = clean_tags(tags);
    }
    if let Some(due_date) = patch.due_date {
        task.due_date = checked_due_date(due_date)?;
    }
    if let Some(recurrence) = patch.recurrence {
        task.recurrence = optional_text(recurrence);
    }
    Ok(())
}

fn required_title(raw: &str) -> Result<String, StoreError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(StoreError::Invalid("title must not be empty".to_string()));
    }
    Ok(title.to_string())
}

fn optional_text(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn checked_due_date(raw: Option<String>) -> Result<Option<String>, StoreError> {
    match optional_text(raw) {
        Some(value) if parse_task_instant(&value).is_none() => Err(StoreError::Invalid(
            format!("due_date {value:?} is not an ISO 8601 date"),
        )),
        other => Ok(other),
    }
}

fn created_key(task: &TaskDto) -> Option<DateTime<Utc>> {
    parse_task_instant(&task.created_at)
}

fn load_jsonl(path: &Path) -> anyhow::Result<Vec<TaskDto>> {
    debug!(file = %path.display(), "loading jsonl");
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let task: TaskDto = serde_json::from_str(trimmed)
            .with_context(|| format!("failed parsing {} line {}", path.display(), idx + 1))?;
        out.push(task);
    }

    debug!(count = out.len(), "loaded tasks from jsonl");
    Ok(out)
}

#[tracing::instrument(skip(path, tasks))]
fn save_jsonl_atomic(path: &Path, tasks: &[TaskDto]) -> anyhow::Result<()> {
    debug!(file = %path.display(), count = tasks.len(), "saving jsonl atomically");

    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    for task in tasks {
        let serialized = serde_json::to_string(task)?;
        writeln!(temp, "{serialized}")?;
    }
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tasknest_shared::TaskPriority;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn create_input(title: &str) -> TaskCreate {
        TaskCreate {
            title: title.to_string(),
            description: Some("  ".to_string()),
            priority: Some(TaskPriority::High),
            tags: vec![" work ".to_string(), String::new(), "work".to_string()],
            due_date: Some("2025-01-05".to_string()),
            recurrence: None,
        }
    }

    #[test]
    fn create_normalizes_fields() {
        let store = TaskStore::in_memory();
        let task = store.create(create_input("  Ship it "), now()).expect("create");

        assert_eq!(task.title, "Ship it");
        assert_eq!(task.description, None);
        assert_eq!(task.tags, vec!["work".to_string(), "work".to_string()]);
        assert!(!task.completed);
        assert_eq!(task.created_at, "2025-01-01T09:00:00.000000Z");
        assert_eq!(store.get(&task.id), Some(task));
    }

    #[test]
    fn create_rejects_blank_title_and_bad_due() {
        let store = TaskStore::in_memory();
        assert!(matches!(
            store.create(create_input("   "), now()),
            Err(StoreError::Invalid(_))
        ));

        let mut input = create_input("ok");
        input.due_date = Some("someday".to_string());
        assert!(matches!(store.create(input, now()), Err(StoreError::Invalid(_))));
        assert!(store.list().is_empty());
    }

    #[test]
    fn list_is_newest_first() {
        let store = TaskStore::in_memory();
        let first = store.create(create_input("first"), now()).expect("create");
        let second = store
            .create(create_input("second"), now() + chrono::Duration::hours(1))
            .expect("create");

        let ids: Vec<TaskId> = store.list().into_iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn same_instant_lists_latest_insert_first() {
        let store = TaskStore::in_memory();
        let ids: Vec<TaskId> = ["a", "b", "c"]
            .into_iter()
            .map(|title| store.create(create_input(title), now()).expect("create").id)
            .collect();

        let listed: Vec<TaskId> = store.list().into_iter().map(|task| task.id).collect();
        let expected: Vec<TaskId> = ids.into_iter().rev().collect();
        assert_eq!(listed, expected);
    }

    #[test]
    fn sub_second_creation_order_survives() {
        let store = TaskStore::in_memory();
        let later = store
            .create(create_input("later"), now() + chrono::Duration::milliseconds(250))
            .expect("create");
        let earlier = store.create(create_input("earlier"), now()).expect("create");

        assert_eq!(later.created_at, "2025-01-01T09:00:00.250000Z");
        let ids: Vec<TaskId> = store.list().into_iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![later.id, earlier.id]);
    }

    #[test]
    fn patch_keeps_absent_and_clears_null_fields() {
        let store = TaskStore::in_memory();
        let task = store.create(create_input("title"), now()).expect("create");

        let updated = store
            .update(
                &task.id,
                TaskPatch {
                    due_date: Some(None),
                    recurrence: Some(Some("weekly".to_string())),
                    ..TaskPatch::default()
                },
            )
            .expect("update");

        assert_eq!(updated.title, "title");
        assert_eq!(updated.priority, Some(TaskPriority::High));
        assert_eq!(updated.due_date, None);
        assert_eq!(updated.recurrence.as_deref(), Some("weekly"));
    }

    #[test]
    fn invalid_patch_leaves_task_untouched() {
        let store = TaskStore::in_memory();
        let task = store.create(create_input("title"), now()).expect("create");

        let result = store.update(
            &task.id,
            TaskPatch {
                title: Some(" ".to_string()),
                tags: Some(vec!["dropped".to_string()]),
                ..TaskPatch::default()
            },
        );

        assert!(matches!(result, Err(StoreError::Invalid(_))));
        assert_eq!(store.get(&task.id), Some(task));
    }

    #[test]
    fn toggle_flips_and_restores() {
        let store = TaskStore::in_memory();
        let task = store.create(create_input("title"), now()).expect("create");

        assert!(store.toggle_completion(&task.id).expect("toggle").completed);
        assert!(!store.toggle_completion(&task.id).expect("toggle").completed);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let store = TaskStore::in_memory();
        let id = TaskId::from("missing");

        assert!(matches!(store.delete(&id), Err(StoreError::NotFound(_))));
        assert!(matches!(store.toggle_completion(&id), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update(&id, TaskPatch::default()),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("tasks.data");

        let kept_id = {
            let store = TaskStore::open(&path).expect("open");
            let kept = store.create(create_input("keep"), now()).expect("create");
            let gone = store.create(create_input("gone"), now()).expect("create");
            store.toggle_completion(&kept.id).expect("toggle");
            store.delete(&gone.id).expect("delete");
            kept.id
        };

        let reopened = TaskStore::open(&path).expect("reopen");
        let tasks = reopened.list();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, kept_id);
        assert!(tasks[0].completed);
    }

    #[test]
    fn corrupt_file_reports_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.data");
        fs::write(&path, "\n{not json}\n").expect("write");

        let err = TaskStore::open(&path).expect_err("corrupt");
        assert!(format!("{err:#}").contains("line 2"));
    }
}
