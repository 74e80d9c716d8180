//! Tasks and the per-account task manager.
//!
//! A [`TaskManager`] keeps tasks in insertion order. Titles are the lookup key
//! but are not required to be unique: every lookup acts on the first task
//! whose title matches exactly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::datetime;
use crate::error::{Error, Result};

/// Task priority vocabulary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Canonical spelling, as stored on disk.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidPriority(trimmed.to_string()))
    }
}

/// Canonicalize a user-supplied priority (`"high"` -> `"High"`).
pub fn normalize_priority(priority: &str) -> Result<String> {
    Ok(priority.parse::<Priority>()?.as_str().to_string())
}

/// A single task.
///
/// `priority` and `due_date` hold the stored text. Values created through
/// [`TaskManager`] are always canonical; values read back from disk are kept
/// verbatim even if they no longer validate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub due_date: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn status_label(&self) -> &'static str {
        if self.completed {
            "Completed"
        } else {
            "Pending"
        }
    }
}

/// Input for [`TaskManager::create`].
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub due_date: String,
}

/// Replacement values for [`TaskManager::edit`]. `None` and empty strings
/// leave the field unchanged. Whitespace-only text also counts as empty for
/// every field except the description.
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

impl TaskEdit {
    pub fn is_empty(&self) -> bool {
        supplied(&self.title).is_none()
            && supplied_text(&self.description).is_none()
            && supplied(&self.priority).is_none()
            && supplied(&self.due_date).is_none()
    }
}

/// Ordered task list owned by one account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskManager {
    tasks: Vec<Task>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap tasks loaded from storage without re-validating them.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Validate and append a task. Duplicate titles are allowed.
    pub fn create(&mut self, new_task: NewTask) -> Result<&Task> {
        let title = new_task.title.trim();
        if title.is_empty() {
            return Err(Error::InvalidArgument(
                "task title cannot be empty".to_string(),
            ));
        }
        single_line(title, "title")?;
        single_line(&new_task.description, "description")?;
        let priority = normalize_priority(&new_task.priority)?;
        let due_date = canonical_due_date(&new_task.due_date)?;

        self.tasks.push(Task {
            title: title.to_string(),
            description: new_task.description,
            priority,
            due_date,
            completed: false,
        });
        let index = self.tasks.len() - 1;
        Ok(&self.tasks[index])
    }

    /// First task whose title matches exactly.
    pub fn find(&self, title: &str) -> Result<&Task> {
        self.position(title).map(|index| &self.tasks[index])
    }

    /// Apply an edit to the first task titled `title`.
    ///
    /// Every supplied replacement is validated before anything is written, so
    /// a rejected edit leaves the task exactly as it was.
    pub fn edit(&mut self, title: &str, edit: TaskEdit) -> Result<&Task> {
        let index = self.position(title)?;

        let new_title = supplied(&edit.title).map(|value| value.trim().to_string());
        let new_description = supplied_text(&edit.description).map(str::to_string);
        if let Some(value) = &new_title {
            single_line(value, "title")?;
        }
        if let Some(value) = &new_description {
            single_line(value, "description")?;
        }
        let new_priority = supplied(&edit.priority).map(normalize_priority).transpose()?;
        let new_due_date = supplied(&edit.due_date)
            .map(canonical_due_date)
            .transpose()?;

        let task = &mut self.tasks[index];
        if let Some(value) = new_title {
            task.title = value;
        }
        if let Some(value) = new_description {
            task.description = value;
        }
        if let Some(value) = new_priority {
            task.priority = value;
        }
        if let Some(value) = new_due_date {
            task.due_date = value;
        }
        Ok(&self.tasks[index])
    }

    /// Remove and return the first task titled `title`.
    pub fn delete(&mut self, title: &str) -> Result<Task> {
        let index = self.position(title)?;
        Ok(self.tasks.remove(index))
    }

    /// Mark the first task titled `title` as completed. Idempotent.
    pub fn mark_complete(&mut self, title: &str) -> Result<&Task> {
        let index = self.position(title)?;
        self.tasks[index].completed = true;
        Ok(&self.tasks[index])
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn position(&self, title: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|task| task.title == title)
            .ok_or_else(|| Error::TaskNotFound(title.to_string()))
    }
}

fn supplied(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .filter(|value| !value.trim().is_empty())
}

/// Like [`supplied`], but keeps whitespace-only text.
fn supplied_text(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// Task files hold one task per line.
fn single_line(value: &str, field: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(Error::InvalidArgument(format!(
            "task {field} cannot contain line breaks"
        )));
    }
    Ok(())
}

fn canonical_due_date(input: &str) -> Result<String> {
    datetime::parse(input).map(|instant| datetime::format(&instant))
}
