//! Task data structure and related functionality.
//!
//! This module defines the core `Task` record, its opaque identifier, and the
//! draft/patch values the store accepts when creating or editing a task.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::fields::*;

/// Opaque task identifier, unique within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn new(raw: u64) -> Self {
        TaskId(raw)
    }

    pub(crate) fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TaskId)
    }
}

/// A single user-created item with title, optional metadata, and completion/star flags.
///
/// Field names are serialised in camelCase to match the stored layout
/// (`dueDate`, `createdAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "blank_category_as_none", skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "blank_date_as_none", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub starred: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Whether the task is past its due date: not completed and due strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|d| d < today)
    }

    /// Case-insensitive substring match on text or description.
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowered(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

/// The fields a caller supplies when creating a task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub text: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub category: Option<Category>,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn new(text: impl Into<String>) -> Self {
        TaskDraft { text: text.into(), ..Default::default() }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// A partial update. `None` leaves a field untouched; for optional record
/// fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub category: Option<Option<Category>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub completed: Option<bool>,
    pub starred: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    /// Apply the supplied fields to `task`. `id` and `created_at` are never touched.
    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(text) = self.text {
            task.text = text.trim().to_string();
        }
        if let Some(d) = self.description {
            task.description = d.filter(|d| !d.is_empty());
        }
        if let Some(p) = self.priority {
            task.priority = p;
        }
        if let Some(c) = self.category {
            task.category = c.filter(|c| !c.is_blank());
        }
        if let Some(d) = self.due_date {
            task.due_date = d;
        }
        if let Some(c) = self.completed {
            task.completed = c;
        }
        if let Some(s) = self.starred {
            task.starred = s;
        }
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

fn blank_category_as_none<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()).map(Category::from))
}

fn blank_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Task {
        Task {
            id: TaskId::new(7),
            text: "Buy milk".into(),
            description: None,
            priority: Priority::High,
            category: Some(Category::Shopping),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 10),
            completed: false,
            starred: false,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn serialises_with_camel_case_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["priority"], "high");
        assert_eq!(json["category"], "Shopping");
        assert_eq!(json["dueDate"], "2024-03-10");
        assert!(json["createdAt"].as_str().unwrap().starts_with("2024-03-01T09:30:00"));
        assert!(json.get("description").is_none());
    }

    #[test]
    fn loads_records_written_with_blank_optionals() {
        let raw = r#"{
            "id": 1700000000000,
            "text": "Call Bob",
            "description": "",
            "priority": "low",
            "category": "",
            "dueDate": "",
            "completed": true,
            "starred": true,
            "createdAt": "2024-03-02T10:00:00.000Z"
        }"#;
        let t: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(t.id, TaskId::new(1_700_000_000_000));
        assert_eq!(t.description, None);
        assert_eq!(t.category, None);
        assert_eq!(t.due_date, None);
        assert!(t.completed && t.starred);
    }

    #[test]
    fn missing_flags_and_priority_take_defaults() {
        let raw = r#"{"id": 3, "text": "x", "createdAt": "2024-03-02T10:00:00Z"}"#;
        let t: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(t.priority, Priority::Medium);
        assert!(!t.completed);
        assert!(!t.starred);
    }

    #[test]
    fn rejects_malformed_due_date() {
        let raw = r#"{"id": 3, "text": "x", "dueDate": "next week", "createdAt": "2024-03-02T10:00:00Z"}"#;
        assert!(serde_json::from_str::<Task>(raw).is_err());
    }

    #[test]
    fn overdue_uses_calendar_day_boundary() {
        let mut t = sample();
        let due = t.due_date.unwrap();
        assert!(!t.is_overdue(due));
        assert!(t.is_overdue(due.succ_opt().unwrap()));
        t.completed = true;
        assert!(!t.is_overdue(due.succ_opt().unwrap()));
        t.due_date = None;
        t.completed = false;
        assert!(!t.is_overdue(due));
    }

    #[test]
    fn patch_leaves_unsupplied_fields_alone() {
        let mut t = sample();
        let before = t.clone();
        TaskPatch {
            text: Some("  Buy oat milk ".into()),
            category: Some(None),
            ..Default::default()
        }
        .apply(&mut t);
        assert_eq!(t.text, "Buy oat milk");
        assert_eq!(t.category, None);
        assert_eq!(t.id, before.id);
        assert_eq!(t.created_at, before.created_at);
        assert_eq!(t.priority, before.priority);
        assert_eq!(t.due_date, before.due_date);
        assert_eq!(t.completed, before.completed);
    }

    #[test]
    fn patch_normalises_blank_optionals() {
        let mut t = sample();
        TaskPatch {
            description: Some(Some(String::new())),
            category: Some(Some(Category::Custom("   ".into()))),
            ..Default::default()
        }
        .apply(&mut t);
        assert_eq!(t.description, None);
        assert_eq!(t.category, None);
    }

    #[test]
    fn task_id_parses_from_text() {
        assert_eq!(" 42 ".parse::<TaskId>().unwrap(), TaskId::new(42));
        assert!("abc".parse::<TaskId>().is_err());
    }
}
