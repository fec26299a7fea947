//! The collection store: the single owner of the task list.
//!
//! `Database` holds the authoritative, newest-first collection and is the only
//! way to change it. Every successful mutation is committed in memory first
//! and then saved exactly once through the [`Persistence`] adapter; a failed
//! save is reported back as a warning and never rolls the change back.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{PersistenceError, StoreError, ValidationError};
use crate::storage::{KvStore, Persistence};
use crate::task::{Task, TaskDraft, TaskId, TaskPatch};
use crate::view::{self, Criteria, Stats};

/// Outcome of a successful mutation.
///
/// `warning` is set when the in-memory change was applied but could not be
/// persisted for this revision.
#[derive(Debug)]
#[must_use]
pub struct Mutation<T> {
    pub value: T,
    pub warning: Option<PersistenceError>,
}

impl<T> Mutation<T> {
    pub fn is_persisted(&self) -> bool {
        self.warning.is_none()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// In-memory task collection backed by a key-value store.
#[derive(Debug)]
pub struct Database<S> {
    tasks: Vec<Task>,
    persistence: Persistence<S>,
    next_id: u64,
}

impl<S: KvStore> Database<S> {
    /// Open the store, loading whatever the adapter can recover.
    pub fn open(persistence: Persistence<S>) -> Self {
        let tasks = persistence.load();
        // Past the largest id, or from 1 when the largest id is u64::MAX;
        // `allocate_id` skips ids already in use.
        let next_id = tasks
            .iter()
            .map(|t| t.id.raw())
            .max()
            .map_or(1, |max| max.checked_add(1).unwrap_or(1));
        info!(key = %persistence.key(), count = tasks.len(), "Opened task store");
        Database { tasks, persistence, next_id }
    }

    /// All tasks, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a task by ID.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// The ordered list to display for `criteria`.
    pub fn visible_tasks(&self, criteria: &Criteria) -> Vec<&Task> {
        view::visible_tasks(&self.tasks, criteria)
    }

    /// Aggregate counts over the whole collection.
    pub fn stats(&self) -> Stats {
        view::stats(&self.tasks)
    }

    /// Create a task from `draft` and put it at the front of the collection.
    pub fn create(&mut self, draft: TaskDraft) -> Result<Mutation<Task>, StoreError> {
        let text = draft.text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText.into());
        }
        let task = Task {
            id: self.allocate_id(),
            text: text.to_string(),
            description: draft.description.filter(|d| !d.is_empty()),
            priority: draft.priority,
            category: draft.category.filter(|c| !c.is_blank()),
            due_date: draft.due_date,
            completed: false,
            starred: false,
            created_at: Utc::now(),
        };
        debug!(id = %task.id, "Created task");
        self.tasks.insert(0, task.clone());
        Ok(self.commit(task))
    }

    /// Replace the fields supplied in `patch` on the task with `id`.
    pub fn update(&mut self, id: TaskId, patch: TaskPatch) -> Result<Mutation<Task>, StoreError> {
        if patch.text.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ValidationError::EmptyText.into());
        }
        let idx = self.position(id)?;
        let mut updated = self.tasks[idx].clone();
        patch.apply(&mut updated);
        self.tasks[idx] = updated.clone();
        debug!(%id, "Updated task");
        Ok(self.commit(updated))
    }

    /// Remove the task with `id`. Removing an absent task is a successful no-op;
    /// the returned value says whether anything was removed.
    pub fn delete(&mut self, id: TaskId) -> Mutation<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        debug!(%id, removed, "Deleted task");
        self.commit(removed)
    }

    /// Flip the completed flag of the task with `id`.
    pub fn toggle_completed(&mut self, id: TaskId) -> Result<Mutation<Task>, StoreError> {
        let idx = self.position(id)?;
        let task = &mut self.tasks[idx];
        task.completed = !task.completed;
        let task = task.clone();
        debug!(%id, completed = task.completed, "Toggled completed");
        Ok(self.commit(task))
    }

    /// Flip the starred flag of the task with `id`.
    pub fn toggle_starred(&mut self, id: TaskId) -> Result<Mutation<Task>, StoreError> {
        let idx = self.position(id)?;
        let task = &mut self.tasks[idx];
        task.starred = !task.starred;
        let task = task.clone();
        debug!(%id, starred = task.starred, "Toggled starred");
        Ok(self.commit(task))
    }

    fn position(&self, id: TaskId) -> Result<usize, StoreError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn allocate_id(&mut self) -> TaskId {
        let mut raw = self.next_id;
        while self.tasks.iter().any(|t| t.id.raw() == raw) {
            raw = raw.wrapping_add(1);
        }
        self.next_id = raw.wrapping_add(1);
        TaskId::new(raw)
    }

    /// Save the current collection once and wrap `value` with any save failure.
    fn commit<T>(&mut self, value: T) -> Mutation<T> {
        let warning = match self.persistence.save(&self.tasks) {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "Failed to save tasks; keeping changes in memory");
                Some(e)
            }
        };
        Mutation { value, warning }
    }
}
