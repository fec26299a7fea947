//! Derived view over the task collection.
//!
//! Everything here is a pure function of the collection and the current
//! [`Criteria`]: search narrows first, the status filter narrows further, and
//! the sort only reorders. Sorting is stable, so records that tie on the sort
//! key keep the order produced by the previous stage.

use std::cmp::Ordering;

use serde::Serialize;

use crate::fields::*;
use crate::task::Task;

/// The ephemeral search/filter/sort tuple driving the visible list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub search: String,
    pub filter: StatusFilter,
    pub sort: SortKey,
}

impl Criteria {
    pub fn new(filter: StatusFilter, sort: SortKey) -> Self {
        Criteria { search: String::new(), filter, sort }
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = query.into();
        self
    }
}

impl StatusFilter {
    /// Whether `task` passes this filter.
    pub fn admits(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
            StatusFilter::Starred => task.starred,
        }
    }
}

/// Aggregate counts over the whole collection, independent of any criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub starred: usize,
    /// Percentage of completed tasks, rounded half up; 0 for an empty collection.
    pub completion_rate: u32,
}

impl Stats {
    /// Number of tasks a given status filter would show with no search applied.
    pub fn count_for(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.total,
            StatusFilter::Active => self.active,
            StatusFilter::Completed => self.completed,
            StatusFilter::Starred => self.starred,
        }
    }
}

/// Compute the ordered list to display for `criteria`.
pub fn visible_tasks<'a>(tasks: &'a [Task], criteria: &Criteria) -> Vec<&'a Task> {
    let needle = criteria.search.to_lowercase();
    let mut out: Vec<&Task> = tasks
        .iter()
        .filter(|t| needle.is_empty() || t.matches_lowered(&needle))
        .filter(|t| criteria.filter.admits(t))
        .collect();
    sort_tasks(&mut out, criteria.sort);
    out
}

/// Stable in-place sort by `key`.
pub fn sort_tasks(tasks: &mut [&Task], key: SortKey) {
    match key {
        SortKey::Date => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Priority => tasks.sort_by_key(|t| t.priority.rank()),
        SortKey::Alphabetical => tasks.sort_by(|a, b| locale_cmp(&a.text, &b.text)),
        SortKey::Starred => tasks.sort_by_key(|t| !t.starred),
    }
}

/// Compute aggregate statistics over the unfiltered collection.
pub fn stats(tasks: &[Task]) -> Stats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let starred = tasks.iter().filter(|t| t.starred).count();
    let completion_rate = if total > 0 {
        // round(completed / total * 100), half up, in integers
        ((completed as u64 * 200 + total as u64) / (total as u64 * 2)) as u32
    } else {
        0
    };
    Stats { total, completed, active: total - completed, starred, completion_rate }
}

/// Human-oriented string ordering.
///
/// Compares letters ignoring accents and case first, then accents, then case
/// (lowercase before uppercase), and finally by code point so distinct
/// strings never compare equal.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let lower = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    let (la, lb) = (lower(a), lower(b));
    la.iter()
        .map(|&c| fold_accent(c))
        .cmp(lb.iter().map(|&c| fold_accent(c)))
        .then_with(|| la.cmp(&lb))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Map common accented Latin letters onto their base letter.
fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}
