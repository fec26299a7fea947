//! Enumerations and field types for task records and list criteria.
//!
//! This module defines the structured values a task carries (priority, category)
//! and the ephemeral criteria used to derive the visible list (status filter, sort key).

use std::fmt;
use std::hash::{Hash, Hasher};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort rank, most important first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// Task category: one of the suggested labels, or free text.
///
/// Equality and hashing go through [`Category::label`], so `Custom("Work")`
/// and `Work` compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Work,
    Personal,
    Shopping,
    Health,
    Finance,
    Learning,
    Home,
    Other,
    Custom(String),
}

impl Category {
    /// Categories offered to the user when picking one.
    pub const SUGGESTED: [Category; 8] = [
        Category::Work,
        Category::Personal,
        Category::Shopping,
        Category::Health,
        Category::Finance,
        Category::Learning,
        Category::Home,
        Category::Other,
    ];

    /// Parse free text, mapping suggested labels (case-insensitive) onto their variant.
    /// Returns `None` for blank input.
    pub fn parse(s: &str) -> Option<Category> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let suggested = Category::SUGGESTED
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(s))
            .cloned();
        Some(suggested.unwrap_or_else(|| Category::Custom(s.to_string())))
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Finance => "Finance",
            Category::Learning => "Learning",
            Category::Home => "Home",
            Category::Other => "Other",
            Category::Custom(s) => s,
        }
    }

    /// Free text with nothing but whitespace, stored as no category.
    pub fn is_blank(&self) -> bool {
        self.label().trim().is_empty()
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::SUGGESTED
            .iter()
            .find(|c| c.label() == s)
            .cloned()
            .unwrap_or(Category::Custom(s))
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        match c {
            Category::Custom(s) => s,
            other => other.label().to_string(),
        }
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.label() == other.label()
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label().hash(state);
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Completion-status filter applied to the visible list.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
    Starred,
}

/// Available sorting options for the visible list.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Date,
    Priority,
    Alphabetical,
    Starred,
}
