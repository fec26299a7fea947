//! Formatting and input-parsing helpers for the command-line front end.

use chrono::{NaiveDate, TimeDelta};

use crate::fields::*;
use crate::task::Task;
use crate::view::Stats;

/// Parse human-readable due date input.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return today.succ_opt(),
        "yesterday" => return today.pred_opt(),
        _ => {}
    }

    // Offsets out of chrono's range count as unrecognised input.
    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return TimeDelta::try_days(days).and_then(|d| today.checked_add_signed(d));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return TimeDelta::try_weeks(weeks).and_then(|w| today.checked_add_signed(w));
            }
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let delta = (d - today).num_days();
            if delta == 0 {
                "today".into()
            } else if delta == 1 {
                "tomorrow".into()
            } else if delta > 1 {
                format!("in {}d", delta)
            } else {
                format!("{}d late", -delta)
            }
        }
    }
}

/// Format a priority level for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Two-character marker column: completion then star.
pub fn format_flags(t: &Task) -> String {
    format!(
        "{}{}",
        if t.completed { 'x' } else { ' ' },
        if t.starred { '*' } else { ' ' }
    )
}

/// Render tasks as a table, one row per task.
pub fn render_table(tasks: &[&Task], today: NaiveDate) -> String {
    let mut out = format!(
        "{:<6} {:<2} {:<7} {:<12} {:<12} {}\n",
        "ID", "", "Pri", "Due", "Category", "Text"
    );
    for t in tasks {
        let mut due = format_due_relative(t.due_date, today);
        if t.is_overdue(today) {
            due.push('!');
        }
        let category = t.category.as_ref().map(|c| c.label()).unwrap_or("-");
        out.push_str(&format!(
            "{:<6} {:<2} {:<7} {:<12} {:<12} {}\n",
            t.id,
            format_flags(t),
            format_priority(t.priority),
            due,
            truncate(category, 12),
            t.text
        ));
    }
    out
}

/// Render one task in full.
pub fn render_task(t: &Task, today: NaiveDate) -> String {
    let due = match t.due_date {
        Some(d) if t.is_overdue(today) => format!("{d} ({}, overdue)", format_due_relative(Some(d), today)),
        Some(d) => format!("{d} ({})", format_due_relative(Some(d), today)),
        None => "-".into(),
    };
    [
        format!("ID:           {}", t.id),
        format!("Text:         {}", t.text),
        format!("Priority:     {}", format_priority(t.priority)),
        format!("Category:     {}", t.category.as_ref().map(|c| c.label()).unwrap_or("-")),
        format!("Due:          {due}"),
        format!("Completed:    {}", if t.completed { "yes" } else { "no" }),
        format!("Starred:      {}", if t.starred { "yes" } else { "no" }),
        format!("Created UTC:  {}", t.created_at.to_rfc3339()),
        format!("Description:\n{}", t.description.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

/// Render aggregate statistics with per-filter counts.
pub fn render_stats(s: &Stats) -> String {
    let mut out = String::new();
    for (label, filter) in [
        ("Total", StatusFilter::All),
        ("Active", StatusFilter::Active),
        ("Completed", StatusFilter::Completed),
        ("Starred", StatusFilter::Starred),
    ] {
        out.push_str(&format!("{:<11} {}\n", format!("{label}:"), s.count_for(filter)));
    }
    out.push_str(&format!("{:<11} {}%", "Progress:", s.completion_rate));
    out
}

/// Message shown when the visible list is empty.
pub fn empty_message(filter: StatusFilter, search: &str) -> String {
    if !search.is_empty() {
        return format!("No tasks match \"{search}\".");
    }
    match filter {
        StatusFilter::All => "No tasks yet. Add one with `taskflow add <text>`.".into(),
        StatusFilter::Active => "No active tasks. Everything is done.".into(),
        StatusFilter::Completed => "No completed tasks yet.".into(),
        StatusFilter::Starred => "No starred tasks.".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskId;
    use chrono::{TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_due_inputs() {
        let today = day(2024, 2, 28);
        assert_eq!(parse_due_input("today", today), Some(today));
        assert_eq!(parse_due_input(" Tomorrow ", today), Some(day(2024, 2, 29)));
        assert_eq!(parse_due_input("yesterday", today), Some(day(2024, 2, 27)));
        assert_eq!(parse_due_input("in 3d", today), Some(day(2024, 3, 2)));
        assert_eq!(parse_due_input("in 2w", today), Some(day(2024, 3, 13)));
        assert_eq!(parse_due_input("2024-12-31", today), Some(day(2024, 12, 31)));
        assert_eq!(parse_due_input("someday", today), None);
    }

    #[test]
    fn out_of_range_offsets_are_unrecognised() {
        let today = day(2024, 2, 28);
        assert_eq!(parse_due_input("in 999999999999d", today), None);
        assert_eq!(parse_due_input("in 999999999999w", today), None);
        assert_eq!(parse_due_input("in 100000000d", today), None);
        assert_eq!(parse_due_input("in -999999999999d", today), None);
        assert_eq!(parse_due_input("tomorrow", NaiveDate::MAX), None);
        assert_eq!(parse_due_input("yesterday", NaiveDate::MIN), None);
    }

    #[test]
    fn formats_relative_due() {
        let today = day(2024, 5, 10);
        assert_eq!(format_due_relative(None, today), "-");
        assert_eq!(format_due_relative(Some(today), today), "today");
        assert_eq!(format_due_relative(Some(day(2024, 5, 11)), today), "tomorrow");
        assert_eq!(format_due_relative(Some(day(2024, 5, 15)), today), "in 5d");
        assert_eq!(format_due_relative(Some(day(2024, 5, 8)), today), "2d late");
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate("short", 12), "short");
        assert_eq!(truncate("Apprentissage", 6), "Appre…");
    }

    #[test]
    fn table_marks_flags_and_overdue() {
        let t = Task {
            id: TaskId::new(4),
            text: "Pay rent".into(),
            description: None,
            priority: Priority::High,
            category: Some(Category::Finance),
            due_date: Some(day(2024, 5, 1)),
            completed: false,
            starred: true,
            created_at: Utc.with_ymd_and_hms(2024, 4, 20, 8, 0, 0).unwrap(),
        };
        let out = render_table(&[&t], day(2024, 5, 3));
        let row = out.lines().nth(1).unwrap();
        assert!(row.starts_with("4 "));
        assert!(row.contains(" *"));
        assert!(row.contains("2d late!"));
        assert!(row.contains("Finance"));
        assert!(row.ends_with("Pay rent"));

        let detail = render_task(&t, day(2024, 5, 3));
        assert!(detail.contains("overdue"));
        assert!(detail.contains("Starred:      yes"));
    }

    #[test]
    fn stats_block_lists_counts_and_progress() {
        let s = Stats { total: 4, completed: 1, active: 3, starred: 2, completion_rate: 25 };
        let out = render_stats(&s);
        assert_eq!(out.lines().next(), Some("Total:      4"));
        assert!(out.contains("Active:     3"));
        assert!(out.contains("Starred:    2"));
        assert!(out.ends_with("Progress:   25%"));
    }

    #[test]
    fn empty_message_prefers_search() {
        assert!(empty_message(StatusFilter::Starred, "milk").contains("milk"));
        assert_eq!(empty_message(StatusFilter::Starred, ""), "No starred tasks.");
    }
}
