//! Command implementations for the CLI interface.
//!
//! Each handler forwards one user intent to the [`Database`] and prints the
//! result. Failures are reported on stderr and end the process with status 1.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use chrono::{Local, NaiveDate};

use crate::db::{Database, Mutation};
use crate::error::StoreError;
use crate::fields::*;
use crate::format::*;
use crate::storage::KvStore;
use crate::task::{TaskDraft, TaskId, TaskPatch};
use crate::view::Criteria;

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short text for the task.
        text: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Category: one of the suggested ones (see `categories`) or any text.
        #[arg(long)]
        category: Option<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "in Nd" or "in Nw".
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks with optional search, filter and sort.
    List {
        /// Status filter.
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        filter: StatusFilter,
        /// Case-insensitive text to look for in text or description.
        #[arg(long, short)]
        search: Option<String>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Date)]
        sort: SortKey,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task.
    View {
        id: TaskId,
    },

    /// Edit fields on a task.
    Edit {
        id: TaskId,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, conflicts_with = "clear_desc")]
        desc: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, conflicts_with = "clear_category")]
        category: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the description.
        #[arg(long)]
        clear_desc: bool,
        /// Remove the category.
        #[arg(long)]
        clear_category: bool,
        /// Remove the due date.
        #[arg(long)]
        clear_due: bool,
    },

    /// Toggle a task between active and completed.
    Done {
        id: TaskId,
    },

    /// Toggle the star on a task.
    Star {
        id: TaskId,
    },

    /// Delete a task. Deleting a task that does not exist is not an error.
    Delete {
        id: TaskId,
    },

    /// Show totals and completion progress.
    Stats,

    /// List suggested categories.
    Categories,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(1);
}

fn saved_suffix<T>(m: &Mutation<T>) -> &'static str {
    if m.is_persisted() {
        ""
    } else {
        " (not saved)"
    }
}

/// Parse due-date input or exit with a usage hint.
pub fn parse_due_or_fail(s: &str) -> NaiveDate {
    parse_due_input(s, today()).unwrap_or_else(|| {
        fail("unrecognised due date. Use YYYY-MM-DD, 'today', 'tomorrow', 'in Nd' or 'in Nw'.")
    })
}

/// Build the draft for `add` from command-line values.
pub fn build_draft(
    text: String,
    desc: Option<String>,
    priority: Priority,
    category: Option<String>,
    due: Option<NaiveDate>,
) -> TaskDraft {
    TaskDraft {
        text,
        description: desc,
        priority,
        category: category.as_deref().and_then(Category::parse),
        due_date: due,
    }
}

/// Add a new task to the store.
pub fn cmd_add<S: KvStore>(
    db: &mut Database<S>,
    text: String,
    desc: Option<String>,
    priority: Priority,
    category: Option<String>,
    due: Option<String>,
) {
    let due = due.as_deref().map(parse_due_or_fail);
    match db.create(build_draft(text, desc, priority, category, due)) {
        Ok(m) => println!("Added task {}{}", m.value.id, saved_suffix(&m)),
        Err(e) => fail(e),
    }
}

/// List tasks through the derived view.
pub fn cmd_list<S: KvStore>(
    db: &Database<S>,
    filter: StatusFilter,
    search: Option<String>,
    sort: SortKey,
    limit: Option<usize>,
) {
    let criteria = Criteria::new(filter, sort).search(search.unwrap_or_default());
    let mut visible = db.visible_tasks(&criteria);
    if visible.is_empty() {
        println!("{}", empty_message(filter, &criteria.search));
        return;
    }
    if let Some(n) = limit {
        visible.truncate(n);
    }
    print!("{}", render_table(&visible, today()));
}

/// View detailed information about a specific task.
pub fn cmd_view<S: KvStore>(db: &Database<S>, id: TaskId) {
    let Some(task) = db.get(id) else {
        fail(StoreError::NotFound(id));
    };
    println!("{}", render_task(task, today()));
}

/// Collect `edit` flags into a patch.
pub fn build_patch(
    text: Option<String>,
    desc: Option<String>,
    priority: Option<Priority>,
    category: Option<String>,
    due: Option<NaiveDate>,
    clear_desc: bool,
    clear_category: bool,
    clear_due: bool,
) -> TaskPatch {
    TaskPatch {
        text,
        description: if clear_desc { Some(None) } else { desc.map(Some) },
        priority,
        category: if clear_category {
            Some(None)
        } else {
            category.map(|c| Category::parse(&c))
        },
        due_date: if clear_due { Some(None) } else { due.map(Some) },
        completed: None,
        starred: None,
    }
}

/// Update an existing task's fields.
pub fn cmd_edit<S: KvStore>(db: &mut Database<S>, id: TaskId, patch: TaskPatch) {
    if patch.is_empty() {
        println!("Nothing to change.");
        return;
    }
    match db.update(id, patch) {
        Ok(m) => println!("Updated task {}{}", id, saved_suffix(&m)),
        Err(e) => fail(e),
    }
}

/// Toggle completion on a task.
pub fn cmd_done<S: KvStore>(db: &mut Database<S>, id: TaskId) {
    match db.toggle_completed(id) {
        Ok(m) => {
            let state = if m.value.completed { "completed" } else { "active" };
            println!("Task {} is now {}{}", id, state, saved_suffix(&m));
        }
        Err(e) => fail(e),
    }
}

/// Toggle the star on a task.
pub fn cmd_star<S: KvStore>(db: &mut Database<S>, id: TaskId) {
    match db.toggle_starred(id) {
        Ok(m) => {
            let state = if m.value.starred { "Starred" } else { "Unstarred" };
            println!("{} task {}{}", state, id, saved_suffix(&m));
        }
        Err(e) => fail(e),
    }
}

/// Delete a task.
pub fn cmd_delete<S: KvStore>(db: &mut Database<S>, id: TaskId) {
    let m = db.delete(id);
    if m.value {
        println!("Deleted task {}{}", id, saved_suffix(&m));
    } else {
        println!("No task {}; nothing deleted.", id);
    }
}

/// Show aggregate statistics.
pub fn cmd_stats<S: KvStore>(db: &Database<S>) {
    println!("{}", render_stats(&db.stats()));
}

/// List the suggested categories.
pub fn cmd_categories() {
    for c in Category::SUGGESTED.iter() {
        println!("{c}");
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
