//! # taskflow - local task-list manager
//!
//! Create, edit, complete, star, search, filter and sort short tasks from the
//! terminal. The whole task list is one JSON document kept in a local store.
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task
//! taskflow add "Buy milk" --priority high --category shopping --due tomorrow
//!
//! # List starred tasks, most important first
//! taskflow list --filter starred --sort priority
//!
//! # Search text and descriptions
//! taskflow list --search milk
//!
//! # Toggle completion / star
//! taskflow done 1
//! taskflow star 1
//!
//! # Progress overview
//! taskflow stats
//! ```
//!
//! ## Layout
//!
//! - [`db::Database`] owns the collection and is the only way to change it.
//!   Every change is saved once through [`storage::Persistence`].
//! - [`view`] derives the visible list and statistics from the collection
//!   without touching it.
//! - [`cmd`] and [`format`] are the command-line front end.
//!
//! Data is stored in `~/.taskflow/todos.json` unless `--store`/`TASKFLOW_STORE`
//! or `--key`/`TASKFLOW_KEY` say otherwise. Unreadable data is set aside and
//! the session starts with an empty list.

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod config;
pub mod db;
pub mod error;
pub mod fields;
pub mod format;
pub mod storage;
pub mod task;
pub mod view;

use cli::Cli;
use cmd::*;
use config::Config;
use db::Database;
use storage::{FileStore, Persistence};

fn main() {
    let cli = Cli::parse();
    let config = Config::resolve(cli.store, cli.key, cli.verbose);
    config::init_logging(&config);

    // Handle commands that don't need the store first
    match cli.command {
        Commands::Completions { shell } => {
            cmd_completions(shell);
            return;
        }
        Commands::Categories => {
            cmd_categories();
            return;
        }
        _ => {}
    }

    let store = FileStore::new(&config.store_dir);
    let mut db = Database::open(Persistence::with_key(store, config.key.clone()));

    match cli.command {
        Commands::Completions { .. } | Commands::Categories => unreachable!("handled above"),

        Commands::Add { text, desc, priority, category, due } =>
            cmd_add(&mut db, text, desc, priority, category, due),

        Commands::List { filter, search, sort, limit } =>
            cmd_list(&db, filter, search, sort, limit),

        Commands::View { id } => cmd_view(&db, id),

        Commands::Edit { id, text, desc, priority, category, due,
                         clear_desc, clear_category, clear_due } => {
            let due = due.as_deref().map(parse_due_or_fail);
            let patch = build_patch(text, desc, priority, category, due,
                                    clear_desc, clear_category, clear_due);
            cmd_edit(&mut db, id, patch)
        },

        Commands::Done { id } => cmd_done(&mut db, id),

        Commands::Star { id } => cmd_star(&mut db, id),

        Commands::Delete { id } => cmd_delete(&mut db, id),

        Commands::Stats => cmd_stats(&db),
    }
}
