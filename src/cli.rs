use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::cmd::Commands;

/// Local task-list manager.
/// Tasks are stored as JSON under ~/.taskflow or a directory passed via --store.
#[derive(Parser)]
#[command(name = "taskflow", version, about = "Create, star, filter and sort your tasks")]
pub struct Cli {
    /// Directory holding the task store.
    #[arg(long, global = true, env = "TASKFLOW_STORE")]
    pub store: Option<PathBuf>,

    /// Key the collection is stored under.
    #[arg(long, global = true, env = "TASKFLOW_KEY")]
    pub key: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}
