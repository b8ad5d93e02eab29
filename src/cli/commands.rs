use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tt",
    about = concat!(
        "tasktray v",
        env!("CARGO_PKG_VERSION"),
        " - tasks by group, due dates at a glance"
    ),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Task file to use (default: tasks.json, or [store] path from the config)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,

    /// Config file (default: ./tasktray.toml if present)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks grouped by category
    List(ListArgs),
    /// List groups and their task counts
    Groups,
    /// Add a task to a group
    Add(AddArgs),
    /// Remove every task with the given name from a group
    Rm(RmArgs),
    /// Show all tasks ordered by due date
    Due,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only list this group
    pub group: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Group to file the task under
    pub group: String,
    /// Task name
    pub name: String,
    /// Task description
    pub description: String,
    /// Due date: "YYYY-MM-DD HH:MM:SS" or "YYYY-MM-DD"
    #[arg(long, conflicts_with = "no_due", required_unless_present = "no_due")]
    pub due: Option<String>,
    /// The task has no due date
    #[arg(long)]
    pub no_due: bool,
}

#[derive(Args)]
pub struct RmArgs {
    /// Group the task is in
    pub group: String,
    /// Task name
    pub name: String,
}
