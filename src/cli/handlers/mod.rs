use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, LoadedConfig};
use crate::io::store_io::TaskStore;
use crate::model::task::TaskDraft;
use crate::ops::report::{DueDateReporter, ReportSink};

/// Where a command reads its settings and tasks from
pub struct Context {
    pub config: LoadedConfig,
    pub store_path: PathBuf,
}

impl Context {
    /// Load the config and settle the task file path from the global flags.
    pub fn resolve(
        file: Option<&Path>,
        config: Option<&Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let cwd = std::env::current_dir()?;
        let loaded = config_io::load_config(config, &cwd)?;
        let store_path = loaded.store_path(file);
        Ok(Context {
            config: loaded,
            store_path,
        })
    }

    pub fn store(&self) -> TaskStore {
        TaskStore::new(&self.store_path)
    }

    pub fn reporter(&self) -> DueDateReporter {
        DueDateReporter::new(self.store(), self.config.config.report.undated)
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let ctx = Context::resolve(cli.file.as_deref(), cli.config.as_deref())?;

    match cli.command {
        None => crate::tui::run(&ctx, cli.verbose),
        Some(cmd) => match cmd {
            Commands::List(args) => cmd_list(&ctx, args, json),
            Commands::Groups => cmd_groups(&ctx, json),
            Commands::Add(args) => cmd_add(&ctx, args, json),
            Commands::Rm(args) => cmd_rm(&ctx, args, json),
            Commands::Due => cmd_due(&ctx, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context, args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.store().load()?;
    let only = args.group.as_deref();
    if let Some(group) = only
        && store.group(group).is_none()
    {
        return Err(format!("group not found: {}", group).into());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&groups_to_json(&store, only))?);
    } else {
        for line in format_groups(&store, only) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_groups(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.store().load()?;
    if json {
        let counts: Vec<GroupCountJson> = store
            .groups()
            .map(|(group, tasks)| GroupCountJson {
                group,
                count: tasks.len(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        for (group, tasks) in store.groups() {
            println!("{} ({})", group, tasks.len());
        }
    }
    Ok(())
}

/// Print the due-date report. Also the whole of the `tt-due` binary.
pub fn cmd_due(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut sink: Box<dyn ReportSink> = if json {
        Box::new(JsonSink::new(std::io::stdout()))
    } else {
        Box::new(ConsoleSink::stdout())
    };
    ctx.reporter().deliver(sink.as_mut())?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context, args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let draft = TaskDraft {
        taskname: args.name,
        description: args.description,
        group: args.group,
        duedate: args.due.unwrap_or_default(),
        no_due_date: args.no_due,
    };
    let task = draft.validate()?;
    ctx.store().add(task.clone())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("added '{}' to {}", task.taskname, task.group);
    }
    Ok(())
}

fn cmd_rm(ctx: &Context, args: RmArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (_, removed) = ctx.store().remove_counted(&args.group, &args.name)?;
    if removed == 0 {
        return Err(format!("no task '{}' in group '{}'", args.name, args.group).into());
    }

    if json {
        let out = RemovedJson {
            group: &args.group,
            taskname: &args.name,
            removed,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("removed {} from {}", removed, args.group);
    }
    Ok(())
}
