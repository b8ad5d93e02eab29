use std::io::{self, Write};

use serde::Serialize;

use crate::model::store::Store;
use crate::model::task::Task;
use crate::ops::report::ReportSink;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct GroupJson<'a> {
    pub group: &'a str,
    pub tasks: &'a [Task],
}

#[derive(Serialize)]
pub struct GroupCountJson<'a> {
    pub group: &'a str,
    pub count: usize,
}

#[derive(Serialize)]
pub struct RemovedJson<'a> {
    pub group: &'a str,
    pub taskname: &'a str,
    pub removed: usize,
}

pub fn groups_to_json<'a>(store: &'a Store, only: Option<&str>) -> Vec<GroupJson<'a>> {
    store
        .groups()
        .filter(|(name, _)| only.is_none_or(|g| g == *name))
        .map(|(group, tasks)| GroupJson { group, tasks })
        .collect()
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One line of the due-date report
pub fn format_report_line(task: &Task) -> String {
    format!(
        "Task Name: {}, Description: {}, Group: {}, Set Date: {}, Due Date: {}",
        task.taskname, task.description, task.group, task.setdate, task.duedate
    )
}

/// A task as shown in a group listing
pub fn format_task_line(task: &Task) -> String {
    format!("  {} (Due: {}) - {}", task.taskname, task.duedate, task.description)
}

/// Grouped listing: a header per group followed by its tasks
pub fn format_groups(store: &Store, only: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, tasks) in store.groups() {
        if only.is_some_and(|g| g != name) {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("{}:", name));
        lines.extend(tasks.iter().map(format_task_line));
    }
    lines
}

// ---------------------------------------------------------------------------
// Report sinks
// ---------------------------------------------------------------------------

/// Writes one report line per task
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        ConsoleSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        ConsoleSink::new(io::stdout())
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn deliver(&mut self, tasks: &[Task]) -> io::Result<()> {
        for task in tasks {
            writeln!(self.out, "{}", format_report_line(task))?;
        }
        self.out.flush()
    }
}

/// Writes the report as a pretty JSON array of tasks
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        JsonSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn deliver(&mut self, tasks: &[Task]) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, tasks)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
