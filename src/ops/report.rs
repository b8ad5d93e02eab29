use std::io;

use crate::io::store_io::{StoreError, TaskStore};
use crate::model::config::UndatedPolicy;
use crate::model::task::{DueDate, Task};

/// Error type for building or delivering the due-date report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("task '{taskname}' in group '{group}' has malformed due date '{duedate}'")]
    MalformedDueDate {
        group: String,
        taskname: String,
        duedate: String,
    },
    #[error("could not deliver report: {0}")]
    Delivery(#[from] io::Error),
}

/// Receives the ordered report. Console output, JSON, or an OS
/// notification service all plug in here.
pub trait ReportSink {
    fn deliver(&mut self, tasks: &[Task]) -> io::Result<()>;
}

/// Read-only, due-date ordered view over every task in a store
pub struct DueDateReporter {
    store: TaskStore,
    policy: UndatedPolicy,
}

impl DueDateReporter {
    pub fn new(store: TaskStore, policy: UndatedPolicy) -> Self {
        DueDateReporter { store, policy }
    }

    /// Load the store and return all tasks sorted by due date.
    pub fn report(&self) -> Result<Vec<Task>, ReportError> {
        let store = self.store.load()?;
        sort_by_due_date(store.tasks().cloned().collect(), self.policy)
    }

    /// Build the report and hand it to `sink`. Returns the number of tasks.
    pub fn deliver(&self, sink: &mut dyn ReportSink) -> Result<usize, ReportError> {
        let tasks = self.report()?;
        sink.deliver(&tasks)?;
        Ok(tasks.len())
    }
}

/// Sort ascending by due date. Ties keep their incoming order.
///
/// Any due date that is neither a timestamp nor `N/A` fails the whole sort.
pub fn sort_by_due_date(tasks: Vec<Task>, policy: UndatedPolicy) -> Result<Vec<Task>, ReportError> {
    let mut keyed = Vec::with_capacity(tasks.len());
    for task in tasks {
        let Some(due) = task.due() else {
            return Err(ReportError::MalformedDueDate {
                group: task.group,
                taskname: task.taskname,
                duedate: task.duedate,
            });
        };
        if due == DueDate::Undated && policy == UndatedPolicy::Exclude {
            continue;
        }
        keyed.push((due, task));
    }
    // DueDate orders every timestamp before Undated
    keyed.sort_by_key(|(due, _)| *due);
    Ok(keyed.into_iter().map(|(_, task)| task).collect())
}
