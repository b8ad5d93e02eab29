use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format of `setdate` and `duedate` timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format accepted for a date-only due date in the add-task form
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sentinel `duedate` value for a task without a due date
pub const NO_DUE_DATE: &str = "N/A";

/// A single to-do item, stored verbatim in the task file.
///
/// Field names match the on-disk JSON keys. Timestamps are kept as the
/// strings that were written so a load/save cycle never rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Name of the task; identifies it within its group
    pub taskname: String,
    pub description: String,
    /// Group (category) the task is filed under
    pub group: String,
    /// When the task was created, `YYYY-MM-DD HH:MM:SS`
    pub setdate: String,
    /// `YYYY-MM-DD HH:MM:SS`, or `N/A`
    pub duedate: String,
}

/// Parsed form of a task's `duedate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DueDate {
    At(NaiveDateTime),
    Undated,
}

impl Task {
    /// Parse the due date. Returns `None` if it is neither a timestamp nor `N/A`.
    pub fn due(&self) -> Option<DueDate> {
        if self.duedate == NO_DUE_DATE {
            return Some(DueDate::Undated);
        }
        NaiveDateTime::parse_from_str(&self.duedate, TIMESTAMP_FORMAT)
            .ok()
            .map(DueDate::At)
    }

    pub fn has_due_date(&self) -> bool {
        self.duedate != NO_DUE_DATE
    }
}

/// A field of the add-task form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    TaskName,
    Description,
    Group,
    DueDate,
}

impl DraftField {
    pub const ALL: [DraftField; 4] = [
        DraftField::TaskName,
        DraftField::Description,
        DraftField::Group,
        DraftField::DueDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DraftField::TaskName => "Task Name",
            DraftField::Description => "Description",
            DraftField::Group => "Group",
            DraftField::DueDate => "Due Date",
        }
    }
}

/// Rejected task input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("please fill all fields (missing: {})", labels(.0))]
    MissingFields(Vec<DraftField>),
    #[error("due date '{0}' is not YYYY-MM-DD or YYYY-MM-DD HH:MM:SS")]
    BadDueDate(String),
}

fn labels(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Unvalidated add-task input, as typed into the form or passed on the CLI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub taskname: String,
    pub description: String,
    pub group: String,
    pub duedate: String,
    /// When set, `duedate` is ignored and the task is stored as `N/A`
    pub no_due_date: bool,
}

impl TaskDraft {
    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::TaskName => &self.taskname,
            DraftField::Description => &self.description,
            DraftField::Group => &self.group,
            DraftField::DueDate => &self.duedate,
        }
    }

    pub fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::TaskName => &mut self.taskname,
            DraftField::Description => &mut self.description,
            DraftField::Group => &mut self.group,
            DraftField::DueDate => &mut self.duedate,
        }
    }

    /// Validate and build a task stamped with the current local time.
    pub fn validate(&self) -> Result<Task, ValidationError> {
        self.validate_at(Local::now().naive_local())
    }

    /// Validate and build a task whose `setdate` is `now`.
    ///
    /// All empty fields are reported together. A due date is not required
    /// when `no_due_date` is set.
    pub fn validate_at(&self, now: NaiveDateTime) -> Result<Task, ValidationError> {
        let missing: Vec<DraftField> = DraftField::ALL
            .into_iter()
            .filter(|&f| !(f == DraftField::DueDate && self.no_due_date))
            .filter(|&f| self.field(f).trim().is_empty())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let duedate = if self.no_due_date {
            NO_DUE_DATE.to_string()
        } else {
            normalize_due_date(self.duedate.trim())?
        };

        Ok(Task {
            taskname: self.taskname.trim().to_string(),
            description: self.description.trim().to_string(),
            group: self.group.trim().to_string(),
            setdate: now.format(TIMESTAMP_FORMAT).to_string(),
            duedate,
        })
    }
}

/// Accept a full timestamp or a bare date (midnight).
fn normalize_due_date(text: &str) -> Result<String, ValidationError> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT) {
        return Ok(ts.format(TIMESTAMP_FORMAT).to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT)
        && let Some(ts) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(ts.format(TIMESTAMP_FORMAT).to_string());
    }
    Err(ValidationError::BadDueDate(text.to_string()))
}
