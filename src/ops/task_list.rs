use crate::io::store_io::{StoreError, TaskStore};
use crate::model::store::Store;
use crate::model::task::{Task, TaskDraft, ValidationError};

/// One group's column in the task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub name: String,
    pub tasks: Vec<Task>,
}

/// The currently selected task.
///
/// Positions index into `TaskListView::groups()`. The names identify the
/// task on disk and are what a delete sends to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub group: usize,
    pub task: usize,
    pub group_name: String,
    pub taskname: String,
}

/// Error from a view command
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Grouped, selectable projection of the task file.
///
/// The model is rebuilt from a full load after every mutation; nothing is
/// patched in place. A failed store call leaves the model as it was.
#[derive(Debug)]
pub struct TaskListView {
    store: TaskStore,
    groups: Vec<GroupView>,
    selection: Option<Selection>,
}

impl TaskListView {
    /// Load the task file and build the initial model.
    pub fn open(store: TaskStore) -> Result<Self, StoreError> {
        let loaded = store.load()?;
        let mut view = TaskListView::empty(store);
        view.rebuild(&loaded);
        Ok(view)
    }

    /// A view with no tasks, for when the initial load failed.
    pub fn empty(store: TaskStore) -> Self {
        TaskListView {
            store,
            groups: Vec::new(),
            selection: None,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn groups(&self) -> &[GroupView] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.groups.iter().map(|g| g.tasks.len()).sum()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let sel = self.selection.as_ref()?;
        self.groups.get(sel.group)?.tasks.get(sel.task)
    }

    /// Select the task at `(group, task)`. Returns false if out of range.
    pub fn select(&mut self, group: usize, task: usize) -> bool {
        let Some(g) = self.groups.get(group) else {
            return false;
        };
        let Some(t) = g.tasks.get(task) else {
            return false;
        };
        self.selection = Some(Selection {
            group,
            task,
            group_name: g.name.clone(),
            taskname: t.taskname.clone(),
        });
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Move down within the current group; selects the first task when
    /// nothing is selected.
    pub fn select_next(&mut self) {
        match self.selection.as_ref().map(|s| (s.group, s.task)) {
            None => {
                self.select(0, 0);
            }
            Some((g, t)) => {
                let last = self.groups[g].tasks.len().saturating_sub(1);
                self.select(g, (t + 1).min(last));
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.selection.as_ref().map(|s| (s.group, s.task)) {
            None => {
                self.select(0, 0);
            }
            Some((g, t)) => {
                self.select(g, t.saturating_sub(1));
            }
        }
    }

    /// Move to the next group, keeping the row where possible.
    pub fn select_next_group(&mut self) {
        match self.selection.as_ref().map(|s| (s.group, s.task)) {
            None => {
                self.select(0, 0);
            }
            Some((g, t)) => {
                let target = (g + 1).min(self.groups.len().saturating_sub(1));
                self.select_clamped(target, t);
            }
        }
    }

    pub fn select_prev_group(&mut self) {
        match self.selection.as_ref().map(|s| (s.group, s.task)) {
            None => {
                self.select(0, 0);
            }
            Some((g, t)) => {
                self.select_clamped(g.saturating_sub(1), t);
            }
        }
    }

    fn select_clamped(&mut self, group: usize, task: usize) {
        if let Some(g) = self.groups.get(group) {
            let last = g.tasks.len().saturating_sub(1);
            self.select(group, task.min(last));
        }
    }

    /// Reload after a change made outside this view.
    ///
    /// The selection survives if its task still exists.
    pub fn refresh(&mut self) -> Result<(), StoreError> {
        let loaded = self.store.load()?;
        let previous = self.selection.take();
        self.rebuild(&loaded);
        if let Some(prev) = previous {
            self.revalidate(&prev);
        }
        Ok(())
    }

    /// Validate form input and add the task. Returns the stored task.
    ///
    /// Invalid input never reaches the store.
    pub fn submit_task(&mut self, draft: &TaskDraft) -> Result<Task, ViewError> {
        let task = draft.validate()?;
        let updated = self.store.add(task.clone())?;
        self.selection = None;
        self.rebuild(&updated);
        Ok(task)
    }

    /// Delete every task sharing the selected task's name in its group.
    ///
    /// Returns `Ok(false)` without touching the store if nothing is selected.
    pub fn request_delete(&mut self) -> Result<bool, StoreError> {
        let Some(sel) = self.selection.clone() else {
            return Ok(false);
        };
        let updated = self.store.remove(&sel.group_name, &sel.taskname)?;
        self.selection = None;
        self.rebuild(&updated);
        Ok(true)
    }

    fn rebuild(&mut self, store: &Store) {
        self.groups = store
            .groups()
            .map(|(name, tasks)| GroupView {
                name: name.to_string(),
                tasks: tasks.to_vec(),
            })
            .collect();
    }

    fn revalidate(&mut self, prev: &Selection) {
        let Some(group) = self.groups.iter().position(|g| g.name == prev.group_name) else {
            return;
        };
        let tasks = &self.groups[group].tasks;
        let same_spot = tasks
            .get(prev.task)
            .is_some_and(|t| t.taskname == prev.taskname);
        let task = if same_spot {
            Some(prev.task)
        } else {
            tasks.iter().position(|t| t.taskname == prev.taskname)
        };
        if let Some(task) = task {
            self.select(group, task);
        }
    }
}
