use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::task::Task;

/// All persisted tasks, keyed by group name.
///
/// Groups keep their first-insertion order and tasks keep insertion order
/// within a group. A group is present only while it holds at least one task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store {
    groups: IndexMap<String, Vec<Task>>,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of tasks across all groups
    pub fn task_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn group(&self, name: &str) -> Option<&[Task]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Iterate `(group, tasks)` in group order
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[Task])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// All tasks, group by group, in stored order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.groups.values().flatten()
    }

    /// Append a task to its group, creating the group if needed.
    pub fn add(&mut self, task: Task) {
        self.groups.entry(task.group.clone()).or_default().push(task);
    }

    /// Remove every task named `taskname` from `group`.
    ///
    /// Drops the group when it becomes empty. Returns how many tasks were removed.
    pub fn remove(&mut self, group: &str, taskname: &str) -> usize {
        let Some(tasks) = self.groups.get_mut(group) else {
            return 0;
        };
        let before = tasks.len();
        tasks.retain(|t| t.taskname != taskname);
        let removed = before - tasks.len();
        if tasks.is_empty() {
            self.groups.shift_remove(group);
        }
        removed
    }

    /// First task whose `group` field differs from the key it is filed under.
    pub fn misfiled(&self) -> Option<(&str, &Task)> {
        self.groups().find_map(|(name, tasks)| {
            tasks.iter().find(|t| t.group != name).map(|t| (name, t))
        })
    }

    /// Drop groups with no tasks. Returns the names that were dropped.
    pub fn prune_empty_groups(&mut self) -> Vec<String> {
        let empty: Vec<String> = self
            .groups
            .iter()
            .filter(|(_, tasks)| tasks.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        for name in &empty {
            self.groups.shift_remove(name);
        }
        empty
    }
}

impl FromIterator<Task> for Store {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut store = Store::new();
        for task in iter {
            store.add(task);
        }
        store
    }
}
