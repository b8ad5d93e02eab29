use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::io::atomic::atomic_write;
use crate::io::lock::{FileLock, LockError};
use crate::model::store::Store;
use crate::model::task::Task;

/// Error type for task file operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("{path} is not a valid task file: {source}")]
    CorruptStore {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path} is not a valid task file: task '{taskname}' under '{key}' has group '{group}'")]
    MisfiledTask {
        path: PathBuf,
        key: String,
        taskname: String,
        group: String,
    },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not serialize tasks: {0}")]
    SerializeError(#[source] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// The JSON task file.
///
/// Holds only the path: every call reads the file fresh, so changes made by
/// other processes are always seen. Mutations lock, load, modify, write
/// atomically, then reload and return what is on disk.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the task file.
    ///
    /// A missing, empty or whitespace-only file is an empty store. Empty
    /// group arrays are dropped.
    pub fn load(&self) -> Result<Store, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} does not exist yet, starting empty", self.path.display());
                return Ok(Store::new());
            }
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        parse_store(&self.path, &text)
    }

    /// Append `task` to its group and persist. Fields are not re-validated.
    pub fn add(&self, task: Task) -> Result<Store, StoreError> {
        let _lock = FileLock::acquire_default(&self.path)?;
        let mut store = self.load()?;
        tracing::info!(group = %task.group, task = %task.taskname, "adding task");
        store.add(task);
        self.write(&store)?;
        self.load()
    }

    /// Remove every task named `taskname` in `group` and persist.
    ///
    /// The file is left untouched when nothing matches.
    pub fn remove(&self, group: &str, taskname: &str) -> Result<Store, StoreError> {
        self.remove_counted(group, taskname).map(|(store, _)| store)
    }

    /// Like [`TaskStore::remove`], also returning how many tasks matched.
    pub fn remove_counted(
        &self,
        group: &str,
        taskname: &str,
    ) -> Result<(Store, usize), StoreError> {
        let _lock = FileLock::acquire_default(&self.path)?;
        let mut store = self.load()?;
        let removed = store.remove(group, taskname);
        if removed == 0 {
            tracing::info!(group, task = taskname, "no matching task to remove");
            return Ok((store, 0));
        }
        tracing::info!(group, task = taskname, removed, "removed tasks");
        self.write(&store)?;
        Ok((self.load()?, removed))
    }

    /// Replace the whole file with `store`.
    pub fn save(&self, store: &Store) -> Result<(), StoreError> {
        let _lock = FileLock::acquire_default(&self.path)?;
        self.write(store)
    }

    fn write(&self, store: &Store) -> Result<(), StoreError> {
        let content = serialize_store(store)?;
        atomic_write(&self.path, content.as_bytes()).map_err(|e| StoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// Parse task file contents.
pub fn parse_store(path: &Path, text: &str) -> Result<Store, StoreError> {
    if text.trim().is_empty() {
        return Ok(Store::new());
    }
    let mut store: Store =
        serde_json::from_str(text).map_err(|e| StoreError::CorruptStore {
            path: path.to_path_buf(),
            source: e,
        })?;
    if let Some((key, task)) = store.misfiled() {
        return Err(StoreError::MisfiledTask {
            path: path.to_path_buf(),
            key: key.to_string(),
            taskname: task.taskname.clone(),
            group: task.group.clone(),
        });
    }
    for group in store.prune_empty_groups() {
        tracing::warn!("{}: dropping empty group '{}'", path.display(), group);
    }
    Ok(store)
}

/// Render a store as pretty JSON with 4-space indentation and a trailing newline.
pub fn serialize_store(store: &Store) -> Result<String, StoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    store
        .serialize(&mut ser)
        .map_err(StoreError::SerializeError)?;
    buf.push(b'\n');
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn task(group: &str, name: &str, due: &str) -> Task {
        Task {
            taskname: name.into(),
            description: format!("{} description", name),
            group: group.into(),
            setdate: "2024-01-01 08:00:00".into(),
            duedate: due.into(),
        }
    }

    fn store_in(tmp: &TempDir) -> TaskStore {
        TaskStore::new(tmp.path().join("tasks.json"))
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_load_empty_and_blank_files_are_empty() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::write(store.path(), "").unwrap();
        assert!(store.load().unwrap().is_empty());
        fs::write(store.path(), "  \n\t\n").unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_errors() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::write(store.path(), "{not valid json").unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::CorruptStore { .. }), "{:?}", err);
    }

    #[test]
    fn test_load_wrong_shape_errors() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        for bad in [
            "[1, 2, 3]",
            r#"{"Work": {"taskname": "A"}}"#,
            r#"{"Work": [{"taskname": "A"}]}"#,
            r#"{"Work": [{"taskname": "A", "description": "d", "group": "Work", "setdate": 5, "duedate": "N/A"}]}"#,
        ] {
            fs::write(store.path(), bad).unwrap();
            assert!(
                matches!(store.load(), Err(StoreError::CorruptStore { .. })),
                "accepted {}",
                bad
            );
        }
    }

    #[test]
    fn test_load_rejects_task_filed_under_other_group() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let text = r#"{"Work": [{"taskname": "A", "description": "d", "group": "Home", "setdate": "2024-01-01 08:00:00", "duedate": "N/A"}]}"#;
        fs::write(store.path(), text).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::MisfiledTask { .. }), "{:?}", err);
        assert!(err.to_string().contains("under 'Work' has group 'Home'"), "{}", err);

        // Never rewritten by a later add
        assert!(store.add(task("Work", "B", "N/A")).is_err());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), text);
    }

    #[test]
    fn test_load_drops_empty_groups() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let text = r#"{"Old": [], "Work": [{"taskname": "A", "description": "d", "group": "Work", "setdate": "2024-01-01 08:00:00", "duedate": "N/A"}]}"#;
        fs::write(store.path(), text).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.group_names().collect::<Vec<_>>(), vec!["Work"]);
    }

    #[test]
    fn test_add_creates_file_and_returns_reloaded_store() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let result = store.add(task("Work", "A", "2024-01-02 10:00:00")).unwrap();
        assert!(store.path().exists());
        assert_eq!(result, store.load().unwrap());
        assert_eq!(result.group("Work").unwrap()[0].taskname, "A");
    }

    #[test]
    fn test_add_twice_appends_duplicate() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let t = task("Work", "A", "N/A");
        store.add(t.clone()).unwrap();
        let result = store.add(t.clone()).unwrap();
        assert_eq!(result.group("Work").unwrap(), &[t.clone(), t][..]);
    }

    #[test]
    fn test_add_reads_disk_not_stale_state() {
        let tmp = TempDir::new().unwrap();
        let a = store_in(&tmp);
        let b = store_in(&tmp);
        a.add(task("Work", "A", "N/A")).unwrap();
        let result = b.add(task("Home", "B", "N/A")).unwrap();
        assert_eq!(result.task_count(), 2);
    }

    #[test]
    fn test_add_refuses_to_overwrite_corrupt_file() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::write(store.path(), "{not valid json").unwrap();
        assert!(store.add(task("Work", "A", "N/A")).is_err());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{not valid json");
    }

    #[test]
    fn test_remove_last_task_removes_group() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.add(task("Work", "A", "N/A")).unwrap();
        store.add(task("Home", "B", "N/A")).unwrap();
        let result = store.remove("Work", "A").unwrap();
        assert!(result.group("Work").is_none());
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(!text.contains("\"Work\""));
    }

    #[test]
    fn test_remove_all_duplicates() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.add(task("Work", "A", "N/A")).unwrap();
        store.add(task("Work", "B", "N/A")).unwrap();
        store.add(task("Work", "A", "N/A")).unwrap();
        let result = store.remove("Work", "A").unwrap();
        let names: Vec<&str> = result.tasks().map(|t| t.taskname.as_str()).collect();
        assert_eq!(names, vec!["B"]);
    }

    #[test]
    fn test_remove_missing_leaves_file_untouched() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::write(
            store.path(),
            r#"{"Work": [{"taskname": "A", "description": "d", "group": "Work", "setdate": "s", "duedate": "N/A"}]}"#,
        )
        .unwrap();
        let before = fs::read_to_string(store.path()).unwrap();
        let result = store.remove("Work", "Z").unwrap();
        assert_eq!(result.task_count(), 1);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_remove_from_missing_file_does_not_create_it() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        assert!(store.remove("Work", "A").unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let original: Store = vec![
            task("Work", "A", "2024-01-02 10:00:00"),
            task("Home", "B", "N/A"),
            task("Work", "C", "2023-12-31 23:59:59"),
        ]
        .into_iter()
        .collect();
        store.save(&original).unwrap();
        assert_eq!(store.load().unwrap(), original);
    }

    #[test]
    fn test_serialized_with_four_space_indent() {
        let s: Store = vec![task("Work", "A", "N/A")].into_iter().collect();
        let text = serialize_store(&s).unwrap();
        let expected = "\
{
    \"Work\": [
        {
            \"taskname\": \"A\",
            \"description\": \"A description\",
            \"group\": \"Work\",
            \"setdate\": \"2024-01-01 08:00:00\",
            \"duedate\": \"N/A\"
        }
    ]
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_empty_store_serializes_as_empty_object() {
        assert_eq!(serialize_store(&Store::new()).unwrap(), "{}\n");
    }

    #[test]
    fn test_write_failure_propagates() {
        let tmp = TempDir::new().unwrap();
        let store = TaskStore::new(tmp.path().join("missing-dir").join("tasks.json"));
        let err = store.add(task("Work", "A", "N/A")).unwrap_err();
        // The lock file cannot be created in a missing directory either
        assert!(matches!(
            err,
            StoreError::Lock(_) | StoreError::WriteError { .. }
        ));
    }
}
