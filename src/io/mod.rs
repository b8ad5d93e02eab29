pub mod atomic;
pub mod config_io;
pub mod lock;
pub mod store_io;
pub mod watcher;

pub use store_io::{StoreError, TaskStore};
