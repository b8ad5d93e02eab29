pub mod report;
pub mod task_list;
