pub mod collect_task;
