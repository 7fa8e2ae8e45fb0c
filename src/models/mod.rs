pub mod event;
pub mod event_count;
