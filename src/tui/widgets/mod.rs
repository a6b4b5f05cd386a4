pub mod analytics;
pub mod calendar;
pub mod color;
pub mod notifications;
pub mod status_bar;
pub mod tabs;
pub mod task_list;
