pub mod analytics;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod notifications;
pub mod planner;
pub mod priority;
pub mod projection;
pub mod queue;
pub mod store;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use database::Database;
pub use error::PlannerError;
pub use models::{CalendarEntry, CycleInput, CycleRecord, Event, Notification, Priority, Task};
pub use planner::{Dashboard, Planner};
pub use priority::KeyPolicy;
pub use projection::DateRange;
pub use queue::TaskQueue;
pub use store::Store;
pub use utils::Profile;
