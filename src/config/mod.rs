//! Configuration loading and calendar types for the report pipeline.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_WORKER_WIDTH, HolidayCalendar, HolidaysFile, ReportConfig, ReportFile, RetryPolicy,
};
