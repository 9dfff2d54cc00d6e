//! Backend services.

pub mod clipboard;
pub mod day_bucket;
pub mod export;
pub mod schedule_index;
pub mod scheduler;
pub mod storage;
pub mod theme;

pub use clipboard::copy_to_clipboard;
pub use day_bucket::DayBucket;
pub use schedule_index::{ScheduleIndex, DAY_CLOSE, DAY_OPEN};
pub use scheduler::Scheduler;
pub use storage::{ScheduleStorage, StoredSchedule};
pub use theme::{parse_hex, Theme, ThemeMode, COURSE_COLORS};
