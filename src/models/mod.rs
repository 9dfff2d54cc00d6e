//! Data models for the weekly schedule.

pub mod error;
pub mod session;
pub mod slot;
pub mod time;
pub mod weekday;

pub use error::ParseError;
pub use session::ClassSession;
pub use slot::{format_duration, ConflictInfo, FreeSlot};
pub use time::ClockTime;
pub use weekday::Weekday;
