//! Parse errors for schedule values.

use thiserror::Error;

/// Errors raised when turning user or file input into schedule values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("invalid weekday '{0}'")]
    InvalidWeekday(String),
}
