//! Wall-clock times at minute resolution.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ParseError;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Time of day as minutes since midnight.
///
/// `24:00` is representable so a window can close at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    pub const END_OF_DAY: ClockTime = ClockTime(MINUTES_PER_DAY);

    /// On the hour, clamped to `24:00`.
    pub const fn at_hour(hour: u16) -> Self {
        let hour = if hour > 24 { 24 } else { hour };
        Self(hour * 60)
    }

    /// Build from hours and minutes, `None` if out of range.
    pub const fn from_hm(hours: u16, minutes: u16) -> Option<Self> {
        if minutes >= 60 || hours > 24 {
            return None;
        }
        let total = hours * 60 + minutes;
        if total > MINUTES_PER_DAY {
            return None;
        }
        Some(Self(total))
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        self.0 as u32
    }

    pub fn hours(self) -> u16 {
        self.0 / 60
    }

    /// Minutes from `self` forward to `later`, zero if `later` is earlier.
    pub fn minutes_until(self, later: ClockTime) -> u32 {
        later.minutes().saturating_sub(self.minutes())
    }

    /// Shift by a signed number of minutes, clamped to the day.
    pub fn shifted(self, delta: i32) -> Self {
        let shifted = (self.0 as i32 + delta).clamp(0, MINUTES_PER_DAY as i32);
        Self(shifted as u16)
    }

    /// 12-hour rendering, e.g. `9:05 AM`, `12:30 PM`.
    pub fn to_12h(self) -> String {
        let hours = self.hours() % 24;
        let minutes = self.0 % 60;
        let suffix = if hours >= 12 { "PM" } else { "AM" };
        let hour12 = match hours {
            0 => 12,
            h if h > 12 => h - 12,
            h => h,
        };
        format!("{}:{:02} {}", hour12, minutes, suffix)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for ClockTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "24:00" {
            return Ok(Self::END_OF_DAY);
        }
        let parsed = NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map_err(|_| ParseError::InvalidTime(s.to_string()))?;
        Ok(Self((parsed.hour() * 60 + parsed.minute()) as u16))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let t: ClockTime = "09:05".parse().unwrap();
        assert_eq!(t.minutes(), 545);
        assert_eq!(t.to_string(), "09:05");
        assert_eq!("24:00".parse::<ClockTime>(), Ok(ClockTime::END_OF_DAY));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("25:00".parse::<ClockTime>().is_err());
        assert!("09:60".parse::<ClockTime>().is_err());
        assert!("nine".parse::<ClockTime>().is_err());
        assert!("".parse::<ClockTime>().is_err());
    }

    #[test]
    fn test_to_12h() {
        assert_eq!(ClockTime::from_hm(0, 15).unwrap().to_12h(), "12:15 AM");
        assert_eq!(ClockTime::from_hm(9, 0).unwrap().to_12h(), "9:00 AM");
        assert_eq!(ClockTime::from_hm(12, 30).unwrap().to_12h(), "12:30 PM");
        assert_eq!(ClockTime::from_hm(21, 0).unwrap().to_12h(), "9:00 PM");
    }

    #[test]
    fn test_minutes_until_saturates() {
        let nine = ClockTime::from_hm(9, 0).unwrap();
        let ten = ClockTime::from_hm(10, 0).unwrap();
        assert_eq!(nine.minutes_until(ten), 60);
        assert_eq!(ten.minutes_until(nine), 0);
    }

    #[test]
    fn test_shifted_clamps() {
        let t = ClockTime::from_hm(0, 10).unwrap();
        assert_eq!(t.shifted(-30).to_string(), "00:00");
        assert_eq!(ClockTime::END_OF_DAY.shifted(30), ClockTime::END_OF_DAY);
        assert_eq!(t.shifted(20).to_string(), "00:30");
    }

    #[test]
    fn test_serde_uses_hh_mm() {
        let t = ClockTime::from_hm(14, 0).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"14:00\"");
        let back: ClockTime = serde_json::from_str("\"14:00\"").unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<ClockTime>("\"2pm\"").is_err());
    }
}
