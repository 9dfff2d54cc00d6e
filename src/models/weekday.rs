//! Days of the week.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ParseError;

/// One of the seven calendar columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days in canonical order, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Zero-based position in the week, Monday = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Full English name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Three-letter label for narrow calendar columns.
    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }

    /// The following day, wrapping Sunday back to Monday.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % 7]
    }

    /// The preceding day, wrapping Monday back to Sunday.
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + 6) % 7]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = ParseError;

    /// Accepts full names or three-letter abbreviations, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| {
                let name = day.name().to_lowercase();
                name == wanted || (wanted.len() == 3 && name.starts_with(&wanted))
            })
            .ok_or_else(|| ParseError::InvalidWeekday(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_and_short_names() {
        assert_eq!("Monday".parse::<Weekday>(), Ok(Weekday::Monday));
        assert_eq!("thu".parse::<Weekday>(), Ok(Weekday::Thursday));
        assert_eq!(" SUNDAY ".parse::<Weekday>(), Ok(Weekday::Sunday));
        assert!("Mo".parse::<Weekday>().is_err());
        assert!("Funday".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_next_and_prev_wrap() {
        assert_eq!(Weekday::Sunday.next(), Weekday::Monday);
        assert_eq!(Weekday::Monday.prev(), Weekday::Sunday);
        assert_eq!(Weekday::Wednesday.next(), Weekday::Thursday);
    }

    #[test]
    fn test_serializes_as_full_name() {
        let json = serde_json::to_string(&Weekday::Friday).unwrap();
        assert_eq!(json, "\"Friday\"");
    }
}
