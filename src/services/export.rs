//! Plain-text schedule export.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{ClassSession, Weekday};

/// Render the schedule as a printable text document.
///
/// Days without classes are left out; classes within a day are listed by
/// start time whatever order `classes` is in.
pub fn export_schedule_text(classes: &[ClassSession], generated_on: NaiveDate) -> String {
    let mut sorted: Vec<&ClassSession> = classes.iter().collect();
    sorted.sort_by_key(|c| (c.day, c.start_time));

    let mut output = String::from("📅 STUDENT SCHEDULE\n");
    output.push_str("═══════════════════\n\n");

    for day in Weekday::ALL {
        let mut day_classes = sorted.iter().filter(|c| c.day == day).peekable();
        if day_classes.peek().is_none() {
            continue;
        }

        let name = day.name();
        let _ = writeln!(output, "{}", name.to_uppercase());
        let _ = writeln!(output, "{}", "─".repeat(name.len()));

        for class in day_classes {
            let _ = writeln!(output, "• {}", class.course_name);
            let _ = writeln!(output, "  📍 {}", class.location);
            let _ = writeln!(
                output,
                "  🕐 {} - {}",
                class.start_time.to_12h(),
                class.end_time.to_12h()
            );
            if let Some(description) = &class.description {
                let _ = writeln!(output, "  📝 {}", description);
            }
            output.push('\n');
        }
    }

    let _ = writeln!(output, "\nTotal Classes: {}", classes.len());
    let _ = writeln!(output, "Generated on: {}", generated_on.format("%Y-%m-%d"));
    output
}

/// File name used for exports made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("student-schedule-{}.txt", date.format("%Y-%m-%d"))
}

/// Write today's export into `dir` and return the file path.
pub fn write_export(classes: &[ClassSession], dir: &Path) -> Result<PathBuf> {
    let today = chrono::Local::now().date_naive();
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(export_file_name(today));
    fs::write(&path, export_schedule_text(classes, today))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClockTime;

    fn class(name: &str, day: Weekday, start: (u16, u16), end: (u16, u16)) -> ClassSession {
        ClassSession::new(
            name,
            day,
            ClockTime::from_hm(start.0, start.1).unwrap(),
            ClockTime::from_hm(end.0, end.1).unwrap(),
            "Hall A",
            "#3B82F6",
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
    }

    #[test]
    fn test_export_orders_days_and_times() {
        let classes = vec![
            class("Statistics", Weekday::Wednesday, (14, 0), (15, 0)),
            class("Databases", Weekday::Monday, (13, 0), (14, 30)),
            class("Algorithms", Weekday::Monday, (9, 0), (10, 0)).with_description("Quiz"),
        ];
        let text = export_schedule_text(&classes, date());

        let monday = text.find("MONDAY").unwrap();
        let wednesday = text.find("WEDNESDAY").unwrap();
        let algorithms = text.find("• Algorithms").unwrap();
        let databases = text.find("• Databases").unwrap();
        assert!(monday < algorithms && algorithms < databases && databases < wednesday);

        assert!(text.contains("  🕐 9:00 AM - 10:00 AM\n"));
        assert!(text.contains("  🕐 1:00 PM - 2:30 PM\n"));
        assert!(text.contains("  📝 Quiz\n"));
        assert!(!text.contains("TUESDAY"));
        assert!(text.contains("Total Classes: 3\n"));
        assert!(text.ends_with("Generated on: 2024-09-02\n"));
    }

    #[test]
    fn test_export_underline_matches_day_name() {
        let text = export_schedule_text(&[class("Art", Weekday::Friday, (9, 0), (10, 0))], date());
        assert!(text.contains("FRIDAY\n──────\n"));
    }

    #[test]
    fn test_empty_export() {
        let text = export_schedule_text(&[], date());
        assert!(text.starts_with("📅 STUDENT SCHEDULE\n"));
        assert!(text.contains("Total Classes: 0"));
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_export(&[class("Art", Weekday::Friday, (9, 0), (10, 0))], dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("student-schedule-") && name.ends_with(".txt"));
        assert!(fs::read_to_string(path).unwrap().contains("• Art"));
    }
}
