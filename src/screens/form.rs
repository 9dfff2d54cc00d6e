//! Add/edit class form with validation.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use ratatui_garnish::{shadow::HalfShadow, GarnishableWidget, Padding};
use thiserror::Error;

use crate::models::{ClassSession, ClockTime, ParseError, Weekday};
use crate::services::{parse_hex, Theme, COURSE_COLORS};

use super::{centered_rect, ModalOutcome};

/// Reasons a form cannot become a class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Course name is required")]
    MissingCourseName,

    #[error("Location is required")]
    MissingLocation,

    #[error("End time must be after start time")]
    EndNotAfterStart,

    #[error(transparent)]
    Time(#[from] ParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    CourseName,
    Day,
    Start,
    End,
    Location,
    Color,
    Description,
}

impl Field {
    const ORDER: [Field; 7] = [
        Field::CourseName,
        Field::Day,
        Field::Start,
        Field::End,
        Field::Location,
        Field::Color,
        Field::Description,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::CourseName => "Course",
            Field::Day => "Day",
            Field::Start => "Start",
            Field::End => "End",
            Field::Location => "Location",
            Field::Color => "Color",
            Field::Description => "Notes",
        }
    }

    fn offset(self, delta: isize) -> Self {
        let len = Self::ORDER.len() as isize;
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as isize;
        Self::ORDER[(index + delta).rem_euclid(len) as usize]
    }
}

/// State of the class form.
pub struct ClassForm {
    /// Id of the class being edited, `None` when adding
    editing_id: Option<String>,
    course_name: String,
    day: Weekday,
    start: String,
    end: String,
    location: String,
    color_index: usize,
    description: String,
    focus: Field,
    time_step: i32,
    error: Option<String>,
}

impl ClassForm {
    /// Blank form for a new class on `day`.
    pub fn new(day: Weekday, time_step: u16) -> Self {
        Self {
            editing_id: None,
            course_name: String::new(),
            day,
            start: "09:00".to_string(),
            end: "10:00".to_string(),
            location: String::new(),
            color_index: 0,
            description: String::new(),
            focus: Field::CourseName,
            time_step: time_step as i32,
            error: None,
        }
    }

    /// Form prefilled from an existing class.
    pub fn edit(class: &ClassSession, time_step: u16) -> Self {
        let color_index = COURSE_COLORS
            .iter()
            .position(|c| c.eq_ignore_ascii_case(&class.color))
            .unwrap_or(0);

        Self {
            editing_id: Some(class.id.clone()),
            course_name: class.course_name.clone(),
            day: class.day,
            start: class.start_time.to_string(),
            end: class.end_time.to_string(),
            location: class.location.clone(),
            color_index,
            description: class.description.clone().unwrap_or_default(),
            focus: Field::CourseName,
            time_step: time_step as i32,
            error: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Show an error under the fields, e.g. a scheduling conflict.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Build a class from the current fields.
    pub fn to_session(&self) -> Result<ClassSession, ValidationError> {
        let course_name = self.course_name.trim();
        if course_name.is_empty() {
            return Err(ValidationError::MissingCourseName);
        }
        let location = self.location.trim();
        if location.is_empty() {
            return Err(ValidationError::MissingLocation);
        }

        let start: ClockTime = self.start.parse()?;
        let end: ClockTime = self.end.parse()?;
        if start >= end {
            return Err(ValidationError::EndNotAfterStart);
        }

        let color = COURSE_COLORS.get(self.color_index).copied().unwrap_or(COURSE_COLORS[0]);
        let mut session = ClassSession::new(course_name, self.day, start, end, location, color)
            .with_description(self.description.trim());
        if let Some(id) = &self.editing_id {
            session = session.with_id(id.clone());
        }
        Ok(session)
    }

    fn text_field(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::CourseName => Some(&mut self.course_name),
            Field::Start => Some(&mut self.start),
            Field::End => Some(&mut self.end),
            Field::Location => Some(&mut self.location),
            Field::Description => Some(&mut self.description),
            Field::Day | Field::Color => None,
        }
    }

    /// Step the focused choice field left (-1) or right (+1).
    fn adjust(&mut self, direction: i32) {
        match self.focus {
            Field::Day => {
                self.day = if direction > 0 { self.day.next() } else { self.day.prev() };
            }
            Field::Color => {
                let len = COURSE_COLORS.len() as i32;
                self.color_index = (self.color_index as i32 + direction).rem_euclid(len) as usize;
            }
            Field::Start | Field::End => {
                let step = self.time_step * direction;
                let buffer = if self.focus == Field::Start { &mut self.start } else { &mut self.end };
                // unparsable text is left for the user to fix
                if let Ok(time) = buffer.parse::<ClockTime>() {
                    *buffer = time.shifted(step).to_string();
                }
            }
            _ => {}
        }
    }

    /// Handle a key while the form is open.
    pub fn handle_key(&mut self, key: KeyEvent) -> ModalOutcome<ClassSession> {
        if key.code != KeyCode::Enter {
            self.error = None;
        }
        match key.code {
            KeyCode::Esc => return ModalOutcome::Close,
            KeyCode::Enter => {
                return match self.to_session() {
                    Ok(session) => ModalOutcome::Submit(session),
                    Err(e) => {
                        self.error = Some(e.to_string());
                        ModalOutcome::Stay
                    }
                };
            }
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.offset(1),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.offset(-1),
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Backspace => {
                if let Some(text) = self.text_field() {
                    text.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(text) = self.text_field() {
                    text.push(c);
                } else if c == ' ' {
                    self.adjust(1);
                }
            }
            _ => {}
        }
        ModalOutcome::Stay
    }

    /// Draw the form as a centered modal.
    ///
    /// `conflict` is a live warning about the class as currently entered.
    pub fn draw(&self, f: &mut Frame, area: Rect, theme: &Theme, conflict: Option<&str>) {
        let modal = centered_rect(60, 16, area);
        f.render_widget(Clear, modal);

        let title = if self.is_editing() { "Edit Class" } else { "Add New Class" };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(theme.accent));

        let inner = block.inner(modal);
        f.render_widget(block.garnish(HalfShadow::default()), modal);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(Field::ORDER.len() as u16),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let lines: Vec<Line> = Field::ORDER.iter().map(|&field| self.field_line(field, theme)).collect();
        f.render_widget(Paragraph::new(lines).garnish(Padding::horizontal(1)), rows[0]);

        let notice = match (&self.error, conflict) {
            (Some(error), _) => Some((error.clone(), theme.error)),
            (None, Some(conflict)) => Some((format!("⚠ {}", conflict), theme.muted)),
            (None, None) => None,
        };
        if let Some((text, color)) = notice {
            let notice = Paragraph::new(text)
                .style(Style::default().fg(color))
                .wrap(Wrap { trim: true });
            f.render_widget(notice.garnish(Padding::horizontal(1)), rows[2]);
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled("Tab", Style::default().fg(theme.muted)),
            Span::raw(" Next  "),
            Span::styled("←/→", Style::default().fg(theme.muted)),
            Span::raw(" Change  "),
            Span::styled("Enter", Style::default().fg(theme.muted)),
            Span::raw(" Save  "),
            Span::styled("Esc", Style::default().fg(theme.muted)),
            Span::raw(" Cancel"),
        ]));
        f.render_widget(help.garnish(Padding::horizontal(1)), rows[3]);
    }

    fn field_line(&self, field: Field, theme: &Theme) -> Line<'_> {
        let focused = field == self.focus;
        let label_style = if focused {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        let marker = if focused { "► " } else { "  " };

        let mut spans = vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<9}", field.label()), label_style),
        ];
        match field {
            Field::CourseName => spans.push(Span::raw(self.course_name.as_str())),
            Field::Day => spans.push(Span::raw(format!("‹ {} ›", self.day))),
            Field::Start => spans.push(Span::raw(self.start.as_str())),
            Field::End => spans.push(Span::raw(self.end.as_str())),
            Field::Location => spans.push(Span::raw(self.location.as_str())),
            Field::Color => {
                let hex = COURSE_COLORS.get(self.color_index).copied().unwrap_or(COURSE_COLORS[0]);
                spans.push(Span::styled("██ ", Style::default().fg(parse_hex(hex))));
                spans.push(Span::raw(hex));
            }
            Field::Description => spans.push(Span::raw(self.description.as_str())),
        }
        if focused && field != Field::Day && field != Field::Color {
            spans.push(Span::styled("▏", Style::default().fg(theme.accent)));
        }
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut ClassForm, text: &str) {
        for c in text.chars() {
            form.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn filled_form() -> ClassForm {
        let mut form = ClassForm::new(Weekday::Monday, 30);
        type_text(&mut form, "Algorithms");
        form.focus = Field::Location;
        type_text(&mut form, "Room 101");
        form
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let form = ClassForm::new(Weekday::Monday, 30);
        assert_eq!(form.to_session(), Err(ValidationError::MissingCourseName));
    }

    #[test]
    fn test_blank_location_is_rejected() {
        let mut form = ClassForm::new(Weekday::Monday, 30);
        type_text(&mut form, "Algorithms");
        assert_eq!(form.to_session(), Err(ValidationError::MissingLocation));
    }

    #[test]
    fn test_inverted_times_are_rejected() {
        let mut form = filled_form();
        form.start = "11:00".to_string();
        form.end = "10:00".to_string();
        assert_eq!(form.to_session(), Err(ValidationError::EndNotAfterStart));

        form.end = "11:00".to_string();
        assert_eq!(form.to_session(), Err(ValidationError::EndNotAfterStart));
    }

    #[test]
    fn test_bad_time_text_is_rejected() {
        let mut form = filled_form();
        form.end = "10:7x".to_string();
        assert!(matches!(form.to_session(), Err(ValidationError::Time(_))));
    }

    #[test]
    fn test_valid_form_builds_session() {
        let mut form = filled_form();
        form.focus = Field::Day;
        form.handle_key(press(KeyCode::Right));
        form.focus = Field::End;
        form.handle_key(press(KeyCode::Right));

        let session = form.to_session().unwrap();
        assert_eq!(session.course_name, "Algorithms");
        assert_eq!(session.day, Weekday::Tuesday);
        assert_eq!(session.time_range(), "09:00-10:30");
        assert_eq!(session.color, COURSE_COLORS[0]);
        assert_eq!(session.description, None);
    }

    #[test]
    fn test_edit_keeps_id() {
        let original = ClassSession::new(
            "Databases",
            Weekday::Friday,
            ClockTime::from_hm(13, 0).unwrap(),
            ClockTime::from_hm(14, 0).unwrap(),
            "Lab",
            "#EF4444",
        )
        .with_id("keep-me")
        .with_description("Bring ID");

        let form = ClassForm::edit(&original, 30);
        assert!(form.is_editing());
        assert_eq!(form.to_session().unwrap(), original);
    }

    #[test]
    fn test_enter_reports_error_and_stays_open() {
        let mut form = ClassForm::new(Weekday::Monday, 30);
        let outcome = form.handle_key(press(KeyCode::Enter));
        assert!(matches!(outcome, ModalOutcome::Stay));
        assert_eq!(form.error.as_deref(), Some("Course name is required"));
    }

    #[test]
    fn test_escape_closes() {
        let mut form = ClassForm::new(Weekday::Monday, 30);
        let mut key = press(KeyCode::Esc);
        key.kind = KeyEventKind::Press;
        assert!(matches!(form.handle_key(key), ModalOutcome::Close));
    }
}
