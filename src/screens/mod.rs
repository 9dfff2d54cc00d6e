//! TUI screens.

pub mod form;
pub mod free_slots;
pub mod schedule;

pub use schedule::ScheduleScreen;

use async_trait::async_trait;
use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

/// Action returned by screen key handlers.
#[derive(Debug, PartialEq, Eq)]
pub enum ScreenAction {
    /// No action needed.
    None,
    /// Display a status message.
    StatusMessage(String),
    /// Leave the application.
    Quit,
}

/// Result of a key press inside a modal.
#[derive(Debug)]
pub enum ModalOutcome<T> {
    /// Keep the modal open.
    Stay,
    /// Dismiss without a result.
    Close,
    /// The modal produced a value.
    Submit(T),
}

/// Trait for screen implementations.
#[async_trait]
pub trait Screen {
    /// Draw the screen.
    fn draw(&mut self, f: &mut Frame, area: Rect);

    /// Handle a key event.
    async fn handle_key(&mut self, key: KeyEvent) -> ScreenAction;

    /// Whether plain keys are going to a text field rather than shortcuts.
    fn captures_input(&self) -> bool {
        false
    }
}

/// Rect `percent_x` wide and `height` rows tall, centered in `area`.
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x.min(100)) / 2),
            Constraint::Percentage(percent_x.min(100)),
            Constraint::Percentage((100 - percent_x.min(100)) / 2),
        ])
        .split(vertical[1])[1]
}
