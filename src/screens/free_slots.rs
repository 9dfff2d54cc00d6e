//! Free-slot finder modal.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use ratatui_garnish::{shadow::HalfShadow, GarnishableWidget, Padding};

use crate::models::{format_duration, ClockTime, FreeSlot, Weekday};
use crate::services::{Scheduler, Theme};

use super::{centered_rect, ModalOutcome};

const DURATION_PRESETS: [u32; 5] = [30, 60, 90, 120, 180];
const MIN_CUSTOM_DURATION: u32 = 15;
const MAX_CUSTOM_DURATION: u32 = 480;
const CUSTOM_STEP: u32 = 15;

/// Minimum duration and day filter, plus the last search results.
pub struct FreeSlotFinder {
    /// Daily window being searched
    window: (ClockTime, ClockTime),
    duration: u32,
    /// Preferred days in the order they were picked
    selected_days: Vec<Weekday>,
    results: Option<Vec<FreeSlot>>,
    result_state: ListState,
}

impl FreeSlotFinder {
    pub fn new(default_duration: u32, window: (ClockTime, ClockTime)) -> Self {
        Self {
            window,
            duration: default_duration.clamp(MIN_CUSTOM_DURATION, MAX_CUSTOM_DURATION),
            selected_days: Vec::new(),
            results: None,
            result_state: ListState::default(),
        }
    }

    /// Toggle a day in or out of the filter.
    pub fn toggle_day(&mut self, day: Weekday) {
        if let Some(pos) = self.selected_days.iter().position(|d| *d == day) {
            self.selected_days.remove(pos);
        } else {
            self.selected_days.push(day);
        }
    }

    /// Jump to the next or previous preset duration.
    fn cycle_preset(&mut self, forward: bool) {
        self.duration = if forward {
            DURATION_PRESETS
                .iter()
                .copied()
                .find(|p| *p > self.duration)
                .unwrap_or(DURATION_PRESETS[0])
        } else {
            DURATION_PRESETS
                .iter()
                .rev()
                .copied()
                .find(|p| *p < self.duration)
                .unwrap_or(DURATION_PRESETS[DURATION_PRESETS.len() - 1])
        };
    }

    fn nudge(&mut self, up: bool) {
        self.duration = if up {
            self.duration + CUSTOM_STEP
        } else {
            self.duration.saturating_sub(CUSTOM_STEP)
        }
        .clamp(MIN_CUSTOM_DURATION, MAX_CUSTOM_DURATION);
    }

    /// Run the search; an empty filter means every day.
    pub fn search(&mut self, scheduler: &Scheduler) -> usize {
        let days = if self.selected_days.is_empty() {
            None
        } else {
            Some(self.selected_days.as_slice())
        };
        let slots = scheduler.suggest_free_slots(self.duration, days);
        let count = slots.len();
        self.result_state.select(if slots.is_empty() { None } else { Some(0) });
        self.results = Some(slots);
        count
    }

    fn scroll(&mut self, down: bool) {
        let len = self.results.as_ref().map_or(0, Vec::len);
        if len == 0 {
            return;
        }
        let current = self.result_state.selected().unwrap_or(0);
        let next = if down { (current + 1).min(len - 1) } else { current.saturating_sub(1) };
        self.result_state.select(Some(next));
    }

    /// Handle a key; `Submit` carries the number of slots found.
    pub fn handle_key(&mut self, key: KeyEvent, scheduler: &Scheduler) -> ModalOutcome<usize> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return ModalOutcome::Close,
            KeyCode::Enter => return ModalOutcome::Submit(self.search(scheduler)),
            KeyCode::Left | KeyCode::Char('h') => self.cycle_preset(false),
            KeyCode::Right | KeyCode::Char('l') => self.cycle_preset(true),
            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge(true),
            KeyCode::Char('-') => self.nudge(false),
            KeyCode::Down | KeyCode::Char('j') => self.scroll(true),
            KeyCode::Up | KeyCode::Char('k') => self.scroll(false),
            KeyCode::Char(c @ '1'..='7') => {
                let index = c as usize - '1' as usize;
                self.toggle_day(Weekday::ALL[index]);
            }
            _ => {}
        }
        ModalOutcome::Stay
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        let modal = centered_rect(70, 22, area);
        f.render_widget(Clear, modal);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(
                "Find Free Time Slots ({}-{})",
                self.window.0, self.window.1
            ))
            .border_style(Style::default().fg(theme.accent));
        let inner = block.inner(modal);
        f.render_widget(block.garnish(HalfShadow::default()), modal);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // duration
                Constraint::Length(1), // days
                Constraint::Length(1),
                Constraint::Min(3),    // results
                Constraint::Length(1), // help
            ])
            .split(inner);

        let preset_spans: Vec<Span> = DURATION_PRESETS
            .iter()
            .flat_map(|&p| {
                let style = if p == self.duration {
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.muted)
                };
                [Span::styled(format_duration(p), style), Span::raw(" ")]
            })
            .collect();
        let mut duration_line = vec![Span::raw("Minimum duration: ")];
        duration_line.extend(preset_spans);
        if !DURATION_PRESETS.contains(&self.duration) {
            duration_line.push(Span::styled(
                format!("[custom {}]", format_duration(self.duration)),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ));
        }
        f.render_widget(
            Paragraph::new(Line::from(duration_line)).garnish(Padding::horizontal(1)),
            rows[0],
        );

        let mut day_line = vec![Span::raw("Preferred days:   ")];
        for (i, day) in Weekday::ALL.iter().enumerate() {
            let checked = self.selected_days.contains(day);
            let style = if checked {
                Style::default().fg(theme.success).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.muted)
            };
            let mark = if checked { "x" } else { " " };
            day_line.push(Span::styled(
                format!("{}[{}]{} ", i + 1, mark, day.short_name()),
                style,
            ));
        }
        f.render_widget(
            Paragraph::new(Line::from(day_line)).garnish(Padding::horizontal(1)),
            rows[1],
        );

        match &self.results {
            None => {
                let hint = Paragraph::new("Press Enter to find free slots based on your preferences.")
                    .style(Style::default().fg(theme.muted));
                f.render_widget(hint.garnish(Padding::horizontal(1)), rows[3]);
            }
            Some(slots) if slots.is_empty() => {
                let none = Paragraph::new("No free slots of that length.")
                    .style(Style::default().fg(theme.error));
                f.render_widget(none.garnish(Padding::horizontal(1)), rows[3]);
            }
            Some(slots) => {
                let items: Vec<ListItem> = slots
                    .iter()
                    .map(|slot| {
                        ListItem::new(Line::from(vec![
                            Span::styled(format!("{:<10}", slot.day.name()), Style::default().fg(theme.foreground)),
                            Span::raw(format!("{} - {}  ", slot.start_time, slot.end_time)),
                            Span::styled(slot.duration_str(), Style::default().fg(theme.success)),
                        ]))
                    })
                    .collect();
                let list = List::new(items)
                    .block(
                        Block::default()
                            .borders(Borders::TOP)
                            .title(format!("Suggested Free Time Slots ({} found)", slots.len())),
                    )
                    .highlight_style(Style::default().bg(theme.highlight).add_modifier(Modifier::BOLD))
                    .highlight_symbol("► ");
                f.render_stateful_widget(list, rows[3], &mut self.result_state);
            }
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled("←/→", Style::default().fg(theme.muted)),
            Span::raw(" Preset  "),
            Span::styled("+/-", Style::default().fg(theme.muted)),
            Span::raw(" Custom  "),
            Span::styled("1-7", Style::default().fg(theme.muted)),
            Span::raw(" Days  "),
            Span::styled("Enter", Style::default().fg(theme.muted)),
            Span::raw(" Search  "),
            Span::styled("Esc", Style::default().fg(theme.muted)),
            Span::raw(" Close"),
        ]));
        f.render_widget(help.garnish(Padding::horizontal(1)), rows[4]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClassSession;
    use crate::services::{ScheduleIndex, DAY_CLOSE, DAY_OPEN};
    use crossterm::event::KeyModifiers;

    fn window() -> (ClockTime, ClockTime) {
        (DAY_OPEN, DAY_CLOSE)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_preset_cycling() {
        let mut finder = FreeSlotFinder::new(60, window());
        finder.cycle_preset(true);
        assert_eq!(finder.duration, 90);
        finder.cycle_preset(false);
        finder.cycle_preset(false);
        assert_eq!(finder.duration, 30);
        finder.cycle_preset(false);
        assert_eq!(finder.duration, 180);
    }

    #[test]
    fn test_custom_duration_is_clamped() {
        let mut finder = FreeSlotFinder::new(5, window());
        assert_eq!(finder.duration, 15);
        finder.nudge(false);
        assert_eq!(finder.duration, 15);
        let mut finder = FreeSlotFinder::new(475, window());
        finder.nudge(true);
        assert_eq!(finder.duration, 480);
    }

    #[test]
    fn test_search_uses_selected_days_in_order() {
        let mut scheduler = Scheduler::new(ScheduleIndex::new());
        scheduler
            .add_class(ClassSession::new(
                "Algorithms",
                Weekday::Monday,
                ClockTime::from_hm(9, 0).unwrap(),
                ClockTime::from_hm(10, 0).unwrap(),
                "Room",
                "#3B82F6",
            ))
            .unwrap();

        let mut finder = FreeSlotFinder::new(60, window());
        finder.handle_key(press(KeyCode::Char('3')), &scheduler);
        finder.handle_key(press(KeyCode::Char('1')), &scheduler);
        let outcome = finder.handle_key(press(KeyCode::Enter), &scheduler);
        assert!(matches!(outcome, ModalOutcome::Submit(3)));

        let days: Vec<Weekday> = finder.results.as_ref().unwrap().iter().map(|s| s.day).collect();
        assert_eq!(days, vec![Weekday::Wednesday, Weekday::Monday, Weekday::Monday]);
    }

    #[test]
    fn test_toggle_day_twice_clears_filter() {
        let mut finder = FreeSlotFinder::new(60, window());
        finder.toggle_day(Weekday::Friday);
        finder.toggle_day(Weekday::Friday);
        let scheduler = Scheduler::new(ScheduleIndex::new());
        assert_eq!(finder.search(&scheduler), 7);
    }
}
