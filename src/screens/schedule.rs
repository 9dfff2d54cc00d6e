//! Schedule screen - weekly calendar, class details and modals.

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use ratatui_garnish::{shadow::HalfShadow, GarnishableStatefulWidget, GarnishableWidget, Padding};
use std::sync::Arc;

use crate::config::Config;
use crate::models::{format_duration, ClassSession, Weekday};
use crate::services::{copy_to_clipboard, export, parse_hex, Scheduler, Theme};

use super::form::ClassForm;
use super::free_slots::FreeSlotFinder;
use super::{centered_rect, ModalOutcome, Screen, ScreenAction};

/// What currently has the keyboard.
enum Mode {
    Browse,
    Form(ClassForm),
    FreeSlots(FreeSlotFinder),
    ConfirmClear,
}

/// Main screen: one column per weekday.
pub struct ScheduleScreen {
    scheduler: Scheduler,
    config: Arc<Config>,
    theme: Theme,
    mode: Mode,

    // Selection
    selected_day: Weekday,
    class_state: ListState,
}

impl ScheduleScreen {
    pub fn new(scheduler: Scheduler, config: Arc<Config>) -> Self {
        let theme = Theme::for_mode(scheduler.theme_mode());
        let mut screen = Self {
            scheduler,
            config,
            theme,
            mode: Mode::Browse,
            selected_day: Weekday::Monday,
            class_state: ListState::default(),
        };
        screen.clamp_selection();
        screen
    }

    /// Total number of classes in the week.
    pub fn class_count(&self) -> usize {
        self.scheduler.index().len()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    fn day_classes(&self) -> Vec<ClassSession> {
        self.scheduler.classes_for_day(self.selected_day)
    }

    fn selected_class(&self) -> Option<ClassSession> {
        let index = self.class_state.selected()?;
        self.day_classes().into_iter().nth(index)
    }

    /// Keep the class cursor inside the selected day's list.
    fn clamp_selection(&mut self) {
        let len = self.day_classes().len();
        let selected = match self.class_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.class_state.select(selected);
    }

    fn select_class(&mut self, day: Weekday, id: &str) {
        self.selected_day = day;
        let position = self.day_classes().iter().position(|c| c.id == id);
        self.class_state.select(position);
        self.clamp_selection();
    }

    fn change_day(&mut self, forward: bool) {
        self.selected_day = if forward {
            self.selected_day.next()
        } else {
            self.selected_day.prev()
        };
        self.class_state.select(None);
        self.clamp_selection();
    }

    fn move_class(&mut self, down: bool) {
        let len = self.day_classes().len();
        if let Some(selected) = self.class_state.selected() {
            let new_index = if down {
                if selected + 1 >= len { 0 } else { selected + 1 }
            } else if selected == 0 {
                len.saturating_sub(1)
            } else {
                selected - 1
            };
            self.class_state.select(Some(new_index));
        }
    }

    fn open_add_form(&mut self) {
        self.mode = Mode::Form(ClassForm::new(self.selected_day, self.config.display.time_step_minutes));
    }

    fn open_edit_form(&mut self) -> ScreenAction {
        match self.selected_class() {
            Some(class) => {
                self.mode = Mode::Form(ClassForm::edit(&class, self.config.display.time_step_minutes));
                ScreenAction::None
            }
            None => ScreenAction::StatusMessage("No class selected".to_string()),
        }
    }

    fn remove_selected(&mut self) -> ScreenAction {
        let Some(class) = self.selected_class() else {
            return ScreenAction::StatusMessage("No class selected".to_string());
        };

        let action = match self.scheduler.remove_class(class.day, &class.id) {
            Ok(true) => ScreenAction::StatusMessage(format!("Removed {}", class.course_name)),
            Ok(false) => ScreenAction::StatusMessage(format!("{} was already gone", class.course_name)),
            Err(e) => ScreenAction::StatusMessage(format!("Removed, but saving failed: {:#}", e)),
        };
        self.clamp_selection();
        action
    }

    /// Add or update a class coming out of the form.
    fn save_class(&mut self, class: ClassSession, editing: bool) -> ScreenAction {
        let id = class.id.clone();
        let day = class.day;
        let name = class.course_name.clone();

        let result = if editing {
            self.scheduler.update_class(class)
        } else {
            self.scheduler.add_class(class)
        };

        match result {
            Ok(conflict) if conflict.has_conflict => {
                let message = conflict
                    .message
                    .unwrap_or_else(|| "Scheduling conflict detected".to_string());
                if let Mode::Form(form) = &mut self.mode {
                    form.set_error(message.clone());
                }
                ScreenAction::StatusMessage(message)
            }
            Ok(_) => {
                self.mode = Mode::Browse;
                self.select_class(day, &id);
                let verb = if editing { "Updated" } else { "Added" };
                ScreenAction::StatusMessage(format!("{} {}", verb, name))
            }
            Err(e) => {
                self.mode = Mode::Browse;
                self.select_class(day, &id);
                ScreenAction::StatusMessage(format!("Saved in memory, but writing failed: {:#}", e))
            }
        }
    }

    fn export_to_file(&self) -> ScreenAction {
        match export::write_export(&self.scheduler.all_classes(), &Config::data_dir()) {
            Ok(path) => ScreenAction::StatusMessage(format!("Exported to {}", path.display())),
            Err(e) => ScreenAction::StatusMessage(format!("Export failed: {:#}", e)),
        }
    }

    fn copy_export(&self) -> ScreenAction {
        let today = chrono::Local::now().date_naive();
        let text = export::export_schedule_text(&self.scheduler.all_classes(), today);
        match copy_to_clipboard(&text) {
            Ok(()) => ScreenAction::StatusMessage("Schedule copied to clipboard".to_string()),
            Err(e) => ScreenAction::StatusMessage(format!("Copy failed: {:#}", e)),
        }
    }

    fn toggle_theme(&mut self) -> ScreenAction {
        match self.scheduler.toggle_theme() {
            Ok(mode) => {
                self.theme = Theme::for_mode(mode);
                ScreenAction::StatusMessage(format!("{} theme", mode.as_str()))
            }
            Err(e) => {
                self.theme = Theme::for_mode(self.scheduler.theme_mode());
                ScreenAction::StatusMessage(format!("Theme changed, but saving failed: {:#}", e))
            }
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Char('q') => ScreenAction::Quit,
            KeyCode::Left | KeyCode::Char('h') => {
                self.change_day(false);
                ScreenAction::None
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                self.change_day(true);
                ScreenAction::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_class(false);
                ScreenAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_class(true);
                ScreenAction::None
            }
            KeyCode::Char('a') | KeyCode::Char('n') => {
                self.open_add_form();
                ScreenAction::None
            }
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit_form(),
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected(),
            KeyCode::Char('f') => {
                self.mode = Mode::FreeSlots(FreeSlotFinder::new(
                    self.config.schedule.default_min_duration,
                    self.scheduler.index().window(),
                ));
                ScreenAction::None
            }
            KeyCode::Char('x') => self.export_to_file(),
            KeyCode::Char('y') => self.copy_export(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('C') => {
                if self.scheduler.index().is_empty() {
                    ScreenAction::StatusMessage("Nothing to clear".to_string())
                } else {
                    self.mode = Mode::ConfirmClear;
                    ScreenAction::None
                }
            }
            _ => ScreenAction::None,
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.mode = Mode::Browse;
                let action = match self.scheduler.clear_all() {
                    Ok(()) => ScreenAction::StatusMessage("All classes cleared".to_string()),
                    Err(e) => ScreenAction::StatusMessage(format!("Cleared, but saving failed: {:#}", e)),
                };
                self.clamp_selection();
                action
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.mode = Mode::Browse;
                ScreenAction::None
            }
            _ => ScreenAction::None,
        }
    }

    fn class_item(&self, class: &ClassSession) -> ListItem<'static> {
        let color = parse_hex(&class.color);
        ListItem::new(vec![
            Line::from(Span::styled(class.time_range(), Style::default().fg(self.theme.muted))),
            Line::from(vec![
                Span::styled("▌", Style::default().fg(color)),
                Span::styled(class.course_name.clone(), Style::default().fg(self.theme.foreground)),
            ]),
        ])
    }

    fn draw_calendar(&mut self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 7); 7])
            .split(area);

        for (day, column) in Weekday::ALL.into_iter().zip(columns.iter()) {
            let classes = self.scheduler.classes_for_day(day);
            let items: Vec<ListItem> = classes.iter().map(|c| self.class_item(c)).collect();
            let focused = day == self.selected_day;

            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ({})", day.short_name(), classes.len()))
                .border_style(if focused {
                    Style::default().fg(self.theme.accent)
                } else {
                    Style::default().fg(self.theme.muted)
                });
            let list = List::new(items).block(block);

            if focused {
                let list = list
                    .highlight_style(
                        Style::default()
                            .bg(self.theme.highlight)
                            .add_modifier(Modifier::BOLD),
                    )
                    .highlight_symbol("►");
                let garnished = GarnishableStatefulWidget::garnish(list, HalfShadow::default());
                f.render_stateful_widget(garnished, *column, &mut self.class_state);
            } else {
                f.render_widget(list, *column);
            }
        }
    }

    fn draw_details(&self, f: &mut Frame, area: Rect) {
        let text = match self.selected_class() {
            Some(class) => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        class.course_name.clone(),
                        Style::default()
                            .fg(parse_hex(&class.color))
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!(
                        "{}  {} - {}  ({})",
                        class.day,
                        class.start_time.to_12h(),
                        class.end_time.to_12h(),
                        format_duration(class.duration_minutes())
                    )),
                    Line::from(format!("📍 {}", class.location)),
                ];
                if let Some(description) = &class.description {
                    lines.push(Line::from(format!("📝 {}", description)));
                }
                lines
            }
            None => vec![Line::from(Span::styled(
                format!("No classes on {}. Press a to add one.", self.selected_day),
                Style::default().fg(self.theme.muted),
            ))],
        };

        let details = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Details"))
            .style(Style::default().fg(self.theme.foreground))
            .wrap(Wrap { trim: true });
        f.render_widget(details.garnish(Padding::horizontal(1)), area);
    }

    fn draw_confirm(&self, f: &mut Frame, area: Rect) {
        let modal = centered_rect(50, 5, area);
        f.render_widget(Clear, modal);
        let prompt = Paragraph::new(vec![
            Line::from(format!("Clear all {} classes?", self.class_count())),
            Line::from(Span::styled(
                "This cannot be undone. (y/n)",
                Style::default().fg(self.theme.error),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Clear Schedule")
                .border_style(Style::default().fg(self.theme.error)),
        );
        f.render_widget(prompt.garnish(HalfShadow::default()), modal);
    }
}

#[async_trait]
impl Screen for ScheduleScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(6),    // Weekly calendar
                Constraint::Length(7), // Details
            ])
            .split(area);

        self.draw_calendar(f, rows[0]);
        self.draw_details(f, rows[1]);

        match &mut self.mode {
            Mode::Browse => {}
            Mode::Form(form) => {
                let warning = form
                    .to_session()
                    .ok()
                    .map(|class| self.scheduler.detect_conflict(&class))
                    .and_then(|conflict| conflict.message);
                form.draw(f, area, &self.theme, warning.as_deref());
            }
            Mode::FreeSlots(finder) => finder.draw(f, area, &self.theme),
            Mode::ConfirmClear => self.draw_confirm(f, area),
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) -> ScreenAction {
        match &mut self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::ConfirmClear => self.handle_confirm_key(key),
            Mode::Form(form) => {
                let editing = form.is_editing();
                match form.handle_key(key) {
                    ModalOutcome::Stay => ScreenAction::None,
                    ModalOutcome::Close => {
                        self.mode = Mode::Browse;
                        ScreenAction::None
                    }
                    ModalOutcome::Submit(class) => self.save_class(class, editing),
                }
            }
            Mode::FreeSlots(finder) => match finder.handle_key(key, &self.scheduler) {
                ModalOutcome::Stay => ScreenAction::None,
                ModalOutcome::Close => {
                    self.mode = Mode::Browse;
                    ScreenAction::None
                }
                ModalOutcome::Submit(0) => {
                    ScreenAction::StatusMessage("No free slots of that length".to_string())
                }
                ModalOutcome::Submit(count) => {
                    ScreenAction::StatusMessage(format!("{} free slots found", count))
                }
            },
        }
    }

    fn captures_input(&self) -> bool {
        matches!(self.mode, Mode::Form(_))
    }
}
