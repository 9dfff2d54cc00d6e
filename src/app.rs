//! Main application state and event loop.

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::screens::{ScheduleScreen, Screen, ScreenAction};
use crate::services::{ScheduleStorage, Scheduler};

/// Application state.
pub struct App {
    should_quit: bool,
    schedule_screen: ScheduleScreen,

    // Status bar info
    status_message: String,
}

impl App {
    /// Create a new application instance, loading the saved schedule.
    pub async fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        let storage = ScheduleStorage::new(config.data_file());
        let scheduler = Scheduler::open(config.new_index(), storage);
        let schedule_screen = ScheduleScreen::new(scheduler, config.clone());

        let status_message = format!("{} classes loaded", schedule_screen.class_count());

        Ok(Self {
            should_quit: false,
            schedule_screen,
            status_message,
        })
    }

    /// Run the application.
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main event loop
        let result = self.event_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    /// Main event loop.
    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        loop {
            // Draw UI
            terminal.draw(|f| self.draw(f))?;

            // Poll for events with timeout
            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // Global key handlers
                    match (key.modifiers, key.code) {
                        (KeyModifiers::CONTROL, KeyCode::Char('c'))
                        | (KeyModifiers::CONTROL, KeyCode::Char('q')) => {
                            self.should_quit = true;
                        }
                        _ => match self.schedule_screen.handle_key(key).await {
                            ScreenAction::None => {}
                            ScreenAction::StatusMessage(msg) => self.status_message = msg,
                            ScreenAction::Quit => self.should_quit = true,
                        },
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Draw the UI.
    fn draw(&mut self, f: &mut ratatui::Frame) {
        use ratatui::layout::{Constraint, Direction, Layout};
        use ratatui::style::{Modifier, Style};
        use ratatui::text::{Line, Span};
        use ratatui::widgets::{Block, Borders, Paragraph};

        let theme = self.schedule_screen.theme().clone();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title bar
                Constraint::Min(0),    // Main content
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        f.render_widget(
            Block::default().style(Style::default().bg(theme.background).fg(theme.foreground)),
            f.area(),
        );

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                " 📅 Student Scheduler",
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} classes this week", self.schedule_screen.class_count()),
                Style::default().fg(theme.muted),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL).title("class-scheduler"));
        f.render_widget(title, chunks[0]);

        // Main content area
        self.schedule_screen.draw(f, chunks[1]);

        // Status bar
        let key = |k: &'static str| Span::styled(k, Style::default().fg(theme.accent));
        let label = |l: &'static str| Span::styled(l, Style::default().fg(theme.muted));
        let mut spans = vec![
            Span::raw(" "),
            Span::styled(self.status_message.as_str(), Style::default().fg(theme.foreground)),
            Span::raw(" │ "),
        ];
        if self.schedule_screen.captures_input() {
            spans.extend([key("Ctrl+C"), label(" Quit")]);
        } else {
            spans.extend([
                key("a"),
                label(" Add "),
                key("e"),
                label(" Edit "),
                key("d"),
                label(" Delete "),
                key("f"),
                label(" Free slots "),
                key("x/y"),
                label(" Export/Copy "),
                key("t"),
                label(" Theme "),
                key("C"),
                label(" Clear "),
                key("q"),
                label(" Quit"),
            ]);
        }
        f.render_widget(Paragraph::new(Line::from(spans)), chunks[2]);
    }
}
