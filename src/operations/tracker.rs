use crate::error::{AppError, SubmitError};
use crate::operations::chart::render_stats;
use crate::operations::dialog::{render_dialog, Dialog};
use crate::operations::entry_form::{render_form, EntryForm, FormAction};
use crate::operations::summary::SummaryView;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use rusqlite::Connection;
use std::io;

pub const WINDOW_TITLE: &str = "Personal Finance Tracker";

/// Current local date in the form the date field expects.
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Owns the store connection and all UI state for the lifetime of the process.
pub struct FinanceTracker {
    conn: Connection,
    pub form: EntryForm,
    pub stats: SummaryView,
    pub dialog: Option<Dialog>,
    quit: bool,
}

impl FinanceTracker {
    /// Builds the form and draws the initial summary.
    pub fn new(conn: Connection, today: &str) -> Self {
        let mut tracker = Self {
            conn,
            form: EntryForm::new(today),
            stats: SummaryView::new(),
            dialog: None,
            quit: false,
        };
        tracker.refresh_stats();
        tracker
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Runs the whole add flow synchronously: persist, re-read, recompute, notify.
    pub fn submit(&mut self, today: &str) {
        match self.form.submit(&self.conn, today) {
            Ok(_) => {
                if self.refresh_stats() {
                    self.dialog = Some(Dialog::info("Success", "Transaction added successfully!"));
                }
            }
            Err(err @ SubmitError::InvalidAmount(_)) => {
                self.dialog = Some(Dialog::error("Error", err.to_string()));
            }
            Err(err) => {
                tracing::error!("Failed to add transaction: {}", err);
                self.dialog = Some(Dialog::error("Error", err.to_string()));
            }
        }
    }

    /// Returns false when the store could not be read; the error is shown in a dialog.
    fn refresh_stats(&mut self) -> bool {
        match self.stats.refresh(&self.conn) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!("Failed to refresh summary: {}", err);
                self.dialog = Some(Dialog::error("Error", format!("Failed to update statistics: {}", err)));
                false
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, today: &str) {
        // Many terminals emit both a Press and a Release event. Only act on Press/Repeat.
        if key.kind == KeyEventKind::Release {
            return;
        }

        if self.dialog.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dialog = None;
            }
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => self.quit = true,
            KeyCode::Char('s') if ctrl => self.submit(today),
            _ => {
                if self.form.handle_key(key) == FormAction::Submit {
                    self.submit(today);
                }
            }
        }
    }
}

pub fn run_tracker(tracker: &mut FinanceTracker) -> Result<(), AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let result = event_loop(tracker);

    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;

    result
}

fn event_loop(tracker: &mut FinanceTracker) -> Result<(), AppError> {
    let backend = ratatui::backend::CrosstermBackend::new(io::stdout());
    let mut terminal = ratatui::Terminal::new(backend)?;

    while !tracker.should_quit() {
        terminal.draw(|frame| render(frame, tracker))?;

        if event::poll(std::time::Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => tracker.handle_key(key, &today()),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    tracing::info!("Window closed");
    Ok(())
}

fn render(frame: &mut ratatui::Frame, tracker: &FinanceTracker) {
    let size = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(3)])
        .split(size);

    render_header(frame, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(layout[1]);

    render_form(frame, body[0], &tracker.form);
    render_stats(frame, body[1], &tracker.stats);
    render_footer(frame, layout[2], tracker);

    if let Some(dialog) = &tracker.dialog {
        render_dialog(frame, size, dialog);
    }
}

fn render_header(frame: &mut ratatui::Frame, area: Rect) {
    let line = Line::from(vec![Span::styled(WINDOW_TITLE, Style::default().fg(Color::Cyan).bold())]);
    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut ratatui::Frame, area: Rect, tracker: &FinanceTracker) {
    let hint = if tracker.dialog.is_some() {
        "Enter/Esc close"
    } else {
        "Tab/↑/↓ move  ←/→ pick category or type  Enter next/add  Ctrl+S add  Esc/Ctrl+Q exit"
    };

    frame.render_widget(
        Paragraph::new(hint)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true }),
        area,
    );
}
