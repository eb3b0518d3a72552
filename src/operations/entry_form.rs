use crate::db::repository;
use crate::error::SubmitError;
use crate::models::transaction::{NewTransaction, TransactionType, SUGGESTED_CATEGORIES};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::{Alignment, Color, Rect, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Category,
    Amount,
    Type,
    Description,
    Submit,
}

impl Field {
    const ORDER: [Field; 6] = [
        Field::Date,
        Field::Category,
        Field::Amount,
        Field::Type,
        Field::Description,
        Field::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn previous(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn label(self) -> &'static str {
        match self {
            Field::Date => "Date:",
            Field::Category => "Category:",
            Field::Amount => "Amount:",
            Field::Type => "Type:",
            Field::Description => "Description:",
            Field::Submit => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
}

/// The transaction entry form.
#[derive(Debug, Clone)]
pub struct EntryForm {
    pub date: String,
    pub category: String,
    pub amount: String,
    pub transaction_type: TransactionType,
    pub description: String,
    pub focus: Field,
    suggestion: Option<usize>,
}

impl EntryForm {
    /// A blank form with the date set to `today`.
    pub fn new(today: &str) -> Self {
        Self {
            date: today.to_string(),
            category: String::new(),
            amount: String::new(),
            transaction_type: TransactionType::Expense,
            description: String::new(),
            focus: Field::Date,
            suggestion: None,
        }
    }

    /// Validates the amount, stores the transaction and clears the form for the next entry.
    ///
    /// On an invalid amount nothing is stored and every field keeps its value.
    /// Date and category are stored exactly as typed, empty strings included.
    pub fn submit(&mut self, conn: &Connection, today: &str) -> Result<i64, SubmitError> {
        let amount = parse_amount(&self.amount)?;
        let transaction = NewTransaction::new(
            self.date.clone(),
            self.category.clone(),
            amount,
            self.transaction_type,
            self.description.clone(),
        );

        let id = repository::create(conn, &transaction)?;
        tracing::info!(id, "Transaction added");
        self.clear(today);
        Ok(id)
    }

    /// Category and type are kept.
    fn clear(&mut self, today: &str) {
        self.amount.clear();
        self.description.clear();
        self.date = today.to_string();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Enter => {
                if self.focus == Field::Submit {
                    return FormAction::Submit;
                }
                self.focus = self.focus.next();
            }
            KeyCode::Left => self.cycle(-1),
            KeyCode::Right => self.cycle(1),
            KeyCode::Backspace => {
                if let Some(buffer) = self.focused_buffer() {
                    buffer.pop();
                }
            }
            KeyCode::Char(ch) => match self.focus {
                Field::Type => match ch {
                    ' ' => self.transaction_type = self.transaction_type.toggle(),
                    'i' | 'I' => self.transaction_type = TransactionType::Income,
                    'e' | 'E' => self.transaction_type = TransactionType::Expense,
                    _ => {}
                },
                Field::Submit => {
                    if ch == ' ' {
                        return FormAction::Submit;
                    }
                }
                _ => {
                    if let Some(buffer) = self.focused_buffer() {
                        buffer.push(ch);
                    }
                }
            },
            _ => {}
        }
        FormAction::None
    }

    fn focused_buffer(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Date => Some(&mut self.date),
            Field::Category => Some(&mut self.category),
            Field::Amount => Some(&mut self.amount),
            Field::Description => Some(&mut self.description),
            Field::Type | Field::Submit => None,
        }
    }

    /// Left/Right pick a suggested category, or flip the type radio.
    fn cycle(&mut self, delta: isize) {
        match self.focus {
            Field::Category => {
                let len = SUGGESTED_CATEGORIES.len() as isize;
                let next: isize = match self.suggestion {
                    Some(current) => (current as isize + delta).rem_euclid(len),
                    None if delta < 0 => len - 1,
                    None => 0,
                };
                let next = next as usize;
                self.suggestion = Some(next);
                self.category = SUGGESTED_CATEGORIES[next].to_string();
            }
            Field::Type => self.transaction_type = self.transaction_type.toggle(),
            _ => {}
        }
    }
}

/// Accepts plain decimals and scientific notation, ignoring surrounding whitespace.
pub fn parse_amount(input: &str) -> Result<Decimal, SubmitError> {
    let trimmed = input.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| {
            tracing::warn!("Rejected amount '{}'", input);
            SubmitError::InvalidAmount(input.to_string())
        })
}

pub fn render_form(frame: &mut ratatui::Frame, area: Rect, form: &EntryForm) {
    let block = Block::default().title("New Transaction").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    for field in Field::ORDER {
        let focused = form.focus == field;
        let marker = if focused { "➤ " } else { "  " };
        let label_style = if focused {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::White)
        };

        let value: Vec<Span> = match field {
            Field::Date => text_value(&form.date, focused),
            Field::Category => text_value(&form.category, focused),
            Field::Amount => text_value(&form.amount, focused),
            Field::Description => text_value(&form.description, focused),
            Field::Type => vec![
                radio("Expense", form.transaction_type == TransactionType::Expense),
                Span::raw("  "),
                radio("Income", form.transaction_type == TransactionType::Income),
            ],
            Field::Submit => {
                let style = if focused {
                    Style::default().bg(Color::DarkGray).fg(Color::White).bold()
                } else {
                    Style::default().fg(Color::White)
                };
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::raw(marker),
                    Span::styled("[ Add Transaction ]", style),
                ]));
                continue;
            }
        };

        let mut spans = vec![
            Span::raw(marker),
            Span::styled(format!("{:13}", field.label()), label_style),
        ];
        spans.extend(value);
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    if form.focus == Field::Category {
        lines.push(Line::from(Span::styled(
            format!("Suggestions: {}", SUGGESTED_CATEGORIES.join(", ")),
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), inner);
}

fn text_value(value: &str, focused: bool) -> Vec<Span<'_>> {
    let mut spans = vec![Span::styled(value, Style::default().fg(Color::Yellow))];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
    }
    spans
}

fn radio(label: &'static str, selected: bool) -> Span<'static> {
    if selected {
        Span::styled(format!("(•) {}", label), Style::default().fg(Color::Yellow))
    } else {
        Span::raw(format!("( ) {}", label))
    }
}
