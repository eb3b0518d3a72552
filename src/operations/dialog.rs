use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
}

/// A modal notification. While one is open it swallows all input except dismissal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

impl Dialog {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

pub fn render_dialog(frame: &mut ratatui::Frame, area: Rect, dialog: &Dialog) {
    let popup_area = centered_rect(50, 25, area);
    frame.render_widget(Clear, popup_area);

    let color = match dialog.kind {
        DialogKind::Info => Color::Green,
        DialogKind::Error => Color::Red,
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![Span::styled(dialog.message.as_str(), Style::default().fg(color).bold())]),
        Line::from(""),
        Line::from(Span::styled("[ OK ]  Enter/Esc", Style::default().fg(Color::DarkGray))),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(dialog.title.as_str());
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        popup_area,
    );
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 100, 100);
        let popup = centered_rect(50, 20, area);

        assert_eq!(popup, Rect::new(25, 40, 50, 20));
    }
}
