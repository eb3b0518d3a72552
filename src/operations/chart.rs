use crate::operations::summary::{format_currency, SummaryView};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

const PALETTE: [Color; 11] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Red,
    Color::LightCyan,
    Color::LightMagenta,
    Color::LightYellow,
    Color::LightGreen,
    Color::LightBlue,
];

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub category: String,
    pub start: f64,
    pub end: f64,
    pub color: Color,
}

/// Angles in radians for each category with a positive total.
///
/// Categories are coloured by their position in `totals`, so a category keeps its
/// colour in the legend even when it has no slice.
pub fn pie_slices(totals: &[(String, Decimal)]) -> Vec<Slice> {
    let total: f64 = totals
        .iter()
        .filter_map(|(_, v)| v.to_f64())
        .filter(|v| *v > 0.0)
        .sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut slices = Vec::new();
    let mut start_angle = 0.0_f64;
    for (idx, (category, amount)) in totals.iter().enumerate() {
        let value = amount.to_f64().unwrap_or(0.0);
        if value <= 0.0 {
            continue;
        }
        let sweep = value / total * std::f64::consts::TAU;
        slices.push(Slice {
            category: category.clone(),
            start: start_angle,
            end: start_angle + sweep,
            color: color_for(idx),
        });
        start_angle += sweep;
    }
    slices
}

fn color_for(idx: usize) -> Color {
    PALETTE[idx % PALETTE.len()]
}

/// Draws the statistics region: summary text above, pie chart and legend below.
///
/// Nothing is drawn inside the region until the first non-empty summary exists.
pub fn render_stats(frame: &mut ratatui::Frame, area: Rect, view: &SummaryView) {
    let block = Block::default().title("Statistics").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(summary) = view.summary() else {
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(6)])
        .split(inner);

    let text: Vec<Line> = summary
        .lines()
        .into_iter()
        .map(Line::from)
        .collect();
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(Block::default().borders(Borders::BOTTOM)),
        layout[0],
    );

    let chart_block = Block::default()
        .title(Line::from("Expenses by Category").centered())
        .borders(Borders::NONE);
    let chart_area = chart_block.inner(layout[1]);
    frame.render_widget(chart_block, layout[1]);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chart_area);

    render_pie(frame, halves[0], &summary.expenses_by_category);
    render_legend(frame, halves[1], &summary.expenses_by_category);
}

fn render_pie(frame: &mut ratatui::Frame, area: Rect, totals: &[(String, Decimal)]) {
    let slices = pie_slices(totals);

    let canvas = Canvas::default()
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            let step = 0.04;
            for slice in &slices {
                let mut points = Vec::new();
                let mut r = 0.0;
                while r <= 1.0 {
                    let mut angle = slice.start;
                    while angle <= slice.end {
                        points.push((r * angle.cos(), r * angle.sin()));
                        angle += 0.05;
                    }
                    r += step;
                }
                if !points.is_empty() {
                    ctx.draw(&Points {
                        coords: &points,
                        color: slice.color,
                    });
                }
            }
        });

    frame.render_widget(canvas, area);
}

fn render_legend(frame: &mut ratatui::Frame, area: Rect, totals: &[(String, Decimal)]) {
    let lines: Vec<Line> = totals
        .iter()
        .enumerate()
        .map(|(idx, (category, amount))| {
            let color = color_for(idx);
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(color)),
                Span::styled(format!("{:14}", category), Style::default().fg(color).bold()),
                Span::raw(format!("{:>10}", format_currency(*amount))),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(values: &[(&str, i64)]) -> Vec<(String, Decimal)> {
        values
            .iter()
            .map(|(c, v)| (c.to_string(), Decimal::from(*v)))
            .collect()
    }

    #[test]
    fn test_pie_slices_cover_full_circle() {
        let slices = pie_slices(&totals(&[("Food", 50), ("Transport", 5)]));

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].start, 0.0);
        assert!((slices[1].end - std::f64::consts::TAU).abs() < 1e-9);
        assert!(slices[0].end > slices[1].end - slices[1].start);
    }

    #[test]
    fn test_pie_slices_skip_non_positive_totals() {
        let slices = pie_slices(&totals(&[("Food", 10), ("Refund", -4), ("Other", 10)]));

        let names: Vec<&str> = slices.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["Food", "Other"]);
        assert_eq!(slices[1].color, color_for(2));
    }

    #[test]
    fn test_pie_slices_empty_when_nothing_positive() {
        assert!(pie_slices(&totals(&[("Refund", -4)])).is_empty());
        assert!(pie_slices(&[]).is_empty());
    }
}
