use ratatui::{
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use scalehead_core::header::BodyContext;

use crate::theme::Theme;

/// Builds the scrolling body from the body render context
///
/// The body is a list of rows, each `row_units` tall in scroll units.
/// Overscroll above the top shows as blank rows with a refresh hint.
pub struct BodyWidget;

impl BodyWidget {
    pub fn build(context: &BodyContext, theme: &Theme, row_units: f64) -> Paragraph<'static> {
        let row_units = row_units.max(1.0);
        let total_rows = (context.content_height / row_units).floor() as i64;
        let visible_rows = (context.viewport_height / row_units).ceil() as i64;
        let first_row = (context.content_offset_y / row_units).floor() as i64;

        let mut lines = Vec::with_capacity(visible_rows.max(0) as usize);
        for row in first_row..first_row + visible_rows {
            let line = if row < 0 {
                if row == first_row {
                    Line::from(Span::styled(
                        "  ↓ release to refresh",
                        Style::default().fg(theme.yellow),
                    ))
                } else {
                    Line::default()
                }
            } else if row < total_rows {
                let style = if row % 2 == 0 {
                    Style::default().fg(theme.fg0)
                } else {
                    Style::default().fg(theme.fg1).bg(theme.bg1)
                };
                Line::from(Span::styled(format!("  Item {:>4}", row + 1), style))
            } else if row == total_rows {
                Line::from(Span::styled(
                    "  ↑ pull to load more",
                    Style::default().fg(theme.grey1),
                ))
            } else {
                Line::default()
            };
            lines.push(line);
        }

        Paragraph::new(lines).style(Style::default().bg(theme.bg0))
    }
}
