use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use scalehead_core::header::{HeaderContext, SnapState};

use crate::theme::Theme;

const GAUGE_WIDTH: usize = 20;

/// Builds the header paragraph from the header render context
pub struct HeaderWidget;

impl HeaderWidget {
    pub fn build(context: &HeaderContext, theme: &Theme, title: &str) -> Paragraph<'static> {
        let title_style = if context.progress > 0.5 {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg0)
        };

        let mut lines = vec![Line::from(Span::styled(title.to_string(), title_style))];

        if context.is_refreshing {
            lines.push(Line::from(Span::styled(
                "Refreshing...",
                Style::default().fg(theme.yellow),
            )));
        }

        // Expanded-only details, hidden as the header shrinks
        let filled = (context.progress * GAUGE_WIDTH as f64).round() as usize;
        lines.push(Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(theme.green)),
            Span::styled(
                "░".repeat(GAUGE_WIDTH.saturating_sub(filled)),
                Style::default().fg(theme.grey0),
            ),
            Span::styled(
                format!(" {:>3.0}%", context.progress * 100.0),
                Style::default().fg(theme.fg1),
            ),
        ]));

        let state_color = match context.snap_state {
            SnapState::Expanded => theme.green,
            SnapState::Collapsed => theme.blue,
            SnapState::Custom(_) => theme.orange,
        };
        lines.push(Line::from(vec![
            Span::styled("state ", Style::default().fg(theme.grey1)),
            Span::styled(context.snap_state.to_string(), Style::default().fg(state_color)),
            Span::styled("  snap ", Style::default().fg(theme.grey1)),
            Span::styled(context.snap_mode.label(), Style::default().fg(theme.fg1)),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "height {:.1} of {:.0}..{:.0}",
                context.height, context.min_height, context.max_height
            ),
            Style::default().fg(theme.grey1),
        )));

        Paragraph::new(lines)
            .style(Style::default().bg(theme.bg1))
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(theme.grey0)),
            )
    }
}
