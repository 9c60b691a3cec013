use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            let recent = app.recent_events();
            format!(
                " {} | offset {:.0} | scrolls {} | {}",
                app.view.snap_mode().label(),
                app.surface.offset(),
                app.event_log.scrolls(),
                if recent.is_empty() {
                    "no events".to_string()
                } else {
                    recent.join(" > ")
                }
            )
        };

        let help_hint = " q:quit j/k:drag ^d/^u:flick e/c:expand/collapse m:mode ";
        let padding_len = area
            .width
            .saturating_sub(status_text.chars().count() as u16 + help_hint.len() as u16)
            as usize;

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey1).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
