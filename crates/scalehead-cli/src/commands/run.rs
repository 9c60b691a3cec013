use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use scalehead_core::AppConfig;
use scalehead_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{handle_key_event, handle_mouse_event},
    widgets::StatusBarWidget,
};

pub async fn run(config: AppConfig) -> Result<()> {
    let event_handler =
        EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.animation.fps);
    let mut app = App::new(config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("scalehead"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    tracing::info!(
        snap_mode = app.view.snap_mode().label(),
        rows = app.body_rows(),
        "Starting interactive demo"
    );

    let result = main_loop(&mut terminal, &mut app, &event_handler);

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

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            let size = frame.area();
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(size);

            // The body viewport is whatever the header leaves
            let header_rows = app.header_rows().min(main_layout[0].height);
            app.set_viewport_rows(main_layout[0].height.saturating_sub(header_rows));

            let content = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(header_rows), Constraint::Min(0)])
                .split(main_layout[0]);

            let (header, body) = app.view.render();
            frame.render_widget(header, content[0]);
            frame.render_widget(body, content[1]);
            StatusBarWidget::render(frame, main_layout[1], app);
        })?;

        // Use the faster tick rate while scrolling or animating
        let event = if app.needs_fast_update() {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };

        let now = Instant::now();
        match event {
            Some(AppEvent::Key(key)) => {
                let action = handle_key_event(key, &app.keymap);
                app.handle_action(action, now);
            }
            Some(AppEvent::Mouse(mouse)) => {
                app.handle_action(handle_mouse_event(mouse), now);
            }
            Some(AppEvent::Resize(width, height)) => {
                tracing::debug!(width, height, "Terminal resized");
            }
            Some(AppEvent::Tick) | None => {}
        }
        app.tick(now);

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
