use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use ratatui::widgets::Paragraph;
use scalehead_core::header::{
    BodyContext, HeaderContext, ScalingHeaderScrollView, ScrollCallbacks, SnapState,
};
use scalehead_core::AppConfig;

use crate::input::Action;
use crate::keymap::Keymap;
use crate::surface::TerminalScrollSurface;
use crate::theme::{load_theme, Theme};
use crate::widgets::{BodyWidget, HeaderWidget};

pub type HeaderHook = Box<dyn FnMut(&HeaderContext) -> Paragraph<'static>>;
pub type BodyHook = Box<dyn FnMut(&BodyContext) -> Paragraph<'static>>;

const EVENT_LOG_LEN: usize = 4;
const LOAD_MORE_ROWS: usize = 20;
/// Simulated refresh latency
const REFRESH_DURATION: Duration = Duration::from_millis(800);
const FLICK_VELOCITY_FACTOR: f64 = 2.0;

/// Callback events kept for the status bar
#[derive(Debug, Default)]
pub struct EventLog {
    recent: RefCell<VecDeque<&'static str>>,
    scrolls: Cell<u64>,
}

impl EventLog {
    fn push(&self, name: &'static str) {
        let mut recent = self.recent.borrow_mut();
        if recent.len() == EVENT_LOG_LEN {
            recent.pop_front();
        }
        recent.push_back(name);
    }

    pub fn scrolls(&self) -> u64 {
        self.scrolls.get()
    }
}

fn logging_callbacks(log: &Rc<EventLog>) -> ScrollCallbacks {
    let push = |name: &'static str| {
        let log = log.clone();
        move || {
            tracing::debug!(event = name, "Scroll callback");
            log.push(name)
        }
    };
    ScrollCallbacks::new()
        .on_scroll({
            let log = log.clone();
            move |_| log.scrolls.set(log.scrolls.get() + 1)
        })
        .on_reached_bottom(push("reached_bottom"))
        .on_pull_to_refresh(push("pull_to_refresh"))
        .on_pull_to_load_more(push("pull_to_load_more"))
        .on_drag_end(push("drag_ended"))
        .on_deceleration_end(push("deceleration_ended"))
        .on_will_end_dragging({
            let log = log.clone();
            move |velocity| {
                tracing::debug!(velocity, "Will end dragging");
                log.push("will_end_dragging")
            }
        })
}

/// Terminal host of the scaling header
pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    pub keymap: Keymap,
    pub view: ScalingHeaderScrollView<HeaderHook, BodyHook>,
    pub surface: TerminalScrollSurface,
    pub event_log: Rc<EventLog>,
    pub status_message: Option<String>,
    pub should_quit: bool,
    body_rows: usize,
    refresh_started: Option<Instant>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let theme = load_theme(&config.ui.theme);
        let keymap = Keymap::from_config(&config.keymap);
        let row_units = config.scroll.row_units.max(1.0);
        let event_log = Rc::new(EventLog::default());

        let header: HeaderHook = {
            let theme = theme.clone();
            Box::new(move |context: &HeaderContext| {
                HeaderWidget::build(context, &theme, " scalehead ")
            })
        };
        let body: BodyHook = {
            let theme = theme.clone();
            Box::new(move |context: &BodyContext| BodyWidget::build(context, &theme, row_units))
        };

        let view = ScalingHeaderScrollView::from_config(&config, header, body)
            .with_callbacks(logging_callbacks(&event_log));
        let body_rows = config.ui.body_rows;
        let surface = TerminalScrollSurface::new(body_rows as f64 * row_units, 0.0);

        Self {
            config,
            theme,
            keymap,
            view,
            surface,
            event_log,
            status_message: None,
            should_quit: false,
            body_rows,
            refresh_started: None,
        }
    }

    #[inline]
    fn row_units(&self) -> f64 {
        self.config.scroll.row_units.max(1.0)
    }

    pub fn body_rows(&self) -> usize {
        self.body_rows
    }

    /// Terminal rows currently taken by the header
    pub fn header_rows(&self) -> u16 {
        (self.view.header_height() / self.row_units()).ceil() as u16
    }

    /// Viewport of the scroll surface, in terminal rows
    pub fn set_viewport_rows(&mut self, rows: u16) {
        self.surface
            .set_viewport_height(f64::from(rows) * self.row_units());
    }

    /// Whether the next poll should run at animation rate
    pub fn needs_fast_update(&self) -> bool {
        self.surface.is_active() || self.view.needs_update() || self.refresh_started.is_some()
    }

    pub fn recent_events(&self) -> Vec<&'static str> {
        self.event_log.recent.borrow().iter().copied().collect()
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) {
        let row_units = self.row_units();
        let flick = self.config.scroll.flick_velocity * FLICK_VELOCITY_FACTOR;

        match action {
            Action::Quit => self.should_quit = true,
            Action::DragDown => self.surface.drag_by(row_units, now),
            Action::DragUp => self.surface.drag_by(-row_units, now),
            Action::FlickDown => self.surface.flick(flick, now),
            Action::FlickUp => self.surface.flick(-flick, now),
            Action::Expand => self.view.set_snap_state(SnapState::Expanded, now),
            Action::Collapse => self.view.set_snap_state(SnapState::Collapsed, now),
            Action::CycleSnapMode => {
                let mode = self.view.snap_mode().next();
                self.view.reset_snap_mode(mode, now);
                self.status_message = Some(format!("Snap mode: {}", mode.label()));
            }
            Action::FinishLoading => {
                self.finish_refresh();
                self.load_more();
            }
            Action::None => return,
        }

        if action != Action::CycleSnapMode {
            self.status_message = None;
        }
        self.pump(now);
    }

    /// Advance the surface, deliver its events and step animations
    pub fn tick(&mut self, now: Instant) {
        self.surface.tick(now);
        self.pump(now);

        if let Some(started) = self.refresh_started {
            if now.saturating_duration_since(started) >= REFRESH_DURATION {
                self.finish_refresh();
            }
        }

        self.view.update(now);
    }

    fn pump(&mut self, now: Instant) {
        for (phase, metrics) in self.surface.take_events() {
            self.view.handle_at(phase, metrics, now);
        }

        if self.view.is_refreshing() && self.refresh_started.is_none() {
            tracing::info!("Refresh started");
            self.refresh_started = Some(now);
        }
        if self.view.is_loading_more() {
            self.load_more();
        }
    }

    fn finish_refresh(&mut self) {
        if self.refresh_started.take().is_some() {
            tracing::info!("Refresh finished");
            self.view.finish_refreshing();
        }
    }

    fn load_more(&mut self) {
        if !self.view.is_loading_more() {
            return;
        }
        self.body_rows += LOAD_MORE_ROWS;
        self.surface
            .set_content_height(self.body_rows as f64 * self.row_units());
        self.view.finish_loading_more();
        tracing::info!(rows = self.body_rows, "Loaded more rows");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scalehead_core::header::ScrollActivity;
    use scalehead_core::SnapMode;

    use crate::surface::RELEASE_AFTER;

    fn app() -> App {
        let mut config = AppConfig::default();
        config.ui.body_rows = 100;
        config.animation.duration_ms = 100;
        let mut app = App::new(config);
        app.set_viewport_rows(30);
        app
    }

    fn settle(app: &mut App, mut now: Instant) -> Instant {
        for _ in 0..1000 {
            if !app.needs_fast_update() {
                break;
            }
            now += Duration::from_millis(16);
            app.tick(now);
        }
        now
    }

    #[test]
    fn test_flick_down_collapses_header() {
        let mut app = app();
        let now = Instant::now();

        app.handle_action(Action::FlickDown, now);
        assert_eq!(app.view.activity(), ScrollActivity::Decelerating);
        settle(&mut app, now);

        assert_eq!(app.view.snap_state(), SnapState::Collapsed);
        assert_eq!(app.view.header_height(), 24.0);
        assert_eq!(app.header_rows(), 3);
        assert_eq!(app.view.activity(), ScrollActivity::Idle);
        assert!(app.recent_events().contains(&"deceleration_ended"));
    }

    #[test]
    fn test_pull_to_refresh_finishes_after_delay() {
        let mut app = app();
        let now = Instant::now();

        for _ in 0..16 {
            app.handle_action(Action::DragUp, now);
        }
        assert!(app.surface.offset() < -60.0);

        let released = now + RELEASE_AFTER;
        app.tick(released);
        assert!(app.view.is_refreshing());
        assert!(app.recent_events().contains(&"pull_to_refresh"));
        assert!(app.needs_fast_update());

        settle(&mut app, released);
        assert!(!app.view.is_refreshing());
        assert!(app.recent_events().contains(&"deceleration_ended"));
        assert_eq!(app.surface.offset(), 0.0);
    }

    #[test]
    fn test_pull_to_load_more_appends_rows() {
        let mut app = app();
        let now = Instant::now();
        assert_eq!(app.body_rows(), 100);

        // 800 units of content in a 240 unit viewport: max offset 560
        for _ in 0..90 {
            app.handle_action(Action::DragDown, now);
        }
        assert!(app.surface.offset() > 620.0);

        app.tick(now + RELEASE_AFTER);
        assert_eq!(app.body_rows(), 120);
        assert!(!app.view.is_loading_more());
        assert!(app.recent_events().contains(&"pull_to_load_more"));
        assert!(!app.recent_events().contains(&"pull_to_refresh"));
        assert_eq!(app.surface.metrics().content_height, 960.0);
    }

    #[test]
    fn test_cycle_snap_mode() {
        let mut app = app();
        let now = Instant::now();

        app.handle_action(Action::CycleSnapMode, now);
        assert_eq!(app.view.snap_mode(), SnapMode::AfterDeceleration);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Snap mode: after deceleration")
        );

        app.handle_action(Action::DragDown, now);
        assert_eq!(app.status_message, None);
    }

    #[test]
    fn test_programmatic_collapse_and_expand() {
        let mut app = app();
        let now = Instant::now();

        app.handle_action(Action::Collapse, now);
        let now = settle(&mut app, now);
        assert_eq!(app.view.header_height(), 24.0);

        app.handle_action(Action::Expand, now);
        settle(&mut app, now);
        assert_eq!(app.view.header_height(), 96.0);
        assert_eq!(app.header_rows(), 12);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        app.handle_action(Action::Quit, Instant::now());
        assert!(app.should_quit);
    }
}
