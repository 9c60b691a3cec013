use std::time::Instant;

use crate::animation::HeightAnimator;
use crate::config::{AnimationConfig, AppConfig};
use crate::geometry::Frame;

use super::delegate::{
    ScrollCallbacks, ScrollEvent, ScrollEventDelegate, ScrollEventSink, ScrollMetrics, ScrollPhase,
};
use super::frame_tracker::FrameTracker;
use super::snap::{HeaderSnapController, SnapMode, SnapState, SnapTrigger};

/// Expansion ratio of the header for body offset `offset`
///
/// `offset` is the displacement of the body content since its starting
/// rect, so it is 0 at rest and negative once the user scrolls into the
/// body. A header with `max_height == min_height` is always fully expanded.
pub fn progress_for_offset(offset: f64, min_height: f64, max_height: f64) -> f64 {
    let range = max_height - min_height;
    if range <= 0.0 {
        return 1.0;
    }
    ((max_height + offset) / range).clamp(0.0, 1.0)
}

#[inline]
pub fn height_for_progress(progress: f64, min_height: f64, max_height: f64) -> f64 {
    min_height + progress * (max_height - min_height)
}

/// What the scroll surface is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollActivity {
    Idle,
    Dragging,
    Decelerating,
}

/// Input of the header render hook
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderContext {
    pub height: f64,
    pub min_height: f64,
    pub max_height: f64,
    /// 1 when fully expanded, 0 when fully collapsed
    pub progress: f64,
    pub collapse_progress: f64,
    pub snap_state: SnapState,
    pub snap_mode: SnapMode,
    pub is_refreshing: bool,
    pub is_loading_more: bool,
}

/// Input of the body render hook
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyContext {
    /// Space reserved above the content for the header
    pub top_inset: f64,
    /// Displacement of the content since its starting rect
    pub body_offset: f64,
    pub content_offset_y: f64,
    pub content_height: f64,
    pub viewport_height: f64,
}

/// Composition root of the scaling header
///
/// Owns the frame tracker, event delegate, snap controller and height
/// animator, and hands the derived header state to the caller's render hooks.
/// Events must be delivered in the order the scroll surface emits them.
pub struct ScalingHeaderScrollView<H, B> {
    header: H,
    body: B,
    delegate: ScrollEventDelegate,
    snap: HeaderSnapController,
    frame: FrameTracker,
    animator: HeightAnimator,
    callbacks: ScrollCallbacks,
    metrics: ScrollMetrics,
    activity: ScrollActivity,
    is_refreshing: bool,
    is_loading_more: bool,
}

impl<H, B> ScalingHeaderScrollView<H, B> {
    pub fn new(min_height: f64, max_height: f64, snap_mode: SnapMode, header: H, body: B) -> Self {
        let snap = HeaderSnapController::new(snap_mode, min_height, max_height);
        let animator = HeightAnimator::new(AnimationConfig::default(), snap.max_height());
        Self {
            header,
            body,
            delegate: ScrollEventDelegate::default(),
            snap,
            frame: FrameTracker::new(),
            animator,
            callbacks: ScrollCallbacks::default(),
            metrics: ScrollMetrics::default(),
            activity: ScrollActivity::Idle,
            is_refreshing: false,
            is_loading_more: false,
        }
    }

    pub fn from_config(config: &AppConfig, header: H, body: B) -> Self {
        let (min, max) = config.header.normalized_heights();
        Self::new(min, max, config.header.snap_mode, header, body)
            .with_pull_threshold(config.scroll.pull_threshold)
            .with_flick_velocity(config.scroll.flick_velocity)
            .with_animation(config.animation.clone())
    }

    pub fn with_callbacks(mut self, callbacks: ScrollCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn with_animation(mut self, config: AnimationConfig) -> Self {
        self.animator = HeightAnimator::new(config, self.animator.height());
        self
    }

    pub fn with_pull_threshold(mut self, pull_threshold: f64) -> Self {
        self.delegate = ScrollEventDelegate::new(pull_threshold);
        self
    }

    pub fn with_flick_velocity(mut self, flick_velocity: f64) -> Self {
        self.snap = self.snap.with_flick_velocity(flick_velocity);
        self
    }

    /// Swap in a fresh snap controller for `mode` and settle expanded
    pub fn reset_snap_mode(&mut self, mode: SnapMode, now: Instant) {
        let flick_velocity = self.snap.flick_velocity();
        self.snap = HeaderSnapController::new(mode, self.snap.min_height(), self.snap.max_height())
            .with_flick_velocity(flick_velocity);
        tracing::info!(mode = mode.label(), "Snap mode changed");
        self.animator.animate_to(self.snap.max_height(), now);
    }

    #[inline]
    pub fn snap_mode(&self) -> SnapMode {
        self.snap.mode()
    }

    #[inline]
    pub fn snap_state(&self) -> SnapState {
        self.snap.current()
    }

    #[inline]
    pub fn activity(&self) -> ScrollActivity {
        self.activity
    }

    #[inline]
    pub fn header_height(&self) -> f64 {
        self.animator.height()
    }

    #[inline]
    pub fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    pub fn is_refreshing(&self) -> bool {
        self.is_refreshing
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    pub fn finish_refreshing(&mut self) {
        self.is_refreshing = false;
    }

    pub fn finish_loading_more(&mut self) {
        self.is_loading_more = false;
    }

    /// Whether an animation needs frames
    pub fn needs_update(&self) -> bool {
        self.animator.is_animating()
    }

    /// Displacement of the body content since its starting rect
    pub fn body_offset(&self) -> f64 {
        self.frame
            .offset_from_start()
            .unwrap_or(-self.metrics.content_offset_y)
    }

    pub fn header_context(&self) -> HeaderContext {
        let height = self.animator.height();
        let (min, max) = (self.snap.min_height(), self.snap.max_height());
        let progress = if max > min {
            ((height - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            1.0
        };
        HeaderContext {
            height,
            min_height: min,
            max_height: max,
            progress,
            collapse_progress: 1.0 - progress,
            snap_state: self.snap.current(),
            snap_mode: self.snap.mode(),
            is_refreshing: self.is_refreshing,
            is_loading_more: self.is_loading_more,
        }
    }

    pub fn body_context(&self) -> BodyContext {
        BodyContext {
            top_inset: self.animator.height(),
            body_offset: self.body_offset(),
            content_offset_y: self.metrics.content_offset_y,
            content_height: self.metrics.content_height,
            viewport_height: self.metrics.viewport_height,
        }
    }

    pub fn handle(&mut self, phase: ScrollPhase, metrics: ScrollMetrics) {
        self.handle_at(phase, metrics, Instant::now());
    }

    /// Deliver one scroll-surface event
    ///
    /// A host that lets the user catch content mid-momentum must send
    /// `EndedDecelerating` before the `Scrolling` of the new drag. Until
    /// then offsets count as momentum and the header stays frozen.
    pub fn handle_at(&mut self, phase: ScrollPhase, metrics: ScrollMetrics, now: Instant) {
        let previous_offset = self.body_offset();
        self.metrics = metrics;

        match phase {
            ScrollPhase::Scrolling => {
                self.frame.observe(Frame::new(
                    0.0,
                    -metrics.content_offset_y,
                    0.0,
                    metrics.content_height,
                ));
                if self.activity == ScrollActivity::Idle {
                    self.activity = ScrollActivity::Dragging;
                    self.animator.cancel();
                }
            }
            ScrollPhase::EndedDragging => {
                if self.activity == ScrollActivity::Dragging {
                    self.activity = ScrollActivity::Idle;
                }
            }
            ScrollPhase::WillDecelerate => self.activity = ScrollActivity::Decelerating,
            ScrollPhase::EndedDecelerating => self.activity = ScrollActivity::Idle,
            ScrollPhase::WillEndDragging { .. } => {}
        }

        let mut events = Vec::new();
        self.delegate.dispatch(phase, &metrics, &mut events);

        for event in events {
            self.route(event, previous_offset, now);
            self.callbacks.send(event);
        }
    }

    fn route(&mut self, event: ScrollEvent, previous_offset: f64, now: Instant) {
        match event {
            ScrollEvent::Scrolled(_) => self.track_offset(previous_offset),
            ScrollEvent::WillEndDragging { velocity_y } => {
                self.settle(SnapTrigger::WillEndDragging { velocity_y }, now)
            }
            ScrollEvent::DecelerationEnded => self.settle(SnapTrigger::DidEndDecelerating, now),
            ScrollEvent::PullToRefresh => {
                tracing::debug!(offset = self.metrics.content_offset_y, "Pull to refresh");
                self.is_refreshing = true;
            }
            ScrollEvent::PullToLoadMore => {
                tracing::debug!(offset = self.metrics.content_offset_y, "Pull to load more");
                self.is_loading_more = true;
            }
            ScrollEvent::ReachedBottom | ScrollEvent::DragEnded => {}
        }
    }

    fn track_offset(&mut self, previous_offset: f64) {
        let (min, max) = (self.snap.min_height(), self.snap.max_height());
        let continuous =
            |offset| height_for_progress(progress_for_offset(offset, min, max), min, max);

        match self.snap.mode() {
            SnapMode::Disabled => self.animator.set_height(continuous(self.body_offset())),
            _ if self.activity == ScrollActivity::Dragging => {
                let delta = continuous(self.body_offset()) - continuous(previous_offset);
                let height = (self.animator.height() + delta).clamp(min, max);
                self.animator.set_height(height);
            }
            // frozen between snaps
            _ => {}
        }
    }

    fn settle(&mut self, trigger: SnapTrigger, now: Instant) {
        if let Some(decision) = self.snap.decide(trigger, self.animator.height()) {
            self.animator.animate_to(decision.height, now);
        }
    }

    /// Request an explicit header height, clamped into `[min, max]`
    pub fn set_header_height(&mut self, height: f64, now: Instant) {
        let decision = self.snap.request_height(height);
        self.animator.animate_to(decision.height, now);
    }

    /// Programmatically expand or collapse the header
    pub fn set_snap_state(&mut self, state: SnapState, now: Instant) {
        let decision = self.snap.request_state(state);
        self.animator.animate_to(decision.height, now);
    }

    /// Advance animations to `now` and return the header height
    pub fn update(&mut self, now: Instant) -> f64 {
        self.animator.update(now)
    }

    /// Run both render hooks with the current header and body state
    pub fn render<HO, BO>(&mut self) -> (HO, BO)
    where
        H: FnMut(&HeaderContext) -> HO,
        B: FnMut(&BodyContext) -> BO,
    {
        let header = self.header_context();
        let body = self.body_context();
        ((self.header)(&header), (self.body)(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    type Hook<T> = fn(&T) -> f64;

    fn header_height(context: &HeaderContext) -> f64 {
        context.height
    }

    fn body_inset(context: &BodyContext) -> f64 {
        context.top_inset
    }

    fn view(mode: SnapMode) -> ScalingHeaderScrollView<Hook<HeaderContext>, Hook<BodyContext>> {
        let header: Hook<HeaderContext> = header_height;
        let body: Hook<BodyContext> = body_inset;
        ScalingHeaderScrollView::new(0.0, 200.0, mode, header, body)
            .with_animation(AnimationConfig {
                enabled: true,
                duration_ms: 100,
                easing: crate::config::EasingType::Linear,
                fps: 60,
            })
    }

    fn at(offset: f64) -> ScrollMetrics {
        ScrollMetrics::new(offset, 2000.0, 600.0)
    }

    fn drag(
        view: &mut ScalingHeaderScrollView<Hook<HeaderContext>, Hook<BodyContext>>,
        offsets: &[f64],
        now: Instant,
    ) {
        for offset in offsets {
            view.handle_at(ScrollPhase::Scrolling, at(*offset), now);
        }
    }

    #[test]
    fn test_progress_ratio_clamped() {
        assert_eq!(progress_for_offset(-200.0, 0.0, 200.0), 0.0);
        assert_eq!(progress_for_offset(-500.0, 0.0, 200.0), 0.0);
        assert_eq!(progress_for_offset(0.0, 0.0, 200.0), 1.0);
        assert_eq!(progress_for_offset(80.0, 0.0, 200.0), 1.0);
        assert!((progress_for_offset(-50.0, 0.0, 200.0) - 0.75).abs() < 1e-9);

        assert_eq!(progress_for_offset(-100.0, 40.0, 200.0), 0.625);
        assert_eq!(progress_for_offset(-40.0, 40.0, 200.0), 1.0);
        assert_eq!(progress_for_offset(-300.0, 40.0, 200.0), 0.0);
    }

    #[test]
    fn test_equal_heights_give_constant_progress() {
        for offset in [-1000.0, -1.0, 0.0, 50.0] {
            assert_eq!(progress_for_offset(offset, 80.0, 80.0), 1.0);
        }
        assert_eq!(height_for_progress(1.0, 80.0, 80.0), 80.0);
    }

    #[test]
    fn test_disabled_mode_tracks_offset() {
        let mut view = view(SnapMode::Disabled);
        let now = Instant::now();
        drag(&mut view, &[0.0, 50.0], now);
        assert_eq!(view.header_height(), 150.0);

        drag(&mut view, &[400.0], now);
        assert_eq!(view.header_height(), 0.0);

        view.handle_at(ScrollPhase::WillEndDragging { velocity_y: 0.0 }, at(400.0), now);
        view.handle_at(ScrollPhase::EndedDragging, at(400.0), now);
        view.handle_at(ScrollPhase::WillDecelerate, at(400.0), now);
        drag(&mut view, &[120.0], now);
        assert_eq!(view.header_height(), 80.0);
        assert_eq!(view.snap_state(), SnapState::Expanded);
    }

    #[test]
    fn test_immediate_snaps_on_release() {
        let mut view = view(SnapMode::Immediate);
        let start = Instant::now();
        drag(&mut view, &[0.0, 60.0, 120.0], start);
        assert_eq!(view.header_height(), 80.0);

        view.handle_at(ScrollPhase::WillEndDragging { velocity_y: 0.2 }, at(120.0), start);
        assert_eq!(view.snap_state(), SnapState::Collapsed);
        assert!(view.needs_update());

        view.handle_at(ScrollPhase::EndedDragging, at(120.0), start);
        view.handle_at(ScrollPhase::WillDecelerate, at(120.0), start);

        // momentum offsets do not move the settling header
        drag(&mut view, &[10.0], start);
        assert_eq!(view.update(start + Duration::from_millis(200)), 0.0);
    }

    #[test]
    fn test_after_deceleration_waits_for_rest() {
        let mut view = view(SnapMode::AfterDeceleration);
        let start = Instant::now();
        drag(&mut view, &[0.0, 30.0], start);
        assert_eq!(view.header_height(), 170.0);

        view.handle_at(ScrollPhase::WillEndDragging { velocity_y: 4.0 }, at(30.0), start);
        view.handle_at(ScrollPhase::EndedDragging, at(30.0), start);
        view.handle_at(ScrollPhase::WillDecelerate, at(30.0), start);
        drag(&mut view, &[90.0, 130.0], start);
        assert_eq!(view.header_height(), 170.0);
        assert!(!view.needs_update());

        view.handle_at(ScrollPhase::EndedDecelerating, at(130.0), start);
        assert_eq!(view.snap_state(), SnapState::Expanded);
        assert_eq!(view.update(start + Duration::from_millis(100)), 200.0);
    }

    #[test]
    fn test_drag_after_snap_does_not_jump() {
        let mut view = view(SnapMode::Immediate);
        let start = Instant::now();
        drag(&mut view, &[0.0, 150.0], start);
        view.handle_at(ScrollPhase::WillEndDragging { velocity_y: 0.0 }, at(150.0), start);
        view.handle_at(ScrollPhase::EndedDragging, at(150.0), start);
        view.update(start + Duration::from_secs(1));
        assert_eq!(view.header_height(), 0.0);

        // scrolling back up 20 units reveals 20 units of header
        drag(&mut view, &[130.0], start + Duration::from_secs(2));
        assert_eq!(view.header_height(), 20.0);
    }

    #[test]
    fn test_events_forwarded_to_callbacks_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let push = |name: &'static str| {
            let log = log.clone();
            move || log.borrow_mut().push(name)
        };
        let mut view = view(SnapMode::Immediate).with_callbacks(
            ScrollCallbacks::new()
                .on_pull_to_refresh(push("refresh"))
                .on_drag_end(push("drag_end"))
                .on_deceleration_end(push("deceleration_end")),
        );
        let now = Instant::now();

        drag(&mut view, &[-30.0, -61.0], now);
        view.handle_at(ScrollPhase::EndedDragging, at(-61.0), now);
        view.handle_at(ScrollPhase::WillDecelerate, at(-61.0), now);
        view.handle_at(ScrollPhase::EndedDecelerating, at(0.0), now);

        assert_eq!(
            *log.borrow(),
            vec!["refresh", "drag_end", "drag_end", "deceleration_end"]
        );
        assert!(view.is_refreshing());
        view.finish_refreshing();
        assert!(!view.is_refreshing());
    }

    #[test]
    fn test_pull_to_load_more_sets_loading_flag() {
        let mut view = view(SnapMode::Immediate);
        let now = Instant::now();

        // max offset is 1400, so 1460 sits exactly on the threshold
        drag(&mut view, &[0.0, 1400.0, 1460.0], now);
        view.handle_at(ScrollPhase::EndedDragging, at(1460.0), now);
        assert!(!view.is_loading_more());

        drag(&mut view, &[1461.0], now);
        view.handle_at(ScrollPhase::EndedDragging, at(1461.0), now);
        assert!(view.is_loading_more());
        assert!(view.header_context().is_loading_more);

        view.finish_loading_more();
        assert!(!view.is_loading_more());
    }

    #[test]
    fn test_sub_unit_jitter_does_not_move_header() {
        let mut view = view(SnapMode::Disabled);
        let now = Instant::now();

        drag(&mut view, &[0.0, 10.2], now);
        let height = view.header_height();
        assert!((height - 189.8).abs() < 1e-9);

        drag(&mut view, &[10.4], now);
        assert_eq!(view.header_height(), height);
        assert_eq!(view.body_context().body_offset, -10.2);

        drag(&mut view, &[25.0], now);
        assert_eq!(view.body_context().body_offset, -25.0);
        assert_eq!(view.header_height(), 175.0);
    }

    #[test]
    fn test_drag_after_momentum_ends_tracks_again() {
        let mut view = view(SnapMode::Immediate);
        let start = Instant::now();

        drag(&mut view, &[0.0, 20.0], start);
        view.handle_at(ScrollPhase::WillEndDragging { velocity_y: 0.0 }, at(20.0), start);
        view.handle_at(ScrollPhase::EndedDragging, at(20.0), start);
        view.handle_at(ScrollPhase::WillDecelerate, at(20.0), start);
        assert_eq!(view.update(start + Duration::from_secs(1)), 200.0);

        // momentum offsets leave the header alone
        drag(&mut view, &[60.0], start);
        assert_eq!(view.activity(), ScrollActivity::Decelerating);
        assert_eq!(view.header_height(), 200.0);

        view.handle_at(ScrollPhase::EndedDecelerating, at(60.0), start);
        drag(&mut view, &[60.0, 170.0], start);
        assert_eq!(view.activity(), ScrollActivity::Dragging);
        assert_eq!(view.header_height(), 90.0);
    }

    #[test]
    fn test_render_hooks_receive_state() {
        let mut view = view(SnapMode::Disabled);
        drag(&mut view, &[0.0, 50.0], Instant::now());
        let (header, body) = view.render();
        assert_eq!(header, 150.0);
        assert_eq!(body, 150.0);

        let context = view.header_context();
        assert!((context.progress - 0.75).abs() < 1e-9);
        assert!((context.collapse_progress - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_programmatic_height_request() {
        let mut view = view(SnapMode::Immediate);
        let start = Instant::now();
        view.set_header_height(120.0, start);
        assert_eq!(view.snap_state(), SnapState::Custom(120.0));
        assert_eq!(view.update(start + Duration::from_millis(100)), 120.0);

        view.set_snap_state(SnapState::Collapsed, start);
        assert_eq!(view.update(start + Duration::from_millis(300)), 0.0);
    }

    #[test]
    fn test_reset_snap_mode() {
        let mut view = view(SnapMode::Immediate);
        let now = Instant::now();
        view.set_snap_state(SnapState::Collapsed, now);
        view.reset_snap_mode(SnapMode::Disabled, now);
        assert_eq!(view.snap_mode(), SnapMode::Disabled);
        assert_eq!(view.snap_state(), SnapState::Expanded);
    }

    #[test]
    fn test_from_config_swaps_inverted_heights() {
        let mut config = AppConfig::default();
        config.header.min_height = 150.0;
        config.header.max_height = 30.0;
        let view = ScalingHeaderScrollView::from_config(&config, (), ());
        let context = view.header_context();
        assert_eq!(context.min_height, 30.0);
        assert_eq!(context.max_height, 150.0);
        assert_eq!(context.height, 150.0);
    }
}
