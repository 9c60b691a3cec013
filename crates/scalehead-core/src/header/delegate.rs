//! Scroll-container events translated into named callback events
//!
//! [`ScrollEventDelegate`] holds no business state. Every raw event is
//! re-evaluated against the metrics the scroll surface reports with it, and
//! the resulting [`ScrollEvent`]s are pushed into a [`ScrollEventSink`] in
//! the order they are derived.

use std::fmt;

/// Distance past either edge that counts as a pull gesture
pub const DEFAULT_PULL_THRESHOLD: f64 = 60.0;

/// Geometry reported by the scroll surface alongside each event
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Vertical offset, 0 at the top and growing as the user scrolls down
    pub content_offset_y: f64,
    pub content_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub fn new(content_offset_y: f64, content_height: f64, viewport_height: f64) -> Self {
        Self {
            content_offset_y,
            content_height,
            viewport_height,
        }
    }

    /// Largest resting offset, or `None` when the content fits the viewport
    pub fn max_offset(&self) -> Option<f64> {
        if self.content_height < self.viewport_height {
            None
        } else {
            Some(self.content_height - self.viewport_height)
        }
    }

    pub fn with_offset(&self, content_offset_y: f64) -> Self {
        Self {
            content_offset_y,
            ..*self
        }
    }
}

/// Raw scroll-surface notifications
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollPhase {
    Scrolling,
    WillEndDragging { velocity_y: f64 },
    EndedDragging,
    WillDecelerate,
    EndedDecelerating,
}

/// Events produced by the delegate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollEvent {
    Scrolled(ScrollMetrics),
    ReachedBottom,
    PullToRefresh,
    PullToLoadMore,
    WillEndDragging { velocity_y: f64 },
    DragEnded,
    DecelerationEnded,
}

impl ScrollEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ScrollEvent::Scrolled(_) => "scrolled",
            ScrollEvent::ReachedBottom => "reached_bottom",
            ScrollEvent::PullToRefresh => "pull_to_refresh",
            ScrollEvent::PullToLoadMore => "pull_to_load_more",
            ScrollEvent::WillEndDragging { .. } => "will_end_dragging",
            ScrollEvent::DragEnded => "drag_ended",
            ScrollEvent::DecelerationEnded => "deceleration_ended",
        }
    }
}

/// Receiver of delegate events
pub trait ScrollEventSink {
    fn send(&mut self, event: ScrollEvent);
}

impl ScrollEventSink for Vec<ScrollEvent> {
    fn send(&mut self, event: ScrollEvent) {
        self.push(event);
    }
}

type Callback = Box<dyn FnMut()>;

/// Caller-supplied callback slots, all no-ops by default
pub struct ScrollCallbacks {
    on_scroll: Box<dyn FnMut(&ScrollMetrics)>,
    on_reached_bottom: Callback,
    on_pull_to_refresh: Callback,
    on_pull_to_load_more: Callback,
    on_drag_end: Callback,
    on_deceleration_end: Callback,
    on_will_end_dragging: Box<dyn FnMut(f64)>,
}

impl Default for ScrollCallbacks {
    fn default() -> Self {
        Self {
            on_scroll: Box::new(|_| {}),
            on_reached_bottom: Box::new(|| {}),
            on_pull_to_refresh: Box::new(|| {}),
            on_pull_to_load_more: Box::new(|| {}),
            on_drag_end: Box::new(|| {}),
            on_deceleration_end: Box::new(|| {}),
            on_will_end_dragging: Box::new(|_| {}),
        }
    }
}

impl fmt::Debug for ScrollCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollCallbacks").finish_non_exhaustive()
    }
}

impl ScrollCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_scroll(mut self, f: impl FnMut(&ScrollMetrics) + 'static) -> Self {
        self.on_scroll = Box::new(f);
        self
    }

    pub fn on_reached_bottom(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_reached_bottom = Box::new(f);
        self
    }

    pub fn on_pull_to_refresh(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_pull_to_refresh = Box::new(f);
        self
    }

    pub fn on_pull_to_load_more(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_pull_to_load_more = Box::new(f);
        self
    }

    pub fn on_drag_end(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_drag_end = Box::new(f);
        self
    }

    pub fn on_deceleration_end(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_deceleration_end = Box::new(f);
        self
    }

    pub fn on_will_end_dragging(mut self, f: impl FnMut(f64) + 'static) -> Self {
        self.on_will_end_dragging = Box::new(f);
        self
    }
}

impl ScrollEventSink for ScrollCallbacks {
    fn send(&mut self, event: ScrollEvent) {
        match event {
            ScrollEvent::Scrolled(metrics) => (self.on_scroll)(&metrics),
            ScrollEvent::ReachedBottom => (self.on_reached_bottom)(),
            ScrollEvent::PullToRefresh => (self.on_pull_to_refresh)(),
            ScrollEvent::PullToLoadMore => (self.on_pull_to_load_more)(),
            ScrollEvent::WillEndDragging { velocity_y } => (self.on_will_end_dragging)(velocity_y),
            ScrollEvent::DragEnded => (self.on_drag_end)(),
            ScrollEvent::DecelerationEnded => (self.on_deceleration_end)(),
        }
    }
}

/// Stateless adapter from raw scroll phases to [`ScrollEvent`]s
#[derive(Debug, Clone, Copy)]
pub struct ScrollEventDelegate {
    pull_threshold: f64,
}

impl Default for ScrollEventDelegate {
    fn default() -> Self {
        Self {
            pull_threshold: DEFAULT_PULL_THRESHOLD,
        }
    }
}

impl ScrollEventDelegate {
    pub fn new(pull_threshold: f64) -> Self {
        Self {
            pull_threshold: pull_threshold.max(0.0),
        }
    }

    pub fn is_at_bottom(&self, metrics: &ScrollMetrics) -> bool {
        metrics
            .max_offset()
            .is_some_and(|max| metrics.content_offset_y >= max)
    }

    pub fn is_pulled_to_refresh(&self, metrics: &ScrollMetrics) -> bool {
        metrics.content_offset_y < -self.pull_threshold
    }

    pub fn is_pulled_to_load_more(&self, metrics: &ScrollMetrics) -> bool {
        metrics
            .max_offset()
            .is_some_and(|max| metrics.content_offset_y > max + self.pull_threshold)
    }

    /// Route a raw phase to the matching handler
    pub fn dispatch<S>(&self, phase: ScrollPhase, metrics: &ScrollMetrics, sink: &mut S)
    where
        S: ScrollEventSink + ?Sized,
    {
        match phase {
            ScrollPhase::Scrolling => self.on_offset_changed(metrics, sink),
            ScrollPhase::WillEndDragging { velocity_y } => {
                self.on_will_end_dragging(velocity_y, sink)
            }
            ScrollPhase::EndedDragging => self.on_did_end_dragging(metrics, sink),
            ScrollPhase::WillDecelerate => self.on_will_begin_decelerating(sink),
            ScrollPhase::EndedDecelerating => self.on_did_end_decelerating(sink),
        }
    }

    pub fn on_offset_changed<S>(&self, metrics: &ScrollMetrics, sink: &mut S)
    where
        S: ScrollEventSink + ?Sized,
    {
        sink.send(ScrollEvent::Scrolled(*metrics));
        if self.is_at_bottom(metrics) {
            sink.send(ScrollEvent::ReachedBottom);
        }
    }

    pub fn on_will_end_dragging<S>(&self, velocity_y: f64, sink: &mut S)
    where
        S: ScrollEventSink + ?Sized,
    {
        sink.send(ScrollEvent::WillEndDragging { velocity_y });
    }

    pub fn on_did_end_dragging<S>(&self, metrics: &ScrollMetrics, sink: &mut S)
    where
        S: ScrollEventSink + ?Sized,
    {
        if self.is_pulled_to_refresh(metrics) {
            sink.send(ScrollEvent::PullToRefresh);
        }
        if self.is_pulled_to_load_more(metrics) {
            sink.send(ScrollEvent::PullToLoadMore);
        }
        sink.send(ScrollEvent::DragEnded);
    }

    // Drag-end bookkeeping also runs when momentum starts.
    pub fn on_will_begin_decelerating<S>(&self, sink: &mut S)
    where
        S: ScrollEventSink + ?Sized,
    {
        sink.send(ScrollEvent::DragEnded);
    }

    pub fn on_did_end_decelerating<S>(&self, sink: &mut S)
    where
        S: ScrollEventSink + ?Sized,
    {
        sink.send(ScrollEvent::DecelerationEnded);
    }
}
