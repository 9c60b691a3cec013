//! Terminal stand-in for a touch scroll surface
//!
//! Key presses and wheel notches become drag steps. A drag ends once input
//! goes quiet, the release velocity comes from recent samples, and momentum
//! decays with friction. Overscroll past either edge rubber-bands during the
//! drag and springs back while decelerating.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use scalehead_core::header::{ScrollMetrics, ScrollPhase};

/// Quiet period after which a keyboard drag counts as released
pub const RELEASE_AFTER: Duration = Duration::from_millis(150);

/// Only samples this recent feed the release velocity
const VELOCITY_HORIZON: Duration = Duration::from_millis(100);

const FRAME: Duration = Duration::from_millis(16);
const FRAME_MS: f64 = 16.0;

/// Velocity multiplier per frame while decelerating
const FRICTION: f64 = 0.9;

/// Below this (units per ms) momentum stops
const VELOCITY_EPSILON: f64 = 0.05;

/// Share of a drag applied while already past an edge
const RUBBER_BAND: f64 = 0.5;

/// Share of the overscroll recovered per frame
const SPRING: f64 = 0.35;

const MAX_STEPS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Idle,
    Dragging { last_input: Instant },
    Decelerating { velocity: f64, last_tick: Instant },
}

/// Emulated scroll surface emitting [`ScrollPhase`] events
#[derive(Debug, Clone)]
pub struct TerminalScrollSurface {
    offset: f64,
    content_height: f64,
    viewport_height: f64,
    motion: Motion,
    samples: VecDeque<(Instant, f64)>,
    pending: Vec<(ScrollPhase, ScrollMetrics)>,
}

impl TerminalScrollSurface {
    pub fn new(content_height: f64, viewport_height: f64) -> Self {
        Self {
            offset: 0.0,
            content_height: content_height.max(0.0),
            viewport_height: viewport_height.max(0.0),
            motion: Motion::Idle,
            samples: VecDeque::new(),
            pending: Vec::new(),
        }
    }

    pub fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(self.offset, self.content_height, self.viewport_height)
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Whether the surface needs animation-rate ticks
    pub fn is_active(&self) -> bool {
        self.motion != Motion::Idle
    }

    pub fn set_viewport_height(&mut self, viewport_height: f64) {
        self.viewport_height = viewport_height.max(0.0);
    }

    pub fn set_content_height(&mut self, content_height: f64) {
        self.content_height = content_height.max(0.0);
    }

    /// Events produced since the last call, in emission order
    pub fn take_events(&mut self) -> Vec<(ScrollPhase, ScrollMetrics)> {
        std::mem::take(&mut self.pending)
    }

    /// Move the content by `delta` units as part of a drag
    pub fn drag_by(&mut self, delta: f64, now: Instant) {
        match self.motion {
            Motion::Decelerating { .. } => {
                // touching a moving surface stops it
                self.emit(ScrollPhase::EndedDecelerating);
                self.samples.clear();
            }
            Motion::Idle => self.samples.clear(),
            Motion::Dragging { .. } => {}
        }

        let overscroll = self.overscroll();
        let resistance = if overscroll != 0.0 && overscroll.signum() == delta.signum() {
            RUBBER_BAND
        } else {
            1.0
        };
        self.offset += delta * resistance;

        self.samples.push_back((now, self.offset));
        while let Some(&(at, _)) = self.samples.front() {
            if now.saturating_duration_since(at) > VELOCITY_HORIZON {
                self.samples.pop_front();
            } else {
                break;
            }
        }

        self.motion = Motion::Dragging { last_input: now };
        self.emit(ScrollPhase::Scrolling);
    }

    /// A one-frame drag released at `velocity` units per ms
    pub fn flick(&mut self, velocity: f64, now: Instant) {
        self.drag_by(velocity * FRAME_MS, now);
        self.release(velocity, now);
    }

    /// Advance drag release and momentum to `now`
    pub fn tick(&mut self, now: Instant) {
        match self.motion {
            Motion::Idle => {}
            Motion::Dragging { last_input } => {
                if now.saturating_duration_since(last_input) >= RELEASE_AFTER {
                    let velocity = self.release_velocity();
                    self.release(velocity, now);
                }
            }
            Motion::Decelerating {
                velocity,
                last_tick,
            } => {
                let elapsed = now.saturating_duration_since(last_tick);
                let steps = (elapsed.as_millis() / FRAME.as_millis()) as u32;
                if steps == 0 {
                    return;
                }

                let mut velocity = velocity;
                for _ in 0..steps.min(MAX_STEPS) {
                    velocity = self.step(velocity);
                }
                self.emit(ScrollPhase::Scrolling);

                if self.overscroll() == 0.0 && velocity.abs() < VELOCITY_EPSILON {
                    tracing::trace!(offset = self.offset, "Momentum stopped");
                    self.motion = Motion::Idle;
                    self.emit(ScrollPhase::EndedDecelerating);
                } else {
                    self.motion = Motion::Decelerating {
                        velocity,
                        last_tick: last_tick + FRAME * steps,
                    };
                }
            }
        }
    }

    fn release(&mut self, velocity: f64, now: Instant) {
        tracing::debug!(offset = self.offset, velocity, "Drag released");
        self.samples.clear();
        self.emit(ScrollPhase::WillEndDragging {
            velocity_y: velocity,
        });
        self.emit(ScrollPhase::EndedDragging);

        if velocity.abs() >= VELOCITY_EPSILON || self.overscroll() != 0.0 {
            self.emit(ScrollPhase::WillDecelerate);
            self.motion = Motion::Decelerating {
                velocity,
                last_tick: now,
            };
        } else {
            self.motion = Motion::Idle;
        }
    }

    /// Average velocity over the sample window, in units per ms
    fn release_velocity(&self) -> f64 {
        match (self.samples.front(), self.samples.back()) {
            (Some(&(start, from)), Some(&(end, to))) if self.samples.len() > 1 => {
                let elapsed_ms = end.saturating_duration_since(start).as_secs_f64() * 1000.0;
                (to - from) / elapsed_ms.max(FRAME_MS)
            }
            _ => 0.0,
        }
    }

    /// One frame of momentum; returns the velocity for the next frame
    fn step(&mut self, velocity: f64) -> f64 {
        let overscroll = self.overscroll();
        if overscroll != 0.0 {
            self.offset -= overscroll * SPRING;
            if self.overscroll().abs() < 0.5 {
                self.offset = self.offset.clamp(0.0, self.max_offset());
            }
            return 0.0;
        }
        self.offset += velocity * FRAME_MS;
        velocity * FRICTION
    }

    fn max_offset(&self) -> f64 {
        self.metrics().max_offset().unwrap_or(0.0)
    }

    /// Distance past the nearest edge; negative above the top
    fn overscroll(&self) -> f64 {
        let max = self.max_offset();
        if self.offset < 0.0 {
            self.offset
        } else if self.offset > max {
            self.offset - max
        } else {
            0.0
        }
    }

    fn emit(&mut self, phase: ScrollPhase) {
        self.pending.push((phase, self.metrics()));
    }
}
