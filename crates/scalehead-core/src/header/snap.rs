use std::fmt;

use serde::{Deserialize, Serialize};

/// Release velocity at or above which a flick overrides the nearest edge
pub const DEFAULT_FLICK_VELOCITY: f64 = 1.5;

/// When the header auto-settles to an edge height
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapMode {
    /// Header height follows the scroll offset, no settling
    Disabled,
    /// Settle as soon as the finger lifts
    #[default]
    Immediate,
    /// Settle once momentum scrolling has stopped
    AfterDeceleration,
}

impl SnapMode {
    pub fn next(self) -> Self {
        match self {
            SnapMode::Disabled => SnapMode::Immediate,
            SnapMode::Immediate => SnapMode::AfterDeceleration,
            SnapMode::AfterDeceleration => SnapMode::Disabled,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SnapMode::Disabled => "disabled",
            SnapMode::Immediate => "immediate",
            SnapMode::AfterDeceleration => "after deceleration",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum SnapState {
    #[default]
    Expanded,
    Collapsed,
    /// Explicitly requested height; never produced by a snap decision
    Custom(f64),
}

impl fmt::Display for SnapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapState::Expanded => write!(f, "expanded"),
            SnapState::Collapsed => write!(f, "collapsed"),
            SnapState::Custom(height) => write!(f, "custom({:.1})", height),
        }
    }
}

/// Points at which the controller may settle the header
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapTrigger {
    WillEndDragging { velocity_y: f64 },
    DidEndDecelerating,
}

/// Outcome of a snap decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapDecision {
    pub target: SnapState,
    pub height: f64,
    /// Whether `target` differs from the state before the decision
    pub changed: bool,
}

/// Snap state machine of the header
///
/// Velocity rule: in [`SnapMode::Immediate`], a release with
/// `|velocity_y| >= flick_velocity` settles toward the flick direction
/// (positive collapses, negative expands). Slower releases and all
/// [`SnapMode::AfterDeceleration`] decisions settle at the nearest edge,
/// with the exact midpoint resolving to expanded.
#[derive(Debug, Clone)]
pub struct HeaderSnapController {
    mode: SnapMode,
    current: SnapState,
    min_height: f64,
    max_height: f64,
    flick_velocity: f64,
}

impl HeaderSnapController {
    /// Create a controller; heights are clamped to `0 <= min <= max`
    pub fn new(mode: SnapMode, min_height: f64, max_height: f64) -> Self {
        let min = min_height.max(0.0);
        let max = max_height.max(0.0);
        let (min_height, max_height) = if min > max { (max, min) } else { (min, max) };
        Self {
            mode,
            current: SnapState::Expanded,
            min_height,
            max_height,
            flick_velocity: DEFAULT_FLICK_VELOCITY,
        }
    }

    pub fn with_flick_velocity(mut self, flick_velocity: f64) -> Self {
        self.flick_velocity = flick_velocity.abs();
        self
    }

    #[inline]
    pub fn mode(&self) -> SnapMode {
        self.mode
    }

    #[inline]
    pub fn current(&self) -> SnapState {
        self.current
    }

    #[inline]
    pub fn flick_velocity(&self) -> f64 {
        self.flick_velocity
    }

    #[inline]
    pub fn min_height(&self) -> f64 {
        self.min_height
    }

    #[inline]
    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    pub fn height_for(&self, state: SnapState) -> f64 {
        match state {
            SnapState::Expanded => self.max_height,
            SnapState::Collapsed => self.min_height,
            SnapState::Custom(height) => height,
        }
    }

    /// Decide whether the header should settle, and where
    ///
    /// Returns `None` when the mode does not react to `trigger`.
    pub fn decide(&mut self, trigger: SnapTrigger, current_height: f64) -> Option<SnapDecision> {
        let target = match (self.mode, trigger) {
            (SnapMode::Immediate, SnapTrigger::WillEndDragging { velocity_y }) => {
                if velocity_y.abs() >= self.flick_velocity && velocity_y != 0.0 {
                    if velocity_y > 0.0 {
                        SnapState::Collapsed
                    } else {
                        SnapState::Expanded
                    }
                } else {
                    self.nearest_edge(current_height)
                }
            }
            (SnapMode::AfterDeceleration, SnapTrigger::DidEndDecelerating) => {
                self.nearest_edge(current_height)
            }
            _ => return None,
        };

        let changed = self.current != target;
        self.current = target;

        tracing::debug!(?trigger, current_height, ?target, changed, "Header snap decided");

        Some(SnapDecision {
            target,
            height: self.height_for(target),
            changed,
        })
    }

    /// Explicit height request; the only way to reach [`SnapState::Custom`]
    pub fn request_height(&mut self, height: f64) -> SnapDecision {
        let height = height.clamp(self.min_height, self.max_height);
        self.request_state(SnapState::Custom(height))
    }

    /// Programmatic expand/collapse/custom request
    pub fn request_state(&mut self, state: SnapState) -> SnapDecision {
        let state = match state {
            SnapState::Custom(height) => {
                SnapState::Custom(height.clamp(self.min_height, self.max_height))
            }
            other => other,
        };
        let changed = self.current != state;
        self.current = state;
        SnapDecision {
            target: state,
            height: self.height_for(state),
            changed,
        }
    }

    fn nearest_edge(&self, current_height: f64) -> SnapState {
        let midpoint = (self.min_height + self.max_height) / 2.0;
        if current_height < midpoint {
            SnapState::Collapsed
        } else {
            SnapState::Expanded
        }
    }
}
