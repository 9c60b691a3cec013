//! Recorded scroll sessions and their replay through the coordinator
//!
//! A scenario is a JSON document listing scroll-surface events with
//! millisecond timestamps. Replaying it drives a [`ScalingHeaderScrollView`]
//! on a synthetic clock and produces one [`TraceEntry`] per event.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::header::{ScalingHeaderScrollView, ScrollCallbacks, ScrollMetrics, ScrollPhase};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Scrolling,
    WillEndDragging,
    EndedDragging,
    WillDecelerate,
    EndedDecelerating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEvent {
    pub at_ms: u64,
    pub phase: PhaseKind,
    #[serde(default)]
    pub offset: f64,
    /// Release velocity, only meaningful for `will_end_dragging`
    #[serde(default)]
    pub velocity: f64,
}

impl ScenarioEvent {
    pub fn phase(&self) -> ScrollPhase {
        match self.phase {
            PhaseKind::Scrolling => ScrollPhase::Scrolling,
            PhaseKind::WillEndDragging => ScrollPhase::WillEndDragging {
                velocity_y: self.velocity,
            },
            PhaseKind::EndedDragging => ScrollPhase::EndedDragging,
            PhaseKind::WillDecelerate => ScrollPhase::WillDecelerate,
            PhaseKind::EndedDecelerating => ScrollPhase::EndedDecelerating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub content_height: f64,
    pub viewport_height: f64,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

impl Scenario {
    pub fn from_json(content: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.content_height < 0.0 || self.viewport_height < 0.0 {
            return Err(Error::Scenario(
                "content and viewport heights must not be negative".to_string(),
            ));
        }
        if let Some(pair) = self.events.windows(2).find(|w| w[1].at_ms < w[0].at_ms) {
            return Err(Error::Scenario(format!(
                "events out of order: {}ms after {}ms",
                pair[1].at_ms, pair[0].at_ms
            )));
        }
        Ok(())
    }

    pub fn metrics(&self, offset: f64) -> ScrollMetrics {
        ScrollMetrics::new(offset, self.content_height, self.viewport_height)
    }
}

/// Header state after one replayed event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    pub at_ms: u64,
    pub phase: PhaseKind,
    pub offset: f64,
    pub header_height: f64,
    pub progress: f64,
    pub snap_state: String,
    /// Callback events fired by this input, in order
    pub events: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub entries: Vec<TraceEntry>,
    pub final_height: f64,
    pub final_state: String,
}

type Fired = Rc<RefCell<Vec<&'static str>>>;

fn recording_callbacks(fired: &Fired) -> ScrollCallbacks {
    let push = |name: &'static str| {
        let fired = fired.clone();
        move || fired.borrow_mut().push(name)
    };
    ScrollCallbacks::new()
        .on_scroll({
            let fired = fired.clone();
            move |_| fired.borrow_mut().push("scrolled")
        })
        .on_reached_bottom(push("reached_bottom"))
        .on_pull_to_refresh(push("pull_to_refresh"))
        .on_pull_to_load_more(push("pull_to_load_more"))
        .on_drag_end(push("drag_ended"))
        .on_deceleration_end(push("deceleration_ended"))
        .on_will_end_dragging({
            let fired = fired.clone();
            move |_| fired.borrow_mut().push("will_end_dragging")
        })
}

/// Drives a header coordinator through scenario events
pub struct Replay {
    view: ScalingHeaderScrollView<(), ()>,
    fired: Fired,
    settle_after: Duration,
}

impl Replay {
    pub fn new(config: &AppConfig) -> Self {
        let fired: Fired = Rc::new(RefCell::new(Vec::new()));
        let view = ScalingHeaderScrollView::from_config(config, (), ())
            .with_callbacks(recording_callbacks(&fired));
        Self {
            view,
            fired,
            settle_after: Duration::from_millis(config.animation.duration_ms),
        }
    }

    /// Apply one event at `now`
    pub fn step(&mut self, scenario: &Scenario, event: &ScenarioEvent, now: Instant) -> TraceEntry {
        self.view.update(now);
        self.view
            .handle_at(event.phase(), scenario.metrics(event.offset), now);

        let header = self.view.header_context();
        TraceEntry {
            at_ms: event.at_ms,
            phase: event.phase,
            offset: event.offset,
            header_height: header.height,
            progress: header.progress,
            snap_state: header.snap_state.to_string(),
            events: self.fired.borrow_mut().drain(..).collect(),
        }
    }

    /// Let any running snap animation finish after `last`
    pub fn finish(mut self, entries: Vec<TraceEntry>, last: Instant) -> ReplayReport {
        let final_height = self.view.update(last + self.settle_after);
        ReplayReport {
            entries,
            final_height,
            final_state: self.view.snap_state().to_string(),
        }
    }
}

/// Replay on a synthetic clock
pub fn replay(scenario: &Scenario, config: &AppConfig) -> ReplayReport {
    let base = Instant::now();
    let mut replay = Replay::new(config);
    let mut last = base;

    let entries = scenario
        .events
        .iter()
        .map(|event| {
            last = base + Duration::from_millis(event.at_ms);
            replay.step(scenario, event, last)
        })
        .collect();

    replay.finish(entries, last)
}

/// Replay in wall-clock time, sleeping until each event is due
///
/// Event times are read from the tokio clock the sleeps run on, so a paused
/// runtime yields the same report as [`replay`].
pub async fn replay_realtime(scenario: &Scenario, config: &AppConfig) -> ReplayReport {
    let base = tokio::time::Instant::now();
    let mut replay = Replay::new(config);
    let mut entries = Vec::with_capacity(scenario.events.len());

    for event in &scenario.events {
        tokio::time::sleep_until(base + Duration::from_millis(event.at_ms)).await;
        let entry = replay.step(scenario, event, tokio::time::Instant::now().into_std());
        tracing::debug!(
            at_ms = entry.at_ms,
            height = entry.header_height,
            "Replayed scroll event"
        );
        entries.push(entry);
    }

    tokio::time::sleep(replay.settle_after).await;
    replay.finish(entries, tokio::time::Instant::now().into_std())
}
