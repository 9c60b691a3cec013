//! Scaling header scroll coordinator
//!
//! ## Leaves
//! - `frame_tracker` - current frame plus latched starting rect
//! - `delegate` - raw scroll phases to named events, pull/bottom detection
//! - `snap` - expanded / collapsed / custom state machine
//!
//! ## Composition
//! - `view` - offset to height mapping, event routing, render hooks
//!
//! # Usage
//!
//! ```ignore
//! use scalehead_core::header::{
//!     BodyContext, HeaderContext, ScalingHeaderScrollView, ScrollMetrics, ScrollPhase, SnapMode,
//! };
//!
//! let mut view = ScalingHeaderScrollView::new(
//!     60.0,
//!     240.0,
//!     SnapMode::Immediate,
//!     |header: &HeaderContext| header.height,
//!     |body: &BodyContext| body.top_inset,
//! );
//!
//! view.handle(ScrollPhase::Scrolling, ScrollMetrics::new(40.0, 2000.0, 600.0));
//! view.update(Instant::now());
//! let (header_height, body_inset) = view.render();
//! ```

pub mod delegate;
pub mod frame_tracker;
pub mod snap;
pub mod view;

pub use delegate::{
    ScrollCallbacks, ScrollEvent, ScrollEventDelegate, ScrollEventSink, ScrollMetrics, ScrollPhase,
    DEFAULT_PULL_THRESHOLD,
};
pub use frame_tracker::FrameTracker;
pub use snap::{HeaderSnapController, SnapDecision, SnapMode, SnapState, SnapTrigger};
pub use view::{
    height_for_progress, progress_for_offset, BodyContext, HeaderContext, ScalingHeaderScrollView,
    ScrollActivity,
};
