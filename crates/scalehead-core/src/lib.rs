pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod header;
pub mod scenario;

pub use config::{AppConfig, EasingType};
pub use error::{Error, Result};
pub use geometry::Frame;
pub use header::{ScalingHeaderScrollView, ScrollMetrics, ScrollPhase, SnapMode, SnapState};
