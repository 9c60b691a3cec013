mod body;
mod header;
mod status_bar;

pub use body::BodyWidget;
pub use header::HeaderWidget;
pub use status_bar::StatusBarWidget;
