pub mod anim;
pub mod appearance;
pub mod bus;
pub mod config;
pub mod corner;
pub mod dpi;
pub mod event;
pub mod log;
pub mod main_window;
pub mod placement;
pub mod raster;
pub mod rect;
pub mod widget;

pub use appearance::{Appearance, Color};
pub use bus::{EventBus, EventPublisher};
pub use dpi::DpiScale;
pub use event::AppEvent;
pub use rect::{LogicalRect, Point, Rect, Size};

/// A boxed error type for window and startup operations.
///
/// Any error type that implements the `Error` trait can be boxed into this.
/// UI handlers never return it; they log and fall back instead.
pub type WindowResult<T> = Result<T, Box<dyn std::error::Error>>;
