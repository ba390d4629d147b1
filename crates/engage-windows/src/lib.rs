#![cfg(windows)]
//! Win32 implementation of the Engage windows.
//!
//! Everything here runs on a single UI thread except the topmost ticker,
//! which only posts messages back to it.

/// Startup, message loop, and event routing.
pub mod app;

/// Process DPI awareness and per-window scale queries.
pub mod dpi;

/// The main application window.
pub mod main_window;

/// Monitor bounds, work areas, and the cursor.
pub mod monitor;

/// Layered window presentation and GDI labels.
pub mod paint;

/// Screen positioning with logged fallbacks.
pub mod screen;

/// Win32 timer bookkeeping.
pub mod timer;

/// Background thread that keeps the widget on top.
pub mod topmost;

/// The floating widget overlay.
pub mod widget_window;

/// Extended styles and z-order.
pub mod zorder;

pub use app::run;
