//! Screen positioning math.
//!
//! Every function works in logical units. The platform layer supplies a
//! monitor work area in device pixels together with the window's DPI
//! scale, and applies the resulting position.

use crate::dpi::DpiScale;
use crate::rect::{LogicalRect, Point, Rect, Size};

/// Used when no DPI information is available or positioning fails.
pub const FALLBACK_POSITION: Point = Point { x: 100.0, y: 100.0 };

/// Work area assumed when the real one cannot be determined.
pub const FALLBACK_WORK_AREA: LogicalRect = LogicalRect {
    left: 0.0,
    top: 0.0,
    width: 1024.0,
    height: 768.0,
};

/// Default distance below which a window edge snaps to a screen edge.
pub const DEFAULT_SNAP_DISTANCE: f64 = 20.0;

/// Inset applied when a window is pulled back inside the work area.
const OVERFLOW_INSET: f64 = 5.0;

/// Returns the DPI-adjusted work area, or [`FALLBACK_WORK_AREA`] when the
/// scale is unknown.
pub fn logical_work_area(work_area: Rect, scale: Option<DpiScale>) -> LogicalRect {
    match scale {
        Some(scale) => scale.to_logical(work_area),
        None => FALLBACK_WORK_AREA,
    }
}

/// Computes the top-right position for a window of `size`, `margin` units
/// away from the top and right edges of `area`.
///
/// Negative coordinates clamp to zero. A window that would still overflow
/// the right or bottom edge is pulled back inside with a small inset.
pub fn top_right(area: LogicalRect, size: Size, margin: f64) -> Point {
    let mut left = area.left + area.width - size.width - margin;
    let mut top = area.top + margin;

    if left < 0.0 {
        left = 0.0;
    }
    if top < 0.0 {
        top = 0.0;
    }

    if left + size.width > area.right() {
        left = area.right() - size.width - OVERFLOW_INSET;
    }
    if top + size.height > area.bottom() {
        top = area.bottom() - size.height - OVERFLOW_INSET;
    }

    Point::new(left, top)
}

/// Centers a window of `size` inside `area`.
pub fn center(area: LogicalRect, size: Size) -> Point {
    Point::new(
        area.left + (area.width - size.width) / 2.0,
        area.top + (area.height - size.height) / 2.0,
    )
}

/// Result of [`snap_to_nearest_edge`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub position: Point,
    pub snapped: bool,
}

/// Snaps a window to any work-area edge closer than `snap_distance`.
///
/// Edges are checked right, left, top, bottom; each check sees the
/// position produced by the previous one, so a window narrower than the
/// snap distance ends up on the left edge rather than the right.
pub fn snap_to_nearest_edge(
    position: Point,
    size: Size,
    area: LogicalRect,
    snap_distance: f64,
) -> Snap {
    let mut p = position;
    let mut snapped = false;

    if (p.x + size.width - area.right()).abs() < snap_distance {
        p.x = area.right() - size.width;
        snapped = true;
    }
    if (p.x - area.left).abs() < snap_distance {
        p.x = area.left;
        snapped = true;
    }
    if (p.y - area.top).abs() < snap_distance {
        p.y = area.top;
        snapped = true;
    }
    if (p.y + size.height - area.bottom()).abs() < snap_distance {
        p.y = area.bottom() - size.height;
        snapped = true;
    }

    Snap {
        position: p,
        snapped,
    }
}
