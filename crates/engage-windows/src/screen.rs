//! Screen positioning service.
//!
//! Wraps the pure placement math with monitor queries. Nothing here fails:
//! a monitor that cannot be read, or one without DPI information, falls
//! back to the fixed defaults and logs why.

use engage_core::placement::{self, FALLBACK_POSITION, FALLBACK_WORK_AREA, Snap};
use engage_core::{DpiScale, LogicalRect, Point, Size, WindowResult};

use crate::monitor::{self, Screen};

/// A screen's work area in logical units plus the scale used to get it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkArea {
    pub rect: LogicalRect,
    pub scale: Option<DpiScale>,
}

impl WorkArea {
    const FALLBACK: WorkArea = WorkArea {
        rect: FALLBACK_WORK_AREA,
        scale: None,
    };

    fn of(screen: &Screen) -> Self {
        Self {
            rect: placement::logical_work_area(screen.work_area, screen.scale),
            scale: screen.scale,
        }
    }

    /// The scale, or 1:1 when the monitor did not report one.
    pub fn scale_or_identity(&self) -> DpiScale {
        self.scale.unwrap_or(DpiScale::IDENTITY)
    }
}

/// Work area of the screen under the cursor.
pub fn work_area() -> WorkArea {
    resolve(monitor::screen_at_cursor(), "cursor")
}

/// Work area of the primary screen.
pub fn primary_work_area() -> WorkArea {
    resolve(monitor::primary_screen(), "primary")
}

/// Top-right position for a window of `size` on the screen under the
/// cursor, `margin` units in from the edges.
pub fn top_right(size: Size, margin: f64) -> Point {
    let area = work_area();
    if area.scale.is_none() {
        log::warn!("No DPI information for top-right placement, using fallback position");
        return FALLBACK_POSITION;
    }
    let pos = placement::top_right(area.rect, size, margin);
    log::debug!(
        "Top-right placement: left {:.1}, top {:.1} in {:.0}x{:.0} work area",
        pos.x,
        pos.y,
        area.rect.width,
        area.rect.height
    );
    pos
}

/// Centers a window of `size` on the primary screen.
pub fn center(size: Size) -> Point {
    let area = primary_work_area();
    if area.scale.is_none() {
        log::warn!("No DPI information for centering, using fallback position");
        return FALLBACK_POSITION;
    }
    placement::center(area.rect, size)
}

/// Snaps a window at `position` to the nearest work-area edge of the
/// screen under the cursor.
pub fn snap(position: Point, size: Size, snap_distance: f64) -> Snap {
    placement::snap_to_nearest_edge(position, size, work_area().rect, snap_distance)
}

fn resolve(screen: WindowResult<Screen>, which: &str) -> WorkArea {
    match screen {
        Ok(screen) => WorkArea::of(&screen),
        Err(e) => {
            engage_core::log::error(
                &format!("Failed to read the {which} screen, using fallback work area"),
                e.as_ref(),
            );
            WorkArea::FALLBACK
        }
    }
}
