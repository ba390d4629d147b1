//! Top-right hot corner detection.

use crate::dpi::DpiScale;
use crate::rect::LogicalRect;

/// Width of the hot zone in device pixels.
pub const CORNER_WIDTH_PX: f64 = 50.0;

/// Height of the hot zone in device pixels.
pub const CORNER_HEIGHT_PX: f64 = 25.0;

/// Returns whether the cursor sits in the top-right corner of `area`.
///
/// `cursor` is in device pixels (as returned by `GetCursorPos`). With a
/// known scale both the cursor and the zone size are converted to logical
/// units; without one the raw values are compared against `area`.
pub fn is_in_top_right_corner(
    cursor: (i32, i32),
    area: LogicalRect,
    scale: Option<DpiScale>,
) -> bool {
    let (x, y) = (f64::from(cursor.0), f64::from(cursor.1));
    match scale {
        Some(s) => {
            let (mx, my) = (x / s.x, y / s.y);
            let zone_w = CORNER_WIDTH_PX / s.x;
            let zone_h = CORNER_HEIGHT_PX / s.y;
            mx >= area.right() - zone_w && my <= area.top + zone_h
        }
        None => x >= area.right() - CORNER_WIDTH_PX && y <= area.top + CORNER_HEIGHT_PX,
    }
}
