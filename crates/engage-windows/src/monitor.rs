use std::mem;

use engage_core::{DpiScale, Rect, WindowResult};
use windows::Win32::Foundation::{HWND, POINT, RECT};
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, HMONITOR, MONITOR_DEFAULTTOPRIMARY, MONITORINFO, MonitorFromPoint,
    MonitorFromWindow,
};
use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

use crate::dpi;

/// A display as seen from one moment in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    /// Full monitor rectangle in device pixels.
    pub bounds: Rect,
    /// Monitor rectangle minus the taskbar and docked toolbars.
    pub work_area: Rect,
    pub scale: Option<DpiScale>,
}

/// Returns the cursor position in device pixels.
pub fn cursor_position() -> WindowResult<(i32, i32)> {
    let mut pt = POINT::default();
    // SAFETY: `pt` is a valid out-pointer.
    unsafe { GetCursorPos(&mut pt)? };
    Ok((pt.x, pt.y))
}

/// Returns the screen under the cursor, or the primary screen when the
/// cursor is unavailable or off every monitor.
pub fn screen_at_cursor() -> WindowResult<Screen> {
    let pt = match cursor_position() {
        Ok((x, y)) => POINT { x, y },
        Err(e) => {
            log::debug!("Cursor position unavailable, using primary screen: {e}");
            POINT::default()
        }
    };
    // SAFETY: MonitorFromPoint always returns a monitor with DEFAULTTOPRIMARY.
    let monitor = unsafe { MonitorFromPoint(pt, MONITOR_DEFAULTTOPRIMARY) };
    screen_for_monitor(monitor)
}

/// Returns the screen containing most of the given window.
pub fn screen_for_window(hwnd: HWND) -> WindowResult<Screen> {
    // SAFETY: MonitorFromWindow falls back to the primary monitor.
    let monitor = unsafe { MonitorFromWindow(hwnd, MONITOR_DEFAULTTOPRIMARY) };
    screen_for_monitor(monitor)
}

/// Returns the primary screen.
pub fn primary_screen() -> WindowResult<Screen> {
    // The origin is always on the primary monitor.
    let monitor = unsafe { MonitorFromPoint(POINT::default(), MONITOR_DEFAULTTOPRIMARY) };
    screen_for_monitor(monitor)
}

/// Queries bounds, work area, and scale for a monitor handle.
fn screen_for_monitor(monitor: HMONITOR) -> WindowResult<Screen> {
    let mut info = MONITORINFO {
        cbSize: mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    // SAFETY: GetMonitorInfoW fills the MONITORINFO struct with
    // monitor dimensions. We set cbSize as required by the API.
    let success = unsafe { GetMonitorInfoW(monitor, &mut info) };

    if !success.as_bool() {
        return Err("Failed to get monitor info".into());
    }

    Ok(Screen {
        bounds: to_rect(info.rcMonitor),
        work_area: to_rect(info.rcWork),
        scale: dpi::scale_for_monitor(monitor),
    })
}

pub(crate) fn to_rect(rc: RECT) -> Rect {
    Rect::new(rc.left, rc.top, rc.right - rc.left, rc.bottom - rc.top)
}
