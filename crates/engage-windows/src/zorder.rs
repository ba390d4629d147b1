use engage_core::WindowResult;
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::UI::WindowsAndMessaging::{
    GWL_EXSTYLE, GetWindowLongPtrW, GetWindowRect, HWND_TOPMOST, SWP_NOACTIVATE, SWP_NOMOVE,
    SWP_NOSIZE, SWP_SHOWWINDOW, SetWindowLongPtrW, SetWindowPos, WINDOW_EX_STYLE,
    WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST,
};

use crate::monitor;

/// Top reported when pinning to the top edge fails, so the widget still
/// hugs the edge on a single-monitor setup.
pub const PIN_ERROR_TOP: f64 = -5.0;

/// Adds `flags` to the window's extended style.
fn add_ex_style(hwnd: HWND, flags: WINDOW_EX_STYLE) {
    // SAFETY: reading and writing GWL_EXSTYLE of a window we own.
    unsafe {
        let current = GetWindowLongPtrW(hwnd, GWL_EXSTYLE);
        let _ = SetWindowLongPtrW(hwnd, GWL_EXSTYLE, current | flags.0 as isize);
    }
}

/// Applies the overlay style: no taskbar button, topmost, never activated.
pub fn apply_overlay_style(hwnd: HWND) {
    add_ex_style(hwnd, WS_EX_TOOLWINDOW | WS_EX_TOPMOST | WS_EX_NOACTIVATE);
}

/// Re-inserts the window at the top of the topmost band without moving,
/// resizing, or activating it.
pub fn ensure_topmost(hwnd: HWND) -> WindowResult<()> {
    unsafe {
        SetWindowPos(
            hwnd,
            Some(HWND_TOPMOST),
            0,
            0,
            0,
            0,
            SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
        )?;
    }
    Ok(())
}

/// Moves the window to the absolute top edge of its screen, keeping its
/// horizontal position, and returns the new top in logical units.
///
/// Without a DPI scale the top is reported as 0. Failures are logged and
/// reported as [`PIN_ERROR_TOP`].
pub fn pin_to_top_edge(hwnd: HWND) -> f64 {
    match try_pin_to_top_edge(hwnd) {
        Ok(top) => top,
        Err(e) => {
            engage_core::log::error("Failed to pin widget to the top edge", e.as_ref());
            PIN_ERROR_TOP
        }
    }
}

fn try_pin_to_top_edge(hwnd: HWND) -> WindowResult<f64> {
    apply_overlay_style(hwnd);

    let mut rect = RECT::default();
    unsafe { GetWindowRect(hwnd, &mut rect)? };
    let screen = monitor::screen_for_window(hwnd)?;
    let screen_top = screen.bounds.y;

    unsafe {
        SetWindowPos(
            hwnd,
            Some(HWND_TOPMOST),
            rect.left,
            screen_top,
            0,
            0,
            SWP_NOSIZE | SWP_NOACTIVATE | SWP_SHOWWINDOW,
        )?;
    }

    let top = match screen.scale {
        Some(scale) => f64::from(screen_top) / scale.y,
        None => 0.0,
    };
    log::debug!(
        "Pinned widget to top edge: screen top {screen_top}px, logical top {top:.1}"
    );
    Ok(top)
}
