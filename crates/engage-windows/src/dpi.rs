use engage_core::DpiScale;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::HMONITOR;
use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, GetDpiForMonitor, GetDpiForWindow,
    MDT_EFFECTIVE_DPI, PROCESS_PER_MONITOR_DPI_AWARE, SetProcessDpiAwareness,
    SetProcessDpiAwarenessContext,
};
use windows::Win32::UI::WindowsAndMessaging::SetProcessDPIAware;

/// The DPI awareness level the process ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Awareness {
    /// Windows 10 1703+: per-monitor with non-client scaling.
    PerMonitorV2,
    /// Windows 8.1: per-monitor.
    PerMonitor,
    /// Vista: one DPI for the whole session.
    System,
    /// Nothing could be set, usually because a manifest already did.
    Unchanged,
}

/// Declares this process DPI aware, preferring per-monitor V2.
///
/// Without this, Windows scales coordinates for us based on the primary
/// monitor's DPI, which gives wrong positions on mixed-DPI setups. Falls
/// back to per-monitor and then system awareness on older systems.
///
/// Must be called once at process startup, before creating any windows.
pub fn enable_dpi_awareness() -> Awareness {
    // SAFETY: these calls only change process-wide DPI state and are made
    // before any window exists. Failures (e.g. already set via manifest)
    // just move on to the next fallback.
    unsafe {
        if SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2).is_ok() {
            return Awareness::PerMonitorV2;
        }
        if SetProcessDpiAwareness(PROCESS_PER_MONITOR_DPI_AWARE).is_ok() {
            return Awareness::PerMonitor;
        }
        if SetProcessDPIAware().as_bool() {
            return Awareness::System;
        }
    }
    Awareness::Unchanged
}

/// Scale of the monitor the window is on, or `None` if it can't be read.
pub fn scale_for_window(hwnd: HWND) -> Option<DpiScale> {
    // SAFETY: GetDpiForWindow returns 0 for invalid handles.
    let dpi = unsafe { GetDpiForWindow(hwnd) };
    DpiScale::from_dpi(dpi)
}

/// Effective scale of a monitor.
pub fn scale_for_monitor(monitor: HMONITOR) -> Option<DpiScale> {
    let (mut x, mut y) = (0u32, 0u32);
    // SAFETY: both out-pointers are valid for the duration of the call.
    unsafe { GetDpiForMonitor(monitor, MDT_EFFECTIVE_DPI, &mut x, &mut y).ok()? };
    let base = f64::from(engage_core::dpi::BASE_DPI);
    DpiScale::new(f64::from(x) / base, f64::from(y) / base)
}
