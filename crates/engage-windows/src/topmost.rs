use std::ffi::c_void;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{PostMessageW, WM_APP};

/// Posted to the widget window to re-assert its topmost state.
pub const WM_ENFORCE_TOPMOST: u32 = WM_APP + 1;

/// Periodically asks the widget window to put itself back on top.
///
/// The thread never touches the window itself; it only posts
/// [`WM_ENFORCE_TOPMOST`], which the UI thread handles. Dropping the
/// ticker stops it within one interval.
pub struct TopmostTicker {
    stop: Arc<AtomicBool>,
}

impl TopmostTicker {
    pub fn spawn(hwnd: HWND, interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();
        // HWND is not Send; carry the raw value across.
        let raw = hwnd.0 as usize;

        let spawned = thread::Builder::new()
            .name("engage-topmost".into())
            .spawn(move || {
                let hwnd = HWND(raw as *mut c_void);
                while !flag.load(Ordering::Relaxed) {
                    thread::sleep(interval);
                    if flag.load(Ordering::Relaxed) {
                        break;
                    }
                    // SAFETY: posting to a destroyed window fails cleanly.
                    let posted = unsafe {
                        PostMessageW(Some(hwnd), WM_ENFORCE_TOPMOST, WPARAM(0), LPARAM(0))
                    };
                    if posted.is_err() {
                        log::debug!("Widget window gone, topmost ticker exiting");
                        break;
                    }
                }
            });
        if let Err(e) = spawned {
            engage_core::log::error("Failed to start topmost ticker", &e);
        } else {
            log::debug!("Topmost ticker started ({}ms)", interval.as_millis());
        }

        Self { stop }
    }
}

impl Drop for TopmostTicker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
