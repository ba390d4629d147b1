use std::collections::HashSet;
use std::time::Duration;

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{KillTimer, SetTimer};

/// Tracks which `SetTimer` ids are armed on a window.
///
/// Restarting a running timer resets its countdown, matching `SetTimer`.
pub struct Timers {
    hwnd: HWND,
    enabled: HashSet<usize>,
}

impl Timers {
    pub fn new(hwnd: HWND) -> Self {
        Self {
            hwnd,
            enabled: HashSet::new(),
        }
    }

    pub fn start(&mut self, id: usize, interval: Duration) {
        let ms = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX).max(1);
        // SAFETY: the window outlives its timers; `stop_all` runs on drop.
        let result = unsafe { SetTimer(Some(self.hwnd), id, ms, None) };
        if result == 0 {
            log::warn!("SetTimer failed for timer {id}");
            return;
        }
        self.enabled.insert(id);
    }

    pub fn stop(&mut self, id: usize) {
        if self.enabled.remove(&id) {
            unsafe {
                let _ = KillTimer(Some(self.hwnd), id);
            }
        }
    }

    pub fn is_enabled(&self, id: usize) -> bool {
        self.enabled.contains(&id)
    }

    pub fn stop_all(&mut self) {
        for id in std::mem::take(&mut self.enabled) {
            unsafe {
                let _ = KillTimer(Some(self.hwnd), id);
            }
        }
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.stop_all();
    }
}
