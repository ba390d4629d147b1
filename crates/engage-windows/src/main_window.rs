//! The main application window.
//!
//! A borderless layered popup with its own title bar. The caption area is
//! draggable through `HTCAPTION`; the minimize, close and "test widget"
//! buttons publish onto the event bus instead of acting directly, so the
//! app loop can coordinate the two windows.

use std::sync::Once;
use std::time::Instant;

use engage_core::config::MainWindowConfig;
use engage_core::main_window::{HitZone, MainButton, MainEffect, MainWindowController, Phase};
use engage_core::placement::DEFAULT_SNAP_DISTANCE;
use engage_core::widget::FRAME_INTERVAL;
use engage_core::{AppEvent, DpiScale, EventPublisher, Point, WindowResult};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DestroyWindow, GetWindowRect, HTCAPTION, HTCLIENT, IDC_ARROW, LoadCursorW,
    RegisterClassW, SC_MINIMIZE, SW_HIDE, SW_SHOW, SWP_NOACTIVATE, SWP_NOSIZE, SWP_NOZORDER,
    SetForegroundWindow, SetWindowPos, ShowWindow, WM_CLOSE, WM_DPICHANGED, WM_EXITSIZEMOVE,
    WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOVE, WM_NCHITTEST, WM_SYSCOMMAND, WM_TIMER, WNDCLASSW,
    WS_EX_APPWINDOW, WS_EX_LAYERED, WS_MINIMIZEBOX, WS_POPUP, WS_SYSMENU,
};
use windows::core::{HSTRING, PCWSTR, w};

use crate::{app, dpi, paint, screen, timer::Timers};

const ANIMATION_TIMER: usize = 1;

static REGISTER_CLASS: Once = Once::new();

fn ensure_class_registered() {
    REGISTER_CLASS.call_once(|| {
        let wc = WNDCLASSW {
            lpfnWndProc: Some(app::main_proc),
            hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }.unwrap_or_default(),
            lpszClassName: w!("EngageMainWindow"),
            ..Default::default()
        };
        unsafe {
            RegisterClassW(&wc);
        }
    });
}

pub struct MainWindow {
    hwnd: HWND,
    controller: MainWindowController,
    timers: Timers,
    publisher: EventPublisher,
    /// Button under the last left press, acted on at release.
    pressed: Option<MainButton>,
}

impl MainWindow {
    /// Creates the window centered on the primary screen. It stays hidden
    /// until [`show`](Self::show).
    pub fn new(config: &MainWindowConfig, publisher: EventPublisher) -> WindowResult<Self> {
        ensure_class_registered();

        let position = screen::center(config.size());
        let title = HSTRING::from(config.title.as_str());
        let hwnd = unsafe {
            CreateWindowExW(
                WS_EX_LAYERED | WS_EX_APPWINDOW,
                w!("EngageMainWindow"),
                PCWSTR(title.as_ptr()),
                WS_POPUP | WS_SYSMENU | WS_MINIMIZEBOX,
                0,
                0,
                0,
                0,
                None,
                None,
                None,
                None,
            )?
        };
        log::debug!(
            "Main window created at ({:.1}, {:.1})",
            position.x,
            position.y
        );

        Ok(Self {
            hwnd,
            controller: MainWindowController::new(config, position),
            timers: Timers::new(hwnd),
            publisher,
            pressed: None,
        })
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    /// First appearance, without animation.
    pub fn show(&mut self) {
        self.apply(vec![MainEffect::Move, MainEffect::Redraw, MainEffect::Show]);
    }

    /// Runs the minimize animation; the window hides when it completes.
    pub fn minimize(&mut self) {
        log::info!("Minimizing main window");
        let fx = self.controller.minimize(Instant::now());
        self.apply(fx);
    }

    /// Brings the window back at its last position.
    pub fn restore(&mut self) {
        log::info!("Restoring main window");
        let fx = self.controller.restore(Instant::now());
        self.apply(fx);
    }

    pub(crate) fn handle(&mut self, msg: u32, wparam: WPARAM, lparam: LPARAM) -> Option<LRESULT> {
        match msg {
            WM_NCHITTEST => {
                let point = self.to_window_logical(split_lparam(lparam))?;
                let hit = match self.controller.hit_test(point) {
                    HitZone::Caption => HTCAPTION,
                    HitZone::Button(_) | HitZone::Client => HTCLIENT,
                };
                Some(LRESULT(hit as isize))
            }
            WM_LBUTTONDOWN => {
                self.pressed = self.button_at_client(lparam);
                Some(LRESULT(0))
            }
            WM_LBUTTONUP => {
                let released = self.button_at_client(lparam);
                if let Some(button) = self.pressed.take().filter(|b| Some(*b) == released) {
                    self.press(button);
                }
                Some(LRESULT(0))
            }
            WM_SYSCOMMAND if (wparam.0 & 0xFFF0) as u32 == SC_MINIMIZE => {
                self.publisher.publish(AppEvent::WindowMinimized);
                Some(LRESULT(0))
            }
            WM_CLOSE => {
                self.publisher.publish(AppEvent::Shutdown);
                Some(LRESULT(0))
            }
            WM_MOVE => {
                if let Some(pos) = self.native_position() {
                    self.controller.moved(pos);
                }
                None
            }
            WM_EXITSIZEMOVE => {
                self.snap_to_edges();
                None
            }
            WM_TIMER if wparam.0 == ANIMATION_TIMER => {
                let fx = self.controller.tick(Instant::now());
                self.apply(fx);
                Some(LRESULT(0))
            }
            WM_DPICHANGED => {
                self.apply(vec![MainEffect::Move, MainEffect::Redraw]);
                Some(LRESULT(0))
            }
            _ => None,
        }
    }

    fn press(&mut self, button: MainButton) {
        log::debug!("Main window button: {button:?}");
        let event = match button {
            MainButton::Minimize => AppEvent::WindowMinimized,
            MainButton::Close => AppEvent::Shutdown,
            MainButton::TestWidget => AppEvent::ToggleWidget,
        };
        self.publisher.publish(event);
    }

    /// Pulls the window flush against a work-area edge it was dropped
    /// close to.
    fn snap_to_edges(&mut self) {
        if self.controller.phase() != Phase::Visible {
            return;
        }
        let snap = screen::snap(
            self.controller.position(),
            self.controller.size(),
            DEFAULT_SNAP_DISTANCE,
        );
        if snap.snapped {
            self.controller.moved(snap.position);
            self.apply(vec![MainEffect::Move]);
        }
    }

    fn apply(&mut self, effects: Vec<MainEffect>) {
        for effect in effects {
            match effect {
                MainEffect::StartAnimation => {
                    if !self.timers.is_enabled(ANIMATION_TIMER) {
                        self.timers.start(ANIMATION_TIMER, FRAME_INTERVAL);
                    }
                }
                MainEffect::StopAnimation => self.timers.stop(ANIMATION_TIMER),
                MainEffect::Redraw => {
                    let frame = self.controller.render(self.scale());
                    let opacity = self.controller.visual().opacity;
                    paint::present(self.hwnd, &frame, opacity, None);
                }
                MainEffect::Move => self.move_native(),
                MainEffect::Show => unsafe {
                    let _ = ShowWindow(self.hwnd, SW_SHOW);
                    let _ = SetForegroundWindow(self.hwnd);
                },
                MainEffect::Hide => unsafe {
                    let _ = ShowWindow(self.hwnd, SW_HIDE);
                },
            }
        }
    }

    fn scale(&self) -> DpiScale {
        dpi::scale_for_window(self.hwnd).unwrap_or(DpiScale::IDENTITY)
    }

    fn move_native(&self) {
        let (x, y) = self.scale().to_physical(self.controller.position());
        let result = unsafe {
            SetWindowPos(
                self.hwnd,
                None,
                x,
                y,
                0,
                0,
                SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
            )
        };
        if let Err(e) = result {
            engage_core::log::error("Failed to move main window", &e);
        }
    }

    fn native_rect(&self) -> Option<RECT> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(self.hwnd, &mut rect) }.ok()?;
        Some(rect)
    }

    fn native_position(&self) -> Option<Point> {
        let rect = self.native_rect()?;
        Some(self.scale().point_to_logical(rect.left, rect.top))
    }

    /// Converts a screen point in device pixels to window-relative logical
    /// units.
    fn to_window_logical(&self, (x, y): (i32, i32)) -> Option<Point> {
        let rect = self.native_rect()?;
        Some(
            self.scale()
                .point_to_logical(x - rect.left, y - rect.top),
        )
    }

    fn button_at_client(&self, lparam: LPARAM) -> Option<MainButton> {
        let (x, y) = split_lparam(lparam);
        match self.controller.hit_test(self.scale().point_to_logical(x, y)) {
            HitZone::Button(b) => Some(b),
            HitZone::Caption | HitZone::Client => None,
        }
    }
}

impl Drop for MainWindow {
    fn drop(&mut self) {
        self.timers.stop_all();
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
    }
}

/// Signed x/y packed in a mouse message's `LPARAM`.
fn split_lparam(lparam: LPARAM) -> (i32, i32) {
    let x = (lparam.0 & 0xFFFF) as u16 as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as u16 as i16 as i32;
    (x, y)
}
