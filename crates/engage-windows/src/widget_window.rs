//! The floating widget overlay.
//!
//! A layered, topmost, never-activated popup. Transparent pixels pass
//! clicks through, so the window only reacts over the visible tab and its
//! shadow. All behavior lives in [`WidgetController`]; this module feeds
//! it Win32 input and performs the effects it returns.

use std::sync::Once;
use std::time::Instant;

use engage_core::config::Config;
use engage_core::corner;
use engage_core::widget::{WidgetController, WidgetEffect, WidgetSignal, WidgetTimer};
use engage_core::{AppEvent, DpiScale, EventPublisher, Point, WindowResult};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    ReleaseCapture, SetCapture, TME_LEAVE, TRACKMOUSEEVENT, TrackMouseEvent,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CS_DBLCLKS, CreateWindowExW, DestroyWindow, GetWindowRect, IDC_ARROW, LoadCursorW,
    MA_NOACTIVATE, RegisterClassW, SW_HIDE, SW_SHOWNOACTIVATE, SWP_NOACTIVATE, SWP_NOSIZE,
    SWP_NOZORDER, SetWindowPos, ShowWindow, WM_CAPTURECHANGED, WM_DPICHANGED, WM_LBUTTONDBLCLK,
    WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEACTIVATE, WM_MOUSELEAVE, WM_MOUSEMOVE, WM_TIMER,
    WNDCLASSW, WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_POPUP,
};
use windows::core::w;

use crate::topmost::WM_ENFORCE_TOPMOST;
use crate::{app, dpi, monitor, paint, screen, timer::Timers, zorder};

/// Where the widget waits, hidden, before it is first shown.
const OFFSCREEN: Point = Point {
    x: -1000.0,
    y: -1000.0,
};

static REGISTER_CLASS: Once = Once::new();

fn ensure_class_registered() {
    REGISTER_CLASS.call_once(|| {
        let wc = WNDCLASSW {
            style: CS_DBLCLKS,
            lpfnWndProc: Some(app::widget_proc),
            hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }.unwrap_or_default(),
            lpszClassName: w!("EngageWidget"),
            ..Default::default()
        };
        unsafe {
            RegisterClassW(&wc);
        }
    });
}

/// The widget window and its controller.
pub struct WidgetWindow {
    hwnd: HWND,
    controller: WidgetController,
    timers: Timers,
    publisher: EventPublisher,
    margin: f64,
    /// Whether `TrackMouseEvent` is armed for the next `WM_MOUSELEAVE`.
    tracking: bool,
}

impl WidgetWindow {
    /// Creates the widget hidden and off-screen.
    pub fn new(config: &Config, publisher: EventPublisher) -> WindowResult<Self> {
        ensure_class_registered();

        let ex = WS_EX_LAYERED | WS_EX_TOOLWINDOW | WS_EX_TOPMOST | WS_EX_NOACTIVATE;
        let hwnd = unsafe {
            CreateWindowExW(
                ex,
                w!("EngageWidget"),
                w!("Engage Widget"),
                WS_POPUP,
                OFFSCREEN.x as i32,
                OFFSCREEN.y as i32,
                0,
                0,
                None,
                None,
                None,
                None,
            )?
        };
        zorder::apply_overlay_style(hwnd);
        log::debug!("Widget window created at {:?}", hwnd.0);

        Ok(Self {
            hwnd,
            controller: WidgetController::new(config, OFFSCREEN),
            timers: Timers::new(hwnd),
            publisher,
            margin: config.widget.margin,
            tracking: false,
        })
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    /// Shows the widget collapsed in the top-right corner of the screen
    /// under the cursor.
    pub fn show(&mut self) {
        let position = screen::top_right(self.controller.frame_size(), self.margin);
        log::info!("Showing widget at ({:.1}, {:.1})", position.x, position.y);
        let fx = self.controller.show(position);
        self.apply(fx);
    }

    pub fn hide(&mut self) {
        log::info!("Hiding widget");
        let fx = self.controller.hide();
        self.apply(fx);
        self.tracking = false;
    }

    /// Collapses a visible widget with animation.
    pub fn collapse(&mut self) {
        let fx = self.controller.collapse_externally(Instant::now());
        self.apply(fx);
    }

    pub fn is_visible(&self) -> bool {
        self.controller.is_visible()
    }

    /// Puts a visible widget back on top of the topmost band.
    pub fn enforce_topmost(&self) {
        if !self.controller.is_visible() {
            return;
        }
        if let Err(e) = zorder::ensure_topmost(self.hwnd) {
            engage_core::log::error("Failed to re-assert widget topmost", e.as_ref());
        }
    }

    /// Handles a message for the widget window. `None` means the caller
    /// should fall through to `DefWindowProcW`.
    pub(crate) fn handle(&mut self, msg: u32, wparam: WPARAM, lparam: LPARAM) -> Option<LRESULT> {
        let now = Instant::now();
        match msg {
            WM_MOUSEACTIVATE => Some(LRESULT(MA_NOACTIVATE as isize)),
            WM_MOUSEMOVE => {
                if !self.tracking {
                    self.track_leave();
                    let fx = self.controller.mouse_enter(now);
                    self.apply(fx);
                }
                if self.controller.is_dragging() {
                    let area = screen::work_area();
                    if let Some(cursor) = cursor_logical(area.scale_or_identity()) {
                        let fx = self.controller.drag_to(cursor, area.rect);
                        self.apply(fx);
                    }
                }
                Some(LRESULT(0))
            }
            WM_MOUSELEAVE => {
                self.tracking = false;
                let fx = self.controller.mouse_leave();
                self.apply(fx);
                Some(LRESULT(0))
            }
            WM_LBUTTONDOWN | WM_LBUTTONDBLCLK => {
                let clicks = if msg == WM_LBUTTONDBLCLK { 2 } else { 1 };
                let scale = screen::work_area().scale_or_identity();
                let cursor = cursor_logical(scale).unwrap_or(self.controller.position());
                let fx = self.controller.button_down(clicks, cursor, now);
                self.apply(fx);
                Some(LRESULT(0))
            }
            WM_LBUTTONUP => {
                let fx = self.controller.button_up();
                self.apply(fx);
                Some(LRESULT(0))
            }
            WM_CAPTURECHANGED => {
                // Capture taken away mid-drag (alt-tab, another window).
                if self.controller.is_dragging() && lparam.0 != self.hwnd.0 as isize {
                    let fx = self.controller.button_up();
                    self.apply(fx);
                }
                Some(LRESULT(0))
            }
            WM_TIMER => {
                if let Some(timer) = WidgetTimer::from_id(wparam.0) {
                    self.on_timer(timer, now);
                }
                Some(LRESULT(0))
            }
            WM_ENFORCE_TOPMOST => {
                self.enforce_topmost();
                Some(LRESULT(0))
            }
            WM_DPICHANGED => {
                self.apply(vec![WidgetEffect::Redraw, WidgetEffect::Move]);
                Some(LRESULT(0))
            }
            _ => None,
        }
    }

    fn on_timer(&mut self, timer: WidgetTimer, now: Instant) {
        let fx = match timer {
            WidgetTimer::IdleCollapse => self.controller.idle_elapsed(now),
            WidgetTimer::CornerHover => {
                let in_corner = cursor_in_corner();
                self.controller.corner_hover_elapsed(in_corner, now)
            }
            WidgetTimer::CornerCheck => self.controller.corner_check(cursor_in_corner()),
            WidgetTimer::Reposition => {
                let top = self.native_top();
                self.controller.reposition_elapsed(top)
            }
            WidgetTimer::Animation => self.controller.tick(now),
        };
        self.apply(fx);
    }

    /// Performs controller effects in order.
    fn apply(&mut self, effects: Vec<WidgetEffect>) {
        for effect in effects {
            match effect {
                WidgetEffect::StartTimer(t) => {
                    self.timers.start(t.id(), self.controller.interval(t));
                }
                WidgetEffect::StopTimer(t) => self.timers.stop(t.id()),
                WidgetEffect::Redraw => {
                    let frame = self.controller.render(self.scale());
                    paint::present(self.hwnd, &frame, 1.0, None);
                }
                WidgetEffect::Move => self.move_native(),
                WidgetEffect::Show => unsafe {
                    let _ = ShowWindow(self.hwnd, SW_SHOWNOACTIVATE);
                },
                WidgetEffect::Hide => unsafe {
                    let _ = ShowWindow(self.hwnd, SW_HIDE);
                },
                WidgetEffect::SnapToTopEdge => {
                    let top = zorder::pin_to_top_edge(self.hwnd);
                    self.controller.sync_native_top(top);
                }
                WidgetEffect::CaptureMouse => unsafe {
                    SetCapture(self.hwnd);
                },
                WidgetEffect::ReleaseMouse => unsafe {
                    let _ = ReleaseCapture();
                },
                WidgetEffect::Emit(WidgetSignal::Clicked) => {
                    self.publisher.publish(AppEvent::WidgetClicked);
                }
                WidgetEffect::Emit(WidgetSignal::DoubleClicked) => {
                    log::debug!("Widget double-clicked");
                    self.publisher.publish(AppEvent::WidgetDoubleClicked);
                }
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
            engage_core::log::error("Failed to move widget", &e);
        }
    }

    /// Current window top in logical units.
    fn native_top(&self) -> f64 {
        let mut rect = RECT::default();
        match unsafe { GetWindowRect(self.hwnd, &mut rect) } {
            Ok(()) => f64::from(rect.top) / self.scale().y,
            Err(e) => {
                engage_core::log::error("Failed to read widget position", &e);
                self.controller.position().y
            }
        }
    }

    fn track_leave(&mut self) {
        let mut tme = TRACKMOUSEEVENT {
            cbSize: std::mem::size_of::<TRACKMOUSEEVENT>() as u32,
            dwFlags: TME_LEAVE,
            hwndTrack: self.hwnd,
            dwHoverTime: 0,
        };
        self.tracking = unsafe { TrackMouseEvent(&mut tme) }.is_ok();
    }
}

impl Drop for WidgetWindow {
    fn drop(&mut self) {
        self.timers.stop_all();
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
    }
}

fn cursor_logical(scale: DpiScale) -> Option<Point> {
    match monitor::cursor_position() {
        Ok((x, y)) => Some(scale.point_to_logical(x, y)),
        Err(e) => {
            log::debug!("Cursor position unavailable: {e}");
            None
        }
    }
}

fn cursor_in_corner() -> bool {
    let area = screen::work_area();
    monitor::cursor_position()
        .map(|c| corner::is_in_top_right_corner(c, area.rect, area.scale))
        .unwrap_or(false)
}
