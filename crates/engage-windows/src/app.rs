//! Startup, the UI message loop, and event routing.
//!
//! Both windows live in a thread-local on the UI thread. Window procedures
//! borrow it for the duration of one message; a message that arrives while
//! the state is already borrowed (a synchronous `SetWindowPos` callback,
//! for instance) goes straight to `DefWindowProcW`. Events published
//! during a message are routed after it has been dispatched.

use std::cell::RefCell;

use engage_core::config::Config;
use engage_core::{AppEvent, EventBus, EventPublisher, WindowResult};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    DefWindowProcW, DispatchMessageW, GetMessageW, MSG, PostQuitMessage, TranslateMessage,
};

use crate::dpi;
use crate::main_window::MainWindow;
use crate::topmost::TopmostTicker;
use crate::widget_window::WidgetWindow;

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

struct App {
    main: MainWindow,
    widget: WidgetWindow,
    bus: EventBus,
    publisher: EventPublisher,
    _ticker: Option<TopmostTicker>,
}

/// Creates both windows and runs the message loop until shutdown.
///
/// The main window appears centered on the primary screen. With
/// `show_widget` the widget is shown right away as well, otherwise it
/// waits for the main window to be minimized.
pub fn run(config: Config, show_widget: bool) -> WindowResult<()> {
    engage_core::log::init(&config.logging);
    log::info!("Engage {} starting", env!("CARGO_PKG_VERSION"));

    let awareness = dpi::enable_dpi_awareness();
    log::info!("DPI awareness: {awareness:?}");

    let bus = EventBus::new();
    let main = MainWindow::new(&config.main_window, bus.publisher())?;
    let widget = WidgetWindow::new(&config, bus.publisher())?;
    let ticker = match config.timing.topmost_interval() {
        Some(interval) => Some(TopmostTicker::spawn(widget.hwnd(), interval)),
        None => {
            log::info!("Topmost enforcement disabled");
            None
        }
    };
    let publisher = bus.publisher();

    APP.with(|cell| {
        *cell.borrow_mut() = Some(App {
            main,
            widget,
            bus,
            publisher,
            _ticker: ticker,
        });
    });

    with_app(|app| {
        app.main.show();
        if show_widget {
            app.widget.show();
        }
    });

    message_loop();

    // Dropping the app stops the ticker and destroys both windows.
    let app = APP.with(|cell| cell.borrow_mut().take());
    drop(app);
    log::info!("Engage stopped");
    Ok(())
}

fn message_loop() {
    let mut msg = MSG::default();
    loop {
        // SAFETY: `msg` is a valid out-pointer for GetMessageW.
        let ret = unsafe { GetMessageW(&mut msg, None, 0, 0) };
        // 0 is WM_QUIT, -1 is an error.
        if ret.0 <= 0 {
            if ret.0 < 0 {
                log::error!("GetMessageW failed, leaving the message loop");
            }
            break;
        }
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
        route_pending();
    }
}

/// Routes every queued event, including ones published while routing.
fn route_pending() {
    while let Some(event) = with_app(|app| app.bus.try_recv()).flatten() {
        with_app(|app| app.route(event));
    }
}

impl App {
    fn route(&mut self, event: AppEvent) {
        log::debug!("Routing {event:?}");
        match event {
            AppEvent::WindowMinimized => {
                self.main.minimize();
                if self.widget.is_visible() {
                    self.widget.collapse();
                } else {
                    self.widget.show();
                }
            }
            AppEvent::WindowRestoreRequested => {
                self.main.restore();
                self.widget.hide();
            }
            AppEvent::WidgetClicked => {}
            AppEvent::WidgetDoubleClicked => {
                self.publisher.publish(AppEvent::WindowRestoreRequested);
            }
            AppEvent::ToggleWidget => {
                if self.widget.is_visible() {
                    self.widget.hide();
                } else {
                    self.widget.show();
                }
            }
            AppEvent::Shutdown => {
                log::info!("Shutdown requested");
                unsafe { PostQuitMessage(0) };
            }
        }
    }
}

/// Runs `f` against the app state, or returns `None` if it is not set up
/// yet, already torn down, or borrowed further up the stack.
fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| {
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

pub(crate) unsafe extern "system" fn widget_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let handled = with_app(|app| {
        if app.widget.hwnd() == hwnd {
            app.widget.handle(msg, wparam, lparam)
        } else {
            None
        }
    })
    .flatten();
    handled.unwrap_or_else(|| unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) })
}

pub(crate) unsafe extern "system" fn main_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let handled = with_app(|app| {
        if app.main.hwnd() == hwnd {
            app.main.handle(msg, wparam, lparam)
        } else {
            None
        }
    })
    .flatten();
    handled.unwrap_or_else(|| unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) })
}
