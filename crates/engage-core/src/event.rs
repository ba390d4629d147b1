/// Application-level signals exchanged between the two windows.
///
/// Window procedures publish these onto the [`EventBus`](crate::EventBus);
/// the UI loop drains and routes them after each dispatched message, so a
/// handler never re-enters the window that published the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The main window was minimized; the widget should appear.
    WindowMinimized,

    /// The user asked for the main window back (widget double-click).
    WindowRestoreRequested,

    /// The widget received a single click.
    WidgetClicked,

    /// The widget received a double click.
    WidgetDoubleClicked,

    /// Show the widget if hidden, hide it if shown.
    ToggleWidget,

    /// Close both windows and leave the message loop.
    Shutdown,
}
