//! Floating widget behavior.
//!
//! [`WidgetController`] owns everything about the widget except the native
//! window: position, expansion, drag state, timers, and the running
//! storyboard. Each input returns the [`WidgetEffect`]s the platform layer
//! must perform, in order. Positions are logical units in screen space;
//! `left`/`top` refer to the widget window frame, which is larger than the
//! visible tab (see [`WidgetConfig::frame_size`]).

use std::time::{Duration, Instant};

use crate::anim::{Animatable, Property, Storyboard, Tween};
use crate::appearance::{Appearance, Palette};
use crate::config::{Config, TimingConfig, WidgetConfig};
use crate::dpi::DpiScale;
use crate::placement::{self, Snap};
use crate::raster::{Canvas, CornerRadii, Frame, Label, Shape};
use crate::rect::{LogicalRect, Point, Rect, Size};

/// Interval of the animation frame timer.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Drift beyond which the delayed reposition check re-applies the top edge.
const REPOSITION_TOLERANCE: f64 = 1.0;
/// Drift beyond which a finished expand/collapse restores the stored top.
const ANIMATION_TOP_TOLERANCE: f64 = 0.1;
/// Drift beyond which a natively applied top is adopted.
const NATIVE_TOP_TOLERANCE: f64 = 0.5;

const COLLAPSED_SHADOW: ShadowStyle = ShadowStyle {
    opacity: 0.15,
    depth: 1.5,
    blur: 5.0,
};

const EXPANDED_SHADOW: ShadowStyle = ShadowStyle {
    opacity: 0.6,
    depth: 3.0,
    blur: 10.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct ShadowStyle {
    opacity: f64,
    depth: f64,
    blur: f64,
}

/// Timers owned by the widget window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetTimer {
    /// Collapses the widget after the cursor has been away a while.
    IdleCollapse,
    /// Expands the widget once the cursor rests in the hot corner.
    CornerHover,
    /// Polls whether the cursor is in the hot corner.
    CornerCheck,
    /// One-shot position check shortly after showing.
    Reposition,
    /// Storyboard frame ticks.
    Animation,
}

impl WidgetTimer {
    pub const ALL: [WidgetTimer; 5] = [
        Self::IdleCollapse,
        Self::CornerHover,
        Self::CornerCheck,
        Self::Reposition,
        Self::Animation,
    ];

    /// Stable numeric id, usable as a Win32 timer id.
    pub fn id(self) -> usize {
        match self {
            Self::IdleCollapse => 1,
            Self::CornerHover => 2,
            Self::CornerCheck => 3,
            Self::Reposition => 4,
            Self::Animation => 5,
        }
    }

    pub fn from_id(id: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    fn bit(self) -> u8 {
        1 << self.id()
    }
}

/// Signals the widget raises towards the rest of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetSignal {
    Clicked,
    DoubleClicked,
}

/// Work for the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEffect {
    StartTimer(WidgetTimer),
    StopTimer(WidgetTimer),
    /// Re-render the layered window from [`WidgetController::render`].
    Redraw,
    /// Move the native window to [`WidgetController::position`].
    Move,
    Show,
    Hide,
    /// Re-apply the overlay styles and pin the window to the absolute top
    /// of its screen, then report the result via
    /// [`WidgetController::sync_native_top`].
    SnapToTopEdge,
    CaptureMouse,
    ReleaseMouse,
    Emit(WidgetSignal),
}

/// The animated part of the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetVisual {
    /// Visible tab width.
    pub width: f64,
    /// Visible tab height.
    pub height: f64,
    pub shadow_opacity: f64,
    pub shadow_depth: f64,
    pub blur_radius: f64,
    /// Top of the widget window.
    pub top: f64,
}

impl Animatable for WidgetVisual {
    fn property(&self, property: Property) -> f64 {
        match property {
            Property::Width => self.width,
            Property::Height => self.height,
            Property::ShadowOpacity => self.shadow_opacity,
            Property::ShadowDepth => self.shadow_depth,
            Property::BlurRadius => self.blur_radius,
            Property::Top => self.top,
            Property::Opacity | Property::Scale => 1.0,
        }
    }

    fn set_property(&mut self, property: Property, value: f64) {
        match property {
            Property::Width => self.width = value,
            Property::Height => self.height = value,
            Property::ShadowOpacity => self.shadow_opacity = value,
            Property::ShadowDepth => self.shadow_depth = value,
            Property::BlurRadius => self.blur_radius = value,
            Property::Top => self.top = value,
            Property::Opacity | Property::Scale => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Collapsed,
    Expanded,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    origin: Point,
}

/// Widget state machine. Lives on the UI thread.
#[derive(Debug)]
pub struct WidgetController {
    config: WidgetConfig,
    timing: TimingConfig,
    appearance: Appearance,
    left: f64,
    visual: WidgetVisual,
    visible: bool,
    target: Target,
    manually_expanded: bool,
    drag: Option<Drag>,
    storyboard: Option<Storyboard>,
    /// Top recorded when an expand/collapse began.
    stored_top: f64,
    /// Top recorded after the last absolute-top-edge placement.
    anchor_top: f64,
    running: u8,
}

impl WidgetController {
    /// Creates a hidden, collapsed widget at `position`.
    pub fn new(config: &Config, position: Point) -> Self {
        let collapsed = collapsed_visual(&config.widget, position.y);
        Self {
            config: config.widget.clone(),
            timing: config.timing.clone(),
            appearance: config.appearance.clone(),
            left: position.x,
            visual: collapsed,
            visible: false,
            target: Target::Collapsed,
            manually_expanded: false,
            drag: None,
            storyboard: None,
            stored_top: position.y,
            anchor_top: position.y,
            running: 0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_expanded(&self) -> bool {
        self.target == Target::Expanded
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.storyboard.is_some()
    }

    pub fn is_timer_running(&self, timer: WidgetTimer) -> bool {
        self.running & timer.bit() != 0
    }

    /// Window frame position.
    pub fn position(&self) -> Point {
        Point::new(self.left, self.visual.top)
    }

    pub fn frame_size(&self) -> Size {
        self.config.frame_size()
    }

    pub fn visual(&self) -> WidgetVisual {
        self.visual
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    /// Interval the platform should use for `timer`.
    pub fn interval(&self, timer: WidgetTimer) -> Duration {
        match timer {
            WidgetTimer::IdleCollapse => self.timing.idle_collapse(),
            WidgetTimer::CornerHover => self.timing.corner_hover(),
            WidgetTimer::CornerCheck => self.timing.corner_check(),
            WidgetTimer::Reposition => self.timing.reposition_delay(),
            WidgetTimer::Animation => FRAME_INTERVAL,
        }
    }

    /// Places the widget at `position`, pins it to the top edge, shows it
    /// collapsed, and starts the reposition and corner timers.
    pub fn show(&mut self, position: Point) -> Vec<WidgetEffect> {
        let mut fx = Vec::new();
        self.left = position.x;
        self.visual.top = position.y;
        self.visible = true;
        fx.push(WidgetEffect::Move);
        self.collapse_immediately(&mut fx);
        fx.push(WidgetEffect::SnapToTopEdge);
        fx.push(WidgetEffect::Show);
        self.start(WidgetTimer::Reposition, &mut fx);
        self.start(WidgetTimer::CornerCheck, &mut fx);
        fx
    }

    /// Hides the widget and stops its background timers.
    pub fn hide(&mut self) -> Vec<WidgetEffect> {
        let mut fx = Vec::new();
        self.visible = false;
        if self.drag.take().is_some() {
            fx.push(WidgetEffect::ReleaseMouse);
        }
        self.manually_expanded = false;
        for timer in [
            WidgetTimer::IdleCollapse,
            WidgetTimer::CornerHover,
            WidgetTimer::CornerCheck,
            WidgetTimer::Reposition,
        ] {
            self.stop(timer, &mut fx);
        }
        fx.push(WidgetEffect::Hide);
        fx
    }

    pub fn mouse_enter(&mut self, now: Instant) -> Vec<WidgetEffect> {
        let mut fx = Vec::new();
        self.stop(WidgetTimer::IdleCollapse, &mut fx);
        self.expand(now, &mut fx);
        fx
    }

    pub fn mouse_leave(&mut self) -> Vec<WidgetEffect> {
        let mut fx = Vec::new();
        if self.drag.is_none() && !self.manually_expanded {
            self.start(WidgetTimer::IdleCollapse, &mut fx);
        }
        fx
    }

    /// Left button press. `clicks` is 1 for a press, 2 for a double click.
    pub fn button_down(&mut self, clicks: u32, cursor: Point, now: Instant) -> Vec<WidgetEffect> {
        let mut fx = Vec::new();
        match clicks {
            1 => {
                self.drag = Some(Drag { origin: cursor });
                fx.push(WidgetEffect::CaptureMouse);
                fx.push(WidgetEffect::Emit(WidgetSignal::Clicked));
                self.expand(now, &mut fx);
                self.stop(WidgetTimer::IdleCollapse, &mut fx);
                self.manually_expanded = true;
            }
            2 => fx.push(WidgetEffect::Emit(WidgetSignal::DoubleClicked)),
            _ => {}
        }
        fx
    }

    /// Cursor movement while the button is held.
    ///
    /// Moves by the cursor offset. Steps longer than the drag threshold
    /// snap the visible tab to any nearby edge of `area`.
    pub fn drag_to(&mut self, cursor: Point, area: LogicalRect) -> Vec<WidgetEffect> {
        let Some(drag) = self.drag.as_mut() else {
            return Vec::new();
        };
        let offset = drag.origin.offset_to(cursor);
        drag.origin = cursor;

        let mut left = self.left + offset.x;
        let mut top = self.visual.top + offset.y;

        if offset.length() > self.config.drag_snap_threshold {
            let inset = self.tab_inset();
            let tab = Size::new(self.visual.width, self.visual.height);
            let Snap { position, .. } = placement::snap_to_nearest_edge(
                Point::new(left + inset, top),
                tab,
                area,
                self.config.snap_distance,
            );
            left = position.x - inset;
            top = position.y;
        }

        self.left = left;
        self.visual.top = top;
        self.anchor_top = top;
        vec![WidgetEffect::Move]
    }

    /// Ends a drag. A release with no drag in progress (the trailing
    /// release of a double click) is ignored.
    pub fn button_up(&mut self) -> Vec<WidgetEffect> {
        let mut fx = Vec::new();
        if self.drag.take().is_none() {
            return fx;
        }
        fx.push(WidgetEffect::ReleaseMouse);
        self.manually_expanded = false;
        self.start(WidgetTimer::IdleCollapse, &mut fx);
        fx
    }

    pub fn idle_elapsed(&mut self, now: Instant) -> Vec<WidgetEffect> {
        let mut fx = Vec::new();
        self.stop(WidgetTimer::IdleCollapse, &mut fx);
        self.collapse(now, &mut fx);
        fx
    }

    /// Corner poll tick.
    pub fn corner_check(&mut self, in_corner: bool) -> Vec<WidgetEffect> {
        let mut fx = Vec::new();
        if !self.visible || self.manually_expanded || self.drag.is_some() {
            return fx;
        }
        let hovering = self.is_timer_running(WidgetTimer::CornerHover);
        if in_corner && !hovering {
            self.start(WidgetTimer::CornerHover, &mut fx);
        } else if !in_corner && hovering {
            self.stop(WidgetTimer::CornerHover, &mut fx);
        }
        fx
    }

    /// The cursor stayed in the corner for the hover delay.
    ///
    /// Only expands. The idle timer is left to `mouse_leave` and
    /// `button_up`, so the tab stays open while the cursor rests on it.
    pub fn corner_hover_elapsed(&mut self, in_corner: bool, now: Instant) -> Vec<WidgetEffect> {
        let mut fx = Vec::new();
        self.stop(WidgetTimer::CornerHover, &mut fx);
        if in_corner && self.visible {
            self.expand(now, &mut fx);
        }
        fx
    }

    /// One-shot check after showing. `current_top` is where the native
    /// window actually is.
    pub fn reposition_elapsed(&mut self, current_top: f64) -> Vec<WidgetEffect> {
        let mut fx = Vec::new();
        self.stop(WidgetTimer::Reposition, &mut fx);
        if self.visible && (current_top - self.anchor_top).abs() > REPOSITION_TOLERANCE {
            self.visual.top = current_top;
            fx.push(WidgetEffect::SnapToTopEdge);
        }
        fx
    }

    /// Collapse requested from outside the widget.
    pub fn collapse_externally(&mut self, now: Instant) -> Vec<WidgetEffect> {
        let mut fx = Vec::new();
        self.collapse(now, &mut fx);
        fx
    }

    /// Adopts a top applied by native positioning when it differs by more
    /// than half a unit, and remembers it for the reposition check.
    pub fn sync_native_top(&mut self, top: f64) {
        if (top - self.visual.top).abs() > NATIVE_TOP_TOLERANCE {
            self.visual.top = top;
        }
        self.anchor_top = self.visual.top;
        self.stored_top = self.visual.top;
    }

    /// Replaces the widget's colors and label. Invalid colors keep their
    /// previous value.
    pub fn customize(
        &mut self,
        background: &str,
        text: &str,
        text_color: &str,
        glow: &str,
    ) -> Vec<WidgetEffect> {
        self.appearance.customize(background, text, text_color, glow);
        vec![WidgetEffect::Redraw]
    }

    /// Advances the running storyboard.
    pub fn tick(&mut self, now: Instant) -> Vec<WidgetEffect> {
        let mut fx = Vec::new();
        let Some(board) = self.storyboard.as_ref() else {
            self.stop(WidgetTimer::Animation, &mut fx);
            return fx;
        };
        let done = board.apply(&mut self.visual, now);
        fx.push(WidgetEffect::Redraw);
        if done {
            self.storyboard = None;
            self.stop(WidgetTimer::Animation, &mut fx);
            if (self.visual.top - self.stored_top).abs() > ANIMATION_TOP_TOLERANCE {
                self.visual.top = self.stored_top;
                fx.push(WidgetEffect::Move);
            }
        }
        fx
    }

    /// Renders the widget frame at `scale`: the shadow and the tab, with
    /// the tab centered horizontally against the top edge, and the label
    /// once the tab is large enough to hold it.
    pub fn render(&self, scale: DpiScale) -> Frame {
        let frame = self.frame_size();
        let mut canvas = Canvas::new(
            scale.width_to_physical(frame.width),
            scale.height_to_physical(frame.height),
        );
        let palette: Palette = self.appearance.palette();
        let v = self.visual;
        let tab = Shape {
            x: self.tab_inset() * scale.x,
            y: 0.0,
            w: v.width * scale.x,
            h: v.height * scale.y,
            radii: CornerRadii::bottom(self.config.corner_radius).scaled(scale.y),
        };
        canvas.shadow(
            tab,
            palette.glow,
            v.shadow_opacity,
            v.shadow_depth * scale.y,
            v.blur_radius * scale.y,
        );
        canvas.fill_shape(tab, palette.background, 0xFF);

        let mut labels = Vec::new();
        if self.shows_label() && !palette.text.is_empty() {
            labels.push(Label {
                text: palette.text,
                bounds: Rect::new(
                    tab.x.round() as i32,
                    0,
                    tab.w.round() as i32,
                    tab.h.round() as i32,
                ),
                color: palette.text_color,
                font_px: (tab.h * 0.5).round() as i32,
                bold: true,
            });
        }
        Frame { canvas, labels }
    }

    /// Whether the label fits the current tab size.
    pub fn shows_label(&self) -> bool {
        self.visual.width > self.config.collapsed_size * 2.0
    }

    fn tab_inset(&self) -> f64 {
        (self.frame_size().width - self.visual.width) / 2.0
    }

    fn expand(&mut self, now: Instant, fx: &mut Vec<WidgetEffect>) {
        if self.target == Target::Expanded {
            return;
        }
        self.target = Target::Expanded;
        let c = &self.config;
        let tweens = visual_tweens(
            c.expanded_width,
            c.expanded_height,
            EXPANDED_SHADOW,
            c.animation(),
        );
        self.begin(tweens, now, fx);
    }

    fn collapse(&mut self, now: Instant, fx: &mut Vec<WidgetEffect>) {
        self.stop(WidgetTimer::IdleCollapse, fx);
        if self.target == Target::Collapsed {
            return;
        }
        self.target = Target::Collapsed;
        let c = &self.config;
        let tweens = visual_tweens(
            c.collapsed_size,
            c.collapsed_size,
            COLLAPSED_SHADOW,
            c.animation(),
        );
        self.begin(tweens, now, fx);
    }

    fn collapse_immediately(&mut self, fx: &mut Vec<WidgetEffect>) {
        self.stop(WidgetTimer::IdleCollapse, fx);
        self.storyboard = None;
        self.stop(WidgetTimer::Animation, fx);
        self.target = Target::Collapsed;
        self.visual = collapsed_visual(&self.config, self.visual.top);
        self.stored_top = self.visual.top;
        fx.push(WidgetEffect::Redraw);
    }

    fn begin(&mut self, tweens: Vec<Tween>, now: Instant, fx: &mut Vec<WidgetEffect>) {
        self.stored_top = self.visual.top;
        self.storyboard = Some(Storyboard::begin(tweens, &self.visual, now));
        self.start(WidgetTimer::Animation, fx);
    }

    fn start(&mut self, timer: WidgetTimer, fx: &mut Vec<WidgetEffect>) {
        self.running |= timer.bit();
        fx.push(WidgetEffect::StartTimer(timer));
    }

    fn stop(&mut self, timer: WidgetTimer, fx: &mut Vec<WidgetEffect>) {
        if self.is_timer_running(timer) {
            self.running &= !timer.bit();
            fx.push(WidgetEffect::StopTimer(timer));
        }
    }
}

fn collapsed_visual(config: &WidgetConfig, top: f64) -> WidgetVisual {
    WidgetVisual {
        width: config.collapsed_size,
        height: config.collapsed_size,
        shadow_opacity: COLLAPSED_SHADOW.opacity,
        shadow_depth: COLLAPSED_SHADOW.depth,
        blur_radius: COLLAPSED_SHADOW.blur,
        top,
    }
}

fn visual_tweens(width: f64, height: f64, shadow: ShadowStyle, duration: Duration) -> Vec<Tween> {
    vec![
        Tween::to(Property::Width, width, duration),
        Tween::to(Property::Height, height, duration),
        Tween::to(Property::ShadowOpacity, shadow.opacity, duration),
        Tween::to(Property::ShadowDepth, shadow.depth, duration),
        Tween::to(Property::BlurRadius, shadow.blur, duration),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> WidgetController {
        WidgetController::new(&Config::default(), Point::new(-1000.0, -1000.0))
    }

    fn shown() -> WidgetController {
        let mut w = controller();
        w.show(Point::new(1820.0, 20.0));
        w.sync_native_top(0.0);
        w
    }

    fn area() -> LogicalRect {
        LogicalRect::new(0.0, 0.0, 1920.0, 1040.0)
    }

    fn finish(w: &mut WidgetController, start: Instant) -> Vec<WidgetEffect> {
        w.tick(start + Duration::from_secs(5))
    }

    #[test]
    fn new_widget_is_hidden_and_collapsed() {
        // Act
        let w = controller();

        // Assert
        assert!(!w.is_visible());
        assert!(!w.is_expanded());
        assert_eq!(w.position(), Point::new(-1000.0, -1000.0));
        assert_eq!(w.visual().width, 15.0);
    }

    #[test]
    fn show_positions_snaps_and_starts_timers() {
        // Arrange
        let mut w = controller();

        // Act
        let fx = w.show(Point::new(1820.0, 20.0));

        // Assert
        assert!(w.is_visible());
        assert_eq!(
            fx,
            vec![
                WidgetEffect::Move,
                WidgetEffect::Redraw,
                WidgetEffect::SnapToTopEdge,
                WidgetEffect::Show,
                WidgetEffect::StartTimer(WidgetTimer::Reposition),
                WidgetEffect::StartTimer(WidgetTimer::CornerCheck),
            ]
        );
        assert_eq!(w.position(), Point::new(1820.0, 20.0));
    }

    #[test]
    fn show_collapses_an_expanded_widget_immediately() {
        // Arrange
        let mut w = shown();
        w.mouse_enter(Instant::now());

        // Act
        w.show(Point::new(1820.0, 20.0));

        // Assert
        assert!(!w.is_expanded());
        assert!(!w.is_animating());
        assert_eq!(w.visual().width, 15.0);
        assert_eq!(w.visual().shadow_opacity, 0.15);
    }

    #[test]
    fn hide_stops_background_timers() {
        // Arrange
        let mut w = shown();
        w.corner_check(true);

        // Act
        let fx = w.hide();

        // Assert
        assert!(!w.is_visible());
        assert!(fx.contains(&WidgetEffect::StopTimer(WidgetTimer::CornerCheck)));
        assert!(fx.contains(&WidgetEffect::StopTimer(WidgetTimer::CornerHover)));
        assert!(fx.contains(&WidgetEffect::StopTimer(WidgetTimer::Reposition)));
        assert_eq!(fx.last(), Some(&WidgetEffect::Hide));
        assert!(!w.is_timer_running(WidgetTimer::CornerCheck));
    }

    #[test]
    fn sync_native_top_ignores_sub_half_unit_drift() {
        // Arrange
        let mut w = shown();

        // Act
        w.sync_native_top(0.4);

        // Assert
        assert_eq!(w.position().y, 0.0);

        // Act
        w.sync_native_top(-5.0);

        // Assert
        assert_eq!(w.position().y, -5.0);
    }

    #[test]
    fn mouse_enter_expands_with_animation() {
        // Arrange
        let mut w = shown();
        let start = Instant::now();

        // Act
        let fx = w.mouse_enter(start);

        // Assert
        assert!(w.is_expanded());
        assert!(fx.contains(&WidgetEffect::StartTimer(WidgetTimer::Animation)));

        // Act
        let fx = finish(&mut w, start);

        // Assert
        assert!(!w.is_animating());
        assert!(fx.contains(&WidgetEffect::StopTimer(WidgetTimer::Animation)));
        assert_eq!(w.visual().width, 60.0);
        assert_eq!(w.visual().height, 40.0);
        assert_eq!(w.visual().shadow_opacity, 0.6);
    }

    #[test]
    fn mouse_leave_arms_idle_collapse() {
        // Arrange
        let mut w = shown();
        w.mouse_enter(Instant::now());

        // Act
        let fx = w.mouse_leave();

        // Assert
        assert_eq!(fx, vec![WidgetEffect::StartTimer(WidgetTimer::IdleCollapse)]);
    }

    #[test]
    fn mouse_leave_while_dragging_does_nothing() {
        // Arrange
        let mut w = shown();
        w.button_down(1, Point::new(1850.0, 5.0), Instant::now());

        // Act
        let fx = w.mouse_leave();

        // Assert
        assert!(fx.is_empty());
    }

    #[test]
    fn idle_elapsed_collapses_to_collapsed_shadow() {
        // Arrange
        let start = Instant::now();
        let mut w = shown();
        w.mouse_enter(start);
        finish(&mut w, start);
        w.mouse_leave();

        // Act
        let fx = w.idle_elapsed(start);
        finish(&mut w, start);

        // Assert
        assert_eq!(fx[0], WidgetEffect::StopTimer(WidgetTimer::IdleCollapse));
        assert!(!w.is_expanded());
        let v = w.visual();
        assert_eq!((v.width, v.height), (15.0, 15.0));
        assert_eq!(v.shadow_opacity, 0.15);
        assert_eq!(v.shadow_depth, 1.5);
        assert_eq!(v.blur_radius, 5.0);
    }

    #[test]
    fn single_click_starts_drag_and_expands() {
        // Arrange
        let mut w = shown();

        // Act
        let fx = w.button_down(1, Point::new(1850.0, 5.0), Instant::now());

        // Assert
        assert!(w.is_dragging());
        assert!(w.is_expanded());
        assert_eq!(fx[0], WidgetEffect::CaptureMouse);
        assert_eq!(fx[1], WidgetEffect::Emit(WidgetSignal::Clicked));
    }

    #[test]
    fn double_click_emits_signal_only() {
        // Arrange
        let mut w = shown();

        // Act
        let fx = w.button_down(2, Point::new(1850.0, 5.0), Instant::now());

        // Assert
        assert_eq!(fx, vec![WidgetEffect::Emit(WidgetSignal::DoubleClicked)]);
    }

    #[test]
    fn small_drag_steps_move_without_snapping() {
        // Arrange
        let mut w = shown();
        w.button_down(1, Point::new(1000.0, 500.0), Instant::now());

        // Act
        let fx = w.drag_to(Point::new(1003.0, 504.0), area());

        // Assert: offset length is exactly 5, below the threshold.
        assert_eq!(fx, vec![WidgetEffect::Move]);
        assert_eq!(w.position(), Point::new(1823.0, 4.0));
    }

    #[test]
    fn large_drag_step_snaps_visible_tab_to_edge() {
        // Arrange
        let mut w = controller();
        w.show(Point::new(500.0, 500.0));
        w.sync_native_top(500.0);
        w.button_down(1, Point::new(0.0, 0.0), Instant::now());
        let inset = (80.0 - 15.0) / 2.0;

        // Act: tab left edge lands 8 units from the screen's left edge.
        let target_left = 8.0 - inset;
        w.drag_to(Point::new(target_left - 500.0, 100.0), area());

        // Assert
        assert_eq!(w.position().x, -inset);
        assert_eq!(w.position().y, 600.0);
    }

    #[test]
    fn drag_without_button_is_ignored() {
        // Arrange
        let mut w = shown();

        // Act
        let fx = w.drag_to(Point::new(0.0, 0.0), area());

        // Assert
        assert!(fx.is_empty());
        assert_eq!(w.position().x, 1820.0);
    }

    #[test]
    fn button_up_ends_drag_and_arms_idle_timer() {
        // Arrange
        let mut w = shown();
        w.button_down(1, Point::new(0.0, 0.0), Instant::now());

        // Act
        let fx = w.button_up();

        // Assert
        assert!(!w.is_dragging());
        assert_eq!(
            fx,
            vec![
                WidgetEffect::ReleaseMouse,
                WidgetEffect::StartTimer(WidgetTimer::IdleCollapse),
            ]
        );
    }

    #[test]
    fn corner_check_starts_and_stops_hover_timer() {
        // Arrange
        let mut w = shown();

        // Act / Assert
        assert_eq!(
            w.corner_check(true),
            vec![WidgetEffect::StartTimer(WidgetTimer::CornerHover)]
        );
        assert!(w.corner_check(true).is_empty());
        assert_eq!(
            w.corner_check(false),
            vec![WidgetEffect::StopTimer(WidgetTimer::CornerHover)]
        );
        assert!(w.corner_check(false).is_empty());
    }

    #[test]
    fn corner_check_is_ignored_while_manually_expanded() {
        // Arrange
        let mut w = shown();
        w.button_down(1, Point::new(0.0, 0.0), Instant::now());

        // Act / Assert
        assert!(w.corner_check(true).is_empty());
    }

    #[test]
    fn corner_hover_expands_when_still_in_corner() {
        // Arrange
        let mut w = shown();
        w.corner_check(true);

        // Act
        let fx = w.corner_hover_elapsed(true, Instant::now());

        // Assert
        assert!(w.is_expanded());
        assert_eq!(fx[0], WidgetEffect::StopTimer(WidgetTimer::CornerHover));
        assert!(!w.is_timer_running(WidgetTimer::IdleCollapse));
        assert!(!fx.contains(&WidgetEffect::StartTimer(WidgetTimer::IdleCollapse)));
    }

    #[test]
    fn corner_hover_expansion_stays_open_while_cursor_rests() {
        // Arrange: cursor moves onto the tab, then rests in the corner.
        let mut w = shown();
        let start = Instant::now();
        w.mouse_enter(start);
        finish(&mut w, start);
        w.corner_check(true);

        // Act
        w.corner_hover_elapsed(true, start);
        let later = w.corner_check(true);

        // Assert
        assert!(w.is_expanded());
        assert!(!w.is_timer_running(WidgetTimer::IdleCollapse));
        assert_eq!(later, vec![WidgetEffect::StartTimer(WidgetTimer::CornerHover)]);
    }

    #[test]
    fn release_after_double_click_is_ignored() {
        // Arrange: DOWN, UP, DBLCLK hides the widget, then the last UP.
        let mut w = shown();
        w.button_down(1, Point::new(0.0, 0.0), Instant::now());
        w.button_up();
        w.button_down(2, Point::new(0.0, 0.0), Instant::now());
        w.hide();

        // Act
        let fx = w.button_up();

        // Assert
        assert!(fx.is_empty());
        assert!(!w.is_timer_running(WidgetTimer::IdleCollapse));
    }

    #[test]
    fn corner_hover_outside_corner_only_stops_timer() {
        // Arrange
        let mut w = shown();
        w.corner_check(true);

        // Act
        let fx = w.corner_hover_elapsed(false, Instant::now());

        // Assert
        assert!(!w.is_expanded());
        assert_eq!(fx, vec![WidgetEffect::StopTimer(WidgetTimer::CornerHover)]);
    }

    #[test]
    fn reposition_reapplies_top_edge_only_after_real_drift() {
        // Arrange
        let mut w = shown();

        // Act / Assert
        assert_eq!(
            w.reposition_elapsed(0.8),
            vec![WidgetEffect::StopTimer(WidgetTimer::Reposition)]
        );

        // Arrange
        let mut w = shown();

        // Act
        let fx = w.reposition_elapsed(12.0);

        // Assert
        assert_eq!(
            fx,
            vec![
                WidgetEffect::StopTimer(WidgetTimer::Reposition),
                WidgetEffect::SnapToTopEdge,
            ]
        );
    }

    #[test]
    fn finished_animation_restores_drifted_top() {
        // Arrange
        let start = Instant::now();
        let mut w = shown();
        w.mouse_enter(start);
        w.visual.top = 3.0;

        // Act
        let fx = finish(&mut w, start);

        // Assert
        assert!(fx.contains(&WidgetEffect::Move));
        assert_eq!(w.position().y, 0.0);
    }

    #[test]
    fn collapse_externally_animates_and_stops_idle_timer() {
        // Arrange
        let start = Instant::now();
        let mut w = shown();
        w.mouse_enter(start);
        finish(&mut w, start);
        w.mouse_leave();

        // Act
        let fx = w.collapse_externally(start);

        // Assert
        assert!(fx.contains(&WidgetEffect::StopTimer(WidgetTimer::IdleCollapse)));
        assert!(fx.contains(&WidgetEffect::StartTimer(WidgetTimer::Animation)));
        assert!(!w.is_expanded());
    }

    #[test]
    fn collapse_externally_on_collapsed_widget_does_not_animate() {
        // Arrange: re-minimizing while the tab is already closed.
        let start = Instant::now();
        let mut w = shown();

        // Act
        let fx = w.collapse_externally(start);

        // Assert
        assert!(fx.is_empty());
        assert!(w.is_visible());
        assert!(!w.is_expanded());
    }

    #[test]
    fn customize_requests_redraw() {
        // Arrange
        let mut w = shown();

        // Act
        let fx = w.customize("#00FF00", "E", "#000000", "#00FF00");

        // Assert
        assert_eq!(fx, vec![WidgetEffect::Redraw]);
        assert_eq!(w.appearance().background, "#00FF00");
        assert_eq!(w.appearance().text, "E");
    }

    #[test]
    fn timer_ids_round_trip() {
        for timer in WidgetTimer::ALL {
            assert_eq!(WidgetTimer::from_id(timer.id()), Some(timer));
        }
        assert_eq!(WidgetTimer::from_id(0), None);
    }

    #[test]
    fn render_hangs_tab_from_top_edge() {
        // Arrange
        let w = shown();

        // Act
        let frame = w.render(DpiScale::IDENTITY);

        // Assert: 80x50 frame, 15 wide tab centered horizontally.
        let canvas = &frame.canvas;
        assert_eq!((canvas.width, canvas.height), (80, 50));
        assert_eq!(canvas.pixel(40, 0).map(|p| p >> 24), Some(0xFF));
        assert_eq!(canvas.pixel(2, 0), Some(0));
        assert!(frame.labels.is_empty());
    }

    #[test]
    fn expanded_render_carries_label() {
        // Arrange
        let start = Instant::now();
        let mut w = shown();
        w.mouse_enter(start);
        finish(&mut w, start);

        // Act
        let frame = w.render(DpiScale::new(2.0, 2.0).unwrap());

        // Assert
        assert_eq!((frame.canvas.width, frame.canvas.height), (160, 100));
        assert_eq!(frame.labels.len(), 1);
        let label = &frame.labels[0];
        assert_eq!(label.text, "W");
        assert_eq!(label.bounds, Rect::new(20, 0, 120, 80));
        assert_eq!(label.font_px, 40);
    }
}
