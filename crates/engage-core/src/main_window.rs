//! Main window lifecycle: minimize and restore animations, layout, and
//! button hit testing.

use std::time::Instant;

use crate::anim::{Animatable, Property, Storyboard, Tween};
use crate::appearance::Color;
use crate::config::MainWindowConfig;
use crate::dpi::DpiScale;
use crate::raster::{Canvas, CornerRadii, Frame, Label, Shape};
use crate::rect::{LogicalRect, Point, Rect, Size};

/// Scale the window shrinks to while minimizing.
pub const MINIMIZED_SCALE: f64 = 0.1;

const TITLE_BAR_HEIGHT: f64 = 36.0;
const CAPTION_BUTTON_WIDTH: f64 = 40.0;
const ACTION_BUTTON: Size = Size {
    width: 140.0,
    height: 36.0,
};
const CORNER_RADIUS: f64 = 8.0;

const BACKGROUND: Color = Color {
    r: 0x1E,
    g: 0x1E,
    b: 0x2E,
};
const TITLE_BAR: Color = Color {
    r: 0x18,
    g: 0x18,
    b: 0x25,
};
const TEXT: Color = Color {
    r: 0xCD,
    g: 0xD6,
    b: 0xF4,
};
const ACCENT: Color = Color {
    r: 0x40,
    g: 0x70,
    b: 0xFF,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Visible,
    Minimizing,
    Hidden,
    Restoring,
}

/// Clickable regions of the main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainButton {
    Minimize,
    Close,
    TestWidget,
}

/// What a point in the window does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    /// Drags the window.
    Caption,
    Button(MainButton),
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainEffect {
    StartAnimation,
    StopAnimation,
    Redraw,
    /// Move the native window to [`MainWindowController::position`].
    Move,
    Show,
    Hide,
}

/// Animated properties of the main window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MainVisual {
    pub opacity: f64,
    /// Content scale about the window center.
    pub scale: f64,
    pub top: f64,
}

impl Animatable for MainVisual {
    fn property(&self, property: Property) -> f64 {
        match property {
            Property::Opacity => self.opacity,
            Property::Scale => self.scale,
            Property::Top => self.top,
            _ => 0.0,
        }
    }

    fn set_property(&mut self, property: Property, value: f64) {
        match property {
            Property::Opacity => self.opacity = value,
            Property::Scale => self.scale = value,
            Property::Top => self.top = value,
            _ => {}
        }
    }
}

#[derive(Debug)]
pub struct MainWindowController {
    config: MainWindowConfig,
    phase: Phase,
    left: f64,
    /// Where the window returns to on restore.
    home: Point,
    visual: MainVisual,
    storyboard: Option<Storyboard>,
}

impl MainWindowController {
    /// A visible, fully opaque window at `position`.
    pub fn new(config: &MainWindowConfig, position: Point) -> Self {
        Self {
            config: config.clone(),
            phase: Phase::Visible,
            left: position.x,
            home: position,
            visual: MainVisual {
                opacity: 1.0,
                scale: 1.0,
                top: position.y,
            },
            storyboard: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn visual(&self) -> MainVisual {
        self.visual
    }

    pub fn position(&self) -> Point {
        Point::new(self.left, self.visual.top)
    }

    pub fn size(&self) -> Size {
        self.config.size()
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    /// Records a position change made natively (caption drag).
    pub fn moved(&mut self, position: Point) {
        if self.phase == Phase::Visible {
            self.left = position.x;
            self.visual.top = position.y;
            self.home = position;
        }
    }

    /// Fades and shrinks the window, hiding it when done.
    pub fn minimize(&mut self, now: Instant) -> Vec<MainEffect> {
        if matches!(self.phase, Phase::Minimizing | Phase::Hidden) {
            return Vec::new();
        }
        self.phase = Phase::Minimizing;
        let d = self.config.animation();
        let tweens = vec![
            Tween::new(Property::Opacity, 1.0, 0.0, d),
            Tween::new(Property::Scale, 1.0, MINIMIZED_SCALE, d),
        ];
        self.storyboard = Some(Storyboard::begin(tweens, &self.visual, now));
        vec![MainEffect::StartAnimation]
    }

    /// Restores the window at its last position.
    pub fn restore(&mut self, now: Instant) -> Vec<MainEffect> {
        let Point { x, y } = self.home;
        self.restore_at(x, y, now)
    }

    /// Shows the window transparent, then fades it in while sliding down
    /// from above the screen to (`left`, `top`).
    pub fn restore_at(&mut self, left: f64, top: f64, now: Instant) -> Vec<MainEffect> {
        if self.phase == Phase::Visible {
            return Vec::new();
        }
        self.phase = Phase::Restoring;
        self.left = left;
        self.home = Point::new(left, top);
        self.visual = MainVisual {
            opacity: 0.0,
            scale: 1.0,
            top: -self.config.height,
        };
        let d = self.config.animation();
        let tweens = vec![
            Tween::new(Property::Opacity, 0.0, 1.0, d),
            Tween::new(Property::Top, -self.config.height, top, d),
        ];
        self.storyboard = Some(Storyboard::begin(tweens, &self.visual, now));
        vec![
            MainEffect::Move,
            MainEffect::Redraw,
            MainEffect::Show,
            MainEffect::StartAnimation,
        ]
    }

    /// Advances the running storyboard.
    pub fn tick(&mut self, now: Instant) -> Vec<MainEffect> {
        let Some(board) = self.storyboard.as_ref() else {
            return vec![MainEffect::StopAnimation];
        };
        let done = board.apply(&mut self.visual, now);
        let mut fx = vec![MainEffect::Move, MainEffect::Redraw];
        if done {
            self.storyboard = None;
            fx.push(MainEffect::StopAnimation);
            match self.phase {
                Phase::Minimizing => {
                    self.phase = Phase::Hidden;
                    fx.push(MainEffect::Hide);
                }
                Phase::Restoring => self.phase = Phase::Visible,
                Phase::Visible | Phase::Hidden => {}
            }
        }
        fx
    }

    /// Classifies a point in window-relative logical units.
    pub fn hit_test(&self, point: Point) -> HitZone {
        for (button, rect) in self.buttons() {
            if contains(rect, point) {
                return HitZone::Button(button);
            }
        }
        if point.y >= 0.0 && point.y < TITLE_BAR_HEIGHT {
            HitZone::Caption
        } else {
            HitZone::Client
        }
    }

    /// Button rectangles in window-relative logical units.
    pub fn buttons(&self) -> [(MainButton, LogicalRect); 3] {
        let w = self.config.width;
        let h = self.config.height;
        let body = h - TITLE_BAR_HEIGHT;
        [
            (
                MainButton::Close,
                LogicalRect::new(
                    w - CAPTION_BUTTON_WIDTH,
                    0.0,
                    CAPTION_BUTTON_WIDTH,
                    TITLE_BAR_HEIGHT,
                ),
            ),
            (
                MainButton::Minimize,
                LogicalRect::new(
                    w - CAPTION_BUTTON_WIDTH * 2.0,
                    0.0,
                    CAPTION_BUTTON_WIDTH,
                    TITLE_BAR_HEIGHT,
                ),
            ),
            (
                MainButton::TestWidget,
                LogicalRect::new(
                    (w - ACTION_BUTTON.width) / 2.0,
                    TITLE_BAR_HEIGHT + (body - ACTION_BUTTON.height) / 2.0,
                    ACTION_BUTTON.width,
                    ACTION_BUTTON.height,
                ),
            ),
        ]
    }

    /// Renders the window at `scale`, shrunk about its center by the
    /// current animation scale. Opacity is applied when presenting.
    pub fn render(&self, scale: DpiScale) -> Frame {
        let size = self.size();
        let mut canvas = Canvas::new(
            scale.width_to_physical(size.width),
            scale.height_to_physical(size.height),
        );
        let k = self.visual.scale.clamp(0.0, 1.0);
        let cx = size.width / 2.0;
        let cy = size.height / 2.0;
        let map = |r: LogicalRect| {
            let x = cx + (r.left - cx) * k;
            let y = cy + (r.top - cy) * k;
            (x * scale.x, y * scale.y, r.width * k * scale.x, r.height * k * scale.y)
        };
        let shape = |r: LogicalRect, radii: CornerRadii| {
            let (x, y, w, h) = map(r);
            Shape {
                x,
                y,
                w,
                h,
                radii: radii.scaled(k * scale.y),
            }
        };

        let body = LogicalRect::new(0.0, 0.0, size.width, size.height);
        let title = LogicalRect::new(0.0, 0.0, size.width, TITLE_BAR_HEIGHT);
        canvas.fill_shape(shape(body, CornerRadii::uniform(CORNER_RADIUS)), BACKGROUND, 0xFF);
        canvas.fill_shape(
            shape(
                title,
                CornerRadii {
                    top_left: CORNER_RADIUS,
                    top_right: CORNER_RADIUS,
                    ..CornerRadii::default()
                },
            ),
            TITLE_BAR,
            0xFF,
        );

        let font = |px: f64| ((px * k * scale.y).round() as i32).max(1);
        let to_rect = |r: LogicalRect| {
            let (x, y, w, h) = map(r);
            Rect::new(x.round() as i32, y.round() as i32, w.round() as i32, h.round() as i32)
        };
        let mut labels = vec![Label {
            text: self.config.title.clone(),
            bounds: to_rect(LogicalRect::new(12.0, 0.0, size.width / 2.0, TITLE_BAR_HEIGHT)),
            color: TEXT,
            font_px: font(16.0),
            bold: true,
        }];

        for (button, rect) in self.buttons() {
            let text = match button {
                MainButton::Minimize => "\u{2013}",
                MainButton::Close => "\u{2715}",
                MainButton::TestWidget => "Test widget",
            };
            if button == MainButton::TestWidget {
                canvas.fill_shape(shape(rect, CornerRadii::uniform(6.0)), ACCENT, 0xFF);
            }
            labels.push(Label {
                text: text.to_string(),
                bounds: to_rect(rect),
                color: if button == MainButton::TestWidget {
                    Color::WHITE
                } else {
                    TEXT
                },
                font_px: font(15.0),
                bold: false,
            });
        }

        Frame { canvas, labels }
    }
}

fn contains(r: LogicalRect, p: Point) -> bool {
    p.x >= r.left && p.x < r.right() && p.y >= r.top && p.y < r.bottom()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn controller() -> MainWindowController {
        MainWindowController::new(&MainWindowConfig::default(), Point::new(300.0, 200.0))
    }

    #[test]
    fn minimize_fades_shrinks_and_hides() {
        // Arrange
        let start = Instant::now();
        let mut main = controller();

        // Act
        let fx = main.minimize(start);

        // Assert
        assert_eq!(fx, vec![MainEffect::StartAnimation]);
        assert_eq!(main.phase(), Phase::Minimizing);

        // Act
        main.tick(start + Duration::from_millis(250));

        // Assert: quadratic ease-out is 75% done at half time.
        let v = main.visual();
        assert!((v.opacity - 0.25).abs() < 1e-9);
        assert!((v.scale - (1.0 - 0.9 * 0.75)).abs() < 1e-9);

        // Act
        let fx = main.tick(start + Duration::from_millis(500));

        // Assert
        assert_eq!(main.phase(), Phase::Hidden);
        assert!(fx.contains(&MainEffect::Hide));
        assert!(fx.contains(&MainEffect::StopAnimation));
    }

    #[test]
    fn minimize_twice_is_a_no_op() {
        // Arrange
        let start = Instant::now();
        let mut main = controller();
        main.minimize(start);

        // Act / Assert
        assert!(main.minimize(start).is_empty());
    }

    #[test]
    fn restore_slides_in_from_above() {
        // Arrange
        let start = Instant::now();
        let mut main = controller();
        main.minimize(start);
        main.tick(start + Duration::from_secs(1));

        // Act
        let fx = main.restore(start);

        // Assert
        assert_eq!(
            fx,
            vec![
                MainEffect::Move,
                MainEffect::Redraw,
                MainEffect::Show,
                MainEffect::StartAnimation,
            ]
        );
        assert_eq!(main.visual().opacity, 0.0);
        assert_eq!(main.position(), Point::new(300.0, -320.0));

        // Act
        main.tick(start + Duration::from_millis(500));

        // Assert
        assert_eq!(main.phase(), Phase::Visible);
        assert_eq!(main.position(), Point::new(300.0, 200.0));
        assert_eq!(main.visual().opacity, 1.0);
    }

    #[test]
    fn restore_at_uses_given_position() {
        // Arrange
        let start = Instant::now();
        let mut main = controller();
        main.minimize(start);
        main.tick(start + Duration::from_secs(1));

        // Act
        main.restore_at(50.0, 60.0, start);
        main.tick(start + Duration::from_secs(1));

        // Assert
        assert_eq!(main.position(), Point::new(50.0, 60.0));
    }

    #[test]
    fn restore_of_visible_window_is_ignored() {
        // Arrange
        let mut main = controller();

        // Act / Assert
        assert!(main.restore(Instant::now()).is_empty());
    }

    #[test]
    fn moved_tracks_caption_drag_only_while_visible() {
        // Arrange
        let start = Instant::now();
        let mut main = controller();

        // Act
        main.moved(Point::new(10.0, 20.0));
        main.minimize(start);
        main.moved(Point::new(999.0, 999.0));
        main.tick(start + Duration::from_secs(1));
        main.restore(start);
        main.tick(start + Duration::from_secs(1));

        // Assert
        assert_eq!(main.position(), Point::new(10.0, 20.0));
    }

    #[test]
    fn hit_test_finds_buttons_and_caption() {
        // Arrange
        let main = controller();

        // Act / Assert
        assert_eq!(
            main.hit_test(Point::new(470.0, 10.0)),
            HitZone::Button(MainButton::Close)
        );
        assert_eq!(
            main.hit_test(Point::new(430.0, 10.0)),
            HitZone::Button(MainButton::Minimize)
        );
        assert_eq!(
            main.hit_test(Point::new(240.0, 178.0)),
            HitZone::Button(MainButton::TestWidget)
        );
        assert_eq!(main.hit_test(Point::new(100.0, 10.0)), HitZone::Caption);
        assert_eq!(main.hit_test(Point::new(20.0, 300.0)), HitZone::Client);
    }

    #[test]
    fn render_sizes_canvas_and_labels_by_dpi() {
        // Arrange
        let main = controller();

        // Act
        let frame = main.render(DpiScale::new(1.5, 1.5).unwrap());

        // Assert
        assert_eq!((frame.canvas.width, frame.canvas.height), (720, 480));
        assert_eq!(frame.labels[0].text, "Engage App");
        assert_eq!(frame.labels.len(), 4);
        assert_eq!(frame.canvas.pixel(360, 240).map(|p| p >> 24), Some(0xFF));
    }
}
