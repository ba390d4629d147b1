mod loader;
pub mod template;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::appearance::Appearance;
use crate::log::LogConfig;
use crate::rect::Size;

pub use loader::{config_dir, config_path, load, load_from, render, try_load_from};

/// Top-level configuration for Engage.
///
/// Loaded from `~/.config/engage/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Widget colors and label.
    pub appearance: Appearance,
    /// Widget geometry and drag behavior.
    pub widget: WidgetConfig,
    /// Timer intervals.
    pub timing: TimingConfig,
    /// Main window size and title.
    pub main_window: MainWindowConfig,
    /// Console and file logging.
    pub logging: LogConfig,
}

/// Widget geometry, in logical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Edge length of the collapsed tab.
    pub collapsed_size: f64,
    /// Width of the expanded tab.
    pub expanded_width: f64,
    /// Height of the expanded tab.
    pub expanded_height: f64,
    /// Radius of the two bottom corners.
    pub corner_radius: f64,
    /// Room around the tab for its glow.
    pub shadow_padding: f64,
    /// Distance from the top and right screen edges when first shown.
    pub margin: f64,
    /// Edges closer than this while dragging snap to the screen edge.
    pub snap_distance: f64,
    /// Minimum cursor movement per drag step before snapping applies.
    pub drag_snap_threshold: f64,
    /// Expand/collapse animation length in milliseconds.
    pub animation_ms: u64,
}

/// Timer intervals in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Idle time after the cursor leaves before the widget collapses.
    pub idle_collapse_ms: u64,
    /// How long the cursor must stay in the hot corner to expand.
    pub corner_hover_ms: u64,
    /// Polling interval of the hot corner check.
    pub corner_check_ms: u64,
    /// Delay of the one-shot position check after showing the widget.
    pub reposition_delay_ms: u64,
    /// Interval of the topmost re-assertion. 0 disables it.
    pub topmost_interval_ms: u64,
}

/// Main window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainWindowConfig {
    pub title: String,
    /// Width in logical units.
    pub width: f64,
    /// Height in logical units.
    pub height: f64,
    /// Minimize/restore animation length in milliseconds.
    pub animation_ms: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            collapsed_size: 15.0,
            expanded_width: 60.0,
            expanded_height: 40.0,
            corner_radius: 5.0,
            shadow_padding: 10.0,
            margin: 20.0,
            snap_distance: 15.0,
            drag_snap_threshold: 5.0,
            animation_ms: 250,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            idle_collapse_ms: 3000,
            corner_hover_ms: 1000,
            corner_check_ms: 500,
            reposition_delay_ms: 200,
            topmost_interval_ms: 2000,
        }
    }
}

impl Default for MainWindowConfig {
    fn default() -> Self {
        Self {
            title: "Engage App".into(),
            width: 480.0,
            height: 320.0,
            animation_ms: 500,
        }
    }
}

impl WidgetConfig {
    /// Size of the widget window: the expanded tab plus glow padding on
    /// the sides and bottom. The tab hangs from the top edge.
    pub fn frame_size(&self) -> Size {
        Size::new(
            self.expanded_width + self.shadow_padding * 2.0,
            self.expanded_height + self.shadow_padding,
        )
    }

    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }
}

impl TimingConfig {
    pub fn idle_collapse(&self) -> Duration {
        Duration::from_millis(self.idle_collapse_ms)
    }

    pub fn corner_hover(&self) -> Duration {
        Duration::from_millis(self.corner_hover_ms)
    }

    pub fn corner_check(&self) -> Duration {
        Duration::from_millis(self.corner_check_ms)
    }

    pub fn reposition_delay(&self) -> Duration {
        Duration::from_millis(self.reposition_delay_ms)
    }

    /// `None` when topmost enforcement is disabled.
    pub fn topmost_interval(&self) -> Option<Duration> {
        (self.topmost_interval_ms > 0).then(|| Duration::from_millis(self.topmost_interval_ms))
    }
}

impl MainWindowConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }
}

impl Config {
    /// Clamps values to safe ranges.
    ///
    /// Keeps the expanded tab at least as large as the collapsed one and
    /// timer intervals within what `SetTimer` handles sensibly. NaN and
    /// infinite sizes reset to their defaults first.
    pub fn validate(&mut self) {
        let dw = WidgetConfig::default();
        let w = &mut self.widget;
        finite_or_default(&mut w.collapsed_size, dw.collapsed_size);
        finite_or_default(&mut w.expanded_width, dw.expanded_width);
        finite_or_default(&mut w.expanded_height, dw.expanded_height);
        finite_or_default(&mut w.corner_radius, dw.corner_radius);
        finite_or_default(&mut w.shadow_padding, dw.shadow_padding);
        finite_or_default(&mut w.margin, dw.margin);
        finite_or_default(&mut w.snap_distance, dw.snap_distance);
        finite_or_default(&mut w.drag_snap_threshold, dw.drag_snap_threshold);
        w.collapsed_size = w.collapsed_size.clamp(4.0, 64.0);
        w.expanded_width = w.expanded_width.clamp(w.collapsed_size, 400.0);
        w.expanded_height = w.expanded_height.clamp(w.collapsed_size, 400.0);
        w.corner_radius = w.corner_radius.clamp(0.0, w.collapsed_size / 2.0);
        w.shadow_padding = w.shadow_padding.clamp(0.0, 40.0);
        w.margin = w.margin.clamp(0.0, 200.0);
        w.snap_distance = w.snap_distance.clamp(0.0, 100.0);
        w.drag_snap_threshold = w.drag_snap_threshold.clamp(0.0, 50.0);
        w.animation_ms = w.animation_ms.min(5000);

        let t = &mut self.timing;
        t.idle_collapse_ms = t.idle_collapse_ms.clamp(100, 600_000);
        t.corner_hover_ms = t.corner_hover_ms.clamp(50, 60_000);
        t.corner_check_ms = t.corner_check_ms.clamp(50, 10_000);
        t.reposition_delay_ms = t.reposition_delay_ms.clamp(10, 10_000);
        if t.topmost_interval_ms > 0 {
            t.topmost_interval_ms = t.topmost_interval_ms.clamp(250, 600_000);
        }

        let dm = MainWindowConfig::default();
        let m = &mut self.main_window;
        finite_or_default(&mut m.width, dm.width);
        finite_or_default(&mut m.height, dm.height);
        m.width = m.width.clamp(240.0, 3000.0);
        m.height = m.height.clamp(160.0, 2000.0);
        m.animation_ms = m.animation_ms.min(5000);
        if m.title.trim().is_empty() {
            m.title = MainWindowConfig::default().title;
        }
    }
}

fn finite_or_default(value: &mut f64, default: f64) {
    if !value.is_finite() {
        *value = default;
    }
}

#[cfg(test)]
mod tests;
