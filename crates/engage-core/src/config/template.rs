/// Generates the default `config.toml` contents with explanatory comments.
///
/// This is used by `engage init` to create a starter config file that
/// users can immediately edit.
pub fn generate_config() -> String {
    r##"# Engage configuration
# Location: ~/.config/engage/config.toml

# What the floating widget looks like. Colors are "#RRGGBB".
[appearance]
text = "W"
background = "#4070FF"
text_color = "#FFFFFF"
glow = "#4070FF"

# Widget geometry in logical units (1/96 inch, independent of DPI scaling).
[widget]
# Edge length of the collapsed tab.
collapsed_size = 15.0
# Size of the expanded tab.
expanded_width = 60.0
expanded_height = 40.0
# Radius of the two bottom corners.
corner_radius = 5.0
# Room around the tab for its glow.
shadow_padding = 10.0
# Distance from the top and right screen edges when first shown.
margin = 20.0
# While dragging, edges closer than this snap to the screen edge.
snap_distance = 15.0
# Minimum cursor movement per drag step before snapping applies.
drag_snap_threshold = 5.0
# Expand/collapse animation length in milliseconds.
animation_ms = 250

# Timer intervals in milliseconds.
[timing]
# Collapse the widget after the cursor has been away this long.
idle_collapse_ms = 3000
# Expand after the cursor rests in the top-right corner this long.
corner_hover_ms = 1000
# How often the top-right corner is polled.
corner_check_ms = 500
# One-shot position check after the widget is shown.
reposition_delay_ms = 200
# Re-assert the always-on-top flag this often. 0 disables it.
topmost_interval_ms = 2000

[main_window]
title = "Engage App"
width = 480.0
height = 320.0
# Minimize/restore animation length in milliseconds.
animation_ms = 500

[logging]
# Write log lines to the console (stderr).
console = true
# Write log lines to ~/.config/engage/logs/<file_name>.
file = false
file_name = "widget.log"
# Minimum log level: "debug", "info", "warn", or "error".
level = "debug"
# Maximum log file size in MB before rotation.
max_file_mb = 10
"##
    .to_string()
}
