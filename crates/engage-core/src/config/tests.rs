use super::template::generate_config;
use super::*;

fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("engage-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn default_config_has_expected_values() {
    // Arrange / Act
    let config = Config::default();

    // Assert
    assert_eq!(config.widget.collapsed_size, 15.0);
    assert_eq!(config.widget.margin, 20.0);
    assert_eq!(config.timing.idle_collapse_ms, 3000);
    assert_eq!(config.timing.corner_hover_ms, 1000);
    assert_eq!(config.timing.corner_check_ms, 500);
    assert_eq!(config.timing.reposition_delay_ms, 200);
    assert_eq!(config.main_window.title, "Engage App");
    assert_eq!(config.appearance.background, "#4070FF");
}

#[test]
fn partial_toml_uses_defaults_for_missing_sections() {
    // Arrange
    let toml_str = "[widget]\nmargin = 40.0\n";

    // Act
    let config: Config = toml::from_str(toml_str).unwrap();

    // Assert
    assert_eq!(config.widget.margin, 40.0);
    assert_eq!(config.widget.snap_distance, 15.0);
    assert_eq!(config.timing, TimingConfig::default());
}

#[test]
fn validate_clamps_extreme_values() {
    // Arrange
    let mut config = Config {
        widget: WidgetConfig {
            collapsed_size: 1.0,
            expanded_width: 2.0,
            corner_radius: 50.0,
            ..Default::default()
        },
        timing: TimingConfig {
            idle_collapse_ms: 0,
            topmost_interval_ms: 10,
            ..Default::default()
        },
        main_window: MainWindowConfig {
            title: "  ".into(),
            width: 10.0,
            ..Default::default()
        },
        ..Default::default()
    };

    // Act
    config.validate();

    // Assert
    assert_eq!(config.widget.collapsed_size, 4.0);
    assert_eq!(config.widget.expanded_width, 4.0);
    assert_eq!(config.widget.corner_radius, 2.0);
    assert_eq!(config.timing.idle_collapse_ms, 100);
    assert_eq!(config.timing.topmost_interval_ms, 250);
    assert_eq!(config.main_window.title, "Engage App");
    assert_eq!(config.main_window.width, 240.0);
}

#[test]
fn non_finite_sizes_fall_back_to_defaults() {
    // Arrange
    let path = temp_file(
        "nonfinite.toml",
        "[widget]\ncollapsed_size = nan\ncorner_radius = inf\nmargin = -inf\n\n\
         [main_window]\nwidth = nan\n",
    );

    // Act
    let config = try_load_from(&path).unwrap();

    // Assert
    assert_eq!(config.widget.collapsed_size, 15.0);
    assert_eq!(config.widget.corner_radius, 5.0);
    assert_eq!(config.widget.margin, 20.0);
    assert_eq!(config.main_window.width, MainWindowConfig::default().width);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn zero_topmost_interval_disables_enforcement() {
    // Arrange
    let mut config = Config::default();
    config.timing.topmost_interval_ms = 0;

    // Act
    config.validate();

    // Assert
    assert_eq!(config.timing.topmost_interval(), None);
    assert_eq!(
        Config::default().timing.topmost_interval(),
        Some(Duration::from_millis(2000))
    );
}

#[test]
fn frame_size_adds_glow_padding() {
    // Act
    let size = WidgetConfig::default().frame_size();

    // Assert
    assert_eq!(size, Size::new(80.0, 50.0));
}

#[test]
fn config_template_parses_as_valid_config() {
    // Arrange
    let toml_str = generate_config();

    // Act
    let result: Result<Config, _> = toml::from_str(&toml_str);

    // Assert
    assert!(
        result.is_ok(),
        "config template is not valid TOML: {result:?}"
    );
}

#[test]
fn config_template_matches_default_values() {
    // Arrange
    let toml_str = generate_config();

    // Act
    let mut config: Config = toml::from_str(&toml_str).unwrap();
    config.validate();

    // Assert
    let mut defaults = Config::default();
    defaults.validate();
    assert_eq!(config, defaults);
}

#[test]
fn try_load_from_reports_parse_errors() {
    // Arrange
    let path = temp_file("bad.toml", "[widget\nmargin = ");

    // Act
    let result = try_load_from(&path);

    // Assert
    assert!(result.is_err());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_from_falls_back_to_defaults() {
    // Arrange
    let missing = std::env::temp_dir().join("engage-does-not-exist.toml");
    let bad = temp_file("fallback.toml", "widget = 3");

    // Act / Assert
    assert_eq!(load_from(&missing), Config::default());
    assert_eq!(load_from(&bad), Config::default());
    let _ = std::fs::remove_file(&bad);
}

#[test]
fn rendered_config_reloads_identically() {
    // Arrange
    let mut config = Config::default();
    config.appearance.text = "E".into();
    config.timing.corner_hover_ms = 750;

    // Act
    let rendered = render(&config).unwrap();
    let path = temp_file("render.toml", &rendered);
    let reloaded = try_load_from(&path).unwrap();

    // Assert
    assert_eq!(reloaded, config);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn config_path_ends_with_engage_config_toml() {
    if let Some(path) = config_path() {
        assert!(path.ends_with(".config/engage/config.toml"));
    }
}
