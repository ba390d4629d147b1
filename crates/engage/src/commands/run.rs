use engage_core::config;

/// Loads the configuration and runs the app until it is closed.
#[cfg(windows)]
pub fn execute(show_widget: bool) {
    let config = config::load();
    if let Err(e) = engage_windows::run(config, show_widget) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Engage drives Win32 windows; there is nothing to run elsewhere.
#[cfg(not(windows))]
pub fn execute(_show_widget: bool) {
    let path = config::config_path();
    eprintln!("Error: engage run is only supported on Windows.");
    if let Some(path) = path {
        eprintln!("Configuration would be read from {}", path.display());
    }
    std::process::exit(1);
}
