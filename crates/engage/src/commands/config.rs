use std::path::Path;

use engage_core::config;

/// Prints the configuration the app would run with.
pub fn show() {
    if let Some(path) = config::config_path() {
        let state = if path.exists() { "loaded" } else { "not found, defaults" };
        println!("# {} ({state})", path.display());
    }
    match config::render(&config::load()) {
        Ok(text) => print!("{text}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Prints the commented default configuration.
pub fn default() {
    print!("{}", config::template::generate_config());
}

/// Validates a configuration file. Out-of-range values are not errors;
/// they are clamped when the file is loaded.
pub fn check(path: &Path) {
    match config::try_load_from(path) {
        Ok(_) => println!("{} is valid", path.display()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
