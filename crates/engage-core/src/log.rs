//! Console and file logging behind the `log` facade.
//!
//! Lines look like `[2024-05-01 13:37:00.123] [INFO] message`. The file
//! sink writes to `~/.config/engage/logs/widget.log`, truncated on every
//! start. When the file exceeds the configured max size, it is rotated
//! to `widget.log.1` (one backup kept).

use std::error::Error;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use chrono::{DateTime, Local, TimeZone};
use log::{LevelFilter, Log, Metadata, Record};
use serde::{Deserialize, Serialize};

static LOGGER: Logger = Logger {
    state: OnceLock::new(),
};

const BACKUP_SUFFIX: &str = ".1";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Echo lines to stderr. Defaults to `true`.
    pub console: bool,
    /// Write lines to the log file. Defaults to `false`.
    pub file: bool,
    /// Minimum log level: "debug", "info", "warn", or "error".
    pub level: String,
    /// File name inside the log directory.
    pub file_name: String,
    /// Maximum log file size in megabytes before rotation.
    pub max_file_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console: true,
            file: false,
            level: "debug".into(),
            file_name: "widget.log".into(),
            max_file_mb: 10,
        }
    }
}

/// Parses a level name. Unknown names fall back to `Info`.
pub fn parse_level(s: &str) -> LevelFilter {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" | "warning" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// Returns the log directory: `~/.config/engage/logs/`.
pub fn log_dir() -> Option<PathBuf> {
    crate::config::config_dir().map(|d| d.join("logs"))
}

struct Logger {
    state: OnceLock<Mutex<State>>,
}

struct State {
    console: bool,
    file: Option<FileSink>,
}

struct FileSink {
    file: File,
    path: PathBuf,
    max_bytes: u64,
    written: u64,
}

/// Installs the global logger. Call once at startup.
///
/// A log file that cannot be opened disables the file sink but keeps
/// console output. Calling this twice leaves the first logger in place.
pub fn init(config: &LogConfig) {
    let file = if config.file {
        log_dir().and_then(|dir| FileSink::open(&dir, &config.file_name, config.max_file_mb))
    } else {
        None
    };
    let file_enabled = file.is_some();
    let state = State {
        console: config.console,
        file,
    };
    if LOGGER.state.set(Mutex::new(state)).is_err() {
        return;
    }
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(parse_level(&config.level));
    }
    if config.file && !file_enabled {
        log::warn!("File logging requested but the log file could not be opened");
    }
}

impl FileSink {
    /// Creates (or truncates) the log file and writes the start header.
    fn open(dir: &Path, name: &str, max_file_mb: u64) -> Option<Self> {
        fs::create_dir_all(dir).ok()?;
        let path = dir.join(name);
        let mut file = File::create(&path).ok()?;
        let header = format!("=== Widget Log Started {} ===\n", timestamp(&Local::now()));
        file.write_all(header.as_bytes()).ok()?;
        Some(Self {
            file,
            path,
            max_bytes: max_file_mb * 1024 * 1024,
            written: header.len() as u64,
        })
    }

    fn write_line(&mut self, line: &str) {
        let _ = self.file.write_all(line.as_bytes());
        self.written += line.len() as u64;
        if self.max_bytes > 0 && self.written >= self.max_bytes {
            self.rotate();
        }
    }

    fn rotate(&mut self) {
        let mut backup = self.path.clone().into_os_string();
        backup.push(BACKUP_SUFFIX);
        let _ = fs::rename(&self.path, &backup);
        if let Ok(f) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            self.file = f;
        }
        self.written = 0;
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Some(mutex) = self.state.get() else {
            return;
        };
        let Ok(mut state) = mutex.lock() else {
            return;
        };
        let line = format_line(&Local::now(), record.level(), record.args());
        if state.console {
            eprint!("{line}");
        }
        if let Some(file) = state.file.as_mut() {
            file.write_line(&line);
        }
    }

    fn flush(&self) {
        if let Some(Ok(mut state)) = self.state.get().map(Mutex::lock) {
            if let Some(file) = state.file.as_mut() {
                let _ = file.file.flush();
            }
        }
    }
}

/// Formats one log line, newline included.
pub fn format_line<Tz: TimeZone>(
    at: &DateTime<Tz>,
    level: log::Level,
    args: &std::fmt::Arguments<'_>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("[{}] [{level}] {args}\n", timestamp(at))
}

/// Renders an error message with its cause as `message - cause`.
pub fn with_cause(message: &str, err: &dyn Error) -> String {
    format!("{message} - {err}")
}

/// Logs `message - cause` at ERROR level.
pub fn error(message: &str, err: &dyn Error) {
    log::error!("{}", with_cause(message, err));
}

/// Formats `at` as `YYYY-MM-DD HH:MM:SS.mmm` in its own time zone.
pub fn timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    fn epoch() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(0).unwrap()
    }

    #[test]
    fn epoch_formats_as_midnight() {
        assert_eq!(timestamp(&epoch()), "1970-01-01 00:00:00.000");
    }

    #[test]
    fn timestamp_includes_milliseconds() {
        // Arrange: 2024-02-29 13:37:05.042 UTC.
        let at = Utc.timestamp_millis_opt(1_709_213_825_042).unwrap();

        // Act
        let ts = timestamp(&at);

        // Assert
        assert_eq!(ts, "2024-02-29 13:37:05.042");
    }

    #[test]
    fn timestamp_uses_wall_clock_of_the_zone() {
        // Arrange: midnight UTC seen from UTC+9.
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let at = epoch().with_timezone(&tokyo);

        // Act / Assert
        assert_eq!(timestamp(&at), "1970-01-01 09:00:00.000");
    }

    #[test]
    fn line_has_bracketed_timestamp_and_level() {
        // Act
        let line = format_line(
            &epoch(),
            log::Level::Warn,
            &format_args!("hello {}", 42),
        );

        // Assert
        assert_eq!(line, "[1970-01-01 00:00:00.000] [WARN] hello 42\n");
    }

    #[test]
    fn error_renders_with_cause() {
        // Arrange
        let err = std::io::Error::other("access denied");

        // Act / Assert
        assert_eq!(
            with_cause("SetWindowPos failed", &err),
            "SetWindowPos failed - access denied"
        );
    }

    #[test]
    fn unknown_level_defaults_to_info() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("warning"), LevelFilter::Warn);
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
    }

    #[test]
    fn file_sink_truncates_and_rotates() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("engage-log-{}", std::process::id()));
        let path = dir.join("widget.log");
        let _ = fs::create_dir_all(&dir);
        fs::write(&path, "stale contents\n").unwrap();

        // Act
        let mut sink = FileSink::open(&dir, "widget.log", 0).unwrap();
        sink.max_bytes = 64;
        sink.write_line("[x] [INFO] first line that is long enough to rotate\n");
        sink.write_line("[x] [INFO] second\n");
        sink.file.flush().unwrap();

        // Assert
        let backup = fs::read_to_string(dir.join("widget.log.1")).unwrap();
        assert!(backup.starts_with("=== Widget Log Started "));
        assert!(!backup.contains("stale"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[x] [INFO] second\n"
        );
        let _ = fs::remove_dir_all(&dir);
    }
}
