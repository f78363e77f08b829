use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;

use crate::config::LoggingConfig;

/// Diagnostic sink handed to the components that report progress.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    pub show_time: bool,
    /// Date only (`YYYY-MM-DD`) instead of the full instant.
    pub short_time: bool,
}

impl From<LoggingConfig> for LogOptions {
    fn from(config: LoggingConfig) -> Self {
        Self {
            show_time: config.show_time,
            short_time: config.short_time,
        }
    }
}

impl LogOptions {
    pub fn time_prefix(&self, now: DateTime<Utc>) -> String {
        if !self.show_time {
            return String::new();
        }

        let time = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        if self.short_time {
            format!("[{}]", &time[..10])
        } else {
            format!("[{}]", time)
        }
    }
}

/// Renders `[<time>][LEVEL] message`, the time part only when enabled.
pub fn format_log_line(
    level: LogLevel,
    message: &str,
    options: LogOptions,
    now: DateTime<Utc>,
) -> String {
    format!("{}[{}] {}", options.time_prefix(now), level, message.trim())
}

/// Logger that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn info(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 17, 5, 45, 38).unwrap()
    }

    #[test]
    fn test_plain_line() {
        let line = format_log_line(LogLevel::Info, "foo", LogOptions::default(), instant());
        assert_eq!(line, "[INFO] foo");

        let line = format_log_line(LogLevel::Error, " bar \n", LogOptions::default(), instant());
        assert_eq!(line, "[ERROR] bar");
    }

    #[test]
    fn test_full_timestamp() {
        let options = LogOptions {
            show_time: true,
            short_time: false,
        };
        let line = format_log_line(LogLevel::Error, "bar", options, instant());
        assert_eq!(line, "[2023-01-17T05:45:38.000Z][ERROR] bar");
    }

    #[test]
    fn test_short_timestamp() {
        let options = LogOptions {
            show_time: true,
            short_time: true,
        };
        let line = format_log_line(LogLevel::Info, "bar", options, instant());
        assert_eq!(line, "[2023-01-17][INFO] bar");
    }

    #[test]
    fn test_short_time_needs_show_time() {
        let options = LogOptions {
            show_time: false,
            short_time: true,
        };
        assert_eq!(options.time_prefix(instant()), "");
    }
}
