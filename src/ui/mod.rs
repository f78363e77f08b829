pub mod logger;
pub mod output;
pub mod progress;
pub mod signals;

pub use logger::{format_log_line, LogLevel, LogOptions, Logger, NullLogger};
pub use output::{OutputFormatter, OutputMode, ProgressAwareOutput};
pub use progress::ProgressManager;
pub use signals::GracefulShutdown;
