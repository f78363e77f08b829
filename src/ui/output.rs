use crate::copier::ShortlistReport;
use crate::error::{ShortlistError, UserFriendlyError};
use crate::ui::logger::{format_log_line, LogLevel, LogOptions, Logger};
use crate::ui::ProgressManager;
use chrono::Utc;
use console::{style, Emoji, Term};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
    log_options: LogOptions,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
            log_options: LogOptions::default(),
        }
    }

    pub fn with_log_options(mut self, options: LogOptions) -> Self {
        self.log_options = options;
        self
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("{}SUCCESS: {}", self.time_prefix(), message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!(
                "{}",
                format_log_line(LogLevel::Error, message, self.log_options, Utc::now())
            ),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("{}WARNING: {}", self.time_prefix(), message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!(
                    "{}",
                    format_log_line(LogLevel::Info, message, self.log_options, Utc::now())
                ),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &ShortlistError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    pub fn print_report(&self, report: &ShortlistReport) {
        match self.mode {
            OutputMode::Human => {
                if !self.quiet {
                    self.print_human_report(report);
                }
            }
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Plain => self.print_plain_report(report),
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{} {}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => {
                println!("=== {} ===", title);
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn time_prefix(&self) -> String {
        self.log_options.time_prefix(Utc::now())
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        let time = self.time_prefix();

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}{}", style(time).dim(), emoji, color_fn(message)),
                _ => println!("{}{}{}", style(time).dim(), emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{}{} {}", time, prefix, message),
                _ => println!("{}{} {}", time, prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_report(&self, report: &ShortlistReport) {
        let title = if report.dry_run {
            "Shortlist Plan"
        } else {
            "Shortlist Report"
        };
        self.print_header(title);

        let highlight = |value: String| {
            if self.use_colors {
                style(value).cyan().bold().to_string()
            } else {
                value
            }
        };

        println!("  Source:        {}", report.source.display());
        println!("  Destination:   {}", report.destination.display());
        println!("  Targets:       {}", highlight(report.targets.len().to_string()));
        println!("  Files scanned: {}", highlight(report.scanned_files.to_string()));
        println!(
            "  {}  {}",
            if report.dry_run { "Would copy:" } else { "Copied:    " },
            highlight(report.copied_count().to_string())
        );
        println!("  Time taken:    {}", format_duration(report.elapsed));

        if !report.manifest_duplicates.is_empty() {
            println!();
            println!("Repeated in manifest:");
            for name in &report.manifest_duplicates {
                println!("  - {}", name);
            }
        }

        if !report.missing_targets.is_empty() {
            println!();
            println!("Not found:");
            for name in &report.missing_targets {
                println!("  - {}", name);
            }
        }

        self.print_separator();
    }

    fn print_plain_report(&self, report: &ShortlistReport) {
        println!(
            "REPORT: {}",
            if report.dry_run { "dry run" } else { "copy completed" }
        );
        println!("Source: {}", report.source.display());
        println!("Destination: {}", report.destination.display());
        println!("Targets: {}", report.targets.len());
        println!("Scanned: {}", report.scanned_files);
        println!("Copied: {}", report.copied_count());
        println!("Duration: {:?}", report.elapsed);

        for name in &report.missing_targets {
            println!("MISSING: {}", name);
        }
    }
}

impl Logger for OutputFormatter {
    fn info(&self, message: &str) {
        OutputFormatter::info(self, message);
    }

    fn error(&self, message: &str) {
        OutputFormatter::error(self, message);
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Logger that keeps progress bars intact while printing.
pub struct ProgressAwareOutput {
    formatter: Arc<OutputFormatter>,
    progress_manager: Arc<ProgressManager>,
}

impl ProgressAwareOutput {
    pub fn new(formatter: Arc<OutputFormatter>, progress_manager: Arc<ProgressManager>) -> Self {
        Self {
            formatter,
            progress_manager,
        }
    }

    pub fn suspend_and_print<F>(&self, f: F)
    where
        F: FnOnce(&OutputFormatter),
    {
        self.progress_manager.suspend(|| f(&self.formatter));
    }
}

impl Logger for ProgressAwareOutput {
    fn info(&self, message: &str) {
        self.suspend_and_print(|f| f.info(message));
    }

    fn error(&self, message: &str) {
        self.suspend_and_print(|f| f.error(message));
    }
}
