use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    pub fn create_copy_progress(&self, total_files: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_files));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} files {msg}"
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        );
        pb.set_message("Matching files...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        pb.set_message(message.to_string());
        pb
    }

    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if self.enabled {
            self.multi_progress.suspend(f)
        } else {
            f()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn update_copy_progress(pb: &ProgressBar, settled: usize, current: &Path) {
    pb.set_position(settled as u64);
    pb.set_message(current.display().to_string());
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let final_message = format!("{} (completed in {})", message, format_duration(duration));
    pb.finish_with_message(final_message);
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
