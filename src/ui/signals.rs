use crate::error::{Result, ShortlistError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Ctrl+C flag consulted between pipeline stages.
///
/// A copy batch that has already started is never interrupted; the flag only
/// stops the next stage from starting.
pub struct GracefulShutdown {
    running: Arc<AtomicBool>,
    shutdown_message_shown: Arc<AtomicBool>,
}

impl GracefulShutdown {
    pub fn new() -> Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let shutdown_message_shown = Arc::new(AtomicBool::new(false));

        let running_clone = running.clone();
        let message_shown_clone = shutdown_message_shown.clone();

        ctrlc::set_handler(move || {
            running_clone.store(false, Ordering::SeqCst);

            if !message_shown_clone.swap(true, Ordering::SeqCst) {
                eprintln!("\n🛑 Stopping after the current step... (press Ctrl+C again to force exit)");
            } else {
                eprintln!("\n💀 Force stopping...");
                std::process::exit(130);
            }
        })
        .map_err(|e| ShortlistError::Config {
            message: format!("Failed to set signal handler: {}", e),
        })?;

        Ok(Self {
            running,
            shutdown_message_shown,
        })
    }

    /// No signal handler registration, so tests can build many instances.
    pub fn new_for_test() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            shutdown_message_shown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn check_shutdown(&self) -> Result<()> {
        if !self.is_running() {
            return Err(ShortlistError::Cancelled);
        }
        Ok(())
    }

    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
