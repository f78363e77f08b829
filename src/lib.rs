pub mod cli;
pub mod config;
pub mod copier;
pub mod error;
pub mod manifest;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, CopyConfig, LoggingConfig, ManifestConfig, ScanConfig};
pub use error::{Result, ShortlistError, UserFriendlyError};

// Core functionality re-exports
pub use copier::{CopyOutcome, FileCopier, ShortlistReport};
pub use manifest::{find_duplicates, parse_target_names, read_target_names, TargetSet};
pub use scanner::{scan_directory, DirectoryWalker, WalkDirWalker};
pub use ui::{
    GracefulShutdown, LogOptions, Logger, OutputFormatter, OutputMode, ProgressAwareOutput,
    ProgressManager,
};

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Switches for a single run that do not belong in the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Remove and recreate the destination first.
    pub clean: bool,
    /// Match only; copy nothing.
    pub dry_run: bool,
}

/// Main library interface: manifest in, shortlisted files out.
pub struct Shortlist {
    config: Config,
    output_formatter: Arc<OutputFormatter>,
    progress_manager: Arc<ProgressManager>,
    shutdown: GracefulShutdown,
}

impl Shortlist {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let shutdown = GracefulShutdown::new()?;
        Ok(Self::with_shutdown(config, output_mode, verbose, quiet, shutdown))
    }

    /// Same as [`Shortlist::new`] without installing a Ctrl+C handler.
    pub fn new_without_signals(
        config: Config,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
    ) -> Self {
        Self::with_shutdown(
            config,
            output_mode,
            verbose,
            quiet,
            GracefulShutdown::new_for_test(),
        )
    }

    fn with_shutdown(
        config: Config,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
        shutdown: GracefulShutdown,
    ) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet)
            .with_log_options(LogOptions::from(config.logging));
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter: Arc::new(output_formatter),
            progress_manager: Arc::new(progress_manager),
            shutdown,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        )
    }

    /// Reads the manifest, scans `source` and copies every listed file into
    /// `destination`.
    pub async fn run(
        &self,
        manifest: &Path,
        source: &Path,
        destination: &Path,
        options: RunOptions,
    ) -> Result<ShortlistReport> {
        let start_time = Instant::now();
        self.shutdown.check_shutdown()?;

        // Step 1: Manifest
        let (targets, duplicates) = self.load_targets(manifest)?;
        self.shutdown.check_shutdown()?;

        // Step 2: Destination
        if !options.dry_run {
            self.prepare_destination(source, destination, options.clean)?;
        }

        // Step 3: Scan
        let copier = self.file_copier();
        let listing = self.scan_source(&copier, source)?;
        self.shutdown.check_shutdown()?;

        if options.dry_run {
            let report =
                ShortlistReport::planned(source, destination, &targets, &listing, start_time.elapsed())
                    .with_manifest_duplicates(duplicates);
            return Ok(report);
        }

        // Step 4: Copy
        let outcomes = self
            .copy_files(&copier, source, destination, &listing, &targets)
            .await?;

        let report = ShortlistReport::new(
            source,
            destination,
            &targets,
            &listing,
            &outcomes,
            start_time.elapsed(),
        )
        .with_manifest_duplicates(duplicates);

        if self.config.copy.require_matches && report.copied_count() == 0 {
            return Err(ShortlistError::NoMatches {
                targets: report.targets.clone(),
            });
        }

        Ok(report)
    }

    /// Parses the manifest and checks it for repeated names.
    fn load_targets(&self, manifest: &Path) -> Result<(TargetSet, Vec<String>)> {
        self.output_formatter.start_operation("Reading manifest");

        let (directory, file_name) = cli::split_manifest_path(manifest)?;
        let content = manifest::read_manifest(&file_name, &directory)?;
        let targets = TargetSet::from_content(&self.config.manifest.extension, &content);

        let duplicates = find_duplicates(manifest::normalized_tokens(
            &self.config.manifest.extension,
            &content,
        ));

        if !duplicates.is_empty() {
            if self.config.manifest.fail_on_duplicates {
                return Err(ShortlistError::DuplicateTargets { names: duplicates });
            }
            self.output_formatter.warning(&format!(
                "Manifest repeats {} name(s): {}",
                duplicates.len(),
                duplicates.join(", ")
            ));
        }

        if targets.is_degenerate() {
            self.output_formatter.warning(&format!(
                "Manifest has an empty entry; it is looked up as '{}'",
                targets.extension()
            ));
        }

        self.output_formatter
            .info(&format!("Loaded {} target names", targets.len()));

        Ok((targets, duplicates))
    }

    fn prepare_destination(&self, source: &Path, destination: &Path, clean: bool) -> Result<()> {
        if clean {
            check_clean_target(source, destination)?;
            if destination.exists() {
                std::fs::remove_dir_all(destination)?;
            }
            std::fs::create_dir_all(destination)?;
            self.output_formatter.info(&format!(
                "Cleaned destination directory: {}",
                destination.display()
            ));
            return Ok(());
        }

        if !destination.is_dir() {
            return Err(ShortlistError::DestinationMissing {
                path: destination.to_path_buf(),
            });
        }

        Ok(())
    }

    fn scan_source(&self, copier: &FileCopier, source: &Path) -> Result<Vec<std::path::PathBuf>> {
        self.output_formatter.start_operation("Scanning source directory");

        let spinner = self
            .progress_manager
            .create_spinner(&format!("Scanning {}", source.display()));
        let listing = copier.scan(source);
        spinner.finish_and_clear();

        let listing = listing?;
        for path in &listing {
            self.output_formatter.debug(&path.display().to_string());
        }
        self.output_formatter
            .info(&format!("Found {} files under {}", listing.len(), source.display()));
        Ok(listing)
    }

    async fn copy_files(
        &self,
        copier: &FileCopier,
        source: &Path,
        destination: &Path,
        listing: &[std::path::PathBuf],
        targets: &TargetSet,
    ) -> CopyOutcome {
        self.output_formatter.start_operation("Copying matched files");

        let started = Instant::now();
        let pb = self.progress_manager.create_copy_progress(listing.len() as u64);
        let progress_callback = |settled: usize, current: &Path| {
            ui::progress::update_copy_progress(&pb, settled, current);
        };

        let outcome = copier
            .copy_listing(source, destination, listing, targets, Some(&progress_callback))
            .await;

        match &outcome {
            Ok(outcomes) => ui::progress::finish_progress_with_summary(
                &pb,
                &format!("Copied {} files", outcomes.iter().filter(|c| **c).count()),
                started.elapsed(),
            ),
            Err(_) => pb.abandon_with_message("Copy failed"),
        }

        outcome
    }

    fn file_copier(&self) -> FileCopier {
        let logger: Arc<dyn Logger> = Arc::new(ProgressAwareOutput::new(
            self.output_formatter.clone(),
            self.progress_manager.clone(),
        ));

        FileCopier::from_config(&self.config).with_logger(logger)
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::sample().save_to_file(output_path)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    pub fn handle_error(&self, error: &ShortlistError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Refuses to clean a destination that overlaps the source tree.
fn check_clean_target(source: &Path, destination: &Path) -> Result<()> {
    let (Ok(source), Ok(destination)) = (source.canonicalize(), destination.canonicalize()) else {
        return Ok(());
    };

    if source.starts_with(&destination) || destination.starts_with(&source) {
        return Err(ShortlistError::InvalidPath {
            path: format!(
                "Refusing to clean {}: it overlaps the source {}",
                destination.display(),
                source.display()
            ),
        });
    }

    Ok(())
}

/// Copies the files named in `manifest` with default settings and no output.
pub async fn shortlist_simple(
    manifest: &Path,
    source: &Path,
    destination: &Path,
    extension: &str,
) -> Result<ShortlistReport> {
    let mut config = Config::default();
    config.manifest.extension = extension.to_string();
    config.validate()?;

    let shortlist = Shortlist::new_without_signals(config, OutputMode::Plain, 0, true);
    shortlist
        .run(manifest, source, destination, RunOptions::default())
        .await
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
