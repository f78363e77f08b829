use crate::config::{CliOverrides, Config};
use crate::error::{Result, ShortlistError};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "shortlist")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Copy the files named in a manifest out of a nested source tree")]
#[command(
    long_about = "Shortlist reads a '|'-separated manifest of file names, finds those files \
                  anywhere under a source directory (ignoring case), and copies them into \
                  a single flat destination directory."
)]
#[command(after_help = "EXAMPLES:\n  \
    shortlist picks.txt --source ./photos --destination ./selected\n  \
    shortlist picks.txt -s ./photos -d ./selected --extension .JPG --clean\n  \
    shortlist picks.txt -s ./photos -d ./selected --dry-run\n  \
    shortlist picks.txt -s ./photos -d ./selected --max-concurrency 32 --output-format json")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Manifest file listing the names to copy, separated by '|'
    #[arg(required_unless_present = "generate_config", env = "SHORTLIST_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Directory tree to search
    #[arg(
        short,
        long,
        required_unless_present = "generate_config",
        env = "SHORTLIST_SOURCE"
    )]
    pub source: Option<PathBuf>,

    /// Flat directory the matches are copied into
    #[arg(
        short,
        long,
        required_unless_present = "generate_config",
        env = "SHORTLIST_DESTINATION"
    )]
    pub destination: Option<PathBuf>,

    /// Extension appended to manifest names that do not already contain it
    #[arg(short, long, help = "Target extension, e.g. .jpg")]
    pub extension: Option<String>,

    /// Maximum number of copies in flight
    #[arg(long, help = "Limit simultaneous copies (default: unlimited)")]
    pub max_concurrency: Option<usize>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Prefix messages with a timestamp
    #[arg(long)]
    pub show_time: bool,

    /// Use the date only in timestamps
    #[arg(long)]
    pub short_time: bool,

    /// Remove and recreate the destination before copying
    #[arg(long)]
    pub clean: bool,

    /// Fail when the manifest repeats a name
    #[arg(long)]
    pub fail_on_duplicates: bool,

    /// Fail when no file matches
    #[arg(long)]
    pub require_matches: bool,

    /// Do not follow symbolic links while scanning
    #[arg(long)]
    pub no_follow_links: bool,

    /// Also scan files and directories whose name starts with '.'
    #[arg(long)]
    pub include_hidden: bool,

    /// Dry run (show what would be copied without copying)
    #[arg(long, help = "Show what would be copied without actually doing it")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        config.merge_with_cli_args(&self.create_cli_overrides());
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_extension(self.extension.clone())
            .with_max_concurrency(self.max_concurrency)
            .with_fail_on_duplicates(flag(self.fail_on_duplicates))
            .with_require_matches(flag(self.require_matches))
            .with_follow_links(self.no_follow_links.then_some(false))
            .with_skip_hidden(self.include_hidden.then_some(false))
            .with_show_time(flag(self.show_time || self.short_time))
            .with_short_time(flag(self.short_time))
    }

    pub fn manifest_path(&self) -> Result<&Path> {
        self.required_path(&self.manifest, "manifest")
    }

    pub fn source_dir(&self) -> Result<&Path> {
        self.required_path(&self.source, "--source")
    }

    pub fn destination_dir(&self) -> Result<&Path> {
        self.required_path(&self.destination, "--destination")
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    fn required_path<'a>(&self, value: &'a Option<PathBuf>, name: &str) -> Result<&'a Path> {
        value.as_deref().ok_or_else(|| ShortlistError::Config {
            message: format!("{} is required", name),
        })
    }
}

fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

/// Splits a manifest path into its directory and file name.
pub fn split_manifest_path(manifest: &Path) -> Result<(PathBuf, String)> {
    let file_name = manifest
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ShortlistError::InvalidPath {
            path: format!("Manifest path has no file name: {}", manifest.display()),
        })?
        .to_string();

    let directory = match manifest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((directory, file_name))
}
