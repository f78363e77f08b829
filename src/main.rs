use clap::Parser;
use shortlist::{
    Cli, OutputFormatter, OutputMode, RunOptions, Shortlist, ShortlistError, ShortlistReport,
    UserFriendlyError,
};
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let shortlist = match Shortlist::from_cli(&cli) {
        Ok(shortlist) => shortlist,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    let (manifest, source, destination) = match resolve_paths(&cli) {
        Ok(paths) => paths,
        Err(e) => {
            shortlist.handle_error(&e);
            return 1;
        }
    };

    if cli.dry_run {
        print_dry_run_plan(&shortlist, &cli);
    }

    let options = RunOptions {
        clean: cli.clean,
        dry_run: cli.dry_run,
    };

    match shortlist.run(manifest, source, destination, options).await {
        Ok(report) => {
            let formatter = shortlist.output_formatter();
            formatter.print_report(&report);
            if report.dry_run {
                formatter.success("Dry run completed; run without --dry-run to copy");
            }
            report_exit_code(&report)
        }
        Err(e) => {
            shortlist.handle_error(&e);
            error_exit_code(&e)
        }
    }
}

fn resolve_paths(cli: &Cli) -> shortlist::Result<(&Path, &Path, &Path)> {
    Ok((cli.manifest_path()?, cli.source_dir()?, cli.destination_dir()?))
}

fn report_exit_code(report: &ShortlistReport) -> i32 {
    if report.is_complete() {
        0
    } else {
        2 // Some targets were not found
    }
}

fn error_exit_code(error: &ShortlistError) -> i32 {
    match error {
        ShortlistError::Cancelled => 130, // Interrupted (SIGINT)
        ShortlistError::ManifestRead { .. } => 3,
        ShortlistError::Copy { .. } | ShortlistError::Scan { .. } => 4,
        ShortlistError::InvalidPath { .. } | ShortlistError::DestinationMissing { .. } => 5,
        ShortlistError::DuplicateTargets { .. } => 6,
        ShortlistError::NoMatches { .. } => 7,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "shortlist.toml".to_string());

    match Shortlist::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!(
                "  shortlist <manifest> -s <source> -d <destination> --config {}",
                config_path
            );
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_dry_run_plan(shortlist: &Shortlist, cli: &Cli) {
    let formatter = shortlist.output_formatter();
    if formatter.mode() != OutputMode::Human {
        return;
    }

    formatter.info("DRY RUN MODE - No files will be copied");
    formatter.print_separator();

    let config = shortlist.config();
    formatter.info("Configuration that would be used:");
    println!("  Extension: {}", config.manifest.extension);
    match config.copy.max_concurrency {
        Some(limit) => println!("  Max concurrency: {}", limit),
        None => println!("  Max concurrency: unlimited"),
    }
    println!("  Follow links: {}", config.scan.follow_links);
    println!("  Skip hidden: {}", config.scan.skip_hidden);
    println!("  Preserve mtime: {}", config.copy.preserve_mtime);

    if cli.clean {
        formatter.warning("Clean mode enabled - would empty the destination first");
    }

    formatter.print_separator();
}

fn print_startup_error(error: &ShortlistError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            "shortlist",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(handle_generate_config(&cli), 0);
        assert!(config_path.exists());
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(error_exit_code(&ShortlistError::Cancelled), 130);
        assert_eq!(
            error_exit_code(&ShortlistError::ManifestRead {
                path: PathBuf::from("foo.txt"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
            3
        );
        assert_eq!(
            error_exit_code(&ShortlistError::DestinationMissing {
                path: PathBuf::from("out"),
            }),
            5
        );
        assert_eq!(
            error_exit_code(&ShortlistError::DuplicateTargets {
                names: vec!["a".to_string()],
            }),
            6
        );
        assert_eq!(
            error_exit_code(&ShortlistError::Config {
                message: "bad".to_string(),
            }),
            1
        );
    }
}
