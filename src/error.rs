use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShortlistError {
    #[error("Failed to read manifest {}: {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to scan {}: {message}", path.display())]
    Scan { path: PathBuf, message: String },

    #[error("Failed to copy {} to {}: {source}", source_path.display(), destination.display())]
    Copy {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Destination directory does not exist: {}", path.display())]
    DestinationMissing { path: PathBuf },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Manifest lists {} duplicate name(s)", names.len())]
    DuplicateTargets { names: Vec<String> },

    #[error("None of the {} target files were found", targets.len())]
    NoMatches { targets: Vec<String> },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ShortlistError {
    fn user_message(&self) -> String {
        match self {
            ShortlistError::ManifestRead { path, source } => {
                format!("Could not read manifest {}: {}", path.display(), source)
            }
            ShortlistError::Scan { path, message } => {
                format!("Could not scan {}: {}", path.display(), message)
            }
            ShortlistError::Copy {
                source_path,
                destination,
                source,
            } => format!(
                "Copy failed ({} -> {}): {}",
                source_path.display(),
                destination.display(),
                source
            ),
            ShortlistError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            ShortlistError::DestinationMissing { path } => {
                format!("Destination directory does not exist: {}", path.display())
            }
            ShortlistError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ShortlistError::DuplicateTargets { names } => {
                format!("Manifest contains duplicates: {}", names.join(", "))
            }
            ShortlistError::NoMatches { targets } => {
                format!(
                    "No source file matched any of {} target names",
                    targets.len()
                )
            }
            ShortlistError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ShortlistError::ManifestRead { .. } => Some(
                "Check that the manifest path is correct and the file is readable.".to_string(),
            ),
            ShortlistError::Copy { .. } => Some(
                "Ensure the destination directory exists and is writable. Files copied before the failure were kept.".to_string(),
            ),
            ShortlistError::DestinationMissing { .. } => Some(
                "Create the destination directory first, or pass --clean to have it created.".to_string(),
            ),
            ShortlistError::InvalidPath { .. } => Some(
                "The source must be an existing directory.".to_string(),
            ),
            ShortlistError::Config { .. } => Some(
                "Check your configuration file syntax and values, or regenerate one with --generate-config.".to_string(),
            ),
            ShortlistError::DuplicateTargets { .. } => Some(
                "Remove the repeated entries from the manifest, or drop --fail-on-duplicates.".to_string(),
            ),
            ShortlistError::NoMatches { .. } => Some(
                "Check the --extension value and that the source directory holds the listed files.".to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ShortlistError {
    fn from(error: toml::de::Error) -> Self {
        ShortlistError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShortlistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = ShortlistError::DestinationMissing {
            path: PathBuf::from("/nowhere"),
        };
        assert!(error.user_message().contains("/nowhere"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_manifest_error_keeps_source() {
        use std::error::Error;

        let error = ShortlistError::ManifestRead {
            path: PathBuf::from("list.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(error.source().is_some());
        assert!(error.to_string().contains("list.txt"));
    }

    #[test]
    fn test_duplicate_message_lists_names() {
        let error = ShortlistError::DuplicateTargets {
            names: vec!["a.jpg".to_string(), "b.jpg".to_string()],
        };
        assert_eq!(error.to_string(), "Manifest lists 2 duplicate name(s)");
        assert!(error.user_message().contains("a.jpg, b.jpg"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let error = ShortlistError::from(toml_error);
        assert!(matches!(error, ShortlistError::Config { .. }));
    }
}
