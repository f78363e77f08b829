use crate::error::{Result, ShortlistError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub manifest: ManifestConfig,
    pub scan: ScanConfig,
    pub copy: CopyConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub extension: String,
    pub fail_on_duplicates: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub follow_links: bool,
    /// Skip files and directories whose name starts with '.'.
    pub skip_hidden: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CopyConfig {
    /// Upper bound on simultaneous copies. Unset means no bound.
    pub max_concurrency: Option<usize>,
    pub preserve_mtime: bool,
    pub require_matches: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub show_time: bool,
    pub short_time: bool,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            extension: ".jpg".to_string(),
            fail_on_duplicates: false,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_links: true,
            skip_hidden: true,
        }
    }
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            preserve_mtime: true,
            require_matches: false,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ShortlistError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ShortlistError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ShortlistError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["shortlist.toml", ".shortlist.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref extension) = cli_args.extension {
            self.manifest.extension = extension.clone();
        }

        if let Some(fail) = cli_args.fail_on_duplicates {
            self.manifest.fail_on_duplicates = fail;
        }

        if let Some(follow) = cli_args.follow_links {
            self.scan.follow_links = follow;
        }

        if let Some(skip) = cli_args.skip_hidden {
            self.scan.skip_hidden = skip;
        }

        if let Some(limit) = cli_args.max_concurrency {
            self.copy.max_concurrency = Some(limit);
        }

        if let Some(require) = cli_args.require_matches {
            self.copy.require_matches = require;
        }

        if let Some(show_time) = cli_args.show_time {
            self.logging.show_time = show_time;
        }

        if let Some(short_time) = cli_args.short_time {
            self.logging.short_time = short_time;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ShortlistError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ShortlistError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.manifest.extension.trim().is_empty() {
            return Err(ShortlistError::Config {
                message: "The target extension must not be empty".to_string(),
            });
        }

        if self.copy.max_concurrency == Some(0) {
            return Err(ShortlistError::Config {
                message: "max_concurrency must be at least 1 when set".to_string(),
            });
        }

        Ok(())
    }

    /// Defaults with every optional key spelled out.
    pub fn sample() -> Self {
        let mut sample_config = Self::default();
        sample_config.copy.max_concurrency = Some(64);
        sample_config
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub extension: Option<String>,
    pub fail_on_duplicates: Option<bool>,
    pub follow_links: Option<bool>,
    pub skip_hidden: Option<bool>,
    pub max_concurrency: Option<usize>,
    pub require_matches: Option<bool>,
    pub show_time: Option<bool>,
    pub short_time: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension;
        self
    }

    pub fn with_fail_on_duplicates(mut self, fail: Option<bool>) -> Self {
        self.fail_on_duplicates = fail;
        self
    }

    pub fn with_follow_links(mut self, follow: Option<bool>) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn with_skip_hidden(mut self, skip: Option<bool>) -> Self {
        self.skip_hidden = skip;
        self
    }

    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit;
        self
    }

    pub fn with_require_matches(mut self, require: Option<bool>) -> Self {
        self.require_matches = require;
        self
    }

    pub fn with_show_time(mut self, show_time: Option<bool>) -> Self {
        self.show_time = show_time;
        self
    }

    pub fn with_short_time(mut self, short_time: Option<bool>) -> Self {
        self.short_time = short_time;
        self
    }
}
