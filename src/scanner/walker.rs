use crate::config::ScanConfig;
use crate::error::{Result, ShortlistError};
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Boxed listing of paths relative to the walked root.
pub type Listing<'a> = Box<dyn Iterator<Item = Result<PathBuf>> + Send + 'a>;

/// Recursive enumeration of the files under a root directory.
///
/// Each call to `walk` produces a fresh, finite sequence; it cannot be
/// restarted once consumed.
pub trait DirectoryWalker: Send + Sync {
    fn walk<'a>(&'a self, root: &Path) -> Result<Listing<'a>>;
}

/// [`DirectoryWalker`] backed by `walkdir`.
///
/// By default symlinks are followed and dot-prefixed entries are skipped.
#[derive(Debug, Clone)]
pub struct WalkDirWalker {
    follow_links: bool,
    skip_hidden: bool,
}

impl WalkDirWalker {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            follow_links: config.follow_links,
            skip_hidden: config.skip_hidden,
        }
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    fn should_traverse(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !self.skip_hidden {
            return true;
        }

        !entry.file_name().to_string_lossy().starts_with('.')
    }
}

impl Default for WalkDirWalker {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

impl DirectoryWalker for WalkDirWalker {
    fn walk<'a>(&'a self, root: &Path) -> Result<Listing<'a>> {
        let root_path = root.to_path_buf();

        if !root_path.is_dir() {
            return Err(ShortlistError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let walker = WalkDir::new(&root_path)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_entry(move |e| self.should_traverse(e));

        let listing = walker.filter_map(move |entry| match entry {
            Ok(entry) if entry.file_type().is_file() => {
                Some(relative_path(entry.path(), &root_path))
            }
            Ok(_) => None,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root_path.clone());
                Some(Err(ShortlistError::Scan {
                    path,
                    message: err.to_string(),
                }))
            }
        });

        Ok(Box::new(listing))
    }
}

/// Collects the full listing of `root`, stopping at the first walk error.
pub fn scan_directory<W, P>(walker: &W, root: P) -> Result<Vec<PathBuf>>
where
    W: DirectoryWalker + ?Sized,
    P: AsRef<Path>,
{
    walker.walk(root.as_ref())?.collect()
}

fn relative_path(file_path: &Path, root_path: &Path) -> Result<PathBuf> {
    let relative = file_path
        .strip_prefix(root_path)
        .map_err(|_| ShortlistError::InvalidPath {
            path: format!(
                "Cannot calculate relative path for {} from root {}",
                file_path.display(),
                root_path.display()
            ),
        })?;

    if relative
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(ShortlistError::InvalidPath {
            path: format!(
                "Path contains parent directory references: {}",
                relative.display()
            ),
        });
    }

    Ok(relative.to_path_buf())
}
