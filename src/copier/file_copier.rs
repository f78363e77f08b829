use crate::config::Config;
use crate::error::{Result, ShortlistError};
use crate::manifest::TargetSet;
use crate::scanner::{scan_directory, DirectoryWalker, WalkDirWalker};
use crate::ui::logger::{Logger, NullLogger};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// One bool per scanned path (`true` = copied), or the first failure of the
/// batch in place of the whole array.
pub type CopyOutcome = Result<Vec<bool>>;

/// Called after each attempt settles with the number settled so far.
pub type ProgressCallback<'a> = &'a (dyn Fn(usize, &Path) + Sync);

pub struct FileCopier {
    walker: Box<dyn DirectoryWalker>,
    max_concurrency: Option<usize>,
    preserve_mtime: bool,
    logger: Arc<dyn Logger>,
}

impl FileCopier {
    pub fn new() -> Self {
        Self {
            walker: Box::new(WalkDirWalker::default()),
            max_concurrency: None,
            preserve_mtime: true,
            logger: Arc::new(NullLogger),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_walker(WalkDirWalker::new(&config.scan))
            .with_max_concurrency(config.copy.max_concurrency)
            .with_preserve_mtime(config.copy.preserve_mtime)
    }

    pub fn with_walker<W: DirectoryWalker + 'static>(mut self, walker: W) -> Self {
        self.walker = Box::new(walker);
        self
    }

    /// `None` launches every copy at once.
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.map(|l| l.max(1));
        self
    }

    pub fn with_preserve_mtime(mut self, preserve: bool) -> Self {
        self.preserve_mtime = preserve;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn scan(&self, source: &Path) -> Result<Vec<PathBuf>> {
        scan_directory(self.walker.as_ref(), source)
    }

    /// Scans `source` and copies every file whose name is a target into
    /// `destination`, flattened to its basename.
    ///
    /// Failures never escape as panics; they come back as the `Err` side of
    /// the outcome. Files copied before a failure stay in place.
    pub async fn find_and_copy(
        &self,
        source: &Path,
        destination: &Path,
        targets: &TargetSet,
    ) -> CopyOutcome {
        let listing = self.scan(source)?;
        self.copy_listing(source, destination, &listing, targets, None)
            .await
    }

    /// Copies the matches in an already scanned `listing`.
    ///
    /// Outcomes follow listing order. Every attempt runs to completion before
    /// the batch result is decided. When `destination` lies inside `source`,
    /// paths under it are earlier copies and come back `false`.
    pub async fn copy_listing(
        &self,
        source: &Path,
        destination: &Path,
        listing: &[PathBuf],
        targets: &TargetSet,
        progress: Option<ProgressCallback<'_>>,
    ) -> CopyOutcome {
        let limit = self.max_concurrency.unwrap_or(listing.len()).max(1);
        let settled = AtomicUsize::new(0);
        let nested = nested_destination(source, destination).await;
        let nested = nested.as_deref();

        let results: Vec<Result<bool>> = stream::iter(listing)
            .map(|relative| {
                let settled = &settled;
                async move {
                    let outcome = match nested {
                        Some(prefix) if relative.starts_with(prefix) => Ok(false),
                        _ => {
                            self.copy_if_target(source, destination, relative.as_path(), targets)
                                .await
                        }
                    };

                    let done = settled.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(callback) = progress {
                        callback(done, relative.as_path());
                    }

                    outcome
                }
            })
            .buffered(limit)
            .collect()
            .await;

        results.into_iter().collect()
    }

    async fn copy_if_target(
        &self,
        source: &Path,
        destination: &Path,
        relative: &Path,
        targets: &TargetSet,
    ) -> Result<bool> {
        let Some(basename) = relative.file_name() else {
            return Ok(false);
        };

        if !targets.matches(&basename.to_string_lossy()) {
            return Ok(false);
        }

        let source_path = source.join(relative);
        let dest_path = destination.join(basename);

        if same_file(&source_path, &dest_path).await {
            self.logger.info(&format!("Already in place: {}", dest_path.display()));
            return Ok(true);
        }

        if let Err(e) = tokio::fs::copy(&source_path, &dest_path).await {
            return Err(ShortlistError::Copy {
                source_path,
                destination: dest_path,
                source: e,
            });
        }

        if self.preserve_mtime {
            copy_modified_time(&source_path, &dest_path).await;
        }

        self.logger.info(&format!(
            "Copied {} -> {}",
            relative.display(),
            dest_path.display()
        ));

        Ok(true)
    }
}

impl Default for FileCopier {
    fn default() -> Self {
        Self::new()
    }
}

/// `destination` relative to `source` when it is a proper subdirectory of it.
async fn nested_destination(source: &Path, destination: &Path) -> Option<PathBuf> {
    let source = tokio::fs::canonicalize(source).await.ok()?;
    let destination = tokio::fs::canonicalize(destination).await.ok()?;
    let relative = destination.strip_prefix(&source).ok()?;

    (!relative.as_os_str().is_empty()).then(|| relative.to_path_buf())
}

// Copying a file onto itself would truncate it.
async fn same_file(source: &Path, dest: &Path) -> bool {
    match (
        tokio::fs::canonicalize(source).await,
        tokio::fs::canonicalize(dest).await,
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// Best effort: a file that copied but kept a fresh mtime still counts.
async fn copy_modified_time(source: &Path, dest: &Path) {
    if let Ok(metadata) = tokio::fs::metadata(source).await {
        if let Ok(modified) = metadata.modified() {
            let _ = filetime::set_file_mtime(dest, filetime::FileTime::from_system_time(modified));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingLogger {
        lines: Mutex<Vec<String>>,
    }

    impl Logger for RecordingLogger {
        fn info(&self, message: &str) {
            self.lines.lock().unwrap().push(format!("info: {message}"));
        }

        fn error(&self, message: &str) {
            self.lines.lock().unwrap().push(format!("error: {message}"));
        }
    }

    fn build_source(root: &Path) {
        fs::create_dir_all(root.join("batch1/sub")).unwrap();
        fs::create_dir_all(root.join("batch2")).unwrap();
        fs::write(root.join("batch1/sub/_A000.jpg"), "a000").unwrap();
        fs::write(root.join("batch2/C000.jpg"), "c000").unwrap();
        fs::write(root.join("batch2/other.png"), "other").unwrap();
    }

    fn targets() -> TargetSet {
        TargetSet::new(
            ".jpg",
            vec!["_a000.jpg".to_string(), "c000.jpg".to_string()],
        )
    }

    fn dest_names(dest: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dest)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_copies_matches_flat() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        build_source(source.path());

        let copier = FileCopier::new();
        let listing = copier.scan(source.path()).unwrap();
        let outcomes = copier
            .copy_listing(source.path(), dest.path(), &listing, &targets(), None)
            .await
            .unwrap();

        assert_eq!(outcomes.len(), listing.len());
        for (path, copied) in listing.iter().zip(&outcomes) {
            let is_png = path.extension().is_some_and(|e| e == "png");
            assert_eq!(*copied, !is_png, "unexpected outcome for {}", path.display());
        }

        assert_eq!(dest_names(dest.path()), vec!["C000.jpg", "_A000.jpg"]);
        assert_eq!(
            fs::read_to_string(dest.path().join("_A000.jpg")).unwrap(),
            "a000"
        );
    }

    #[tokio::test]
    async fn test_find_and_copy_counts() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        build_source(source.path());

        let outcomes = FileCopier::new()
            .find_and_copy(source.path(), dest.path(), &targets())
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes.iter().filter(|c| **c).count(), 2);
    }

    #[tokio::test]
    async fn test_case_insensitive_match() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::write(source.path().join("_A000.JPG"), "x").unwrap();

        let targets = TargetSet::new(".jpg", vec!["_a000.jpg".to_string()]);
        let outcomes = FileCopier::new()
            .find_and_copy(source.path(), dest.path(), &targets)
            .await
            .unwrap();

        assert_eq!(outcomes, vec![true]);
        assert!(dest.path().join("_A000.JPG").exists());
    }

    #[tokio::test]
    async fn test_second_run_is_identical() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        build_source(source.path());
        let copier = FileCopier::new();

        let first = copier
            .find_and_copy(source.path(), dest.path(), &targets())
            .await
            .unwrap();
        let names_after_first = dest_names(dest.path());

        let second = copier
            .find_and_copy(source.path(), dest.path(), &targets())
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(dest_names(dest.path()), names_after_first);
        assert_eq!(fs::read_to_string(dest.path().join("C000.jpg")).unwrap(), "c000");
    }

    #[tokio::test]
    async fn test_missing_destination_is_returned_as_error() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        build_source(source.path());
        let missing = dest.path().join("not-created");

        let logger = Arc::new(RecordingLogger::default());
        let outcome = FileCopier::new()
            .with_logger(logger.clone())
            .find_and_copy(source.path(), &missing, &targets())
            .await;

        match outcome {
            Err(ShortlistError::Copy { destination, .. }) => {
                assert!(destination.starts_with(&missing));
            }
            other => panic!("expected copy error, got {other:?}"),
        }
        assert!(!missing.exists());
        assert!(logger.lines.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rerun_with_destination_inside_source() {
        let source = TempDir::new().unwrap();
        fs::create_dir_all(source.path().join("2023")).unwrap();
        fs::write(source.path().join("2023/_A000.jpg"), "payload").unwrap();
        let dest = source.path().join("selected");
        fs::create_dir_all(&dest).unwrap();

        let targets = TargetSet::new(".jpg", vec!["_a000.jpg".to_string()]);
        let copier = FileCopier::new();

        let first = copier
            .find_and_copy(source.path(), &dest, &targets)
            .await
            .unwrap();
        assert_eq!(first, vec![true]);

        let second = copier
            .find_and_copy(source.path(), &dest, &targets)
            .await
            .unwrap();
        assert_eq!(second.iter().filter(|c| **c).count(), 1);
        assert_eq!(second.len(), 2);

        assert_eq!(fs::read_to_string(dest.join("_A000.jpg")).unwrap(), "payload");
        assert_eq!(
            fs::read_to_string(source.path().join("2023/_A000.jpg")).unwrap(),
            "payload"
        );
    }

    #[tokio::test]
    async fn test_file_already_in_destination_is_left_intact() {
        let source = TempDir::new().unwrap();
        fs::write(source.path().join("C000.jpg"), "c000").unwrap();

        let outcomes = FileCopier::new()
            .find_and_copy(source.path(), source.path(), &targets())
            .await
            .unwrap();

        assert_eq!(outcomes, vec![true]);
        assert_eq!(fs::read_to_string(source.path().join("C000.jpg")).unwrap(), "c000");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_walk_error_fails_the_batch() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        build_source(source.path());
        std::os::unix::fs::symlink(source.path(), source.path().join("batch1/loop")).unwrap();

        let outcome = FileCopier::new()
            .find_and_copy(source.path(), dest.path(), &targets())
            .await;

        assert!(matches!(outcome, Err(ShortlistError::Scan { .. })));
        assert!(dest_names(dest.path()).is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_target_is_copied() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let real = elsewhere.path().join("original.jpg");
        fs::write(&real, "linked").unwrap();
        fs::create_dir_all(source.path().join("links")).unwrap();
        std::os::unix::fs::symlink(&real, source.path().join("links/_A000.jpg")).unwrap();

        let outcomes = FileCopier::new()
            .find_and_copy(source.path(), dest.path(), &targets())
            .await
            .unwrap();

        assert_eq!(outcomes, vec![true]);
        assert_eq!(fs::read_to_string(dest.path().join("_A000.jpg")).unwrap(), "linked");
    }

    #[tokio::test]
    async fn test_hidden_directories_are_not_copied_from() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::create_dir_all(source.path().join("day/.thumbs")).unwrap();
        fs::write(source.path().join("day/_A000.jpg"), "full").unwrap();
        fs::write(source.path().join("day/.thumbs/_A000.jpg"), "thumb").unwrap();

        let outcomes = FileCopier::new()
            .find_and_copy(source.path(), dest.path(), &targets())
            .await
            .unwrap();

        assert_eq!(outcomes, vec![true]);
        assert_eq!(fs::read_to_string(dest.path().join("_A000.jpg")).unwrap(), "full");
    }

    #[tokio::test]
    async fn test_missing_source_is_returned_as_error() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();

        let outcome = FileCopier::new()
            .find_and_copy(&source.path().join("gone"), dest.path(), &targets())
            .await;

        assert!(matches!(outcome, Err(ShortlistError::InvalidPath { .. })));
    }

    #[tokio::test]
    async fn test_bounded_concurrency_matches_unbounded() {
        let source = TempDir::new().unwrap();
        build_source(source.path());
        for i in 0..20 {
            fs::write(source.path().join(format!("extra{i}.jpg")), "e").unwrap();
        }

        let unbounded_dest = TempDir::new().unwrap();
        let bounded_dest = TempDir::new().unwrap();
        let listing = FileCopier::new().scan(source.path()).unwrap();

        let unbounded = FileCopier::new()
            .copy_listing(source.path(), unbounded_dest.path(), &listing, &targets(), None)
            .await
            .unwrap();
        let bounded = FileCopier::new()
            .with_max_concurrency(Some(1))
            .copy_listing(source.path(), bounded_dest.path(), &listing, &targets(), None)
            .await
            .unwrap();

        assert_eq!(unbounded, bounded);
        assert_eq!(dest_names(unbounded_dest.path()), dest_names(bounded_dest.path()));
    }

    #[tokio::test]
    async fn test_progress_sees_every_attempt() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        build_source(source.path());

        let copier = FileCopier::new().with_max_concurrency(Some(2));
        let listing = copier.scan(source.path()).unwrap();
        let seen = Mutex::new(Vec::new());
        let callback = |done: usize, _path: &Path| seen.lock().unwrap().push(done);

        copier
            .copy_listing(source.path(), dest.path(), &listing, &targets(), Some(&callback))
            .await
            .unwrap();

        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_preserves_modified_time() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let file = source.path().join("c000.jpg");
        fs::write(&file, "c").unwrap();
        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        filetime::set_file_mtime(&file, filetime::FileTime::from_system_time(old)).unwrap();

        FileCopier::new()
            .find_and_copy(source.path(), dest.path(), &targets())
            .await
            .unwrap();

        let copied = fs::metadata(dest.path().join("c000.jpg")).unwrap();
        assert_eq!(copied.modified().unwrap(), old);
    }

    #[tokio::test]
    async fn test_logs_each_copy() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        build_source(source.path());

        let logger = Arc::new(RecordingLogger::default());
        FileCopier::new()
            .with_logger(logger.clone())
            .find_and_copy(source.path(), dest.path(), &targets())
            .await
            .unwrap();

        let lines = logger.lines.lock().unwrap();
        assert_eq!(lines.iter().filter(|l| l.starts_with("info: Copied")).count(), 2);
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();

        let outcomes = FileCopier::new()
            .find_and_copy(source.path(), dest.path(), &targets())
            .await
            .unwrap();
        assert!(outcomes.is_empty());
    }
}
