pub mod file_copier;
pub mod report;

pub use file_copier::{CopyOutcome, FileCopier, ProgressCallback};
pub use report::ShortlistReport;
