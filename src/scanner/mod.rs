pub mod walker;

pub use walker::{scan_directory, DirectoryWalker, WalkDirWalker};
