pub mod search;
pub mod walker;

pub use search::{find_by_name, find_in_roots, MaxDepth};
pub use walker::{list_subdirectories, relative_posix_path, FileEntry, TreeWalker, WalkOutcome};
