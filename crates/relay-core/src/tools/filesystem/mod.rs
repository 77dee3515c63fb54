//! Filesystem tools for file operations

mod edit;
mod list;
mod path_utils;
mod read;

// Re-export tools
pub use edit::EditFile;
pub use list::ListFiles;
pub use read::ReadFile;

// Re-export path utilities for use by other modules
pub use path_utils::{normalize_path, path_to_display, validate_path, validate_write_path};
