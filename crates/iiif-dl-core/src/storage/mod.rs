//! Local persistence of downloaded images.
//!
//! Directories are created ancestor by ancestor, tolerating concurrent
//! creators. Files are written to a temp sibling (`.part`) and renamed into
//! place, so a reader never sees a half-written image.

mod dirs;
mod writer;

pub use dirs::ensure_dir_all;
pub use writer::write_atomic;

/// Temporary file suffix used before the atomic rename.
pub const TEMP_SUFFIX: &str = ".part";
