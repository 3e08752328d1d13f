//! Iterative `mkdir -p` that treats "already exists" as success.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::WriteError;

/// Creates `dir` and every missing ancestor, outermost first.
///
/// Safe to call from several threads for overlapping paths: a directory that
/// appears between the existence check and `create_dir` counts as created by
/// someone else. Returns how many directories this call created.
pub fn ensure_dir_all(dir: &Path) -> Result<usize, WriteError> {
    let missing: Vec<&Path> = dir
        .ancestors()
        .filter(|p| !p.as_os_str().is_empty())
        .take_while(|p| !p.is_dir())
        .collect();

    let mut created = 0;
    for path in missing.into_iter().rev() {
        match fs::create_dir(path) {
            Ok(()) => created += 1,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => {}
            Err(source) => {
                return Err(WriteError::CreateDir {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }
    if created > 0 {
        tracing::debug!(dir = %dir.display(), created, "created directories");
    }
    Ok(created)
}
