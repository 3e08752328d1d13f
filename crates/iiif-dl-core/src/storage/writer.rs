//! Atomic whole-file writes.

use std::io::Write;
use std::path::Path;

use super::dirs::ensure_dir_all;
use super::TEMP_SUFFIX;
use crate::error::WriteError;

/// Writes `bytes` to `dest` via a temp file in the same directory and a rename.
///
/// Missing parent directories are created. On any error the temp file is
/// removed when it is dropped, leaving `dest` untouched.
pub fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<(), WriteError> {
    let parent = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    ensure_dir_all(parent)?;

    let write_err = |source: std::io::Error| WriteError::Write {
        path: dest.to_path_buf(),
        source,
    };

    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{}.", name))
        .suffix(TEMP_SUFFIX)
        .tempfile_in(parent)
        .map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    tmp.persist(dest).map_err(|e| WriteError::Persist {
        path: dest.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leftovers(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(TEMP_SUFFIX))
            .collect()
    }

    #[test]
    fn writes_file_and_leaves_no_temp() {
        let root = tempfile::tempdir().unwrap();
        let dest = root.path().join("nested/dir/001.jpg");
        write_atomic(&dest, b"jpeg bytes").unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"jpeg bytes");
        assert!(leftovers(dest.parent().unwrap()).is_empty());
    }

    #[test]
    fn replaces_existing_file() {
        let root = tempfile::tempdir().unwrap();
        let dest = root.path().join("a.png");
        std::fs::write(&dest, b"old").unwrap();
        write_atomic(&dest, b"new").unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn persist_failure_cleans_up_temp() {
        let root = tempfile::tempdir().unwrap();
        // A non-empty directory at the destination makes the rename fail.
        let dest = root.path().join("taken");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("inner"), b"x").unwrap();
        let err = write_atomic(&dest, b"data").unwrap_err();
        assert!(matches!(err, WriteError::Persist { .. }));
        assert!(leftovers(root.path()).is_empty());
    }
}
