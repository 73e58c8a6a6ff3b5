use std::path::{Path, PathBuf};
use thiserror::Error;

/// A file that could not be moved to the trash
#[derive(Debug, Error)]
#[error("cannot move {} to trash: {reason}", .path.display())]
pub struct TrashError {
    pub path: PathBuf,
    pub reason: String,
}

/// Recoverable delete of a file
pub trait Trash {
    fn remove(&mut self, path: &Path) -> Result<(), TrashError>;
}

/// Moves files to the desktop's trash / recycle bin
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTrash;

impl Trash for SystemTrash {
    fn remove(&mut self, path: &Path) -> Result<(), TrashError> {
        trash::delete(path).map_err(|e| TrashError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Send every existing path to the trash, logging failures.
///
/// Trash errors never stop a delete: the caller drops the entry from the
/// session whatever happened on disk. Returns how many files were moved.
pub fn discard_all(trash: &mut dyn Trash, paths: &[&Path]) -> usize {
    let mut moved = 0;
    for path in paths {
        if !path.exists() {
            continue;
        }
        match trash.remove(path) {
            Ok(()) => {
                log::info!("Moved {} to trash", path.display());
                moved += 1;
            }
            Err(e) => log::warn!("{}", e),
        }
    }
    moved
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingTrash;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_skips_missing_files() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("a.jpg");
        std::fs::write(&present, b"x").unwrap();
        let missing = dir.path().join("a.txt");

        let mut trash = RecordingTrash::default();
        let moved = discard_all(&mut trash, &[&present, &missing]);
        assert_eq!(moved, 1);
        assert_eq!(trash.removed, vec![present.clone()]);
        assert!(!present.exists());
    }

    #[test]
    fn test_trash_error_names_the_file() {
        let err = TrashError {
            path: PathBuf::from("/photos/a.jpg"),
            reason: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot move /photos/a.jpg to trash: permission denied"
        );
    }

    #[test]
    fn test_failures_are_swallowed() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("a.jpg");
        std::fs::write(&present, b"x").unwrap();

        let mut trash = RecordingTrash { fail: true, ..Default::default() };
        assert_eq!(discard_all(&mut trash, &[&present]), 0);
        assert!(present.exists());
    }
}
