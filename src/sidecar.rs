//! Sidecar caption files
//!
//! Every image `name.ext` may have a `name.txt` next to it holding its
//! caption as plain UTF-8. No escaping, no structure, no trailing newline.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension used for caption files
pub const SIDECAR_EXTENSION: &str = "txt";

/// Path of the caption file for an image (only the last extension is replaced)
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension(SIDECAR_EXTENSION)
}

/// Read the caption stored next to `image_path`, `None` if there is none
pub fn read(image_path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(sidecar_path(image_path)) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write `caption` next to `image_path`, replacing any previous content
pub fn write(image_path: &Path, caption: &str) -> io::Result<PathBuf> {
    let path = sidecar_path(image_path);
    fs::write(&path, caption)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sidecar_path_replaces_last_extension() {
        assert_eq!(sidecar_path(Path::new("/p/a.jpg")), PathBuf::from("/p/a.txt"));
        assert_eq!(sidecar_path(Path::new("/p/a.b.png")), PathBuf::from("/p/a.b.txt"));
    }

    #[test]
    fn test_missing_sidecar_reads_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read(&dir.path().join("x.jpg")).unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let img = dir.path().join("x.jpg");
        let written = write(&img, "two\nlines").unwrap();
        assert_eq!(written, dir.path().join("x.txt"));
        assert_eq!(read(&img).unwrap().as_deref(), Some("two\nlines"));

        write(&img, "short").unwrap();
        assert_eq!(fs::read_to_string(written).unwrap(), "short");
    }
}
