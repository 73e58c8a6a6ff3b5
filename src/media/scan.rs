use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions recognized as images when none are configured
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Check whether `path` has one of `extensions` (case-insensitive)
pub fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            extensions.iter().any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
        }
        None => false,
    }
}

/// List the image files directly inside `folder`, sorted by file name.
///
/// Subdirectories are not descended into. Entries that can't be read are
/// skipped; only a folder that can't be listed at all is an error.
pub fn list_images(folder: &Path, extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    // Surface a missing/unreadable folder instead of returning nothing
    std::fs::read_dir(folder)?;

    let images = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_image_extension(p, extensions))
        .collect();
    Ok(images)
}
