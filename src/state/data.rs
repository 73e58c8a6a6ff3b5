/// Shared data structures for the session state
///
/// These structs represent the data model that flows between
/// the session and the UI layer.

use image::RgbaImage;
use std::path::PathBuf;

/// A single image of the loaded folder and its caption
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    /// Full path to the image file
    pub path: PathBuf,
    /// Current caption text (may differ from what is on disk until saved)
    pub caption: String,
    /// Pasted bitmap shown instead of the file and written over it on save
    pub replacement: Option<RgbaImage>,
}

impl ImageEntry {
    pub fn new(path: PathBuf, caption: String) -> Self {
        Self {
            path,
            caption,
            replacement: None,
        }
    }

    /// Filename only (e.g., "IMG_0001.jpg")
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// Whether a session has anything to work on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No images: navigation, save and delete do nothing
    Empty,
    /// At least one image and the cursor points at one of them
    Active,
}
