/// Image files and the desktop services around them
///
/// - Folder listing (scan.rs)
/// - Clipboard copy/paste of bitmaps (clipboard.rs)
/// - Recoverable delete through the system trash (recycle.rs)

pub mod clipboard;
pub mod recycle;
pub mod scan;

use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Decode an image file, guessing the format from its content
pub fn decode(path: &Path) -> Result<DynamicImage, image::ImageError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?.decode()?)
}
