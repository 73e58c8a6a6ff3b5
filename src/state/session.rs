use image::{DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};

use super::data::{ImageEntry, Phase};
use super::error::SessionError;
use super::settings::PersistPolicy;
use crate::caption::Captioner;
use crate::media::{self, recycle, recycle::Trash};
use crate::sidecar;

/// The Session holds one loaded folder: its images in order, a caption for
/// each, and the cursor of the image being reviewed.
///
/// It exclusively owns that state; the UI only reads it through accessors
/// and changes it through the methods below.
#[derive(Debug, Clone, Default)]
pub struct Session {
    folder: Option<PathBuf>,
    entries: Vec<ImageEntry>,
    cursor: usize,
}

impl Session {
    /// An empty session (no folder loaded)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session from already captioned entries, cursor on the first
    pub fn from_entries(folder: PathBuf, entries: Vec<ImageEntry>) -> Self {
        Session {
            folder: Some(folder),
            entries,
            cursor: 0,
        }
    }

    /// Load every image of `folder` with its caption.
    ///
    /// Captions come from the sidecar file when there is one, otherwise from
    /// `captioner`. With `PersistPolicy::Immediate` a generated caption is
    /// written to its sidecar right away. `progress` is called with
    /// `(done, total)` after each image.
    pub fn load_folder(
        folder: &Path,
        extensions: &[String],
        captioner: &dyn Captioner,
        policy: PersistPolicy,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<Self, SessionError> {
        let files = media::scan::list_images(folder, extensions).map_err(|source| {
            SessionError::ListFolder {
                path: folder.to_path_buf(),
                source,
            }
        })?;

        let total = files.len();
        log::info!("Loading {} images from {}", total, folder.display());

        let mut entries = Vec::with_capacity(total);
        let mut generated = 0;
        for (i, path) in files.into_iter().enumerate() {
            let (caption, was_generated) = load_caption(&path, captioner, policy)?;
            if was_generated {
                generated += 1;
            }
            entries.push(ImageEntry::new(path, caption));
            progress(i + 1, total);
        }

        log::info!(
            "Loaded {} images ({} captioned by the model)",
            total,
            generated
        );
        Ok(Self::from_entries(folder.to_path_buf(), entries))
    }

    /// Folder this session was loaded from
    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn phase(&self) -> Phase {
        if self.entries.is_empty() {
            Phase::Empty
        } else {
            Phase::Active
        }
    }

    /// Index of the current image (0 when empty)
    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&ImageEntry> {
        self.entries.get(self.cursor)
    }

    pub fn current_caption(&self) -> Option<&str> {
        self.current().map(|e| e.caption.as_str())
    }

    pub fn current_replacement(&self) -> Option<&RgbaImage> {
        self.current().and_then(|e| e.replacement.as_ref())
    }

    /// "3 / 10" style position, "0 / 0" when empty
    pub fn position_label(&self) -> String {
        if self.entries.is_empty() {
            "0 / 0".to_string()
        } else {
            format!("{} / {}", self.cursor + 1, self.entries.len())
        }
    }

    /// Store `text` as the caption of the current image
    pub fn commit_current_caption(&mut self, text: &str) {
        if let Some(entry) = self.entries.get_mut(self.cursor) {
            entry.caption = text.to_string();
        }
    }

    /// Move to the next image. Returns false at the last one.
    pub fn next(&mut self) -> bool {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous image. Returns false at the first one.
    pub fn previous(&mut self) -> bool {
        if self.cursor > 0 && !self.entries.is_empty() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Write every caption to its sidecar and every pasted image over its
    /// original file. Stops at the first failure.
    /// Returns the number of captions written.
    pub fn save_all(&mut self) -> Result<usize, SessionError> {
        for entry in &mut self.entries {
            sidecar::write(&entry.path, &entry.caption).map_err(|source| {
                SessionError::WriteSidecar {
                    path: entry.path.clone(),
                    source,
                }
            })?;

            if let Some(replacement) = &entry.replacement {
                write_replacement(&entry.path, replacement)?;
                log::info!("Overwrote {} with pasted image", entry.path.display());
            }
            entry.replacement = None;
        }

        log::info!("Saved {} captions", self.entries.len());
        Ok(self.entries.len())
    }

    /// Send the current image and its caption file to the trash and drop it
    /// from the session.
    ///
    /// Trash failures are logged and ignored. The cursor stays at the same
    /// index, clamped to the new last image; removing the last image leaves
    /// an empty session with the cursor at 0.
    pub fn delete_current(&mut self, trash: &mut dyn Trash) -> Option<PathBuf> {
        if self.entries.is_empty() {
            return None;
        }

        let entry = self.entries.remove(self.cursor);
        let caption_file = sidecar::sidecar_path(&entry.path);
        recycle::discard_all(trash, &[entry.path.as_path(), caption_file.as_path()]);

        self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
        log::info!(
            "Deleted {} ({} images left)",
            entry.path.display(),
            self.entries.len()
        );
        Some(entry.path)
    }

    /// Show `image` instead of the current file until it is saved over it
    pub fn paste_replacement(&mut self, image: RgbaImage) -> Result<(), SessionError> {
        let entry = self
            .entries
            .get_mut(self.cursor)
            .ok_or(SessionError::NoImage)?;
        entry.replacement = Some(image);
        Ok(())
    }

    /// The image as the user sees it: the pasted replacement if any,
    /// otherwise the decoded file
    pub fn current_image(&self) -> Result<DynamicImage, SessionError> {
        let entry = self.current().ok_or(SessionError::NoImage)?;
        match &entry.replacement {
            Some(replacement) => Ok(DynamicImage::ImageRgba8(replacement.clone())),
            None => media::decode(&entry.path).map_err(|source| SessionError::Decode {
                path: entry.path.clone(),
                source,
            }),
        }
    }
}

/// Caption for one image: its sidecar if present, else a fresh one from the
/// captioner. The flag tells whether the captioner was used.
fn load_caption(
    path: &Path,
    captioner: &dyn Captioner,
    policy: PersistPolicy,
) -> Result<(String, bool), SessionError> {
    let existing = sidecar::read(path).map_err(|source| SessionError::ReadSidecar {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(caption) = existing {
        return Ok((caption, false));
    }

    let image = media::decode(path).map_err(|source| SessionError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let caption = captioner
        .caption(&image)
        .map_err(|source| SessionError::Caption {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("Captioned {}: {}", path.display(), caption);

    if policy == PersistPolicy::Immediate {
        sidecar::write(path, &caption).map_err(|source| SessionError::WriteSidecar {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok((caption, true))
}

/// Encode `image` into the format implied by `path`'s extension.
/// Formats without alpha (JPEG, BMP) get the RGB channels only.
fn write_replacement(path: &Path, image: &RgbaImage) -> Result<(), SessionError> {
    let to_error = |source| SessionError::WriteImage {
        path: path.to_path_buf(),
        source,
    };
    let format = image::ImageFormat::from_path(path).map_err(to_error)?;
    let dynamic = DynamicImage::ImageRgba8(image.clone());
    let result = match format {
        image::ImageFormat::Jpeg | image::ImageFormat::Bmp => {
            dynamic.to_rgb8().save_with_format(path, format)
        }
        _ => dynamic.save_with_format(path, format),
    };
    result.map_err(to_error)
}
