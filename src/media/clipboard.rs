use arboard::{Clipboard, Error as ArboardError, ImageData};
use image::RgbaImage;
use std::borrow::Cow;
use thiserror::Error;

/// Clipboard failures (an empty clipboard is not one of them)
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard access is unavailable: {0}")]
    Unavailable(String),
    #[error("failed to copy image: {0}")]
    Copy(String),
    #[error("failed to read clipboard image: {0}")]
    Paste(String),
    #[error("clipboard image had unexpected dimensions {width}x{height}")]
    Dimensions { width: u32, height: u32 },
}

/// Access to a clipboard that can hold a bitmap
pub trait ImageClipboard {
    /// Put `image` on the clipboard
    fn copy_image(&mut self, image: &RgbaImage) -> Result<(), ClipboardError>;
    /// Take the clipboard's image, `None` when it holds no image
    fn paste_image(&mut self) -> Result<Option<RgbaImage>, ClipboardError>;
}

/// The desktop clipboard, opened lazily on first use
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl SystemClipboard {
    fn handle(&mut self) -> Result<&mut Clipboard, ClipboardError> {
        if self.inner.is_none() {
            let clipboard =
                Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("not opened".to_string()))
    }
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("open", &self.inner.is_some())
            .finish()
    }
}

impl ImageClipboard for SystemClipboard {
    fn copy_image(&mut self, image: &RgbaImage) -> Result<(), ClipboardError> {
        let data = ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: Cow::Borrowed(image.as_raw()),
        };
        self.handle()?
            .set_image(data)
            .map_err(|e| ClipboardError::Copy(e.to_string()))
    }

    fn paste_image(&mut self) -> Result<Option<RgbaImage>, ClipboardError> {
        match self.handle()?.get_image() {
            Ok(data) => {
                let (width, height) = (data.width as u32, data.height as u32);
                RgbaImage::from_raw(width, height, data.bytes.into_owned())
                    .map(Some)
                    .ok_or(ClipboardError::Dimensions { width, height })
            }
            Err(ArboardError::ContentNotAvailable) => Ok(None),
            Err(e) => Err(ClipboardError::Paste(e.to_string())),
        }
    }
}
