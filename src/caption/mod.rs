/// Caption generation
///
/// A `Captioner` turns a decoded image into a natural-language description.
/// The model itself lives outside this program; the app only talks to it
/// through this trait, so a single instance is built at startup and handed
/// to whoever needs it.

pub mod command;

use image::DynamicImage;
use std::sync::Arc;
use thiserror::Error;

pub use command::CommandCaptioner;

/// Errors raised while producing a caption
#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("failed to start captioner `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("captioner i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode image for captioner: {0}")]
    Encode(#[from] image::ImageError),
    #[error("captioner exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("captioner produced non UTF-8 output")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Something that can describe an image
pub trait Captioner: Send + Sync {
    /// Produce a caption for one decoded image
    fn caption(&self, image: &DynamicImage) -> Result<String, CaptionError>;
}

/// Captioner used when no model is configured.
///
/// Every image starts with an empty caption, which leaves the tool usable
/// as a plain sidecar editor.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlankCaptioner;

impl Captioner for BlankCaptioner {
    fn caption(&self, _image: &DynamicImage) -> Result<String, CaptionError> {
        Ok(String::new())
    }
}

/// Build the captioner described by the settings
pub fn from_command(command: Option<&[String]>) -> Arc<dyn Captioner> {
    match command.and_then(CommandCaptioner::from_argv) {
        Some(captioner) => {
            log::info!("Using captioner command: {}", captioner.describe());
            Arc::new(captioner)
        }
        None => {
            log::warn!("No captioner command configured, new images start with empty captions");
            Arc::new(BlankCaptioner)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_captioner_returns_empty() {
        let img = DynamicImage::new_rgb8(4, 4);
        assert_eq!(BlankCaptioner.caption(&img).unwrap(), "");
    }

    #[test]
    fn test_from_command_falls_back_to_blank() {
        let img = DynamicImage::new_rgb8(2, 2);
        let captioner = from_command(None);
        assert_eq!(captioner.caption(&img).unwrap(), "");

        let empty: Vec<String> = Vec::new();
        let captioner = from_command(Some(&empty));
        assert_eq!(captioner.caption(&img).unwrap(), "");
    }
}
