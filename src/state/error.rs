use std::path::PathBuf;
use thiserror::Error;

use crate::caption::CaptionError;
use crate::media::clipboard::ClipboardError;

/// Everything that can go wrong while driving a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot list folder {path}: {source}")]
    ListFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read caption for {path}: {source}")]
    ReadSidecar {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write caption for {path}: {source}")]
    WriteSidecar {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cannot overwrite {path}: {source}")]
    WriteImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("captioning {path} failed: {source}")]
    Caption {
        path: PathBuf,
        #[source]
        source: CaptionError,
    },
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error("no image is selected")]
    NoImage,
}
