//! Error types shared by the compositor, the image loader and session config

use std::fmt;
use std::path::PathBuf;

use crate::clip::Rect;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// The image decoder could not produce an `ImageSource`
    Load { path: PathBuf, reason: String },
    /// A sprite's source rectangle reaches outside its image
    SourceOutOfBounds {
        rect: Rect,
        image_width: u32,
        image_height: u32,
    },
    /// Raw pixel data whose length does not match `width * height`
    InvalidDimensions { width: u32, height: u32, len: usize },
    /// A buffer or image too large to address with `i32` coordinates
    TooLarge { width: u32, height: u32 },
    /// Unreadable or malformed session config
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { path, reason } => {
                write!(f, "failed to load image {}: {}", path.display(), reason)
            },
            Self::SourceOutOfBounds {
                rect,
                image_width,
                image_height,
            } => write!(
                f,
                "source rect {}x{} at ({}, {}) exceeds {}x{} image",
                rect.width, rect.height, rect.x, rect.y, image_width, image_height
            ),
            Self::InvalidDimensions { width, height, len } => write!(
                f,
                "{} pixels cannot fill a {}x{} image",
                len, width, height
            ),
            Self::TooLarge { width, height } => {
                write!(f, "{}x{} exceeds the addressable pixel count", width, height)
            },
            Self::Config(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
