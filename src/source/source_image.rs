//! Loaded photos and their identity tokens.

use image::ImageReader;
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Source image errors.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read image file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Image has no pixels ({0}x{1})")]
    Empty(u32, u32),
}

/// Identity of one loaded source image.
///
/// Carried with every detection request so a response for an image that has
/// since been replaced can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageToken(Uuid);

impl ImageToken {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ImageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A photo as acquired, in its native resolution.
#[derive(Debug, Clone)]
pub struct SourceImage {
    token: ImageToken,
    width: u32,
    height: u32,
    bytes: Arc<[u8]>,
}

impl SourceImage {
    /// Wrap encoded image bytes whose dimensions are already known.
    pub fn from_parts(width: u32, height: u32, bytes: impl Into<Arc<[u8]>>) -> Result<Self, SourceError> {
        if width == 0 || height == 0 {
            return Err(SourceError::Empty(width, height));
        }
        Ok(Self {
            token: ImageToken::new(),
            width,
            height,
            bytes: bytes.into(),
        })
    }

    /// Read dimensions from encoded image bytes (PNG, JPEG, ...).
    ///
    /// Only the header is inspected; the pixels are not decoded.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SourceError> {
        let (width, height) = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()?
            .into_dimensions()?;
        Self::from_parts(width, height, bytes)
    }

    /// Load an image file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(bytes)
    }

    pub fn token(&self) -> ImageToken {
        self.token
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encoded image bytes, shared with in-flight detection requests.
    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }
}
