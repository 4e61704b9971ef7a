//! Source images supplied by the acquisition layer.

mod source_image;

pub use source_image::{ImageToken, SourceError, SourceImage};
