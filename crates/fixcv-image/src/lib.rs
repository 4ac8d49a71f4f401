#![deny(missing_docs)]
//! Raster buffer types for fixed-point image processing.

/// Error types for the image module.
pub mod error;

/// raster buffer representation.
pub mod image;

/// packed two-channel (CbCr) samples.
pub mod packed;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
pub use crate::packed::{pack_cbcr, unpack_cbcr};
