#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
/// color space conversions module.
pub mod color;

/// image cropping and pasting module.
pub mod crop;

/// utilities to draw on images.
pub mod draw;

/// gradient and edge magnitude module.
pub mod edges;

/// small fixed-window smoothing filters.
pub mod filter;

/// fixed-point arithmetic and trigonometry tables.
pub mod fixed;

/// image flipping module.
pub mod flip;

/// gradient-restricted Hough line transform.
pub mod hough;

/// compute image histogram module.
pub mod histogram;

/// summed-area tables and box features.
pub mod integral;

/// binary morphology with sliding bit registers.
pub mod morphology;

/// integer-step resampling module.
pub mod resize;

/// lookup-table segmentation module.
pub mod segmentation;

/// operations over image sequences.
pub mod sequence;
