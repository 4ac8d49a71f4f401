/// An error type for the image and image processing crates.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    /// Error when the buffer length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images that must match in size do not.
    #[error("Image size ({0}x{1}) does not match the expected size ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the dimensions of a window, step or target are inconsistent.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Error when a histogram has an unusable number of bins.
    #[error("Invalid number of histogram bins: {0}")]
    InvalidHistogramBins(usize),

    /// Error when a sample does not fit in the histogram.
    #[error("Value {0} does not fit in a histogram with {1} bins")]
    HistogramBinOutOfRange(usize, usize),

    /// Error when statistics are requested from a histogram without counts.
    #[error("Histogram has no counts")]
    EmptyHistogram,

    /// Error when a pixel index is out of bounds.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}x{3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when an angle bin is outside the quantized circle.
    #[error("Angle bin {0} is out of range (0..128)")]
    InvalidAngleBin(usize),

    /// Error when an operation is given a mark value it cannot write.
    #[error("Invalid mark value {0}: {1}")]
    InvalidMarkValue(u8, &'static str),

    /// Error when a sample cannot be cast to the target type.
    #[error("Failed to cast image data")]
    CastError,
}
