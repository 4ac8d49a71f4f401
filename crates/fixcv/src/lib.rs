#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use fixcv_image as image;

#[doc(inline)]
pub use fixcv_imgproc as imgproc;
