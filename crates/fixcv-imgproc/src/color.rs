//! Integer RGB to YCbCr conversion (ITU-R BT.601, full range as used by JPEG).
//!
//! Luma coefficients are scaled by `10^3` and chroma coefficients by `10^6`;
//! results are truncated.

use fixcv_image::{pack_cbcr, Image, ImageError, ImageSize};

/// Convert one RGB sample to `(y, cb, cr)`.
///
/// # Examples
///
/// ```
/// use fixcv_imgproc::color::ycbcr_from_rgb_pixel;
///
/// assert_eq!(ycbcr_from_rgb_pixel(0, 0, 0), (0, 128, 128));
/// assert_eq!(ycbcr_from_rgb_pixel(255, 255, 255), (255, 128, 128));
/// assert_eq!(ycbcr_from_rgb_pixel(255, 0, 0), (76, 84, 255));
/// ```
pub fn ycbcr_from_rgb_pixel(red: u8, green: u8, blue: u8) -> (u8, u8, u8) {
    let (r, g, b) = (i64::from(red), i64::from(green), i64::from(blue));
    let y = (299 * r + 587 * g + 114 * b) / 1_000;
    let cb = (128_000_000 - 168_736 * r - 331_264 * g + 500_000 * b) / 1_000_000;
    let cr = (128_000_000 + 500_000 * r - 418_688 * g - 81_312 * b) / 1_000_000;
    (y as u8, cb as u8, cr as u8)
}

fn check_sizes(expected: ImageSize, sizes: &[ImageSize]) -> Result<(), ImageError> {
    match sizes.iter().find(|&&size| size != expected) {
        Some(size) => Err(ImageError::InvalidImageSize(
            expected.width,
            expected.height,
            size.width,
            size.height,
        )),
        None => Ok(()),
    }
}

/// Convert planar RGB images to planar YCbCr images.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the six images differ in size.
pub fn ycbcr_from_rgb(
    red: &Image<u8>,
    green: &Image<u8>,
    blue: &Image<u8>,
    luma: &mut Image<u8>,
    cb: &mut Image<u8>,
    cr: &mut Image<u8>,
) -> Result<(), ImageError> {
    check_sizes(
        red.size(),
        &[green.size(), blue.size(), luma.size(), cb.size(), cr.size()],
    )?;

    let rgb = red
        .as_slice()
        .iter()
        .zip(green.as_slice())
        .zip(blue.as_slice());
    let ycbcr = luma
        .as_slice_mut()
        .iter_mut()
        .zip(cb.as_slice_mut().iter_mut())
        .zip(cr.as_slice_mut().iter_mut());

    for (((&r, &g), &b), ((y, cb), cr)) in rgb.zip(ycbcr) {
        (*y, *cb, *cr) = ycbcr_from_rgb_pixel(r, g, b);
    }

    Ok(())
}

/// Convert planar RGB images to a luma image and a packed CbCr image.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the five images differ in size.
///
/// # Examples
///
/// ```
/// use fixcv_image::{unpack_cbcr, Image, ImageSize};
/// use fixcv_imgproc::color::ycbcr_packed_from_rgb;
///
/// let size = ImageSize { width: 1, height: 1 };
/// let red = Image::new(size, vec![0u8]).unwrap();
/// let green = Image::new(size, vec![0u8]).unwrap();
/// let blue = Image::new(size, vec![255u8]).unwrap();
/// let mut luma = Image::from_size_val(size, 0u8).unwrap();
/// let mut cbcr = Image::from_size_val(size, 0u16).unwrap();
///
/// ycbcr_packed_from_rgb(&red, &green, &blue, &mut luma, &mut cbcr).unwrap();
/// assert_eq!(luma.as_slice(), &[29]);
/// assert_eq!(unpack_cbcr(cbcr.as_slice()[0]), (255, 107));
/// ```
pub fn ycbcr_packed_from_rgb(
    red: &Image<u8>,
    green: &Image<u8>,
    blue: &Image<u8>,
    luma: &mut Image<u8>,
    cbcr: &mut Image<u16>,
) -> Result<(), ImageError> {
    check_sizes(
        red.size(),
        &[green.size(), blue.size(), luma.size(), cbcr.size()],
    )?;

    let rgb = red
        .as_slice()
        .iter()
        .zip(green.as_slice())
        .zip(blue.as_slice());
    let out = luma
        .as_slice_mut()
        .iter_mut()
        .zip(cbcr.as_slice_mut().iter_mut());

    for (((&r, &g), &b), (y, packed)) in rgb.zip(out) {
        let (luma, cb, cr) = ycbcr_from_rgb_pixel(r, g, b);
        *y = luma;
        *packed = pack_cbcr(cb, cr);
    }

    Ok(())
}
