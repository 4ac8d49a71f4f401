use fixcv_image::{Image, ImageError};

// slide a 3x3 window over the interior, feeding `op` the window sum and center
fn box_sum3<F>(src: &Image<u8>, dst: &mut Image<u8>, op: F) -> Result<(), ImageError>
where
    F: Fn(u16, u8) -> u8,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let (cols, rows) = (src.width(), src.height());
    if cols < 3 || rows < 3 {
        return Ok(());
    }

    let data = src.as_slice();
    let dst_data = dst.as_slice_mut();
    let column = |x: usize, y: usize| -> u16 {
        u16::from(data[(y - 1) * cols + x])
            + u16::from(data[y * cols + x])
            + u16::from(data[(y + 1) * cols + x])
    };

    for y in 1..rows - 1 {
        let (mut left, mut middle) = (column(0, y), column(1, y));
        for x in 1..cols - 1 {
            let right = column(x + 1, y);
            dst_data[y * cols + x] = op(left + middle + right, data[y * cols + x]);
            left = middle;
            middle = right;
        }
    }

    Ok(())
}

/// Blur an image with a 3x3 box mean.
///
/// Each interior pixel becomes the sum of its 3x3 neighborhood divided by 9.
/// The outer ring of `dst` is left untouched.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::filter::box_blur3;
///
/// let size = ImageSize { width: 3, height: 3 };
/// let src = Image::new(size, vec![0u8, 0, 0, 0, 90, 0, 0, 0, 0]).unwrap();
/// let mut dst = Image::from_size_val(size, 1u8).unwrap();
///
/// box_blur3(&src, &mut dst).unwrap();
/// assert_eq!(dst.as_slice(), &[1, 1, 1, 1, 10, 1, 1, 1, 1]);
/// ```
pub fn box_blur3(src: &Image<u8>, dst: &mut Image<u8>) -> Result<(), ImageError> {
    box_sum3(src, dst, |sum, _| (sum / 9) as u8)
}

/// Blur an image with the mean of the eight neighbors of every pixel.
///
/// Cheaper than [`box_blur3`]: the center is left out so the division becomes
/// a shift by 3. The outer ring of `dst` is left untouched.
pub fn box_blur3_fast(src: &Image<u8>, dst: &mut Image<u8>) -> Result<(), ImageError> {
    box_sum3(src, dst, |sum, center| ((sum - u16::from(center)) >> 3) as u8)
}
