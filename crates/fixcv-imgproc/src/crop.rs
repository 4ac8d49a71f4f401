use fixcv_image::{Image, ImageError};

fn check_window(
    outer: (usize, usize),
    inner: (usize, usize),
    x: usize,
    y: usize,
) -> Result<(), ImageError> {
    if x + inner.0 > outer.0 || y + inner.1 > outer.1 {
        return Err(ImageError::InvalidDimensions(format!(
            "window {}x{} at ({x}, {y}) exceeds {}x{}",
            inner.0, inner.1, outer.0, outer.1
        )));
    }
    Ok(())
}

/// Crop an image to a specified region.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `dst` - The destination image; its size is the size of the region.
/// * `x` - The x-coordinate of the top-left corner of the region to crop.
/// * `y` - The y-coordinate of the top-left corner of the region to crop.
///
/// # Errors
///
/// Returns [`ImageError::InvalidDimensions`] if the region does not fit in `src`.
///
/// # Examples
///
/// ```rust
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::crop::crop_image;
///
/// let image = Image::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let mut cropped = Image::from_size_val(ImageSize { width: 2, height: 2 }, 0u8).unwrap();
///
/// crop_image(&image, &mut cropped, 1, 1).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_image<T: Copy>(
    src: &Image<T>,
    dst: &mut Image<T>,
    x: usize,
    y: usize,
) -> Result<(), ImageError> {
    check_window((src.cols(), src.rows()), (dst.cols(), dst.rows()), x, y)?;

    let dst_cols = dst.cols();
    if dst_cols == 0 {
        return Ok(());
    }

    dst.as_slice_mut()
        .chunks_exact_mut(dst_cols)
        .enumerate()
        .for_each(|(i, dst_row)| {
            let offset = (y + i) * src.cols() + x;
            dst_row.copy_from_slice(&src.as_slice()[offset..offset + dst_cols]);
        });

    Ok(())
}

/// Paste a smaller image into a larger one with its top-left corner at `(x, y)`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidDimensions`] if `src` does not fit in `dst` at that position.
///
/// # Examples
///
/// ```rust
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::crop::paste_image;
///
/// let patch = Image::from_size_val(ImageSize { width: 2, height: 1 }, 7u8).unwrap();
/// let mut canvas = Image::from_size_val(ImageSize { width: 3, height: 2 }, 0u8).unwrap();
///
/// paste_image(&patch, &mut canvas, 1, 1).unwrap();
///
/// assert_eq!(canvas.as_slice(), &[0, 0, 0, 0, 7, 7]);
/// ```
pub fn paste_image<T: Copy>(
    src: &Image<T>,
    dst: &mut Image<T>,
    x: usize,
    y: usize,
) -> Result<(), ImageError> {
    check_window((dst.cols(), dst.rows()), (src.cols(), src.rows()), x, y)?;

    let (src_cols, dst_cols) = (src.cols(), dst.cols());
    if src_cols == 0 {
        return Ok(());
    }

    let dst_data = dst.as_slice_mut();
    for (i, src_row) in src.as_slice().chunks_exact(src_cols).enumerate() {
        let offset = (y + i) * dst_cols + x;
        dst_data[offset..offset + src_cols].copy_from_slice(src_row);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixcv_image::ImageSize;

    #[test]
    fn crop_paste_roundtrip() -> Result<(), ImageError> {
        let src = Image::new(
            ImageSize {
                width: 5,
                height: 4,
            },
            (0u16..20).collect(),
        )?;
        let mut window = Image::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            0u16,
        )?;
        crop_image(&src, &mut window, 2, 2)?;
        assert_eq!(window.as_slice(), &[12, 13, 14, 17, 18, 19]);

        let mut canvas = Image::from_size_val(src.size(), 0u16)?;
        paste_image(&window, &mut canvas, 2, 2)?;
        assert_eq!(canvas.get(4, 3), Some(&19));
        assert_eq!(canvas.get(1, 3), Some(&0));
        Ok(())
    }

    #[test]
    fn window_outside_fails() -> Result<(), ImageError> {
        let src = Image::from_size_val([4, 4].into(), 0u8)?;
        let mut dst = Image::from_size_val([2, 2].into(), 0u8)?;
        assert!(crop_image(&src, &mut dst, 3, 0).is_err());
        assert!(crop_image(&src, &mut dst, 2, 2).is_ok());

        let mut small = Image::from_size_val([3, 3].into(), 0u8)?;
        assert!(paste_image(&src, &mut small, 0, 0).is_err());
        Ok(())
    }
}
