use fixcv_image::{Image, ImageError};

/// Subsample an image by integer ratios.
///
/// The ratios are `src.width() / dst.width()` and `src.height() / dst.height()`;
/// output pixel `(x, y)` takes the sample at `(x * ratio_x, y * ratio_y)`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidDimensions`] if `dst` is empty or larger than `src`.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::resize::downsample;
///
/// let src = Image::new(ImageSize { width: 4, height: 2 }, vec![0u8, 1, 2, 3, 4, 5, 6, 7]).unwrap();
/// let mut dst = Image::from_size_val(ImageSize { width: 2, height: 1 }, 0u8).unwrap();
///
/// downsample(&src, &mut dst).unwrap();
/// assert_eq!(dst.as_slice(), &[0, 2]);
/// ```
pub fn downsample<T: Copy>(src: &Image<T>, dst: &mut Image<T>) -> Result<(), ImageError> {
    if dst.width() == 0
        || dst.height() == 0
        || dst.width() > src.width()
        || dst.height() > src.height()
    {
        return Err(ImageError::InvalidDimensions(format!(
            "cannot downsample {} to {}",
            src.size(),
            dst.size()
        )));
    }

    let ratio_x = src.width() / dst.width();
    let ratio_y = src.height() / dst.height();
    let (src_cols, dst_cols) = (src.width(), dst.width());
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .chunks_exact_mut(dst_cols)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let src_row = &src_data[y * ratio_y * src_cols..];
            dst_row
                .iter_mut()
                .enumerate()
                .for_each(|(x, px)| *px = src_row[x * ratio_x]);
        });

    Ok(())
}

/// Enlarge an image by integer ratios, replicating every sample into a block.
///
/// The ratios are `dst.width() / src.width()` and `dst.height() / src.height()`.
/// Pixels of `dst` past the last whole block are left untouched.
///
/// # Errors
///
/// Returns [`ImageError::InvalidDimensions`] if `src` is empty or larger than `dst`.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::resize::upsample;
///
/// let src = Image::new(ImageSize { width: 2, height: 1 }, vec![1u8, 2]).unwrap();
/// let mut dst = Image::from_size_val(ImageSize { width: 4, height: 2 }, 0u8).unwrap();
///
/// upsample(&src, &mut dst).unwrap();
/// assert_eq!(dst.as_slice(), &[1, 1, 2, 2, 1, 1, 2, 2]);
/// ```
pub fn upsample<T: Copy>(src: &Image<T>, dst: &mut Image<T>) -> Result<(), ImageError> {
    if src.width() == 0
        || src.height() == 0
        || src.width() > dst.width()
        || src.height() > dst.height()
    {
        return Err(ImageError::InvalidDimensions(format!(
            "cannot upsample {} to {}",
            src.size(),
            dst.size()
        )));
    }

    let ratio_x = dst.width() / src.width();
    let ratio_y = dst.height() / src.height();
    let dst_cols = dst.width();
    let dst_data = dst.as_slice_mut();

    for (y, src_row) in src.as_slice().chunks_exact(src.width()).enumerate() {
        for dy in 0..ratio_y {
            let dst_row = &mut dst_data[(y * ratio_y + dy) * dst_cols..];
            for (x, &px) in src_row.iter().enumerate() {
                dst_row[x * ratio_x..(x + 1) * ratio_x].fill(px);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixcv_image::ImageSize;

    #[test]
    fn down_after_up_recovers() -> Result<(), ImageError> {
        let src = Image::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            vec![1u16, 2, 3, 4, 5, 6],
        )?;
        let mut big = Image::from_size_val(
            ImageSize {
                width: 9,
                height: 4,
            },
            0u16,
        )?;
        upsample(&src, &mut big)?;
        assert_eq!(big.get(8, 3), Some(&6));
        assert_eq!(big.get(3, 1), Some(&2));

        let mut back = Image::from_size_val(src.size(), 0u16)?;
        downsample(&big, &mut back)?;
        assert_eq!(back, src);
        Ok(())
    }

    #[test]
    fn uneven_ratio_leaves_remainder() -> Result<(), ImageError> {
        let src = Image::from_size_val([2, 2].into(), 5u8)?;
        let mut dst = Image::from_size_val([5, 3].into(), 0u8)?;
        upsample(&src, &mut dst)?;
        assert_eq!(dst.row(0), Some(&[5u8, 5, 5, 5, 0][..]));
        assert_eq!(dst.row(2), Some(&[0u8; 5][..]));

        let mut wrong = Image::from_size_val([3, 3].into(), 0u8)?;
        assert!(downsample(&src, &mut wrong).is_err());
        Ok(())
    }
}
