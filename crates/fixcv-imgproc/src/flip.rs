use fixcv_image::Image;

/// Flip an image left to right in place.
///
/// # Example
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::flip::flip_horizontal;
///
/// let mut image = Image::new(ImageSize { width: 3, height: 2 }, vec![1u8, 2, 3, 4, 5, 6]).unwrap();
///
/// flip_horizontal(&mut image);
///
/// assert_eq!(image.as_slice(), &[3, 2, 1, 6, 5, 4]);
/// ```
pub fn flip_horizontal<T>(image: &mut Image<T>) {
    let cols = image.cols();
    if cols == 0 {
        return;
    }
    image
        .as_slice_mut()
        .chunks_exact_mut(cols)
        .for_each(|row| row.reverse());
}

/// Flip an image upside down in place.
///
/// # Example
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::flip::flip_vertical;
///
/// let mut image = Image::new(ImageSize { width: 2, height: 3 }, vec![1u16, 2, 3, 4, 5, 6]).unwrap();
///
/// flip_vertical(&mut image);
///
/// assert_eq!(image.as_slice(), &[5, 6, 3, 4, 1, 2]);
/// ```
pub fn flip_vertical<T>(image: &mut Image<T>) {
    let (cols, rows) = (image.cols(), image.rows());
    let data = image.as_slice_mut();
    for y in 0..rows / 2 {
        let (top, bottom) = data.split_at_mut((rows - 1 - y) * cols);
        top[y * cols..(y + 1) * cols].swap_with_slice(&mut bottom[..cols]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixcv_image::{ImageError, ImageSize};

    #[test]
    fn double_flip_is_identity() -> Result<(), ImageError> {
        let original = Image::new(
            ImageSize {
                width: 5,
                height: 4,
            },
            (0u8..20).collect(),
        )?;

        let mut image = original.clone();
        flip_vertical(&mut image);
        assert_eq!(image.row(0), original.row(3));
        flip_vertical(&mut image);
        assert_eq!(image, original);

        flip_horizontal(&mut image);
        assert_eq!(image.get(0, 0), Some(&4));
        flip_horizontal(&mut image);
        assert_eq!(image, original);
        Ok(())
    }
}
