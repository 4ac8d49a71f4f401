use fixcv_image::{Image, ImageError};
use num_traits::PrimInt;

/// Fold a new frame into a running binomial average.
///
/// Every sample of `acc` becomes `(acc + frame) / 2`, rounded down and computed
/// without overflow. Repeated over a sequence, the latest frame weighs 1/2,
/// the one before 1/4, then 1/8 and so on.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::sequence::binomial_average;
///
/// let size = ImageSize { width: 2, height: 1 };
/// let mut acc = Image::new(size, vec![255u8, 0]).unwrap();
/// let frame = Image::new(size, vec![255u8, 9]).unwrap();
///
/// binomial_average(&mut acc, &frame).unwrap();
/// assert_eq!(acc.as_slice(), &[255, 4]);
/// ```
pub fn binomial_average<T: PrimInt>(acc: &mut Image<T>, frame: &Image<T>) -> Result<(), ImageError> {
    if acc.size() != frame.size() {
        return Err(ImageError::InvalidImageSize(
            acc.width(),
            acc.height(),
            frame.width(),
            frame.height(),
        ));
    }

    acc.as_slice_mut()
        .iter_mut()
        .zip(frame.as_slice())
        .for_each(|(a, &f)| *a = (*a >> 1) + (f >> 1) + (*a & f & T::one()));

    Ok(())
}
