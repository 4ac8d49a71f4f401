use fixcv_image::{Image, ImageError};

use crate::fixed::int_sqrt;

/// How the two gradient components are combined into one magnitude.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeNorm {
    /// `|gx| + |gy|`
    #[default]
    OneNorm,
    /// `sqrt(gx^2 + gy^2)`, using the fixed-point square root.
    TwoNorm,
    /// `gx^2 + gy^2`
    SumSquares,
}

fn check_same_size<A, B>(a: &Image<A>, b: &Image<B>) -> Result<(), ImageError> {
    if a.size() != b.size() {
        return Err(ImageError::InvalidImageSize(
            a.width(),
            a.height(),
            b.width(),
            b.height(),
        ));
    }
    Ok(())
}

/// Compute the Sobel gradient components of an 8-bit image.
///
/// `gx` responds to vertical edges (intensity growing to the right) and `gy` to
/// horizontal edges (intensity growing downwards):
///
/// ```text
///       -1 0 1          -1 -2 -1
/// gx =  -2 0 2    gy =   0  0  0
///       -1 0 1           1  2  1
/// ```
///
/// Instead of evaluating the kernel at every output pixel, each input sample
/// is read once and its weighted contribution added to every interior output
/// it affects. The outermost ring of both outputs is zero.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `gx` - The horizontal gradient, same size as `src`.
/// * `gy` - The vertical gradient, same size as `src`.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::edges::sobel_edges;
///
/// let size = ImageSize { width: 3, height: 3 };
/// let src = Image::new(size, vec![0u8, 0, 10, 0, 0, 10, 0, 0, 10]).unwrap();
/// let mut gx = Image::from_size_val(size, 0i16).unwrap();
/// let mut gy = Image::from_size_val(size, 0i16).unwrap();
///
/// sobel_edges(&src, &mut gx, &mut gy).unwrap();
/// assert_eq!(gx.get(1, 1), Some(&40));
/// assert_eq!(gy.get(1, 1), Some(&0));
/// ```
pub fn sobel_edges(
    src: &Image<u8>,
    gx: &mut Image<i16>,
    gy: &mut Image<i16>,
) -> Result<(), ImageError> {
    check_same_size(src, gx)?;
    check_same_size(src, gy)?;

    let (cols, rows) = (src.width(), src.height());
    let gx_data = gx.as_slice_mut();
    let gy_data = gy.as_slice_mut();
    gx_data.iter_mut().for_each(|v| *v = 0);
    gy_data.iter_mut().for_each(|v| *v = 0);

    if cols < 3 || rows < 3 {
        return Ok(());
    }

    let interior_x = 1..cols - 1;
    let interior_y = 1..rows - 1;

    for y in 0..rows {
        for x in 0..cols {
            let val = i16::from(src.as_slice()[y * cols + x]);
            if val == 0 {
                continue;
            }

            for oy in y.saturating_sub(1)..=y + 1 {
                if !interior_y.contains(&oy) {
                    continue;
                }
                let weight = if oy == y { 2 } else { 1 };
                let base = oy * cols;
                // sample is the right neighbour of x - 1 and the left one of x + 1
                if x >= 1 && interior_x.contains(&(x - 1)) {
                    gx_data[base + x - 1] += weight * val;
                }
                if interior_x.contains(&(x + 1)) {
                    gx_data[base + x + 1] -= weight * val;
                }
            }

            for ox in x.saturating_sub(1)..=x + 1 {
                if !interior_x.contains(&ox) {
                    continue;
                }
                let weight = if ox == x { 2 } else { 1 };
                if y >= 1 && interior_y.contains(&(y - 1)) {
                    gy_data[(y - 1) * cols + ox] += weight * val;
                }
                if interior_y.contains(&(y + 1)) {
                    gy_data[(y + 1) * cols + ox] -= weight * val;
                }
            }
        }
    }

    Ok(())
}

/// Combine gradient components into an 8-bit edge magnitude.
///
/// The combined value is shifted right by `shift` and narrowed to 8 bits by
/// truncation, so values above 255 wrap around. Pick `shift` large enough for
/// the expected range of the chosen norm.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::edges::{edge_magnitude, EdgeNorm};
///
/// let size = ImageSize { width: 2, height: 1 };
/// let gx = Image::new(size, vec![3i16, -30]).unwrap();
/// let gy = Image::new(size, vec![4i16, 40]).unwrap();
/// let mut magnitude = Image::from_size_val(size, 0u8).unwrap();
///
/// edge_magnitude(&gx, &gy, EdgeNorm::TwoNorm, 0, &mut magnitude).unwrap();
/// assert_eq!(magnitude.as_slice(), &[5, 50]);
///
/// edge_magnitude(&gx, &gy, EdgeNorm::OneNorm, 1, &mut magnitude).unwrap();
/// assert_eq!(magnitude.as_slice(), &[3, 35]);
/// ```
pub fn edge_magnitude(
    gx: &Image<i16>,
    gy: &Image<i16>,
    norm: EdgeNorm,
    shift: u32,
    dst: &mut Image<u8>,
) -> Result<(), ImageError> {
    check_same_size(gx, gy)?;
    check_same_size(gx, dst)?;

    gx.as_slice()
        .iter()
        .zip(gy.as_slice())
        .zip(dst.as_slice_mut().iter_mut())
        .for_each(|((&dx, &dy), d)| {
            let (ax, ay) = (u32::from(dx.unsigned_abs()), u32::from(dy.unsigned_abs()));
            let combined = match norm {
                EdgeNorm::OneNorm => ax + ay,
                EdgeNorm::TwoNorm => int_sqrt(ax * ax + ay * ay),
                EdgeNorm::SumSquares => ax * ax + ay * ay,
            };
            *d = combined.checked_shr(shift).unwrap_or(0) as u8;
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixcv_image::ImageSize;

    // direct 3x3 convolution used as a reference
    fn direct_sobel(src: &Image<u8>) -> (Vec<i16>, Vec<i16>) {
        let (w, h) = (src.width(), src.height());
        let mut gx = vec![0i16; w * h];
        let mut gy = vec![0i16; w * h];
        let p = |x: usize, y: usize| i16::from(src.as_slice()[y * w + x]);
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                gx[y * w + x] = (p(x + 1, y - 1) + 2 * p(x + 1, y) + p(x + 1, y + 1))
                    - (p(x - 1, y - 1) + 2 * p(x - 1, y) + p(x - 1, y + 1));
                gy[y * w + x] = (p(x - 1, y + 1) + 2 * p(x, y + 1) + p(x + 1, y + 1))
                    - (p(x - 1, y - 1) + 2 * p(x, y - 1) + p(x + 1, y - 1));
            }
        }
        (gx, gy)
    }

    #[test]
    fn matches_direct_convolution() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 11,
            height: 7,
        };
        let data = (0..size.area() as u32)
            .map(|i| ((i * 97 + 13) % 256) as u8)
            .collect();
        let src = Image::new(size, data)?;
        let mut gx = Image::from_size_val(size, 0i16)?;
        let mut gy = Image::from_size_val(size, 0i16)?;
        sobel_edges(&src, &mut gx, &mut gy)?;

        let (expected_gx, expected_gy) = direct_sobel(&src);
        assert_eq!(gx.as_slice(), expected_gx.as_slice());
        assert_eq!(gy.as_slice(), expected_gy.as_slice());
        Ok(())
    }

    #[test]
    fn border_ring_is_zero() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 6,
            height: 5,
        };
        let src = Image::from_size_val(size, 200u8)?;
        let mut gx = Image::from_size_val(size, 99i16)?;
        let mut gy = Image::from_size_val(size, 99i16)?;
        sobel_edges(&src, &mut gx, &mut gy)?;

        // a flat image has no gradient anywhere
        assert!(gx.as_slice().iter().all(|&v| v == 0));
        assert!(gy.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn horizontal_step() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 6,
        };
        let data = (0..30).map(|i| if i / 5 >= 3 { 255u8 } else { 0 }).collect();
        let src = Image::new(size, data)?;
        let mut gx = Image::from_size_val(size, 0i16)?;
        let mut gy = Image::from_size_val(size, 0i16)?;
        sobel_edges(&src, &mut gx, &mut gy)?;

        assert_eq!(gy.get(2, 2), Some(&1020));
        assert_eq!(gy.get(2, 3), Some(&1020));
        assert_eq!(gy.get(2, 1), Some(&0));
        assert_eq!(gy.get(2, 5), Some(&0));
        assert!(gx.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn magnitude_wraps_without_clamping() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 1,
            height: 1,
        };
        let gx = Image::new(size, vec![300i16])?;
        let gy = Image::new(size, vec![0i16])?;
        let mut dst = Image::from_size_val(size, 0u8)?;

        edge_magnitude(&gx, &gy, EdgeNorm::OneNorm, 0, &mut dst)?;
        assert_eq!(dst.as_slice(), &[44]);

        edge_magnitude(&gx, &gy, EdgeNorm::SumSquares, 10, &mut dst)?;
        assert_eq!(dst.as_slice(), &[87]);
        Ok(())
    }

    #[test]
    fn size_mismatch() -> Result<(), ImageError> {
        let src = Image::from_size_val([4, 4].into(), 0u8)?;
        let mut gx = Image::from_size_val([4, 4].into(), 0i16)?;
        let mut gy = Image::from_size_val([3, 4].into(), 0i16)?;
        assert_eq!(
            sobel_edges(&src, &mut gx, &mut gy),
            Err(ImageError::InvalidImageSize(4, 4, 3, 4))
        );
        Ok(())
    }
}
