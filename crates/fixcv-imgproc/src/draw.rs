use fixcv_image::{Image, ImageError};

use crate::hough::reconstruct_line;

const DDA_ONE: i64 = 1 << 10;

#[inline]
fn set_pixel<T: Copy>(img: &mut Image<T>, x: i64, y: i64, value: T) {
    if x >= 0 && y >= 0 {
        if let Some(px) = img.get_mut(x as usize, y as usize) {
            *px = value;
        }
    }
}

/// Draws a line on an image inplace using an integer digital differential analyzer.
///
/// The line is stepped one pixel at a time along its major axis while a 10-bit
/// fractional accumulator tracks the minor axis. Points outside the image are
/// skipped, so the endpoints may lie anywhere.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `value` - The sample value written to the line pixels.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::draw::draw_line;
///
/// let mut img = Image::from_size_val(ImageSize { width: 4, height: 3 }, 0u8).unwrap();
/// draw_line(&mut img, (0, 0), (3, 2), 1);
///
/// assert_eq!(img.as_slice(), &[1, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 1]);
/// ```
pub fn draw_line<T: Copy>(img: &mut Image<T>, p0: (i64, i64), p1: (i64, i64), value: T) {
    let (mut x, mut y) = p0;
    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
    let steps = dx.abs().max(dy.abs());

    if steps == 0 {
        set_pixel(img, x, y, value);
        return;
    }

    let x_major = dx.abs() >= dy.abs();
    let (major_step, minor_inc) = if x_major {
        (dx.signum(), dy * DDA_ONE / dx.abs())
    } else {
        (dy.signum(), dx * DDA_ONE / dy.abs())
    };

    let mut accum = DDA_ONE / 2;
    for _ in 0..=steps {
        set_pixel(img, x, y, value);

        let minor = if x_major { &mut y } else { &mut x };
        accum += minor_inc;
        if accum < 0 {
            accum += DDA_ONE;
            *minor -= 1;
        } else if accum >= DDA_ONE {
            accum -= DDA_ONE;
            *minor += 1;
        }

        if x_major {
            x += major_step;
        } else {
            y += major_step;
        }
    }
}

/// Draws the line of a Hough accumulator cell across the image.
///
/// See [`reconstruct_line`] for the meaning of `origin`, `angle_bin` and `radius_bin`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidAngleBin`] if `angle_bin` is 128 or more.
pub fn draw_hough_line<T: Copy>(
    img: &mut Image<T>,
    origin: (i64, i64),
    angle_bin: usize,
    radius_bin: usize,
    value: T,
) -> Result<(), ImageError> {
    let (p0, p1) = reconstruct_line(img.size(), origin, angle_bin, radius_bin)?;
    draw_line(img, p0, p1, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixcv_image::ImageSize;

    fn blank(width: usize, height: usize) -> Result<Image<u8>, ImageError> {
        Image::from_size_val(ImageSize { width, height }, 0)
    }

    fn on_pixels(img: &Image<u8>) -> Vec<(usize, usize)> {
        img.as_slice()
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0)
            .map(|(i, _)| (i % img.width(), i / img.width()))
            .collect()
    }

    #[test]
    fn axis_aligned_and_diagonal() -> Result<(), ImageError> {
        let mut img = blank(5, 5)?;
        draw_line(&mut img, (4, 1), (0, 1), 255);
        assert_eq!(img.row(1), Some(&[255u8; 5][..]));

        let mut img = blank(5, 5)?;
        draw_line(&mut img, (2, 4), (2, 0), 7);
        assert_eq!(on_pixels(&img), vec![(2, 0), (2, 1), (2, 2), (2, 3), (2, 4)]);

        let mut img = blank(5, 5)?;
        draw_line(&mut img, (4, 0), (0, 4), 1);
        assert_eq!(on_pixels(&img), vec![(4, 0), (3, 1), (2, 2), (1, 3), (0, 4)]);
        Ok(())
    }

    #[test]
    fn steep_line_hits_both_ends() -> Result<(), ImageError> {
        let mut img = blank(8, 8)?;
        draw_line(&mut img, (1, 0), (3, 7), 1);
        let pixels = on_pixels(&img);
        assert_eq!(pixels.len(), 8);
        assert_eq!(pixels.first(), Some(&(1, 0)));
        assert_eq!(pixels.last(), Some(&(3, 7)));
        // one pixel per row
        assert!(pixels.windows(2).all(|w| w[1].1 == w[0].1 + 1));
        Ok(())
    }

    #[test]
    fn clipped_and_single_point() -> Result<(), ImageError> {
        let mut img = blank(4, 4)?;
        draw_line(&mut img, (-10, 2), (10, 2), 3);
        assert_eq!(img.row(2), Some(&[3u8; 4][..]));

        let mut img = blank(4, 4)?;
        draw_line(&mut img, (1, 1), (1, 1), 9);
        assert_eq!(on_pixels(&img), vec![(1, 1)]);

        draw_line(&mut img, (9, 9), (9, 9), 9);
        assert_eq!(on_pixels(&img), vec![(1, 1)]);
        Ok(())
    }

    #[test]
    fn hough_line_cardinal() -> Result<(), ImageError> {
        let mut img = blank(16, 12)?;
        draw_hough_line(&mut img, (8, 6), 96, 1, 1)?;
        assert_eq!(img.row(2), Some(&[1u8; 16][..]));
        assert_eq!(on_pixels(&img).len(), 16);

        assert!(draw_hough_line(&mut img, (8, 6), 200, 1, 1).is_err());
        Ok(())
    }
}
