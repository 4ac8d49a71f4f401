//! Binary erosion and dilation over small fixed structuring elements.
//!
//! A sample is on iff it is nonzero. The image is swept once in row-major order
//! while every column keeps a bit register with its last `height` samples and
//! the row keeps two registers summarizing the last `width` columns: whether
//! each column window is full, and whether it holds any on sample. Testing the
//! footprint of an element centered `(width / 2, height / 2)` pixels behind the
//! sweep position is then a single mask comparison, so the cost per pixel does
//! not depend on the element size.
//!
//! Writes only ever land on pixels whose sample has already been pushed into the
//! registers, which makes every operation safe to run in place.

use fixcv_image::{Image, ImageError};

/// The supported structuring elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StructuringElement {
    /// One row of three pixels.
    Horizontal3,
    /// One row of five pixels.
    Horizontal5,
    /// One column of three pixels.
    Vertical3,
    /// One column of five pixels.
    Vertical5,
    /// A 3x3 square.
    #[default]
    Square3,
    /// A 5x5 square.
    Square5,
}

impl StructuringElement {
    /// Width of the element in pixels.
    pub fn width(&self) -> usize {
        match self {
            Self::Horizontal3 | Self::Square3 => 3,
            Self::Horizontal5 | Self::Square5 => 5,
            Self::Vertical3 | Self::Vertical5 => 1,
        }
    }

    /// Height of the element in pixels.
    pub fn height(&self) -> usize {
        match self {
            Self::Vertical3 | Self::Square3 => 3,
            Self::Vertical5 | Self::Square5 => 5,
            Self::Horizontal3 | Self::Horizontal5 => 1,
        }
    }
}

/// How erosion treats pixels whose element reaches past the image border.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BorderMode {
    /// Leave those pixels untouched.
    #[default]
    Skip,
    /// Treat samples outside the image as off.
    Background,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Operation {
    Erode,
    Dilate,
}

// one pass of the sliding register sweep, returns the number of pixels written
fn sweep(
    image: &mut Image<u8>,
    element: StructuringElement,
    operation: Operation,
    border: BorderMode,
    mark: u8,
) -> usize {
    let (cols, rows) = (image.width(), image.height());
    let (ew, eh) = (element.width(), element.height());
    let (rw, rh) = (ew / 2, eh / 2);
    let col_full: u8 = (1 << eh) - 1;
    let row_full: u8 = (1 << ew) - 1;

    let mut col_bits = vec![0u8; cols];
    let mut written = 0;

    let data = image.as_slice_mut();

    for y in 0..rows + rh {
        if y < rows {
            let row = &data[y * cols..(y + 1) * cols];
            for (bits, &px) in col_bits.iter_mut().zip(row) {
                *bits = ((*bits << 1) | u8::from(px != 0)) & col_full;
            }
        } else {
            col_bits.iter_mut().for_each(|bits| *bits = (*bits << 1) & col_full);
        }

        if y < rh {
            continue;
        }
        let cy = y - rh;
        let row_fits = cy >= rh && cy + rh < rows;

        let mut full = 0u8;
        let mut any = 0u8;
        for x in 0..cols + rw {
            let (is_full, is_any) = match col_bits.get(x) {
                Some(&bits) => (bits == col_full, bits != 0),
                None => (false, false),
            };
            full = ((full << 1) | u8::from(is_full)) & row_full;
            any = ((any << 1) | u8::from(is_any)) & row_full;

            if x < rw {
                continue;
            }
            let cx = x - rw;
            let center_on = (col_bits[cx] >> rh) & 1 == 1;

            let write = match operation {
                Operation::Erode => {
                    let fits = row_fits && cx >= rw && cx + rw < cols;
                    center_on && full != row_full && (fits || border == BorderMode::Background)
                }
                Operation::Dilate => !center_on && any != 0,
            };

            if write {
                data[cy * cols + cx] = mark;
                written += 1;
            }
        }
    }

    written
}

/// Erode the on regions of a binary image in place.
///
/// Every on pixel whose element footprint is not entirely on is set to `mark`.
/// Off pixels are never written. Use a `mark` of 0 for a plain erosion or any
/// other value to tag the removed pixels.
///
/// # Arguments
///
/// * `image` - The image to erode, modified in place.
/// * `element` - The structuring element.
/// * `border` - Whether pixels too close to the border are skipped.
/// * `mark` - The value written to eroded pixels.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::morphology::{erode, BorderMode, StructuringElement};
///
/// let mut image = Image::new(ImageSize { width: 5, height: 1 }, vec![0u8, 1, 1, 1, 1]).unwrap();
///
/// erode(&mut image, StructuringElement::Horizontal3, BorderMode::Skip, 0).unwrap();
/// assert_eq!(image.as_slice(), &[0, 0, 1, 1, 1]);
///
/// erode(&mut image, StructuringElement::Horizontal3, BorderMode::Background, 0).unwrap();
/// assert_eq!(image.as_slice(), &[0, 0, 0, 1, 0]);
/// ```
pub fn erode(
    image: &mut Image<u8>,
    element: StructuringElement,
    border: BorderMode,
    mark: u8,
) -> Result<(), ImageError> {
    let written = sweep(image, element, Operation::Erode, border, mark);
    log::debug!("erode {element:?} ({border:?}): {written} pixels");
    Ok(())
}

/// Dilate the on regions of a binary image in place.
///
/// Every off pixel whose element footprint holds at least one on sample is set
/// to `mark`. Samples outside the image count as off.
///
/// # Errors
///
/// Returns [`ImageError::InvalidMarkValue`] if `mark` is zero.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::morphology::{dilate, StructuringElement};
///
/// let mut image = Image::new(ImageSize { width: 3, height: 3 }, vec![0u8, 0, 0, 0, 9, 0, 0, 0, 0]).unwrap();
///
/// dilate(&mut image, StructuringElement::Vertical3, 1).unwrap();
/// assert_eq!(image.as_slice(), &[0, 1, 0, 0, 9, 0, 0, 1, 0]);
/// ```
pub fn dilate(
    image: &mut Image<u8>,
    element: StructuringElement,
    mark: u8,
) -> Result<(), ImageError> {
    if mark == 0 {
        return Err(ImageError::InvalidMarkValue(mark, "dilation mark must be nonzero"));
    }
    let written = sweep(image, element, Operation::Dilate, BorderMode::Background, mark);
    log::debug!("dilate {element:?}: {written} pixels");
    Ok(())
}

/// Morphological opening: `iterations` erosions followed by as many dilations.
///
/// Erosion treats the outside of the image as background here, so the result
/// never holds an on pixel that was off in the input. Small isolated features
/// disappear while larger regions keep their shape. Restored pixels are set to
/// `on_value`.
pub fn open(
    image: &mut Image<u8>,
    element: StructuringElement,
    iterations: usize,
    on_value: u8,
) -> Result<(), ImageError> {
    for _ in 0..iterations {
        erode(image, element, BorderMode::Background, 0)?;
    }
    for _ in 0..iterations {
        dilate(image, element, on_value)?;
    }
    Ok(())
}

/// Morphological closing: `iterations` dilations followed by as many erosions.
///
/// Erosion skips the border here, so no pixel that was on in the input is
/// turned off. Small gaps and holes are filled with `on_value`.
pub fn close(
    image: &mut Image<u8>,
    element: StructuringElement,
    iterations: usize,
    on_value: u8,
) -> Result<(), ImageError> {
    for _ in 0..iterations {
        dilate(image, element, on_value)?;
    }
    for _ in 0..iterations {
        erode(image, element, BorderMode::Skip, 0)?;
    }
    Ok(())
}
