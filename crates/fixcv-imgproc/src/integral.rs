use fixcv_image::{Image, ImageError, ImageSize};

/// The rectangular box features.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoxFeature {
    /// Difference between a box and the box directly below it; responds to
    /// horizontal edges.
    #[default]
    UpDown,
    /// Difference between a box and the box directly right of it; responds to
    /// vertical edges.
    LeftRight,
    /// Difference between the two diagonals of a 2x2 checkerboard of boxes;
    /// responds to corners and diagonal edges.
    Diagonal,
}

/// Box size and scan step of a box feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxFeatureParams {
    /// Width of a single box in pixels.
    pub box_width: usize,
    /// Height of a single box in pixels.
    pub box_height: usize,
    /// Horizontal distance between successive windows.
    pub col_step: usize,
    /// Vertical distance between successive windows.
    pub row_step: usize,
}

impl Default for BoxFeatureParams {
    fn default() -> Self {
        Self {
            box_width: 8,
            box_height: 8,
            col_step: 1,
            row_step: 1,
        }
    }
}

/// How feature values are scaled down to 8 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureShift {
    /// Shift every value right by a fixed amount.
    Fixed(u32),
    /// Derive the shift from the largest feature value: its bit length minus
    /// `offset`. An offset of 8 maps the largest value into `128..=255`.
    Auto {
        /// The largest feature value, as returned by [`box_feature`].
        max_value: u32,
        /// Number of significant bits kept.
        offset: u32,
    },
}

impl FeatureShift {
    /// The right shift this setting resolves to.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixcv_imgproc::integral::FeatureShift;
    ///
    /// assert_eq!(FeatureShift::Fixed(3).resolve(), 3);
    /// assert_eq!(FeatureShift::Auto { max_value: 1000, offset: 8 }.resolve(), 2);
    /// assert_eq!(FeatureShift::Auto { max_value: 100, offset: 8 }.resolve(), 0);
    /// ```
    pub fn resolve(&self) -> u32 {
        match *self {
            FeatureShift::Fixed(shift) => shift,
            FeatureShift::Auto { max_value, offset } => {
                let bit_length = u32::BITS - max_value.leading_zeros();
                bit_length.saturating_sub(offset)
            }
        }
    }
}

/// Compute the summed-area table of an 8-bit image.
///
/// Each output cell holds the sum of every input sample in the rectangle from
/// the origin to that cell, inclusive. Sums wrap modulo `2^32`; rectangle sums
/// recovered with [`rect_sum`] are exact as long as the rectangle's true sum
/// fits in 32 bits.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::integral::integral_image;
///
/// let size = ImageSize { width: 2, height: 2 };
/// let src = Image::new(size, vec![1u8, 2, 3, 4]).unwrap();
/// let mut sat = Image::from_size_val(size, 0u32).unwrap();
///
/// integral_image(&src, &mut sat).unwrap();
/// assert_eq!(sat.as_slice(), &[1, 3, 4, 10]);
/// ```
pub fn integral_image(src: &Image<u8>, dst: &mut Image<u32>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let cols = src.width();
    let dst_data = dst.as_slice_mut();
    for (y, src_row) in src.as_slice().chunks_exact(cols.max(1)).enumerate() {
        let mut accum = 0u32;
        for (x, &px) in src_row.iter().enumerate() {
            accum = accum.wrapping_add(u32::from(px));
            let above = if y > 0 { dst_data[(y - 1) * cols + x] } else { 0 };
            dst_data[y * cols + x] = accum.wrapping_add(above);
        }
    }

    Ok(())
}

// summed-area value with an implicit zero row and column before the origin
#[inline]
fn sat_at(sat: &[u32], cols: usize, x: usize, y: usize) -> u32 {
    if x == 0 || y == 0 {
        0
    } else {
        sat[(y - 1) * cols + (x - 1)]
    }
}

// sum over [x, x + w) x [y, y + h), bounds already validated
#[inline]
fn box_sum(sat: &[u32], cols: usize, x: usize, y: usize, w: usize, h: usize) -> u32 {
    sat_at(sat, cols, x + w, y + h)
        .wrapping_sub(sat_at(sat, cols, x, y + h))
        .wrapping_sub(sat_at(sat, cols, x + w, y))
        .wrapping_add(sat_at(sat, cols, x, y))
}

/// Sum of the samples in the `width` x `height` rectangle whose top-left corner is `(x, y)`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidDimensions`] if the rectangle is empty or does
/// not fit inside the table.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::integral::{integral_image, rect_sum};
///
/// let size = ImageSize { width: 3, height: 2 };
/// let src = Image::new(size, vec![1u8, 2, 3, 4, 5, 6]).unwrap();
/// let mut sat = Image::from_size_val(size, 0u32).unwrap();
/// integral_image(&src, &mut sat).unwrap();
///
/// assert_eq!(rect_sum(&sat, 1, 0, 2, 2).unwrap(), 2 + 3 + 5 + 6);
/// assert_eq!(rect_sum(&sat, 2, 1, 1, 1).unwrap(), 6);
/// ```
pub fn rect_sum(
    sat: &Image<u32>,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> Result<u32, ImageError> {
    if width == 0 || height == 0 || x + width > sat.width() || y + height > sat.height() {
        return Err(ImageError::InvalidDimensions(format!(
            "rectangle {width}x{height} at ({x}, {y}) does not fit in {}",
            sat.size()
        )));
    }
    Ok(box_sum(sat.as_slice(), sat.width(), x, y, width, height))
}

/// Size of the feature map produced by [`box_feature`].
///
/// The window of a feature covers two boxes side by side (up/down, left/right)
/// or a 2x2 block of boxes (diagonal). One output value is produced for every
/// window position on the step grid that lies entirely inside the table.
///
/// # Errors
///
/// Returns [`ImageError::InvalidDimensions`] if a box or step is zero or the
/// window is larger than the table.
///
/// # Examples
///
/// ```
/// use fixcv_image::ImageSize;
/// use fixcv_imgproc::integral::{box_feature_size, BoxFeature, BoxFeatureParams};
///
/// let params = BoxFeatureParams { box_width: 4, box_height: 2, col_step: 2, row_step: 1 };
/// let size = box_feature_size(ImageSize { width: 20, height: 10 }, BoxFeature::UpDown, &params).unwrap();
///
/// assert_eq!(size, ImageSize { width: 9, height: 7 });
/// ```
pub fn box_feature_size(
    size: ImageSize,
    feature: BoxFeature,
    params: &BoxFeatureParams,
) -> Result<ImageSize, ImageError> {
    let BoxFeatureParams {
        box_width,
        box_height,
        col_step,
        row_step,
    } = *params;

    if box_width == 0 || box_height == 0 || col_step == 0 || row_step == 0 {
        return Err(ImageError::InvalidDimensions(format!(
            "box feature parameters must be nonzero: {params:?}"
        )));
    }

    let (window_width, window_height) = match feature {
        BoxFeature::UpDown => (box_width, 2 * box_height),
        BoxFeature::LeftRight => (2 * box_width, box_height),
        BoxFeature::Diagonal => (2 * box_width, 2 * box_height),
    };

    if window_width > size.width || window_height > size.height {
        return Err(ImageError::InvalidDimensions(format!(
            "{feature:?} window {window_width}x{window_height} does not fit in {size}"
        )));
    }

    Ok(ImageSize {
        width: (size.width - window_width) / col_step + 1,
        height: (size.height - window_height) / row_step + 1,
    })
}

/// Compute a box feature map from a summed-area table.
///
/// Every feature value is an absolute difference of box sums, each taken in
/// constant time from four table entries. `dst` must have the size reported by
/// [`box_feature_size`]; output `(i, j)` corresponds to the window whose
/// top-left corner is `(i * col_step, j * row_step)`.
///
/// # Returns
///
/// The largest feature value, for use with [`FeatureShift::Auto`].
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::integral::{box_feature, integral_image, BoxFeature, BoxFeatureParams};
///
/// let size = ImageSize { width: 2, height: 2 };
/// let src = Image::new(size, vec![9u8, 9, 1, 1]).unwrap();
/// let mut sat = Image::from_size_val(size, 0u32).unwrap();
/// integral_image(&src, &mut sat).unwrap();
///
/// let params = BoxFeatureParams { box_width: 2, box_height: 1, col_step: 1, row_step: 1 };
/// let mut features = Image::from_size_val(ImageSize { width: 1, height: 1 }, 0u32).unwrap();
/// let max = box_feature(&sat, BoxFeature::UpDown, &params, &mut features).unwrap();
///
/// assert_eq!(features.as_slice(), &[16]);
/// assert_eq!(max, 16);
/// ```
pub fn box_feature(
    sat: &Image<u32>,
    feature: BoxFeature,
    params: &BoxFeatureParams,
    dst: &mut Image<u32>,
) -> Result<u32, ImageError> {
    let out_size = box_feature_size(sat.size(), feature, params)?;
    if dst.size() != out_size {
        return Err(ImageError::InvalidImageSize(
            out_size.width,
            out_size.height,
            dst.width(),
            dst.height(),
        ));
    }

    let (bw, bh) = (params.box_width, params.box_height);
    let cols = sat.width();
    let table = sat.as_slice();
    let rect = |x: usize, y: usize| box_sum(table, cols, x, y, bw, bh);

    let mut max_value = 0u32;
    for (j, dst_row) in dst.as_slice_mut().chunks_exact_mut(out_size.width).enumerate() {
        let y = j * params.row_step;
        for (i, out) in dst_row.iter_mut().enumerate() {
            let x = i * params.col_step;
            let value = match feature {
                BoxFeature::UpDown => rect(x, y).abs_diff(rect(x, y + bh)),
                BoxFeature::LeftRight => rect(x, y).abs_diff(rect(x + bw, y)),
                BoxFeature::Diagonal => {
                    let black = rect(x, y).wrapping_add(rect(x + bw, y + bh));
                    let white = rect(x + bw, y).wrapping_add(rect(x, y + bh));
                    white.abs_diff(black)
                }
            };
            *out = value;
            max_value = max_value.max(value);
        }
    }

    log::debug!("{feature:?} feature {out_size}: max value {max_value}");

    Ok(max_value)
}

/// Render a feature map into a larger 8-bit image.
///
/// Each value is shifted right by the resolved `shift` and narrowed to 8 bits
/// by truncation. The map is replicated into blocks of `dst.width() / width` by
/// `dst.height() / height` pixels and centered in `dst`; pixels of `dst` not
/// covered by a block are left untouched.
///
/// # Returns
///
/// The shift that was applied.
///
/// # Errors
///
/// Returns [`ImageError::InvalidDimensions`] if `dst` is smaller than the map.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::integral::{render_feature_map, FeatureShift};
///
/// let features = Image::new(ImageSize { width: 2, height: 1 }, vec![8u32, 4]).unwrap();
/// let mut dst = Image::from_size_val(ImageSize { width: 5, height: 1 }, 0u8).unwrap();
///
/// render_feature_map(&features, FeatureShift::Fixed(2), &mut dst).unwrap();
/// assert_eq!(dst.as_slice(), &[2, 2, 1, 1, 0]);
/// ```
pub fn render_feature_map(
    features: &Image<u32>,
    shift: FeatureShift,
    dst: &mut Image<u8>,
) -> Result<u32, ImageError> {
    let (src_w, src_h) = (features.width(), features.height());
    let (dst_w, dst_h) = (dst.width(), dst.height());
    if src_w == 0 || src_h == 0 || dst_w < src_w || dst_h < src_h {
        return Err(ImageError::InvalidDimensions(format!(
            "cannot render a {} feature map into {}",
            features.size(),
            dst.size()
        )));
    }

    let shift = shift.resolve();
    log::debug!("rendering feature map with shift {shift}");

    let col_step = dst_w / src_w;
    let row_step = dst_h / src_h;
    let col_offset = (dst_w - src_w * col_step) / 2;
    let row_offset = (dst_h - src_h * row_step) / 2;

    let dst_data = dst.as_slice_mut();
    for (j, src_row) in features.as_slice().chunks_exact(src_w).enumerate() {
        for (i, &value) in src_row.iter().enumerate() {
            let px = value.checked_shr(shift).unwrap_or(0) as u8;
            for y in row_offset + j * row_step..row_offset + (j + 1) * row_step {
                let start = y * dst_w + col_offset + i * col_step;
                dst_data[start..start + col_step].fill(px);
            }
        }
    }

    Ok(shift)
}
