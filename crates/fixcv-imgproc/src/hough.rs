//! Hough line transform restricted to the local gradient direction.
//!
//! Lines are parameterized by the angle bin of their normal and the distance
//! from an origin chosen by the caller, usually the image center. Radii are
//! quantized four pixels per bin. Each edge pixel only votes for the few angle
//! bins around its own gradient direction instead of all 128.

use fixcv_image::{Image, ImageError, ImageSize};

use crate::fixed::{approx_atan2, cos_scaled, sin_scaled, tan_scaled, ANGLE_BINS};

/// Number of radius bits dropped when quantizing radii.
pub const RADIUS_SHIFT: u32 = 2;

/// Signed distance from the origin to the line through `(x, y)` whose normal
/// points along `angle_bin`.
///
/// Coordinates are relative to the origin. The result is truncated towards
/// zero, so `hough_radius(-x, -y, a) == -hough_radius(x, y, a)`.
///
/// # Examples
///
/// ```
/// use fixcv_imgproc::hough::hough_radius;
///
/// assert_eq!(hough_radius(10, 3, 0), 10);
/// assert_eq!(hough_radius(10, 3, 32), 3);
/// assert_eq!(hough_radius(10, 3, 64), -10);
/// ```
pub fn hough_radius(x: i32, y: i32, angle_bin: usize) -> i32 {
    let projected = i64::from(x) * i64::from(cos_scaled(angle_bin))
        + i64::from(y) * i64::from(sin_scaled(angle_bin));
    (projected / (1 << 16)) as i32
}

// floor square root for values past the range of `int_sqrt`
fn sqrt_u64(value: u64) -> u64 {
    if value < 2 {
        return value;
    }
    let mut current = value / 2 + 1;
    loop {
        let next = (current + value / current) / 2;
        if next >= current {
            return current;
        }
        current = next;
    }
}

/// Vote counts indexed by radius bin and angle bin.
///
/// Backed by an `Image<u32>` that is [`ANGLE_BINS`] columns wide and one row
/// per radius bin. Votes accumulate until [`HoughAccumulator::clear`] is called.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoughAccumulator {
    votes: Image<u32>,
}

impl HoughAccumulator {
    /// Create a zeroed accumulator with `radius_bins` rows.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidDimensions`] if `radius_bins` is zero.
    pub fn new(radius_bins: usize) -> Result<Self, ImageError> {
        if radius_bins == 0 {
            return Err(ImageError::InvalidDimensions(
                "hough accumulator needs at least one radius bin".to_string(),
            ));
        }
        let size = ImageSize {
            width: ANGLE_BINS,
            height: radius_bins,
        };
        Ok(Self {
            votes: Image::from_size_val(size, 0)?,
        })
    }

    /// Create an accumulator covering every radius reachable inside an image
    /// of `size` when the origin is its center.
    pub fn for_image(size: ImageSize) -> Result<Self, ImageError> {
        let (w, h) = (size.width as u64, size.height as u64);
        let half_diagonal = sqrt_u64(w.saturating_mul(w).saturating_add(h.saturating_mul(h)) / 4);
        let radius_bins = usize::try_from(half_diagonal >> RADIUS_SHIFT).unwrap_or(usize::MAX);
        Self::new(radius_bins.saturating_add(2))
    }

    /// Number of radius bins.
    pub fn radius_bins(&self) -> usize {
        self.votes.height()
    }

    /// The votes as an image, one row per radius bin.
    pub fn votes(&self) -> &Image<u32> {
        &self.votes
    }

    /// Votes of one cell, or `None` outside the accumulator.
    pub fn get(&self, radius_bin: usize, angle_bin: usize) -> Option<u32> {
        self.votes.get(angle_bin, radius_bin).copied()
    }

    /// Sum of all votes.
    pub fn total_votes(&self) -> u64 {
        self.votes.as_slice().iter().map(|&v| u64::from(v)).sum()
    }

    /// Reset every cell to zero.
    pub fn clear(&mut self) {
        self.votes.as_slice_mut().fill(0);
    }

    fn increment(&mut self, radius_bin: usize, angle_bin: usize) -> bool {
        match self.votes.get_mut(angle_bin, radius_bin) {
            Some(cell) => {
                *cell = cell.saturating_add(1);
                true
            }
            None => false,
        }
    }
}

/// Vote for the lines through one edge pixel.
///
/// The gradient `(dy, dx)` of the pixel gives its approximate normal direction.
/// The `4 * neighborhood + 1` angle bins centered on it each receive one vote
/// at the radius of the line through `(x, y)`, unless that radius is negative
/// or beyond the last radius bin.
///
/// # Returns
///
/// The number of votes cast.
///
/// # Examples
///
/// ```
/// use fixcv_imgproc::hough::{vote_line, HoughAccumulator};
///
/// let mut acc = HoughAccumulator::new(16).unwrap();
/// let cast = vote_line(&mut acc, 12, -3, 0, 50, 0);
///
/// assert_eq!(cast, 1);
/// assert_eq!(acc.get(3, 0), Some(1));
/// ```
pub fn vote_line(
    acc: &mut HoughAccumulator,
    x: i32,
    y: i32,
    dy: i32,
    dx: i32,
    neighborhood: usize,
) -> usize {
    let center = approx_atan2(dy, dx);
    let span = (4 * neighborhood + 1).min(ANGLE_BINS);
    let first = (center + ANGLE_BINS * (1 + neighborhood / 64) - 2 * neighborhood) % ANGLE_BINS;

    let mut cast = 0;
    for k in 0..span {
        let angle_bin = (first + k) % ANGLE_BINS;
        let radius = hough_radius(x, y, angle_bin);
        if radius < 0 {
            continue;
        }
        if acc.increment((radius as usize) >> RADIUS_SHIFT, angle_bin) {
            cast += 1;
        }
    }
    cast
}

/// Vote every edge pixel of a mask.
///
/// Nonzero pixels of `mask` vote with their coordinates relative to `origin`
/// and the gradient read from `gx` and `gy`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the three images differ in size.
pub fn vote_edges(
    acc: &mut HoughAccumulator,
    mask: &Image<u8>,
    gx: &Image<i16>,
    gy: &Image<i16>,
    origin: (i32, i32),
    neighborhood: usize,
) -> Result<usize, ImageError> {
    for other in [gx.size(), gy.size()] {
        if mask.size() != other {
            return Err(ImageError::InvalidImageSize(
                mask.width(),
                mask.height(),
                other.width,
                other.height,
            ));
        }
    }

    let cols = mask.width();
    let mut cast = 0;
    for (i, _) in mask.as_slice().iter().enumerate().filter(|(_, &m)| m != 0) {
        let (x, y) = ((i % cols) as i32, (i / cols) as i32);
        cast += vote_line(
            acc,
            x - origin.0,
            y - origin.1,
            i32::from(gy.as_slice()[i]),
            i32::from(gx.as_slice()[i]),
            neighborhood,
        );
    }

    log::debug!("hough voting: {cast} votes cast");

    Ok(cast)
}

/// A line found in the accumulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoughLine {
    /// Angle bin of the line normal.
    pub angle_bin: usize,
    /// Radius bin of the line.
    pub radius_bin: usize,
    /// Number of votes in the cell.
    pub votes: u32,
}

/// Every cell with more than `min_votes` votes, strongest first.
///
/// Cells with equal votes keep their scan order: by radius bin, then by angle bin.
pub fn find_lines(acc: &HoughAccumulator, min_votes: u32) -> Vec<HoughLine> {
    let mut lines = acc
        .votes()
        .as_slice()
        .iter()
        .enumerate()
        .filter(|(_, &v)| v > min_votes)
        .map(|(i, &votes)| HoughLine {
            angle_bin: i % ANGLE_BINS,
            radius_bin: i / ANGLE_BINS,
            votes,
        })
        .collect::<Vec<_>>();
    lines.sort_by(|a, b| b.votes.cmp(&a.votes));

    log::debug!("found {} lines above {min_votes} votes", lines.len());

    lines
}

/// The two points where the line of an accumulator cell meets the image border.
///
/// `origin` is the point radii were measured from. Axis-aligned bins give the
/// full-width or full-height line through the offset origin. Other bins are
/// folded into the first quadrant; the line is intersected with the top and
/// bottom rows, and an intersection that falls beyond the left or right border
/// is moved onto that border instead. Points can lie outside the image when
/// the line misses it; [`crate::draw::draw_line`] clips them.
///
/// # Errors
///
/// Returns [`ImageError::InvalidAngleBin`] if `angle_bin` is 128 or more.
///
/// # Examples
///
/// ```
/// use fixcv_image::ImageSize;
/// use fixcv_imgproc::hough::reconstruct_line;
///
/// let size = ImageSize { width: 64, height: 48 };
/// let (p0, p1) = reconstruct_line(size, (32, 24), 0, 2).unwrap();
///
/// assert_eq!((p0, p1), ((40, 0), (40, 47)));
/// ```
pub fn reconstruct_line(
    size: ImageSize,
    origin: (i64, i64),
    angle_bin: usize,
    radius_bin: usize,
) -> Result<((i64, i64), (i64, i64)), ImageError> {
    if angle_bin >= ANGLE_BINS {
        return Err(ImageError::InvalidAngleBin(angle_bin));
    }

    let (w, h) = (size.width as i64, size.height as i64);
    let (ox, oy) = origin;
    let r = (radius_bin as i64) << RADIUS_SHIFT;

    let points = match angle_bin {
        0 => ((ox + r, 0), (ox + r, h - 1)),
        32 => ((0, oy + r), (w - 1, oy + r)),
        64 => ((ox - r, 0), (ox - r, h - 1)),
        96 => ((0, oy - r), (w - 1, oy - r)),
        // normal towards the lower right or upper left: the line runs from the
        // bottom left to the top right
        a if a < 32 || (a > 64 && a < 96) => {
            let (folded, sign) = if a < 32 { (a, 1) } else { (a - 64, -1) };
            let cos = i64::from(cos_scaled(folded));
            let tan = i64::from(tan_scaled(folded));
            let xpt = ox + sign * ((r << 16) / cos);
            let top = xpt + ((oy * tan) >> 16);
            let bottom = xpt - (((h - oy) * tan) >> 16);

            let end = if top < w {
                (top, 0)
            } else {
                (w - 1, ((top - w) << 16) / tan)
            };
            let begin = if bottom >= 0 {
                (bottom, h - 1)
            } else {
                (0, h - (((-bottom) << 16) / tan))
            };
            (begin, end)
        }
        // normal towards the lower left or upper right: the line runs from the
        // top left to the bottom right
        a => {
            let (folded, sign) = if a < 64 { (64 - a, -1) } else { (128 - a, 1) };
            let cos = i64::from(cos_scaled(folded));
            let tan = i64::from(tan_scaled(folded));
            let xpt = ox + sign * ((r << 16) / cos);
            let top = xpt - ((oy * tan) >> 16);
            let bottom = xpt + (((h - oy) * tan) >> 16);

            let begin = if top >= 0 {
                (top, 0)
            } else {
                (0, ((-top) << 16) / tan)
            };
            let end = if bottom < w {
                (bottom, h - 1)
            } else {
                (w - 1, h - (((bottom - w) << 16) / tan))
            };
            (begin, end)
        }
    };

    Ok(points)
}
