//! Integer square root and quantized trigonometry.
//!
//! Angles are quantized into [`ANGLE_BINS`] steps over the full circle, so one
//! bin is 2.8125 degrees. Trigonometric values are scaled by `2^16`. The image
//! coordinate system is left handed: x runs right and y runs down, so bin 0
//! points right, 32 down, 64 left and 96 up.

use fixcv_image::unpack_cbcr;

/// Number of quantized angle steps over the full circle.
pub const ANGLE_BINS: usize = 128;

/// Number of fractional bits of the scaled trigonometric values.
pub const FIXED_POINT_SHIFT: u32 = 16;

/// The scaled representation of `1.0`.
pub const FIXED_POINT_ONE: i32 = 1 << FIXED_POINT_SHIFT;

const SQRT_LUT_LEN: usize = 1024;

// floor(sqrt(i)) for every i below SQRT_LUT_LEN
static SQRT_LUT: [u8; SQRT_LUT_LEN] = build_sqrt_lut();

// 65536 * sin(i * 2.8125 deg) for i in 0..=32
const SIN_QUARTER: [i32; 33] = [
    0, 3215, 6423, 9616, 12785, 15923, 19024, 22078, 25079, 28020, 30893, 33692, 36409, 39039,
    41575, 44011, 46340, 48558, 50660, 52639, 54491, 56212, 57797, 59243, 60547, 61705, 62714,
    63571, 64276, 64826, 65220, 65457, 65536,
];

// 65536 * tan(i * 2.8125 deg) for i in 0..32
const TAN_QUADRANT: [i32; 32] = [
    0, 3219, 6454, 9721, 13035, 16415, 19880, 23449, 27145, 30996, 35029, 39280, 43789, 48604,
    53784, 59398, 65535, 72307, 79855, 88365, 98081, 109340, 122609, 138564, 158217, 183160,
    216043, 261634, 329471, 441807, 665398, 1334015,
];

static SIN_TABLE: [i32; ANGLE_BINS] = build_sin_table();
static COS_TABLE: [i32; ANGLE_BINS] = build_cos_table();
static TAN_TABLE: [i32; ANGLE_BINS] = build_tan_table();

const fn build_sqrt_lut() -> [u8; SQRT_LUT_LEN] {
    let mut lut = [0u8; SQRT_LUT_LEN];
    let mut root = 0usize;
    let mut i = 0;
    while i < SQRT_LUT_LEN {
        if (root + 1) * (root + 1) <= i {
            root += 1;
        }
        lut[i] = root as u8;
        i += 1;
    }
    lut
}

const fn build_sin_table() -> [i32; ANGLE_BINS] {
    let mut table = [0i32; ANGLE_BINS];
    let mut i = 0;
    while i < ANGLE_BINS {
        table[i] = if i <= 32 {
            SIN_QUARTER[i]
        } else if i <= 64 {
            SIN_QUARTER[64 - i]
        } else if i <= 96 {
            -SIN_QUARTER[i - 64]
        } else {
            -SIN_QUARTER[128 - i]
        };
        i += 1;
    }
    table
}

const fn build_cos_table() -> [i32; ANGLE_BINS] {
    let sin = build_sin_table();
    let mut table = [0i32; ANGLE_BINS];
    let mut i = 0;
    while i < ANGLE_BINS {
        table[i] = sin[(i + 32) % ANGLE_BINS];
        i += 1;
    }
    table
}

const fn build_tan_table() -> [i32; ANGLE_BINS] {
    let mut table = [0i32; ANGLE_BINS];
    let mut i = 0;
    while i < ANGLE_BINS {
        // bins 32 and 96 stay at the undefined sentinel 0
        table[i] = if i < 32 {
            TAN_QUADRANT[i]
        } else if i == 32 {
            0
        } else if i < 64 {
            -TAN_QUADRANT[64 - i]
        } else if i < 96 {
            TAN_QUADRANT[i - 64]
        } else if i == 96 {
            0
        } else {
            -TAN_QUADRANT[128 - i]
        };
        i += 1;
    }
    table
}

/// Integer square root.
///
/// Values below 1024 are looked up exactly. Larger values use Newton's method
/// starting from `value / 2` and stop as soon as two successive estimates are
/// equal or differ by one, so the result may be one above the floor square root
/// close to perfect squares.
///
/// # Examples
///
/// ```
/// use fixcv_imgproc::fixed::int_sqrt;
///
/// assert_eq!(int_sqrt(0), 0);
/// assert_eq!(int_sqrt(1023), 31);
/// assert_eq!(int_sqrt(1_000_000), 1000);
/// ```
pub fn int_sqrt(value: u32) -> u32 {
    if (value as usize) < SQRT_LUT_LEN {
        return u32::from(SQRT_LUT[value as usize]);
    }

    let mut current = value >> 1;
    loop {
        let last = current;
        current = (last + value / last) >> 1;
        if last == current || last.abs_diff(current) == 1 {
            return current;
        }
    }
}

/// Approximate the orientation of the vector `(dx, dy)` as an angle bin in `0..128`.
///
/// The circle is split into eight octants by the signs and relative magnitude of
/// the components; inside an octant the angle is interpolated linearly as
/// `(minor << 4) / major`. This is a piecewise linear stand-in for `atan2`, exact
/// on octant boundaries only. The zero vector maps to bin 0.
///
/// # Examples
///
/// ```
/// use fixcv_imgproc::fixed::approx_atan2;
///
/// assert_eq!(approx_atan2(0, 10), 0); // right
/// assert_eq!(approx_atan2(10, 0), 32); // down
/// assert_eq!(approx_atan2(0, -10), 64); // left
/// assert_eq!(approx_atan2(-10, 0), 96); // up
/// assert_eq!(approx_atan2(5, 5), 16);
/// ```
pub fn approx_atan2(dy: i32, dx: i32) -> usize {
    let ax = i64::from(dx).abs();
    let ay = i64::from(dy).abs();

    let bin = match (dx.signum(), dy.signum()) {
        (0, 1) => 32,
        (0, -1) => 96,
        (0, _) => 0,
        (1, 0) => 0,
        (-1, 0) => 64,
        (1, 1) if ay <= ax => (ay << 4) / ax,
        (1, 1) => 32 - (ax << 4) / ay,
        (-1, 1) if ay <= ax => 64 - (ay << 4) / ax,
        (-1, 1) => 32 + (ax << 4) / ay,
        (-1, -1) if ay <= ax => 64 + (ay << 4) / ax,
        (-1, -1) => 96 - (ax << 4) / ay,
        (_, _) if ay <= ax => (128 - (ay << 4) / ax) % 128,
        (_, _) => 96 + (ax << 4) / ay,
    };

    bin as usize
}

/// `65536 * sin(angle)` for an angle bin, taken modulo 128.
#[inline]
pub fn sin_scaled(angle_bin: usize) -> i32 {
    SIN_TABLE[angle_bin % ANGLE_BINS]
}

/// `65536 * cos(angle)` for an angle bin, taken modulo 128.
#[inline]
pub fn cos_scaled(angle_bin: usize) -> i32 {
    COS_TABLE[angle_bin % ANGLE_BINS]
}

/// `65536 * tan(angle)` for an angle bin, taken modulo 128.
///
/// The tangent is undefined at bins 32 and 96; those return 0.
#[inline]
pub fn tan_scaled(angle_bin: usize) -> i32 {
    TAN_TABLE[angle_bin % ANGLE_BINS]
}

/// Squared Euclidean distance between two packed CbCr samples.
#[inline]
pub fn chroma_ssd(a: u16, b: u16) -> u32 {
    let (a_cb, a_cr) = unpack_cbcr(a);
    let (b_cb, b_cr) = unpack_cbcr(b);
    let d_cb = u32::from(a_cb.abs_diff(b_cb));
    let d_cr = u32::from(a_cr.abs_diff(b_cr));
    d_cb * d_cb + d_cr * d_cr
}

/// Euclidean distance between two packed CbCr samples, rounded down.
///
/// The result never exceeds 360, the distance between opposite corners of the
/// chroma plane.
#[inline]
pub fn chroma_distance(a: u16, b: u16) -> u32 {
    int_sqrt(chroma_ssd(a, b))
}
