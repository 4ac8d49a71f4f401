//! Two 8-bit chroma channels packed into one `u16` sample.
//!
//! The Cb component occupies the low byte and the Cr component the high byte, so
//! an `Image<u16>` holding packed samples can index a 65536-entry lookup table
//! directly.

/// Pack a Cb and a Cr component into one sample.
///
/// # Examples
///
/// ```
/// use fixcv_image::{pack_cbcr, unpack_cbcr};
///
/// let packed = pack_cbcr(0x12, 0x34);
/// assert_eq!(packed, 0x3412);
/// assert_eq!(unpack_cbcr(packed), (0x12, 0x34));
/// ```
#[inline]
pub fn pack_cbcr(cb: u8, cr: u8) -> u16 {
    u16::from(cb) | (u16::from(cr) << 8)
}

/// Split a packed sample into its `(cb, cr)` components.
#[inline]
pub fn unpack_cbcr(packed: u16) -> (u8, u8) {
    let [cb, cr] = packed.to_le_bytes();
    (cb, cr)
}
