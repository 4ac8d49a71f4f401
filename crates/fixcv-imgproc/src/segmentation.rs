use std::collections::BTreeMap;

use fixcv_image::{unpack_cbcr, Image, ImageError};

use crate::fixed::chroma_ssd;

/// Sample types that can index a segmentation table directly.
pub trait SegmentKey: Copy {
    /// Number of distinct sample values, i.e. the table length.
    const TABLE_LEN: usize;

    /// Table index of the sample.
    fn table_index(self) -> usize;
}

impl SegmentKey for u8 {
    const TABLE_LEN: usize = 1 << 8;

    #[inline]
    fn table_index(self) -> usize {
        self as usize
    }
}

impl SegmentKey for u16 {
    const TABLE_LEN: usize = 1 << 16;

    #[inline]
    fn table_index(self) -> usize {
        self as usize
    }
}

/// A lookup table assigning a label to every possible sample value.
///
/// Label 0 means unset. Tables are built once from a key patch by marking
/// ranges of values, then applied to whole images with [`apply_segment_map`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentMap<K: SegmentKey> {
    labels: Vec<u8>,
    _key: std::marker::PhantomData<K>,
}

impl<K: SegmentKey> Default for SegmentMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SegmentKey> SegmentMap<K> {
    /// Create a table with every entry unset.
    pub fn new() -> Self {
        Self {
            labels: vec![0; K::TABLE_LEN],
            _key: std::marker::PhantomData,
        }
    }

    /// The label of a sample value.
    #[inline]
    pub fn label(&self, sample: K) -> u8 {
        self.labels[sample.table_index()]
    }

    /// The raw table.
    pub fn as_slice(&self) -> &[u8] {
        &self.labels
    }

    /// Reset every entry to unset.
    pub fn clear(&mut self) {
        self.labels.iter_mut().for_each(|l| *l = 0);
    }
}

impl SegmentMap<u8> {
    /// Mark every value within `threshold` of `center` with `label`.
    ///
    /// The marked interval is `[center - threshold, center + threshold]`,
    /// clamped to `0..=255`. Entries outside the interval keep their label, so
    /// several intervals can be combined into one table.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixcv_imgproc::segmentation::SegmentMap;
    ///
    /// let mut map = SegmentMap::<u8>::new();
    /// map.mark_interval(250, 10, 3);
    ///
    /// assert_eq!(map.label(239), 0);
    /// assert_eq!(map.label(240), 3);
    /// assert_eq!(map.label(255), 3);
    /// ```
    pub fn mark_interval(&mut self, center: u8, threshold: u8, label: u8) {
        let lower = center.saturating_sub(threshold) as usize;
        let upper = center.saturating_add(threshold) as usize;
        self.labels[lower..=upper]
            .iter_mut()
            .for_each(|l| *l = label);
    }
}

impl SegmentMap<u16> {
    /// Mark every packed CbCr value within Euclidean distance `threshold` of
    /// `center` with `label`.
    ///
    /// Candidates are first restricted to the square box of side `2 * threshold + 1`
    /// around the center, then tested exactly against `threshold^2`. Chroma
    /// distances reach 360, so thresholds above 255 are meaningful; the box is
    /// clamped to the channel range.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixcv_image::pack_cbcr;
    /// use fixcv_imgproc::segmentation::SegmentMap;
    ///
    /// let mut map = SegmentMap::<u16>::new();
    /// map.mark_disk(pack_cbcr(100, 100), 5, 1);
    ///
    /// assert_eq!(map.label(pack_cbcr(103, 104)), 1);
    /// assert_eq!(map.label(pack_cbcr(104, 104)), 0);
    /// ```
    pub fn mark_disk(&mut self, center: u16, threshold: u16, label: u8) {
        let (center_cb, center_cr) = unpack_cbcr(center);

        let mut cb_box = SegmentMap::<u8>::new();
        let mut cr_box = SegmentMap::<u8>::new();
        let half_side = u8::try_from(threshold).unwrap_or(u8::MAX);
        cb_box.mark_interval(center_cb, half_side, 1);
        cr_box.mark_interval(center_cr, half_side, 1);

        let threshold_sq = u32::from(threshold) * u32::from(threshold);
        let mut marked = 0usize;
        for packed in 0..=u16::MAX {
            let (cb, cr) = unpack_cbcr(packed);
            if cb_box.label(cb) == 0 || cr_box.label(cr) == 0 {
                continue;
            }
            if chroma_ssd(center, packed) <= threshold_sq {
                self.labels[packed as usize] = label;
                marked += 1;
            }
        }

        log::debug!("segment disk around {center:#06x} r={threshold}: {marked} entries");
    }
}

/// Label every pixel of `src` through `map`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if `dst` does not have the size of `src`.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::segmentation::{apply_segment_map, SegmentMap};
///
/// let size = ImageSize { width: 3, height: 1 };
/// let src = Image::new(size, vec![10u8, 50, 12]).unwrap();
/// let mut dst = Image::from_size_val(size, 0u8).unwrap();
///
/// let mut map = SegmentMap::<u8>::new();
/// map.mark_interval(11, 1, 7);
/// apply_segment_map(&src, &map, &mut dst).unwrap();
///
/// assert_eq!(dst.as_slice(), &[7, 0, 7]);
/// ```
pub fn apply_segment_map<K: SegmentKey>(
    src: &Image<K>,
    map: &SegmentMap<K>,
    dst: &mut Image<u8>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    src.as_slice()
        .iter()
        .zip(dst.as_slice_mut().iter_mut())
        .for_each(|(&s, d)| *d = map.label(s));

    Ok(())
}

/// Label the absolute difference of two frames through `map`.
///
/// Each output pixel is `map[|a - b|]`, which segments the pixels that changed
/// between two frames by the magnitude of the change.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the three images differ in size.
pub fn segment_difference(
    a: &Image<u8>,
    b: &Image<u8>,
    map: &SegmentMap<u8>,
    dst: &mut Image<u8>,
) -> Result<(), ImageError> {
    for other in [b.size(), dst.size()] {
        if a.size() != other {
            return Err(ImageError::InvalidImageSize(
                a.width(),
                a.height(),
                other.width,
                other.height,
            ));
        }
    }

    a.as_slice()
        .iter()
        .zip(b.as_slice())
        .zip(dst.as_slice_mut().iter_mut())
        .for_each(|((&pa, &pb), d)| *d = map.label(pa.abs_diff(pb)));

    Ok(())
}

/// Split a labeled image into one binary mask per label.
///
/// The returned masks hold 1 where the pixel carries the label and 0 elsewhere.
/// Unset pixels (label 0) get no mask.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::segmentation::split_segments;
///
/// let labeled = Image::new(ImageSize { width: 4, height: 1 }, vec![0u8, 2, 5, 2]).unwrap();
/// let masks = split_segments(&labeled).unwrap();
///
/// assert_eq!(masks.keys().copied().collect::<Vec<_>>(), vec![2, 5]);
/// assert_eq!(masks[&2].as_slice(), &[0, 1, 0, 1]);
/// ```
pub fn split_segments(labeled: &Image<u8>) -> Result<BTreeMap<u8, Image<u8>>, ImageError> {
    let mut masks = BTreeMap::new();
    for (i, &label) in labeled.as_slice().iter().enumerate() {
        if label == 0 {
            continue;
        }
        let mask = match masks.entry(label) {
            std::collections::btree_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(Image::from_size_val(labeled.size(), 0u8)?)
            }
        };
        mask.as_slice_mut()[i] = 1;
    }
    Ok(masks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixcv_image::{pack_cbcr, ImageSize};

    #[test]
    fn interval_clamps_at_zero() {
        let mut map = SegmentMap::<u8>::new();
        map.mark_interval(3, 10, 1);
        assert!((0..=13).all(|v| map.label(v) == 1));
        assert_eq!(map.label(14), 0);
    }

    #[test]
    fn intervals_combine() {
        let mut map = SegmentMap::<u8>::new();
        map.mark_interval(20, 5, 1);
        map.mark_interval(200, 0, 2);
        assert_eq!(map.label(25), 1);
        assert_eq!(map.label(200), 2);
        assert_eq!(map.as_slice().iter().filter(|&&l| l != 0).count(), 12);

        map.clear();
        assert!(map.as_slice().iter().all(|&l| l == 0));
    }

    #[test]
    fn disk_matches_exact_distance() {
        let center = pack_cbcr(128, 60);
        let mut map = SegmentMap::<u16>::new();
        map.mark_disk(center, 12, 9);

        for packed in 0..=u16::MAX {
            let inside = chroma_ssd(center, packed) <= 144;
            assert_eq!(map.label(packed) == 9, inside, "{packed:#06x}");
        }
    }

    #[test]
    fn disk_beyond_channel_range() {
        let count = |map: &SegmentMap<u16>| map.as_slice().iter().filter(|&&l| l != 0).count();

        let mut map = SegmentMap::<u16>::new();
        map.mark_disk(pack_cbcr(128, 128), 360, 1);
        assert_eq!(count(&map), 65536);

        // the opposite corner lies at sqrt(2 * 255^2), just past 360
        let mut map = SegmentMap::<u16>::new();
        map.mark_disk(pack_cbcr(0, 0), 360, 1);
        assert_eq!(map.label(pack_cbcr(255, 255)), 0);
        assert_eq!(map.label(pack_cbcr(255, 254)), 1);
        assert_eq!(count(&map), 65535);

        map.mark_disk(pack_cbcr(0, 0), 361, 1);
        assert_eq!(count(&map), 65536);

        let mut map = SegmentMap::<u16>::new();
        map.mark_disk(pack_cbcr(0, 0), 300, 1);
        assert_eq!(map.label(pack_cbcr(255, 0)), 1);
        assert_eq!(map.label(pack_cbcr(255, 200)), 0);
    }

    #[test]
    fn disk_near_corner() {
        let mut map = SegmentMap::<u16>::new();
        map.mark_disk(pack_cbcr(0, 255), 2, 4);
        assert_eq!(map.label(pack_cbcr(0, 255)), 4);
        assert_eq!(map.label(pack_cbcr(2, 255)), 4);
        assert_eq!(map.label(pack_cbcr(2, 253)), 0);
        assert_eq!(map.as_slice().iter().filter(|&&l| l != 0).count(), 6);
    }

    #[test]
    fn apply_packed() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let src = Image::new(
            size,
            vec![
                pack_cbcr(10, 10),
                pack_cbcr(11, 10),
                pack_cbcr(50, 50),
                pack_cbcr(10, 13),
            ],
        )?;
        let mut map = SegmentMap::<u16>::new();
        map.mark_disk(pack_cbcr(10, 10), 2, 1);

        let mut dst = Image::from_size_val(size, 0u8)?;
        apply_segment_map(&src, &map, &mut dst)?;
        assert_eq!(dst.as_slice(), &[1, 1, 0, 0]);
        Ok(())
    }

    #[test]
    fn apply_size_mismatch() -> Result<(), ImageError> {
        let src = Image::from_size_val([4, 4].into(), 0u8)?;
        let mut dst = Image::from_size_val([4, 3].into(), 0u8)?;
        let map = SegmentMap::<u8>::new();
        assert_eq!(
            apply_segment_map(&src, &map, &mut dst),
            Err(ImageError::InvalidImageSize(4, 4, 4, 3))
        );
        Ok(())
    }

    #[test]
    fn difference_segments_changes() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 1,
        };
        let a = Image::new(size, vec![10u8, 100, 200, 0])?;
        let b = Image::new(size, vec![12u8, 100, 150, 255])?;
        let mut map = SegmentMap::<u8>::new();
        map.mark_interval(255, 225, 1);

        let mut dst = Image::from_size_val(size, 0u8)?;
        segment_difference(&a, &b, &map, &mut dst)?;
        assert_eq!(dst.as_slice(), &[0, 0, 1, 1]);
        Ok(())
    }
}
