use fixcv_image::{unpack_cbcr, Image, ImageError};

use crate::fixed::chroma_distance;

/// Minimum number of bins for a chroma distance histogram.
///
/// `360 = floor(sqrt(255^2 + 255^2))` is the largest distance in the CbCr plane.
pub const CBCR_DISTANCE_BINS: usize = 361;

/// Number of bins covering every 8-bit sample value.
pub const U8_BINS: usize = 256;

/// Strategy for searching Otsu's threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OtsuSearch {
    /// Scan every split and keep the global maximum of the between-class score.
    ///
    /// When the maximum is reached on a run of consecutive candidates, the middle
    /// of the first such run is returned.
    #[default]
    Exhaustive,
    /// Stop at the first candidate whose score drops below the previous one and
    /// return that index. Cheaper, but may stop on a local maximum of a
    /// multimodal histogram.
    Greedy,
}

/// Summary statistics of a histogram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistogramStats {
    /// Index of the bin with the fewest counts (first one on ties).
    pub min_index: usize,
    /// Index of the bin with the most counts (first one on ties).
    pub max_index: usize,
    /// Count-weighted mean index, rounded down.
    pub mean_index: usize,
    /// Count-weighted variance of the index, rounded down.
    pub variance: u64,
}

/// A density histogram with its cumulative count and cumulative moment arrays.
///
/// `sum_bins[i]` is the number of samples in bins `0..=i` and `mean_bins[i]` is
/// `sum(k * bins[k])` over the same range. Both are rebuilt every time the
/// histogram is populated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    bins: Vec<u64>,
    sum_bins: Vec<u64>,
    mean_bins: Vec<u64>,
    number_counts: u64,
}

impl Histogram {
    /// Create an empty histogram with `num_bins` bins.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidHistogramBins`] if `num_bins` is zero.
    pub fn new(num_bins: usize) -> Result<Self, ImageError> {
        if num_bins == 0 {
            return Err(ImageError::InvalidHistogramBins(num_bins));
        }

        Ok(Self {
            bins: vec![0; num_bins],
            sum_bins: vec![0; num_bins],
            mean_bins: vec![0; num_bins],
            number_counts: 0,
        })
    }

    /// Build a histogram from raw bin counts.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixcv_imgproc::histogram::Histogram;
    ///
    /// let hist = Histogram::from_bins(vec![1, 0, 3]).unwrap();
    ///
    /// assert_eq!(hist.sum_bins(), &[1, 1, 4]);
    /// assert_eq!(hist.mean_bins(), &[0, 0, 6]);
    /// assert_eq!(hist.number_counts(), 4);
    /// ```
    pub fn from_bins(bins: Vec<u64>) -> Result<Self, ImageError> {
        let mut hist = Histogram::new(bins.len())?;
        hist.bins = bins;
        hist.accumulate();
        Ok(hist)
    }

    /// Number of bins.
    pub fn num_bins(&self) -> usize {
        self.bins.len()
    }

    /// The per-bin counts.
    pub fn bins(&self) -> &[u64] {
        &self.bins
    }

    /// The inclusive cumulative counts.
    pub fn sum_bins(&self) -> &[u64] {
        &self.sum_bins
    }

    /// The inclusive cumulative index-weighted counts.
    pub fn mean_bins(&self) -> &[u64] {
        &self.mean_bins
    }

    /// Total number of samples tallied.
    pub fn number_counts(&self) -> u64 {
        self.number_counts
    }

    // count every index into a fresh set of bins, leaving `self` untouched on error
    fn tally(&self, indices: impl IntoIterator<Item = usize>) -> Result<Vec<u64>, ImageError> {
        let num_bins = self.bins.len();
        let mut bins = vec![0u64; num_bins];
        for index in indices {
            let bin = bins
                .get_mut(index)
                .ok_or(ImageError::HistogramBinOutOfRange(index, num_bins))?;
            *bin += 1;
        }
        Ok(bins)
    }

    fn commit(&mut self, bins: Vec<u64>) {
        self.bins = bins;
        self.accumulate();
    }

    // rebuild the cumulative arrays from the bins
    fn accumulate(&mut self) {
        let mut accum_sum = 0u64;
        let mut accum_mean = 0u64;
        for (i, &count) in self.bins.iter().enumerate() {
            accum_sum += count;
            accum_mean += i as u64 * count;
            self.sum_bins[i] = accum_sum;
            self.mean_bins[i] = accum_mean;
        }
        self.number_counts = accum_sum;
    }

    /// Index where the cumulative count first reaches half of the total,
    /// rounded up: `(number_counts + 1) / 2`.
    ///
    /// The search halves the candidate interval over `sum_bins` at each step.
    /// Returns 0 for an empty histogram.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixcv_imgproc::histogram::Histogram;
    ///
    /// let hist = Histogram::from_bins(vec![2, 1, 0, 4, 1]).unwrap();
    /// assert_eq!(hist.median(), 3);
    /// ```
    pub fn median(&self) -> usize {
        let half = (self.number_counts + 1) / 2;
        let index = self.sum_bins.partition_point(|&count| count < half);
        index.min(self.num_bins() - 1)
    }

    /// Otsu's threshold using the default [`OtsuSearch::Exhaustive`] strategy.
    ///
    /// Returns `None` if every split of the histogram is degenerate, i.e. all
    /// samples fall into a single bin or there are no samples at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixcv_imgproc::histogram::Histogram;
    ///
    /// let mut bins = vec![0u64; 256];
    /// bins[40] = 100;
    /// bins[200] = 100;
    /// let hist = Histogram::from_bins(bins).unwrap();
    ///
    /// let threshold = hist.otsu_threshold().unwrap();
    /// assert!((40..200).contains(&threshold));
    /// ```
    pub fn otsu_threshold(&self) -> Option<usize> {
        self.otsu_threshold_with(OtsuSearch::default())
    }

    /// Otsu's threshold with an explicit search strategy.
    ///
    /// For each index `t` the samples split into `0..=t` and the rest. Splits
    /// where either side is empty are skipped. The score of a split is
    /// `a^2 / (p * (n - p))` with `p = sum_bins[t]`, `n` the total count and
    /// `a = mean_bins[t] - mean * p`, which is proportional to the
    /// between-class variance.
    pub fn otsu_threshold_with(&self, search: OtsuSearch) -> Option<usize> {
        let total = self.number_counts;
        if total == 0 {
            return None;
        }
        let mean = self.mean_bins[self.num_bins() - 1] / total;

        let scores = self
            .sum_bins
            .iter()
            .zip(self.mean_bins.iter())
            .enumerate()
            .filter(|(_, (&p, _))| p != 0 && p != total)
            .map(|(t, (&p, &m))| {
                let a = i128::from(m) - i128::from(mean) * i128::from(p);
                let score = (a * a) as u128 / (u128::from(p) * u128::from(total - p));
                (t, score)
            });

        let threshold = match search {
            OtsuSearch::Greedy => greedy_maximum(scores),
            OtsuSearch::Exhaustive => plateau_maximum(scores),
        };

        log::debug!("otsu threshold ({search:?}): {threshold:?}");

        threshold
    }

    /// Extrema, mean and variance of the histogram.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::EmptyHistogram`] if the histogram has no counts.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixcv_imgproc::histogram::Histogram;
    ///
    /// let hist = Histogram::from_bins(vec![0, 2, 0, 2]).unwrap();
    /// let stats = hist.stats().unwrap();
    ///
    /// assert_eq!(stats.min_index, 0);
    /// assert_eq!(stats.max_index, 1);
    /// assert_eq!(stats.mean_index, 2);
    /// assert_eq!(stats.variance, 1);
    /// ```
    pub fn stats(&self) -> Result<HistogramStats, ImageError> {
        let total = self.number_counts;
        if total == 0 {
            return Err(ImageError::EmptyHistogram);
        }

        let mut min_index = 0;
        let mut max_index = 0;
        let mut second_moment = 0u128;
        for (i, &count) in self.bins.iter().enumerate() {
            if count < self.bins[min_index] {
                min_index = i;
            }
            if count > self.bins[max_index] {
                max_index = i;
            }
            second_moment += u128::from(count) * (i as u128) * (i as u128);
        }

        let mean_index = self.mean_bins[self.num_bins() - 1] / total;
        let mean_sq = u128::from(mean_index) * u128::from(mean_index);
        let variance = (second_moment / u128::from(total)).saturating_sub(mean_sq) as u64;

        Ok(HistogramStats {
            min_index,
            max_index,
            mean_index: mean_index as usize,
            variance,
        })
    }
}

fn greedy_maximum(scores: impl Iterator<Item = (usize, u128)>) -> Option<usize> {
    let mut last: Option<(usize, u128)> = None;
    for (t, score) in scores {
        if let Some((_, last_score)) = last {
            if score < last_score {
                return Some(t);
            }
        }
        last = Some((t, score));
    }
    // never decreased: the last candidate is the best one seen
    last.map(|(t, _)| t)
}

fn plateau_maximum(scores: impl Iterator<Item = (usize, u128)>) -> Option<usize> {
    // (best score, first index of the run, last index of the run, run still open)
    let mut best: Option<(u128, usize, usize, bool)> = None;
    for (t, score) in scores {
        best = match best {
            None => Some((score, t, t, true)),
            Some((best_score, _, _, _)) if score > best_score => Some((score, t, t, true)),
            Some((best_score, start, _, true)) if score == best_score => {
                Some((best_score, start, t, true))
            }
            Some((best_score, start, end, _)) => Some((best_score, start, end, false)),
        };
    }
    best.map(|(_, start, end, _)| start + (end - start) / 2)
}

fn check_bins(hist: &Histogram, min_bins: usize) -> Result<(), ImageError> {
    if hist.num_bins() < min_bins {
        return Err(ImageError::InvalidHistogramBins(hist.num_bins()));
    }
    Ok(())
}

/// Compute the density histogram of an 8-bit image.
///
/// The previous contents are replaced. It needs at least as many bins as the
/// largest sample value plus one; an image quantized to `0..4` works with 4 bins.
///
/// # Errors
///
/// Returns [`ImageError::HistogramBinOutOfRange`] if a sample has no bin. The
/// histogram is left untouched on error.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::histogram::{compute_histogram, Histogram};
///
/// let image = Image::new(ImageSize { width: 3, height: 1 }, vec![0u8, 2, 2]).unwrap();
/// let mut hist = Histogram::new(3).unwrap();
///
/// compute_histogram(&image, &mut hist).unwrap();
/// assert_eq!(hist.bins(), &[1, 0, 2]);
/// ```
pub fn compute_histogram(src: &Image<u8>, hist: &mut Histogram) -> Result<(), ImageError> {
    let bins = hist.tally(src.as_slice().iter().map(|&px| px as usize))?;
    hist.commit(bins);
    Ok(())
}

/// Compute the histogram of absolute differences between the samples and `reference`.
///
/// The histogram needs `max(reference, 255 - reference) + 1` bins at least for a
/// general 8-bit image; 256 bins are always enough.
pub fn compute_distance_histogram(
    src: &Image<u8>,
    reference: u8,
    hist: &mut Histogram,
) -> Result<(), ImageError> {
    let bins = hist.tally(
        src.as_slice()
            .iter()
            .map(|&px| px.abs_diff(reference) as usize),
    )?;
    hist.commit(bins);
    Ok(())
}

/// Compute the Cb and Cr histograms of a packed two-channel image.
///
/// Equivalent to [`compute_histogram`] on each channel separately. Both
/// histograms need at least 256 bins.
pub fn compute_histogram_cbcr(
    src: &Image<u16>,
    cb_hist: &mut Histogram,
    cr_hist: &mut Histogram,
) -> Result<(), ImageError> {
    check_bins(cb_hist, U8_BINS)?;
    check_bins(cr_hist, U8_BINS)?;

    let cb_bins = cb_hist.tally(src.as_slice().iter().map(|&px| unpack_cbcr(px).0 as usize))?;
    let cr_bins = cr_hist.tally(src.as_slice().iter().map(|&px| unpack_cbcr(px).1 as usize))?;
    // both sets are counted before either histogram changes
    cb_hist.commit(cb_bins);
    cr_hist.commit(cr_bins);
    Ok(())
}

/// Compute the histogram of Euclidean chroma distances to a packed `reference`.
///
/// Distances are rounded down, so the histogram needs at least
/// [`CBCR_DISTANCE_BINS`] bins.
pub fn compute_distance_histogram_cbcr(
    src: &Image<u16>,
    reference: u16,
    hist: &mut Histogram,
) -> Result<(), ImageError> {
    check_bins(hist, CBCR_DISTANCE_BINS)?;

    let bins = hist.tally(
        src.as_slice()
            .iter()
            .map(|&px| chroma_distance(px, reference) as usize),
    )?;
    hist.commit(bins);
    Ok(())
}

/// Equalize an 8-bit image in place using its histogram.
///
/// Every sample `v` is replaced by `((sum_bins[v] << 8) - 1) / total`, which
/// spreads the cumulative distribution over `0..=255`.
///
/// # Errors
///
/// Returns [`ImageError::EmptyHistogram`] if the histogram has no counts and
/// [`ImageError::HistogramBinOutOfRange`] if a sample has no bin. The image is
/// left untouched on error.
///
/// # Examples
///
/// ```
/// use fixcv_image::{Image, ImageSize};
/// use fixcv_imgproc::histogram::{compute_histogram, equalize_image, Histogram};
///
/// let mut image = Image::new(ImageSize { width: 4, height: 1 }, vec![10u8, 10, 20, 30]).unwrap();
/// let mut hist = Histogram::new(256).unwrap();
/// compute_histogram(&image, &mut hist).unwrap();
///
/// equalize_image(&mut image, &hist).unwrap();
/// assert_eq!(image.as_slice(), &[127, 127, 191, 255]);
/// ```
pub fn equalize_image(image: &mut Image<u8>, hist: &Histogram) -> Result<(), ImageError> {
    let total = hist.number_counts();
    if total == 0 {
        return Err(ImageError::EmptyHistogram);
    }

    let num_bins = hist.num_bins();
    if let Some(&px) = image.as_slice().iter().find(|&&px| px as usize >= num_bins) {
        return Err(ImageError::HistogramBinOutOfRange(px as usize, num_bins));
    }

    let lut = hist
        .sum_bins()
        .iter()
        .map(|&count| ((count << 8).saturating_sub(1) / total) as u8)
        .collect::<Vec<_>>();

    image
        .as_slice_mut()
        .iter_mut()
        .for_each(|px| *px = lut[*px as usize]);

    Ok(())
}
