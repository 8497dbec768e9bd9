use crate::tracker::Residence;

/// One histogram interval `[bottom, top)`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Bin {
    pub bottom: f64,
    pub center: f64,
    pub top: f64,
    pub count: usize,
}

/// A fixed-width histogram of residence times starting at zero.
///
/// Values at or beyond the top of the last bin are not counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<Bin>,
    dropped: usize,
}

impl Histogram {
    /// Creates `nbins` empty contiguous bins of `width` each.
    ///
    /// A bin's top is its bottom plus `width`, which may differ from the next bin's bottom in the
    /// last bit. Values on an edge are assigned by comparing against the top.
    pub fn new(nbins: usize, width: f64) -> Self {
        let bins = (0..nbins)
            .map(|i| {
                let bottom = i as f64 * width;
                Bin {
                    bottom,
                    center: bottom + width / 2.0,
                    top: bottom + width,
                    count: 0,
                }
            })
            .collect();
        Self { bins, dropped: 0 }
    }

    /// Count `value` into the first bin whose top lies strictly above it.
    ///
    /// Returns the index of that bin, or [`None`] if no bin takes the value. A value equal to a
    /// bin's top belongs to the next bin, and NaN never finds a bin.
    pub fn add(&mut self, value: f64) -> Option<usize> {
        match self.bins.iter().position(|bin| value < bin.top) {
            Some(idx) => {
                self.bins[idx].count += 1;
                Some(idx)
            }
            None => {
                self.dropped += 1;
                None
            }
        }
    }

    /// Count the times of all `residences`.
    pub fn extend_residences(&mut self, residences: &[Residence]) {
        for residence in residences {
            self.add(residence.time);
        }
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// The number of values that were counted into some bin.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// The number of values that were too large for the last bin.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// The mean residence time, or [`None`] when there are no residences.
pub fn mean_residence_time(residences: &[Residence]) -> Option<f64> {
    if residences.is_empty() {
        return None;
    }
    let sum: f64 = residences.iter().map(|r| r.time).sum();
    Some(sum / residences.len() as f64)
}
