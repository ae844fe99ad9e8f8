//! Visible-domain lookup over x-sorted data.

use crate::types::DataPoint;

/// A closed interval `[min, max]` on the x axis, in data units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainRange {
    pub min: f64,
    pub max: f64,
}

impl DomainRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `[min, max]` intersects `[start, end]`.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.min <= end && self.max >= start
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Lower-bound search restricted to the window `seq[lo..hi]`.
///
/// Returns the smallest `i` in `lo..hi` with `key(&seq[i]) >= target`, or
/// `hi` when every key in the window is below `target`. Equal keys resolve
/// to the first match. `hi` is clamped to `seq.len()`; an empty window
/// returns `lo`. Keys must be non-decreasing over the window.
///
/// ```
/// use streamline_chart::domain_search;
///
/// let xs = [0.0, 1.0, 1.0, 2.0, 5.0];
/// assert_eq!(domain_search(&xs, 0, xs.len(), 1.0, |x| *x), 1);
/// assert_eq!(domain_search(&xs, 0, xs.len(), 3.0, |x| *x), 4);
/// assert_eq!(domain_search(&xs, 0, xs.len(), 9.0, |x| *x), 5);
/// assert_eq!(domain_search(&xs, 2, 4, 0.0, |x| *x), 2);
/// ```
pub fn domain_search<T>(
    seq: &[T],
    lo: usize,
    hi: usize,
    target: f64,
    key: impl Fn(&T) -> f64,
) -> usize {
    let hi = hi.min(seq.len());
    if lo >= hi {
        return lo;
    }
    lo + seq[lo..hi].partition_point(|item| key(item) < target)
}

/// Map a visible domain to the half-open range of point indices whose line
/// segments can touch it.
///
/// The start is the first point with `x >= domain.min` (its segment enters
/// from the left); the end is one past the first point with
/// `x >= domain.max`, clamped to the last point.
pub fn visible_index_range(points: &[DataPoint], domain: DomainRange) -> std::ops::Range<usize> {
    if points.is_empty() {
        return 0..0;
    }
    let key = |p: &DataPoint| p.x;
    let min_index = domain_search(points, 0, points.len(), domain.min, key);
    let max_index = domain_search(points, min_index, points.len() - 1, domain.max, key) + 1;
    min_index..max_index.min(points.len())
}
