//! Linear data-to-pixel scales.

/// An invertible scalar mapping between data units and pixels.
pub trait Scale {
    /// Data value to pixel.
    fn apply(&self, value: f64) -> f64;
    /// Pixel to data value.
    fn invert(&self, pixel: f64) -> f64;
}

/// Maps `domain` linearly onto `range`.
///
/// A degenerate domain maps everything to the middle of the range; a
/// degenerate range inverts to the domain start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn with_domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn with_range(mut self, start: f64, end: f64) -> Self {
        self.range = (start, end);
        self
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new((0.0, 1.0), (0.0, 1.0))
    }
}

impl Scale for LinearScale {
    fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) * 0.5;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }
}
