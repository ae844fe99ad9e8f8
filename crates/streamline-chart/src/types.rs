//! Series data types.

use crate::error::{ChartError, ChartResult};
use crate::options::SeriesOptions;

/// A single (x, y) sample in data space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for DataPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Stable identity of a series within one chart.
///
/// Ids are handed out in declaration order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(pub u32);

/// The point sequence of one series, kept sorted by x.
///
/// Appends are validated so x never decreases. `truncate`/`clear` exist for
/// callers that reset a chart, but a renderer that already buffered the
/// removed points will refuse to sync afterwards.
#[derive(Debug, Clone, Default)]
pub struct SeriesData {
    points: Vec<DataPoint>,
}

impl SeriesData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from points that are already sorted by x.
    pub fn from_points(points: Vec<DataPoint>) -> ChartResult<Self> {
        let mut data = Self::new();
        data.extend(points)?;
        Ok(data)
    }

    /// Append one point. x must be finite and not below the last x.
    pub fn push(&mut self, point: DataPoint) -> ChartResult<()> {
        if !point.x.is_finite() {
            return Err(ChartError::NonFiniteX {
                index: self.points.len(),
                x: point.x,
            });
        }
        if let Some(last) = self.points.last()
            && point.x < last.x
        {
            return Err(ChartError::NonMonotonic {
                index: self.points.len(),
                previous: last.x,
                x: point.x,
            });
        }
        self.points.push(point);
        Ok(())
    }

    /// Append several points. On error, points before the offending one are
    /// kept.
    pub fn extend<I>(&mut self, points: I) -> ChartResult<()>
    where
        I: IntoIterator,
        I::Item: Into<DataPoint>,
    {
        for point in points {
            self.push(point.into())?;
        }
        Ok(())
    }

    pub fn truncate(&mut self, len: usize) {
        self.points.truncate(len);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&DataPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&DataPoint> {
        self.points.last()
    }
}

/// A series: its configuration plus its data.
#[derive(Debug, Clone)]
pub struct Series {
    pub id: SeriesId,
    pub options: SeriesOptions,
    pub data: SeriesData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_rejects_decreasing_x() {
        let mut data = SeriesData::new();
        data.push(DataPoint::new(1.0, 0.0)).unwrap();
        data.push(DataPoint::new(1.0, 5.0)).unwrap();

        let err = data.push(DataPoint::new(0.5, 0.0)).unwrap_err();
        assert!(matches!(err, ChartError::NonMonotonic { index: 2, .. }));
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_push_rejects_non_finite_x() {
        let mut data = SeriesData::new();
        data.push(DataPoint::new(5.0, 0.0)).unwrap();

        for x in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = data.push(DataPoint::new(x, 0.0)).unwrap_err();
            assert!(matches!(err, ChartError::NonFiniteX { index: 1, .. }));
        }
        assert_eq!(data.len(), 1);

        // A rejected NaN must not open the door to a smaller x.
        assert!(matches!(
            data.push(DataPoint::new(1.0, 0.0)),
            Err(ChartError::NonMonotonic { index: 1, .. })
        ));
        assert_eq!(data.points(), &[DataPoint::new(5.0, 0.0)]);
    }

    #[test]
    fn test_nan_y_is_accepted() {
        let mut data = SeriesData::new();
        data.push(DataPoint::new(0.0, f64::NAN)).unwrap();
        data.push(DataPoint::new(1.0, 0.0)).unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_extend_keeps_prefix_on_error() {
        let mut data = SeriesData::new();
        let result = data.extend([(0.0, 0.0), (1.0, 1.0), (0.0, 2.0), (3.0, 3.0)]);

        assert!(result.is_err());
        assert_eq!(data.len(), 2);
        assert_eq!(data.last(), Some(&DataPoint::new(1.0, 1.0)));
    }
}
