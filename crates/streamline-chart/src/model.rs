//! Chart data model: series, scales and the signals the renderer follows.

use crate::content_box::{Rect, Size};
use crate::domain::{DomainRange, visible_index_range};
use crate::error::{ChartError, ChartResult};
use crate::options::{AxisRange, ChartOptions, SeriesOptions};
use crate::scale::LinearScale;
use crate::types::{DataPoint, Series, SeriesData, SeriesId};
use streamline_core::event::Signal;

/// Fraction of the y extent added above and below the data.
const Y_PADDING: f64 = 0.05;

/// Half-height used when every visible y is equal.
const FLAT_Y_PADDING: f64 = 0.5;

/// Series, scales and change notifications for one chart.
///
/// Data is appended through [`push`](Self::push) / [`extend`](Self::extend),
/// which mark an update as pending. [`update`](Self::update) recomputes the
/// scale domains and emits [`updated`](Self::updated).
pub struct ChartModel {
    series: Vec<Series>,
    next_id: u32,
    x_scale: LinearScale,
    y_scale: LinearScale,
    x_range: AxisRange,
    y_range: AxisRange,
    real_time: bool,
    real_time_window: f64,
    size: Size,
    update_pending: bool,
    /// Fired after [`update`](Self::update) recomputed the domains.
    pub updated: Signal<()>,
    /// Fired after a resize with the new viewport size.
    pub resized: Signal<Size>,
    /// Fired once when the owning chart is torn down.
    pub disposing: Signal<()>,
}

impl ChartModel {
    /// Create a model holding the series declared in `options`.
    pub fn new(options: &ChartOptions) -> Self {
        let mut model = Self {
            series: Vec::with_capacity(options.series.len()),
            next_id: 0,
            x_scale: LinearScale::default(),
            y_scale: LinearScale::default(),
            x_range: options.x_range,
            y_range: options.y_range,
            real_time: options.real_time,
            real_time_window: options.real_time_window,
            size: Size::default(),
            update_pending: false,
            updated: Signal::new("updated"),
            resized: Signal::new("resized"),
            disposing: Signal::new("disposing"),
        };
        for series in &options.series {
            model.add_series(series.clone());
        }
        model
    }

    /// Declare a new, empty series. It is drawn after every existing one.
    pub fn add_series(&mut self, options: SeriesOptions) -> SeriesId {
        let id = SeriesId(self.next_id);
        self.next_id += 1;
        tracing::debug!(?id, name = %options.name, "Added series");
        self.series.push(Series {
            id,
            options,
            data: SeriesData::new(),
        });
        self.request_update();
        id
    }

    /// All series in declaration order.
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn get(&self, id: SeriesId) -> Option<&Series> {
        self.series.iter().find(|s| s.id == id)
    }

    /// Mutable access to a series. Marks an update as pending, since the
    /// caller may change its data or visibility.
    pub fn get_mut(&mut self, id: SeriesId) -> ChartResult<&mut Series> {
        self.update_pending = true;
        self.series
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(ChartError::UnknownSeries(id))
    }

    /// Append one point to a series.
    pub fn push(&mut self, id: SeriesId, point: impl Into<DataPoint>) -> ChartResult<()> {
        self.get_mut(id)?.data.push(point.into())?;
        self.request_update();
        Ok(())
    }

    /// Append several points to a series. Points before a rejected one are
    /// kept.
    pub fn extend<I>(&mut self, id: SeriesId, points: I) -> ChartResult<()>
    where
        I: IntoIterator,
        I::Item: Into<DataPoint>,
    {
        let result = self.get_mut(id)?.data.extend(points);
        self.request_update();
        result
    }

    pub fn set_visible(&mut self, id: SeriesId, visible: bool) -> ChartResult<()> {
        self.get_mut(id)?.options.visible = visible;
        self.request_update();
        Ok(())
    }

    pub fn x_scale(&self) -> &LinearScale {
        &self.x_scale
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y_scale
    }

    /// Viewport size from the last resize.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_x_range(&mut self, range: AxisRange) {
        self.x_range = range;
        self.request_update();
    }

    pub fn set_y_range(&mut self, range: AxisRange) {
        self.y_range = range;
        self.request_update();
    }

    pub fn request_update(&mut self) {
        self.update_pending = true;
    }

    pub fn is_update_pending(&self) -> bool {
        self.update_pending
    }

    /// Recompute the scale domains and notify `updated` subscribers.
    pub fn update(&mut self) {
        self.update_domains();
        self.update_pending = false;
        self.updated.emit(&());
    }

    /// Map the scales onto `content_box` and notify `resized` subscribers.
    pub fn resize(&mut self, width: f32, height: f32, content_box: Rect) {
        self.size = Size::new(width, height);
        self.x_scale.range = (content_box.x as f64, content_box.right() as f64);
        // Pixel y grows downwards.
        self.y_scale.range = (content_box.bottom() as f64, content_box.y as f64);
        tracing::debug!(width, height, ?content_box, "Chart resized");
        self.resized.emit(&self.size);
        self.request_update();
    }

    /// Notify `disposing` subscribers.
    pub fn dispose(&self) {
        self.disposing.emit(&());
    }

    fn update_domains(&mut self) {
        let x_domain = match self.x_range {
            AxisRange::Fixed { min, max } => Some((min, max)),
            AxisRange::Auto => self.auto_x_domain(),
        };
        if let Some((min, max)) = x_domain {
            self.x_scale.domain = (min, max);
        }

        let y_domain = match self.y_range {
            AxisRange::Fixed { min, max } => Some((min, max)),
            AxisRange::Auto => {
                let (min, max) = self.x_scale.domain;
                self.auto_y_domain(DomainRange::new(min, max))
            }
        };
        if let Some((min, max)) = y_domain {
            self.y_scale.domain = (min, max);
        }
    }

    fn auto_x_domain(&self) -> Option<(f64, f64)> {
        let (first, last) = self
            .series
            .iter()
            .filter_map(|s| Some((s.data.first()?.x, s.data.last()?.x)))
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))?;

        if self.real_time {
            Some((last - self.real_time_window, last))
        } else {
            Some((first, last))
        }
    }

    fn auto_y_domain(&self, x_domain: DomainRange) -> Option<(f64, f64)> {
        let (min, max) = self
            .series
            .iter()
            .filter(|s| s.options.visible)
            .flat_map(|s| {
                let points = s.data.points();
                &points[visible_index_range(points, x_domain)]
            })
            .map(|p| p.y)
            .fold(None, |acc: Option<(f64, f64)>, y| match acc {
                Some((min, max)) => Some((min.min(y), max.max(y))),
                None => Some((y, y)),
            })?;

        let span = max - min;
        let pad = if span > 0.0 {
            span * Y_PADDING
        } else {
            FLAT_Y_PADDING
        };
        Some((min - pad, max + pad))
    }
}

impl std::fmt::Debug for ChartModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartModel")
            .field("series", &self.series.len())
            .field("x_scale", &self.x_scale)
            .field("y_scale", &self.y_scale)
            .field("size", &self.size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn model_with(options: ChartOptions) -> (ChartModel, SeriesId) {
        let mut model = ChartModel::new(&options);
        let id = model.add_series(SeriesOptions::new("s"));
        (model, id)
    }

    #[test]
    fn test_declared_series_get_sequential_ids() {
        let options = ChartOptions::new()
            .with_series(SeriesOptions::new("a"))
            .with_series(SeriesOptions::new("b"));
        let model = ChartModel::new(&options);

        let ids: Vec<_> = model.series().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![SeriesId(0), SeriesId(1)]);
        assert_eq!(model.get(SeriesId(1)).unwrap().options.name, "b");
    }

    #[test]
    fn test_push_unknown_series() {
        let mut model = ChartModel::new(&ChartOptions::new());
        let err = model.push(SeriesId(7), (0.0, 0.0)).unwrap_err();
        assert!(matches!(err, ChartError::UnknownSeries(SeriesId(7))));
    }

    #[test]
    fn test_auto_domain_follows_data() {
        let (mut model, id) = model_with(ChartOptions::new());
        model.extend(id, [(0.0, -1.0), (5.0, 3.0), (10.0, 1.0)]).unwrap();
        assert!(model.is_update_pending());

        model.update();
        assert!(!model.is_update_pending());
        assert_eq!(model.x_scale().domain, (0.0, 10.0));
        let (y0, y1) = model.y_scale().domain;
        assert_relative_eq!(y0, -1.2);
        assert_relative_eq!(y1, 3.2);
    }

    #[test]
    fn test_flat_series_gets_nonempty_y_range() {
        let (mut model, id) = model_with(ChartOptions::new());
        model.extend(id, [(0.0, 2.0), (1.0, 2.0)]).unwrap();
        model.update();
        assert_eq!(model.y_scale().domain, (1.5, 2.5));
    }

    #[test]
    fn test_real_time_window() {
        let (mut model, id) = model_with(ChartOptions::new().with_real_time(10.0));
        model
            .extend(id, (0..100).map(|i| (i as f64, (i % 7) as f64)))
            .unwrap();
        model.update();
        assert_eq!(model.x_scale().domain, (89.0, 99.0));
    }

    #[test]
    fn test_fixed_ranges_override() {
        let options = ChartOptions::new()
            .with_x_range(AxisRange::Fixed { min: -5.0, max: 5.0 })
            .with_y_range(AxisRange::Fixed { min: 0.0, max: 1.0 });
        let (mut model, id) = model_with(options);
        model.extend(id, [(0.0, 100.0), (1.0, 200.0)]).unwrap();
        model.update();

        assert_eq!(model.x_scale().domain, (-5.0, 5.0));
        assert_eq!(model.y_scale().domain, (0.0, 1.0));
    }

    #[test]
    fn test_resize_maps_scales_to_content_box() {
        let (mut model, _) = model_with(ChartOptions::new());
        let seen = Rc::new(Cell::new(Size::default()));
        let sink = seen.clone();
        model.resized.connect(move |size| sink.set(*size));

        model.resize(800.0, 600.0, Rect::new(30.0, 10.0, 760.0, 570.0));

        assert_eq!(seen.get(), Size::new(800.0, 600.0));
        assert_eq!(model.x_scale().range, (30.0, 790.0));
        assert_eq!(model.y_scale().range, (580.0, 10.0));
    }

    #[test]
    fn test_update_emits_signal() {
        let (mut model, _) = model_with(ChartOptions::new());
        let count = Rc::new(Cell::new(0));
        let sink = count.clone();
        model.updated.connect(move |_| sink.set(sink.get() + 1));

        model.update();
        model.update();
        assert_eq!(count.get(), 2);
    }
}
