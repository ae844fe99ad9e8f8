//! The [`TimeChart`] facade tying model, layout and renderer together.

use crate::content_box::{ContentBoxDetector, Rect};
use crate::error::ChartResult;
use crate::model::ChartModel;
use crate::options::{ChartOptions, SeriesOptions};
use crate::renderer::LineChartRenderer;
use crate::stats::FrameStats;
use crate::types::{DataPoint, SeriesId};
use std::sync::Arc;
use streamline_render::wgpu;
use streamline_test_utils::{DrawPass, RenderContext};

/// A streaming line chart.
///
/// Events are dispatched in a fixed order:
///
/// - [`resize`](Self::resize): content box, model scales, `resized` signal,
///   renderer projection.
/// - [`render`](Self::render): model update (`updated` signal), then the
///   renderer's sync / transform / draw.
/// - [`dispose`](Self::dispose): `disposing` signal, content box, then every
///   GPU buffer is released.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use streamline_chart::{ChartOptions, SeriesOptions, TimeChart};
/// use streamline_render::{GraphicsContext, wgpu};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let graphics = GraphicsContext::new_owned_sync()?;
/// let options = ChartOptions::new().with_series(SeriesOptions::new("signal"));
/// let mut chart = TimeChart::new(graphics, wgpu::TextureFormat::Rgba8UnormSrgb, options)?;
///
/// let id = chart.model().series()[0].id;
/// chart.extend(id, (0..1000).map(|i| (i as f64, (i as f64 * 0.01).sin())))?;
/// chart.resize(800.0, 600.0);
/// # Ok(())
/// # }
/// ```
pub struct TimeChart {
    model: ChartModel,
    options: ChartOptions,
    content_box: ContentBoxDetector,
    renderer: LineChartRenderer,
}

impl TimeChart {
    /// Create a chart drawing into targets of `target_format`.
    ///
    /// Colors are resolved up front so a bad color string fails here rather
    /// than on the first frame.
    pub fn new(
        ctx: Arc<dyn RenderContext>,
        target_format: wgpu::TextureFormat,
        options: ChartOptions,
    ) -> ChartResult<Self> {
        options.color.resolve()?;
        for series in &options.series {
            options.color_for(series).resolve()?;
        }

        let renderer = LineChartRenderer::new(ctx, target_format, &options)?;
        let model = ChartModel::new(&options);
        let content_box = ContentBoxDetector::new(options.padding);

        tracing::info!(series = options.series.len(), "Created time chart");

        Ok(Self {
            model,
            options,
            content_box,
            renderer,
        })
    }

    pub fn model(&self) -> &ChartModel {
        &self.model
    }

    /// Mutable model access, for range changes and signal subscriptions.
    pub fn model_mut(&mut self) -> &mut ChartModel {
        &mut self.model
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn renderer(&self) -> &LineChartRenderer {
        &self.renderer
    }

    pub fn content_box(&self) -> Rect {
        self.content_box.content_box()
    }

    pub fn add_series(&mut self, options: SeriesOptions) -> ChartResult<SeriesId> {
        self.options.color_for(&options).resolve()?;
        Ok(self.model.add_series(options))
    }

    pub fn push(&mut self, id: SeriesId, point: impl Into<DataPoint>) -> ChartResult<()> {
        self.model.push(id, point)
    }

    pub fn extend<I>(&mut self, id: SeriesId, points: I) -> ChartResult<()>
    where
        I: IntoIterator,
        I::Item: Into<DataPoint>,
    {
        self.model.extend(id, points)
    }

    /// Resize the viewport to `width` x `height` pixels.
    pub fn resize(&mut self, width: f32, height: f32) {
        let content_box = self.content_box.on_resize(width, height);
        self.model.resize(width, height, content_box);
        self.renderer.on_resize(width, height);
    }

    /// Draw one frame into `pass`, first updating the model if anything
    /// changed since the last frame.
    pub fn render(&mut self, pass: &mut dyn DrawPass) -> ChartResult<FrameStats> {
        if self.model.is_update_pending() {
            self.model.update();
        }
        self.renderer.draw_frame(&self.model, pass)
    }

    /// Tear the chart down and free its GPU buffers.
    pub fn dispose(mut self) {
        self.model.dispose();
        self.content_box.dispose();
        self.renderer.release();
        tracing::info!("Disposed time chart");
    }
}

impl std::fmt::Debug for TimeChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeChart")
            .field("model", &self.model)
            .field("content_box", &self.content_box)
            .field("renderer", &self.renderer)
            .finish()
    }
}
