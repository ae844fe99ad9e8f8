//! Frame orchestration for streaming line charts.
//!
//! Every frame runs the same three steps in order: append newly arrived
//! points to each series' GPU segments, recompute the data-to-pixel
//! transform from the model's scales, then draw the visible part of every
//! visible series. Only the transform and per-series uniforms change when
//! the view pans or zooms; point geometry is uploaded once.

use crate::domain::DomainRange;
use crate::error::ChartResult;
use crate::gpu_types::{FrameUniform, LineVertex, SeriesUniform};
use crate::model::ChartModel;
use crate::options::ChartOptions;
use crate::scale::Scale;
use crate::series_lines::SeriesLines;
use crate::stats::{FrameStats, SyncStats};
use crate::types::SeriesId;
use ahash::AHashMap;
use std::sync::Arc;
use streamline_core::profiling::{profile_function, profile_scope};
use streamline_render::wgpu;
use streamline_test_utils::{
    DrawPass, GpuBindGroup, GpuBindGroupLayout, GpuBuffer, GpuRenderPipeline, RenderContext,
    StripPipelineDescriptor,
};

const LINE_SHADER: &str = include_str!("shaders/line.wgsl");

/// Draws every series of a [`ChartModel`] as thick triangle-strip lines.
///
/// GPU geometry for a series is created the first time the series is
/// synced and kept until [`release`](Self::release).
pub struct LineChartRenderer {
    ctx: Arc<dyn RenderContext>,
    options: ChartOptions,
    pipeline: GpuRenderPipeline,
    series_layout: GpuBindGroupLayout,
    frame_buffer: GpuBuffer,
    frame_bind_group: GpuBindGroup,
    frame: FrameUniform,
    viewport: (f32, f32),
    series: AHashMap<SeriesId, SeriesLines>,
}

impl LineChartRenderer {
    /// Build the line pipeline and frame uniforms.
    ///
    /// Fails with [`ChartError::Configuration`](crate::ChartError::Configuration)
    /// if the shader, pipeline or uniform buffer cannot be created.
    pub fn new(
        ctx: Arc<dyn RenderContext>,
        target_format: wgpu::TextureFormat,
        options: &ChartOptions,
    ) -> ChartResult<Self> {
        let frame_layout = ctx.create_uniform_layout(Some("Line Chart Frame Layout"));
        let series_layout = ctx.create_uniform_layout(Some("Line Chart Series Layout"));

        let pipeline = ctx.create_strip_pipeline(&StripPipelineDescriptor {
            label: Some("Line Chart Pipeline"),
            shader_source: LINE_SHADER,
            vertex_stride: LineVertex::STRIDE,
            vertex_attributes: &LineVertex::ATTRIBUTES,
            bind_group_layouts: &[&frame_layout, &series_layout],
            target_format,
        })?;

        let frame_buffer = ctx.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line Chart Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })?;
        let frame_bind_group = ctx.create_uniform_bind_group(
            Some("Line Chart Frame Bind Group"),
            &frame_layout,
            &frame_buffer,
        );

        let frame = FrameUniform::default();
        ctx.write_buffer(&frame_buffer, 0, bytemuck::bytes_of(&frame));

        tracing::debug!(
            ?target_format,
            segment_capacity = options.segment_capacity,
            "Created line chart renderer"
        );

        Ok(Self {
            ctx,
            options: options.clone(),
            pipeline,
            series_layout,
            frame_buffer,
            frame_bind_group,
            frame,
            viewport: (0.0, 0.0),
            series: AHashMap::new(),
        })
    }

    /// Current transform uniform values.
    pub fn frame_uniform(&self) -> &FrameUniform {
        &self.frame
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    /// GPU geometry of a series, if it has been synced.
    pub fn series_lines(&self, id: SeriesId) -> Option<&SeriesLines> {
        self.series.get(&id)
    }

    /// Append new points of every series to its GPU segments, in
    /// declaration order. Does not draw.
    pub fn sync_buffer(&mut self, model: &ChartModel) -> ChartResult<SyncStats> {
        profile_scope!("sync_buffer");

        let mut stats = SyncStats::default();
        for series in model.series() {
            let lines = match self.series.entry(series.id) {
                std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
                std::collections::hash_map::Entry::Vacant(entry) => {
                    tracing::debug!(id = ?series.id, name = %series.options.name, "Creating series geometry");
                    entry.insert(SeriesLines::new(
                        self.ctx.as_ref(),
                        &self.series_layout,
                        self.options.segment_capacity,
                    )?)
                }
            };
            stats += lines.sync(self.ctx.as_ref(), series.data.points(), self.options.base_x)?;
        }
        Ok(stats)
    }

    /// Set the viewport size in pixels and upload the projection scale.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            tracing::trace!(width, height, "Ignoring empty viewport");
            return;
        }
        self.viewport = (width, height);
        self.frame.projection_scale = [2.0 / width, 2.0 / height];
        self.write_frame_uniform();
    }

    /// Recompute the data-to-pixel transform from the model's scales.
    ///
    /// Pixels are measured from the viewport center with y up. Positions in
    /// the vertex buffers are relative to `base_x`, so the transform is
    /// taken from the images of `base_x` and `base_x + 1`.
    pub fn sync_domain(&mut self, model: &ChartModel) {
        let (width, height) = self.viewport;
        let x_scale = model.x_scale();
        let y_scale = model.y_scale();
        let base_x = self.options.base_x;

        let zero_x = x_scale.apply(base_x);
        let one_x = x_scale.apply(base_x + 1.0);
        let zero_y = y_scale.apply(0.0);
        let one_y = y_scale.apply(1.0);

        self.frame.model_scale = [(one_x - zero_x) as f32, (zero_y - one_y) as f32];
        self.frame.model_translation = [
            (zero_x - width as f64 / 2.0) as f32,
            (height as f64 / 2.0 - zero_y) as f32,
        ];
        self.write_frame_uniform();
    }

    fn write_frame_uniform(&self) {
        self.ctx
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&self.frame));
    }

    /// Sync buffers, update the transform, then draw every visible series.
    pub fn draw_frame(
        &mut self,
        model: &ChartModel,
        pass: &mut dyn DrawPass,
    ) -> ChartResult<FrameStats> {
        profile_function!();

        self.sync_buffer(model)?;
        self.sync_domain(model);

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.frame_bind_group);

        let (width, _) = self.viewport;
        let x_scale = model.x_scale();
        let mut stats = FrameStats::default();

        for series in model.series() {
            if !series.options.visible {
                continue;
            }
            let Some(lines) = self.series.get(&series.id) else {
                continue;
            };

            let color = self.options.color_for(&series.options).resolve()?;
            let line_width = self.options.line_width_for(&series.options);
            lines.write_uniform(
                self.ctx.as_ref(),
                &SeriesUniform::new(color.to_array(), line_width),
            );

            // Widen by half a line so quads ending just off-screen still
            // cover the edge pixels.
            let half_width = f64::from(line_width) / 2.0;
            let domain = DomainRange::new(
                x_scale.invert(f64::from(self.options.render_padding_left) - half_width),
                x_scale.invert(
                    f64::from(width) - f64::from(self.options.render_padding_right) + half_width,
                ),
            );

            stats += lines.draw(pass, series.data.points(), domain);
        }

        tracing::trace!(?stats, "Drew frame");
        Ok(stats)
    }

    /// Free every GPU buffer owned by the renderer.
    pub fn release(self) {
        let series = self.series.len();
        for (_, lines) in self.series {
            lines.release(self.ctx.as_ref());
        }
        self.ctx.destroy_buffer(&self.frame_buffer);
        tracing::debug!(series, "Released line chart renderer");
    }
}

impl std::fmt::Debug for LineChartRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineChartRenderer")
            .field("viewport", &self.viewport)
            .field("frame", &self.frame)
            .field("series", &self.series.len())
            .finish()
    }
}
