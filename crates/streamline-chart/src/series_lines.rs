//! Per-series segment list kept in step with a growing point sequence.

use crate::domain::{DomainRange, visible_index_range};
use crate::error::{ChartError, ChartResult};
use crate::gpu_types::SeriesUniform;
use crate::segment::Segment;
use crate::stats::{FrameStats, SyncStats};
use crate::types::DataPoint;
use glam::DVec2;
use std::ops::Range;
use streamline_core::profiling::profile_scope;
use streamline_render::wgpu;
use streamline_test_utils::{DrawPass, GpuBindGroup, GpuBindGroupLayout, GpuBuffer, RenderContext};

/// GPU geometry for one series.
///
/// Segments are created in index order and never reordered, so the segment
/// owning global point `i` is `(i - 1) / capacity`.
pub struct SeriesLines {
    segments: Vec<Segment>,
    capacity: usize,
    uniform_buffer: GpuBuffer,
    bind_group: GpuBindGroup,
}

impl SeriesLines {
    /// Create an empty series with its own uniform buffer bound through
    /// `layout` (bind group 1 of the line pipeline).
    pub fn new(
        ctx: &dyn RenderContext,
        layout: &GpuBindGroupLayout,
        capacity: usize,
    ) -> ChartResult<Self> {
        if capacity == 0 {
            return Err(ChartError::Assertion(
                "segment capacity must be at least 1".to_string(),
            ));
        }

        let uniform_buffer = ctx.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line Series Uniform Buffer"),
            size: std::mem::size_of::<SeriesUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })?;
        let bind_group =
            ctx.create_uniform_bind_group(Some("Line Series Bind Group"), layout, &uniform_buffer);

        Ok(Self {
            segments: Vec::new(),
            capacity,
            uniform_buffer,
            bind_group,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// One past the last point with geometry, or 0 before the first sync.
    pub fn covered(&self) -> usize {
        self.segments.last().map_or(0, Segment::next_index)
    }

    /// Upload color and line width for the next draw.
    pub fn write_uniform(&self, ctx: &dyn RenderContext, uniform: &SeriesUniform) {
        ctx.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniform));
    }

    /// Append geometry for every point added since the last sync.
    ///
    /// Fails with [`ChartError::UnsupportedMutation`] if `points` is shorter
    /// than what is already buffered.
    pub fn sync(
        &mut self,
        ctx: &dyn RenderContext,
        points: &[DataPoint],
        base_x: f64,
    ) -> ChartResult<SyncStats> {
        profile_scope!("series_sync");

        let mut stats = SyncStats::default();
        let data_len = points.len();

        if self.segments.is_empty() {
            // A single point has no line to draw.
            if data_len < 2 {
                return Ok(stats);
            }
            self.segments
                .push(Segment::new(ctx, 1, self.capacity, DVec2::ZERO)?);
            stats.segments_created += 1;
        }

        let covered = self.covered();
        if covered == data_len {
            return Ok(stats);
        }
        if covered > data_len {
            tracing::error!(buffered = covered, data_len, "Series data shrank");
            return Err(ChartError::UnsupportedMutation {
                buffered: covered,
                data_len,
            });
        }

        loop {
            let Some(active) = self.segments.last_mut() else {
                return Err(ChartError::Assertion("series lost its segments".to_string()));
            };
            let before = active.next_index();
            let next = active.append_available(ctx, points, base_x);
            stats.points_uploaded += next - before;

            if next >= data_len {
                break;
            }

            let segment = Segment::new(ctx, next, self.capacity, active.last_direction())?;
            self.segments.push(segment);
            stats.segments_created += 1;
        }

        let covered = self.covered();
        if covered != data_len {
            return Err(ChartError::Assertion(format!(
                "buffered {covered} points after sync but series has {data_len}"
            )));
        }

        tracing::trace!(
            segments = self.segments.len(),
            uploaded = stats.points_uploaded,
            "Synced series geometry"
        );
        Ok(stats)
    }

    /// Indices of the segments holding quads for `range`.
    fn segment_span(&self, range: &Range<usize>) -> Range<usize> {
        let start = range.start.max(1);
        if self.segments.is_empty() || start >= range.end {
            return 0..0;
        }
        let first = (start - 1) / self.capacity;
        let last = ((range.end - 2) / self.capacity).min(self.segments.len() - 1);
        first..last + 1
    }

    /// Draw the part of the series that falls inside `domain`.
    ///
    /// Binds this series' uniforms to group 1; the pipeline and group 0 must
    /// already be set.
    pub fn draw(
        &self,
        pass: &mut dyn DrawPass,
        points: &[DataPoint],
        domain: DomainRange,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return stats;
        };
        if self.segments.is_empty() || !domain.overlaps(first.x, last.x) {
            return stats;
        }

        let visible = visible_index_range(points, domain);
        let range = visible.start..visible.end.min(self.covered());
        let span = self.segment_span(&range);
        if span.is_empty() {
            return stats;
        }

        pass.set_bind_group(1, &self.bind_group);
        for segment in &self.segments[span] {
            if let Some(vertices) = segment.draw(pass, &range) {
                stats.segments_drawn += 1;
                stats.vertices_drawn += u64::from(vertices);
            }
        }
        if stats.segments_drawn > 0 {
            stats.series_drawn = 1;
        }

        tracing::trace!(?range, segments = stats.segments_drawn, "Drew series");
        stats
    }

    /// Free every segment buffer and the uniform buffer.
    pub fn release(self, ctx: &dyn RenderContext) {
        let segments = self.segments.len();
        for segment in self.segments {
            segment.release(ctx);
        }
        ctx.destroy_buffer(&self.uniform_buffer);
        tracing::debug!(segments, "Released series geometry");
    }
}

impl std::fmt::Debug for SeriesLines {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesLines")
            .field("segments", &self.segments)
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamline_test_utils::MockRenderContext;

    fn lines(ctx: &MockRenderContext, capacity: usize) -> SeriesLines {
        let layout = ctx.create_uniform_layout(None);
        SeriesLines::new(ctx, &layout, capacity).unwrap()
    }

    #[test]
    fn test_segment_span() {
        let ctx = MockRenderContext::new();
        let mut series = lines(&ctx, 2);
        let data: Vec<DataPoint> = (0..8).map(|i| DataPoint::new(i as f64, 0.0)).collect();
        series.sync(&ctx, &data, 0.0).unwrap();
        assert_eq!(series.segments().len(), 4);

        assert_eq!(series.segment_span(&(1..4)), 0..2);
        assert_eq!(series.segment_span(&(1..3)), 0..1);
        assert_eq!(series.segment_span(&(0..1)), 0..0);
        assert_eq!(series.segment_span(&(5..8)), 2..4);
        assert_eq!(series.segment_span(&(7..99)), 3..4);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let ctx = MockRenderContext::new();
        let layout = ctx.create_uniform_layout(None);
        assert!(matches!(
            SeriesLines::new(&ctx, &layout, 0),
            Err(ChartError::Assertion(_))
        ));
    }
}
