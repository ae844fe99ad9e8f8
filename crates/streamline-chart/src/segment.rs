//! Fixed-capacity vertex buffer holding one run of a series' line quads.
//!
//! A segment owns the geometry for the global point indices
//! `first_index..first_index + len`. Each point `i` contributes the quad for
//! the line `i - 1 -> i`, so index 0 never owns geometry and `first_index` is
//! always at least 1.
//!
//! # Buffer layout
//!
//! ```text
//! slot 0            slot 1                  slot capacity - 1     slot capacity
//! [p0,+d p0,-d p1,+d p1,-d] [p1,+d ...]  ...  [...]                 [bridge]
//! ```
//!
//! The extra slot holds the bridge quad: the last point with the direction
//! toward the first point of the next segment. Drawing its first two
//! vertices closes the strip join between the two buffers.

use crate::error::{ChartError, ChartResult};
use crate::gpu_types::{LineVertex, POINT_STRIDE, VERTICES_PER_POINT};
use crate::types::DataPoint;
use glam::DVec2;
use std::ops::Range;
use streamline_core::profiling::profile_scope;
use streamline_render::wgpu;
use streamline_test_utils::{DrawPass, GpuBuffer, RenderContext};

/// Bridge vertices drawn after a full segment to join the next one.
const BRIDGE_JOIN_VERTICES: u32 = 2;

/// Normalized direction from `prev` to `cur`.
///
/// Coincident points have no direction of their own and reuse `fallback`
/// (the previous quad's direction, or zero at the start of a series), so
/// the result is always finite.
pub fn line_direction(prev: DVec2, cur: DVec2, fallback: DVec2) -> DVec2 {
    (cur - prev).try_normalize().unwrap_or(fallback)
}

/// One GPU vertex buffer of line quads.
pub struct Segment {
    buffer: GpuBuffer,
    first_index: usize,
    len: usize,
    capacity: usize,
    has_bridge: bool,
    /// Direction of the last written quad, carried into coincident points.
    last_direction: DVec2,
    /// Reused between appends to avoid per-sync allocation.
    scratch: Vec<LineVertex>,
}

impl Segment {
    /// Allocate a segment that starts at `first_index`.
    ///
    /// `prev_direction` is the last direction of the preceding segment, used
    /// when this segment's first point coincides with its predecessor.
    pub fn new(
        ctx: &dyn RenderContext,
        first_index: usize,
        capacity: usize,
        prev_direction: DVec2,
    ) -> ChartResult<Self> {
        if first_index == 0 {
            return Err(ChartError::Assertion(
                "segment cannot start at point 0".to_string(),
            ));
        }
        if capacity == 0 {
            return Err(ChartError::Assertion(
                "segment capacity must be at least 1".to_string(),
            ));
        }

        // One extra slot for the bridge quad.
        let size = (capacity as u64 + 1) * POINT_STRIDE;
        let buffer = ctx.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line Segment Vertex Buffer"),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })?;

        tracing::debug!(first_index, capacity, size, "Created line segment");

        Ok(Self {
            buffer,
            first_index,
            len: 0,
            capacity,
            has_bridge: false,
            last_direction: prev_direction,
            scratch: Vec::new(),
        })
    }

    /// Global index of the first point with geometry in this segment.
    pub fn first_index(&self) -> usize {
        self.first_index
    }

    /// Number of points with geometry written.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    pub fn has_bridge(&self) -> bool {
        self.has_bridge
    }

    /// Global index of the next point this segment would write.
    pub fn next_index(&self) -> usize {
        self.first_index + self.len
    }

    /// Direction of the last quad written, or the inherited one if none.
    pub fn last_direction(&self) -> DVec2 {
        self.last_direction
    }

    pub fn buffer(&self) -> &GpuBuffer {
        &self.buffer
    }

    /// Forget the written geometry. The GPU buffer is kept and not zeroed.
    pub fn clear(&mut self) {
        self.len = 0;
        self.has_bridge = false;
    }

    /// Free the GPU buffer. Consumes the segment, so it runs exactly once.
    pub fn release(mut self, ctx: &dyn RenderContext) {
        self.clear();
        ctx.destroy_buffer(&self.buffer);
        tracing::trace!(first_index = self.first_index, "Released line segment");
    }

    /// Write quads for every point past [`next_index`](Self::next_index)
    /// that fits, and the bridge once this segment is full and a following
    /// point exists.
    ///
    /// Only the newly written vertices are uploaded. Returns the global index
    /// of the next point to process.
    pub fn append_available(
        &mut self,
        ctx: &dyn RenderContext,
        points: &[DataPoint],
        base_x: f64,
    ) -> usize {
        profile_scope!("segment_append");

        let start = self.next_index();
        let count = points
            .len()
            .saturating_sub(start)
            .min(self.capacity - self.len);

        if count > 0 {
            self.scratch.clear();
            self.scratch.reserve(count * VERTICES_PER_POINT);

            let mut prev = to_local(&points[start - 1], base_x);
            let mut direction = self.last_direction;
            for point in &points[start..start + count] {
                let cur = to_local(point, base_x);
                direction = line_direction(prev, cur, direction);
                push_quad(&mut self.scratch, prev, cur, direction);
                prev = cur;
            }

            let offset = self.len as u64 * POINT_STRIDE;
            ctx.write_buffer(&self.buffer, offset, bytemuck::cast_slice(&self.scratch));

            self.len += count;
            self.last_direction = direction;

            tracing::trace!(
                first_index = self.first_index,
                count,
                offset,
                len = self.len,
                "Uploaded line quads"
            );
        }

        let next = self.next_index();
        if self.is_full() && !self.has_bridge && next < points.len() {
            self.write_bridge(ctx, &points[next - 1], &points[next], base_x);
        }

        next
    }

    fn write_bridge(
        &mut self,
        ctx: &dyn RenderContext,
        last: &DataPoint,
        next: &DataPoint,
        base_x: f64,
    ) {
        let last = to_local(last, base_x);
        let next = to_local(next, base_x);
        let direction = line_direction(last, next, self.last_direction);

        self.scratch.clear();
        push_quad(&mut self.scratch, last, next, direction);

        let offset = self.capacity as u64 * POINT_STRIDE;
        ctx.write_buffer(&self.buffer, offset, bytemuck::cast_slice(&self.scratch));
        self.has_bridge = true;

        tracing::trace!(first_index = self.first_index, offset, "Wrote bridge quad");
    }

    /// Local point range `[start, end)` that `range` (global indices)
    /// covers in this segment.
    pub fn local_range(&self, range: &Range<usize>) -> Range<usize> {
        let start = range.start.max(self.first_index) - self.first_index;
        let end = range
            .end
            .min(self.next_index())
            .saturating_sub(self.first_index);
        start..end.max(start)
    }

    /// Draw the quads for the global point indices in `range`.
    ///
    /// Assumes the pipeline and bind groups are set. Returns the number of
    /// vertices drawn, or `None` if the range misses this segment.
    pub fn draw(&self, pass: &mut dyn DrawPass, range: &Range<usize>) -> Option<u32> {
        let local = self.local_range(range);
        if local.is_empty() {
            return None;
        }

        let start = (local.start * VERTICES_PER_POINT) as u32;
        let mut end = (local.end * VERTICES_PER_POINT) as u32;
        if self.has_bridge && local.end == self.len && range.end > self.next_index() {
            end += BRIDGE_JOIN_VERTICES;
        }

        pass.set_vertex_buffer(0, &self.buffer);
        pass.draw(start..end);
        Some(end - start)
    }
}

impl std::fmt::Debug for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Segment")
            .field("first_index", &self.first_index)
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("has_bridge", &self.has_bridge)
            .finish()
    }
}

fn to_local(point: &DataPoint, base_x: f64) -> DVec2 {
    DVec2::new(point.x - base_x, point.y)
}

fn push_quad(out: &mut Vec<LineVertex>, prev: DVec2, cur: DVec2, direction: DVec2) {
    out.extend_from_slice(&[
        LineVertex::new(prev, direction),
        LineVertex::new(prev, -direction),
        LineVertex::new(cur, direction),
        LineVertex::new(cur, -direction),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamline_test_utils::{MockDrawPass, MockRenderContext};

    fn points(coords: &[(f64, f64)]) -> Vec<DataPoint> {
        coords.iter().map(|&p| DataPoint::from(p)).collect()
    }

    fn vertices(bytes: &[u8]) -> Vec<LineVertex> {
        bytes
            .chunks_exact(LineVertex::STRIDE as usize)
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }

    #[test]
    fn test_line_direction_normalizes() {
        let dir = line_direction(DVec2::ZERO, DVec2::new(3.0, 4.0), DVec2::ZERO);
        assert!((dir - DVec2::new(0.6, 0.8)).length() < 1e-12);
    }

    #[test]
    fn test_line_direction_coincident_uses_fallback() {
        let p = DVec2::new(1.0, 1.0);
        assert_eq!(line_direction(p, p, DVec2::X), DVec2::X);
        assert_eq!(line_direction(p, p, DVec2::ZERO), DVec2::ZERO);
    }

    #[test]
    fn test_new_rejects_index_zero() {
        let ctx = MockRenderContext::new();
        assert!(matches!(
            Segment::new(&ctx, 0, 4, DVec2::ZERO),
            Err(ChartError::Assertion(_))
        ));
        assert_eq!(ctx.count_buffer_creates(), 0);
    }

    #[test]
    fn test_buffer_sized_for_capacity_plus_bridge() {
        let ctx = MockRenderContext::new();
        let segment = Segment::new(&ctx, 1, 8, DVec2::ZERO).unwrap();
        let id = segment.buffer().mock_id().unwrap();
        assert_eq!(ctx.buffer_size(id), Some(9 * 64));
    }

    #[test]
    fn test_buffer_limit_is_configuration_error() {
        let ctx = MockRenderContext::new().with_max_buffer_size(1024);
        let err = Segment::new(&ctx, 1, 1024, DVec2::ZERO).unwrap_err();
        assert!(matches!(err, ChartError::Configuration(_)));
    }

    #[test]
    fn test_vertex_order_per_point() {
        let ctx = MockRenderContext::new();
        let data = points(&[(0.0, 0.0), (1.0, 0.0)]);
        let mut segment = Segment::new(&ctx, 1, 4, DVec2::ZERO).unwrap();

        assert_eq!(segment.append_available(&ctx, &data, 0.0), 2);

        let writes = ctx.writes_to(segment.buffer().mock_id().unwrap());
        assert_eq!(writes.len(), 1);
        let quad = vertices(&writes[0].1);
        assert_eq!(
            quad,
            vec![
                LineVertex {
                    position: [0.0, 0.0],
                    direction: [1.0, 0.0]
                },
                LineVertex {
                    position: [0.0, 0.0],
                    direction: [-1.0, 0.0]
                },
                LineVertex {
                    position: [1.0, 0.0],
                    direction: [1.0, 0.0]
                },
                LineVertex {
                    position: [1.0, 0.0],
                    direction: [-1.0, 0.0]
                },
            ]
        );
    }

    #[test]
    fn test_partial_upload_offsets() {
        let ctx = MockRenderContext::new();
        let mut data = points(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        let mut segment = Segment::new(&ctx, 1, 8, DVec2::ZERO).unwrap();

        assert_eq!(segment.append_available(&ctx, &data, 0.0), 3);
        data.push(DataPoint::new(3.0, 1.0));
        assert_eq!(segment.append_available(&ctx, &data, 0.0), 4);

        let writes = ctx.writes_to(segment.buffer().mock_id().unwrap());
        assert_eq!(writes.len(), 2);
        assert_eq!((writes[0].0, writes[0].1.len()), (0, 2 * 64));
        assert_eq!((writes[1].0, writes[1].1.len()), (2 * 64, 64));
        assert_eq!(segment.len(), 3);
    }

    #[test]
    fn test_no_upload_without_new_points() {
        let ctx = MockRenderContext::new();
        let data = points(&[(0.0, 0.0), (1.0, 1.0)]);
        let mut segment = Segment::new(&ctx, 1, 8, DVec2::ZERO).unwrap();
        segment.append_available(&ctx, &data, 0.0);
        ctx.clear_calls();

        assert_eq!(segment.append_available(&ctx, &data, 0.0), 2);
        assert_eq!(ctx.count_buffer_writes(), 0);
    }

    #[test]
    fn test_base_x_is_subtracted() {
        let ctx = MockRenderContext::new();
        let data = points(&[(1.0e12, 2.0), (1.0e12 + 1.0, 2.0)]);
        let mut segment = Segment::new(&ctx, 1, 2, DVec2::ZERO).unwrap();
        segment.append_available(&ctx, &data, 1.0e12);

        let quad = vertices(&ctx.writes_to(segment.buffer().mock_id().unwrap())[0].1);
        assert_eq!(quad[0].position, [0.0, 2.0]);
        assert_eq!(quad[2].position, [1.0, 2.0]);
    }

    #[test]
    fn test_coincident_points_stay_finite() {
        let ctx = MockRenderContext::new();
        let data = points(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.0, 0.0)]);
        let mut segment = Segment::new(&ctx, 1, 8, DVec2::ZERO).unwrap();
        segment.append_available(&ctx, &data, 0.0);

        let quads = vertices(&ctx.writes_to(segment.buffer().mock_id().unwrap())[0].1);
        assert!(quads.iter().flat_map(|v| v.direction).all(f32::is_finite));
        // No previous direction: zero-width quad.
        assert_eq!(quads[0].direction, [0.0, 0.0]);
        // Repeated point after a real line reuses that line's direction.
        assert_eq!(quads[8].direction, [1.0, 0.0]);
    }

    #[test]
    fn test_bridge_written_when_next_point_arrives_later() {
        let ctx = MockRenderContext::new();
        let mut data = points(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        let mut segment = Segment::new(&ctx, 1, 2, DVec2::ZERO).unwrap();

        assert_eq!(segment.append_available(&ctx, &data, 0.0), 3);
        assert!(segment.is_full());
        assert!(!segment.has_bridge());

        data.push(DataPoint::new(3.0, 1.0));
        assert_eq!(segment.append_available(&ctx, &data, 0.0), 3);
        assert!(segment.has_bridge());

        let writes = ctx.writes_to(segment.buffer().mock_id().unwrap());
        let (offset, bytes) = writes.last().unwrap();
        assert_eq!(*offset, 2 * 64);
        let bridge = vertices(bytes);
        assert_eq!(bridge[0].position, [2.0, 0.0]);
        assert_eq!(bridge[2].position, [3.0, 1.0]);
    }

    #[test]
    fn test_draw_clamps_to_local_range() {
        let ctx = MockRenderContext::new();
        let data = points(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0), (4.0, 0.0)]);
        let mut segment = Segment::new(&ctx, 1, 8, DVec2::ZERO).unwrap();
        segment.append_available(&ctx, &data, 0.0);

        let mut pass = MockDrawPass::new();
        assert_eq!(segment.draw(&mut pass, &(2..4)), Some(8));
        assert_eq!(segment.draw(&mut pass, &(0..99)), Some(16));
        assert_eq!(segment.draw(&mut pass, &(5..9)), None);
        assert_eq!(segment.draw(&mut pass, &(0..1)), None);

        let draws = pass.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].vertices, 4..12);
        assert_eq!(draws[1].vertices, 0..16);
    }

    #[test]
    fn test_draw_extends_into_bridge_only_when_range_continues() {
        let ctx = MockRenderContext::new();
        let data = points(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0)]);
        let mut segment = Segment::new(&ctx, 1, 2, DVec2::ZERO).unwrap();
        segment.append_available(&ctx, &data, 0.0);
        assert!(segment.has_bridge());

        let mut pass = MockDrawPass::new();
        assert_eq!(segment.draw(&mut pass, &(1..3)), Some(8));
        assert_eq!(segment.draw(&mut pass, &(1..4)), Some(10));
    }

    #[test]
    fn test_clear_keeps_buffer_and_release_destroys_once() {
        let ctx = MockRenderContext::new();
        let data = points(&[(0.0, 0.0), (1.0, 1.0)]);
        let mut segment = Segment::new(&ctx, 1, 4, DVec2::ZERO).unwrap();
        segment.append_available(&ctx, &data, 0.0);

        segment.clear();
        assert!(segment.is_empty());
        assert_eq!(ctx.count_buffer_destroys(), 0);

        segment.release(&ctx);
        assert_eq!(ctx.count_buffer_destroys(), 1);
        assert_eq!(ctx.live_buffer_count(), 0);
    }
}
