//! GPU data layouts for line rendering.

use bytemuck::{Pod, Zeroable};
use glam::DVec2;
use streamline_render::wgpu;

/// Vertices written per data point: two anchors, each on both sides.
pub const VERTICES_PER_POINT: usize = 4;

/// One triangle-strip vertex.
///
/// `position` is the anchor in data units relative to the chart's `base_x`.
/// `direction` is the unit line direction; its sign selects the side the
/// shader offsets the vertex to.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Default, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub direction: [f32; 2],
}

impl LineVertex {
    pub fn new(position: DVec2, direction: DVec2) -> Self {
        Self {
            position: position.as_vec2().to_array(),
            direction: direction.as_vec2().to_array(),
        }
    }

    /// Vertex attributes for slot 0.
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
        // position
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x2,
        },
        // direction
        wgpu::VertexAttribute {
            offset: 8,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x2,
        },
    ];

    pub const STRIDE: u64 = std::mem::size_of::<Self>() as u64;
}

static_assertions::assert_eq_size!(LineVertex, [u8; 16]);

/// Bytes of one data point's quad.
pub const POINT_STRIDE: u64 = LineVertex::STRIDE * VERTICES_PER_POINT as u64;

/// Frame-wide transform, bind group 0.
///
/// `pixel = model_scale * position + model_translation` is measured from the
/// viewport center with y up; `projection_scale` takes pixels to clip space.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub projection_scale: [f32; 2],
    pub model_scale: [f32; 2],
    pub model_translation: [f32; 2],
    _pad: [f32; 2],
}

impl FrameUniform {
    pub fn new(
        projection_scale: [f32; 2],
        model_scale: [f32; 2],
        model_translation: [f32; 2],
    ) -> Self {
        Self {
            projection_scale,
            model_scale,
            model_translation,
            _pad: [0.0; 2],
        }
    }
}

impl Default for FrameUniform {
    fn default() -> Self {
        Self::new([1.0, 1.0], [1.0, 1.0], [0.0, 0.0])
    }
}

static_assertions::assert_eq_size!(FrameUniform, [u8; 32]);

/// Per-series draw state, bind group 1.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SeriesUniform {
    pub color: [f32; 4],
    /// Half the line width in pixels.
    pub half_width: f32,
    _pad: [f32; 3],
}

impl SeriesUniform {
    pub fn new(color: [f32; 4], line_width: f32) -> Self {
        Self {
            color,
            half_width: line_width * 0.5,
            _pad: [0.0; 3],
        }
    }
}

static_assertions::assert_eq_size!(SeriesUniform, [u8; 32]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_matches_fields() {
        assert_eq!(LineVertex::STRIDE, 16);
        assert_eq!(POINT_STRIDE, 64);
        assert_eq!(
            std::mem::offset_of!(LineVertex, direction) as u64,
            LineVertex::ATTRIBUTES[1].offset
        );
    }

    #[test]
    fn test_series_uniform_halves_width() {
        let uniform = SeriesUniform::new([1.0, 0.0, 0.0, 1.0], 3.0);
        assert_eq!(uniform.half_width, 1.5);
        assert_eq!(bytemuck::bytes_of(&uniform).len(), 32);
    }
}
