//! Trait abstracting GPU resource creation and uploads.

use crate::error::ResourceError;
use crate::gpu_types::*;
use wgpu::{BufferDescriptor, TextureFormat, VertexAttribute};

/// Describes a triangle-strip pipeline with one interleaved vertex buffer.
///
/// The descriptor only references wrapper types, so it can be built in tests
/// where no real wgpu objects exist.
#[derive(Debug, Clone)]
pub struct StripPipelineDescriptor<'a> {
    pub label: Option<&'a str>,
    /// WGSL source with `vs_main` / `fs_main` entry points.
    pub shader_source: &'a str,
    /// Byte stride of one vertex in slot 0.
    pub vertex_stride: u64,
    pub vertex_attributes: &'a [VertexAttribute],
    /// Layouts for bind groups `0..n`, in order.
    pub bind_group_layouts: &'a [&'a GpuBindGroupLayout],
    pub target_format: TextureFormat,
}

/// Trait abstracting GPU resource creation and operations.
///
/// Methods take `&self` and return owned wrapper types, so one context can
/// be shared through an `Arc<dyn RenderContext>` and mocks can record calls
/// through interior mutability.
///
/// # Example
///
/// ```rust,no_run
/// use streamline_test_utils::{RenderContext, ResourceError};
/// use wgpu::{BufferDescriptor, BufferUsages};
///
/// fn upload(ctx: &dyn RenderContext) -> Result<(), ResourceError> {
///     let buffer = ctx.create_buffer(&BufferDescriptor {
///         label: None,
///         size: 16,
///         usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
///         mapped_at_creation: false,
///     })?;
///     ctx.write_buffer(&buffer, 0, &[0u8; 16]);
///     ctx.destroy_buffer(&buffer);
///     Ok(())
/// }
/// ```
pub trait RenderContext: Send + Sync {
    // Buffer operations

    /// Create a GPU buffer.
    ///
    /// Fails when the size exceeds the device limit.
    fn create_buffer(&self, desc: &BufferDescriptor) -> Result<GpuBuffer, ResourceError>;

    /// Write `data` into `buffer` starting at byte `offset`.
    ///
    /// Only the given range is uploaded; the rest of the buffer is untouched.
    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]);

    /// Free the buffer's GPU memory immediately.
    ///
    /// The handle must not be used afterwards.
    fn destroy_buffer(&self, buffer: &GpuBuffer);

    // Bind group operations

    /// Create a layout with a single uniform buffer at binding 0, visible to
    /// the vertex and fragment stages.
    fn create_uniform_layout(&self, label: Option<&str>) -> GpuBindGroupLayout;

    /// Bind `buffer` as the uniform at binding 0 of `layout`.
    fn create_uniform_bind_group(
        &self,
        label: Option<&str>,
        layout: &GpuBindGroupLayout,
        buffer: &GpuBuffer,
    ) -> GpuBindGroup;

    // Pipeline operations

    /// Compile the shader and build a triangle-strip render pipeline.
    fn create_strip_pipeline(
        &self,
        desc: &StripPipelineDescriptor,
    ) -> Result<GpuRenderPipeline, ResourceError>;
}
