//! Render pass abstraction.
//!
//! The line renderer only ever binds a pipeline, a couple of bind groups and
//! one vertex buffer per draw, so that is all [`DrawPass`] exposes.

use crate::gpu_types::*;
use std::ops::Range;

/// The subset of a render pass used to issue triangle-strip draws.
pub trait DrawPass {
    fn set_pipeline(&mut self, pipeline: &GpuRenderPipeline);

    fn set_bind_group(&mut self, index: u32, bind_group: &GpuBindGroup);

    /// Bind the whole of `buffer` to vertex slot `slot`.
    fn set_vertex_buffer(&mut self, slot: u32, buffer: &GpuBuffer);

    /// Draw `vertices` of the bound vertex buffer as a single instance.
    fn draw(&mut self, vertices: Range<u32>);
}

impl DrawPass for wgpu::RenderPass<'_> {
    fn set_pipeline(&mut self, pipeline: &GpuRenderPipeline) {
        wgpu::RenderPass::set_pipeline(self, pipeline.as_wgpu());
    }

    fn set_bind_group(&mut self, index: u32, bind_group: &GpuBindGroup) {
        wgpu::RenderPass::set_bind_group(self, index, bind_group.as_wgpu(), &[]);
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &GpuBuffer) {
        wgpu::RenderPass::set_vertex_buffer(self, slot, buffer.as_wgpu().slice(..));
    }

    fn draw(&mut self, vertices: Range<u32>) {
        wgpu::RenderPass::draw(self, vertices, 0..1);
    }
}
