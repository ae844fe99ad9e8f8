//! Implementation of RenderContext trait for GraphicsContext.
//!
//! This allows GraphicsContext to be used polymorphically with the
//! RenderContext trait, enabling testing with MockRenderContext.

use crate::context::GraphicsContext;
use streamline_test_utils::{
    GpuBindGroup, GpuBindGroupLayout, GpuBuffer, GpuRenderPipeline, RenderContext,
    ResourceError, StripPipelineDescriptor,
};
use wgpu::BufferDescriptor;

impl RenderContext for GraphicsContext {
    fn create_buffer(&self, desc: &BufferDescriptor) -> Result<GpuBuffer, ResourceError> {
        let limit = self.max_buffer_size();
        if desc.size > limit {
            return Err(ResourceError::BufferTooLarge {
                label: desc.label.map(|s| s.to_string()),
                requested: desc.size,
                limit,
            });
        }
        Ok(GpuBuffer::from_wgpu(self.device.create_buffer(desc)))
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        self.queue.write_buffer(buffer.as_wgpu(), offset, data);
    }

    fn destroy_buffer(&self, buffer: &GpuBuffer) {
        buffer.as_wgpu().destroy();
    }

    fn create_uniform_layout(&self, label: Option<&str>) -> GpuBindGroupLayout {
        let layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label,
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });
        GpuBindGroupLayout::from_wgpu(layout)
    }

    fn create_uniform_bind_group(
        &self,
        label: Option<&str>,
        layout: &GpuBindGroupLayout,
        buffer: &GpuBuffer,
    ) -> GpuBindGroup {
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label,
            layout: layout.as_wgpu(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_wgpu().as_entire_binding(),
            }],
        });
        GpuBindGroup::from_wgpu(bind_group)
    }

    fn create_strip_pipeline(
        &self,
        desc: &StripPipelineDescriptor,
    ) -> Result<GpuRenderPipeline, ResourceError> {
        // Shader and pipeline validation errors are reported asynchronously;
        // capture them so a bad shader fails construction instead of the
        // first frame.
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: desc.label,
                source: wgpu::ShaderSource::Wgsl(desc.shader_source.into()),
            });

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> = desc
            .bind_group_layouts
            .iter()
            .map(|layout| layout.as_wgpu())
            .collect();

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: desc.label,
                bind_group_layouts: &bind_group_layouts,
                push_constant_ranges: &[],
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: desc.label,
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: desc.vertex_stride,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: desc.vertex_attributes,
                    }],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: desc.target_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            tracing::error!("Pipeline {:?} failed validation: {}", desc.label, error);
            return Err(ResourceError::PipelineCreation {
                label: desc.label.map(|s| s.to_string()),
                message: error.to_string(),
            });
        }

        tracing::debug!("Created strip pipeline {:?}", desc.label);
        Ok(GpuRenderPipeline::from_wgpu(pipeline))
    }
}
