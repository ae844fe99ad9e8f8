//! Mock implementations of [`RenderContext`] and [`DrawPass`] for testing.
//!
//! Both record every operation without touching a GPU, so tests can assert
//! on allocations, partial uploads and the exact vertex ranges drawn.

use crate::{
    draw_pass::DrawPass,
    error::ResourceError,
    gpu_types::*,
    render_context::{RenderContext, StripPipelineDescriptor},
};
use parking_lot::Mutex;
use std::ops::Range;
use wgpu::*;

/// Records a GPU operation call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    CreateBuffer {
        buffer_id: usize,
        label: Option<String>,
        size: u64,
        usage: BufferUsages,
    },
    WriteBuffer {
        buffer_id: usize,
        offset: u64,
        data: Vec<u8>,
    },
    DestroyBuffer {
        buffer_id: usize,
    },
    CreateBindGroupLayout {
        label: Option<String>,
    },
    CreateBindGroup {
        label: Option<String>,
        buffer_id: usize,
    },
    CreateRenderPipeline {
        label: Option<String>,
    },
}

/// Mock buffers stored in the context.
#[derive(Debug, Clone)]
struct MockBuffer {
    size: u64,
    destroyed: bool,
}

/// Mock implementation of RenderContext for testing.
///
/// # Borrow Checking Pattern: Interior Mutability
///
/// Methods take `&self` but need to record calls, so all state lives behind
/// `parking_lot::Mutex` (which keeps the type `Send + Sync`, as the trait
/// requires).
///
/// # Example
///
/// ```rust
/// use streamline_test_utils::{MockRenderContext, RenderContext};
/// use wgpu::*;
///
/// let mock = MockRenderContext::new().with_max_buffer_size(512);
///
/// let too_big = mock.create_buffer(&BufferDescriptor {
///     label: None,
///     size: 1024,
///     usage: BufferUsages::VERTEX,
///     mapped_at_creation: false,
/// });
/// assert!(too_big.is_err());
/// assert_eq!(mock.count_buffer_creates(), 0);
/// ```
pub struct MockRenderContext {
    /// Recorded calls for verification
    calls: Mutex<Vec<RenderCall>>,

    /// Mock buffers, indexed by id
    buffers: Mutex<Vec<MockBuffer>>,

    /// Buffers larger than this are rejected like a real device would
    max_buffer_size: u64,

    /// Fail every pipeline creation (simulates a shader compile error)
    reject_pipelines: bool,

    /// Counters for generating IDs
    next_layout_id: Mutex<usize>,
    next_bind_group_id: Mutex<usize>,
    next_pipeline_id: Mutex<usize>,
}

impl MockRenderContext {
    /// Create a new mock render context with default device limits.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            buffers: Mutex::new(Vec::new()),
            max_buffer_size: Limits::default().max_buffer_size,
            reject_pipelines: false,
            next_layout_id: Mutex::new(0),
            next_bind_group_id: Mutex::new(0),
            next_pipeline_id: Mutex::new(0),
        }
    }

    /// Lower the buffer size limit.
    pub fn with_max_buffer_size(mut self, max_buffer_size: u64) -> Self {
        self.max_buffer_size = max_buffer_size;
        self
    }

    /// Make every `create_strip_pipeline` call fail.
    pub fn rejecting_pipelines(mut self) -> Self {
        self.reject_pipelines = true;
        self
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    /// Count buffer creations.
    pub fn count_buffer_creates(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, RenderCall::CreateBuffer { .. }))
            .count()
    }

    /// Count buffer write operations.
    pub fn count_buffer_writes(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, RenderCall::WriteBuffer { .. }))
            .count()
    }

    /// Count buffer destructions.
    pub fn count_buffer_destroys(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, RenderCall::DestroyBuffer { .. }))
            .count()
    }

    /// Count render pipeline creations.
    pub fn count_render_pipeline_creates(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, RenderCall::CreateRenderPipeline { .. }))
            .count()
    }

    /// All writes to one buffer as `(offset, bytes)`, oldest first.
    pub fn writes_to(&self, buffer_id: usize) -> Vec<(u64, Vec<u8>)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::WriteBuffer {
                    buffer_id: id,
                    offset,
                    data,
                } if *id == buffer_id => Some((*offset, data.clone())),
                _ => None,
            })
            .collect()
    }

    /// Size of a created buffer.
    pub fn buffer_size(&self, buffer_id: usize) -> Option<u64> {
        self.buffers.lock().get(buffer_id).map(|b| b.size)
    }

    /// Number of buffers created and not yet destroyed.
    pub fn live_buffer_count(&self) -> usize {
        self.buffers.lock().iter().filter(|b| !b.destroyed).count()
    }

    /// Clear recorded calls (useful between test steps).
    ///
    /// Buffer bookkeeping is kept, so ids stay valid.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Get total number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for MockRenderContext {
    fn create_buffer(&self, desc: &BufferDescriptor) -> Result<GpuBuffer, ResourceError> {
        if desc.size > self.max_buffer_size {
            return Err(ResourceError::BufferTooLarge {
                label: desc.label.map(|s| s.to_string()),
                requested: desc.size,
                limit: self.max_buffer_size,
            });
        }

        let mut buffers = self.buffers.lock();
        let buffer_id = buffers.len();
        buffers.push(MockBuffer {
            size: desc.size,
            destroyed: false,
        });

        self.calls.lock().push(RenderCall::CreateBuffer {
            buffer_id,
            label: desc.label.map(|s| s.to_string()),
            size: desc.size,
            usage: desc.usage,
        });

        Ok(GpuBuffer::mock(buffer_id, desc.size))
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        let Some(buffer_id) = buffer.mock_id() else {
            return;
        };

        {
            let buffers = self.buffers.lock();
            let mock = &buffers[buffer_id];
            assert!(!mock.destroyed, "write to destroyed buffer {buffer_id}");
            assert!(
                offset + data.len() as u64 <= mock.size,
                "write of {} bytes at offset {offset} overflows buffer {buffer_id} ({} bytes)",
                data.len(),
                mock.size
            );
        }

        self.calls.lock().push(RenderCall::WriteBuffer {
            buffer_id,
            offset,
            data: data.to_vec(),
        });
    }

    fn destroy_buffer(&self, buffer: &GpuBuffer) {
        let Some(buffer_id) = buffer.mock_id() else {
            return;
        };

        let mut buffers = self.buffers.lock();
        let mock = &mut buffers[buffer_id];
        assert!(!mock.destroyed, "buffer {buffer_id} destroyed twice");
        mock.destroyed = true;

        self.calls.lock().push(RenderCall::DestroyBuffer { buffer_id });
    }

    fn create_uniform_layout(&self, label: Option<&str>) -> GpuBindGroupLayout {
        let mut id = self.next_layout_id.lock();
        let layout_id = *id;
        *id += 1;

        self.calls.lock().push(RenderCall::CreateBindGroupLayout {
            label: label.map(|s| s.to_string()),
        });

        GpuBindGroupLayout::mock(layout_id)
    }

    fn create_uniform_bind_group(
        &self,
        label: Option<&str>,
        _layout: &GpuBindGroupLayout,
        buffer: &GpuBuffer,
    ) -> GpuBindGroup {
        let mut id = self.next_bind_group_id.lock();
        let bind_group_id = *id;
        *id += 1;

        self.calls.lock().push(RenderCall::CreateBindGroup {
            label: label.map(|s| s.to_string()),
            buffer_id: buffer.mock_id().unwrap_or(usize::MAX),
        });

        GpuBindGroup::mock(bind_group_id)
    }

    fn create_strip_pipeline(
        &self,
        desc: &StripPipelineDescriptor,
    ) -> Result<GpuRenderPipeline, ResourceError> {
        if self.reject_pipelines {
            return Err(ResourceError::PipelineCreation {
                label: desc.label.map(|s| s.to_string()),
                message: "mock context rejects pipelines".to_string(),
            });
        }

        let mut id = self.next_pipeline_id.lock();
        let pipeline_id = *id;
        *id += 1;

        self.calls.lock().push(RenderCall::CreateRenderPipeline {
            label: desc.label.map(|s| s.to_string()),
        });

        Ok(GpuRenderPipeline::mock(pipeline_id))
    }
}

/// Records a render pass command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassCall {
    SetPipeline { pipeline_id: usize },
    SetBindGroup { index: u32, bind_group_id: usize },
    SetVertexBuffer { slot: u32, buffer_id: usize },
    Draw { vertices: Range<u32> },
}

/// A draw together with the vertex buffer bound to slot 0 at the time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockDraw {
    pub buffer_id: Option<usize>,
    pub vertices: Range<u32>,
}

/// Mock render pass that records commands.
#[derive(Debug, Default)]
pub struct MockDrawPass {
    calls: Vec<PassCall>,
}

impl MockDrawPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded commands in order.
    pub fn calls(&self) -> &[PassCall] {
        &self.calls
    }

    /// Draw calls, each paired with the buffer bound to slot 0.
    pub fn draws(&self) -> Vec<MockDraw> {
        let mut bound = None;
        let mut draws = Vec::new();
        for call in &self.calls {
            match call {
                PassCall::SetVertexBuffer { slot: 0, buffer_id } => bound = Some(*buffer_id),
                PassCall::Draw { vertices } => draws.push(MockDraw {
                    buffer_id: bound,
                    vertices: vertices.clone(),
                }),
                _ => {}
            }
        }
        draws
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, PassCall::Draw { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl DrawPass for MockDrawPass {
    fn set_pipeline(&mut self, pipeline: &GpuRenderPipeline) {
        self.calls.push(PassCall::SetPipeline {
            pipeline_id: pipeline.mock_id().unwrap_or(usize::MAX),
        });
    }

    fn set_bind_group(&mut self, index: u32, bind_group: &GpuBindGroup) {
        self.calls.push(PassCall::SetBindGroup {
            index,
            bind_group_id: bind_group.mock_id().unwrap_or(usize::MAX),
        });
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &GpuBuffer) {
        self.calls.push(PassCall::SetVertexBuffer {
            slot,
            buffer_id: buffer.mock_id().unwrap_or(usize::MAX),
        });
    }

    fn draw(&mut self, vertices: Range<u32>) {
        self.calls.push(PassCall::Draw { vertices });
    }
}
