//! Owned GPU handles that are either a real wgpu object or a mock id.
//!
//! The line renderer holds one vertex buffer per segment, one uniform buffer
//! and bind group per series, plus the frame uniform and the strip pipeline.
//! Those are the only resource kinds wrapped here. Without the `mock`
//! feature every handle is a thin newtype over its wgpu object.

/// A wgpu object, or the id a [`MockRenderContext`](crate::MockRenderContext)
/// recorded it under.
#[derive(Clone, Debug)]
enum Handle<T> {
    Real(T),
    #[cfg(feature = "mock")]
    Mock(usize),
}

impl<T> Handle<T> {
    #[cfg_attr(not(feature = "mock"), allow(unused_variables))]
    fn real(&self, kind: &str) -> &T {
        match self {
            Handle::Real(object) => object,
            #[cfg(feature = "mock")]
            Handle::Mock(id) => panic!("{kind} #{id} is a mock handle with no wgpu object"),
        }
    }

    #[cfg(feature = "mock")]
    fn mock_id(&self) -> Option<usize> {
        match self {
            Handle::Mock(id) => Some(*id),
            Handle::Real(_) => None,
        }
    }
}

/// Vertex or uniform buffer.
///
/// Segments write into it at byte offsets with
/// [`RenderContext::write_buffer`](crate::RenderContext::write_buffer). The
/// allocated size is kept alongside the handle so real and mock buffers
/// report it the same way. Clones share one allocation.
#[derive(Clone, Debug)]
pub struct GpuBuffer {
    handle: Handle<wgpu::Buffer>,
    size: u64,
}

impl GpuBuffer {
    pub fn from_wgpu(buffer: wgpu::Buffer) -> Self {
        let size = buffer.size();
        Self {
            handle: Handle::Real(buffer),
            size,
        }
    }

    #[cfg(feature = "mock")]
    pub fn mock(id: usize, size: u64) -> Self {
        Self {
            handle: Handle::Mock(id),
            size,
        }
    }

    /// Allocated size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// # Panics
    /// On a mock buffer. Only backend code holding a real context calls this.
    pub fn as_wgpu(&self) -> &wgpu::Buffer {
        self.handle.real("buffer")
    }

    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.handle, Handle::Mock(_))
    }

    /// Id the mock recorded this buffer under, for matching
    /// [`RenderCall`](crate::RenderCall)s in tests.
    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        self.handle.mock_id()
    }
}

macro_rules! id_handle {
    ($(#[$meta:meta])* $name:ident, $wgpu:ty, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            handle: Handle<$wgpu>,
        }

        impl $name {
            pub fn from_wgpu(object: $wgpu) -> Self {
                Self {
                    handle: Handle::Real(object),
                }
            }

            #[cfg(feature = "mock")]
            pub fn mock(id: usize) -> Self {
                Self {
                    handle: Handle::Mock(id),
                }
            }

            /// # Panics
            /// On a mock handle.
            pub fn as_wgpu(&self) -> &$wgpu {
                self.handle.real($kind)
            }

            #[cfg(feature = "mock")]
            pub fn mock_id(&self) -> Option<usize> {
                self.handle.mock_id()
            }
        }
    };
}

id_handle!(
    /// Layout of a single-uniform bind group. The renderer creates two: the
    /// frame transform at group 0 and the series style at group 1.
    GpuBindGroupLayout,
    wgpu::BindGroupLayout,
    "bind group layout"
);

id_handle!(
    /// A uniform buffer bound at binding 0 of its layout.
    GpuBindGroup,
    wgpu::BindGroup,
    "bind group"
);

id_handle!(
    /// Triangle-strip pipeline that expands line quads.
    GpuRenderPipeline,
    wgpu::RenderPipeline,
    "render pipeline"
);

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;

    #[test]
    fn test_mock_handles_report_ids() {
        let buffer = GpuBuffer::mock(3, 64);
        assert!(buffer.is_mock());
        assert_eq!(buffer.mock_id(), Some(3));
        assert_eq!(buffer.size(), 64);

        assert_eq!(GpuBindGroup::mock(5).mock_id(), Some(5));
        assert_eq!(GpuRenderPipeline::mock(1).mock_id(), Some(1));
    }

    #[test]
    #[should_panic(expected = "bind group layout #2 is a mock handle")]
    fn test_mock_handle_has_no_wgpu_object() {
        let _ = GpuBindGroupLayout::mock(2).as_wgpu();
    }
}
