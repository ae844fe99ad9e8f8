//! Graphics backend abstraction for Streamline.
//!
//! Everything in the chart crates that touches the GPU goes through the two
//! traits defined here, so the same code runs against wgpu in production and
//! against a recording mock in tests.
//!
//! # Overview
//!
//! - [`RenderContext`] - resource creation and buffer uploads
//! - [`DrawPass`] - the subset of a render pass the line renderer needs
//! - GPU wrapper types (`GpuBuffer`, `GpuBindGroup`, ...) - real or mock
//! - `MockRenderContext` / `MockDrawPass` - recording implementations
//!   (requires the `mock` feature)
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use streamline_test_utils::{MockRenderContext, RenderContext};
//! use wgpu::*;
//!
//! let mock = MockRenderContext::new();
//!
//! let buffer = mock
//!     .create_buffer(&BufferDescriptor {
//!         label: Some("segment"),
//!         size: 1024,
//!         usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
//!         mapped_at_creation: false,
//!     })
//!     .unwrap();
//! mock.write_buffer(&buffer, 256, &[0u8; 64]);
//!
//! assert_eq!(mock.count_buffer_creates(), 1);
//! assert_eq!(mock.count_buffer_writes(), 1);
//! assert!(buffer.is_mock());
//! # }
//! ```
//!
//! # Design
//!
//! GPU wrapper types are owned and reference counted internally, so no
//! lifetimes leak into the chart code. Mock implementations record through
//! `parking_lot::Mutex` so every trait method can take `&self`, and both
//! traits are object safe.

pub mod draw_pass;
pub mod error;
pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_render;
pub mod render_context;

pub use draw_pass::*;
pub use error::*;
pub use gpu_types::*;
#[cfg(feature = "mock")]
pub use mock_render::*;
pub use render_context::*;
