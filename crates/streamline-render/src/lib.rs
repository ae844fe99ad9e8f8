//! Streamline Render
//!
//! The wgpu side of Streamline: a shared [`GraphicsContext`] that implements
//! [`RenderContext`](streamline_test_utils::RenderContext), plus [`Color`]
//! and the [`ColorSpec`] resolver used by chart options.

mod color;
mod context;
mod context_impl;

pub use color::*;
pub use context::*;

// Re-export so downstream crates use the same wgpu version
pub use wgpu;
pub use streamline_test_utils::{DrawPass, RenderContext, ResourceError};
