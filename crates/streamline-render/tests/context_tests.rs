//! Graphics context lifecycle tests.

use std::sync::Arc;
use streamline_render::{GraphicsContext, RenderContext};

#[test]
#[ignore] // Requires GPU - run with: cargo test --test context_tests -- --ignored
fn test_context_creation_sync() {
    match GraphicsContext::new_owned_sync() {
        Ok(ctx) => {
            assert_eq!(Arc::strong_count(&ctx), 1);
            assert!(ctx.max_buffer_size() > 0);
        }
        Err(e) => {
            // Allow test to pass if no GPU (CI environments)
            println!("GPU not available: {e}");
        }
    }
}

#[test]
#[ignore] // Requires GPU
fn test_oversized_buffer_rejected() {
    let Ok(ctx) = GraphicsContext::new_owned_sync() else {
        return;
    };

    let result = ctx.create_buffer(&wgpu::BufferDescriptor {
        label: Some("too big"),
        size: ctx.max_buffer_size() + 4,
        usage: wgpu::BufferUsages::VERTEX,
        mapped_at_creation: false,
    });
    assert!(result.is_err());
}

#[test]
#[ignore] // Requires GPU
fn test_context_cleanup() {
    let Ok(ctx) = GraphicsContext::new_owned_sync() else {
        return;
    };

    let weak = Arc::downgrade(&ctx);
    assert!(weak.upgrade().is_some());

    drop(ctx);
    assert!(weak.upgrade().is_none());
}
