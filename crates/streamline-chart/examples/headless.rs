//! Streams a sine wave into a chart rendered to an offscreen texture.
//!
//! Each frame appends a batch of points, renders, and logs what was drawn.
//! Only the new points are uploaded; the visible window is selected on the
//! CPU with a binary search and drawn straight from the resident segments.
//!
//! Run with: cargo run -p streamline-chart --example headless

use streamline_chart::{ChartOptions, SeriesOptions, TimeChart};
use streamline_core::logging;
use streamline_core::profiling::{ProfilingBackend, init_profiling, new_frame};
use streamline_render::{Color, GraphicsContext, wgpu};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 480;
const FRAMES: usize = 120;
const POINTS_PER_FRAME: usize = 2_000;
const SAMPLE_RATE: f64 = 1_000.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    init_profiling(ProfilingBackend::default());

    let graphics = GraphicsContext::new_owned_sync()?;
    tracing::info!(adapter = ?graphics.info().name, "Using adapter");

    let format = wgpu::TextureFormat::Rgba8UnormSrgb;
    let target = graphics.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("Headless Chart Target"),
        size: wgpu::Extent3d {
            width: WIDTH,
            height: HEIGHT,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let options = ChartOptions::new()
        .with_line_width(1.5)
        .with_segment_capacity(32 * 1024)
        .with_real_time(10.0)
        .with_series(SeriesOptions::new("sine").with_color("#1f77b4"))
        .with_series(
            SeriesOptions::new("envelope")
                .with_color(Color::from_hex(0xff7f0e))
                .with_line_width(3.0),
        );
    let mut chart = TimeChart::new(graphics.clone(), format, options)?;
    chart.resize(WIDTH as f32, HEIGHT as f32);

    let sine = chart.model().series()[0].id;
    let envelope = chart.model().series()[1].id;

    for frame in 0..FRAMES {
        new_frame();

        let start = frame * POINTS_PER_FRAME;
        let times = (start..start + POINTS_PER_FRAME).map(|i| i as f64 / SAMPLE_RATE);
        chart.extend(
            sine,
            times
                .clone()
                .map(|t| (t, (t * 7.0).sin() * (t * 0.3).cos())),
        )?;
        chart.extend(envelope, times.map(|t| (t, (t * 0.3).cos().abs())))?;

        let mut encoder = graphics
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Headless Chart Encoder"),
            });
        let stats = {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Headless Chart Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(Color::WHITE.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            chart.render(&mut pass)?
        };
        graphics.queue().submit(Some(encoder.finish()));

        if frame % 20 == 0 {
            tracing::info!(
                frame,
                points = chart.model().series()[0].data.len(),
                series = stats.series_drawn,
                segments = stats.segments_drawn,
                vertices = stats.vertices_drawn,
                "Rendered frame"
            );
        }
    }

    let segments = chart
        .renderer()
        .series_lines(sine)
        .map_or(0, |lines| lines.segments().len());
    tracing::info!(segments, "Sine series segment count");

    chart.dispose();
    Ok(())
}
