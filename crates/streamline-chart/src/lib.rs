//! Streaming GPU line charts.
//!
//! Points are uploaded to the GPU once, as they arrive, into fixed-capacity
//! vertex buffer segments. Each frame only updates a transform uniform and
//! draws the index range that a binary search over x selects for the visible
//! domain, so charts with millions of accumulated points keep a constant
//! per-frame cost.
//!
//! # Layers
//!
//! - [`domain_search`] / [`visible_index_range`] - visible domain to point
//!   indices
//! - [`Segment`] - one vertex buffer of triangle-strip quads
//! - [`SeriesLines`] - the segment list of one series
//! - [`LineChartRenderer`] - per-frame sync, transform and draw
//! - [`TimeChart`] - model, layout and renderer behind one handle
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use streamline_chart::{ChartOptions, SeriesOptions, TimeChart};
//! use streamline_render::wgpu::TextureFormat;
//! use streamline_test_utils::{MockDrawPass, MockRenderContext};
//!
//! let ctx = Arc::new(MockRenderContext::new());
//! let options = ChartOptions::new()
//!     .with_line_width(2.0)
//!     .with_series(SeriesOptions::new("latency").with_color("#d62728"));
//! let mut chart = TimeChart::new(ctx, TextureFormat::Bgra8UnormSrgb, options).unwrap();
//!
//! let id = chart.model().series()[0].id;
//! chart.extend(id, [(0.0, 1.0), (1.0, 3.0), (2.0, 2.0)]).unwrap();
//! chart.resize(640.0, 480.0);
//!
//! let mut pass = MockDrawPass::new();
//! let stats = chart.render(&mut pass).unwrap();
//! assert_eq!(stats.series_drawn, 1);
//! assert_eq!(pass.draw_count(), 1);
//!
//! chart.dispose();
//! ```

pub mod chart;
pub mod content_box;
pub mod domain;
pub mod error;
pub mod gpu_types;
pub mod model;
pub mod options;
pub mod renderer;
pub mod scale;
pub mod segment;
pub mod series_lines;
pub mod stats;
pub mod types;

pub use chart::TimeChart;
pub use content_box::{ContentBoxDetector, Rect, Size};
pub use domain::{DomainRange, domain_search, visible_index_range};
pub use error::{ChartError, ChartResult};
pub use gpu_types::{FrameUniform, LineVertex, SeriesUniform};
pub use model::ChartModel;
pub use options::{AxisRange, ChartOptions, DEFAULT_SEGMENT_CAPACITY, Padding, SeriesOptions};
pub use renderer::LineChartRenderer;
pub use scale::{LinearScale, Scale};
pub use segment::{Segment, line_direction};
pub use series_lines::SeriesLines;
pub use stats::{FrameStats, SyncStats};
pub use types::{DataPoint, Series, SeriesData, SeriesId};

pub use streamline_render::{Color, ColorSpec};
