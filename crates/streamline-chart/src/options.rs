//! Chart and series configuration.

use crate::error::ChartResult;
use serde::Deserialize;
use streamline_render::{Color, ColorSpec};

/// Default number of data points one segment holds.
pub const DEFAULT_SEGMENT_CAPACITY: usize = 128 * 1024;

/// Padding around the content box, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// How an axis picks its visible domain.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AxisRange {
    /// Follow the data extent.
    #[default]
    Auto,
    Fixed { min: f64, max: f64 },
}

/// Per-series configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeriesOptions {
    pub name: String,
    pub visible: bool,
    /// Falls back to [`ChartOptions::color`].
    pub color: Option<ColorSpec>,
    /// Falls back to [`ChartOptions::line_width`].
    pub line_width: Option<f32>,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            visible: true,
            color: None,
            line_width: None,
        }
    }
}

impl SeriesOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = Some(width);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Chart-wide configuration.
///
/// Everything has a usable default; JSON input only needs the fields it
/// changes:
///
/// ```
/// use streamline_chart::ChartOptions;
///
/// let options = ChartOptions::from_json(r##"{
///     "line_width": 2.5,
///     "real_time": true,
///     "series": [{ "name": "cpu", "color": "#1f77b4" }]
/// }"##).unwrap();
///
/// assert_eq!(options.line_width, 2.5);
/// assert_eq!(options.series[0].name, "cpu");
/// assert!(options.series[0].visible);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    /// Line width in pixels for series without an override.
    pub line_width: f32,
    /// Color for series without an override.
    pub color: ColorSpec,
    /// Content box padding.
    pub padding: Padding,
    /// Pixels at the left edge excluded when computing the visible domain.
    pub render_padding_left: f32,
    /// Pixels at the right edge excluded when computing the visible domain.
    pub render_padding_right: f32,
    /// Subtracted from every x before it is stored in f32 vertex data.
    ///
    /// Set this near the first timestamp of a series with large x values
    /// (epoch milliseconds) to keep sub-pixel precision.
    pub base_x: f64,
    /// Data points per GPU segment.
    pub segment_capacity: usize,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    /// Keep the newest point at the right edge.
    pub real_time: bool,
    /// Width of the x window in real-time mode, in data units.
    pub real_time_window: f64,
    /// Series declared up front, in draw order.
    pub series: Vec<SeriesOptions>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            color: ColorSpec::from(Color::BLACK),
            padding: Padding::new(10.0, 10.0, 20.0, 30.0),
            render_padding_left: 0.0,
            render_padding_right: 0.0,
            base_x: 0.0,
            segment_capacity: DEFAULT_SEGMENT_CAPACITY,
            x_range: AxisRange::Auto,
            y_range: AxisRange::Auto,
            real_time: false,
            real_time_window: 60.0,
            series: Vec::new(),
        }
    }
}

impl ChartOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    pub fn with_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_render_padding(mut self, left: f32, right: f32) -> Self {
        self.render_padding_left = left;
        self.render_padding_right = right;
        self
    }

    pub fn with_base_x(mut self, base_x: f64) -> Self {
        self.base_x = base_x;
        self
    }

    pub fn with_segment_capacity(mut self, capacity: usize) -> Self {
        self.segment_capacity = capacity;
        self
    }

    pub fn with_x_range(mut self, range: AxisRange) -> Self {
        self.x_range = range;
        self
    }

    pub fn with_y_range(mut self, range: AxisRange) -> Self {
        self.y_range = range;
        self
    }

    pub fn with_real_time(mut self, window: f64) -> Self {
        self.real_time = true;
        self.real_time_window = window;
        self
    }

    pub fn with_series(mut self, series: SeriesOptions) -> Self {
        self.series.push(series);
        self
    }

    /// Effective line width for a series.
    pub fn line_width_for(&self, series: &SeriesOptions) -> f32 {
        series.line_width.unwrap_or(self.line_width)
    }

    /// Effective color spec for a series.
    pub fn color_for<'a>(&'a self, series: &'a SeriesOptions) -> &'a ColorSpec {
        series.color.as_ref().unwrap_or(&self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_overrides() {
        let options = ChartOptions::new().with_line_width(3.0).with_color("red");
        let plain = SeriesOptions::new("a");
        let custom = SeriesOptions::new("b")
            .with_line_width(1.5)
            .with_color(Color::BLUE);

        assert_eq!(options.line_width_for(&plain), 3.0);
        assert_eq!(options.line_width_for(&custom), 1.5);
        assert_eq!(options.color_for(&plain).resolve().unwrap(), Color::RED);
        assert_eq!(options.color_for(&custom).resolve().unwrap(), Color::BLUE);
    }

    #[test]
    fn test_json_axis_ranges() {
        let options = ChartOptions::from_json(
            r#"{ "y_range": { "mode": "fixed", "min": -1.0, "max": 1.0 }, "segment_capacity": 4096 }"#,
        )
        .unwrap();

        assert_eq!(options.y_range, AxisRange::Fixed { min: -1.0, max: 1.0 });
        assert_eq!(options.x_range, AxisRange::Auto);
        assert_eq!(options.segment_capacity, 4096);
    }

    #[test]
    fn test_invalid_json() {
        assert!(ChartOptions::from_json("{ \"line_width\": \"wide\" }").is_err());
    }
}
