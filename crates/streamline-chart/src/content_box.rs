//! Padded plotting area inside the chart viewport.

use crate::options::Padding;

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left)
    pub x: f32,
    /// Y position (top)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink by per-side padding. Width and height never go negative.
    pub fn inset(&self, padding: &Padding) -> Self {
        Self {
            x: self.x + padding.left,
            y: self.y + padding.top,
            width: (self.width - padding.left - padding.right).max(0.0),
            height: (self.height - padding.top - padding.bottom).max(0.0),
        }
    }
}

/// Tracks the content box of a chart as its viewport is resized.
///
/// Scales and overlays size themselves against [`content_box`]; the box is
/// recomputed from the configured padding on every resize until the owning
/// chart is disposed.
///
/// [`content_box`]: ContentBoxDetector::content_box
#[derive(Debug, Clone)]
pub struct ContentBoxDetector {
    padding: Padding,
    content_box: Rect,
    disposed: bool,
}

impl ContentBoxDetector {
    pub fn new(padding: Padding) -> Self {
        Self {
            padding,
            content_box: Rect::default(),
            disposed: false,
        }
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn content_box(&self) -> Rect {
        self.content_box
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Recompute the content box for a `width` x `height` viewport.
    pub fn on_resize(&mut self, width: f32, height: f32) -> Rect {
        if self.disposed {
            tracing::trace!("Ignoring resize of disposed content box");
            return self.content_box;
        }
        self.content_box = Rect::new(0.0, 0.0, width, height).inset(&self.padding);
        self.content_box
    }

    /// Detach from the chart. Later resizes are ignored.
    pub fn dispose(&mut self) {
        self.content_box = Rect::default();
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_box_from_padding() {
        let mut detector = ContentBoxDetector::new(Padding::new(10.0, 20.0, 30.0, 40.0));
        let rect = detector.on_resize(800.0, 600.0);

        assert_eq!(rect, Rect::new(40.0, 10.0, 740.0, 560.0));
        assert_eq!(rect.right(), 780.0);
        assert_eq!(rect.bottom(), 570.0);
    }

    #[test]
    fn test_padding_larger_than_viewport_clamps() {
        let mut detector = ContentBoxDetector::new(Padding::uniform(50.0));
        let rect = detector.on_resize(60.0, 40.0);
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 0.0);
    }

    #[test]
    fn test_disposed_ignores_resize() {
        let mut detector = ContentBoxDetector::new(Padding::uniform(5.0));
        detector.on_resize(100.0, 100.0);
        detector.dispose();

        assert!(detector.is_disposed());
        assert_eq!(detector.on_resize(300.0, 300.0), Rect::default());
    }
}
