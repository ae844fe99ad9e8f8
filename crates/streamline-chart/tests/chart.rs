//! `TimeChart` event ordering and teardown.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use streamline_chart::{
    ChartError, ChartOptions, Padding, Rect, SeriesOptions, Size, TimeChart,
};
use streamline_render::wgpu::TextureFormat;
use streamline_test_utils::{MockDrawPass, MockRenderContext, RenderContext};

fn chart_with(options: ChartOptions) -> (Arc<MockRenderContext>, TimeChart) {
    let mock = Arc::new(MockRenderContext::new());
    let ctx: Arc<dyn RenderContext> = mock.clone();
    let chart = TimeChart::new(ctx, TextureFormat::Bgra8UnormSrgb, options).unwrap();
    (mock, chart)
}

#[test]
fn test_bad_color_rejected_at_construction() {
    let options = ChartOptions::new().with_series(SeriesOptions::new("s").with_color("#zz"));
    let ctx: Arc<dyn RenderContext> = Arc::new(MockRenderContext::new());
    let err = TimeChart::new(ctx, TextureFormat::Bgra8UnormSrgb, options).unwrap_err();
    assert!(matches!(err, ChartError::Color(_)));
}

#[test]
fn test_resize_updates_content_box_then_model() {
    let options = ChartOptions::new().with_padding(Padding::new(10.0, 20.0, 30.0, 40.0));
    let (_mock, mut chart) = chart_with(options);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    chart.model_mut().resized.connect(move |size| sink.borrow_mut().push(*size));

    chart.resize(400.0, 300.0);

    assert_eq!(chart.content_box(), Rect::new(40.0, 10.0, 340.0, 260.0));
    assert_eq!(chart.model().x_scale().range, (40.0, 380.0));
    assert_eq!(chart.model().y_scale().range, (270.0, 10.0));
    assert_eq!(chart.renderer().viewport(), (400.0, 300.0));
    assert_eq!(*seen.borrow(), vec![Size::new(400.0, 300.0)]);
}

#[test]
fn test_render_updates_model_before_drawing() {
    let (_mock, mut chart) = chart_with(ChartOptions::new());
    let id = chart.add_series(SeriesOptions::new("s")).unwrap();
    chart.resize(200.0, 100.0);

    let updates = Rc::new(RefCell::new(0));
    let sink = updates.clone();
    chart.model_mut().updated.connect(move |_| *sink.borrow_mut() += 1);

    let mut pass = MockDrawPass::new();
    let stats = chart.render(&mut pass).unwrap();
    assert_eq!(stats.vertices_drawn, 0);
    assert_eq!(*updates.borrow(), 1);

    chart.extend(id, [(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)]).unwrap();
    assert!(chart.model().is_update_pending());

    pass.clear();
    let stats = chart.render(&mut pass).unwrap();
    assert!(!chart.model().is_update_pending());
    assert_eq!(chart.model().x_scale().domain, (0.0, 2.0));
    assert_eq!(stats.vertices_drawn, 8);
    assert_eq!(*updates.borrow(), 2);
}

#[test]
fn test_render_skips_update_when_nothing_changed() {
    let (_mock, mut chart) = chart_with(ChartOptions::new());
    let id = chart.add_series(SeriesOptions::new("s")).unwrap();
    chart.extend(id, [(0.0, 0.0), (1.0, 1.0)]).unwrap();
    chart.resize(200.0, 100.0);

    let updates = Rc::new(RefCell::new(0));
    let sink = updates.clone();
    chart.model_mut().updated.connect(move |_| *sink.borrow_mut() += 1);

    let mut pass = MockDrawPass::new();
    for _ in 0..3 {
        let stats = chart.render(&mut pass).unwrap();
        assert_eq!(stats.vertices_drawn, 4);
    }
    assert_eq!(*updates.borrow(), 1);

    chart.model_mut().get_mut(id).unwrap().data.push((2.0, 0.0).into()).unwrap();
    chart.render(&mut pass).unwrap();
    assert_eq!(*updates.borrow(), 2);
    assert_eq!(chart.model().x_scale().domain, (0.0, 2.0));
}

#[test]
fn test_streaming_uploads_only_new_points() {
    let options = ChartOptions::new().with_segment_capacity(64);
    let (mock, mut chart) = chart_with(options);
    let id = chart.add_series(SeriesOptions::new("s")).unwrap();
    chart.resize(300.0, 200.0);

    let mut pass = MockDrawPass::new();
    let mut uploaded = 0;
    for frame in 0..10 {
        let start = frame * 20;
        chart
            .extend(id, (start..start + 20).map(|i| (i as f64, (i as f64).sin())))
            .unwrap();
        chart.render(&mut pass).unwrap();

        let segments = chart.renderer().series_lines(id).unwrap().segments();
        let buffered: usize = segments.iter().map(|s| s.len()).sum();
        assert_eq!(buffered + 1, chart.model().series()[0].data.len());
        uploaded = buffered;
    }
    assert_eq!(uploaded, 199);

    // 199 quads at 64 per segment.
    let segments = chart.renderer().series_lines(id).unwrap().segments().len();
    assert_eq!(segments, 4);
    assert_eq!(mock.count_buffer_creates(), 1 + 1 + segments);
}

#[test]
fn test_non_monotonic_push_rejected() {
    let (_mock, mut chart) = chart_with(ChartOptions::new());
    let id = chart.add_series(SeriesOptions::new("s")).unwrap();
    chart.push(id, (5.0, 0.0)).unwrap();

    let err = chart.push(id, (4.0, 0.0)).unwrap_err();
    assert!(matches!(err, ChartError::NonMonotonic { index: 1, .. }));
}

#[test]
fn test_dispose_signals_and_releases_everything() {
    let options = ChartOptions::new()
        .with_segment_capacity(8)
        .with_series(SeriesOptions::new("a"))
        .with_series(SeriesOptions::new("b"));
    let (mock, mut chart) = chart_with(options);
    for series in 0..2 {
        let id = chart.model().series()[series].id;
        chart
            .extend(id, (0..30).map(|i| (i as f64, 0.0)))
            .unwrap();
    }
    chart.resize(100.0, 100.0);
    chart.render(&mut MockDrawPass::new()).unwrap();

    let disposed = Rc::new(RefCell::new(false));
    let sink = disposed.clone();
    chart.model_mut().disposing.connect(move |_| *sink.borrow_mut() = true);

    let created = mock.count_buffer_creates();
    chart.dispose();

    assert!(*disposed.borrow());
    assert_eq!(mock.count_buffer_destroys(), created);
    assert_eq!(mock.live_buffer_count(), 0);
}
