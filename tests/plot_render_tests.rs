use plotkit::core::LinePlot;
use plotkit::plot::{AxisPos, PlotPos};
use plotkit::render::{Color, DrawOp, MetricsDevice};
use plotkit::{Plot, RealRect};

const GEOM: RealRect = RealRect {
    x: 0.0,
    y: 0.0,
    width: 800.0,
    height: 500.0,
};

fn series(label: &str) -> Box<LinePlot> {
    let xs: Vec<f64> = (0..40).map(f64::from).collect();
    let ys: Vec<f64> = xs.iter().map(|x| x * x * 0.05).collect();
    Box::new(LinePlot::from_xy(&xs, &ys, label, Color::BLACK))
}

fn line_count(dc: &MetricsDevice) -> usize {
    dc.ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::Line { .. }))
        .count()
}

#[test]
fn single_row_render_produces_one_plot_rect() {
    let mut plot = Plot::new();
    plot.add_plot(series("a"), AxisPos::XBottom, AxisPos::YLeft, PlotPos::Top, true);

    let mut dc = MetricsDevice::default();
    plot.render(&mut dc, GEOM);

    assert_eq!(plot.plot_rects().len(), 1);
    let row = plot.plot_rects()[0];
    assert!(row.width > 0.0 && row.height > 0.0);
    assert!(!dc.ops().is_empty());
}

#[test]
fn second_row_partitions_the_plot_area() {
    let mut plot = Plot::new();
    plot.add_plot(series("a"), AxisPos::XBottom, AxisPos::YLeft, PlotPos::Top, true);
    plot.add_plot(series("b"), AxisPos::XBottom, AxisPos::YLeft, PlotPos::Bottom, true);

    let mut dc = MetricsDevice::default();
    plot.render(&mut dc, GEOM);

    let rects = plot.plot_rects();
    assert_eq!(rects.len(), 2);
    assert!(rects[1].y >= rects[0].y + rects[0].height, "rows must not overlap");
    assert!((rects[0].height - rects[1].height).abs() < 1e-9);
}

#[test]
fn grid_toggles_change_the_emitted_line_count() {
    let mut plot = Plot::new();
    plot.add_plot(series("a"), AxisPos::XBottom, AxisPos::YLeft, PlotPos::Top, true);

    let mut with_grid = MetricsDevice::default();
    plot.render(&mut with_grid, GEOM);

    plot.set_show_coarse_grid(false);
    plot.set_show_fine_grid(false);
    let mut without_grid = MetricsDevice::default();
    plot.render(&mut without_grid, GEOM);

    assert!(line_count(&with_grid) > line_count(&without_grid));
}

#[test]
fn every_series_is_clipped_to_its_row() {
    let mut plot = Plot::new();
    plot.add_plot(series("a"), AxisPos::XBottom, AxisPos::YLeft, PlotPos::Top, true);
    plot.add_plot(series("b"), AxisPos::XBottom, AxisPos::YLeft, PlotPos::Top, true);

    let mut dc = MetricsDevice::default();
    plot.render(&mut dc, GEOM);

    let clips = dc.ops().iter().filter(|op| matches!(op, DrawOp::Clip(_))).count();
    let unclips = dc.ops().iter().filter(|op| matches!(op, DrawOp::Unclip)).count();
    assert_eq!(clips, 2);
    assert_eq!(clips, unclips);
}

#[test]
fn title_text_reaches_the_device() {
    let mut plot = Plot::new();
    plot.add_plot(series("a"), AxisPos::XBottom, AxisPos::YLeft, PlotPos::Top, true);
    plot.set_title("response curve");

    let mut dc = MetricsDevice::default();
    plot.render(&mut dc, GEOM);

    assert!(dc.ops().iter().any(|op| matches!(
        op,
        DrawOp::Text { content, .. } if content == "response curve"
    )));
}

#[test]
fn legend_labels_reach_the_device() {
    let mut plot = Plot::new();
    plot.add_plot(series("measured"), AxisPos::XBottom, AxisPos::YLeft, PlotPos::Top, true);

    let mut dc = MetricsDevice::default();
    plot.render(&mut dc, GEOM);

    assert!(dc.ops().iter().any(|op| matches!(
        op,
        DrawOp::Text { content, .. } if content == "measured"
    )));
    assert!(plot.legend_rect().width > 0.0);
}

#[test]
fn hidden_legend_is_forced_on_for_svg_export_and_restored() {
    let mut plot = Plot::new();
    plot.add_plot(series("measured"), AxisPos::XBottom, AxisPos::YLeft, PlotPos::Top, true);
    plot.set_show_legend(false);

    let mut out = Vec::new();
    plot.render_to_svg(&mut out, 800.0, 500.0).expect("svg export");
    let svg = String::from_utf8(out).expect("utf8");

    assert!(svg.contains("measured"), "legend items must appear in exports");
    assert!(!plot.shows_legend(), "interactive setting must survive the export");
}

#[test]
fn hidden_axis_draws_no_ticks_or_labels() {
    use plotkit::core::axis::Axis;

    let mut plot = Plot::new();
    plot.add_plot(series("a"), AxisPos::XBottom, AxisPos::YLeft, PlotPos::Top, true);

    let mut visible = MetricsDevice::default();
    plot.render(&mut visible, GEOM);

    plot.axis_mut(AxisPos::XBottom, PlotPos::Top)
        .expect("bound x axis")
        .base_mut()
        .shown = false;
    plot.invalidate();
    let mut hidden = MetricsDevice::default();
    plot.render(&mut hidden, GEOM);

    assert!(hidden.text_ops().len() < visible.text_ops().len());
    assert!(line_count(&hidden) < line_count(&visible));
}

#[test]
fn tiny_geometry_renders_no_rows() {
    let mut plot = Plot::new();
    plot.add_plot(series("a"), AxisPos::XBottom, AxisPos::YLeft, PlotPos::Top, true);

    let mut dc = MetricsDevice::default();
    plot.render(&mut dc, RealRect::new(0.0, 0.0, 40.0, 40.0));

    assert!(plot.plot_rects().is_empty());
}

#[test]
fn shrinking_below_the_minimum_drops_the_previous_rows() {
    let mut plot = Plot::new();
    plot.add_plot(series("a"), AxisPos::XBottom, AxisPos::YLeft, PlotPos::Top, true);

    let mut dc = MetricsDevice::default();
    plot.render(&mut dc, GEOM);
    assert_eq!(plot.plot_rects().len(), 1);

    let mut small = MetricsDevice::default();
    plot.render(&mut small, RealRect::new(0.0, 0.0, 40.0, 40.0));

    assert!(
        plot.plot_rects().is_empty(),
        "rows from the large render must not survive a failed one"
    );
}
