use plotkit::core::LinePlot;
use plotkit::core::axis::Axis;
use plotkit::plot::{AxisPos, PlotPos};
use plotkit::render::{Color, MetricsDevice};
use plotkit::{HighlightMode, InteractionConfig, LegendPos, Plot, PlotEvent, RealPoint, RealRect};

const CLIENT: RealRect = RealRect {
    x: 0.0,
    y: 0.0,
    width: 800.0,
    height: 500.0,
};

fn rendered_plot() -> Plot {
    let mut plot = Plot::new();
    let xs: Vec<f64> = (0..50).map(f64::from).collect();
    let ys: Vec<f64> = xs.iter().map(|x| (x * 0.2).sin() * 10.0).collect();
    plot.add_plot(
        Box::new(LinePlot::from_xy(&xs, &ys, "signal", Color::BLACK)),
        AxisPos::XBottom,
        AxisPos::YLeft,
        PlotPos::Top,
        true,
    );
    let mut dc = MetricsDevice::default();
    plot.render(&mut dc, CLIENT);
    plot
}

fn legend_center(plot: &Plot) -> RealPoint {
    let rect = plot.legend_rect();
    assert!(rect.width > 0.0 && rect.height > 0.0, "legend not laid out");
    RealPoint::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
}

#[test]
fn legend_drag_near_right_edge_docks() {
    let mut plot = rendered_plot();
    assert_eq!(plot.legend_position(), LegendPos::Floating);

    let start = legend_center(&plot);
    plot.pointer_down(start);
    plot.pointer_move(RealPoint::new(795.0, start.y));
    let event = plot.pointer_up(RealPoint::new(795.0, start.y), CLIENT);

    assert_eq!(plot.legend_position(), LegendPos::Right);
    match event {
        Some(PlotEvent::LegendMoved { pos, .. }) => assert_eq!(pos, LegendPos::Right),
        other => panic!("expected LegendMoved, got {other:?}"),
    }
}

#[test]
fn docked_legend_pulled_from_the_edge_floats_again() {
    let mut plot = rendered_plot();
    plot.set_legend_position(LegendPos::Right);
    let mut dc = MetricsDevice::default();
    plot.render(&mut dc, CLIENT);

    let start = legend_center(&plot);
    plot.pointer_down(start);
    let event = plot.pointer_up(RealPoint::new(400.0, 250.0), CLIENT);

    assert_eq!(plot.legend_position(), LegendPos::Floating);
    assert!(matches!(
        event,
        Some(PlotEvent::LegendMoved {
            pos: LegendPos::Floating,
            ..
        })
    ));
}

#[test]
fn zero_delta_legend_drag_changes_nothing() {
    let mut plot = rendered_plot();
    let percent_before = plot.legend_pos_percent();
    let pos_before = plot.legend_position();

    let start = legend_center(&plot);
    plot.pointer_down(start);
    let event = plot.pointer_up(start, CLIENT);

    assert!(event.is_none());
    assert_eq!(plot.legend_pos_percent(), percent_before);
    assert_eq!(plot.legend_position(), pos_before);
}

#[test]
fn span_drag_below_threshold_commits_nothing() {
    let mut plot = rendered_plot();
    plot.set_highlight_mode(HighlightMode::Span);
    let before = plot.highlight_region();

    let row = plot.plot_rects()[0];
    let anchor = RealPoint::new(row.x + 100.0, row.y + 50.0);
    plot.pointer_down(anchor);
    let event = plot.pointer_up(RealPoint::new(anchor.x + 8.0, anchor.y), CLIENT);

    assert!(event.is_none());
    assert_eq!(plot.highlight_region(), before);
}

#[test]
fn span_drag_past_threshold_commits_full_height_region() {
    let mut plot = rendered_plot();
    plot.set_highlight_mode(HighlightMode::Span);

    let row = plot.plot_rects()[0];
    let anchor = RealPoint::new(row.x + 100.0, row.y + 50.0);
    plot.pointer_down(anchor);
    let event = plot.pointer_up(RealPoint::new(anchor.x + 60.0, anchor.y + 5.0), CLIENT);

    let region = match event {
        Some(PlotEvent::HighlightChanged(region)) => region,
        other => panic!("expected HighlightChanged, got {other:?}"),
    };
    assert!(region.left_percent < region.right_percent);
    assert_eq!(region.top_percent, 0.0);
    assert_eq!(region.bottom_percent, 100.0);
    assert_eq!(plot.highlight_region(), region);
}

#[test]
fn capture_lost_abandons_the_drag_without_commit() {
    let mut plot = rendered_plot();
    plot.set_highlight_mode(HighlightMode::Span);
    let before = plot.highlight_region();

    let row = plot.plot_rects()[0];
    let anchor = RealPoint::new(row.x + 100.0, row.y + 50.0);
    plot.pointer_down(anchor);
    plot.pointer_move(RealPoint::new(anchor.x + 200.0, anchor.y));
    plot.capture_lost();
    let event = plot.pointer_up(RealPoint::new(anchor.x + 200.0, anchor.y), CLIENT);

    assert!(event.is_none());
    assert_eq!(plot.highlight_region(), before);
}

#[test]
fn pointer_move_reports_the_drag_outline() {
    let mut plot = rendered_plot();
    let rect = plot.legend_rect();
    let start = legend_center(&plot);
    plot.pointer_down(start);
    let outline = plot
        .pointer_move(RealPoint::new(start.x + 30.0, start.y - 10.0))
        .expect("drag in progress");
    assert_eq!(outline.x, rect.x + 30.0);
    assert_eq!(outline.y, rect.y - 10.0);
    assert_eq!(outline.width, rect.width);
    plot.capture_lost();
}

#[test]
fn zoom_drag_narrows_the_bound_axes() {
    let mut plot = rendered_plot();
    plot.set_highlight_mode(HighlightMode::Zoom);

    let (x_lo, x_hi) = {
        let x = plot.axis(AxisPos::XBottom, PlotPos::Top).expect("x axis");
        (x.world_min(), x.world_max())
    };

    let row = plot.plot_rects()[0];
    let anchor = RealPoint::new(row.x + row.width * 0.25, row.y + row.height * 0.25);
    let end = RealPoint::new(row.x + row.width * 0.75, row.y + row.height * 0.75);
    plot.pointer_down(anchor);
    let event = plot.pointer_up(end, CLIENT);

    assert!(matches!(event, Some(PlotEvent::Zoom { .. })));
    let x = plot.axis(AxisPos::XBottom, PlotPos::Top).expect("x axis");
    assert!(x.world_min() > x_lo);
    assert!(x.world_max() < x_hi);
}

#[test]
fn double_click_restores_the_data_range() {
    let mut plot = rendered_plot();
    plot.set_highlight_mode(HighlightMode::Zoom);

    let row = plot.plot_rects()[0];
    plot.pointer_down(RealPoint::new(row.x + 50.0, row.y + 50.0));
    plot.pointer_up(
        RealPoint::new(row.x + 150.0, row.y + 120.0),
        CLIENT,
    );

    let event = plot.double_click(RealPoint::new(row.x + 100.0, row.y + 100.0));
    assert!(matches!(event, Some(PlotEvent::Zoom { .. })));
    let x = plot.axis(AxisPos::XBottom, PlotPos::Top).expect("x axis");
    assert!(x.world_min() <= 0.0);
    assert!(x.world_max() >= 49.0);
}

#[test]
fn double_click_is_inert_when_zoom_mode_is_off() {
    let mut plot = rendered_plot();
    assert_eq!(plot.highlight_mode(), HighlightMode::Disabled);

    plot.axis_mut(AxisPos::XBottom, PlotPos::Top)
        .expect("x axis")
        .set_world(2.0, 4.0);

    let row = plot.plot_rects()[0];
    let event = plot.double_click(RealPoint::new(row.x + 100.0, row.y + 100.0));

    assert!(event.is_none(), "got {event:?} although zoom mode is off");
    let x = plot.axis(AxisPos::XBottom, PlotPos::Top).expect("x axis");
    assert_eq!(x.world_min(), 2.0);
    assert_eq!(x.world_max(), 4.0);
}

#[test]
fn double_click_outside_every_plot_row_is_inert() {
    let mut plot = rendered_plot();
    plot.set_highlight_mode(HighlightMode::Zoom);

    plot.axis_mut(AxisPos::XBottom, PlotPos::Top)
        .expect("x axis")
        .set_world(2.0, 4.0);

    let event = plot.double_click(RealPoint::new(1.0, 1.0));

    assert!(event.is_none());
    let x = plot.axis(AxisPos::XBottom, PlotPos::Top).expect("x axis");
    assert_eq!(x.world_min(), 2.0);
    assert_eq!(x.world_max(), 4.0);
}

#[test]
fn interaction_config_round_trips_through_serde() {
    let config = InteractionConfig {
        span_commit_px: 25.0,
        ..InteractionConfig::default()
    };
    let json = serde_json::to_string(&config).expect("serialize");
    let back: InteractionConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, config);
    assert_eq!(back.span_commit_px, 25.0);
    assert_eq!(back.dock_threshold_px, 10.0);
}
