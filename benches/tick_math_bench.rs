use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use plotkit::core::LinePlot;
use plotkit::core::axis::{Axis, LinearAxis, LogAxis, TimeAxis};
use plotkit::plot::{AxisPos, PlotPos};
use plotkit::render::{Color, MetricsDevice};
use plotkit::{Plot, RealRect};

fn bench_linear_tick_generation(c: &mut Criterion) {
    let axis = LinearAxis::new(-273.15, 1200.0, "temperature");

    c.bench_function("linear_ticks_640px", |b| {
        b.iter(|| {
            let mut ticks = Vec::new();
            axis.ticks(black_box(0.0), black_box(640.0), &mut ticks);
            black_box(ticks)
        })
    });
}

fn bench_log_tick_generation(c: &mut Criterion) {
    let axis = LogAxis::new(1e-3, 1e6, "frequency");

    c.bench_function("log_ticks_640px", |b| {
        b.iter(|| {
            let mut ticks = Vec::new();
            axis.ticks(black_box(0.0), black_box(640.0), &mut ticks);
            black_box(ticks)
        })
    });
}

fn bench_time_tick_generation(c: &mut Criterion) {
    // two weeks of hourly data
    let axis = TimeAxis::new(0.0, 24.0 * 14.0);

    c.bench_function("time_ticks_800px", |b| {
        b.iter(|| {
            let mut ticks = Vec::new();
            axis.ticks(black_box(0.0), black_box(800.0), &mut ticks);
            black_box(ticks)
        })
    });
}

fn bench_mapping_round_trip(c: &mut Criterion) {
    let axis = LinearAxis::new(0.0, 10_000.0, "");

    c.bench_function("linear_mapping_round_trip", |b| {
        b.iter(|| {
            let px = axis.world_to_physical(black_box(4_321.123), 0.0, 1920.0);
            black_box(axis.physical_to_world(px, 0.0, 1920.0))
        })
    });
}

fn bench_full_render_10k_points(c: &mut Criterion) {
    let xs: Vec<f64> = (0..10_000).map(|i| f64::from(i) * 0.01).collect();
    let ys: Vec<f64> = xs.iter().map(|x| (x * 0.7).sin() * 50.0).collect();

    let mut plot = Plot::new();
    plot.set_title("bench");
    plot.add_plot(
        Box::new(LinePlot::from_xy(&xs, &ys, "signal", Color::BLACK)),
        AxisPos::XBottom,
        AxisPos::YLeft,
        PlotPos::Top,
        true,
    );

    c.bench_function("full_render_10k_points", |b| {
        b.iter(|| {
            let mut dc = MetricsDevice::default();
            plot.invalidate();
            plot.render(&mut dc, black_box(RealRect::new(0.0, 0.0, 1280.0, 720.0)));
            black_box(dc.ops().len())
        })
    });
}

criterion_group!(
    benches,
    bench_linear_tick_generation,
    bench_log_tick_generation,
    bench_time_tick_generation,
    bench_mapping_round_trip,
    bench_full_render_10k_points
);
criterion_main!(benches);
